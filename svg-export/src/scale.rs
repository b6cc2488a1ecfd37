/// Affine map from a data interval (`domain`) to a pixel interval (`range`).
///
/// Values outside the domain are extrapolated, nothing is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Map a data value to the range. A degenerate domain maps everything to
    /// the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        let t = if span != 0.0 {
            (value - d0) / span
        } else if span.is_nan() {
            f64::NAN
        } else {
            0.5
        };
        r0 + t * (r1 - r0)
    }

    /// Roughly `count` evenly spaced, human friendly values covering the
    /// domain. Steps are 1, 2 or 5 times a power of ten.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [d0, d1] = self.domain;
        if count == 0 || !d0.is_finite() || !d1.is_finite() {
            return Vec::new();
        }
        if d0 == d1 {
            return vec![d0];
        }
        let (start, stop, reverse) = if d1 < d0 {
            (d1, d0, true)
        } else {
            (d0, d1, false)
        };
        let Some((i1, i2, inc)) = tick_spec(start, stop, count as f64) else {
            return Vec::new();
        };
        let mut ticks: Vec<f64> = (i1..=i2)
            .map(|i| {
                if inc < 0.0 {
                    i as f64 / -inc
                } else {
                    i as f64 * inc
                }
            })
            .collect();
        if reverse {
            ticks.reverse();
        }
        ticks
    }
}

// Thresholds between the step multipliers 1, 2, 5 and 10.
const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// First and last tick index and the increment. A negative increment means
/// "divide by `-inc`", which keeps small steps exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round() as i64;
        i2 = (stop * inv).round() as i64;
        if (i1 as f64) / inv < start {
            i1 += 1;
        }
        if (i2 as f64) / inv > stop {
            i2 -= 1;
        }
        inc = -inv;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round() as i64;
        i2 = (stop / inc).round() as i64;
        if (i1 as f64) * inc < start {
            i1 += 1;
        }
        if (i2 as f64) * inc > stop {
            i2 -= 1;
        }
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i2 >= i1).then_some((i1, i2, inc))
}

/// Tick labels with a precision matching the spacing of the ticks.
pub fn format_ticks(tick_positions: &[f64]) -> Vec<String> {
    if tick_positions.is_empty() {
        return Vec::new();
    }
    let (_, _, mag_increment) = ticks_magnitude_and_increment(tick_positions);

    let fmt_fun = match mag_increment {
        i8::MIN..=-4 => |z: &f64| format!("{z:.2e}"),
        -3 => |z: &f64| format!("{z:.3}"),
        -2 => |z: &f64| format!("{z:.2}"),
        -1 => |z: &f64| format!("{z:.1}"),
        0..=5 => |z: &f64| format!("{z:.0}"),
        6..=i8::MAX => |z: &f64| format!("{z:.0e}"),
    };

    tick_positions.iter().map(fmt_fun).collect()
}

/// Decimal magnitudes of the smallest and largest non-zero tick and of the
/// mean increment between ticks.
fn ticks_magnitude_and_increment(tick_positions: &[f64]) -> (i8, i8, i8) {
    let (magnitude_min, magnitude_max) = tick_positions
        .iter()
        .filter(|y| **y != 0.0)
        .fold((f64::MAX, f64::MIN), |mut acc, x| {
            let mag_x = x.abs().log10();
            if mag_x < acc.0 {
                acc.0 = mag_x
            };
            if mag_x > acc.1 {
                acc.1 = mag_x
            };
            acc
        });
    let mag_increment = if tick_positions.len() < 2 {
        // A single tick formats like its own magnitude.
        magnitude_max
    } else {
        let n = tick_positions.len() - 1;
        let acc: f64 = tick_positions
            .iter()
            .zip(tick_positions.iter().skip(1))
            .map(|(zi, zj)| (zj - zi).abs())
            .sum();
        (acc / n as f64).log10()
    };
    (
        magnitude_min.floor() as i8,
        magnitude_max.floor() as i8,
        mag_increment.floor() as i8,
    )
}
