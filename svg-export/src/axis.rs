use crate::scale::{format_ticks, LinearScale};
use crate::scene::{Element, NodeId, Surface, Transform};

const DEFAULT_TICK_COUNT: usize = 10;
const DEFAULT_TICK_SIZE: f64 = 6.0;
const DEFAULT_TICK_PADDING: f64 = 3.0;
const TICK_FONT_SIZE: &str = "10px";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Horizontal axis with ticks and labels below the line.
    Bottom,
    /// Vertical axis with ticks and labels left of the line.
    Left,
}

/// Tick marks and labels for a `LinearScale`, drawn into a group.
///
/// The axis line lies at the group's origin; callers position it by
/// transforming the group.
#[derive(Debug, Clone)]
pub struct Axis {
    scale: LinearScale,
    orientation: Orientation,
    tick_count: usize,
    tick_size_inner: f64,
    tick_size_outer: f64,
    tick_padding: f64,
}

impl Axis {
    pub fn new(scale: LinearScale, orientation: Orientation) -> Self {
        Self {
            scale,
            orientation,
            tick_count: DEFAULT_TICK_COUNT,
            tick_size_inner: DEFAULT_TICK_SIZE,
            tick_size_outer: DEFAULT_TICK_SIZE,
            tick_padding: DEFAULT_TICK_PADDING,
        }
    }

    pub fn bottom(scale: LinearScale) -> Self {
        Self::new(scale, Orientation::Bottom)
    }

    pub fn left(scale: LinearScale) -> Self {
        Self::new(scale, Orientation::Left)
    }

    pub fn with_tick_padding(mut self, padding: f64) -> Self {
        self.tick_padding = padding;
        self
    }

    pub fn with_tick_count(mut self, count: usize) -> Self {
        self.tick_count = count;
        self
    }

    pub fn ticks(&self) -> Vec<f64> {
        self.scale.ticks(self.tick_count)
    }

    /// Append the domain line and one group per tick to `parent`.
    pub fn render_into(&self, surface: &mut impl Surface, parent: NodeId) {
        let [r0, r1] = self.scale.range();
        let outer = self.tick_size_outer;
        let stroke = |el: Element| el.with_style("stroke", "black");

        // Domain line with outer ticks at both ends.
        let domain = match self.orientation {
            Orientation::Bottom => [
                Element::line(r0, outer, r0, 0.0),
                Element::line(r0, 0.0, r1, 0.0),
                Element::line(r1, 0.0, r1, outer),
            ],
            Orientation::Left => [
                Element::line(-outer, r0, 0.0, r0),
                Element::line(0.0, r0, 0.0, r1),
                Element::line(0.0, r1, -outer, r1),
            ],
        };
        for line in domain {
            surface.append(parent, stroke(line).with_class("domain"));
        }

        let ticks = self.ticks();
        let labels = format_ticks(&ticks);
        let spacing = self.tick_size_inner.max(0.0) + self.tick_padding;
        log::debug!(
            "drawing {:?} axis with {} ticks",
            self.orientation,
            ticks.len()
        );
        for (value, label) in ticks.iter().zip(labels) {
            let position = self.scale.apply(*value);
            let (offset, tick_line, tick_label) = match self.orientation {
                Orientation::Bottom => (
                    Transform::translate(position, 0.0),
                    Element::line(0.0, 0.0, 0.0, self.tick_size_inner),
                    Element::text(0.0, spacing, &label)
                        .with_dy(0.71)
                        .with_style("text-anchor", "middle"),
                ),
                Orientation::Left => (
                    Transform::translate(0.0, position),
                    Element::line(-self.tick_size_inner, 0.0, 0.0, 0.0),
                    Element::text(-spacing, 0.0, &label)
                        .with_dy(0.32)
                        .with_style("text-anchor", "end"),
                ),
            };
            let tick = surface.append(parent, Element::group(offset).with_class("tick"));
            surface.append(tick, stroke(tick_line));
            surface.append(
                tick,
                tick_label
                    .with_fill("black")
                    .with_style("font-size", TICK_FONT_SIZE),
            );
        }
    }
}
