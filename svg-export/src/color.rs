use std::collections::HashMap;

/// Ten-colour categorical palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Hands out palette colours to keys in the order the keys are first seen,
/// starting over once the palette is used up. A key keeps its colour.
#[derive(Debug, Clone)]
pub struct OrdinalColors {
    palette: &'static [&'static str],
    assigned: HashMap<String, usize>,
}

impl Default for OrdinalColors {
    fn default() -> Self {
        Self::new(&CATEGORY10)
    }
}

impl OrdinalColors {
    pub fn new(palette: &'static [&'static str]) -> Self {
        Self {
            palette,
            assigned: HashMap::new(),
        }
    }

    pub fn color(&mut self, key: &str) -> &'static str {
        let next = self.assigned.len();
        let index = *self.assigned.entry(key.to_owned()).or_insert(next);
        self.palette[index % self.palette.len()]
    }
}

/// RGB value of the colour notations used in this crate's scenes: `#rgb`,
/// `#rrggbb` and a handful of CSS names. Case is ignored.
pub fn parse_css_color(raw: &str) -> Option<[u8; 3]> {
    let raw = raw.trim().to_ascii_lowercase();
    if let Some(hex) = raw.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        return match digits[..] {
            [r, g, b] => Some([r * 17, g * 17, b * 17]),
            [r1, r0, g1, g0, b1, b0] => Some([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0]),
            _ => None,
        };
    }
    let rgb = match raw.as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "green" => [0, 128, 0],
        "grey" | "gray" => [128, 128, 128],
        "lightgrey" | "lightgray" => [211, 211, 211],
        "red" => [255, 0, 0],
        "blue" => [0, 0, 255],
        _ => return None,
    };
    Some(rgb)
}
