use svg_export::{Element, Surface, Transform};

use super::{point_size, ScatterPlot};
use crate::record::CountryRecord;

const TOOLTIP_WIDTH: f64 = 175.0;
const TOOLTIP_HEIGHT: f64 = 75.0;
const TOOLTIP_MARGIN: f64 = 5.0;
const LINE_SPACING: f64 = 12.0;
const CORNER_RADIUS: f64 = 10.0;

/// The five lines of a record's tooltip.
pub fn tooltip_lines(d: &CountryRecord) -> [String; 5] {
    [
        d.name.clone(),
        format!("Population: {} million", d.population),
        format!("GDP: ${} trillion", d.gdp),
        format!("EPC: {} million BTU", d.epc),
        format!("Total: {} trillion BTU", d.total),
    ]
}

impl<S: Surface> ScatterPlot<S> {
    /// Show the tooltip of the record at `index`, centred above its point.
    /// Replaces a tooltip that is already shown. Returns `false` for an
    /// unknown index.
    pub fn show_tooltip(&mut self, index: usize) -> bool {
        let Some(d) = self.data.get(index) else {
            log::warn!("no record at index {}", index);
            return false;
        };
        let x_pos = self.x_scale.apply(d.gdp) - TOOLTIP_WIDTH / 2.0;
        let y_pos = self.y_scale.apply(d.epc) - TOOLTIP_HEIGHT - point_size(d.total);
        let lines = tooltip_lines(d);
        self.hide_tooltip();

        let group = self.surface.append(
            self.plot_group,
            Element::group(Transform::translate(x_pos, y_pos)).with_class("tooltip"),
        );
        self.surface.append(
            group,
            Element::rounded_rect(0.0, 0.0, TOOLTIP_WIDTH, TOOLTIP_HEIGHT, CORNER_RADIUS)
                .with_fill("white")
                .with_style("fill-opacity", "0.9")
                .with_style("stroke", "black"),
        );
        for (i, line) in lines.iter().enumerate() {
            let y = TOOLTIP_MARGIN + LINE_SPACING * (i + 1) as f64;
            self.surface.append(
                group,
                Element::text(TOOLTIP_MARGIN, y, line)
                    .with_fill("black")
                    .with_style("font-size", "10px"),
            );
        }
        self.tooltip = Some(group);
        true
    }

    /// Remove the tooltip if one is shown.
    pub fn hide_tooltip(&mut self) {
        if let Some(tooltip) = self.tooltip.take() {
            self.surface.remove(tooltip);
        }
    }

    pub fn tooltip_shown(&self) -> bool {
        self.tooltip.is_some()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Feed the point under the pointer, as reported by the surface, after
    /// every pointer movement. Entering a point shows its tooltip and
    /// leaving it hides the tooltip. Returns whether anything changed.
    pub fn pointer_moved(&mut self, hit: Option<usize>) -> bool {
        if hit == self.hovered {
            return false;
        }
        if self.hovered.take().is_some() {
            self.hide_tooltip();
        }
        if let Some(index) = hit {
            if self.show_tooltip(index) {
                self.hovered = Some(index);
            }
        }
        true
    }
}
