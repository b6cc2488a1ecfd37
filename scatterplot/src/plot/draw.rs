use svg_export::{Axis, Element, LinearScale, Surface, Transform};

use super::{point_size, Layout, ScatterPlot};
use crate::record::CountryRecord;

pub const X_LABEL: &str = "GDP (in Trillion US Dollars) in 2010";
pub const Y_LABEL: &str = "Energy Consumption per Capita (in Million BTUs per person)";
const LEGEND_TITLE: &str = "Total Energy Consumption";
const LABEL_FONT_SIZE: &str = "12px";

/// Reference totals shown in the legend, with the distance of the circle
/// centre and of the caption from the bottom of the plot area.
pub const LEGEND_ENTRIES: [(f64, f64, f64, &str); 3] = [
    (1.0, 175.0, 172.0, " 1 Trillion BTUs"),
    (10.0, 150.0, 147.0, " 10 Trillion BTUs"),
    (100.0, 80.0, 77.0, " 100 Trillion BTUs"),
];

/// One circle per record, in record order.
pub fn point_elements(
    records: &[CountryRecord],
    colors: &[&str],
    x_scale: &LinearScale,
    y_scale: &LinearScale,
) -> Vec<Element> {
    records
        .iter()
        .zip(colors)
        .map(|(d, color)| {
            Element::circle(x_scale.apply(d.gdp), y_scale.apply(d.epc), point_size(d.total))
                .with_class("dot")
                .with_fill(color)
        })
        .collect()
}

/// Title of the x axis, relative to the axis group.
pub fn x_label(layout: &Layout) -> Element {
    Element::text(layout.plot_width() / 2.0, 50.0, X_LABEL)
        .with_class("label")
        .with_fill("black")
        .with_style("text-anchor", "middle")
        .with_style("font-size", LABEL_FONT_SIZE)
}

/// Title of the y axis, relative to the axis group and reading upwards.
pub fn y_label() -> Element {
    // (-50, -50) in the frame rotated by -90 degrees
    Element::text(-50.0, 50.0, Y_LABEL)
        .with_angle(-90.0)
        .with_dy(0.71)
        .with_class("label")
        .with_fill("black")
        .with_style("text-anchor", "end")
        .with_style("font-size", LABEL_FONT_SIZE)
}

pub fn legend_elements(layout: &Layout) -> Vec<Element> {
    let w = layout.plot_width();
    let h = layout.plot_height();
    let mut elements = vec![Element::rect(w - 250.0, h - 190.0, 220.0, 180.0)
        .with_class("legend")
        .with_fill("lightgrey")];
    elements.extend(LEGEND_ENTRIES.iter().map(|(total, cy, _, _)| {
        Element::circle(w - 100.0, h - cy, point_size(*total))
            .with_class("legend")
            .with_fill("white")
    }));
    elements.extend(LEGEND_ENTRIES.iter().map(|(_, _, y, caption)| {
        Element::text(w - 150.0, h - y, caption)
            .with_class("label")
            .with_fill("black")
            .with_style("text-anchor", "end")
    }));
    elements.push(
        Element::text(w - 150.0, h - 15.0, LEGEND_TITLE)
            .with_class("label")
            .with_fill("Green")
            .with_style("text-anchor", "middle")
            .with_style("font-size", "16px"),
    );
    elements
}

impl<S: Surface> ScatterPlot<S> {
    /// Draw points, axes and legend. Later calls do nothing.
    pub fn draw(&mut self) {
        if self.drawn {
            log::warn!("scatterplot is already drawn");
            return;
        }
        self.drawn = true;
        self.draw_data();
        self.draw_x_axis();
        self.draw_y_axis();
        self.draw_legend();
    }

    fn draw_data(&mut self) {
        let points = point_elements(&self.data, &self.colors, &self.x_scale, &self.y_scale);
        for (index, point) in points.into_iter().enumerate() {
            let node = self.surface.append(self.plot_group, point);
            self.surface.listen(node, index);
        }
    }

    fn draw_x_axis(&mut self) {
        let group = self.surface.append(
            self.plot_group,
            Element::group(Transform::translate(0.0, self.layout.plot_height()))
                .with_class("x axis"),
        );
        Axis::bottom(self.x_scale)
            .with_tick_padding(2.0)
            .render_into(&mut self.surface, group);
        self.surface.append(group, x_label(&self.layout));
    }

    fn draw_y_axis(&mut self) {
        let group = self.surface.append(
            self.plot_group,
            Element::group(Transform::identity()).with_class("y axis"),
        );
        Axis::left(self.y_scale)
            .with_tick_padding(2.0)
            .render_into(&mut self.surface, group);
        self.surface.append(group, y_label());
    }

    fn draw_legend(&mut self) {
        for element in legend_elements(&self.layout) {
            self.surface.append(self.plot_group, element);
        }
    }
}

#[cfg(test)]
mod tests {
    use svg_export::{Scene, Shape};

    use super::super::tests::{plot, sample};
    use super::*;

    #[test]
    fn test_draw_points() {
        let mut plot = plot(sample());
        plot.draw();
        let scene = plot.surface();
        let dots = scene.find_by_class("dot");
        assert_eq!(dots.len(), 3);
        let last = scene.node(dots[2]).unwrap();
        assert_eq!(
            last.element.shape,
            Shape::Circle {
                cx: 640.0,
                cy: 80.0,
                r: point_size(6.0)
            }
        );
        assert_eq!(last.listen_key, Some(2));
        assert_eq!(last.element.style.get("fill").map(String::as_str), Some("#2ca02c"));
    }

    #[test]
    fn test_draw_axes() {
        let mut plot = plot(sample());
        plot.draw();
        let scene = plot.surface();
        let axes = scene.find_by_class("axis");
        assert_eq!(axes.len(), 2);
        assert_eq!(
            scene.node(axes[0]).unwrap().element.shape,
            Shape::Group(Transform::translate(0.0, 400.0))
        );
        let labels: Vec<String> = scene
            .find_by_class("label")
            .into_iter()
            .filter_map(|id| match &scene.node(id)?.element.shape {
                Shape::Text { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect();
        assert!(labels.contains(&X_LABEL.to_string()));
        assert!(labels.contains(&Y_LABEL.to_string()));
    }

    #[test]
    fn test_axis_label_placement() {
        let layout = Layout::default();
        match x_label(&layout).shape {
            Shape::Text { x, y, angle, dy, .. } => {
                assert_eq!((x, y, angle, dy), (400.0, 50.0, 0.0, 0.0));
            }
            other => panic!("expected the x label, found {other:?}"),
        }

        let label = y_label();
        assert_eq!(
            label.style.get("text-anchor").map(String::as_str),
            Some("end")
        );
        match label.shape {
            Shape::Text { x, y, angle, dy, .. } => {
                assert_eq!((angle, dy), (-90.0, 0.71));
                // The anchor is (-50, -50) in the frame rotated by the angle.
                let (sin, cos) = angle.to_radians().sin_cos();
                let (rx, ry) = (x * cos + y * sin, -x * sin + y * cos);
                assert!((rx + 50.0).abs() < 1e-9 && (ry + 50.0).abs() < 1e-9);
            }
            other => panic!("expected the y label, found {other:?}"),
        }
    }

    #[test]
    fn test_axis_labels_in_svg() {
        let mut plot = plot(sample());
        plot.draw();
        let svg = plot.surface().to_svg();
        assert!(svg.contains("<g class=\"x axis\" transform=\"translate(0,400)\">"));
        assert!(svg.contains(&format!(
            "<text class=\"label\" transform=\"translate(400,50)\" \
             style=\"fill:black;font-size:12px;text-anchor:middle\">{X_LABEL}</text>"
        )));
        assert!(svg.contains(&format!(
            "<text class=\"label\" dy=\"0.71em\" transform=\"translate(-50,50) rotate(-90)\" \
             style=\"fill:black;font-size:12px;text-anchor:end\">{Y_LABEL}</text>"
        )));
    }

    #[test]
    fn test_legend_captions_in_svg() {
        let mut plot = plot(sample());
        plot.draw();
        let svg = plot.surface().to_svg();
        for (y, caption) in [
            (228, " 1 Trillion BTUs"),
            (253, " 10 Trillion BTUs"),
            (323, " 100 Trillion BTUs"),
        ] {
            let text = format!(
                "<text class=\"label\" transform=\"translate(650,{y})\" \
                 style=\"fill:black;text-anchor:end\">{caption}</text>"
            );
            assert!(svg.contains(&text), "missing {text}");
        }
    }

    #[test]
    fn test_legend_box_and_circles_are_not_stroked() {
        let elements = legend_elements(&Layout::default());
        for element in &elements[..4] {
            assert_eq!(element.class.as_deref(), Some("legend"));
            assert!(!element.style.contains_key("stroke"), "{element:?}");
            assert!(!element.style.contains_key("stroke-width"), "{element:?}");
        }
    }

    #[test]
    fn test_legend_layout() {
        let layout = Layout::default();
        let elements = legend_elements(&layout);
        assert_eq!(elements.len(), 8);
        assert_eq!(
            elements[0].shape,
            Shape::Rect {
                x: 550.0,
                y: 210.0,
                width: 220.0,
                height: 180.0,
                radius: 0.0
            }
        );
        let radii: Vec<f64> = elements[1..4]
            .iter()
            .map(|e| match e.shape {
                Shape::Circle { r, .. } => r,
                _ => f64::NAN,
            })
            .collect();
        assert_eq!(radii[0], 5.0);
        assert!((radii[1] - 15.81).abs() < 0.01);
        assert_eq!(radii[2], 50.0);
        match &elements[7].shape {
            Shape::Text { x, y, content, .. } => {
                assert_eq!((*x, *y), (650.0, 385.0));
                assert_eq!(content, LEGEND_TITLE);
            }
            other => panic!("expected the legend title, found {other:?}"),
        }
    }

    #[test]
    fn test_draw_is_done_once() {
        let mut plot = plot(sample());
        plot.draw();
        let count = plot.surface().node_count();
        plot.draw();
        assert_eq!(plot.surface().node_count(), count);
    }

    #[test]
    fn test_nan_points_are_drawn() {
        let mut data = sample();
        data.push(CountryRecord::new("N", f64::NAN, 1.0, f64::NAN));
        let mut plot = plot(data);
        plot.draw();
        let scene: &Scene = plot.surface();
        let dots = scene.find_by_class("dot");
        assert_eq!(dots.len(), 4);
        match scene.node(dots[3]).unwrap().element.shape {
            Shape::Circle { cy, r, .. } => assert!(cy.is_nan() && r.is_nan()),
            _ => panic!("expected a circle"),
        }
    }
}
