//! The scatterplot: GDP against energy use per capita, with point area
//! growing with a country's total energy use.

mod draw;
mod tooltip;
mod zoom;

use std::fmt;

use serde::Serialize;
use svg_export::{Element, LinearScale, NodeId, OrdinalColors, Surface, Transform};
use thiserror::Error;

use crate::record::CountryRecord;

pub use draw::{legend_elements, point_elements, x_label, y_label, LEGEND_ENTRIES};
pub use tooltip::tooltip_lines;

/// Headroom added above the largest GDP.
const X_PADDING: f64 = 1.05;
/// Headroom added above the largest energy use per capita, leaving space
/// for the legend.
const Y_PADDING: f64 = 1.25;

/// Radius of a point, growing with the square root of the total so that
/// large consumers do not swamp the chart.
pub fn point_size(total: f64) -> f64 {
    total.sqrt() / 0.2
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Outer size of the chart and the margins around the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(960.0, 500.0)
    }
}

impl Layout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Margin {
                left: 80.0,
                right: 80.0,
                top: 50.0,
                bottom: 50.0,
            },
        }
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Gdp,
    Epc,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Gdp => write!(f, "GDP"),
            Dimension::Epc => write!(f, "energy per capita"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotError {
    #[error("the dataset contains no plottable records")]
    NoData,
    #[error("no positive {axis} values, there is nothing to scale")]
    DegenerateDomain { axis: Dimension },
}

/// Position, size and colour of one point in plot-area coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointGeometry {
    pub name: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
}

/// Draws the records into a `Surface` it owns for its whole lifetime and
/// manages the hover tooltip and the pan/zoom transform.
pub struct ScatterPlot<S: Surface> {
    data: Vec<CountryRecord>,
    layout: Layout,
    x_scale: LinearScale,
    y_scale: LinearScale,
    colors: Vec<&'static str>,
    surface: S,
    zoom_group: NodeId,
    plot_group: NodeId,
    tooltip: Option<NodeId>,
    hovered: Option<usize>,
    zoom: Transform,
    drawn: bool,
}

impl<S: Surface> ScatterPlot<S> {
    pub fn new(data: Vec<CountryRecord>, mut surface: S, layout: Layout) -> Result<Self, PlotError> {
        let x_max = padded_max(data.iter().map(|d| d.gdp), X_PADDING, Dimension::Gdp)?;
        let y_max = padded_max(data.iter().map(|d| d.epc), Y_PADDING, Dimension::Epc)?;
        let x_scale = LinearScale::new([0.0, x_max], [0.0, layout.plot_width()]);
        let y_scale = LinearScale::new([0.0, y_max], [layout.plot_height(), 0.0]);
        log::debug!("x domain [0, {}], y domain [0, {}]", x_max, y_max);

        let mut palette = OrdinalColors::default();
        let colors = data.iter().map(|d| palette.color(&d.country)).collect();

        surface.set_size(layout.width, layout.height);
        let root = surface.root();
        let zoom_group = surface.append(
            root,
            Element::group(Transform::identity()).with_class("zoom"),
        );
        let plot_group = surface.append(
            zoom_group,
            Element::group(Transform::translate(layout.margin.left, layout.margin.top)),
        );
        log::info!("created scatterplot of {} records", data.len());

        Ok(Self {
            data,
            layout,
            x_scale,
            y_scale,
            colors,
            surface,
            zoom_group,
            plot_group,
            tooltip: None,
            hovered: None,
            zoom: Transform::identity(),
            drawn: false,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x_scale
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    pub fn color_of(&self, index: usize) -> Option<&'static str> {
        self.colors.get(index).copied()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn geometry(&self) -> Vec<PointGeometry> {
        self.data
            .iter()
            .zip(self.colors.iter())
            .map(|(d, fill)| PointGeometry {
                name: d.name.clone(),
                cx: self.x_scale.apply(d.gdp),
                cy: self.y_scale.apply(d.epc),
                r: point_size(d.total),
                fill: fill.to_string(),
            })
            .collect()
    }
}

/// `ceil(max * padding)`, ignoring NaN values. Fails unless the result is
/// positive.
fn padded_max(
    values: impl Iterator<Item = f64>,
    padding: f64,
    dimension: Dimension,
) -> Result<f64, PlotError> {
    let max = values
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .ok_or(PlotError::NoData)?;
    let padded = (max * padding).ceil();
    if padded > 0.0 && padded.is_finite() {
        Ok(padded)
    } else {
        Err(PlotError::DegenerateDomain { axis: dimension })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg_export::Scene;

    pub(super) fn sample() -> Vec<CountryRecord> {
        vec![
            CountryRecord::new("A", 10.0, 1.0, 50.0),
            CountryRecord::new("B", 20.0, 2.0, 100.0),
            CountryRecord::new("C", 30.0, 4.0, 200.0),
        ]
    }

    pub(super) fn plot(data: Vec<CountryRecord>) -> ScatterPlot<Scene> {
        ScatterPlot::new(data, Scene::new(1.0, 1.0), Layout::default()).unwrap()
    }

    #[test]
    fn test_layout_defaults() {
        let layout = Layout::default();
        assert_eq!(layout.plot_width(), 800.0);
        assert_eq!(layout.plot_height(), 400.0);
    }

    #[test]
    fn test_scales_from_padded_extrema() {
        let plot = plot(sample());
        // ceil(4 * 1.05) = 5 and ceil(200 * 1.25) = 250
        assert_eq!(plot.x_scale().domain(), [0.0, 5.0]);
        assert_eq!(plot.y_scale().domain(), [0.0, 250.0]);
        assert_eq!(plot.x_scale().apply(0.0), 0.0);
        assert_eq!(plot.x_scale().apply(5.0), 800.0);
        assert_eq!(plot.x_scale().apply(4.0), 4.0 / 5.0 * 800.0);
        assert_eq!(plot.y_scale().apply(0.0), 400.0);
        assert_eq!(plot.y_scale().apply(250.0), 0.0);
    }

    #[test]
    fn test_surface_is_sized_from_layout() {
        let plot = plot(sample());
        assert_eq!(plot.surface().width(), 960.0);
        assert_eq!(plot.surface().height(), 500.0);
        // root, zoom group and plot group
        assert_eq!(plot.surface().node_count(), 3);
    }

    #[test]
    fn test_point_size() {
        assert_eq!(point_size(0.0), 0.0);
        assert!((point_size(0.5) - 3.5355).abs() < 1e-4);
        assert_eq!(point_size(1.0), 5.0);
        assert_eq!(point_size(100.0), 50.0);
        let sizes: Vec<f64> = [0.0, 0.1, 1.0, 10.0, 1e3, 1e6]
            .into_iter()
            .map(point_size)
            .collect();
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        assert!(sizes.iter().all(|s| s.is_finite() && *s >= 0.0));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let res = ScatterPlot::new(Vec::new(), Scene::new(1.0, 1.0), Layout::default());
        assert_eq!(res.err(), Some(PlotError::NoData));
    }

    #[test]
    fn test_all_zero_values_are_rejected() {
        let data = vec![CountryRecord::new("A", 1.0, 0.0, 3.0)];
        let res = ScatterPlot::new(data, Scene::new(1.0, 1.0), Layout::default());
        assert_eq!(
            res.err(),
            Some(PlotError::DegenerateDomain {
                axis: Dimension::Gdp
            })
        );
    }

    #[test]
    fn test_negative_values_are_rejected() {
        use crate::loader::{load_str, NumericPolicy};

        let data = load_str(
            "country,population,gdp,ecc\nA,1,2,-5\nB,1,3,-7\n",
            NumericPolicy::Passthrough,
        )
        .unwrap();
        let err = ScatterPlot::new(data, Scene::new(1.0, 1.0), Layout::default())
            .err()
            .unwrap();
        assert_eq!(
            err,
            PlotError::DegenerateDomain {
                axis: Dimension::Epc
            }
        );
        assert_eq!(
            err.to_string(),
            "no positive energy per capita values, there is nothing to scale"
        );
    }

    #[test]
    fn test_nan_values_are_ignored_for_extrema() {
        let mut data = sample();
        data.push(CountryRecord::new("N", f64::NAN, f64::NAN, f64::NAN));
        let plot = plot(data);
        assert_eq!(plot.x_scale().domain(), [0.0, 5.0]);

        let only_nan = vec![CountryRecord::new("N", f64::NAN, f64::NAN, f64::NAN)];
        let res = ScatterPlot::new(only_nan, Scene::new(1.0, 1.0), Layout::default());
        assert_eq!(res.err(), Some(PlotError::NoData));
    }

    #[test]
    fn test_colors_follow_first_appearance_of_country() {
        let mut data = sample();
        data.push(CountryRecord::new("A", 1.0, 1.0, 1.0));
        let plot = plot(data);
        assert_eq!(plot.color_of(0), Some("#1f77b4"));
        assert_eq!(plot.color_of(1), Some("#ff7f0e"));
        assert_eq!(plot.color_of(3), Some("#1f77b4"));
        assert_eq!(plot.color_of(4), None);
    }

    #[test]
    fn test_geometry() {
        let geometry = plot(sample()).geometry();
        assert_eq!(geometry.len(), 3);
        assert_eq!(geometry[2].name, "C");
        assert_eq!(geometry[2].cx, 640.0);
        assert_eq!(geometry[2].cy, 80.0);
        assert_eq!(geometry[0].r, point_size(0.5));
        assert_eq!(geometry[1].fill, "#ff7f0e");
    }
}
