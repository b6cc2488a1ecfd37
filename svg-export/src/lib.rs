#![warn(clippy::all, rust_2018_idioms)]

//! Retained 2D scenes, rendered to SVG or walked by an interactive painter,
//! plus the scales, axes and colours a chart needs to fill them.

pub mod axis;
pub mod color;
pub mod scale;
pub mod scene;
pub mod svg;

pub use axis::{Axis, Orientation};
pub use color::{parse_css_color, OrdinalColors, CATEGORY10};
pub use scale::{format_ticks, LinearScale};
pub use scene::{Element, Node, NodeId, Scene, Shape, Surface, Transform};
