//! Painting a `Scene` with egui and feeding pointer input back to the plot.

use egui::{emath::Rot2, epaint::TextShape, Color32, FontId, Painter, Pos2, Stroke};
use svg_export::{parse_css_color, Element, Scene, Shape, Transform};

use crate::plot::ScatterPlot;

/// Zoom steps per scrolled point, as `2^(delta * ZOOM_SPEED)`.
const ZOOM_SPEED: f64 = 0.002;
const DEFAULT_FONT_SIZE: f32 = 10.0;
/// Distance from the top of a text line to its baseline, in ems.
const ASCENT: f32 = 0.8;

pub fn zoom_factor(scroll_delta: f32) -> f64 {
    2f64.powf(scroll_delta as f64 * ZOOM_SPEED)
}

/// Vertical scroll of this frame. The scroll is consumed so that no other
/// widget acts on it as well.
fn take_scroll(input: &mut egui::InputState) -> f32 {
    let delta = input.smooth_scroll_delta.y;
    input.smooth_scroll_delta = egui::Vec2::ZERO;
    delta
}

/// Show the plot in a canvas of the chart's size and handle hover, drag
/// and scroll on it. Returns whether the plot changed.
pub fn show(plot: &mut ScatterPlot<Scene>, ui: &mut egui::Ui) -> bool {
    let layout = *plot.layout();
    let size = egui::vec2(layout.width as f32, layout.height as f32);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
    let origin = response.rect.min;
    let mut changed = false;

    if response.dragged() {
        let delta = response.drag_delta();
        plot.pan_by(delta.x as f64, delta.y as f64);
        changed = true;
    }
    match response.hover_pos() {
        Some(pos) => {
            let local = pos - origin;
            let (x, y) = (local.x as f64, local.y as f64);
            let scroll = ui.input_mut(take_scroll);
            if scroll != 0.0 {
                plot.zoom_at(zoom_factor(scroll), x, y);
                changed = true;
            }
            let hit = plot.surface().hit_test(x, y).map(|(_, key)| key);
            changed |= plot.pointer_moved(hit);
        }
        None => changed |= plot.pointer_moved(None),
    }

    painter.rect_filled(response.rect, 0.0, Color32::WHITE);
    paint_scene(plot.surface(), &painter.with_clip_rect(response.rect), origin);
    changed
}

pub fn paint_scene(scene: &Scene, painter: &Painter, origin: Pos2) {
    scene.walk(|_, node, transform| paint_element(&node.element, transform, painter, origin));
}

fn paint_element(element: &Element, transform: Transform, painter: &Painter, origin: Pos2) {
    let k = transform.k as f32;
    let to_screen = |x: f64, y: f64| {
        let (sx, sy) = transform.apply(x, y);
        origin + egui::vec2(sx as f32, sy as f32)
    };
    let paint = Paint::of(element, k);
    match &element.shape {
        Shape::Group(_) => {}
        Shape::Circle { cx, cy, r } => {
            // NaN data leaves a circle without a position.
            if cx.is_finite() && cy.is_finite() && r.is_finite() {
                painter.circle(to_screen(*cx, *cy), *r as f32 * k, paint.fill, paint.stroke);
            }
        }
        Shape::Rect {
            x,
            y,
            width,
            height,
            radius,
        } => {
            let rect = egui::Rect::from_two_pos(to_screen(*x, *y), to_screen(x + width, y + height));
            painter.rect(rect, *radius as f32 * k, paint.fill, paint.stroke);
        }
        Shape::Line { x1, y1, x2, y2 } => {
            painter.line_segment([to_screen(*x1, *y1), to_screen(*x2, *y2)], paint.stroke);
        }
        Shape::Text {
            x,
            y,
            angle,
            dy,
            content,
        } => {
            let galley = painter.layout_no_wrap(
                content.to_owned(),
                FontId::proportional(paint.font_size),
                paint.fill,
            );
            let angle = (*angle as f32).to_radians();
            let offset = text_offset(galley.size().x, paint.font_size, paint.anchor, *dy as f32);
            let pos = to_screen(*x, *y) + Rot2::from_angle(angle) * offset;
            painter.add(TextShape::new(pos, galley, paint.fill).with_angle(angle));
        }
    }
}

/// Offset from an SVG text anchor (baseline point) to the top left corner
/// of the laid out text, before rotation.
fn text_offset(width: f32, font_size: f32, anchor: f32, dy: f32) -> egui::Vec2 {
    egui::vec2(-anchor * width, (dy - ASCENT) * font_size)
}

/// Colours and sizes of an element, already scaled by the zoom factor.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Paint {
    fill: Color32,
    stroke: Stroke,
    font_size: f32,
    /// Fraction of the text width left of the anchor.
    anchor: f32,
}

impl Paint {
    fn of(element: &Element, k: f32) -> Self {
        let style = &element.style;
        let px = |key: &str| {
            style
                .get(key)
                .and_then(|v| v.trim_end_matches("px").parse::<f32>().ok())
        };
        let opacity = style
            .get("fill-opacity")
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(1.0);
        // Shapes without a fill are painted black, like in SVG.
        let fill = match style.get("fill") {
            Some(color) => color32(color).unwrap_or(Color32::TRANSPARENT),
            None => Color32::BLACK,
        }
        .gamma_multiply(opacity);
        let stroke = style
            .get("stroke")
            .and_then(|color| color32(color))
            .map_or(Stroke::NONE, |color| {
                Stroke::new(px("stroke-width").unwrap_or(1.0) * k, color)
            });
        let anchor = match style.get("text-anchor").map(String::as_str) {
            Some("middle") => 0.5,
            Some("end") => 1.0,
            _ => 0.0,
        };
        Self {
            fill,
            stroke,
            font_size: px("font-size").unwrap_or(DEFAULT_FONT_SIZE) * k,
            anchor,
        }
    }
}

fn color32(raw: &str) -> Option<Color32> {
    parse_css_color(raw).map(|[r, g, b]| Color32::from_rgb(r, g, b))
}
