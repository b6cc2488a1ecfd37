use svg_export::{Surface, Transform};

use super::ScatterPlot;

impl<S: Surface> ScatterPlot<S> {
    pub fn zoom(&self) -> Transform {
        self.zoom
    }

    /// Replace the view transform. It applies to everything drawn, tooltip
    /// included, and leaves the plot-area margin translation untouched.
    pub fn set_zoom(&mut self, transform: Transform) {
        if !(transform.k.is_finite() && transform.k > 0.0) {
            log::warn!("ignoring zoom with scale {}", transform.k);
            return;
        }
        self.zoom = transform;
        self.surface.set_transform(self.zoom_group, transform);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let Transform { k, x, y } = self.zoom;
        self.set_zoom(Transform {
            k,
            x: x + dx,
            y: y + dy,
        });
    }

    /// Scale the view by `factor`, keeping the surface point `(x, y)` fixed.
    pub fn zoom_at(&mut self, factor: f64, x: f64, y: f64) {
        let k = self.zoom.k * factor;
        let (px, py) = self.zoom.invert_point(x, y);
        self.set_zoom(Transform {
            k,
            x: x - k * px,
            y: y - k * py,
        });
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(Transform::identity());
    }
}
