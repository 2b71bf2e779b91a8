use annolab_domain::{BbF, PtF, ShapeF, ShapeI};
use serde::{Deserialize, Serialize};

use crate::events::ZoomAmount;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
const WHEEL_ZOOM_FACTOR: f64 = 1.1;

/// Affine mapping between image and screen coordinates. `pan` is the screen
/// position of the image origin.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pub pan: PtF,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: PtF::default(),
        }
    }
}

impl Viewport {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn image_to_screen(&self, p: PtF) -> PtF {
        self.pan + p * self.zoom
    }
    pub fn screen_to_image(&self, p: PtF) -> PtF {
        (p - self.pan) / self.zoom
    }

    /// The image rectangle in screen coordinates.
    pub fn image_rect(&self, image: ShapeI) -> BbF {
        BbF {
            x: self.pan.x,
            y: self.pan.y,
            w: f64::from(image.w) * self.zoom,
            h: f64::from(image.h) * self.zoom,
        }
    }

    /// Multiplies the zoom by `factor` keeping the image point under `pivot`
    /// fixed on screen. Rejected if the resulting zoom leaves the valid range.
    pub fn zoom_at(&mut self, pivot: PtF, factor: f64) -> bool {
        let zoom_new = self.zoom * factor;
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom_new) {
            return false;
        }
        let ratio = zoom_new / self.zoom;
        self.pan = pivot - (pivot - self.pan) * ratio;
        self.zoom = zoom_new;
        true
    }

    /// Wheel zoom, the sign of a delta picks in or out, centered on the cursor.
    pub fn wheel_zoom(&mut self, amount: ZoomAmount, cursor: PtF) -> bool {
        let factor = match amount {
            ZoomAmount::Delta(d) => {
                if d > 0.0 {
                    WHEEL_ZOOM_FACTOR
                } else {
                    1.0 / WHEEL_ZOOM_FACTOR
                }
            }
            ZoomAmount::Factor(f) => f,
        };
        self.zoom_at(cursor, factor)
    }

    /// Scales the image to fit the window and centers it. No-op if either
    /// extent is zero.
    pub fn fit_to_window(&mut self, image: ShapeI, win: ShapeF) -> bool {
        if !image.has_area() || !win.has_area() {
            return false;
        }
        let im: ShapeF = image.into();
        self.set_zoom((win.w / im.w).min(win.h / im.h));
        self.pan = PtF {
            x: (win.w - im.w * self.zoom) * 0.5,
            y: (win.h - im.h * self.zoom) * 0.5,
        };
        true
    }

    pub fn reset_view(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
use annolab_domain::floats_close;

#[test]
fn test_roundtrip() {
    let mut vp = Viewport::default();
    vp.set_zoom(2.5);
    vp.pan = PtF::new(17.0, -3.0);
    for p in [
        PtF::new(0.0, 0.0),
        PtF::new(10.0, 20.0),
        PtF::new(-5.0, 3.3),
    ] {
        assert!(vp.screen_to_image(vp.image_to_screen(p)).is_close_to(p));
    }
}

#[test]
fn test_zoom_clamped() {
    let mut vp = Viewport::default();
    vp.set_zoom(100.0);
    assert!(floats_close(vp.zoom(), MAX_ZOOM));
    vp.set_zoom(0.0);
    assert!(floats_close(vp.zoom(), MIN_ZOOM));
}

#[test]
fn test_zoom_at_anchors_pivot() {
    let mut vp = Viewport::default();
    vp.pan = PtF::new(5.0, 5.0);
    let pivot = PtF::new(40.0, 30.0);
    let anchor_before = vp.screen_to_image(pivot);
    assert!(vp.zoom_at(pivot, 1.1));
    assert!(vp.screen_to_image(pivot).is_close_to(anchor_before));
    assert!(vp.zoom_at(pivot, 1.0 / 1.1));
    assert!(vp.screen_to_image(pivot).is_close_to(anchor_before));
}

#[test]
fn test_zoom_at_rejects_out_of_range() {
    let mut vp = Viewport::default();
    vp.set_zoom(MAX_ZOOM);
    let pan_before = vp.pan;
    assert!(!vp.zoom_at(PtF::new(10.0, 10.0), 1.1));
    assert!(floats_close(vp.zoom(), MAX_ZOOM));
    assert!(vp.pan.is_close_to(pan_before));
}

#[test]
fn test_fit_to_window() {
    let mut vp = Viewport::default();
    assert!(vp.fit_to_window(ShapeI::new(100, 50), ShapeF::new(200.0, 200.0)));
    assert!(floats_close(vp.zoom(), 2.0));
    assert!(vp.pan.is_close_to(PtF::new(0.0, 50.0)));

    // zero extents leave the viewport untouched
    let before = vp;
    assert!(!vp.fit_to_window(ShapeI::new(0, 50), ShapeF::new(200.0, 200.0)));
    assert!(!vp.fit_to_window(ShapeI::new(100, 50), ShapeF::new(0.0, 200.0)));
    assert_eq!(vp, before);
}

#[test]
fn test_reset() {
    let mut vp = Viewport::default();
    vp.set_zoom(3.0);
    vp.pan = PtF::new(9.0, 9.0);
    vp.reset_view();
    assert!(floats_close(vp.zoom(), 1.0));
    assert!(vp.pan.is_close_to(PtF::default()));
}
