use serde::{Deserialize, Serialize};

use crate::{core::PtF, polygon::even_odd_contains};

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_angle_deg(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// The serialized field set of an [`Obb`](Obb). The corner cache is derived
/// state and recomputed on load.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
struct ObbParams {
    center: PtF,
    w: f64,
    h: f64,
    angle_deg: f64,
}

/// Oriented bounding box. The four corners are a cache that is recomputed on
/// every change of center, extent or angle and is hence never stale.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(from = "ObbParams", into = "ObbParams")]
pub struct Obb {
    center: PtF,
    w: f64,
    h: f64,
    angle_deg: f64,
    corners: [PtF; 4],
}

impl From<ObbParams> for Obb {
    fn from(p: ObbParams) -> Self {
        Obb::new(p.center, p.w, p.h, p.angle_deg)
    }
}
impl From<Obb> for ObbParams {
    fn from(obb: Obb) -> Self {
        ObbParams {
            center: obb.center,
            w: obb.w,
            h: obb.h,
            angle_deg: obb.angle_deg,
        }
    }
}
impl Default for Obb {
    fn default() -> Self {
        Self::new(PtF::default(), 0.0, 0.0, 0.0)
    }
}

impl Obb {
    pub fn new(center: PtF, w: f64, h: f64, angle_deg: f64) -> Self {
        let mut obb = Self {
            center,
            w,
            h,
            angle_deg: wrap_angle_deg(angle_deg),
            corners: [PtF::default(); 4],
        };
        obb.update_corners();
        obb
    }

    /// Axis-aligned box between two drag points, angle 0.
    pub fn from_drag_points(p1: PtF, p2: PtF) -> Self {
        let center = (p1 + p2) * 0.5;
        Self::new(center, (p2.x - p1.x).abs(), (p2.y - p1.y).abs(), 0.0)
    }

    pub fn center(&self) -> PtF {
        self.center
    }
    pub fn w(&self) -> f64 {
        self.w
    }
    pub fn h(&self) -> f64 {
        self.h
    }
    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }
    /// Clockwise, starting at the corner that was top-left before rotation.
    pub fn corners(&self) -> [PtF; 4] {
        self.corners
    }
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn set_center(&mut self, center: PtF) {
        self.center = center;
        self.update_corners();
    }
    pub fn set_size(&mut self, w: f64, h: f64) {
        self.w = w;
        self.h = h;
        self.update_corners();
    }
    pub fn set_angle(&mut self, angle_deg: f64) {
        self.angle_deg = wrap_angle_deg(angle_deg);
        self.update_corners();
    }
    pub fn rotate(&mut self, delta_deg: f64) {
        self.set_angle(self.angle_deg + delta_deg);
    }

    fn update_corners(&mut self) {
        let hw = self.w * 0.5;
        let hh = self.h * 0.5;
        let rad = self.angle_deg.to_radians();
        let rel = [
            PtF::new(-hw, -hh),
            PtF::new(hw, -hh),
            PtF::new(hw, hh),
            PtF::new(-hw, hh),
        ];
        for (corner, r) in self.corners.iter_mut().zip(rel.iter()) {
            *corner = r.rotated(rad) + self.center;
        }
    }

    /// Re-derives center, extent and angle from four corner points. Only the
    /// first three points determine extent and angle, the fourth is assumed to
    /// complete the rectangle. Ignored for fewer than four points.
    pub fn set_corners(&mut self, points: &[PtF]) {
        if points.len() < 4 {
            return;
        }
        let center = points[..4]
            .iter()
            .fold(PtF::default(), |acc, p| acc + *p)
            / 4.0;
        let edge = points[1] - points[0];
        self.center = center;
        self.angle_deg = wrap_angle_deg(edge.y.atan2(edge.x).to_degrees());
        self.w = points[0].dist(&points[1]);
        self.h = points[1].dist(&points[2]);
        self.update_corners();
    }

    pub fn contains(&self, p: PtF) -> bool {
        if self.w <= 0.0 || self.h <= 0.0 {
            return false;
        }
        even_odd_contains(&self.corners, p)
    }
}

#[cfg(test)]
use crate::core::floats_close;

#[test]
fn test_corners() {
    let obb = Obb::new(PtF::new(100.0, 100.0), 40.0, 20.0, 90.0);
    let corners = obb.corners();
    let tol = 1e-9;
    let expected = [
        PtF::new(110.0, 80.0),
        PtF::new(110.0, 120.0),
        PtF::new(90.0, 120.0),
        PtF::new(90.0, 80.0),
    ];
    for (c, e) in corners.iter().zip(expected.iter()) {
        assert!((c.x - e.x).abs() < tol && (c.y - e.y).abs() < tol, "{c:?} vs {e:?}");
    }
}

#[test]
fn test_roundtrip_from_corners() {
    for angle in [0.0, 17.5, 90.0, 133.0, 359.0] {
        let obb = Obb::new(PtF::new(50.0, 60.0), 30.0, 12.0, angle);
        let mut rec = Obb::default();
        rec.set_corners(&obb.corners());
        assert!(rec.center().is_close_to(obb.center()));
        assert!((rec.w() - obb.w()).abs() < 1e-9);
        assert!((rec.h() - obb.h()).abs() < 1e-9);
        let d = wrap_angle_deg(rec.angle_deg() - obb.angle_deg());
        assert!(d < 1e-9 || 360.0 - d < 1e-9);
    }
}

#[test]
fn test_contains() {
    let obb = Obb::new(PtF::new(100.0, 100.0), 40.0, 20.0, 90.0);
    // rotated by 90 degrees, the box extends 10 along x and 20 along y
    assert!(obb.contains(PtF::new(100.0, 115.0)));
    assert!(!obb.contains(PtF::new(115.0, 100.0)));
    assert!(obb.contains(obb.center()));
    let degenerate = Obb::default();
    assert!(!degenerate.contains(PtF::default()));
}

#[test]
fn test_rotate_wraps() {
    let mut obb = Obb::new(PtF::new(0.0, 0.0), 10.0, 10.0, 350.0);
    obb.rotate(20.0);
    assert!(floats_close(obb.angle_deg(), 10.0));
    obb.rotate(-30.0);
    assert!(floats_close(obb.angle_deg(), 340.0));
}

#[test]
fn test_set_corners_ignores_short_input() {
    let mut obb = Obb::new(PtF::new(5.0, 5.0), 4.0, 2.0, 0.0);
    let before = obb;
    obb.set_corners(&[PtF::new(0.0, 0.0), PtF::new(1.0, 0.0)]);
    assert_eq!(obb, before);
}

#[test]
fn test_serde_rederives_corners() {
    let obb = Obb::new(PtF::new(10.0, 20.0), 8.0, 4.0, 45.0);
    let s = serde_json::to_string(&obb).unwrap();
    assert!(!s.contains("corners"));
    let read: Obb = serde_json::from_str(&s).unwrap();
    assert_eq!(read, obb);
}
