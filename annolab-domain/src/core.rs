use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    ops::{Add, Div, Mul, Sub},
};

const EPS: f64 = 1e-10;

pub fn floats_close(x: f64, y: f64) -> bool {
    (x - y).abs() < EPS
}

pub fn min_from_partial<T>(x1: &T, x2: &T) -> Ordering
where
    T: PartialOrd,
{
    match x1.partial_cmp(x2) {
        Some(o) => o,
        None => Ordering::Less,
    }
}
pub fn max_from_partial<T>(x1: &T, x2: &T) -> Ordering
where
    T: PartialOrd,
{
    match x1.partial_cmp(x2) {
        Some(o) => o,
        None => Ordering::Greater,
    }
}

/// 2d point in image coordinates, x to the right, y down.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct PtF {
    pub x: f64,
    pub y: f64,
}

impl PtF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    pub fn len_square(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }
    pub fn len(&self) -> f64 {
        self.len_square().sqrt()
    }
    pub fn dot(&self, rhs: &Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }
    pub fn dist_square(&self, other: &Self) -> f64 {
        (*self - *other).len_square()
    }
    pub fn dist(&self, other: &Self) -> f64 {
        self.dist_square(other).sqrt()
    }
    /// Rotation around the origin, positive angles rotate clockwise on screen.
    #[must_use]
    pub fn rotated(&self, angle_rad: f64) -> Self {
        let (sin, cos) = angle_rad.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
    pub fn is_close_to(&self, other: Self) -> bool {
        floats_close(self.x, other.x) && floats_close(self.y, other.y)
    }
}

impl Add for PtF {
    type Output = PtF;
    fn add(self, rhs: Self) -> Self::Output {
        PtF {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}
impl Sub for PtF {
    type Output = PtF;
    fn sub(self, rhs: Self) -> Self::Output {
        PtF {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}
impl Mul<f64> for PtF {
    type Output = PtF;
    fn mul(self, rhs: f64) -> Self::Output {
        PtF {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}
impl Div<f64> for PtF {
    type Output = PtF;
    fn div(self, rhs: f64) -> Self::Output {
        PtF {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}
impl From<(f64, f64)> for PtF {
    fn from(value: (f64, f64)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}
impl From<PtF> for (f64, f64) {
    fn from(p: PtF) -> (f64, f64) {
        (p.x, p.y)
    }
}
impl From<(u32, u32)> for PtF {
    fn from(value: (u32, u32)) -> Self {
        Self {
            x: f64::from(value.0),
            y: f64::from(value.1),
        }
    }
}

pub type ShapeI = Shape<u32>;
pub type ShapeF = Shape<f64>;

/// Extent of an image or a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Shape<T> {
    pub w: T,
    pub h: T,
}
impl<T> Shape<T> {
    pub fn new(w: T, h: T) -> Self {
        Self { w, h }
    }
}
impl ShapeI {
    pub fn has_area(&self) -> bool {
        self.w > 0 && self.h > 0
    }
}
impl ShapeF {
    pub fn has_area(&self) -> bool {
        self.w > 0.0 && self.h > 0.0
    }
}
impl From<ShapeI> for ShapeF {
    fn from(value: ShapeI) -> Self {
        Self {
            w: f64::from(value.w),
            h: f64::from(value.h),
        }
    }
}
impl<T> From<(T, T)> for Shape<T> {
    fn from(value: (T, T)) -> Self {
        Self {
            w: value.0,
            h: value.1,
        }
    }
}

/// Distance of a point to a line segment, the projection onto the segment is
/// clamped to the segment's endpoints.
#[must_use]
pub fn dist_lineseg_point(ls: &(PtF, PtF), p: PtF) -> f64 {
    let (p1, p2) = *ls;
    let d = p2 - p1;
    let len_square = d.len_square();
    if len_square == 0.0 {
        return p.dist(&p1);
    }
    let t = ((p - p1).dot(&d) / len_square).clamp(0.0, 1.0);
    let proj = p1 + d * t;
    p.dist(&proj)
}

/// Circle figure with the radius in image coordinates.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Circle {
    pub center: PtF,
    pub radius: f64,
}
impl Circle {
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
    pub fn contains(&self, p: PtF) -> bool {
        self.center.dist(&p) <= self.radius
    }
}

/// Point figure, `size` is the diameter of the drawn marker.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PointMark {
    pub pos: PtF,
    pub size: f64,
}
impl PointMark {
    pub const DEFAULT_SIZE: f64 = 8.0;
    pub fn new(pos: PtF) -> Self {
        Self {
            pos,
            size: Self::DEFAULT_SIZE,
        }
    }
    pub fn area(&self) -> f64 {
        let r = self.size * 0.5;
        std::f64::consts::PI * r * r
    }
    pub fn contains(&self, p: PtF) -> bool {
        self.pos.dist(&p) <= self.size * 0.5
    }
}
impl Default for PointMark {
    fn default() -> Self {
        Self::new(PtF::default())
    }
}

#[test]
fn test_point_ops() {
    let p1 = PtF::new(3.0, 4.0);
    let p2 = PtF::new(0.0, 0.0);
    assert!(floats_close(p1.dist(&p2), 5.0));
    assert!((p1 + p2).is_close_to(p1));
    assert!((p1 * 2.0).is_close_to(PtF::new(6.0, 8.0)));
    assert!((p1 / 2.0).is_close_to(PtF::new(1.5, 2.0)));
    assert!((p1 - p1).is_close_to(PtF::default()));
    let rotated = PtF::new(1.0, 0.0).rotated(std::f64::consts::FRAC_PI_2);
    assert!(rotated.is_close_to(PtF::new(0.0, 1.0)));
}

#[test]
fn test_dist_lineseg() {
    let ls = (PtF::new(0.0, 0.0), PtF::new(10.0, 0.0));
    assert!(floats_close(dist_lineseg_point(&ls, PtF::new(5.0, 3.0)), 3.0));
    // beyond the end, clamped to the endpoint
    assert!(floats_close(dist_lineseg_point(&ls, PtF::new(14.0, 3.0)), 5.0));
    // degenerate segment
    let ls = (PtF::new(2.0, 2.0), PtF::new(2.0, 2.0));
    assert!(floats_close(dist_lineseg_point(&ls, PtF::new(2.0, 7.0)), 5.0));
}

#[test]
fn test_figures() {
    let c = Circle {
        center: PtF::new(5.0, 5.0),
        radius: 2.0,
    };
    assert!(c.contains(PtF::new(6.5, 5.0)));
    assert!(!c.contains(PtF::new(7.5, 5.0)));
    let pm = PointMark::new(PtF::new(1.0, 1.0));
    assert!(pm.contains(PtF::new(1.0, 4.9)));
    assert!(!pm.contains(PtF::new(1.0, 5.1)));
}
