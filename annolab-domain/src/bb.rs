use serde::{Deserialize, Serialize};

use crate::{
    alerr,
    core::{max_from_partial, min_from_partial, PtF, ShapeF},
    result::AlResult,
};

/// Axis-aligned box in image coordinates.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct BbF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BbF {
    /// `[x, y, w, h]`
    pub fn from_arr(a: &[f64; 4]) -> Self {
        BbF {
            x: a[0],
            y: a[1],
            w: a[2],
            h: a[3],
        }
    }

    pub fn from_points(p1: PtF, p2: PtF) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        Self {
            x,
            y,
            w: p1.x.max(p2.x) - x,
            h: p1.y.max(p2.y) - y,
        }
    }

    pub fn from_points_iter(points: impl Iterator<Item = PtF> + Clone) -> AlResult<Self> {
        let x_iter = points.clone().map(|p| p.x);
        let y_iter = points.map(|p| p.y);
        let min_x = x_iter
            .clone()
            .min_by(min_from_partial)
            .ok_or_else(|| alerr!("empty iterator"))?;
        let min_y = y_iter
            .clone()
            .min_by(min_from_partial)
            .ok_or_else(|| alerr!("empty iterator"))?;
        let max_x = x_iter.max_by(max_from_partial).unwrap_or(min_x);
        let max_y = y_iter.max_by(max_from_partial).unwrap_or(min_y);
        Ok(BbF::from_points(
            PtF { x: min_x, y: min_y },
            PtF { x: max_x, y: max_y },
        ))
    }

    pub fn x_max(&self) -> f64 {
        self.x + self.w
    }
    pub fn y_max(&self) -> f64 {
        self.y + self.h
    }

    pub fn min(&self) -> PtF {
        PtF {
            x: self.x,
            y: self.y,
        }
    }
    pub fn max(&self) -> PtF {
        PtF {
            x: self.x_max(),
            y: self.y_max(),
        }
    }

    pub fn center(&self) -> PtF {
        PtF {
            x: self.x + self.w * 0.5,
            y: self.y + self.h * 0.5,
        }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn shape(&self) -> ShapeF {
        ShapeF {
            w: self.w,
            h: self.h,
        }
    }

    /// Corner iteration order
    /// 0 > 1
    ///     v
    /// 3 < 2
    pub fn corner(&self, idx: usize) -> PtF {
        let (x, y, w, h) = (self.x, self.y, self.w, self.h);
        match idx {
            0 => PtF { x, y },
            1 => PtF { x: x + w, y },
            2 => PtF { x: x + w, y: y + h },
            3 => PtF { x, y: y + h },
            _ => panic!("boxes only have 4 corners, {idx} is out of bounds"),
        }
    }
    #[allow(clippy::needless_lifetimes)]
    pub fn points_iter<'a>(&'a self) -> impl Iterator<Item = PtF> + 'a + Clone {
        (0..4).map(|idx| self.corner(idx))
    }
    pub fn points(&self) -> [PtF; 4] {
        [self.corner(0), self.corner(1), self.corner(2), self.corner(3)]
    }

    /// Inclusive on all boundaries.
    pub fn contains(&self, p: PtF) -> bool {
        p.x >= self.x && p.x <= self.x_max() && p.y >= self.y && p.y <= self.y_max()
    }

    /// Grows the box by `frac` of its extent on every side.
    #[must_use]
    pub fn padded(&self, frac: f64) -> Self {
        Self {
            x: self.x - self.w * frac,
            y: self.y - self.h * frac,
            w: self.w * (1.0 + 2.0 * frac),
            h: self.h * (1.0 + 2.0 * frac),
        }
    }
}

#[cfg(test)]
use crate::core::floats_close;

#[test]
fn test_bb() {
    let bb = BbF::from_points(PtF::new(50.0, 40.0), PtF::new(10.0, 10.0));
    assert_eq!(bb, BbF::from_arr(&[10.0, 10.0, 40.0, 30.0]));
    assert!(bb.contains(PtF::new(30.0, 30.0)));
    assert!(bb.contains(PtF::new(10.0, 10.0)));
    assert!(bb.contains(PtF::new(50.0, 40.0)));
    assert!(!bb.contains(PtF::new(5.0, 5.0)));
    assert!(bb.center().is_close_to(PtF::new(30.0, 25.0)));
    assert!(floats_close(bb.area(), 1200.0));
    assert!(bb.corner(0).is_close_to(PtF::new(10.0, 10.0)));
    assert!(bb.corner(1).is_close_to(PtF::new(50.0, 10.0)));
    assert!(bb.corner(2).is_close_to(PtF::new(50.0, 40.0)));
    assert!(bb.corner(3).is_close_to(PtF::new(10.0, 40.0)));
}

#[test]
fn test_from_points_iter() {
    let points = [
        PtF::new(3.0, 7.0),
        PtF::new(1.0, 9.0),
        PtF::new(5.0, 8.0),
    ];
    let bb = BbF::from_points_iter(points.iter().copied()).unwrap();
    assert_eq!(bb, BbF::from_arr(&[1.0, 7.0, 4.0, 2.0]));
    assert!(BbF::from_points_iter(std::iter::empty()).is_err());
}

#[test]
fn test_padded() {
    let bb = BbF::from_arr(&[10.0, 10.0, 10.0, 20.0]).padded(0.1);
    assert!(floats_close(bb.x, 9.0));
    assert!(floats_close(bb.y, 8.0));
    assert!(floats_close(bb.w, 12.0));
    assert!(floats_close(bb.h, 24.0));
}
