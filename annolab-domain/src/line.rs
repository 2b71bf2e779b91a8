use serde::{Deserialize, Serialize};

use crate::core::{dist_lineseg_point, PtF};

/// Distance below which a point counts as lying on a line, in image coordinates.
pub const LINE_HIT_TOLERANCE: f64 = 5.0;

/// Zero-area line segment figure.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct LineSeg {
    pub start: PtF,
    pub end: PtF,
}

impl LineSeg {
    pub fn new(start: PtF, end: PtF) -> Self {
        Self { start, end }
    }
    pub fn length(&self) -> f64 {
        self.start.dist(&self.end)
    }
    pub fn center(&self) -> PtF {
        (self.start + self.end) * 0.5
    }
    pub fn dist_to_point(&self, p: PtF) -> f64 {
        dist_lineseg_point(&(self.start, self.end), p)
    }
    pub fn contains(&self, p: PtF) -> bool {
        self.dist_to_point(p) <= LINE_HIT_TOLERANCE
    }
}

#[cfg(test)]
use crate::core::floats_close;

#[test]
fn test_line() {
    let line = LineSeg::new(PtF::new(0.0, 0.0), PtF::new(10.0, 0.0));
    assert!(floats_close(line.length(), 10.0));
    assert!(line.center().is_close_to(PtF::new(5.0, 0.0)));
    assert!(line.contains(PtF::new(5.0, 4.9)));
    assert!(!line.contains(PtF::new(5.0, 5.1)));
    assert!(line.contains(PtF::new(-3.0, 0.0)));
    assert!(!line.contains(PtF::new(-5.1, 0.0)));
}
