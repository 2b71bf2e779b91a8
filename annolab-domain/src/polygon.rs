use serde::{Deserialize, Serialize};

use crate::{
    alerr,
    bb::BbF,
    core::PtF,
    result::AlResult,
};

/// Even-odd ray cast over an ordered vertex ring.
pub(crate) fn even_odd_contains(points: &[PtF], p: PtF) -> bool {
    let n = points.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = points[i];
        let pj = points[j];
        if ((pi.y > p.y) != (pj.y > p.y))
            && (p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Polygon with insertion-ordered vertices. While the polygon is drawn, the
/// preview point carries the pointer position for the dangling edge.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Polygon {
    points: Vec<PtF>, // should NEVER be empty, hence private!
    preview: Option<PtF>,
}

impl Polygon {
    pub fn from_vec(points: Vec<PtF>) -> AlResult<Self> {
        if points.is_empty() {
            Err(alerr!("cannot create an empty polygon"))
        } else {
            Ok(Self {
                points,
                preview: None,
            })
        }
    }

    pub fn points(&self) -> &[PtF] {
        &self.points
    }
    #[allow(clippy::needless_lifetimes)]
    pub fn points_iter<'a>(&'a self) -> impl Iterator<Item = PtF> + 'a + Clone {
        self.points.iter().copied()
    }

    pub fn push(&mut self, p: PtF) {
        self.points.push(p);
    }
    pub fn insert(&mut self, idx: usize, p: PtF) {
        if idx <= self.points.len() {
            self.points.insert(idx, p);
        }
    }
    pub fn remove(&mut self, idx: usize) {
        if idx < self.points.len() && self.points.len() > 1 {
            self.points.remove(idx);
        }
    }
    pub fn replace_points(&mut self, points: Vec<PtF>) {
        if !points.is_empty() {
            self.points = points;
        }
    }

    pub fn preview(&self) -> Option<PtF> {
        self.preview
    }
    pub fn set_preview(&mut self, p: Option<PtF>) {
        self.preview = p;
    }

    /// Closed means the ring can be interpreted as an area.
    pub fn is_closed(&self) -> bool {
        self.points.len() >= 3
    }

    /// Shoelace formula, 0 for open polygons.
    pub fn area(&self) -> f64 {
        if !self.is_closed() {
            return 0.0;
        }
        let n = self.points.len();
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area.abs() * 0.5
    }

    /// Vertex mean, not the area centroid.
    pub fn center(&self) -> PtF {
        let n = self.points.len() as f64;
        self.points_iter().fold(PtF::default(), |acc, p| acc + p) / n
    }

    pub fn contains(&self, p: PtF) -> bool {
        if !self.is_closed() {
            return false;
        }
        even_odd_contains(&self.points, p)
    }

    pub fn enclosing_bb(&self) -> BbF {
        // points is never empty, from_points_iter cannot fail
        BbF::from_points_iter(self.points_iter()).unwrap_or_default()
    }
}

#[cfg(test)]
use crate::core::floats_close;

#[cfg(test)]
fn square() -> Polygon {
    Polygon::from_vec(vec![
        PtF::new(0.0, 0.0),
        PtF::new(10.0, 0.0),
        PtF::new(10.0, 10.0),
        PtF::new(0.0, 10.0),
    ])
    .unwrap()
}

#[test]
fn test_shoelace() {
    assert!(floats_close(square().area(), 100.0));
    let open = Polygon::from_vec(vec![PtF::new(0.0, 0.0), PtF::new(10.0, 0.0)]).unwrap();
    assert!(floats_close(open.area(), 0.0));
}

#[test]
fn test_contains() {
    let poly = square();
    assert!(poly.contains(PtF::new(5.0, 5.0)));
    assert!(!poly.contains(PtF::new(15.0, 5.0)));
    assert!(!poly.contains(PtF::new(-1.0, 5.0)));
    let open = Polygon::from_vec(vec![PtF::new(0.0, 0.0), PtF::new(10.0, 0.0)]).unwrap();
    assert!(!open.contains(PtF::new(5.0, 0.0)));
}

#[test]
fn test_center_and_bb() {
    let poly = square();
    assert!(poly.center().is_close_to(PtF::new(5.0, 5.0)));
    assert_eq!(poly.enclosing_bb(), BbF::from_arr(&[0.0, 0.0, 10.0, 10.0]));
}

#[test]
fn test_vertex_edits() {
    let mut poly = square();
    poly.insert(1, PtF::new(5.0, -2.0));
    assert_eq!(poly.points().len(), 5);
    poly.remove(1);
    assert_eq!(poly.points().len(), 4);
    poly.remove(17); // out of range is ignored
    assert_eq!(poly.points().len(), 4);
    assert!(Polygon::from_vec(vec![]).is_err());
}
