mod bb;
mod core;
mod keypoint;
mod line;
mod obb;
mod polygon;
pub mod result;
pub use crate::core::{
    dist_lineseg_point, floats_close, max_from_partial, min_from_partial, Circle, PointMark, PtF,
    Shape, ShapeF, ShapeI,
};
pub use bb::BbF;
pub use keypoint::{
    Keypoint, KeypointSet, KeypointVisibility, COCO_KEYPOINT_NAMES, COCO_SKELETON,
    KEYPOINT_HIT_TOLERANCE,
};
pub use line::{LineSeg, LINE_HIT_TOLERANCE};
pub use obb::{wrap_angle_deg, Obb};
pub use polygon::Polygon;
pub use result::{to_al, AlError, AlResult};
use serde::{Deserialize, Serialize};

/// The geometric payload of an annotation. Shared identity and metadata live
/// one level up, each variant owns its own geometry.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    Rect(BbF),
    Circle(Circle),
    Line(LineSeg),
    Point(PointMark),
    Polygon(Polygon),
    Obb(Obb),
    Keypoints(KeypointSet),
}

impl Figure {
    pub fn kind(&self) -> &'static str {
        match self {
            Figure::Rect(_) => "rect",
            Figure::Circle(_) => "circle",
            Figure::Line(_) => "line",
            Figure::Point(_) => "point",
            Figure::Polygon(_) => "polygon",
            Figure::Obb(_) => "obb",
            Figure::Keypoints(_) => "keypoints",
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            Figure::Rect(bb) => bb.area(),
            Figure::Circle(c) => c.area(),
            Figure::Line(_) => 0.0,
            Figure::Point(p) => p.area(),
            Figure::Polygon(poly) => poly.area(),
            Figure::Obb(obb) => obb.area(),
            Figure::Keypoints(set) => set.area(),
        }
    }

    pub fn center(&self) -> PtF {
        match self {
            Figure::Rect(bb) => bb.center(),
            Figure::Circle(c) => c.center,
            Figure::Line(line) => line.center(),
            Figure::Point(p) => p.pos,
            Figure::Polygon(poly) => poly.center(),
            Figure::Obb(obb) => obb.center(),
            Figure::Keypoints(set) => set.center(),
        }
    }

    /// The ordered defining points of the figure.
    pub fn points(&self) -> Vec<PtF> {
        match self {
            Figure::Rect(bb) => bb.points().to_vec(),
            Figure::Circle(c) => vec![c.center],
            Figure::Line(line) => vec![line.start, line.end],
            Figure::Point(p) => vec![p.pos],
            Figure::Polygon(poly) => poly.points().to_vec(),
            Figure::Obb(obb) => obb.corners().to_vec(),
            Figure::Keypoints(set) => set.points(),
        }
    }

    /// Bulk point replacement. Inputs with fewer points than the variant
    /// requires are ignored, nothing is partially mutated.
    pub fn set_points(&mut self, points: &[PtF]) {
        match self {
            Figure::Rect(bb) => {
                if points.len() >= 2 {
                    if let Ok(new_bb) = BbF::from_points_iter(points.iter().copied()) {
                        *bb = new_bb;
                    }
                }
            }
            Figure::Circle(c) => {
                if let Some(p) = points.first() {
                    c.center = *p;
                }
            }
            Figure::Line(line) => {
                if points.len() >= 2 {
                    line.start = points[0];
                    line.end = points[1];
                }
            }
            Figure::Point(pm) => {
                if let Some(p) = points.first() {
                    pm.pos = *p;
                }
            }
            Figure::Polygon(poly) => poly.replace_points(points.to_vec()),
            Figure::Obb(obb) => obb.set_corners(points),
            Figure::Keypoints(set) => set.set_points(points),
        }
    }

    pub fn contains(&self, p: PtF) -> bool {
        match self {
            Figure::Rect(bb) => bb.contains(p),
            Figure::Circle(c) => c.contains(p),
            Figure::Line(line) => line.contains(p),
            Figure::Point(pm) => pm.contains(p),
            Figure::Polygon(poly) => poly.contains(p),
            Figure::Obb(obb) => obb.contains(p),
            Figure::Keypoints(set) => set.contains(p),
        }
    }

    /// Structurally valid enough to enter a collection. The interactive
    /// minimum sizes of the drawing tools are stricter.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Figure::Rect(bb) => bb.w > 0.0 && bb.h > 0.0,
            Figure::Circle(c) => c.radius > 0.0,
            Figure::Line(line) => line.length() > 0.0,
            Figure::Point(pm) => pm.size > 0.0,
            Figure::Polygon(poly) => poly.is_closed(),
            Figure::Obb(obb) => obb.w() > 0.0 && obb.h() > 0.0,
            Figure::Keypoints(set) => set.n_annotated() > 0,
        }
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::Rect(BbF::default())
    }
}

#[test]
fn test_dispatch() {
    let rect = Figure::Rect(BbF::from_arr(&[10.0, 10.0, 40.0, 30.0]));
    assert!(floats_close(rect.area(), 1200.0));
    assert!(rect.contains(PtF::new(30.0, 30.0)));
    assert!(!rect.contains(PtF::new(5.0, 5.0)));
    assert!(rect.center().is_close_to(PtF::new(30.0, 25.0)));

    let line = Figure::Line(LineSeg::new(PtF::new(0.0, 0.0), PtF::new(10.0, 0.0)));
    assert!(floats_close(line.area(), 0.0));

    // center containment for shapes with positive extent
    for fig in [
        rect,
        Figure::Circle(Circle {
            center: PtF::new(5.0, 5.0),
            radius: 3.0,
        }),
        Figure::Obb(Obb::new(PtF::new(8.0, 8.0), 6.0, 4.0, 33.0)),
        Figure::Polygon(
            Polygon::from_vec(vec![
                PtF::new(0.0, 0.0),
                PtF::new(10.0, 0.0),
                PtF::new(10.0, 10.0),
                PtF::new(0.0, 10.0),
            ])
            .unwrap(),
        ),
    ] {
        assert!(fig.contains(fig.center()), "{} fails", fig.kind());
    }
}

#[test]
fn test_set_points_rejects_short_input() {
    let mut rect = Figure::Rect(BbF::from_arr(&[0.0, 0.0, 10.0, 10.0]));
    let before = rect.clone();
    rect.set_points(&[PtF::new(5.0, 5.0)]);
    assert_eq!(rect, before);
    rect.set_points(&[PtF::new(5.0, 5.0), PtF::new(9.0, 11.0)]);
    assert_eq!(rect, Figure::Rect(BbF::from_arr(&[5.0, 5.0, 4.0, 6.0])));
}

#[test]
fn test_tagged_serialization() {
    let figs = vec![
        Figure::Rect(BbF::from_arr(&[1.0, 2.0, 3.0, 4.0])),
        Figure::Circle(Circle {
            center: PtF::new(1.0, 2.0),
            radius: 3.0,
        }),
        Figure::Line(LineSeg::new(PtF::new(0.0, 0.0), PtF::new(1.0, 1.0))),
        Figure::Point(PointMark::new(PtF::new(4.0, 4.0))),
        Figure::Polygon(
            Polygon::from_vec(vec![
                PtF::new(0.0, 0.0),
                PtF::new(1.0, 0.0),
                PtF::new(1.0, 1.0),
            ])
            .unwrap(),
        ),
        Figure::Obb(Obb::new(PtF::new(5.0, 5.0), 4.0, 2.0, 30.0)),
        Figure::Keypoints(KeypointSet::seed_pose(PtF::new(100.0, 100.0))),
    ];
    for fig in figs {
        let s = serde_json::to_string(&fig).unwrap();
        assert!(s.contains(&format!("\"kind\":\"{}\"", fig.kind())));
        let read: Figure = serde_json::from_str(&s).unwrap();
        assert_eq!(read, fig);
    }
}
