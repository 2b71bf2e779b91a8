use annolab_domain::{
    BbF, Circle, Figure, KeypointSet, LineSeg, Obb, PointMark, Polygon, PtF,
};

use crate::annotations::Annotation;
use crate::result::trace_ok_err;

use super::ToolKind;

/// Minimum extents below which a committed draft is dropped.
pub const MIN_SIDE: f64 = 5.0;
pub const MIN_CIRCLE_RADIUS: f64 = 5.0;
pub const MIN_LINE_LENGTH: f64 = 5.0;

/// A polygon closes when a click lands this close to its first vertex, in
/// screen pixels.
pub const POLYGON_CLOSE_DIST: f64 = 15.0;

/// The initial draft of a drawing tool at the first pointer position.
pub fn start_draft(kind: ToolKind, pos: PtF, label: &str, color: &str) -> Option<Annotation> {
    let figure = match kind {
        ToolKind::Select => return None,
        ToolKind::Rect => Figure::Rect(BbF::from_points(pos, pos)),
        ToolKind::Circle => Figure::Circle(Circle {
            center: pos,
            radius: 0.0,
        }),
        ToolKind::Line => Figure::Line(LineSeg::new(pos, pos)),
        ToolKind::Point => Figure::Point(PointMark::new(pos)),
        ToolKind::Polygon => {
            Figure::Polygon(trace_ok_err(Polygon::from_vec(vec![pos]))?)
        }
        ToolKind::Obb => Figure::Obb(Obb::from_drag_points(pos, pos)),
        ToolKind::Keypoints => {
            let mut set = KeypointSet::new_coco();
            set.place_next(pos);
            Figure::Keypoints(set)
        }
    };
    Some(Annotation::new(figure, label, color))
}

/// Updates a drag-drawn figure between its anchor and the current pointer
/// position. Polygons and keypoints accumulate per click instead.
pub fn update_drag(figure: &mut Figure, anchor: PtF, pos: PtF) {
    match figure {
        Figure::Rect(bb) => *bb = BbF::from_points(anchor, pos),
        Figure::Circle(c) => c.radius = anchor.dist(&pos),
        Figure::Line(line) => {
            line.start = anchor;
            line.end = pos;
        }
        Figure::Obb(obb) => *obb = Obb::from_drag_points(anchor, pos),
        Figure::Point(_) | Figure::Polygon(_) | Figure::Keypoints(_) => {}
    }
}

/// Whether a draft is large enough to enter the collection.
pub fn commit_valid(figure: &Figure) -> bool {
    match figure {
        Figure::Rect(bb) => bb.w > MIN_SIDE && bb.h > MIN_SIDE,
        Figure::Circle(c) => c.radius > MIN_CIRCLE_RADIUS,
        Figure::Line(line) => line.length() > MIN_LINE_LENGTH,
        Figure::Point(pm) => pm.size > 0.0,
        Figure::Polygon(poly) => poly.is_closed(),
        Figure::Obb(obb) => obb.w() >= MIN_SIDE && obb.h() >= MIN_SIDE,
        Figure::Keypoints(set) => set.n_annotated() > 0,
    }
}

#[test]
fn test_drag_rect() {
    let mut anno = start_draft(ToolKind::Rect, PtF::new(10.0, 10.0), "x", "#FF0000").unwrap();
    assert!(!commit_valid(anno.figure()));
    anno.edit_figure(|fig| update_drag(fig, PtF::new(10.0, 10.0), PtF::new(50.0, 40.0)));
    assert!(commit_valid(anno.figure()));
    assert_eq!(
        *anno.figure(),
        Figure::Rect(BbF::from_arr(&[10.0, 10.0, 40.0, 30.0]))
    );
}

#[test]
fn test_drag_circle_and_line() {
    let mut circle = start_draft(ToolKind::Circle, PtF::new(0.0, 0.0), "x", "#FF0000").unwrap();
    circle.edit_figure(|fig| update_drag(fig, PtF::new(0.0, 0.0), PtF::new(3.0, 4.0)));
    assert!(!commit_valid(circle.figure()));
    circle.edit_figure(|fig| update_drag(fig, PtF::new(0.0, 0.0), PtF::new(6.0, 8.0)));
    assert!(commit_valid(circle.figure()));

    let mut line = start_draft(ToolKind::Line, PtF::new(0.0, 0.0), "x", "#FF0000").unwrap();
    line.edit_figure(|fig| update_drag(fig, PtF::new(0.0, 0.0), PtF::new(4.0, 0.0)));
    assert!(!commit_valid(line.figure()));
    line.edit_figure(|fig| update_drag(fig, PtF::new(0.0, 0.0), PtF::new(6.0, 0.0)));
    assert!(commit_valid(line.figure()));
}

#[test]
fn test_select_has_no_draft() {
    assert!(start_draft(ToolKind::Select, PtF::default(), "x", "#FF0000").is_none());
}

#[test]
fn test_keypoint_draft_starts_at_nose() {
    let anno = start_draft(ToolKind::Keypoints, PtF::new(7.0, 7.0), "x", "#FF0000").unwrap();
    match anno.figure() {
        Figure::Keypoints(set) => {
            assert_eq!(set.n_annotated(), 1);
            assert_eq!(set.keypoints()[0].name, "nose");
            assert!(set.keypoints()[0].pos.is_close_to(PtF::new(7.0, 7.0)));
        }
        _ => panic!("expected keypoints"),
    }
}
