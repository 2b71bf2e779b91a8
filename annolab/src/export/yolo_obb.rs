use std::collections::HashMap;

use annolab_domain::{Figure, ShapeI};

use super::class_id;
use crate::annotations::Annotation;

/// One line of the YOLO-OBB label format,
/// `class_id cx cy w h angle`, center and extent normalized by the image
/// dimensions, the angle by 180 degrees. Plain rectangles export with angle 0.
/// Annotations of other variants have no OBB rendition and yield `None`.
pub fn yolo_obb_line(
    anno: &Annotation,
    image: ShapeI,
    label_map: &HashMap<String, usize>,
) -> Option<String> {
    let (center, w, h, angle_deg) = match anno.figure() {
        Figure::Obb(obb) => (obb.center(), obb.w(), obb.h(), obb.angle_deg()),
        Figure::Rect(bb) => (bb.center(), bb.w, bb.h, 0.0),
        _ => return None,
    };
    let class = class_id(&anno.label, label_map);
    let (imw, imh) = (f64::from(image.w), f64::from(image.h));
    Some(format!(
        "{class} {:.6} {:.6} {:.6} {:.6} {:.6}",
        center.x / imw,
        center.y / imh,
        w / imw,
        h / imh,
        angle_deg / 180.0,
    ))
}

#[cfg(test)]
use annolab_domain::{BbF, Obb, PtF};

#[cfg(test)]
fn label_map() -> HashMap<String, usize> {
    [("person".to_string(), 0), ("car".to_string(), 1)]
        .into_iter()
        .collect()
}

#[test]
fn test_obb_line() {
    let anno = Annotation::new(
        Figure::Obb(Obb::new(PtF::new(100.0, 100.0), 40.0, 20.0, 90.0)),
        "car",
        "#FF0000",
    );
    let line = yolo_obb_line(&anno, ShapeI::new(200, 200), &label_map()).unwrap();
    assert_eq!(line, "1 0.500000 0.500000 0.200000 0.100000 0.500000");
}

#[test]
fn test_rect_exports_with_zero_angle() {
    let anno = Annotation::new(
        Figure::Rect(BbF::from_arr(&[10.0, 10.0, 40.0, 30.0])),
        "person",
        "#FF0000",
    );
    let line = yolo_obb_line(&anno, ShapeI::new(100, 100), &label_map()).unwrap();
    assert_eq!(line, "0 0.300000 0.250000 0.400000 0.300000 0.000000");
}

#[test]
fn test_unknown_label_is_class_zero() {
    let anno = Annotation::new(
        Figure::Obb(Obb::new(PtF::new(50.0, 50.0), 10.0, 10.0, 0.0)),
        "alien",
        "#FF0000",
    );
    let line = yolo_obb_line(&anno, ShapeI::new(100, 100), &label_map()).unwrap();
    assert!(line.starts_with("0 "));
}

#[test]
fn test_other_variants_yield_none() {
    let anno = Annotation::new(
        Figure::Point(annolab_domain::PointMark::new(PtF::new(1.0, 1.0))),
        "person",
        "#FF0000",
    );
    assert_eq!(yolo_obb_line(&anno, ShapeI::new(100, 100), &label_map()), None);
}
