use std::collections::HashMap;
use std::fmt::Write;

use annolab_domain::{BbF, Figure, KeypointSet, ShapeI, COCO_KEYPOINT_NAMES};

use super::{clamp_unit, class_id};
use crate::annotations::Annotation;

const BBOX_PADDING_FRAC: f64 = 0.1;

/// The fixed 17-slot COCO triplet array `(x, y, visibility)` keyed by the
/// canonical keypoint names, in image-pixel units. Slots without an annotated
/// keypoint of that name are `(0, 0, 0)`.
pub fn coco_keypoint_triplets(set: &KeypointSet) -> [[f64; 3]; 17] {
    let mut triplets = [[0.0; 3]; 17];
    for (slot, name) in triplets.iter_mut().zip(COCO_KEYPOINT_NAMES.iter()) {
        if let Some(kp) = set.annotated().find(|k| k.name == *name) {
            *slot = [kp.pos.x, kp.pos.y, f64::from(kp.visibility.coco_flag())];
        }
    }
    triplets
}

/// The pose bounding box in image pixels, an explicit user-drawn box wins,
/// otherwise the annotated keypoints' extent padded by 10%.
fn pose_bb(set: &KeypointSet) -> Option<BbF> {
    set.bounding_box
        .or_else(|| set.enclosing_bb().map(|bb| bb.padded(BBOX_PADDING_FRAC)))
}

/// One line of the YOLO pose format,
/// `class_id cx cy w h x1 y1 v1 ... x17 y17 v17`, everything but class and
/// visibility normalized by the image dimensions and clamped to `[0, 1]`.
pub fn yolo_pose_line(
    anno: &Annotation,
    image: ShapeI,
    label_map: &HashMap<String, usize>,
) -> Option<String> {
    let set = match anno.figure() {
        Figure::Keypoints(set) => set,
        _ => return None,
    };
    let bb = pose_bb(set)?;
    let class = class_id(&anno.label, label_map);
    let (imw, imh) = (f64::from(image.w), f64::from(image.h));
    let center = bb.center();
    let mut line = format!(
        "{class} {:.6} {:.6} {:.6} {:.6}",
        clamp_unit(center.x / imw),
        clamp_unit(center.y / imh),
        clamp_unit(bb.w / imw),
        clamp_unit(bb.h / imh),
    );
    for [x, y, vis] in coco_keypoint_triplets(set) {
        let (x, y) = if vis > 0.0 {
            (clamp_unit(x / imw), clamp_unit(y / imh))
        } else {
            (0.0, 0.0)
        };
        // writes to a string cannot fail
        let _ = write!(line, " {x:.6} {y:.6} {}", vis as u8);
    }
    Some(line)
}

#[cfg(test)]
use annolab_domain::{KeypointVisibility, PtF};

#[cfg(test)]
fn left_eye_only() -> KeypointSet {
    let mut set = KeypointSet::new_coco();
    // place_next starts at the nose, cycle it away to leave only the left eye
    set.place_next(PtF::new(40.0, 40.0));
    set.place_next(PtF::new(50.0, 60.0));
    set.cycle_visibility(0);
    set.cycle_visibility(0);
    set
}

#[test]
fn test_triplets_left_eye_only() {
    let set = left_eye_only();
    let triplets = coco_keypoint_triplets(&set);
    for (idx, triplet) in triplets.iter().enumerate() {
        if idx == 1 {
            assert_eq!(*triplet, [50.0, 60.0, 2.0]);
        } else {
            assert_eq!(*triplet, [0.0, 0.0, 0.0]);
        }
    }
}

#[test]
fn test_occluded_flag() {
    let mut set = KeypointSet::new_coco();
    set.place_next(PtF::new(10.0, 10.0));
    set.cycle_visibility(0); // Visible -> Occluded
    let triplets = coco_keypoint_triplets(&set);
    assert_eq!(triplets[0], [10.0, 10.0, 1.0]);
}

#[test]
fn test_pose_line_uses_explicit_box() {
    let mut set = KeypointSet::new_coco();
    set.place_next(PtF::new(50.0, 50.0));
    set.place_next(PtF::new(60.0, 60.0));
    set.bounding_box = Some(BbF::from_arr(&[0.0, 0.0, 100.0, 100.0]));
    let anno = Annotation::new(Figure::Keypoints(set), "person", "#FF0000");
    let map = [("person".to_string(), 3)].into_iter().collect();
    let line = yolo_pose_line(&anno, ShapeI::new(100, 100), &map).unwrap();
    assert!(line.starts_with("3 0.500000 0.500000 1.000000 1.000000"));
    // 5 box fields + 17 triplets
    assert_eq!(line.split_whitespace().count(), 5 + 17 * 3);
}

#[test]
fn test_pose_line_derives_padded_box() {
    let mut set = KeypointSet::new_coco();
    set.place_next(PtF::new(20.0, 20.0));
    set.place_next(PtF::new(40.0, 40.0));
    let anno = Annotation::new(Figure::Keypoints(set), "person", "#FF0000");
    let map = HashMap::new();
    let line = yolo_pose_line(&anno, ShapeI::new(100, 100), &map).unwrap();
    // extent 20 padded by 10% on each side -> 24, centered at 30
    let fields: Vec<&str> = line.split_whitespace().collect();
    assert_eq!(fields[0], "0");
    assert_eq!(fields[1], "0.300000");
    assert_eq!(fields[2], "0.300000");
    assert_eq!(fields[3], "0.240000");
    assert_eq!(fields[4], "0.240000");
}

#[test]
fn test_pose_line_clamps_outliers() {
    let mut set = KeypointSet::new_coco();
    set.place_next(PtF::new(-20.0, 50.0));
    set.place_next(PtF::new(120.0, 50.0));
    let anno = Annotation::new(Figure::Keypoints(set), "person", "#FF0000");
    let line = yolo_pose_line(&anno, ShapeI::new(100, 100), &HashMap::new()).unwrap();
    let fields: Vec<&str> = line.split_whitespace().collect();
    // nose is left of the image, clamped to 0
    assert_eq!(fields[5], "0.000000");
    // left eye is right of the image, clamped to 1
    assert_eq!(fields[8], "1.000000");
    for f in fields {
        let v: f64 = f.parse().unwrap();
        assert!((0.0..=2.0).contains(&v));
    }
}

#[test]
fn test_no_keypoints_no_line() {
    let set = KeypointSet::new_coco();
    let anno = Annotation::new(Figure::Keypoints(set), "person", "#FF0000");
    assert_eq!(
        yolo_pose_line(&anno, ShapeI::new(100, 100), &HashMap::new()),
        None
    );
    let rect = Annotation::new(
        Figure::Rect(annolab_domain::BbF::from_arr(&[0.0, 0.0, 1.0, 1.0])),
        "person",
        "#FF0000",
    );
    assert_eq!(
        yolo_pose_line(&rect, ShapeI::new(100, 100), &HashMap::new()),
        None
    );
}

#[test]
fn test_visibility_states_round_trip() {
    assert_eq!(KeypointVisibility::NotAnnotated.coco_flag(), 0);
    assert_eq!(KeypointVisibility::Occluded.coco_flag(), 1);
    assert_eq!(KeypointVisibility::Visible.coco_flag(), 2);
}
