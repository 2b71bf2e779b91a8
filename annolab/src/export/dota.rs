use std::collections::HashMap;

use annolab_domain::{Figure, PtF};

use crate::annotations::Annotation;

/// One line of the DOTA label format, the four corners in image-pixel units
/// followed by the category and a difficulty. Labels missing from the map
/// become the literal "unknown" category.
pub fn dota_line(
    anno: &Annotation,
    label_map: &HashMap<String, usize>,
    difficulty: u32,
) -> Option<String> {
    let corners: [PtF; 4] = match anno.figure() {
        Figure::Obb(obb) => obb.corners(),
        Figure::Rect(bb) => bb.points(),
        _ => return None,
    };
    let category = if label_map.contains_key(&anno.label) {
        anno.label.as_str()
    } else {
        "unknown"
    };
    let coords = corners
        .iter()
        .map(|p| format!("{:.1} {:.1}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    Some(format!("{coords} {category} {difficulty}"))
}

#[cfg(test)]
use annolab_domain::{BbF, Obb};

#[cfg(test)]
fn label_map() -> HashMap<String, usize> {
    [("plane".to_string(), 0)].into_iter().collect()
}

#[test]
fn test_rect_corner_ring() {
    let anno = Annotation::new(
        Figure::Rect(BbF::from_arr(&[10.0, 10.0, 40.0, 30.0])),
        "plane",
        "#FF0000",
    );
    let line = dota_line(&anno, &label_map(), 0).unwrap();
    assert_eq!(
        line,
        "10.0 10.0 50.0 10.0 50.0 40.0 10.0 40.0 plane 0"
    );
}

#[test]
fn test_obb_corners_and_unknown_label() {
    let anno = Annotation::new(
        Figure::Obb(Obb::new(PtF::new(100.0, 100.0), 40.0, 20.0, 90.0)),
        "whatisthis",
        "#FF0000",
    );
    let line = dota_line(&anno, &label_map(), 1).unwrap();
    assert_eq!(
        line,
        "110.0 80.0 110.0 120.0 90.0 120.0 90.0 80.0 unknown 1"
    );
}

#[test]
fn test_other_variants_yield_none() {
    let anno = Annotation::new(
        Figure::Circle(annolab_domain::Circle {
            center: PtF::new(1.0, 1.0),
            radius: 5.0,
        }),
        "plane",
        "#FF0000",
    );
    assert_eq!(dota_line(&anno, &label_map(), 0), None);
}
