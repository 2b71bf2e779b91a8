use serde::{Deserialize, Serialize};

use crate::{bb::BbF, core::PtF};

/// Canonical COCO human-pose keypoint names, index order is the schema.
pub const COCO_KEYPOINT_NAMES: [&str; 17] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

/// Skeleton edges as index pairs into [`COCO_KEYPOINT_NAMES`](COCO_KEYPOINT_NAMES).
pub const COCO_SKELETON: [(usize, usize); 19] = [
    (15, 13),
    (13, 11),
    (16, 14),
    (14, 12),
    (11, 12),
    (5, 11),
    (6, 12),
    (5, 6),
    (5, 7),
    (6, 8),
    (7, 9),
    (8, 10),
    (1, 2),
    (0, 1),
    (0, 2),
    (1, 3),
    (2, 4),
    (3, 5),
    (4, 6),
];

/// Distance below which a pointer position counts as hitting a keypoint,
/// in image coordinates.
pub const KEYPOINT_HIT_TOLERANCE: f64 = 15.0;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeypointVisibility {
    #[default]
    NotAnnotated,
    Occluded,
    Visible,
}

impl KeypointVisibility {
    /// COCO visibility flag, 0 = not annotated, 1 = occluded, 2 = visible.
    pub fn coco_flag(&self) -> u8 {
        match self {
            KeypointVisibility::NotAnnotated => 0,
            KeypointVisibility::Occluded => 1,
            KeypointVisibility::Visible => 2,
        }
    }
    /// Visible -> Occluded -> NotAnnotated -> Visible
    #[must_use]
    pub fn cycled(&self) -> Self {
        match self {
            KeypointVisibility::Visible => KeypointVisibility::Occluded,
            KeypointVisibility::Occluded => KeypointVisibility::NotAnnotated,
            KeypointVisibility::NotAnnotated => KeypointVisibility::Visible,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Keypoint {
    pub id: usize,
    pub name: String,
    pub pos: PtF,
    pub visibility: KeypointVisibility,
}

/// Named, ordered keypoints of one skeleton instance. Keypoints with
/// visibility `NotAnnotated` stay in the list as placeholders but are excluded
/// from center, area and point queries. Ids are dense, `0..n`, matching the
/// list position also after removals.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct KeypointSet {
    keypoints: Vec<Keypoint>,
    pub bounding_box: Option<BbF>,
    pub show_skeleton: bool,
}

impl KeypointSet {
    /// All 17 COCO keypoints, unannotated.
    pub fn new_coco() -> Self {
        let keypoints = COCO_KEYPOINT_NAMES
            .iter()
            .enumerate()
            .map(|(id, name)| Keypoint {
                id,
                name: (*name).to_string(),
                pos: PtF::default(),
                visibility: KeypointVisibility::NotAnnotated,
            })
            .collect();
        Self {
            keypoints,
            bounding_box: None,
            show_skeleton: true,
        }
    }

    /// All 17 COCO keypoints laid out as a rough standing pose around
    /// `center`, everything visible.
    pub fn seed_pose(center: PtF) -> Self {
        let s = 50.0;
        let rel = [
            (0.0, -2.0),  // nose
            (-0.2, -2.1), // left_eye
            (0.2, -2.1),  // right_eye
            (-0.4, -2.0), // left_ear
            (0.4, -2.0),  // right_ear
            (-0.8, -1.0), // left_shoulder
            (0.8, -1.0),  // right_shoulder
            (-1.2, -0.2), // left_elbow
            (1.2, -0.2),  // right_elbow
            (-1.4, 0.4),  // left_wrist
            (1.4, 0.4),   // right_wrist
            (-0.4, 0.8),  // left_hip
            (0.4, 0.8),   // right_hip
            (-0.4, 1.8),  // left_knee
            (0.4, 1.8),   // right_knee
            (-0.4, 2.8),  // left_ankle
            (0.4, 2.8),   // right_ankle
        ];
        let mut set = Self::new_coco();
        for (kp, (dx, dy)) in set.keypoints.iter_mut().zip(rel.iter()) {
            kp.pos = PtF::new(center.x + s * dx, center.y + s * dy);
            kp.visibility = KeypointVisibility::Visible;
        }
        set
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }
    pub fn keypoint(&self, id: usize) -> Option<&Keypoint> {
        self.keypoints.get(id)
    }

    pub fn annotated(&self) -> impl Iterator<Item = &Keypoint> + Clone {
        self.keypoints
            .iter()
            .filter(|k| k.visibility != KeypointVisibility::NotAnnotated)
    }
    pub fn n_annotated(&self) -> usize {
        self.annotated().count()
    }

    pub fn points(&self) -> Vec<PtF> {
        self.annotated().map(|k| k.pos).collect()
    }

    pub fn center(&self) -> PtF {
        let n = self.n_annotated();
        if n == 0 {
            return PtF::default();
        }
        self.annotated().fold(PtF::default(), |acc, k| acc + k.pos) / n as f64
    }

    /// Area of the box enclosing the annotated keypoints, 0 for fewer than two.
    pub fn area(&self) -> f64 {
        self.enclosing_bb().map_or(0.0, |bb| bb.area())
    }

    pub fn enclosing_bb(&self) -> Option<BbF> {
        if self.n_annotated() < 2 {
            None
        } else {
            BbF::from_points_iter(self.annotated().map(|k| k.pos)).ok()
        }
    }

    pub fn contains(&self, p: PtF) -> bool {
        self.annotated()
            .any(|k| k.pos.dist(&p) <= KEYPOINT_HIT_TOLERANCE)
    }

    /// Closest annotated keypoint within `threshold`.
    pub fn nearest_keypoint(&self, p: PtF, threshold: f64) -> Option<usize> {
        self.annotated()
            .map(|k| (k.id, k.pos.dist(&p)))
            .filter(|(_, d)| *d <= threshold)
            .min_by(|(_, d1), (_, d2)| crate::core::min_from_partial(d1, d2))
            .map(|(id, _)| id)
    }

    /// First unannotated keypoint becomes visible at `pos`. Returns its id.
    pub fn place_next(&mut self, pos: PtF) -> Option<usize> {
        let kp = self
            .keypoints
            .iter_mut()
            .find(|k| k.visibility == KeypointVisibility::NotAnnotated)?;
        kp.pos = pos;
        kp.visibility = KeypointVisibility::Visible;
        Some(kp.id)
    }

    pub fn set_position(&mut self, id: usize, pos: PtF) {
        if let Some(kp) = self.keypoints.get_mut(id) {
            kp.pos = pos;
        }
    }

    pub fn cycle_visibility(&mut self, id: usize) {
        if let Some(kp) = self.keypoints.get_mut(id) {
            kp.visibility = kp.visibility.cycled();
        }
    }

    /// Assigns positions to the annotated keypoints in order; extra points are
    /// dropped, missing ones leave the remaining keypoints untouched.
    pub fn set_points(&mut self, points: &[PtF]) {
        let mut point_iter = points.iter();
        for kp in self
            .keypoints
            .iter_mut()
            .filter(|k| k.visibility != KeypointVisibility::NotAnnotated)
        {
            match point_iter.next() {
                Some(p) => kp.pos = *p,
                None => break,
            }
        }
    }

    /// Removes a keypoint and restores dense ids `0..n`.
    pub fn remove(&mut self, id: usize) {
        if id < self.keypoints.len() {
            self.keypoints.remove(id);
            for (i, kp) in self.keypoints.iter_mut().enumerate() {
                kp.id = i;
            }
        }
    }
}

#[test]
fn test_schema() {
    let set = KeypointSet::new_coco();
    assert_eq!(set.keypoints().len(), 17);
    assert_eq!(set.keypoints()[1].name, "left_eye");
    assert!(set.keypoints().iter().enumerate().all(|(i, k)| k.id == i));
    assert_eq!(set.n_annotated(), 0);
    assert!(set.center().is_close_to(PtF::default()));
    for (a, b) in COCO_SKELETON {
        assert!(a < 17 && b < 17);
    }
}

#[test]
fn test_placement_and_cycle() {
    let mut set = KeypointSet::new_coco();
    let id = set.place_next(PtF::new(10.0, 10.0)).unwrap();
    assert_eq!(id, 0);
    assert_eq!(
        set.keypoint(0).unwrap().visibility,
        KeypointVisibility::Visible
    );
    set.cycle_visibility(0);
    assert_eq!(
        set.keypoint(0).unwrap().visibility,
        KeypointVisibility::Occluded
    );
    set.cycle_visibility(0);
    assert_eq!(
        set.keypoint(0).unwrap().visibility,
        KeypointVisibility::NotAnnotated
    );
    set.cycle_visibility(0);
    assert_eq!(
        set.keypoint(0).unwrap().visibility,
        KeypointVisibility::Visible
    );
}

#[test]
fn test_queries_skip_unannotated() {
    let mut set = KeypointSet::new_coco();
    set.place_next(PtF::new(0.0, 0.0));
    set.place_next(PtF::new(10.0, 20.0));
    assert_eq!(set.points().len(), 2);
    assert!(set.center().is_close_to(PtF::new(5.0, 10.0)));
    assert!((set.area() - 200.0).abs() < 1e-9);
    assert!(set.contains(PtF::new(10.0, 25.0)));
    assert!(!set.contains(PtF::new(10.0, 40.0)));
    // a placeholder at the origin does not hit
    set.cycle_visibility(0);
    set.cycle_visibility(0); // now NotAnnotated
    assert_eq!(set.n_annotated(), 1);
    assert!((set.area() - 0.0).abs() < 1e-9);
}

#[test]
fn test_dense_ids_after_removal() {
    let mut set = KeypointSet::new_coco();
    set.remove(3);
    assert_eq!(set.keypoints().len(), 16);
    assert!(set.keypoints().iter().enumerate().all(|(i, k)| k.id == i));
    assert_eq!(set.keypoints()[3].name, "right_ear");
}

#[test]
fn test_nearest() {
    let mut set = KeypointSet::new_coco();
    set.place_next(PtF::new(0.0, 0.0));
    set.place_next(PtF::new(10.0, 0.0));
    assert_eq!(set.nearest_keypoint(PtF::new(8.0, 0.0), 15.0), Some(1));
    assert_eq!(set.nearest_keypoint(PtF::new(100.0, 0.0), 15.0), None);
}

#[test]
fn test_seed_pose() {
    let set = KeypointSet::seed_pose(PtF::new(200.0, 200.0));
    assert_eq!(set.n_annotated(), 17);
    assert!(set.keypoints()[0].pos.is_close_to(PtF::new(200.0, 100.0)));
    assert!(set.area() > 0.0);
}
