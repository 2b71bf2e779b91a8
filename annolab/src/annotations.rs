use std::collections::HashMap;

use annolab_domain::{Figure, PtF};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationState {
    #[default]
    Normal,
    Selected,
}

/// One annotation, the shared identity and metadata around a [`Figure`](Figure).
/// Geometry mutations go through [`edit_figure`](Annotation::edit_figure) so
/// the modification timestamp stays truthful.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Annotation {
    id: Uuid,
    pub label: String,
    pub color: String,
    pub stroke_width: f64,
    pub is_visible: bool,
    is_selected: bool,
    state: AnnotationState,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    pub metadata: HashMap<String, Value>,
    figure: Figure,
}

impl Annotation {
    pub fn new(figure: Figure, label: &str, color: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            label: label.to_string(),
            color: color.to_string(),
            stroke_width: 2.0,
            is_visible: true,
            is_selected: false,
            state: AnnotationState::Normal,
            created_at: now,
            modified_at: now,
            metadata: HashMap::new(),
            figure,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn figure(&self) -> &Figure {
        &self.figure
    }
    pub fn state(&self) -> AnnotationState {
        self.state
    }
    pub fn is_selected(&self) -> bool {
        self.is_selected
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Selection flag and logical state change together, nowhere else.
    pub fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
        self.state = if selected {
            AnnotationState::Selected
        } else {
            AnnotationState::Normal
        };
    }

    pub fn edit_figure(&mut self, f_change: impl FnOnce(&mut Figure)) {
        f_change(&mut self.figure);
        self.modified_at = Utc::now();
    }

    pub fn set_points(&mut self, points: &[PtF]) {
        self.edit_figure(|fig| fig.set_points(points));
    }

    /// Deep copy with a fresh identity and fresh timestamps.
    #[must_use]
    pub fn clone_detached(&self) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            is_selected: false,
            state: AnnotationState::Normal,
            created_at: now,
            modified_at: now,
            ..self.clone()
        }
    }
}

/// Ordered annotations of one image. The order is the drawing order, the last
/// element is topmost. Exactly one annotation can be selected, the invariant
/// lives in [`select`](ImageAnnotations::select).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct ImageAnnotations {
    annos: Vec<Annotation>,
}

impl ImageAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects malformed figures, the collection never holds degenerate
    /// geometry.
    pub fn add(&mut self, anno: Annotation) -> bool {
        if anno.figure().is_well_formed() {
            self.annos.push(anno);
            true
        } else {
            warn!("rejecting malformed {} annotation", anno.figure().kind());
            false
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Annotation> {
        let idx = self.annos.iter().position(|a| a.id() == id)?;
        Some(self.annos.remove(idx))
    }

    pub fn get(&self, id: Uuid) -> Option<&Annotation> {
        self.annos.iter().find(|a| a.id() == id)
    }

    pub fn edit(&mut self, id: Uuid, f_change: impl FnOnce(&mut Annotation)) -> bool {
        if let Some(anno) = self.annos.iter_mut().find(|a| a.id() == id) {
            f_change(anno);
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annos.iter()
    }
    pub fn len(&self) -> usize {
        self.annos.len()
    }
    pub fn is_empty(&self) -> bool {
        self.annos.is_empty()
    }

    /// Topmost visible annotation containing `p`, i.e. the last drawn wins.
    pub fn find_topmost(&self, p: PtF) -> Option<&Annotation> {
        self.annos
            .iter()
            .rev()
            .find(|a| a.is_visible && a.figure().contains(p))
    }

    /// Selects at most one annotation, everything else is deselected. Returns
    /// whether the selection changed.
    pub fn select(&mut self, id: Option<Uuid>) -> bool {
        let mut changed = false;
        for anno in &mut self.annos {
            let selected = Some(anno.id()) == id;
            if anno.is_selected() != selected {
                anno.set_selected(selected);
                changed = true;
            }
        }
        changed
    }

    pub fn deselect_all(&mut self) -> bool {
        self.select(None)
    }

    pub fn selected(&self) -> Option<&Annotation> {
        self.annos.iter().find(|a| a.is_selected())
    }
    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected().map(|a| a.id())
    }
}

#[cfg(test)]
use annolab_domain::{BbF, Circle, LineSeg};

#[cfg(test)]
fn rect_anno(arr: &[f64; 4]) -> Annotation {
    Annotation::new(Figure::Rect(BbF::from_arr(arr)), "thing", "#FF0000")
}

#[test]
fn test_selection_mutual_exclusivity() {
    let mut annos = ImageAnnotations::new();
    let a = rect_anno(&[0.0, 0.0, 10.0, 10.0]);
    let b = rect_anno(&[20.0, 20.0, 10.0, 10.0]);
    let (id_a, id_b) = (a.id(), b.id());
    assert!(annos.add(a));
    assert!(annos.add(b));

    assert!(annos.select(Some(id_a)));
    assert_eq!(annos.selected_id(), Some(id_a));
    assert_eq!(annos.get(id_a).unwrap().state(), AnnotationState::Selected);

    assert!(annos.select(Some(id_b)));
    assert_eq!(annos.selected_id(), Some(id_b));
    assert!(!annos.get(id_a).unwrap().is_selected());
    assert_eq!(annos.get(id_a).unwrap().state(), AnnotationState::Normal);

    assert!(annos.deselect_all());
    assert_eq!(annos.selected_id(), None);
    assert!(!annos.deselect_all());
}

#[test]
fn test_topmost_wins() {
    let mut annos = ImageAnnotations::new();
    let below = rect_anno(&[0.0, 0.0, 30.0, 30.0]);
    let above = rect_anno(&[10.0, 10.0, 30.0, 30.0]);
    let id_above = above.id();
    annos.add(below);
    annos.add(above);
    // both contain the point, the later one wins
    assert_eq!(
        annos.find_topmost(PtF::new(15.0, 15.0)).map(|a| a.id()),
        Some(id_above)
    );
    // invisible annotations are skipped
    annos.edit(id_above, |a| a.is_visible = false);
    assert_ne!(
        annos.find_topmost(PtF::new(15.0, 15.0)).map(|a| a.id()),
        Some(id_above)
    );
}

#[test]
fn test_rejects_malformed() {
    let mut annos = ImageAnnotations::new();
    let degenerate = Annotation::new(
        Figure::Line(LineSeg::new(PtF::new(1.0, 1.0), PtF::new(1.0, 1.0))),
        "l",
        "#00FF00",
    );
    assert!(!annos.add(degenerate));
    assert!(annos.is_empty());
    let zero_circle = Annotation::new(
        Figure::Circle(Circle {
            center: PtF::new(1.0, 1.0),
            radius: 0.0,
        }),
        "c",
        "#00FF00",
    );
    assert!(!annos.add(zero_circle));
}

#[test]
fn test_clone_detached() {
    let anno = rect_anno(&[0.0, 0.0, 5.0, 5.0]);
    let clone = anno.clone_detached();
    assert_ne!(anno.id(), clone.id());
    assert_eq!(anno.figure(), clone.figure());
    assert_eq!(anno.label, clone.label);
    assert!(!clone.is_selected());
}

#[test]
fn test_edit_updates_modified_at() {
    let mut anno = rect_anno(&[0.0, 0.0, 5.0, 5.0]);
    let before = anno.modified_at();
    anno.set_points(&[PtF::new(0.0, 0.0), PtF::new(7.0, 7.0)]);
    assert!(anno.modified_at() >= before);
    assert_eq!(anno.figure().points()[2], PtF::new(7.0, 7.0));
}
