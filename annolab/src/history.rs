use crate::annotations::ImageAnnotations;

#[derive(Clone, Debug)]
pub struct Record {
    pub annos: ImageAnnotations,
    pub actor: &'static str,
}

impl Record {
    pub fn new(annos: ImageAnnotations, actor: &'static str) -> Self {
        Self { annos, actor }
    }
}

/// Linear undo history of annotation snapshots. A push truncates the redo
/// tail.
#[derive(Clone, Debug, Default)]
pub struct History {
    records: Vec<Record>,
    current_idx: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        match self.current_idx {
            None => {
                self.records.clear();
                self.records.push(record);
                self.current_idx = Some(0);
            }
            Some(idx) => {
                if idx < self.records.len() - 1 {
                    self.records.truncate(idx + 1);
                }
                self.records.push(record);
                self.current_idx = Some(idx + 1);
            }
        }
    }

    pub fn undo(&mut self) -> Option<ImageAnnotations> {
        match self.current_idx {
            Some(idx) if idx > 0 => {
                self.current_idx = Some(idx - 1);
                Some(self.records[idx - 1].annos.clone())
            }
            _ => None,
        }
    }

    pub fn redo(&mut self) -> Option<ImageAnnotations> {
        match self.current_idx {
            Some(idx) if idx + 1 < self.records.len() => {
                self.current_idx = Some(idx + 1);
                Some(self.records[idx + 1].annos.clone())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
use {
    crate::annotations::Annotation,
    annolab_domain::{BbF, Figure},
};

#[test]
fn test_undo_redo() {
    let mut history = History::new();
    let empty = ImageAnnotations::new();
    history.push(Record::new(empty.clone(), "test"));

    let mut one = ImageAnnotations::new();
    one.add(Annotation::new(
        Figure::Rect(BbF::from_arr(&[0.0, 0.0, 5.0, 5.0])),
        "a",
        "#FF0000",
    ));
    history.push(Record::new(one.clone(), "test"));

    assert_eq!(history.undo(), Some(empty.clone()));
    assert_eq!(history.undo(), None);
    assert_eq!(history.redo(), Some(one.clone()));
    assert_eq!(history.redo(), None);

    // a new push drops the redo tail
    history.undo();
    let mut two = one.clone();
    two.add(Annotation::new(
        Figure::Rect(BbF::from_arr(&[9.0, 9.0, 5.0, 5.0])),
        "b",
        "#FF0000",
    ));
    history.push(Record::new(two.clone(), "test"));
    assert_eq!(history.redo(), None);
    assert_eq!(history.undo(), Some(empty));
}
