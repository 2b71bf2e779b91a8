use std::collections::HashMap;

use annolab_domain::{alerr, AlResult};
use serde::{Deserialize, Serialize};
use tracing::info;

fn color_dist(c1: [u8; 3], c2: [u8; 3]) -> f32 {
    let square_d = |i| (f32::from(c1[i]) - f32::from(c2[i])).powi(2);
    (square_d(0) + square_d(1) + square_d(2)).sqrt()
}

pub fn random_clr() -> [u8; 3] {
    let r = rand::random::<u8>();
    let g = rand::random::<u8>();
    let b = rand::random::<u8>();
    [r, g, b]
}

fn argmax_clr_dist(picklist: &[[u8; 3]], legacylist: &[[u8; 3]]) -> [u8; 3] {
    let (idx, _) = picklist
        .iter()
        .enumerate()
        .map(|(i, pickclr)| {
            let min_dist = legacylist
                .iter()
                .map(|legclr| color_dist(*legclr, *pickclr))
                .min_by(|a, b| a.partial_cmp(b).unwrap())
                .unwrap_or(0.0);
            (i, min_dist)
        })
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .unwrap();
    picklist[idx]
}

/// A fresh color far away from the colors already in use.
pub fn new_color(colors: &[[u8; 3]]) -> [u8; 3] {
    let mut new_clr_proposals = [[0u8, 0u8, 0u8]; 10];
    for new_clr in &mut new_clr_proposals {
        *new_clr = random_clr();
    }
    argmax_clr_dist(&new_clr_proposals, colors)
}

pub fn color_to_hex(clr: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", clr[0], clr[1], clr[2])
}

/// The label registry of a project. Labels keep their insertion order, the
/// order defines the class ids of the export formats.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct LabelInfo {
    labels: Vec<String>,
    colors: Vec<[u8; 3]>,
    pub cat_idx_current: usize,
}

impl LabelInfo {
    pub fn from_iter(labels: impl Iterator<Item = String>) -> Self {
        let mut info = Self::default();
        for label in labels {
            if let Err(e) = info.push(label, None) {
                info!("{e:?}");
            }
        }
        info
    }

    pub fn push(&mut self, label: String, color: Option<[u8; 3]>) -> AlResult<()> {
        if self.labels.contains(&label) {
            Err(alerr!("label '{}' already exists", label))
        } else {
            info!("adding label '{label}'");
            let clr = color.unwrap_or_else(|| new_color(&self.colors));
            self.labels.push(label);
            self.colors.push(clr);
            Ok(())
        }
    }

    pub fn remove(&mut self, idx: usize) {
        if idx < self.labels.len() {
            self.labels.remove(idx);
            self.colors.remove(idx);
            if self.cat_idx_current >= self.labels.len() {
                self.cat_idx_current = self.labels.len().saturating_sub(1);
            }
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }
    pub fn len(&self) -> usize {
        self.labels.len()
    }
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn current_label(&self) -> Option<&str> {
        self.labels.get(self.cat_idx_current).map(String::as_str)
    }
    pub fn color_of(&self, label: &str) -> Option<[u8; 3]> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|idx| self.colors[idx])
    }

    pub fn new_random_colors(&mut self) {
        info!("new random colors for annotations");
        let mut colors: Vec<[u8; 3]> = vec![];
        for _ in 0..self.colors.len() {
            colors.push(new_color(&colors));
        }
        self.colors = colors;
    }

    /// The label to class-id map the exporters consume.
    pub fn label_map(&self) -> HashMap<String, usize> {
        self.labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.clone(), idx))
            .collect()
    }
}

#[test]
fn test_push_and_map() {
    let mut info = LabelInfo::default();
    info.push("person".to_string(), None).unwrap();
    info.push("car".to_string(), Some([1, 2, 3])).unwrap();
    assert!(info.push("person".to_string(), None).is_err());
    assert_eq!(info.labels(), &["person".to_string(), "car".to_string()]);
    assert_eq!(info.colors().len(), 2);
    let map = info.label_map();
    assert_eq!(map["person"], 0);
    assert_eq!(map["car"], 1);
    assert_eq!(info.color_of("car"), Some([1, 2, 3]));
    assert_eq!(info.color_of("bike"), None);
}

#[test]
fn test_remove_keeps_current_in_range() {
    let mut info = LabelInfo::from_iter(["a", "b", "c"].map(str::to_string).into_iter());
    info.cat_idx_current = 2;
    info.remove(2);
    assert_eq!(info.cat_idx_current, 1);
    info.remove(17);
    assert_eq!(info.len(), 2);
}

#[test]
fn test_hex() {
    assert_eq!(color_to_hex([255, 0, 16]), "#FF0010");
}
