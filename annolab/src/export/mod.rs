//! Lossy numeric projections of annotations into ML training formats. All
//! functions are pure, they neither mutate annotations nor touch the file
//! system.

mod dota;
mod pose;
mod yolo_obb;

pub use dota::dota_line;
pub use pose::{coco_keypoint_triplets, yolo_pose_line};
pub use yolo_obb::yolo_obb_line;

use std::collections::HashMap;

pub(crate) fn clamp_unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Unknown labels fall back to class 0.
pub(crate) fn class_id(label: &str, label_map: &HashMap<String, usize>) -> usize {
    label_map.get(label).copied().unwrap_or(0)
}

/// The `classes.txt` companion file of the YOLO formats.
pub fn classes_txt(labels: &[String]) -> String {
    let mut s = labels.join("\n");
    s.push('\n');
    s
}

/// A YOLO dataset configuration for the given task, e.g. "obb" or "pose".
pub fn yolo_data_yaml(dataset_path: &str, labels: &[String], task: &str) -> String {
    let names = labels
        .iter()
        .map(|l| format!("'{l}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "path: {dataset_path}\ntrain: images\nval: images\n\nnc: {}\nnames: [{names}]\n\ntask: {task}\n",
        labels.len()
    )
}

#[test]
fn test_classes_txt() {
    let labels = vec!["person".to_string(), "car".to_string()];
    assert_eq!(classes_txt(&labels), "person\ncar\n");
}

#[test]
fn test_data_yaml() {
    let labels = vec!["person".to_string()];
    let yaml = yolo_data_yaml("/data/ds", &labels, "obb");
    assert!(yaml.contains("nc: 1"));
    assert!(yaml.contains("names: ['person']"));
    assert!(yaml.contains("task: obb"));
}
