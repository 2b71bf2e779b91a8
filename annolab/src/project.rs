use std::collections::HashMap;
use std::fs;
use std::path::Path;

use annolab_domain::ShapeI;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
    annotations::{Annotation, ImageAnnotations},
    label_info::LabelInfo,
    result::{to_al, AlResult},
};

const PROJECT_VERSION: &str = "1.0.0";

/// One image of a project together with its annotations. The image owns its
/// annotations, nothing else does.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProjectImage {
    id: Uuid,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    pub annotations: ImageAnnotations,
    pub metadata: HashMap<String, Value>,
}

impl ProjectImage {
    pub fn new(file_name: &str, width: u32, height: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            width,
            height,
            created_at: now,
            modified_at: now,
            annotations: ImageAnnotations::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn shape(&self) -> ShapeI {
        ShapeI::new(self.width, self.height)
    }
    pub fn is_annotated(&self) -> bool {
        !self.annotations.is_empty()
    }
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    pub fn add_annotation(&mut self, anno: Annotation) -> bool {
        let added = self.annotations.add(anno);
        if added {
            self.modified_at = Utc::now();
        }
        added
    }
    pub fn remove_annotation(&mut self, id: Uuid) -> Option<Annotation> {
        let removed = self.annotations.remove(id);
        if removed.is_some() {
            self.modified_at = Utc::now();
        }
        removed
    }
}

/// A project owns its images, its label registry and free-form metadata. This
/// is the record that goes through the persistence boundary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Project {
    id: Uuid,
    pub name: String,
    pub description: String,
    version: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    pub label_info: LabelInfo,
    images: Vec<ProjectImage>,
    pub metadata: HashMap<String, Value>,
}

impl Project {
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            version: PROJECT_VERSION.to_string(),
            created_at: now,
            modified_at: now,
            label_info: LabelInfo::default(),
            images: vec![],
            metadata: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn images(&self) -> &[ProjectImage] {
        &self.images
    }
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn add_image(&mut self, image: ProjectImage) {
        self.images.push(image);
        self.modified_at = Utc::now();
    }
    pub fn remove_image(&mut self, id: Uuid) -> Option<ProjectImage> {
        let idx = self.images.iter().position(|im| im.id() == id)?;
        self.modified_at = Utc::now();
        Some(self.images.remove(idx))
    }
    pub fn image(&self, id: Uuid) -> Option<&ProjectImage> {
        self.images.iter().find(|im| im.id() == id)
    }
    pub fn image_mut(&mut self, id: Uuid) -> Option<&mut ProjectImage> {
        self.images.iter_mut().find(|im| im.id() == id)
    }
    pub fn image_by_file_name(&self, file_name: &str) -> Option<&ProjectImage> {
        self.images
            .iter()
            .find(|im| im.file_name.eq_ignore_ascii_case(file_name))
    }

    pub fn total_annotations(&self) -> usize {
        self.images.iter().map(|im| im.annotations.len()).sum()
    }
    pub fn annotated_image_count(&self) -> usize {
        self.images.iter().filter(|im| im.is_annotated()).count()
    }

    pub fn to_json(&self) -> AlResult<String> {
        serde_json::to_string_pretty(self).map_err(to_al)
    }
    pub fn from_json(s: &str) -> AlResult<Self> {
        serde_json::from_str(s).map_err(to_al)
    }

    pub fn save(&self, path: &Path) -> AlResult<()> {
        let s = self.to_json()?;
        fs::write(path, s).map_err(to_al)?;
        info!("saved project '{}' to {path:?}", self.name);
        Ok(())
    }
    pub fn load(path: &Path) -> AlResult<Self> {
        let s = fs::read_to_string(path).map_err(to_al)?;
        let prj = Self::from_json(&s)?;
        info!("loaded project '{}' from {path:?}", prj.name);
        Ok(prj)
    }
}

#[cfg(test)]
use annolab_domain::{BbF, Figure, KeypointSet, LineSeg, Obb, PointMark, Polygon, PtF};

#[cfg(test)]
fn project_with_all_variants() -> Project {
    let mut prj = Project::new("test");
    prj.label_info.push("person".to_string(), None).unwrap();
    let mut image = ProjectImage::new("img_000.png", 640, 480);
    let figures = vec![
        Figure::Rect(BbF::from_arr(&[10.0, 10.0, 40.0, 30.0])),
        Figure::Circle(annolab_domain::Circle {
            center: PtF::new(100.0, 100.0),
            radius: 20.0,
        }),
        Figure::Line(LineSeg::new(PtF::new(0.0, 0.0), PtF::new(50.0, 50.0))),
        Figure::Point(PointMark::new(PtF::new(33.0, 44.0))),
        Figure::Polygon(
            Polygon::from_vec(vec![
                PtF::new(0.0, 0.0),
                PtF::new(10.0, 0.0),
                PtF::new(10.0, 10.0),
            ])
            .unwrap(),
        ),
        Figure::Obb(Obb::new(PtF::new(200.0, 200.0), 60.0, 30.0, 45.0)),
        Figure::Keypoints(KeypointSet::seed_pose(PtF::new(300.0, 200.0))),
    ];
    for fig in figures {
        assert!(image.add_annotation(Annotation::new(fig, "person", "#FF0000")));
    }
    prj.add_image(image);
    prj
}

#[test]
fn test_roundtrip_all_variants() {
    let prj = project_with_all_variants();
    let json = prj.to_json().unwrap();
    let read = Project::from_json(&json).unwrap();
    assert_eq!(read, prj);
    assert_eq!(read.total_annotations(), 7);
    assert_eq!(read.annotated_image_count(), 1);
}

#[test]
fn test_image_management() {
    let mut prj = Project::new("p");
    assert!(prj.is_empty());
    let image = ProjectImage::new("a.png", 10, 10);
    let id = image.id();
    prj.add_image(image);
    assert_eq!(prj.image(id).unwrap().file_name, "a.png");
    assert!(prj.image_by_file_name("A.PNG").is_some());
    assert_eq!(prj.image(id).unwrap().shape(), ShapeI::new(10, 10));
    assert!(prj.remove_image(id).is_some());
    assert!(prj.remove_image(id).is_none());
    assert!(prj.is_empty());
}

#[test]
fn test_save_load() {
    let prj = project_with_all_variants();
    let path = std::env::temp_dir().join(format!("annolab_test_{}.json", prj.id()));
    prj.save(&path).unwrap();
    let read = Project::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(read, prj);
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(Project::from_json("{\"not\": \"a project\"}").is_err());
}
