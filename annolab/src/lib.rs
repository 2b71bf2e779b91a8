pub mod annotations;
pub mod cfg;
pub mod events;
pub mod export;
pub mod history;
pub mod label_info;
pub mod project;
pub mod result;
pub mod tools;
pub mod tracing_setup;
pub mod viewport;

pub use annolab_domain::{
    BbF, Circle, Figure, Keypoint, KeypointSet, KeypointVisibility, LineSeg, Obb, PointMark,
    Polygon, PtF, ShapeF, ShapeI, COCO_KEYPOINT_NAMES, COCO_SKELETON,
};
pub use annotations::{Annotation, AnnotationState, ImageAnnotations};
pub use events::{EngineEvent, PointerEvent, ZoomAmount};
pub use export::{
    classes_txt, coco_keypoint_triplets, dota_line, yolo_data_yaml, yolo_obb_line, yolo_pose_line,
};
pub use label_info::LabelInfo;
pub use project::{Project, ProjectImage};
pub use tools::{Editor, ToolKind, ToolState};
pub use viewport::Viewport;
