mod core;
mod draw;

pub use self::core::{
    rotation_handle_pos, Editor, ToolState, CORNER_HANDLE_RADIUS, ROTATION_HANDLE_OFFSET,
    ROTATION_HANDLE_RADIUS,
};
pub use draw::{MIN_CIRCLE_RADIUS, MIN_LINE_LENGTH, MIN_SIDE, POLYGON_CLOSE_DIST};

use serde::{Deserialize, Serialize};

/// The variant the drawing tool produces, or plain selection.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    Rect,
    Circle,
    Line,
    Point,
    Polygon,
    Obb,
    Keypoints,
}
