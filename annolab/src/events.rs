use annolab_domain::PtF;
use uuid::Uuid;

#[derive(Clone, Copy, Debug)]
pub enum ZoomAmount {
    Delta(f64),
    Factor(f64),
}

/// A pointer event in screen coordinates. `pan_button` carries the pan
/// modifier, e.g. a pressed middle button.
#[derive(Clone, Copy, Debug)]
pub struct PointerEvent {
    pub pos: PtF,
    pub pan_button: bool,
}

impl PointerEvent {
    pub fn at(pos: PtF) -> Self {
        Self {
            pos,
            pan_button: false,
        }
    }
    pub fn pan(pos: PtF) -> Self {
        Self {
            pos,
            pan_button: true,
        }
    }
}

/// Notifications for the host, drained via [`Editor::take_events`](crate::Editor::take_events).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    SelectionChanged(Option<Uuid>),
    DraftChanged,
    AnnotationsChanged,
    ViewChanged,
}
