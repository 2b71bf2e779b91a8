use annolab_domain::{BbF, Figure, Obb, PtF, ShapeF, ShapeI, KEYPOINT_HIT_TOLERANCE};
use tracing::debug;
use uuid::Uuid;

use super::{draw, ToolKind};
use crate::{
    annotations::{Annotation, ImageAnnotations},
    cfg::Cfg,
    events::{EngineEvent, PointerEvent, ZoomAmount},
    history::{History, Record},
    viewport::Viewport,
};

/// Offset of an OBB's rotation handle from its center along the rotated "up"
/// direction, and the handle hit radii. All in screen pixels, divided by the
/// zoom before use so the handles keep their size on screen.
pub const ROTATION_HANDLE_OFFSET: f64 = 30.0;
pub const ROTATION_HANDLE_RADIUS: f64 = 8.0;
pub const CORNER_HANDLE_RADIUS: f64 = 6.0;

const ACTOR_NAME: &str = "editor";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToolState {
    Idle,
    Panning {
        last: PtF,
    },
    Drawing {
        anchor: PtF,
    },
    RotatingObb {
        id: Uuid,
        down_angle_rad: f64,
        start_angle_deg: f64,
    },
    DraggingObbCorner {
        id: Uuid,
        corner: usize,
    },
    DraggingKeypoint {
        id: Uuid,
        kp_id: usize,
    },
}

/// The image-space position of the rotation handle of an OBB.
pub fn rotation_handle_pos(obb: &Obb, zoom: f64) -> PtF {
    let offset = PtF::new(0.0, -ROTATION_HANDLE_OFFSET / zoom);
    obb.center() + offset.rotated(obb.angle_deg().to_radians())
}

fn corner_handle_hit(obb: &Obb, p: PtF, zoom: f64) -> Option<usize> {
    obb.corners()
        .iter()
        .position(|c| c.dist(&p) <= CORNER_HANDLE_RADIUS / zoom)
}

/// The single-owner engine around one image's annotations. All pointer
/// positions arriving here are screen coordinates, the editor translates them
/// through its viewport before they touch any geometry.
#[derive(Clone, Debug)]
pub struct Editor {
    viewport: Viewport,
    image_shape: ShapeI,
    annos: ImageAnnotations,
    active_tool: ToolKind,
    state: ToolState,
    draft: Option<Annotation>,
    history: History,
    pub current_label: String,
    pub current_color: String,
    pub stroke_width: f64,
    events: Vec<EngineEvent>,
}

impl Editor {
    pub fn new(image_shape: ShapeI) -> Self {
        Self::with_cfg(image_shape, &Cfg::default())
    }

    pub fn with_cfg(image_shape: ShapeI, cfg: &Cfg) -> Self {
        let mut history = History::new();
        history.push(Record::new(ImageAnnotations::new(), ACTOR_NAME));
        Self {
            viewport: Viewport::default(),
            image_shape,
            annos: ImageAnnotations::new(),
            active_tool: ToolKind::Select,
            state: ToolState::Idle,
            draft: None,
            history,
            current_label: cfg.default_label.clone(),
            current_color: cfg.default_color.clone(),
            stroke_width: cfg.default_stroke_width,
            events: vec![],
        }
    }

    /// Swaps in another image's annotation collection, dropping transient
    /// state and restarting the history.
    pub fn set_image(&mut self, image_shape: ShapeI, annos: ImageAnnotations) {
        self.cancel();
        self.image_shape = image_shape;
        self.annos = annos;
        self.history = History::new();
        self.history.push(Record::new(self.annos.clone(), ACTOR_NAME));
        self.events.push(EngineEvent::AnnotationsChanged);
        self.events
            .push(EngineEvent::SelectionChanged(self.annos.selected_id()));
    }

    pub fn annotations(&self) -> &ImageAnnotations {
        &self.annos
    }
    /// Hands the collection back to the owner, e.g. for project persistence.
    pub fn take_annotations(&mut self) -> ImageAnnotations {
        std::mem::take(&mut self.annos)
    }
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
    pub fn image_shape(&self) -> ShapeI {
        self.image_shape
    }
    pub fn active_tool(&self) -> ToolKind {
        self.active_tool
    }
    pub fn state(&self) -> ToolState {
        self.state
    }
    pub fn draft(&self) -> Option<&Annotation> {
        self.draft.as_ref()
    }
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switching the tool cancels an unfinished draft.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if kind != self.active_tool {
            debug!("tool change to {kind:?}");
            self.cancel();
            self.active_tool = kind;
        }
    }

    /// Discards the draft and any transient pointer state. Idempotent, the
    /// committed collection is never touched.
    pub fn cancel(&mut self) {
        if self.draft.take().is_some() {
            self.events.push(EngineEvent::DraftChanged);
        }
        self.state = ToolState::Idle;
    }

    pub fn on_zoom(&mut self, amount: ZoomAmount, cursor: PtF) {
        if self.viewport.wheel_zoom(amount, cursor) {
            self.events.push(EngineEvent::ViewChanged);
        }
    }
    pub fn fit_to_window(&mut self, win: ShapeF) {
        if self.viewport.fit_to_window(self.image_shape, win) {
            self.events.push(EngineEvent::ViewChanged);
        }
    }
    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
        self.events.push(EngineEvent::ViewChanged);
    }

    fn image_contains(&self, p: PtF) -> bool {
        BbF {
            x: 0.0,
            y: 0.0,
            w: f64::from(self.image_shape.w),
            h: f64::from(self.image_shape.h),
        }
        .contains(p)
    }

    fn select(&mut self, id: Option<Uuid>) {
        if self.annos.select(id) {
            self.events.push(EngineEvent::SelectionChanged(id));
        }
    }

    pub fn remove_selected(&mut self) {
        if let Some(id) = self.annos.selected_id() {
            self.annos.remove(id);
            self.events.push(EngineEvent::SelectionChanged(None));
            self.events.push(EngineEvent::AnnotationsChanged);
            self.push_history();
        }
    }

    pub fn undo(&mut self) {
        if let Some(annos) = self.history.undo() {
            self.annos = annos;
            self.events.push(EngineEvent::AnnotationsChanged);
        }
    }
    pub fn redo(&mut self) {
        if let Some(annos) = self.history.redo() {
            self.annos = annos;
            self.events.push(EngineEvent::AnnotationsChanged);
        }
    }

    fn push_history(&mut self) {
        self.history.push(Record::new(self.annos.clone(), ACTOR_NAME));
    }

    pub fn on_pointer_down(&mut self, event: PointerEvent) {
        if event.pan_button {
            self.state = ToolState::Panning { last: event.pos };
            return;
        }
        let ip = self.viewport.screen_to_image(event.pos);
        if !self.image_contains(ip) {
            return;
        }
        // an unfinished multi-click draft owns the pointer
        if self.draft.is_some() {
            self.continue_draft(ip);
            return;
        }
        if self.check_special_targets(ip) {
            return;
        }
        if let Some(hit) = self.annos.find_topmost(ip) {
            let id = hit.id();
            self.select(Some(id));
            return;
        }
        self.select(None);
        self.start_or_continue_drawing(ip);
    }

    /// Handles of the selected annotation take priority over hit-testing.
    fn check_special_targets(&mut self, ip: PtF) -> bool {
        let zoom = self.viewport.zoom();
        let selected = match self.annos.selected() {
            Some(anno) => anno,
            None => return false,
        };
        let id = selected.id();
        match selected.figure() {
            Figure::Obb(obb) => {
                if ip.dist(&rotation_handle_pos(obb, zoom)) <= ROTATION_HANDLE_RADIUS / zoom {
                    self.state = ToolState::RotatingObb {
                        id,
                        down_angle_rad: angle_to(obb.center(), ip),
                        start_angle_deg: obb.angle_deg(),
                    };
                    return true;
                }
                if let Some(corner) = corner_handle_hit(obb, ip, zoom) {
                    self.state = ToolState::DraggingObbCorner { id, corner };
                    return true;
                }
            }
            Figure::Keypoints(set) => {
                if let Some(kp_id) = set.nearest_keypoint(ip, KEYPOINT_HIT_TOLERANCE) {
                    self.state = ToolState::DraggingKeypoint { id, kp_id };
                    return true;
                }
            }
            _ => {}
        }
        false
    }

    fn start_or_continue_drawing(&mut self, ip: PtF) {
        match self.active_tool {
            ToolKind::Select => {}
            ToolKind::Polygon | ToolKind::Keypoints => {
                self.continue_draft(ip);
            }
            kind => {
                self.draft = draw::start_draft(kind, ip, &self.current_label, &self.current_color);
                if let Some(draft) = &mut self.draft {
                    draft.stroke_width = self.stroke_width;
                    self.state = ToolState::Drawing { anchor: ip };
                    self.events.push(EngineEvent::DraftChanged);
                }
            }
        }
    }

    /// Click-accumulating drafts, polygon vertices and named keypoints.
    fn continue_draft(&mut self, ip: PtF) {
        let zoom = self.viewport.zoom();
        let mut close_polygon = false;
        match &mut self.draft {
            None => {
                self.draft = draw::start_draft(
                    self.active_tool,
                    ip,
                    &self.current_label,
                    &self.current_color,
                );
                if let Some(draft) = &mut self.draft {
                    draft.stroke_width = self.stroke_width;
                    self.events.push(EngineEvent::DraftChanged);
                }
            }
            Some(draft) => {
                draft.edit_figure(|fig| match fig {
                    Figure::Polygon(poly) => {
                        let first = poly.points()[0];
                        // the closing distance is measured on screen
                        if poly.is_closed() && ip.dist(&first) * zoom < draw::POLYGON_CLOSE_DIST {
                            close_polygon = true;
                            poly.set_preview(None);
                        } else {
                            poly.push(ip);
                        }
                    }
                    Figure::Keypoints(set) => {
                        match set.nearest_keypoint(ip, KEYPOINT_HIT_TOLERANCE) {
                            Some(kp_id) => set.cycle_visibility(kp_id),
                            None => {
                                set.place_next(ip);
                            }
                        }
                    }
                    _ => {}
                });
                self.events.push(EngineEvent::DraftChanged);
            }
        }
        if close_polygon {
            self.commit_draft();
        }
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent) {
        // panning is bound-agnostic
        if let ToolState::Panning { last } = self.state {
            self.viewport.pan = self.viewport.pan + (event.pos - last);
            self.state = ToolState::Panning { last: event.pos };
            self.events.push(EngineEvent::ViewChanged);
            return;
        }
        let ip = self.viewport.screen_to_image(event.pos);
        if !self.image_contains(ip) {
            return;
        }
        match self.state {
            ToolState::Idle | ToolState::Drawing { .. } | ToolState::Panning { .. } => {}
            ToolState::RotatingObb {
                id,
                down_angle_rad,
                start_angle_deg,
            } => {
                self.annos.edit(id, |anno| {
                    anno.edit_figure(|fig| {
                        if let Figure::Obb(obb) = fig {
                            let delta = angle_to(obb.center(), ip) - down_angle_rad;
                            obb.set_angle(start_angle_deg + delta.to_degrees());
                        }
                    });
                });
                self.events.push(EngineEvent::AnnotationsChanged);
                return;
            }
            ToolState::DraggingObbCorner { id, corner } => {
                self.annos.edit(id, |anno| {
                    anno.edit_figure(|fig| {
                        if let Figure::Obb(obb) = fig {
                            let mut corners = obb.corners();
                            corners[corner] = ip;
                            obb.set_corners(&corners);
                        }
                    });
                });
                self.events.push(EngineEvent::AnnotationsChanged);
                return;
            }
            ToolState::DraggingKeypoint { id, kp_id } => {
                self.annos.edit(id, |anno| {
                    anno.edit_figure(|fig| {
                        if let Figure::Keypoints(set) = fig {
                            set.set_position(kp_id, ip);
                        }
                    });
                });
                self.events.push(EngineEvent::AnnotationsChanged);
                return;
            }
        }
        // live preview of the draft
        if let Some(draft) = &mut self.draft {
            match self.state {
                ToolState::Drawing { anchor } => {
                    draft.edit_figure(|fig| draw::update_drag(fig, anchor, ip));
                    self.events.push(EngineEvent::DraftChanged);
                }
                _ => {
                    if let Figure::Polygon(_) = draft.figure() {
                        draft.edit_figure(|fig| {
                            if let Figure::Polygon(poly) = fig {
                                poly.set_preview(Some(ip));
                            }
                        });
                        self.events.push(EngineEvent::DraftChanged);
                    }
                }
            }
        }
    }

    pub fn on_pointer_up(&mut self, event: PointerEvent) {
        match self.state {
            ToolState::Panning { .. } => {
                self.state = ToolState::Idle;
            }
            ToolState::RotatingObb { .. }
            | ToolState::DraggingObbCorner { .. }
            | ToolState::DraggingKeypoint { .. } => {
                self.state = ToolState::Idle;
                self.push_history();
            }
            ToolState::Drawing { anchor } => {
                self.state = ToolState::Idle;
                let ip = self.viewport.screen_to_image(event.pos);
                let in_bounds = self.image_contains(ip);
                if let Some(draft) = &mut self.draft {
                    if in_bounds {
                        draft.edit_figure(|fig| draw::update_drag(fig, anchor, ip));
                    }
                }
                self.commit_draft();
            }
            ToolState::Idle => {}
        }
    }

    /// Explicitly finishes a multi-click draft, e.g. on enter or double click.
    pub fn finish_draft(&mut self) {
        if let Some(draft) = &mut self.draft {
            draft.edit_figure(|fig| {
                if let Figure::Polygon(poly) = fig {
                    poly.set_preview(None);
                }
            });
        }
        self.commit_draft();
    }

    fn commit_draft(&mut self) {
        let Some(draft) = self.draft.take() else {
            return;
        };
        self.events.push(EngineEvent::DraftChanged);
        if !draw::commit_valid(draft.figure()) {
            debug!("dropping too small {} draft", draft.figure().kind());
            return;
        }
        let id = draft.id();
        let is_obb = matches!(draft.figure(), Figure::Obb(_));
        if self.annos.add(draft) {
            self.events.push(EngineEvent::AnnotationsChanged);
            // a fresh OBB stays selected so its rotation handle is live
            if is_obb {
                self.select(Some(id));
            }
            self.push_history();
        }
    }
}

fn angle_to(center: PtF, p: PtF) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

#[cfg(test)]
use crate::viewport::MAX_ZOOM;

#[cfg(test)]
fn editor() -> Editor {
    Editor::new(ShapeI::new(200, 200))
}

#[cfg(test)]
fn press_drag_release(ed: &mut Editor, from: PtF, to: PtF) {
    ed.on_pointer_down(PointerEvent::at(from));
    ed.on_pointer_move(PointerEvent::at(to));
    ed.on_pointer_up(PointerEvent::at(to));
}

#[test]
fn test_draw_rect_scenario() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Rect);
    press_drag_release(&mut ed, PtF::new(10.0, 10.0), PtF::new(50.0, 40.0));
    assert_eq!(ed.annotations().len(), 1);
    let anno = ed.annotations().iter().next().unwrap();
    assert!((anno.figure().area() - 1200.0).abs() < 1e-9);
    assert!(anno.figure().contains(PtF::new(30.0, 30.0)));
    assert!(!anno.figure().contains(PtF::new(5.0, 5.0)));
}

#[test]
fn test_tiny_rect_is_dropped() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Rect);
    press_drag_release(&mut ed, PtF::new(10.0, 10.0), PtF::new(12.0, 12.0));
    assert!(ed.annotations().is_empty());
}

#[test]
fn test_out_of_bounds_down_is_ignored() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Rect);
    ed.on_pointer_down(PointerEvent::at(PtF::new(300.0, 300.0)));
    assert_eq!(ed.state(), ToolState::Idle);
    assert!(ed.draft().is_none());
}

#[test]
fn test_select_and_clear() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Rect);
    press_drag_release(&mut ed, PtF::new(10.0, 10.0), PtF::new(50.0, 40.0));
    press_drag_release(&mut ed, PtF::new(100.0, 100.0), PtF::new(150.0, 150.0));
    ed.set_tool(ToolKind::Select);
    ed.take_events();

    ed.on_pointer_down(PointerEvent::at(PtF::new(30.0, 30.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(30.0, 30.0)));
    let first_id = ed.annotations().selected_id().unwrap();

    // selecting the second deselects the first
    ed.on_pointer_down(PointerEvent::at(PtF::new(120.0, 120.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(120.0, 120.0)));
    let second_id = ed.annotations().selected_id().unwrap();
    assert_ne!(first_id, second_id);
    assert!(!ed.annotations().get(first_id).unwrap().is_selected());

    // a miss clears the selection
    ed.on_pointer_down(PointerEvent::at(PtF::new(190.0, 10.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(190.0, 10.0)));
    assert_eq!(ed.annotations().selected_id(), None);

    let events = ed.take_events();
    assert!(events.contains(&EngineEvent::SelectionChanged(None)));
}

#[test]
fn test_pan() {
    let mut ed = editor();
    ed.on_pointer_down(PointerEvent::pan(PtF::new(10.0, 10.0)));
    assert!(matches!(ed.state(), ToolState::Panning { .. }));
    ed.on_pointer_move(PointerEvent::pan(PtF::new(25.0, 15.0)));
    assert!(ed.viewport().pan.is_close_to(PtF::new(15.0, 5.0)));
    ed.on_pointer_up(PointerEvent::pan(PtF::new(25.0, 15.0)));
    assert_eq!(ed.state(), ToolState::Idle);
}

#[test]
fn test_zoom_routing() {
    let mut ed = editor();
    let cursor = PtF::new(50.0, 50.0);
    let anchor = ed.viewport().screen_to_image(cursor);
    ed.on_zoom(ZoomAmount::Delta(1.0), cursor);
    assert!((ed.viewport().zoom() - 1.1).abs() < 1e-9);
    assert!(ed.viewport().screen_to_image(cursor).is_close_to(anchor));
    // rejected at the limit
    let mut ed = editor();
    ed.on_zoom(ZoomAmount::Factor(MAX_ZOOM), PtF::default());
    ed.on_zoom(ZoomAmount::Delta(1.0), cursor);
    assert!((ed.viewport().zoom() - MAX_ZOOM).abs() < 1e-9);
}

#[test]
fn test_polygon_close_and_cancel() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Polygon);
    for p in [
        PtF::new(20.0, 20.0),
        PtF::new(120.0, 20.0),
        PtF::new(120.0, 120.0),
        PtF::new(20.0, 120.0),
    ] {
        ed.on_pointer_down(PointerEvent::at(p));
        ed.on_pointer_up(PointerEvent::at(p));
    }
    // the preview follows the pointer between clicks
    ed.on_pointer_move(PointerEvent::at(PtF::new(25.0, 24.0)));
    match ed.draft().unwrap().figure() {
        Figure::Polygon(poly) => {
            assert_eq!(poly.points().len(), 4);
            assert!(poly.preview().is_some());
        }
        _ => panic!("expected polygon"),
    }
    // a click near the first vertex closes
    ed.on_pointer_down(PointerEvent::at(PtF::new(25.0, 24.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(25.0, 24.0)));
    assert!(ed.draft().is_none());
    assert_eq!(ed.annotations().len(), 1);
    assert!((ed.annotations().iter().next().unwrap().figure().area() - 10000.0).abs() < 1.0);
}

#[test]
fn test_polygon_cancel_is_idempotent() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Polygon);
    ed.on_pointer_down(PointerEvent::at(PtF::new(20.0, 20.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(20.0, 20.0)));
    assert!(ed.draft().is_some());
    ed.cancel();
    assert!(ed.draft().is_none());
    assert!(ed.annotations().is_empty());
    ed.cancel();
    assert!(ed.draft().is_none());
    assert_eq!(ed.state(), ToolState::Idle);
}

#[test]
fn test_obb_draw_and_rotate() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Obb);
    press_drag_release(&mut ed, PtF::new(80.0, 90.0), PtF::new(120.0, 110.0));
    // committed OBBs stay selected so the handles are live
    let id = ed.annotations().selected_id().unwrap();
    match ed.annotations().get(id).unwrap().figure() {
        Figure::Obb(obb) => {
            assert!(obb.center().is_close_to(PtF::new(100.0, 100.0)));
            assert!((obb.angle_deg() - 0.0).abs() < 1e-9);
        }
        _ => panic!("expected obb"),
    }
    // grab the rotation handle right above the center and drag it to the right
    ed.on_pointer_down(PointerEvent::at(PtF::new(100.0, 70.0)));
    assert!(matches!(ed.state(), ToolState::RotatingObb { .. }));
    ed.on_pointer_move(PointerEvent::at(PtF::new(130.0, 100.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(130.0, 100.0)));
    match ed.annotations().get(id).unwrap().figure() {
        Figure::Obb(obb) => assert!((obb.angle_deg() - 90.0).abs() < 1e-6),
        _ => panic!("expected obb"),
    }
    assert_eq!(ed.state(), ToolState::Idle);
}

#[test]
fn test_obb_corner_drag() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Obb);
    press_drag_release(&mut ed, PtF::new(80.0, 90.0), PtF::new(120.0, 110.0));
    // corner 2 sits at (120, 110), pull it outward
    ed.on_pointer_down(PointerEvent::at(PtF::new(120.0, 110.0)));
    assert!(matches!(ed.state(), ToolState::DraggingObbCorner { corner: 2, .. }));
    ed.on_pointer_move(PointerEvent::at(PtF::new(120.0, 130.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(120.0, 130.0)));
    let id = ed.annotations().selected_id().unwrap();
    match ed.annotations().get(id).unwrap().figure() {
        Figure::Obb(obb) => assert!((obb.h() - 40.0).abs() < 1e-9),
        _ => panic!("expected obb"),
    }
}

#[test]
fn test_keypoint_flow() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Keypoints);
    // two clicks place nose and left eye
    for p in [PtF::new(50.0, 50.0), PtF::new(100.0, 100.0)] {
        ed.on_pointer_down(PointerEvent::at(p));
        ed.on_pointer_up(PointerEvent::at(p));
    }
    // a click on the nose cycles it to occluded instead of placing
    ed.on_pointer_down(PointerEvent::at(PtF::new(52.0, 50.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(52.0, 50.0)));
    match ed.draft().unwrap().figure() {
        Figure::Keypoints(set) => {
            assert_eq!(set.n_annotated(), 2);
            assert_eq!(
                set.keypoints()[0].visibility,
                annolab_domain::KeypointVisibility::Occluded
            );
        }
        _ => panic!("expected keypoints"),
    }
    ed.finish_draft();
    assert_eq!(ed.annotations().len(), 1);

    // dragging a keypoint of the selected annotation moves it
    let id = ed.annotations().iter().next().unwrap().id();
    ed.take_events();
    ed.on_pointer_down(PointerEvent::at(PtF::new(100.0, 100.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(100.0, 100.0)));
    assert_eq!(ed.annotations().selected_id(), Some(id));
    ed.on_pointer_down(PointerEvent::at(PtF::new(100.0, 100.0)));
    assert!(matches!(ed.state(), ToolState::DraggingKeypoint { .. }));
    ed.on_pointer_move(PointerEvent::at(PtF::new(130.0, 130.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(130.0, 130.0)));
    match ed.annotations().get(id).unwrap().figure() {
        Figure::Keypoints(set) => {
            assert!(set.keypoints()[1].pos.is_close_to(PtF::new(130.0, 130.0)));
        }
        _ => panic!("expected keypoints"),
    }
}

#[test]
fn test_undo_redo_via_editor() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Rect);
    press_drag_release(&mut ed, PtF::new(10.0, 10.0), PtF::new(50.0, 40.0));
    assert_eq!(ed.annotations().len(), 1);
    ed.undo();
    assert!(ed.annotations().is_empty());
    ed.redo();
    assert_eq!(ed.annotations().len(), 1);
}

#[test]
fn test_cfg_defaults_flow_into_drafts() {
    let mut cfg = Cfg::default();
    cfg.default_label = "tree".to_string();
    cfg.default_stroke_width = 3.5;
    let mut ed = Editor::with_cfg(ShapeI::new(100, 100), &cfg);
    ed.set_tool(ToolKind::Rect);
    press_drag_release(&mut ed, PtF::new(10.0, 10.0), PtF::new(60.0, 60.0));
    let anno = ed.annotations().iter().next().unwrap();
    assert_eq!(anno.label, "tree");
    assert!((anno.stroke_width - 3.5).abs() < 1e-9);
}

#[test]
fn test_remove_selected() {
    let mut ed = editor();
    ed.set_tool(ToolKind::Rect);
    press_drag_release(&mut ed, PtF::new(10.0, 10.0), PtF::new(50.0, 40.0));
    ed.set_tool(ToolKind::Select);
    ed.on_pointer_down(PointerEvent::at(PtF::new(30.0, 30.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(30.0, 30.0)));
    ed.remove_selected();
    assert!(ed.annotations().is_empty());
    // removing with nothing selected is a no-op
    ed.remove_selected();
    assert!(ed.annotations().is_empty());
}
