use annolab::{
    dota_line, tracing_setup::init_tracing_for_tests, yolo_obb_line, yolo_pose_line, Annotation,
    Editor, EngineEvent, Figure, KeypointSet, Obb, PointerEvent, Project, ProjectImage, PtF,
    ShapeF, ShapeI, ToolKind, ZoomAmount,
};

fn click(ed: &mut Editor, p: PtF) {
    ed.on_pointer_down(PointerEvent::at(p));
    ed.on_pointer_up(PointerEvent::at(p));
}

fn drag(ed: &mut Editor, from: PtF, to: PtF) {
    ed.on_pointer_down(PointerEvent::at(from));
    ed.on_pointer_move(PointerEvent::at(to));
    ed.on_pointer_up(PointerEvent::at(to));
}

/// Draw on an image, persist the project, reload it and export, the full path
/// through the engine.
#[test]
fn test_draw_save_export() {
    init_tracing_for_tests();
    let mut prj = Project::new("session");
    prj.label_info.push("person".to_string(), None).unwrap();
    prj.label_info.push("car".to_string(), None).unwrap();

    let mut ed = Editor::new(ShapeI::new(200, 200));
    ed.current_label = "car".to_string();

    ed.set_tool(ToolKind::Rect);
    drag(&mut ed, PtF::new(10.0, 10.0), PtF::new(50.0, 40.0));
    ed.set_tool(ToolKind::Obb);
    drag(&mut ed, PtF::new(80.0, 90.0), PtF::new(120.0, 110.0));
    assert_eq!(ed.annotations().len(), 2);

    let mut image = ProjectImage::new("street.png", 200, 200);
    image.annotations = ed.take_annotations();
    prj.add_image(image);

    let json = prj.to_json().unwrap();
    let read = Project::from_json(&json).unwrap();
    assert_eq!(read, prj);

    let label_map = read.label_info.label_map();
    let image = read.image_by_file_name("street.png").unwrap();
    let lines: Vec<String> = image
        .annotations
        .iter()
        .filter_map(|a| yolo_obb_line(a, image.shape(), &label_map))
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.starts_with("1 ")));

    let dota: Vec<String> = image
        .annotations
        .iter()
        .filter_map(|a| dota_line(a, &label_map, 0))
        .collect();
    assert_eq!(dota.len(), 2);
    assert!(dota.iter().all(|l| l.ends_with("car 0")));
}

/// The OBB scenario, a box rotated by 90 degrees via its handle exports with
/// normalized angle 0.5.
#[test]
fn test_obb_rotation_to_export() {
    init_tracing_for_tests();
    let mut ed = Editor::new(ShapeI::new(200, 200));
    ed.set_tool(ToolKind::Obb);
    drag(&mut ed, PtF::new(80.0, 90.0), PtF::new(120.0, 110.0));

    // the fresh OBB is selected, its rotation handle sits 30 screen pixels
    // above the center
    ed.on_pointer_down(PointerEvent::at(PtF::new(100.0, 70.0)));
    ed.on_pointer_move(PointerEvent::at(PtF::new(130.0, 100.0)));
    ed.on_pointer_up(PointerEvent::at(PtF::new(130.0, 100.0)));

    let anno = ed.annotations().iter().next().unwrap();
    match anno.figure() {
        Figure::Obb(obb) => {
            assert!((obb.angle_deg() - 90.0).abs() < 1e-6);
            let corners = obb.corners();
            assert!(corners[0].is_close_to(PtF::new(110.0, 80.0)));
            assert!(corners[1].is_close_to(PtF::new(110.0, 120.0)));
            assert!(corners[2].is_close_to(PtF::new(90.0, 120.0)));
            assert!(corners[3].is_close_to(PtF::new(90.0, 80.0)));
        }
        _ => panic!("expected obb"),
    }
    let line = yolo_obb_line(anno, ShapeI::new(200, 200), &Default::default()).unwrap();
    let angle_field = line.split_whitespace().last().unwrap();
    assert_eq!(angle_field, "0.500000");
}

/// Zoomed and panned drawing still lands in image coordinates.
#[test]
fn test_drawing_through_transformed_viewport() {
    init_tracing_for_tests();
    let mut ed = Editor::new(ShapeI::new(200, 200));
    ed.fit_to_window(ShapeF::new(400.0, 400.0));
    assert!((ed.viewport().zoom() - 2.0).abs() < 1e-9);

    ed.set_tool(ToolKind::Rect);
    // screen (20, 20) to (100, 80) is image (10, 10) to (50, 40) at zoom 2
    drag(&mut ed, PtF::new(20.0, 20.0), PtF::new(100.0, 80.0));
    let anno = ed.annotations().iter().next().unwrap();
    assert!((anno.figure().area() - 1200.0).abs() < 1e-9);
    assert!(anno.figure().contains(PtF::new(30.0, 30.0)));

    // wheel zoom keeps the cursor anchored
    let cursor = PtF::new(123.0, 77.0);
    let anchor = ed.viewport().screen_to_image(cursor);
    ed.on_zoom(ZoomAmount::Delta(-1.0), cursor);
    assert!(ed.viewport().screen_to_image(cursor).is_close_to(anchor));
}

/// Keypoint drafting, committing and pose export with the derived box.
#[test]
fn test_keypoint_to_pose_export() {
    init_tracing_for_tests();
    let mut ed = Editor::new(ShapeI::new(200, 200));
    ed.current_label = "person".to_string();
    ed.set_tool(ToolKind::Keypoints);
    click(&mut ed, PtF::new(80.0, 40.0)); // nose
    click(&mut ed, PtF::new(120.0, 80.0)); // left_eye
    ed.finish_draft();
    assert!(ed.draft().is_none());
    assert_eq!(ed.annotations().len(), 1);

    let anno = ed.annotations().iter().next().unwrap();
    let map = [("person".to_string(), 0)].into_iter().collect();
    let line = yolo_pose_line(anno, ShapeI::new(200, 200), &map).unwrap();
    let fields: Vec<&str> = line.split_whitespace().collect();
    assert_eq!(fields.len(), 5 + 17 * 3);
    // center of the padded box is the keypoint center
    assert_eq!(fields[1], "0.500000");
    assert_eq!(fields[2], "0.300000");
    // nose triplet
    assert_eq!(&fields[5..8], &["0.400000", "0.200000", "2"]);
}

/// Events reach the host in order and the draft notifications fire while
/// drawing.
#[test]
fn test_event_stream() {
    init_tracing_for_tests();
    let mut ed = Editor::new(ShapeI::new(200, 200));
    ed.set_tool(ToolKind::Rect);
    ed.on_pointer_down(PointerEvent::at(PtF::new(10.0, 10.0)));
    assert!(ed.take_events().contains(&EngineEvent::DraftChanged));
    ed.on_pointer_move(PointerEvent::at(PtF::new(50.0, 40.0)));
    assert!(ed.take_events().contains(&EngineEvent::DraftChanged));
    ed.on_pointer_up(PointerEvent::at(PtF::new(50.0, 40.0)));
    let events = ed.take_events();
    assert!(events.contains(&EngineEvent::AnnotationsChanged));
    assert!(ed.take_events().is_empty());
}

/// Cancelling mid-draw leaves the committed collection untouched.
#[test]
fn test_cancel_preserves_committed() {
    init_tracing_for_tests();
    let mut ed = Editor::new(ShapeI::new(200, 200));
    ed.set_tool(ToolKind::Rect);
    drag(&mut ed, PtF::new(10.0, 10.0), PtF::new(50.0, 40.0));
    assert_eq!(ed.annotations().len(), 1);

    ed.set_tool(ToolKind::Polygon);
    click(&mut ed, PtF::new(100.0, 100.0));
    click(&mut ed, PtF::new(150.0, 100.0));
    assert!(ed.draft().is_some());
    ed.cancel();
    ed.cancel();
    assert!(ed.draft().is_none());
    assert_eq!(ed.annotations().len(), 1);
}

/// A detached clone is an independent annotation.
#[test]
fn test_clone_independence() {
    let anno = Annotation::new(
        Figure::Obb(Obb::new(PtF::new(10.0, 10.0), 8.0, 4.0, 0.0)),
        "a",
        "#00FF00",
    );
    let mut clone = anno.clone_detached();
    clone.edit_figure(|fig| {
        if let Figure::Obb(obb) = fig {
            obb.rotate(45.0);
        }
    });
    match (anno.figure(), clone.figure()) {
        (Figure::Obb(orig), Figure::Obb(rotated)) => {
            assert!((orig.angle_deg() - 0.0).abs() < 1e-9);
            assert!((rotated.angle_deg() - 45.0).abs() < 1e-9);
        }
        _ => panic!("expected obbs"),
    }
}

/// A pose seeded from the template is exportable right away.
#[test]
fn test_seeded_pose_exports_all_keypoints() {
    let set = KeypointSet::seed_pose(PtF::new(100.0, 150.0));
    let anno = Annotation::new(Figure::Keypoints(set), "person", "#0000FF");
    let line = yolo_pose_line(&anno, ShapeI::new(300, 300), &Default::default()).unwrap();
    let fields: Vec<&str> = line.split_whitespace().collect();
    let visibilities: Vec<&str> = fields[5..].chunks(3).map(|c| c[2]).collect();
    assert!(visibilities.iter().all(|v| *v == "2"));
}
