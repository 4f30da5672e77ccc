#![allow(clippy::float_cmp, clippy::cast_possible_truncation)]

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::json;
use time::macros::datetime;

use super::*;
use crate::camera::ImageCoord;

// =============================================================
// Helpers
// =============================================================

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Rgba([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 90, 255]))
}

fn png_file(name: &str, width: u32, height: u32) -> ImageFile {
    let mut bytes = Vec::new();
    gradient(width, height).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    ImageFile::new(name, "image/png", bytes)
}

/// Core with a `width` x `height` image shown in an identically sized canvas.
fn core_with_image(width: u32, height: u32) -> EngineCore {
    let mut core = EngineCore::new();
    core.set_viewport(f64::from(width), f64::from(height));
    core.load_image(ImageSession::from_rgba("scan.png", &gradient(width, height)).unwrap());
    core
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn click(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    let mut actions = core.on_pointer_down(pt(x, y), Button::Primary);
    actions.extend(core.on_pointer_up(pt(x, y), Button::Primary));
    actions
}

fn drag(core: &mut EngineCore, points: &[(f64, f64)]) -> Vec<Action> {
    let Some(((x0, y0), rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut actions = core.on_pointer_down(pt(*x0, *y0), Button::Primary);
    if let Some(((xn, yn), moves)) = rest.split_last() {
        for (x, y) in moves {
            actions.extend(core.on_pointer_move(pt(*x, *y)));
        }
        actions.extend(core.on_pointer_up(pt(*xn, *yn), Button::Primary));
    } else {
        actions.extend(core.on_pointer_up(pt(*x0, *y0), Button::Primary));
    }
    actions
}

fn committed(actions: &[Action]) -> Vec<&Annotation> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::AnnotationAdded(ann) => Some(ann),
            _ => None,
        })
        .collect()
}

// =============================================================
// Point tool
// =============================================================

#[test]
fn pointer_down_without_image_is_ignored() {
    let mut core = EngineCore::new();
    core.set_viewport(100.0, 100.0);
    assert!(click(&mut core, 10.0, 10.0).is_empty());
    assert!(core.doc.is_empty());
}

#[test]
fn clicks_number_markers_in_order() {
    let mut core = core_with_image(100, 80);
    let mut numbers = Vec::new();
    for i in 0..5 {
        for action in click(&mut core, 10.0 + f64::from(i) * 10.0, 20.0) {
            if let Action::MarkerAdded { number, .. } = action {
                numbers.push(number);
            }
        }
    }
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    let stored: Vec<usize> = core.doc.numbered_markers().map(|(n, _)| n).collect();
    assert_eq!(stored, vec![1, 2, 3, 4, 5]);
    assert_eq!(core.doc.markers()[2].coord(), ImageCoord::new(30, 20));
    assert!(core.doc.markers().iter().all(|m| m.id.starts_with("marker-")));
}

#[test]
fn click_maps_through_the_letterbox() {
    // 100x80 image in a 200x200 canvas: draw 200x160, offset_y 20.
    let mut core = core_with_image(100, 80);
    core.set_viewport(200.0, 200.0);
    click(&mut core, 100.0, 100.0);
    assert_eq!(core.doc.markers()[0].coord(), ImageCoord::new(50, 40));
}

#[test]
fn click_in_letterbox_band_changes_nothing() {
    let mut core = core_with_image(100, 80);
    core.set_viewport(200.0, 200.0);
    click(&mut core, 100.0, 5.0);
    core.ui.tool = Tool::Line;
    let actions = core.on_pointer_down(pt(100.0, 195.0), Button::Primary);
    assert!(actions.is_empty());
    assert!(core.doc.is_empty());
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn non_primary_buttons_are_ignored() {
    let mut core = core_with_image(100, 80);
    assert!(core.on_pointer_down(pt(10.0, 10.0), Button::Secondary).is_empty());
    assert!(core.on_pointer_down(pt(10.0, 10.0), Button::Middle).is_empty());
    assert!(core.doc.is_empty());
}

// =============================================================
// Drag tools
// =============================================================

#[test]
fn line_drag_commits_expected_json() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Line);
    let actions = drag(&mut core, &[(10.0, 10.0), (30.0, 30.0), (50.0, 60.0)]);
    let anns = committed(&actions);
    assert_eq!(anns.len(), 1);

    let mut value = serde_json::to_value(anns[0]).unwrap();
    let id = value["id"].as_str().unwrap().to_owned();
    assert!(id.starts_with("annotation-"));
    value["id"] = json!("annotation-1");
    assert_eq!(
        value,
        json!({
            "id": "annotation-1",
            "type": "line",
            "x": 10,
            "y": 10,
            "endX": 50,
            "endY": 60,
            "strokeColor": "#2563EB",
            "strokeWidth": 2,
        })
    );
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn line_without_moves_ends_at_release() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Line);
    drag(&mut core, &[(10.0, 10.0), (20.0, 15.0)]);
    assert_eq!(core.doc.annotations()[0].shape, Shape::Line { x: 10, y: 10, end_x: 20, end_y: 15 });
}

#[test]
fn circle_drag_commits_centre_and_edge() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Circle);
    drag(&mut core, &[(40.0, 40.0), (45.0, 40.0), (50.0, 40.0)]);
    assert_eq!(core.doc.annotations()[0].shape, Shape::Circle { x: 40, y: 40, end_x: 50, end_y: 40 });
}

#[test]
fn single_sample_freehand_degrades_to_point() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Freehand);
    core.on_pointer_down(pt(7.0, 9.0), Button::Primary);
    let actions = core.on_pointer_up(pt(7.0, 9.0), Button::Primary);
    let anns = committed(&actions);
    assert_eq!(anns[0].shape, Shape::Point { x: 7, y: 9 });
    assert_eq!(serde_json::to_value(anns[0]).unwrap()["type"], "point");
}

#[test]
fn freehand_path_includes_down_moves_and_release() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Freehand);
    drag(&mut core, &[(1.0, 1.0), (2.0, 3.0), (4.0, 5.0), (6.0, 7.0)]);
    let Shape::Freehand { path } = &core.doc.annotations()[0].shape else {
        panic!("expected freehand");
    };
    let coords: Vec<ImageCoord> = path.iter().map(PixelPoint::coord).collect();
    assert_eq!(
        coords,
        vec![ImageCoord::new(1, 1), ImageCoord::new(2, 3), ImageCoord::new(4, 5), ImageCoord::new(6, 7)]
    );
}

#[test]
fn drag_samples_are_clamped_into_the_image() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Line);
    drag(&mut core, &[(90.0, 70.0), (150.0, -40.0)]);
    assert_eq!(core.doc.annotations()[0].shape, Shape::Line { x: 90, y: 70, end_x: 99, end_y: 0 });
}

#[test]
fn pointer_leave_discards_the_drag() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Freehand);
    core.on_pointer_down(pt(1.0, 1.0), Button::Primary);
    core.on_pointer_move(pt(5.0, 5.0));
    let actions = core.on_pointer_leave();
    assert_eq!(actions, vec![Action::GestureDiscarded, Action::RenderNeeded]);
    assert!(core.on_pointer_up(pt(5.0, 5.0), Button::Primary).is_empty());
    assert!(core.doc.annotations().is_empty());
}

#[test]
fn pointer_leave_when_idle_is_silent() {
    let mut core = core_with_image(10, 10);
    assert!(core.on_pointer_leave().is_empty());
}

#[test]
fn moves_without_a_drag_are_ignored() {
    let mut core = core_with_image(100, 80);
    assert!(core.on_pointer_move(pt(10.0, 10.0)).is_empty());
}

#[test]
fn changing_tool_mid_drag_discards() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Line);
    core.on_pointer_down(pt(1.0, 1.0), Button::Primary);
    let actions = core.set_tool(Tool::Circle);
    assert!(actions.contains(&Action::GestureDiscarded));
    assert_eq!(core.input, InputState::Idle);
    assert_eq!(core.ui.tool, Tool::Circle);
}

#[test]
fn style_is_captured_at_pointer_down() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Line);
    core.on_pointer_down(pt(1.0, 1.0), Button::Primary);
    core.set_stroke_color(HexColor::rgb(0xDC, 0x26, 0x26));
    core.set_stroke_width(8).unwrap();
    core.on_pointer_up(pt(9.0, 9.0), Button::Primary);

    let ann = &core.doc.annotations()[0];
    assert_eq!(ann.stroke_color.to_string(), "#2563EB");
    assert_eq!(ann.stroke_width, 2);
    assert_eq!(core.ui.stroke.width, 8);
}

#[test]
fn preview_shows_live_shape_with_captured_style() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Circle);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    assert!(core.preview().is_none());
    core.on_pointer_move(pt(20.0, 10.0));
    let (shape, style) = core.preview().unwrap();
    assert_eq!(shape, Shape::Circle { x: 10, y: 10, end_x: 20, end_y: 10 });
    assert_eq!(style, StrokeStyle::default());
}

#[test]
fn stroke_width_out_of_range_keeps_previous() {
    let mut core = EngineCore::new();
    assert_eq!(core.set_stroke_width(11), Err(StyleError::WidthOutOfRange(11)));
    assert_eq!(core.set_stroke_width(0), Err(StyleError::WidthOutOfRange(0)));
    assert_eq!(core.ui.stroke.width, 2);
}

// =============================================================
// Editing
// =============================================================

#[test]
fn remove_marker_renumbers() {
    let mut core = core_with_image(100, 80);
    click(&mut core, 1.0, 1.0);
    click(&mut core, 2.0, 2.0);
    click(&mut core, 3.0, 3.0);
    let actions = core.remove_marker(0);
    assert!(matches!(actions[0], Action::MarkerRemoved { index: 0, .. }));
    let numbered: Vec<(usize, ImageCoord)> = core.doc.numbered_markers().map(|(n, m)| (n, m.coord())).collect();
    assert_eq!(numbered, vec![(1, ImageCoord::new(2, 2)), (2, ImageCoord::new(3, 3))]);
    assert!(core.remove_marker(5).is_empty());
}

#[test]
fn remove_annotation_by_id() {
    let mut core = core_with_image(100, 80);
    core.set_tool(Tool::Line);
    drag(&mut core, &[(1.0, 1.0), (5.0, 5.0)]);
    let id = core.doc.annotations()[0].id.clone();
    assert!(matches!(core.remove_annotation(&id)[0], Action::AnnotationRemoved(_)));
    assert!(core.remove_annotation(&id).is_empty());
}

#[test]
fn clear_all_empties_document() {
    let mut core = core_with_image(100, 80);
    click(&mut core, 1.0, 1.0);
    assert_eq!(core.clear_all(), vec![Action::Cleared, Action::RenderNeeded]);
    assert!(core.doc.is_empty());
}

#[test]
fn resize_keeps_image_space_coordinates() {
    let mut core = core_with_image(100, 80);
    click(&mut core, 50.0, 40.0);
    core.set_viewport(400.0, 100.0);
    assert_eq!(core.doc.markers()[0].coord(), ImageCoord::new(50, 40));
    let screen = core.camera().unwrap().image_to_screen(ImageCoord::new(50, 40)).unwrap();
    // 400x100 canvas fits the image at 125x100, centred at offset_x 137.5.
    assert_eq!(screen, Point::new(200.0, 50.0));
}

// =============================================================
// Upload
// =============================================================

#[test]
fn upload_replaces_image_and_clears_document() {
    let mut engine = Engine::new();
    engine.set_viewport(100.0, 80.0);
    engine.upload(&png_file("first.png", 100, 80)).unwrap();
    engine.on_pointer_down(pt(5.0, 5.0), Button::Primary);
    assert_eq!(engine.core.doc.markers().len(), 1);

    let actions = engine.upload(&png_file("second.png", 40, 30)).unwrap();
    assert!(matches!(&actions[0], Action::ImageLoaded(info) if info.name == "second.png"));
    assert!(engine.core.doc.is_empty());
    assert_eq!(engine.core.image().map(ImageSession::width), Some(40));
    assert!(!engine.core.upload_in_progress());
}

#[test]
fn failed_decode_keeps_previous_document() {
    let mut engine = Engine::new();
    engine.set_viewport(100.0, 80.0);
    engine.upload(&png_file("first.png", 100, 80)).unwrap();
    engine.on_pointer_down(pt(5.0, 5.0), Button::Primary);

    let broken = ImageFile::new("broken.png", "image/png", vec![1, 2, 3]);
    assert!(matches!(engine.upload(&broken), Err(UploadError::Decode(_))));
    assert_eq!(engine.core.doc.markers().len(), 1);
    assert_eq!(engine.core.image().map(ImageSession::name), Some("first.png"));
    assert!(!engine.core.upload_in_progress());
}

#[test]
fn invalid_upload_changes_nothing() {
    let mut engine = Engine::new();
    let text = ImageFile::new("notes.txt", "text/plain", vec![1, 2, 3]);
    assert!(matches!(engine.upload(&text), Err(UploadError::UnsupportedType { .. })));
    assert!(engine.core.image().is_none());
}

#[test]
fn second_upload_while_loading_is_busy() {
    let mut core = EngineCore::new();
    let file = png_file("a.png", 4, 4);
    core.begin_upload(&file).unwrap();
    assert_eq!(core.begin_upload(&file), Err(UploadError::Busy));
    let decoded = ImageSession::decode(&file);
    core.finish_upload(decoded).unwrap();
    assert!(core.begin_upload(&file).is_ok());
}

// =============================================================
// Export / import
// =============================================================

fn annotated_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_viewport(64.0, 48.0);
    engine.upload(&png_file("scan.png", 64, 48)).unwrap();
    engine.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    engine.on_pointer_down(pt(30.0, 20.0), Button::Primary);
    for (tool, points) in [
        (Tool::Line, vec![(5.0, 40.0), (60.0, 5.0)]),
        (Tool::Circle, vec![(32.0, 24.0), (40.0, 24.0)]),
        (Tool::Freehand, vec![(2.0, 2.0), (8.0, 4.0), (12.0, 9.0), (20.0, 12.0)]),
    ] {
        engine.set_tool(tool);
        drag(&mut engine.core, &points);
    }
    engine
}

#[test]
fn export_carries_image_and_document() {
    let engine = annotated_engine();
    let doc = engine.core.export(datetime!(2024-05-06 07:08:09 UTC)).unwrap();
    let info = doc.image.as_ref().unwrap();
    assert_eq!((info.name.as_str(), info.size.width, info.size.height), ("scan.png", 64, 48));
    assert_eq!(doc.markers.len(), 2);
    assert_eq!(doc.annotations.len(), 3);
    assert_eq!(doc.file_name(), "pixel-marker-data-2024-05-06.json");
}

#[test]
fn export_then_import_renders_identically() {
    let original = annotated_engine();
    let before = original.render_native().unwrap();
    let json = original.export_now().unwrap().to_json_pretty().unwrap();

    let mut restored = Engine::new();
    restored.set_viewport(64.0, 48.0);
    restored.upload(&png_file("scan.png", 64, 48)).unwrap();
    restored.core.import(ExportDocument::from_json(&json).unwrap()).unwrap();
    let after = restored.render_native().unwrap();

    assert_eq!(restored.core.doc.markers(), original.core.doc.markers());
    assert_eq!(restored.core.doc.annotations(), original.core.doc.annotations());
    assert_eq!(before.data(), after.data());
}

#[test]
fn import_requires_an_image() {
    let doc = annotated_engine().core.export(datetime!(2024-01-01 0:00 UTC)).unwrap();
    let mut core = EngineCore::new();
    assert_eq!(core.import(doc), Err(ImportError::NoImage));
}

#[test]
fn import_size_mismatch_leaves_state_alone() {
    let doc = annotated_engine().core.export(datetime!(2024-01-01 0:00 UTC)).unwrap();
    let mut core = core_with_image(32, 32);
    click(&mut core, 1.0, 1.0);
    assert!(matches!(core.import(doc), Err(ImportError::SizeMismatch { .. })));
    assert_eq!(core.doc.markers().len(), 1);
}

// =============================================================
// Render
// =============================================================

#[test]
fn render_sizes_frame_to_viewport() {
    let mut engine = annotated_engine();
    engine.set_viewport(120.5, 90.0);
    let frame = engine.render().unwrap();
    assert_eq!((frame.width(), frame.height()), (121, 90));
}

#[test]
fn render_with_empty_viewport_fails() {
    let mut engine = Engine::new();
    assert!(matches!(engine.render(), Err(RenderError::Allocate { .. })));
}

#[test]
fn render_native_needs_an_image() {
    assert!(matches!(Engine::new().render_native(), Err(RenderError::NoImage)));
}
