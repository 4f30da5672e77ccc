use canvas::export::ExportDocument;

use super::*;

const DOC: &str = r##"{
  "image": { "name": "scan.png", "size": { "width": 100, "height": 80 } },
  "markers": [ { "x": 10, "y": 10, "id": "marker-1" } ],
  "annotations": [
    { "id": "a-1", "type": "line", "x": 10, "y": 10, "endX": 50, "endY": 60, "strokeColor": "#2563EB", "strokeWidth": 2 },
    { "id": "a-2", "type": "point", "x": 5, "y": 5, "strokeColor": "#DC2626", "strokeWidth": 3 },
    { "id": "a-3", "type": "line", "x": 0, "y": 0, "endX": 99, "endY": 79, "strokeColor": "#000000", "strokeWidth": 1 }
  ],
  "exportDate": "2025-12-01T09:30:00Z"
}"##;

#[test]
fn summary_counts_by_kind() {
    let summary = summarize(&ExportDocument::from_json(DOC).unwrap());
    assert_eq!(summary.markers, 1);
    assert_eq!(summary.annotations.get("line"), Some(&2));
    assert_eq!(summary.annotations.get("point"), Some(&1));
    assert_eq!(summary.file_name, "pixel-marker-data-2025-12-01.json");
    assert_eq!(summary.check, Ok(()));

    let text = summary.to_string();
    assert!(text.contains("image: scan.png (100x80)"));
    assert!(text.contains("annotations: 3 (line 2, point 1)"));
    assert!(text.ends_with("check: ok"));
}

#[test]
fn out_of_bounds_is_reported() {
    let raw = DOC.replace("\"endX\": 99", "\"endX\": 100");
    let summary = summarize(&ExportDocument::from_json(&raw).unwrap());
    assert!(summary.check.is_err());
}

#[test]
fn data_without_image_is_flagged() {
    let raw = r#"{"image":null,"markers":[{"x":1,"y":1,"id":"m"}],"annotations":[],"exportDate":"2025-12-01T09:30:00Z"}"#;
    let summary = summarize(&ExportDocument::from_json(raw).unwrap());
    assert_eq!(summary.check, Err("document has data but no image".to_owned()));
    assert!(summary.to_string().starts_with("image: none"));
}
