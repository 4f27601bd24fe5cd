//! End-to-end tests for merging skeletons into existing documents

use excalidraw_skeleton::document::{decode_index, BoundElement};
use excalidraw_skeleton::{
    convert_with_tokens, ConvertConfig, ConvertError, ConvertOutput, RandomTokens, SequentialTokens,
    WarningCategory,
};
use pretty_assertions::assert_eq;

/// Two shapes, the first labelled, joined by a connector
const EXISTING: &str = r##"{
    "type": "excalidraw",
    "version": 2,
    "source": "https://excalidraw.com",
    "elements": [
        {
            "id": "shapeX", "type": "rectangle", "x": 0, "y": 0, "width": 200, "height": 80,
            "strokeColor": "#1971c2", "index": "a0",
            "boundElements": [{"id": "labelX", "type": "text"}, {"id": "conn", "type": "arrow"}]
        },
        {
            "id": "labelX", "type": "text", "x": 80, "y": 30, "width": 40, "height": 20,
            "text": "X", "originalText": "X", "containerId": "shapeX", "index": "a1"
        },
        {
            "id": "shapeY", "type": "rectangle", "x": 400, "y": 0, "width": 200, "height": 80,
            "index": "a2", "customData": {"owner": "ops"},
            "boundElements": [{"id": "conn", "type": "arrow"}]
        },
        {
            "id": "conn", "type": "arrow", "x": 100, "y": 40, "width": 400, "height": 0,
            "points": [[0, 0], [400, 0]], "index": "a3",
            "startBinding": {"elementId": "shapeX", "fixedPoint": [1, 0.5], "mode": "orbit"},
            "endBinding": {"elementId": "shapeY", "fixedPoint": [0, 0.5], "mode": "orbit"}
        },
        {
            "id": "old", "type": "ellipse", "x": 0, "y": 600, "isDeleted": true
        }
    ],
    "appState": {"viewBackgroundColor": "#ffffff"},
    "files": {}
}"##;

fn edit(source: &str) -> ConvertOutput {
    convert_with_tokens(source, Some(EXISTING), &ConvertConfig::default(), &mut SequentialTokens::new())
        .expect("Should convert")
}

fn ids(output: &ConvertOutput) -> Vec<&str> {
    output.document.elements.iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn test_remove_shape_takes_its_label_and_unbinds_connector() {
    let output = edit(r#"{"remove": ["shapeX"], "elements": []}"#);
    assert_eq!(ids(&output), vec!["shapeY", "conn"]);

    let conn = output.document.find("conn").unwrap();
    let linear = conn.linear().unwrap();
    assert_eq!(linear.start_binding, None);
    assert_eq!(linear.end_binding.as_ref().unwrap().element_id, "shapeY");
    // Geometry of the surviving connector is untouched
    assert_eq!(linear.points, vec![[0.0, 0.0], [400.0, 0.0]]);
    assert_eq!((conn.x, conn.y), (100.0, 40.0));
}

#[test]
fn test_remove_connector_clears_back_references() {
    let output = edit(r#"{"remove": ["conn"], "elements": []}"#);
    assert_eq!(ids(&output), vec!["shapeX", "labelX", "shapeY"]);

    let x = output.document.find("shapeX").unwrap();
    assert_eq!(x.bound_elements, Some(vec![BoundElement::text("labelX")]));
    let y = output.document.find("shapeY").unwrap();
    assert_eq!(y.bound_elements, Some(Vec::new()));
}

#[test]
fn test_deleted_elements_are_dropped() {
    let output = edit(r#"{"elements": []}"#);
    assert!(output.document.find("old").is_none());
    assert_eq!(output.document.element_count(), 4);
}

#[test]
fn test_prior_fields_carried_forward() {
    let output = edit(r#"{"elements": []}"#);
    let value = serde_json::to_value(&output.document).unwrap();
    let y = &value["elements"][2];
    assert_eq!(y["id"], "shapeY");
    assert_eq!(y["customData"]["owner"], "ops");
    assert_eq!(value["elements"][0]["strokeColor"], "#1971c2");
}

#[test]
fn test_new_elements_appended_after_prior() {
    let output = edit(
        r#"{"elements": [
            {"type": "ellipse", "id": "cache", "x": 0, "y": 300, "label": "Cache"}
        ]}"#,
    );
    let kinds: Vec<&str> = output.document.elements.iter().map(|e| e.kind.name()).collect();
    assert_eq!(kinds, vec!["rectangle", "text", "rectangle", "arrow", "ellipse", "text"]);
    for (position, el) in output.document.elements.iter().enumerate() {
        assert_eq!(decode_index(&el.index), Some(position), "{}", el.id);
    }
}

#[test]
fn test_connector_binds_to_existing_shape() {
    let output = edit(
        r#"{"elements": [
            {"type": "ellipse", "id": "cache", "x": 0, "y": 300},
            {"type": "arrow", "id": "link", "from": "shapeY", "to": "cache"}
        ]}"#,
    );

    // Referencing an element of the existing document is only a warning
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].category, WarningCategory::UnknownReference);

    let doc = &output.document;
    let cache = doc.elements.iter().find(|e| e.kind.name() == "ellipse").unwrap();
    let link = doc.elements.iter().find(|e| e.kind.name() == "arrow" && e.id != "conn").unwrap();
    let linear = link.linear().unwrap();

    // shapeY center (500, 40), cache center (100, 340): horizontal dominates
    assert_eq!((link.x, link.y), (500.0, 40.0));
    assert_eq!(linear.points, vec![[0.0, 0.0], [-400.0, 300.0]]);
    let start = linear.start_binding.as_ref().unwrap();
    assert_eq!(start.element_id, "shapeY");
    assert_eq!(start.fixed_point, Some([0.0, 0.5]));
    let end = linear.end_binding.as_ref().unwrap();
    assert_eq!(end.element_id, cache.id);
    assert_eq!(end.fixed_point, Some([1.0, 0.5]));

    let y = doc.find("shapeY").unwrap();
    assert!(y.bound_elements.iter().flatten().any(|b| b.id == link.id));
    assert!(cache.bound_elements.iter().flatten().any(|b| b.id == link.id));
}

#[test]
fn test_new_connector_to_removed_shape_is_unbound() {
    let output = edit(
        r#"{"remove": ["shapeX"], "elements": [
            {"type": "arrow", "id": "late", "from": "shapeX", "to": "shapeY"}
        ]}"#,
    );
    let late = output.document.elements.last().unwrap();
    let linear = late.linear().unwrap();
    assert_eq!(linear.start_binding, None);
    assert_eq!(linear.end_binding.as_ref().unwrap().element_id, "shapeY");
    assert!(output.document.find("shapeX").is_none());
}

#[test]
fn test_unknown_removal_is_ignored() {
    let output = edit(r#"{"remove": ["nothing-here"], "elements": []}"#);
    assert_eq!(ids(&output), vec!["shapeX", "labelX", "shapeY", "conn"]);
}

#[test]
fn test_random_tokens_in_edit_mode() {
    let output = convert_with_tokens(
        r#"{"elements": [{"type": "rectangle", "id": "r", "x": 0, "y": 0}]}"#,
        Some(EXISTING),
        &ConvertConfig::default(),
        &mut RandomTokens::seeded(7),
    )
    .unwrap();
    let fresh = output.document.elements.last().unwrap();
    assert_eq!(fresh.id.len(), 20);
    assert!(output.document.find(&fresh.id).is_some());
}

#[test]
fn test_existing_document_with_null_index() {
    let existing = r#"{"elements": [
        {"id": "r1", "type": "rectangle", "x": 0, "y": 0, "width": 100, "height": 50, "index": null},
        {"id": "r2", "type": "rectangle", "x": 200, "y": 0, "width": 100, "height": 50, "index": "a1"}
    ]}"#;
    let output = convert_with_tokens(
        r#"{"elements": []}"#,
        Some(existing),
        &ConvertConfig::default(),
        &mut SequentialTokens::new(),
    )
    .expect("Should accept a null index");

    assert_eq!(ids(&output), vec!["r1", "r2"]);
    for (position, el) in output.document.elements.iter().enumerate() {
        assert_eq!(decode_index(&el.index), Some(position), "{}", el.id);
    }
}

#[test]
fn test_malformed_existing_document() {
    let result = convert_with_tokens(
        r#"{"elements": []}"#,
        Some(r#"{"elements": {"not": "a list"}}"#),
        &ConvertConfig::default(),
        &mut SequentialTokens::new(),
    );
    assert!(matches!(result, Err(ConvertError::PriorDocument(_))));
}
