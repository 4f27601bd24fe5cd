//! End-to-end tests for converting skeletons into new documents

use std::collections::HashMap;

use excalidraw_skeleton::document::{decode_index, BoundKind, ElementKind};
use excalidraw_skeleton::{
    convert_with_tokens, ConvertConfig, ConvertOutput, Document, DocumentElement, SequentialTokens,
};
use pretty_assertions::assert_eq;

fn convert(source: &str) -> ConvertOutput {
    convert_with_tokens(source, None, &ConvertConfig::default(), &mut SequentialTokens::new())
        .expect("Should convert")
}

fn of_kind<'a>(doc: &'a Document, kind: &str) -> Vec<&'a DocumentElement> {
    doc.elements.iter().filter(|e| e.kind.name() == kind).collect()
}

fn origin(el: &DocumentElement) -> (f64, f64) {
    (el.x, el.y)
}

/// Every id an element mentions names an element of the document
fn assert_references_resolve(doc: &Document) {
    let ids: HashMap<&str, &DocumentElement> = doc.elements.iter().map(|e| (e.id.as_str(), e)).collect();
    for el in &doc.elements {
        if let Some(frame) = &el.frame_id {
            assert!(ids.contains_key(frame.as_str()), "{} has dangling frame {frame}", el.id);
        }
        if let Some(container) = el.text().and_then(|t| t.container_id.as_ref()) {
            assert!(ids.contains_key(container.as_str()), "{} has dangling container", el.id);
        }
        if let Some(linear) = el.linear() {
            for binding in [&linear.start_binding, &linear.end_binding].into_iter().flatten() {
                assert!(ids.contains_key(binding.element_id.as_str()), "{} binds to nothing", el.id);
            }
        }
        for bound in el.bound_elements.iter().flatten() {
            assert!(ids.contains_key(bound.id.as_str()), "{} lists missing {}", el.id, bound.id);
        }
    }
}

/// Bindings and back-references agree in both directions
fn assert_bindings_symmetric(doc: &Document) {
    for el in &doc.elements {
        if let Some(linear) = el.linear() {
            for binding in [&linear.start_binding, &linear.end_binding].into_iter().flatten() {
                let target = doc.find(&binding.element_id).unwrap();
                assert!(
                    target.bound_elements.iter().flatten().any(|b| b.id == el.id && b.kind == BoundKind::Arrow),
                    "{} does not list {}",
                    target.id,
                    el.id
                );
            }
        }
        if let Some(container) = el.text().and_then(|t| t.container_id.as_ref()) {
            let owner = doc.find(container).unwrap();
            assert!(owner.bound_text_ids().any(|id| id == el.id));
        }
    }
}

#[test]
fn test_top_down_pair_bound_by_connector() {
    let output = convert(
        r#"{"layout": "top-down", "elements": [
            {"type": "rectangle", "id": "a", "label": "A"},
            {"type": "rectangle", "id": "b", "label": "B"},
            {"type": "arrow", "id": "e", "from": "a", "to": "b"}
        ]}"#,
    );
    let doc = &output.document;

    let shapes = of_kind(doc, "rectangle");
    assert_eq!(origin(shapes[0]), (50.0, 50.0));
    assert_eq!(origin(shapes[1]), (50.0, 210.0));
    assert_eq!((shapes[0].width, shapes[0].height), (200.0, 80.0));

    let arrow = of_kind(doc, "arrow")[0];
    assert_eq!(origin(arrow), (150.0, 90.0));
    let linear = arrow.linear().unwrap();
    assert_eq!(linear.points, vec![[0.0, 0.0], [0.0, 160.0]]);

    let start = linear.start_binding.as_ref().unwrap();
    let end = linear.end_binding.as_ref().unwrap();
    assert_eq!(start.element_id, shapes[0].id);
    assert_eq!(start.fixed_point, Some([0.5, 1.0]));
    assert_eq!(start.mode.as_deref(), Some("orbit"));
    assert_eq!(end.element_id, shapes[1].id);
    assert_eq!(end.fixed_point, Some([0.5, 0.0]));

    assert_bindings_symmetric(doc);
    assert_references_resolve(doc);
}

#[test]
fn test_unpositioned_shapes_fill_a_grid() {
    let output = convert(
        r#"{"elements": [
            {"type": "rectangle", "id": "a"},
            {"type": "ellipse", "id": "b"},
            {"type": "diamond", "id": "c"},
            {"type": "rectangle", "id": "d"},
            {"type": "rectangle", "id": "e"}
        ]}"#,
    );
    let positions: Vec<(f64, f64)> = output.document.elements.iter().map(origin).collect();
    assert_eq!(
        positions,
        vec![(0.0, 0.0), (260.0, 0.0), (520.0, 0.0), (0.0, 160.0), (260.0, 160.0)]
    );
}

#[test]
fn test_one_unpositioned_shape_relayouts_all() {
    let output = convert(
        r#"{"elements": [
            {"type": "rectangle", "id": "a", "x": 900, "y": 900},
            {"type": "rectangle", "id": "b"}
        ]}"#,
    );
    let positions: Vec<(f64, f64)> = output.document.elements.iter().map(origin).collect();
    assert_eq!(positions, vec![(0.0, 0.0), (260.0, 0.0)]);
}

#[test]
fn test_positioned_shapes_are_left_alone() {
    let output = convert(
        r#"{"elements": [
            {"type": "rectangle", "id": "a", "x": 900, "y": -40, "width": 10, "height": 20}
        ]}"#,
    );
    let el = &output.document.elements[0];
    assert_eq!((el.x, el.y, el.width, el.height), (900.0, -40.0, 10.0, 20.0));
}

#[test]
fn test_frame_wraps_children_with_padding() {
    let output = convert(
        r#"{"elements": [
            {"type": "rectangle", "id": "a", "x": 0, "y": 0, "width": 100, "height": 50, "label": "A"},
            {"type": "rectangle", "id": "b", "x": 150, "y": 0, "width": 100, "height": 50},
            {"type": "frame", "id": "f", "name": "Group", "children": ["a", "b"]}
        ]}"#,
    );
    let doc = &output.document;
    let frame = of_kind(doc, "frame")[0];
    assert_eq!((frame.x, frame.y, frame.width, frame.height), (-30.0, -50.0, 310.0, 130.0));

    // Both shapes and the label inside `a` belong to the frame
    for el in doc.elements.iter().filter(|e| e.id != frame.id) {
        assert_eq!(el.frame_id.as_deref(), Some(frame.id.as_str()), "{}", el.id);
    }
    assert_references_resolve(doc);
}

#[test]
fn test_unknown_frame_child_is_a_warning() {
    let output = convert(
        r#"{"elements": [
            {"type": "rectangle", "id": "a", "x": 0, "y": 0},
            {"type": "frame", "id": "f", "children": ["a", "missing"]}
        ]}"#,
    );
    assert_eq!(output.warnings.len(), 1);
    assert!(output.warnings[0].message.contains("missing"));
}

#[test]
fn test_nested_frame_child_is_a_warning() {
    let output = convert(
        r#"{"elements": [
            {"type": "rectangle", "id": "a", "x": 0, "y": 0},
            {"type": "frame", "id": "inner", "children": ["a"]},
            {"type": "frame", "id": "outer", "children": ["inner"]}
        ]}"#,
    );
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(
        output.warnings[0].message,
        "Frame \"outer\" child \"inner\" is not a placeable element"
    );

    let frames = of_kind(&output.document, "frame");
    assert_eq!((frames[0].x, frames[0].y), (-30.0, -50.0));
    assert_eq!(output.document.elements[0].frame_id.as_deref(), Some(frames[0].id.as_str()));
}

#[test]
fn test_unknown_connector_endpoint_is_fatal() {
    let result = convert_with_tokens(
        r#"{"elements": [
            {"type": "rectangle", "id": "server"},
            {"type": "arrow", "id": "e", "from": "server", "to": "sever"}
        ]}"#,
        None,
        &ConvertConfig::default(),
        &mut SequentialTokens::new(),
    );
    let error = result.unwrap_err();
    let messages = error.validation_messages().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("did you mean \"server\"?"), "{}", messages[0]);
}

#[test]
fn test_unbound_connector_keeps_author_geometry() {
    let output = convert(
        r#"{"elements": [
            {"type": "arrow", "id": "e", "x": 10, "y": 20, "height": 30}
        ]}"#,
    );
    let arrow = &output.document.elements[0];
    assert_eq!(origin(arrow), (10.0, 20.0));
    let linear = arrow.linear().unwrap();
    assert_eq!(linear.points, vec![[0.0, 0.0], [200.0, 30.0]]);
    assert_eq!(linear.start_binding, None);
    assert_eq!(linear.end_binding, None);
}

#[test]
fn test_labels_are_bound_text() {
    let output = convert(
        r#"{"elements": [
            {"type": "rectangle", "id": "a", "x": 0, "y": 0, "label": "Server"},
            {"type": "ellipse", "id": "b", "x": 400, "y": 0},
            {"type": "arrow", "id": "e", "from": "a", "to": "b", "label": "calls"}
        ]}"#,
    );
    let doc = &output.document;
    let texts = of_kind(doc, "text");
    assert_eq!(texts.len(), 2);

    let ElementKind::Text(shape_label) = &texts[0].kind else { unreachable!() };
    assert_eq!(shape_label.text, "Server");
    assert_eq!(shape_label.font_size, 16.0);
    assert_eq!(shape_label.container_id.as_deref(), Some(of_kind(doc, "rectangle")[0].id.as_str()));

    let ElementKind::Text(arrow_label) = &texts[1].kind else { unreachable!() };
    assert_eq!(arrow_label.text, "calls");
    assert_eq!(arrow_label.font_size, 14.0);

    assert_bindings_symmetric(doc);
}

#[test]
fn test_polyline_points_rebased_on_first_point() {
    let output = convert(
        r#"{"elements": [
            {"type": "line", "id": "l", "points": [[100, 100], [150, 120], [300, 100]]}
        ]}"#,
    );
    let line = &output.document.elements[0];
    assert_eq!(origin(line), (100.0, 100.0));
    assert_eq!(
        line.linear().unwrap().points,
        vec![[0.0, 0.0], [50.0, 20.0], [200.0, 0.0]]
    );
}

#[test]
fn test_indices_follow_output_order() {
    let output = convert(
        r#"{"elements": [
            {"type": "text", "text": "title"},
            {"type": "rectangle", "id": "a", "label": "A"},
            {"type": "rectangle", "id": "b", "label": "B"},
            {"type": "arrow", "id": "e", "from": "a", "to": "b", "label": "x"},
            {"type": "frame", "id": "f", "children": ["a", "b"]}
        ]}"#,
    );
    let elements = &output.document.elements;
    for (position, el) in elements.iter().enumerate() {
        assert_eq!(decode_index(&el.index), Some(position));
    }
    for pair in elements.windows(2) {
        assert!(pair[0].index < pair[1].index);
    }
}

#[test]
fn test_same_tokens_same_document() {
    let source = r#"{"layout": "left-right", "elements": [
        {"type": "rectangle", "id": "a", "label": "A"},
        {"type": "diamond", "id": "b", "label": "B?"},
        {"type": "ellipse", "id": "c"},
        {"type": "arrow", "id": "ab", "from": "a", "to": "b"},
        {"type": "arrow", "id": "bc", "from": "b", "to": "c", "label": "yes"},
        {"type": "frame", "id": "f", "children": ["b", "c"]}
    ]}"#;
    let first = serde_json::to_string_pretty(&convert(source).document).unwrap();
    let second = serde_json::to_string_pretty(&convert(source).document).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_every_reference_resolves_in_a_busy_diagram() {
    let output = convert(
        r#"{"layout": "tree", "theme": "blueprint", "elements": [
            {"type": "rectangle", "id": "root", "label": "Root", "color": "green"},
            {"type": "rectangle", "id": "l", "label": "Left"},
            {"type": "rectangle", "id": "r", "label": "Right"},
            {"type": "arrow", "id": "e1", "from": "root", "to": "l"},
            {"type": "arrow", "id": "e2", "from": "root", "to": "r", "label": "second"},
            {"type": "arrow", "id": "loop", "from": "r", "to": "root"},
            {"type": "frame", "id": "kids", "children": ["l", "r"]},
            {"type": "text", "text": "legend", "x": 0, "y": 500}
        ]}"#,
    );
    assert_references_resolve(&output.document);
    assert_bindings_symmetric(&output.document);
    assert!(output.warnings.is_empty());
}
