use super::*;

fn parse(v: serde_json::Value) -> SceneDef {
    serde_json::from_value(v).unwrap()
}

#[test]
fn minimal_scene_parses_with_defaults() {
    let scene = parse(serde_json::json!({
        "fps": { "num": 30, "den": 1 },
        "root": { "id": "main", "duration": 10 }
    }));
    scene.validate().unwrap();
    assert!(!scene.root.looping);
    assert_eq!(scene.root.action, CompositionActionDef::default());
    assert!(scene.root.layers.is_empty());
}

#[test]
fn markers_and_nested_layers_parse() {
    let scene = parse(serde_json::json!({
        "fps": { "num": 25, "den": 1 },
        "root": {
            "id": "main",
            "duration": 50,
            "markers": [
                { "frame": 10, "kind": "pause" },
                { "frame": 12, "kind": "play_layer", "layer": "ticker" }
            ],
            "layers": [
                { "id": "title", "element": { "type": "graphic" } },
                { "id": "ticker", "element": {
                    "type": "composition",
                    "detach_playhead": true,
                    "composition": { "id": "ticker", "duration": 20, "looping": true }
                } }
            ]
        }
    }));
    scene.validate().unwrap();
    assert_eq!(scene.root.markers[0].kind, MarkerKindDef::Pause);
    assert_eq!(
        scene.root.markers[1].kind,
        MarkerKindDef::PlayLayer {
            layer: "ticker".to_string()
        }
    );
}

#[test]
fn validate_rejects_marker_past_duration() {
    let scene = parse(serde_json::json!({
        "fps": { "num": 30, "den": 1 },
        "root": { "id": "main", "duration": 10, "markers": [{ "frame": 10, "kind": "pause" }] }
    }));
    assert!(scene.validate().is_err());
}

#[test]
fn validate_rejects_unknown_marker_layer() {
    let scene = parse(serde_json::json!({
        "fps": { "num": 30, "den": 1 },
        "root": {
            "id": "main",
            "duration": 10,
            "markers": [{ "frame": 1, "kind": "hide_layer", "layer": "nope" }]
        }
    }));
    assert!(scene.validate().is_err());
}

#[test]
fn validate_rejects_play_marker_on_plain_layer() {
    let scene = parse(serde_json::json!({
        "fps": { "num": 30, "den": 1 },
        "root": {
            "id": "main",
            "duration": 10,
            "markers": [{ "frame": 1, "kind": "play_layer", "layer": "bg" }],
            "layers": [{ "id": "bg", "element": { "type": "graphic" } }]
        }
    }));
    assert!(scene.validate().is_err());
}

#[test]
fn validate_rejects_duplicate_composition_ids() {
    let scene = parse(serde_json::json!({
        "fps": { "num": 30, "den": 1 },
        "root": {
            "id": "main",
            "duration": 10,
            "layers": [{ "id": "a", "element": {
                "type": "composition",
                "composition": { "id": "main", "duration": 5 }
            } }]
        }
    }));
    assert!(scene.validate().is_err());
}

#[test]
fn validate_rejects_zero_duration_and_bad_outro() {
    let zero = parse(serde_json::json!({
        "fps": { "num": 30, "den": 1 },
        "root": { "id": "main", "duration": 0 }
    }));
    assert!(zero.validate().is_err());

    let outro = parse(serde_json::json!({
        "fps": { "num": 30, "den": 1 },
        "root": { "id": "main", "duration": 10, "outro": 10 }
    }));
    assert!(outro.validate().is_err());
}
