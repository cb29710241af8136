use super::*;

fn scene() -> SceneRuntime {
    let def: SceneDef = serde_json::from_value(serde_json::json!({
        "fps": { "num": 30, "den": 1 },
        "root": {
            "id": "main",
            "duration": 60,
            "action": { "visible": false },
            "outro": 50,
            "markers": [
                { "frame": 5, "kind": "show_layer", "layer": "title" },
                { "frame": 8, "kind": "play_layer", "layer": "ticker" },
                { "frame": 20, "kind": "pause" }
            ],
            "layers": [
                { "id": "title", "visible": false, "element": { "type": "graphic" } },
                { "id": "strap", "element": {
                    "type": "composition",
                    "start": 4,
                    "composition": {
                        "id": "strap",
                        "duration": 10,
                        "markers": [{ "frame": 6, "kind": "hide_layer", "layer": "text" }],
                        "layers": [{ "id": "text", "element": { "type": "graphic" } }]
                    }
                } },
                { "id": "ticker", "element": {
                    "type": "composition",
                    "detach_playhead": true,
                    "composition": { "id": "ticker", "duration": 6, "looping": true }
                } }
            ]
        }
    }))
    .unwrap();
    SceneRuntime::new(&def).unwrap()
}

fn ids(rt: &SceneRuntime) -> (CompositionId, CompositionId, CompositionId) {
    (
        rt.composition("main").unwrap(),
        rt.composition("strap").unwrap(),
        rt.composition("ticker").unwrap(),
    )
}

fn tick_n(rt: &mut SceneRuntime, n: usize) {
    for _ in 0..n {
        rt.tick().unwrap();
    }
}

#[test]
fn arena_is_preorder_with_root_first() {
    let rt = scene();
    let (main, strap, ticker) = ids(&rt);
    assert_eq!(rt.root(), main);
    assert_eq!(main, CompositionId(0));
    assert_eq!(rt.composition_count(), 3);
    assert_eq!(
        rt.embedded(main),
        vec![
            EmbeddedComposition {
                child: strap,
                detach_playhead: false
            },
            EmbeddedComposition {
                child: ticker,
                detach_playhead: true
            },
        ]
    );
    assert!(rt.embedded(CompositionId(99)).is_empty());
}

#[test]
fn reset_restores_composition_action_defaults() {
    let rt = scene();
    let (main, _, ticker) = ids(&rt);
    assert!(!rt.is_visible(main));
    assert!(rt.is_visible(ticker));
    assert!(!rt.is_playing(main));
    assert_eq!(rt.active_frame(main), FrameIndex(0));
}

#[test]
fn play_shows_root_and_ticks_fire_markers() {
    let mut rt = scene();
    let (main, _, _) = ids(&rt);
    rt.play().unwrap();
    assert!(rt.is_visible(main));
    assert!(rt.is_playing(main));

    tick_n(&mut rt, 5);
    assert_eq!(rt.active_frame(main), FrameIndex(5));
    assert!(rt.visual_state().compositions[0].layers[0]);

    tick_n(&mut rt, 15);
    assert_eq!(rt.active_frame(main), FrameIndex(20));
    assert!(!rt.is_playing(main), "pause marker halts the root");

    rt.tick().unwrap();
    assert_eq!(rt.active_frame(main), FrameIndex(20));
}

#[test]
fn attached_child_follows_parent_with_start_offset() {
    let mut rt = scene();
    let (_, strap, _) = ids(&rt);
    rt.play().unwrap();
    tick_n(&mut rt, 3);
    assert_eq!(rt.active_frame(strap), FrameIndex(0));
    tick_n(&mut rt, 7);
    assert_eq!(rt.active_frame(strap), FrameIndex(6));
    assert!(!rt.visual_state().compositions[1].layers[0]);
    tick_n(&mut rt, 10);
    assert_eq!(rt.active_frame(strap), FrameIndex(9), "clamped at its last frame");
}

#[test]
fn detached_child_waits_for_play_marker_then_loops() {
    let mut rt = scene();
    let (_, _, ticker) = ids(&rt);
    rt.play().unwrap();
    tick_n(&mut rt, 7);
    assert!(!rt.is_playing(ticker));
    assert_eq!(rt.active_frame(ticker), FrameIndex(0));

    rt.tick().unwrap();
    assert!(rt.is_playing(ticker));
    assert_eq!(rt.active_frame(ticker), FrameIndex(1));

    tick_n(&mut rt, 5);
    assert_eq!(rt.active_frame(ticker), FrameIndex(0), "wrapped");
    assert!(rt.is_playing(ticker));
}

#[test]
fn stop_runs_outro_then_hides() {
    let mut rt = scene();
    let (main, _, _) = ids(&rt);
    rt.play().unwrap();
    tick_n(&mut rt, 20);
    rt.stop().unwrap();
    assert_eq!(rt.active_frame(main), FrameIndex(50));
    assert!(rt.is_playing(main));
    assert!(rt.is_visible(main));

    tick_n(&mut rt, 9);
    assert_eq!(rt.active_frame(main), FrameIndex(59));
    assert!(rt.is_visible(main));

    rt.tick().unwrap();
    assert!(!rt.is_playing(main));
    assert!(!rt.is_visible(main));
}

#[test]
fn no_animation_mode_skips_transitions() {
    let mut rt = scene();
    let (main, _, _) = ids(&rt);
    rt.set_no_animation_mode(true);
    rt.play().unwrap();
    assert_eq!(rt.active_frame(main), FrameIndex(20));
    assert!(!rt.is_playing(main));
    assert!(rt.is_visible(main));

    rt.stop().unwrap();
    assert!(!rt.is_visible(main));
    assert!(!rt.is_playing(main));
}

#[test]
fn simulator_updates_are_discarded_by_reset() {
    let mut rt = scene();
    rt.update(&serde_json::json!({ "city": "Oslo" })).unwrap();

    rt.set_simulator_mode(true);
    rt.update(&serde_json::json!({ "city": "Bergen", "temp": 4 }))
        .unwrap();
    assert_eq!(rt.fields()["city"], "Bergen");

    rt.reset();
    assert_eq!(rt.fields()["city"], "Oslo");
    assert!(!rt.fields().contains_key("temp"));
}

#[test]
fn update_rejects_non_object_data() {
    let mut rt = scene();
    assert!(rt.update(&serde_json::json!([1, 2])).is_err());
    rt.update(&serde_json::Value::Null).unwrap();
}

#[test]
fn go_to_rederives_layers_and_attached_children() {
    let mut rt = scene();
    let (main, strap, _) = ids(&rt);
    rt.go_to(main, FrameIndex(12)).unwrap();
    let v = rt.visual_state();
    assert!(v.compositions[0].layers[0]);
    assert_eq!(rt.active_frame(strap), FrameIndex(8));
    assert!(!v.compositions[1].layers[0]);

    rt.go_to(main, FrameIndex(2)).unwrap();
    let v = rt.visual_state();
    assert!(!v.compositions[0].layers[0]);
    assert_eq!(rt.active_frame(strap), FrameIndex(0));
    assert!(v.compositions[1].layers[0]);
}

#[test]
fn go_to_clamps_to_last_frame() {
    let mut rt = scene();
    let (main, _, _) = ids(&rt);
    rt.go_to(main, FrameIndex(1000)).unwrap();
    assert_eq!(rt.active_frame(main), FrameIndex(59));
}

#[test]
fn renders_are_only_counted_outside_simulator_mode() {
    let mut rt = scene();
    let root = rt.root();
    rt.set_simulator_mode(true);
    rt.tick().unwrap();
    rt.refresh_render(root).unwrap();
    assert_eq!(rt.render_count(), 0);

    rt.set_simulator_mode(false);
    rt.tick().unwrap();
    rt.refresh_render(root).unwrap();
    assert_eq!(rt.render_count(), 2);
}

#[test]
fn unknown_composition_is_a_runtime_error() {
    let mut rt = scene();
    let err = rt.go_to(CompositionId(42), FrameIndex(0)).unwrap_err();
    assert!(matches!(err, NrtError::Runtime(_)));
    assert!(!rt.is_playing(CompositionId(42)));
}
