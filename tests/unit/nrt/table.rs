use super::*;
use crate::scene::model::SceneDef;
use crate::scene::runtime::SceneRuntime;

fn nested_scene() -> SceneRuntime {
    let def: SceneDef = serde_json::from_value(serde_json::json!({
        "fps": { "num": 30, "den": 1 },
        "root": {
            "id": "main",
            "duration": 30,
            "layers": [
                { "id": "attached", "element": {
                    "type": "composition",
                    "composition": {
                        "id": "attached",
                        "duration": 10,
                        "layers": [{ "id": "inner", "element": {
                            "type": "composition",
                            "detach_playhead": true,
                            "composition": { "id": "inner", "duration": 5 }
                        } }]
                    }
                } },
                { "id": "free", "element": {
                    "type": "composition",
                    "detach_playhead": true,
                    "composition": {
                        "id": "free",
                        "duration": 8,
                        "looping": true,
                        "action": { "autoplay": true }
                    }
                } }
            ]
        }
    }))
    .unwrap();
    SceneRuntime::new(&def).unwrap()
}

fn frame_with(n: u64) -> SimulationFrame {
    let mut f = SimulationFrame::default();
    f.snapshots.push(CompositionSnapshot {
        composition: CompositionId(0),
        frame: FrameIndex(n),
        is_visible: true,
    });
    f
}

#[test]
fn resolve_clamps_past_the_end() {
    let mut t = SimulationTable::new(Fps::new(30, 1).unwrap(), 1);
    for n in 0..3 {
        t.push(frame_with(n));
    }
    let hit = t.resolve(FrameIndex(1)).unwrap();
    assert_eq!(hit.index, 1);
    assert!(!hit.clamped);

    let past = t.resolve(FrameIndex(50_000)).unwrap();
    assert_eq!(past.index, 2);
    assert!(past.clamped);
    assert_eq!(past.frame, t.last().unwrap());
}

#[test]
fn resolve_on_empty_table_is_none() {
    let t = SimulationTable::new(Fps::new(30, 1).unwrap(), 0);
    assert!(t.is_empty());
    assert!(t.resolve(FrameIndex(0)).is_none());
}

#[test]
fn topology_is_captured_preorder() {
    let rt = nested_scene();
    let topo = Topology::capture(&rt).unwrap();
    assert_eq!(topo.len(), 4);
    assert_eq!(topo.root(), rt.root());
}

#[test]
fn record_frame_skips_attached_but_not_their_detached_children() {
    let rt = nested_scene();
    let topo = Topology::capture(&rt).unwrap();
    let frame = topo.record_frame(&rt);
    let recorded: Vec<CompositionId> = frame.snapshots.iter().map(|s| s.composition).collect();
    assert_eq!(
        recorded,
        vec![
            rt.composition("main").unwrap(),
            rt.composition("inner").unwrap(),
            rt.composition("free").unwrap(),
        ]
    );
}

#[test]
fn any_playing_sees_nested_compositions() {
    let mut rt = nested_scene();
    let topo = Topology::capture(&rt).unwrap();
    assert!(!topo.any_playing(&rt));

    let free = rt.composition("free").unwrap();
    rt.execute_composition_action(free).unwrap();
    assert!(!rt.is_playing(rt.root()));
    assert!(topo.any_playing(&rt));

    rt.reset();
    assert!(!topo.any_playing(&rt));
    rt.play().unwrap();
    assert!(topo.any_playing(&rt));
}
