use super::*;
use crate::foundation::core::Fps;
use crate::nrt::action::GraphicAction;
use crate::nrt::schedule::ScheduleEntry;
use crate::nrt::simulate::simulate;
use crate::scene::runtime::SceneRuntime;

fn looping_root() -> SceneRuntime {
    SceneRuntime::new(
        &serde_json::from_value(serde_json::json!({
            "fps": { "num": 30, "den": 1 },
            "root": { "id": "main", "duration": 30, "looping": true, "action": { "visible": false } }
        }))
        .unwrap(),
    )
    .unwrap()
}

fn play_stop() -> Schedule {
    Schedule::normalize(
        &[
            ScheduleEntry::new(0.0, GraphicAction::play()),
            ScheduleEntry::new(500.0, GraphicAction::update(serde_json::json!({ "x": 1 }))),
            ScheduleEntry::new(2000.0, GraphicAction::stop()),
        ],
        Fps::new(30, 1).unwrap(),
    )
    .unwrap()
}

#[test]
fn live_run_visits_the_same_frames_as_the_simulation() {
    let mut rt = looping_root();
    let schedule = play_stop();
    let table = simulate(&mut rt, &schedule, &SimulationOptions::default()).unwrap();

    let mut seen = Vec::new();
    let run = play_live(&mut rt, &schedule, &SimulationOptions::default(), |frame, rt| {
        seen.push((frame, rt.active_frame(rt.root()), rt.is_visible(rt.root())));
    })
    .unwrap();

    assert_eq!(run, LiveRun { frames: 61, truncated: false });
    for (step, (frame, active, visible)) in seen.into_iter().enumerate() {
        assert_eq!(frame, FrameIndex(step as u64));
        let snap = table.get(step).unwrap().snapshots[0];
        assert_eq!((active, visible), (snap.frame, snap.is_visible), "step {step}");
    }
}

#[test]
fn live_run_keeps_its_final_state_and_renders() {
    let mut rt = looping_root();
    let run = play_live(&mut rt, &play_stop(), &SimulationOptions::default(), |_, _| {}).unwrap();
    assert!(!run.truncated);
    assert!(!rt.is_simulator_mode());
    assert!(!rt.is_visible(rt.root()));
    assert_eq!(rt.fields()["x"], 1);
    assert_eq!(rt.render_count(), run.frames);
}

#[test]
fn live_run_is_bounded() {
    let mut rt = looping_root();
    let schedule = Schedule::normalize(
        &[ScheduleEntry::new(0.0, GraphicAction::play())],
        Fps::new(30, 1).unwrap(),
    )
    .unwrap();
    let opts = SimulationOptions { max_duration: 15 };
    let run = play_live(&mut rt, &schedule, &opts, |_, _| {}).unwrap();
    assert_eq!(run, LiveRun { frames: 16, truncated: true });
    assert!(rt.is_playing(rt.root()));
}
