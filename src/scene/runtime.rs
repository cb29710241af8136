use serde_json::{Map, Value};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{NrtError, NrtResult};
use crate::foundation::ids::CompositionId;
use crate::runtime::{CompositionRuntime, EmbeddedComposition};
use crate::scene::model::{
    CompositionActionDef, CompositionDef, ElementDef, MarkerKindDef, SceneDef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Pause,
    ShowLayer(usize),
    HideLayer(usize),
    PlayLayer(usize),
    StopLayer(usize),
}

#[derive(Debug, Clone)]
struct LayerNode {
    default_visible: bool,
    child: Option<ChildSlot>,
}

#[derive(Debug, Clone, Copy)]
struct ChildSlot {
    id: CompositionId,
    start: u64,
    detach_playhead: bool,
}

#[derive(Debug, Clone)]
struct CompNode {
    name: String,
    duration: u64,
    looping: bool,
    action: CompositionActionDef,
    outro: Option<u64>,
    // Sorted by frame, stable with respect to declaration order.
    markers: Vec<(u64, Marker)>,
    layers: Vec<LayerNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompState {
    frame: u64,
    playing: bool,
    visible: bool,
    in_outro: bool,
    layer_visible: Vec<bool>,
}

/// Visible state of one composition, as compared across seeks and playback.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CompositionVisual {
    pub id: String,
    pub frame: u64,
    pub visible: bool,
    pub layers: Vec<bool>,
}

/// Everything a render of the scene depends on.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VisualState {
    pub compositions: Vec<CompositionVisual>,
    pub fields: Map<String, Value>,
}

/// Deterministic in-memory [`CompositionRuntime`].
///
/// Compositions live in a flat arena in pre-order, so the root is always `CompositionId(0)`.
/// Layer visibility is a pure function of a composition's playhead: defaults plus every
/// show/hide marker at or before it.
#[derive(Debug, Clone)]
pub struct SceneRuntime {
    fps: Fps,
    nodes: Vec<CompNode>,
    states: Vec<CompState>,
    base_fields: Map<String, Value>,
    fields: Map<String, Value>,
    simulator_mode: bool,
    no_animation: bool,
    render_count: u64,
}

impl SceneRuntime {
    pub fn new(def: &SceneDef) -> NrtResult<Self> {
        def.validate()?;
        let mut nodes = Vec::new();
        flatten(&def.root, &mut nodes);
        let mut rt = Self {
            fps: def.fps,
            nodes,
            states: Vec::new(),
            base_fields: Map::new(),
            fields: Map::new(),
            simulator_mode: false,
            no_animation: false,
            render_count: 0,
        };
        rt.reset();
        Ok(rt)
    }

    pub fn from_json_str(s: &str) -> NrtResult<Self> {
        let def: SceneDef = serde_json::from_str(s)?;
        Self::new(&def)
    }

    /// Look up a composition by its scene id.
    pub fn composition(&self, name: &str) -> Option<CompositionId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .and_then(|i| u32::try_from(i).ok())
            .map(CompositionId)
    }

    pub fn composition_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn composition_name(&self, id: CompositionId) -> Option<&str> {
        self.nodes.get(id.index()).map(|n| n.name.as_str())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_simulator_mode(&self) -> bool {
        self.simulator_mode
    }

    pub fn is_no_animation_mode(&self) -> bool {
        self.no_animation
    }

    /// Repaints requested outside simulator mode (live ticks and `refresh_render`).
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn visual_state(&self) -> VisualState {
        VisualState {
            compositions: self
                .nodes
                .iter()
                .zip(&self.states)
                .map(|(n, s)| CompositionVisual {
                    id: n.name.clone(),
                    frame: s.frame,
                    visible: s.visible,
                    layers: s.layer_visible.clone(),
                })
                .collect(),
            fields: self.fields.clone(),
        }
    }

    fn check(&self, id: CompositionId) -> NrtResult<()> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(NrtError::runtime(format!("unknown composition {id}")))
        }
    }

    fn layer_visibility_at(&self, idx: usize, frame: u64) -> Vec<bool> {
        let node = &self.nodes[idx];
        let mut out: Vec<bool> = node.layers.iter().map(|l| l.default_visible).collect();
        for &(f, m) in &node.markers {
            if f > frame {
                break;
            }
            match m {
                Marker::ShowLayer(l) => out[l] = true,
                Marker::HideLayer(l) => out[l] = false,
                Marker::Pause | Marker::PlayLayer(_) | Marker::StopLayer(_) => {}
            }
        }
        out
    }

    fn initial_state(&self, idx: usize) -> CompState {
        CompState {
            frame: 0,
            playing: false,
            visible: self.nodes[idx].action.visible,
            in_outro: false,
            layer_visible: self.layer_visibility_at(idx, 0),
        }
    }

    /// Jump without firing markers; attached descendants jump along.
    fn place(&mut self, idx: usize, frame: u64) {
        let frame = frame.min(self.nodes[idx].duration - 1);
        self.states[idx].frame = frame;
        self.states[idx].layer_visible = self.layer_visibility_at(idx, frame);
        for l in 0..self.nodes[idx].layers.len() {
            let Some(slot) = self.nodes[idx].layers[l].child else {
                continue;
            };
            if !slot.detach_playhead {
                let child = slot.id.index();
                let target = self.derived_frame(child, frame, slot.start);
                self.place(child, target);
            }
        }
    }

    fn derived_frame(&self, child: usize, parent_frame: u64, start: u64) -> u64 {
        let node = &self.nodes[child];
        let rel = parent_frame.saturating_sub(start);
        if node.looping {
            rel % node.duration
        } else {
            rel.min(node.duration - 1)
        }
    }

    /// Move an attached composition to its derived frame during a tick. A one-frame step fires
    /// markers like a tick would; any other move is a jump.
    fn follow(&mut self, idx: usize, target: u64) {
        let current = self.states[idx].frame;
        if target == current + 1 {
            self.states[idx].frame = target;
            self.fire_markers(idx, target, false);
        } else if target != current {
            self.place(idx, target);
        }
    }

    fn fire_markers(&mut self, idx: usize, frame: u64, own_clock: bool) {
        let markers: Vec<Marker> = self.nodes[idx]
            .markers
            .iter()
            .filter(|(f, _)| *f == frame)
            .map(|(_, m)| *m)
            .collect();
        for m in markers {
            match m {
                Marker::Pause => {
                    if own_clock && !self.states[idx].in_outro {
                        self.states[idx].playing = false;
                    }
                }
                Marker::ShowLayer(l) => self.states[idx].layer_visible[l] = true,
                Marker::HideLayer(l) => self.states[idx].layer_visible[l] = false,
                Marker::PlayLayer(l) => {
                    if let Some(slot) = self.nodes[idx].layers[l].child
                        && slot.detach_playhead
                    {
                        self.start_playhead(slot.id.index());
                    }
                }
                Marker::StopLayer(l) => {
                    if let Some(slot) = self.nodes[idx].layers[l].child
                        && slot.detach_playhead
                    {
                        self.states[slot.id.index()].playing = false;
                    }
                }
            }
        }
    }

    fn start_playhead(&mut self, idx: usize) {
        let (duration, looping) = (self.nodes[idx].duration, self.nodes[idx].looping);
        let at_end = self.states[idx].frame + 1 >= duration;
        if at_end && !looping && !self.states[idx].playing {
            self.place(idx, 0);
        }
        self.states[idx].playing = true;
    }

    fn advance(&mut self, idx: usize) {
        let next = self.states[idx].frame + 1;
        let (duration, looping) = (self.nodes[idx].duration, self.nodes[idx].looping);
        if next < duration {
            self.states[idx].frame = next;
            self.fire_markers(idx, next, true);
        } else if looping && !self.states[idx].in_outro {
            self.place(idx, 0);
            self.fire_markers(idx, 0, true);
        } else {
            let st = &mut self.states[idx];
            st.playing = false;
            if st.in_outro {
                st.in_outro = false;
                st.visible = false;
            }
        }
    }

    fn tick_node(&mut self, idx: usize, own_clock: bool) {
        if own_clock && self.states[idx].playing {
            self.advance(idx);
        }
        let parent_frame = self.states[idx].frame;
        for l in 0..self.nodes[idx].layers.len() {
            let Some(slot) = self.nodes[idx].layers[l].child else {
                continue;
            };
            let child = slot.id.index();
            if slot.detach_playhead {
                self.tick_node(child, true);
            } else {
                let target = self.derived_frame(child, parent_frame, slot.start);
                self.follow(child, target);
                self.tick_node(child, false);
            }
        }
    }

    fn next_rest_frame(&self, idx: usize) -> Option<u64> {
        let node = &self.nodes[idx];
        let current = self.states[idx].frame;
        node.markers
            .iter()
            .find(|(f, m)| *f > current && *m == Marker::Pause)
            .map(|(f, _)| *f)
            .or((!node.looping).then_some(node.duration - 1))
    }
}

impl CompositionRuntime for SceneRuntime {
    fn fps(&self) -> Fps {
        self.fps
    }

    fn root(&self) -> CompositionId {
        CompositionId(0)
    }

    fn embedded(&self, id: CompositionId) -> Vec<EmbeddedComposition> {
        let Some(node) = self.nodes.get(id.index()) else {
            return Vec::new();
        };
        node.layers
            .iter()
            .filter_map(|l| l.child)
            .map(|slot| EmbeddedComposition {
                child: slot.id,
                detach_playhead: slot.detach_playhead,
            })
            .collect()
    }

    fn is_playing(&self, id: CompositionId) -> bool {
        self.states.get(id.index()).is_some_and(|s| s.playing)
    }

    fn active_frame(&self, id: CompositionId) -> FrameIndex {
        FrameIndex(self.states.get(id.index()).map_or(0, |s| s.frame))
    }

    fn is_visible(&self, id: CompositionId) -> bool {
        self.states.get(id.index()).is_some_and(|s| s.visible)
    }

    fn reset(&mut self) {
        self.states = (0..self.nodes.len())
            .map(|i| self.initial_state(i))
            .collect();
        self.fields = self.base_fields.clone();
        self.no_animation = false;
    }

    fn set_simulator_mode(&mut self, enabled: bool) {
        self.simulator_mode = enabled;
    }

    fn set_no_animation_mode(&mut self, enabled: bool) {
        self.no_animation = enabled;
    }

    fn tick(&mut self) -> NrtResult<()> {
        self.tick_node(0, true);
        if !self.simulator_mode {
            self.render_count += 1;
        }
        Ok(())
    }

    fn go_to(&mut self, id: CompositionId, frame: FrameIndex) -> NrtResult<()> {
        self.check(id)?;
        self.place(id.index(), frame.0);
        Ok(())
    }

    fn set_visible(&mut self, id: CompositionId, visible: bool) -> NrtResult<()> {
        self.check(id)?;
        self.states[id.index()].visible = visible;
        Ok(())
    }

    fn execute_composition_action(&mut self, id: CompositionId) -> NrtResult<()> {
        self.check(id)?;
        let action = self.nodes[id.index()].action;
        let st = &mut self.states[id.index()];
        st.visible = action.visible;
        st.playing = action.autoplay;
        st.in_outro = false;
        Ok(())
    }

    fn execute_frame_actions_through(
        &mut self,
        id: CompositionId,
        frame: FrameIndex,
    ) -> NrtResult<()> {
        self.check(id)?;
        let idx = id.index();
        let frame = frame.0.min(self.nodes[idx].duration - 1);
        self.states[idx].layer_visible = self.layer_visibility_at(idx, frame);
        Ok(())
    }

    fn refresh_render(&mut self, id: CompositionId) -> NrtResult<()> {
        self.check(id)?;
        if !self.simulator_mode {
            self.render_count += 1;
        }
        Ok(())
    }

    fn play(&mut self) -> NrtResult<()> {
        let root = &mut self.states[0];
        root.visible = true;
        root.in_outro = false;
        if self.no_animation
            && let Some(rest) = self.next_rest_frame(0)
        {
            self.place(0, rest);
            self.states[0].playing = false;
            return Ok(());
        }
        self.start_playhead(0);
        Ok(())
    }

    fn stop(&mut self) -> NrtResult<()> {
        let outro = self.nodes[0].outro.filter(|_| !self.no_animation);
        match outro {
            Some(outro) => {
                self.place(0, outro);
                let root = &mut self.states[0];
                root.playing = true;
                root.in_outro = true;
            }
            None => {
                let root = &mut self.states[0];
                root.playing = false;
                root.in_outro = false;
                root.visible = false;
            }
        }
        Ok(())
    }

    fn pause(&mut self) -> NrtResult<()> {
        self.states[0].playing = false;
        Ok(())
    }

    fn update(&mut self, data: &Value) -> NrtResult<()> {
        let obj = match data {
            Value::Null => return Ok(()),
            Value::Object(obj) => obj,
            other => {
                return Err(NrtError::validation(format!(
                    "update data must be a JSON object, got {other}"
                )));
            }
        };
        for (k, v) in obj {
            self.fields.insert(k.clone(), v.clone());
            if !self.simulator_mode {
                self.base_fields.insert(k.clone(), v.clone());
            }
        }
        Ok(())
    }
}

fn flatten(def: &CompositionDef, out: &mut Vec<CompNode>) -> CompositionId {
    let my_idx = out.len();
    out.push(CompNode {
        name: def.id.clone(),
        duration: def.duration,
        looping: def.looping,
        action: def.action,
        outro: def.outro,
        markers: Vec::new(),
        layers: Vec::new(),
    });

    let mut layers = Vec::with_capacity(def.layers.len());
    for layer in &def.layers {
        let child = match &layer.element {
            ElementDef::Graphic => None,
            ElementDef::Composition {
                start,
                detach_playhead,
                composition,
            } => Some(ChildSlot {
                id: flatten(composition, out),
                start: *start,
                detach_playhead: *detach_playhead,
            }),
        };
        layers.push(LayerNode {
            default_visible: layer.visible,
            child,
        });
    }

    let layer_index = |name: &str| def.layers.iter().position(|l| l.id == name).unwrap_or(0);
    let mut markers: Vec<(u64, Marker)> = def
        .markers
        .iter()
        .map(|m| {
            let marker = match &m.kind {
                MarkerKindDef::Pause => Marker::Pause,
                MarkerKindDef::ShowLayer { layer } => Marker::ShowLayer(layer_index(layer)),
                MarkerKindDef::HideLayer { layer } => Marker::HideLayer(layer_index(layer)),
                MarkerKindDef::PlayLayer { layer } => Marker::PlayLayer(layer_index(layer)),
                MarkerKindDef::StopLayer { layer } => Marker::StopLayer(layer_index(layer)),
            };
            (m.frame, marker)
        })
        .collect();
    markers.sort_by_key(|(f, _)| *f);

    out[my_idx].layers = layers;
    out[my_idx].markers = markers;
    CompositionId(my_idx as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/runtime.rs"]
mod tests;
