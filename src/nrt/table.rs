use serde::Serialize;
use smallvec::SmallVec;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{NrtError, NrtResult};
use crate::foundation::ids::CompositionId;
use crate::runtime::CompositionRuntime;

/// Recorded play position and visibility of one detached composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CompositionSnapshot {
    pub composition: CompositionId,
    pub frame: FrameIndex,
    pub is_visible: bool,
}

/// All detached compositions of one simulation step, in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationFrame {
    pub snapshots: SmallVec<[CompositionSnapshot; 4]>,
}

/// Per-step snapshots of one simulation run.
///
/// Append-only while a run is in progress; a new schedule builds a new table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationTable {
    fps: Fps,
    generation: u64,
    truncated: bool,
    frames: Vec<SimulationFrame>,
}

/// Where a frame lookup landed in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFrame<'a> {
    pub index: usize,
    pub frame: &'a SimulationFrame,
    /// `true` when the requested frame was past the end and the last entry was used.
    pub clamped: bool,
}

impl SimulationTable {
    pub fn new(fps: Fps, generation: u64) -> Self {
        Self {
            fps,
            generation,
            truncated: false,
            frames: Vec::new(),
        }
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` when the run hit the frame bound before everything came to rest.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub(crate) fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    pub(crate) fn push(&mut self, frame: SimulationFrame) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[SimulationFrame] {
        &self.frames
    }

    pub fn get(&self, index: usize) -> Option<&SimulationFrame> {
        self.frames.get(index)
    }

    pub fn last(&self) -> Option<&SimulationFrame> {
        self.frames.last()
    }

    /// Entry for `frame`, or the last entry when `frame` is past the simulated horizon.
    pub fn resolve(&self, frame: FrameIndex) -> Option<ResolvedFrame<'_>> {
        let wanted = frame.as_usize();
        if let Some(f) = self.frames.get(wanted) {
            return Some(ResolvedFrame {
                index: wanted,
                frame: f,
                clamped: false,
            });
        }
        let index = self.frames.len().checked_sub(1)?;
        Some(ResolvedFrame {
            index,
            frame: &self.frames[index],
            clamped: true,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TopologyEdge {
    node: usize,
    detach_playhead: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TopologyNode {
    id: CompositionId,
    children: Vec<TopologyEdge>,
}

/// Immutable snapshot of the composition tree, taken once per simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    nodes: Vec<TopologyNode>,
}

impl Topology {
    /// Walk the runtime's tree from its root. A composition reachable twice is rejected, which
    /// also rules out cycles.
    pub fn capture<R>(rt: &R) -> NrtResult<Self>
    where
        R: CompositionRuntime + ?Sized,
    {
        let mut nodes = Vec::new();
        let mut seen = std::collections::HashSet::new();
        capture_rec(rt, rt.root(), &mut nodes, &mut seen)?;
        Ok(Self { nodes })
    }

    pub fn root(&self) -> CompositionId {
        self.nodes[0].id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// OR of `is_playing` over the root and every nested composition.
    pub fn any_playing<R>(&self, rt: &R) -> bool
    where
        R: CompositionRuntime + ?Sized,
    {
        self.nodes.iter().any(|n| rt.is_playing(n.id))
    }

    /// Snapshot every composition that owns its playhead. The root always does; a child does
    /// when its own `detach_playhead` is set, whatever its parent is.
    pub fn record_frame<R>(&self, rt: &R) -> SimulationFrame
    where
        R: CompositionRuntime + ?Sized,
    {
        let mut out = SimulationFrame::default();
        self.record_rec(0, true, rt, &mut out);
        out
    }

    fn record_rec<R>(&self, node: usize, detached: bool, rt: &R, out: &mut SimulationFrame)
    where
        R: CompositionRuntime + ?Sized,
    {
        let n = &self.nodes[node];
        if detached {
            out.snapshots.push(CompositionSnapshot {
                composition: n.id,
                frame: rt.active_frame(n.id),
                is_visible: rt.is_visible(n.id),
            });
        }
        for edge in &n.children {
            self.record_rec(edge.node, edge.detach_playhead, rt, out);
        }
    }
}

fn capture_rec<R>(
    rt: &R,
    id: CompositionId,
    nodes: &mut Vec<TopologyNode>,
    seen: &mut std::collections::HashSet<CompositionId>,
) -> NrtResult<usize>
where
    R: CompositionRuntime + ?Sized,
{
    if !seen.insert(id) {
        return Err(NrtError::runtime(format!(
            "composition {id} is embedded more than once"
        )));
    }
    let idx = nodes.len();
    nodes.push(TopologyNode {
        id,
        children: Vec::new(),
    });
    for embedded in rt.embedded(id) {
        let node = capture_rec(rt, embedded.child, nodes, seen)?;
        nodes[idx].children.push(TopologyEdge {
            node,
            detach_playhead: embedded.detach_playhead,
        });
    }
    Ok(idx)
}

#[cfg(test)]
#[path = "../../tests/unit/nrt/table.rs"]
mod tests;
