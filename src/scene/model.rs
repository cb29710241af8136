use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Fps;
use crate::foundation::error::{NrtError, NrtResult};

/// Boundary model of a scene loaded by [`crate::SceneRuntime`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDef {
    pub fps: Fps,
    pub root: CompositionDef,
}

/// One composition: a timeline of `duration` frames with layers and timeline markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionDef {
    pub id: String,
    pub duration: u64,
    #[serde(default)]
    pub looping: bool,
    /// Default entrance state, re-armed by `execute_composition_action`.
    #[serde(default)]
    pub action: CompositionActionDef,
    /// First frame of the exit transition played by `stop`.
    #[serde(default)]
    pub outro: Option<u64>,
    #[serde(default)]
    pub markers: Vec<MarkerDef>,
    #[serde(default)]
    pub layers: Vec<LayerDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionActionDef {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub autoplay: bool,
}

impl Default for CompositionActionDef {
    fn default() -> Self {
        Self {
            visible: true,
            autoplay: false,
        }
    }
}

/// A timeline action fired when the playhead enters `frame`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerDef {
    pub frame: u64,
    #[serde(flatten)]
    pub kind: MarkerKindDef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerKindDef {
    /// Halt the composition's own playhead (a step boundary).
    Pause,
    ShowLayer { layer: String },
    HideLayer { layer: String },
    /// Start the detached composition embedded in `layer`.
    PlayLayer { layer: String },
    /// Halt the detached composition embedded in `layer`.
    StopLayer { layer: String },
}

impl MarkerKindDef {
    fn layer(&self) -> Option<&str> {
        match self {
            Self::Pause => None,
            Self::ShowLayer { layer }
            | Self::HideLayer { layer }
            | Self::PlayLayer { layer }
            | Self::StopLayer { layer } => Some(layer),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDef {
    pub id: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub element: ElementDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementDef {
    /// Plain visual content (text, shape, image); only its visibility matters here.
    Graphic,
    Composition {
        /// Parent frame at which an attached child's frame 0 lines up.
        #[serde(default)]
        start: u64,
        #[serde(default)]
        detach_playhead: bool,
        composition: Box<CompositionDef>,
    },
}

fn default_true() -> bool {
    true
}

impl SceneDef {
    pub fn validate(&self) -> NrtResult<()> {
        self.fps.validate()?;
        let mut seen = BTreeSet::new();
        self.root.validate(&mut seen)
    }
}

impl CompositionDef {
    fn validate(&self, seen_ids: &mut BTreeSet<String>) -> NrtResult<()> {
        if self.id.trim().is_empty() {
            return Err(NrtError::validation("composition id must be non-empty"));
        }
        if !seen_ids.insert(self.id.clone()) {
            return Err(NrtError::validation(format!(
                "duplicate composition id '{}'",
                self.id
            )));
        }
        if self.duration == 0 {
            return Err(NrtError::validation(format!(
                "composition '{}' duration must be > 0",
                self.id
            )));
        }
        if let Some(outro) = self.outro
            && outro >= self.duration
        {
            return Err(NrtError::validation(format!(
                "composition '{}' outro {outro} is past its duration",
                self.id
            )));
        }

        let mut layer_ids = BTreeSet::new();
        for layer in &self.layers {
            if !layer_ids.insert(layer.id.as_str()) {
                return Err(NrtError::validation(format!(
                    "composition '{}' has duplicate layer id '{}'",
                    self.id, layer.id
                )));
            }
        }

        for m in &self.markers {
            if m.frame >= self.duration {
                return Err(NrtError::validation(format!(
                    "composition '{}' marker at frame {} is past its duration",
                    self.id, m.frame
                )));
            }
            let Some(layer_id) = m.kind.layer() else {
                continue;
            };
            let Some(layer) = self.layers.iter().find(|l| l.id == layer_id) else {
                return Err(NrtError::validation(format!(
                    "composition '{}' marker references unknown layer '{layer_id}'",
                    self.id
                )));
            };
            let plays = matches!(
                m.kind,
                MarkerKindDef::PlayLayer { .. } | MarkerKindDef::StopLayer { .. }
            );
            if plays && !matches!(layer.element, ElementDef::Composition { .. }) {
                return Err(NrtError::validation(format!(
                    "composition '{}' marker targets layer '{layer_id}', which embeds no composition",
                    self.id
                )));
            }
        }

        for layer in &self.layers {
            if let ElementDef::Composition { composition, .. } = &layer.element {
                composition.validate(seen_ids)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
