//! Render queue collecting per-group draw submissions
//!
//! Instances submit one [`RenderItem`] per visible group each tick, plus
//! [`DebugItem`]s for whichever bounding volumes and axis gizmos are flagged
//! visible. The renderer drains the queue after all updates for the tick
//! complete; the queue itself never touches the GPU.

use crate::bounds::Aabb;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::material::MaterialId;
use crate::render::shader::ShaderId;

/// One visible group of one instance, ready to draw
#[derive(Debug, Clone)]
pub struct RenderItem {
    /// Name of the submitting instance
    pub instance: String,

    /// Index of the model group to draw
    pub group: usize,

    /// Animation frame whose geometry should be drawn
    pub frame: usize,

    /// Resolved material binding (group override, already applied)
    pub material: MaterialId,

    /// Resolved shader binding (group override or instance default)
    pub shader: ShaderId,

    /// Color tint applied on top of the material
    pub tint: Vec3,

    /// Model-to-world matrix of the instance
    pub transform: Mat4,
}

/// Which debug volume a [`DebugItem`] outlines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugVolume {
    /// Grand bounding box (all animation frames)
    GrandBounds,
    /// Frame bounding box (current frame only)
    FrameBounds,
    /// One group's frame-level bounding box
    GroupBounds(usize),
    /// One group's local axis gizmo
    Axis(usize),
}

/// One debug outline to draw for an instance
#[derive(Debug, Clone)]
pub struct DebugItem {
    /// Name of the submitting instance
    pub instance: String,

    /// Which volume this outlines
    pub volume: DebugVolume,

    /// World-space box to outline
    pub bounds: Aabb,
}

/// Per-tick queue of draw and debug submissions
#[derive(Debug, Default)]
pub struct RenderQueue {
    items: Vec<RenderItem>,
    debug_items: Vec<DebugItem>,
}

impl RenderQueue {
    /// Create an empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a draw submission
    pub fn push(&mut self, item: RenderItem) {
        self.items.push(item);
    }

    /// Add a debug outline submission
    pub fn push_debug(&mut self, item: DebugItem) {
        self.debug_items.push(item);
    }

    /// Get all draw submissions in submission order
    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    /// Get all debug outline submissions
    pub fn debug_items(&self) -> &[DebugItem] {
        &self.debug_items
    }

    /// Get the number of draw submissions
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the queue holds no draw submissions
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop all submissions (start of a new tick)
    pub fn clear(&mut self) {
        self.items.clear();
        self.debug_items.clear();
    }
}
