//! Shared, immutable model data
//!
//! A [`Model`] is loaded once (by an external loader) and then referenced by
//! arbitrarily many instances through `Arc<Model>`. Instances never mutate
//! model data; everything mutable lives on the instance side.
//!
//! All bounding volumes are precomputed at construction: one box per group
//! per frame (narrow phase), one box per frame (tight frame bound), and one
//! grand box over every frame (broad phase). The grand box contains every
//! frame box by construction.

use crate::bounds::Aabb;
use crate::foundation::math::Vec3;
use crate::render::material::MaterialId;
use crate::render::shader::ShaderId;
use thiserror::Error;

/// Named sub-mesh of a model with its default render bindings
///
/// These are the *defaults*: each instance copies them into its override
/// table at bind time and mutates the copies, never the group itself.
#[derive(Debug, Clone)]
pub struct Group {
    /// Group name, unique within a model
    pub name: String,

    /// Default material binding
    pub material: MaterialId,

    /// Default shader binding
    pub shader: ShaderId,

    /// Whether the group's local axis gizmo is drawn by default
    pub axis_visible: bool,
}

impl Group {
    /// Create a group with default bindings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: MaterialId::NONE,
            shader: ShaderId::NONE,
            axis_visible: false,
        }
    }

    /// Set the default material binding
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = material;
        self
    }

    /// Set the default shader binding
    pub fn with_shader(mut self, shader: ShaderId) -> Self {
        self.shader = shader;
        self
    }

    /// Set the default axis visibility
    pub fn with_axis_visible(mut self, visible: bool) -> Self {
        self.axis_visible = visible;
        self
    }
}

/// Vertex positions for every group at one animation frame
///
/// The outer index matches the model's group order.
#[derive(Debug, Clone)]
pub struct ModelFrame {
    /// Per-group vertex positions in model space
    pub positions: Vec<Vec<Vec3>>,
}

impl ModelFrame {
    /// Create a frame from per-group position sets
    pub fn new(positions: Vec<Vec<Vec3>>) -> Self {
        Self { positions }
    }
}

/// Immutable shared geometry, group list, and animation frames
///
/// Construction validates the data shape and precomputes every bounding
/// volume the collision hierarchy needs, so frame-indexed accessors are
/// cheap lookups at runtime.
#[derive(Debug)]
pub struct Model {
    name: String,
    groups: Vec<Group>,
    frames: Vec<ModelFrame>,
    /// Per-frame, per-group bounds: `group_bounds[frame][group]`
    group_bounds: Vec<Vec<Aabb>>,
    /// Per-frame bounds over all groups
    frame_bounds: Vec<Aabb>,
    /// Bounds over every frame
    grand_bounds: Aabb,
}

impl Model {
    /// Build a model from groups and per-frame geometry
    ///
    /// Fails if there are no frames, if any frame does not carry exactly one
    /// position set per group, or if two groups share a name.
    pub fn new(
        name: impl Into<String>,
        groups: Vec<Group>,
        frames: Vec<ModelFrame>,
    ) -> Result<Self, ModelError> {
        let name = name.into();

        if frames.is_empty() {
            return Err(ModelError::NoFrames);
        }

        for (index, group) in groups.iter().enumerate() {
            if groups[..index].iter().any(|g| g.name == group.name) {
                return Err(ModelError::DuplicateGroup(group.name.clone()));
            }
        }

        for (frame, data) in frames.iter().enumerate() {
            if data.positions.len() != groups.len() {
                return Err(ModelError::GroupCountMismatch {
                    frame,
                    expected: groups.len(),
                    found: data.positions.len(),
                });
            }
        }

        let group_bounds: Vec<Vec<Aabb>> = frames
            .iter()
            .map(|frame| {
                frame
                    .positions
                    .iter()
                    .map(|positions| Aabb::from_points(positions))
                    .collect()
            })
            .collect();

        let frame_bounds: Vec<Aabb> = group_bounds
            .iter()
            .map(|bounds| {
                bounds
                    .iter()
                    .copied()
                    .reduce(|acc, b| acc.merged(&b))
                    .unwrap_or(Aabb::new(Vec3::zeros(), Vec3::zeros()))
            })
            .collect();

        let grand_bounds = frame_bounds
            .iter()
            .copied()
            .reduce(|acc, b| acc.merged(&b))
            .unwrap_or(Aabb::new(Vec3::zeros(), Vec3::zeros()));

        log::debug!(
            "Model '{}': {} groups, {} frames",
            name,
            groups.len(),
            frames.len()
        );

        Ok(Self {
            name,
            groups,
            frames,
            group_bounds,
            frame_bounds,
            grand_bounds,
        })
    }

    /// Get the model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Get the number of animation frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Get all groups in model order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Get a group by index
    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// Look up a group index by exact name match
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.name == name)
    }

    /// Get the per-group bounds for a frame
    pub fn group_bounds(&self, frame: usize) -> Option<&[Aabb]> {
        self.group_bounds.get(frame).map(Vec::as_slice)
    }

    /// Get the tight bounds around one frame
    pub fn frame_bounds(&self, frame: usize) -> Option<Aabb> {
        self.frame_bounds.get(frame).copied()
    }

    /// Get the bounds enclosing every frame
    pub fn grand_bounds(&self) -> Aabb {
        self.grand_bounds
    }

    /// Get the vertex positions for one group at one frame
    pub fn positions(&self, frame: usize, group: usize) -> Option<&[Vec3]> {
        self.frames
            .get(frame)
            .and_then(|f| f.positions.get(group))
            .map(Vec::as_slice)
    }

    /// Collect every vertex position of one frame, in group order
    pub fn frame_positions(&self, frame: usize) -> Option<Vec<Vec3>> {
        self.frames.get(frame).map(|f| {
            f.positions
                .iter()
                .flat_map(|positions| positions.iter().copied())
                .collect()
        })
    }
}

/// Model construction errors
#[derive(Error, Debug)]
pub enum ModelError {
    /// The model carries no animation frames
    #[error("model has no animation frames")]
    NoFrames,

    /// A frame's position sets do not line up with the group list
    #[error("frame {frame} has {found} position sets, expected {expected}")]
    GroupCountMismatch {
        /// Offending frame index
        frame: usize,
        /// Number of groups in the model
        expected: usize,
        /// Number of position sets found in the frame
        found: usize,
    },

    /// Two groups share a name
    #[error("duplicate group name '{0}'")]
    DuplicateGroup(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(center: Vec3) -> Vec<Vec3> {
        vec![
            center + Vec3::new(-0.5, -0.5, -0.5),
            center + Vec3::new(0.5, 0.5, 0.5),
        ]
    }

    fn two_group_model() -> Model {
        let groups = vec![Group::new("hull"), Group::new("turret")];
        let frames = vec![
            ModelFrame::new(vec![unit_box(Vec3::zeros()), unit_box(Vec3::new(0.0, 1.0, 0.0))]),
            ModelFrame::new(vec![unit_box(Vec3::zeros()), unit_box(Vec3::new(0.0, 2.0, 0.0))]),
        ];
        Model::new("tank", groups, frames).expect("valid model")
    }

    #[test]
    fn test_rejects_empty_frames() {
        let result = Model::new("empty", vec![Group::new("a")], vec![]);
        assert!(matches!(result, Err(ModelError::NoFrames)));
    }

    #[test]
    fn test_rejects_group_count_mismatch() {
        let groups = vec![Group::new("a"), Group::new("b")];
        let frames = vec![ModelFrame::new(vec![unit_box(Vec3::zeros())])];

        let result = Model::new("bad", groups, frames);
        assert!(matches!(
            result,
            Err(ModelError::GroupCountMismatch { frame: 0, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_rejects_duplicate_group_names() {
        let groups = vec![Group::new("a"), Group::new("a")];
        let frames = vec![ModelFrame::new(vec![
            unit_box(Vec3::zeros()),
            unit_box(Vec3::zeros()),
        ])];

        let result = Model::new("bad", groups, frames);
        assert!(matches!(result, Err(ModelError::DuplicateGroup(name)) if name == "a"));
    }

    #[test]
    fn test_group_index_lookup() {
        let model = two_group_model();
        assert_eq!(model.group_index("turret"), Some(1));
        assert_eq!(model.group_index("nonexistent"), None);
    }

    #[test]
    fn test_grand_bounds_contain_every_frame() {
        let model = two_group_model();
        let grand = model.grand_bounds();

        for frame in 0..model.frame_count() {
            let bounds = model.frame_bounds(frame).unwrap();
            assert!(grand.contains(&bounds));
        }
    }

    #[test]
    fn test_frame_positions_flatten_groups() {
        let model = two_group_model();
        let positions = model.frame_positions(0).unwrap();
        assert_eq!(positions.len(), 4); // two corners per group
        assert!(model.frame_positions(5).is_none());
    }
}
