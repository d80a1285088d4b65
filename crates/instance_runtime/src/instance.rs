//! The instance aggregate
//!
//! An [`Instance`] is one positioned, animated, independently configured
//! occurrence of a shared [`Model`]. It owns its override table, bounding
//! hierarchy, and animation state; the model itself is shared read-only
//! through an `Arc` and never mutated from here.
//!
//! Lifecycle: constructed unbound, made live by [`Instance::bind_model`],
//! driven by one [`Instance::update`] per simulation tick, and severed from
//! the model with [`Instance::disconnect`]. `update` is the single per-tick
//! mutation point: every other mutator only records intent (a pending frame,
//! a transform, an override entry) that `update` commits.

use std::sync::Arc;

use bitflags::bitflags;
use thiserror::Error;

use crate::animation::{AnimationState, Transition};
use crate::bounds::{Aabb, Ray};
use crate::collision::{self, GroupContact, GroupHit};
use crate::config::{DebugDrawConfig, InstanceDefaults, RuntimeConfig};
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::foundation::time::FrameClock;
use crate::groups::{GroupSelector, OverrideTable};
use crate::model::Model;
use crate::render::material::MaterialId;
use crate::render::queue::{DebugItem, DebugVolume, RenderItem, RenderQueue};
use crate::render::shader::ShaderId;

bitflags! {
    /// Visibility and collision flags of one instance
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InstanceFlags: u8 {
        /// The instance is rendered
        const VISIBLE = 1;
        /// The instance axis gizmo is debug-drawn
        const AXIS_VISIBLE = 1 << 1;
        /// The current-frame bounding box is debug-drawn
        const FRAME_BOUNDS_VISIBLE = 1 << 2;
        /// The grand bounding box is debug-drawn
        const GRAND_BOUNDS_VISIBLE = 1 << 3;
        /// The instance participates in instance-vs-instance collision
        const COLLIDABLE = 1 << 4;
    }
}

/// Binding state of an instance towards its model
#[derive(Debug, Clone, Default)]
enum Binding {
    /// Never bound (or explicitly released)
    #[default]
    Unbound,
    /// Live reference to shared model data
    Bound(Arc<Model>),
    /// Reference severed by `disconnect`; structural access is an error
    Disconnected,
}

/// Instance-level errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceError {
    /// The operation needs a bound model but none is bound
    #[error("instance is not bound to a model")]
    NotInstanced,

    /// Rebind attempted without an explicit release
    #[error("instance is already bound to a model")]
    AlreadyInstanced,

    /// Frame index outside `[0, frame_count)`
    #[error("frame {frame} is out of range, model has {frame_count} frames")]
    InvalidFrame {
        /// The rejected frame index
        frame: usize,
        /// The bound model's frame count
        frame_count: usize,
    },

    /// Access attempted after the model reference was disconnected
    #[error("model reference was disconnected")]
    DanglingModel,
}

/// One positioned, animated, collidable occurrence of a shared model
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    binding: Binding,
    flags: InstanceFlags,
    hit_points: i32,

    animation: AnimationState,
    overrides: OverrideTable,

    /// Bounds over every frame, model space; fixed at bind time
    grand_bounds: Aabb,
    /// Bounds over the current frame, model space; refreshed by `update`
    frame_bounds: Aabb,
    /// Frame bounds need a recompute at the next `update`
    bounds_dirty: bool,

    /// Source transform; committed to `to_world` by `update` when dirty
    transform: Transform,
    to_world: Mat4,
    transform_dirty: bool,

    /// Instance-wide fallback shader for groups without an override
    default_shader: ShaderId,
    default_tint: Vec3,

    last_frame_drawn: Option<u64>,
    last_render_time: Option<f32>,

    /// Spatial partition cells this instance occupies; stored, not computed
    octants: Vec<u32>,

    defaults: InstanceDefaults,
    debug: DebugDrawConfig,
}

impl Instance {
    /// Create an unbound instance with default runtime configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &RuntimeConfig::default())
    }

    /// Create an unbound instance honoring the given runtime configuration
    pub fn with_config(name: impl Into<String>, config: &RuntimeConfig) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Unbound,
            flags: InstanceFlags::empty(),
            hit_points: config.instance.hit_points,
            animation: AnimationState::new(),
            overrides: OverrideTable::default(),
            grand_bounds: Aabb::new(Vec3::zeros(), Vec3::zeros()),
            frame_bounds: Aabb::new(Vec3::zeros(), Vec3::zeros()),
            bounds_dirty: false,
            transform: Transform::identity(),
            to_world: Mat4::identity(),
            transform_dirty: false,
            default_shader: ShaderId::NONE,
            default_tint: Vec3::new(1.0, 1.0, 1.0),
            last_frame_drawn: None,
            last_render_time: None,
            octants: Vec::new(),
            defaults: config.instance.clone(),
            debug: config.debug.clone(),
        }
    }

    // --- Lifecycle -------------------------------------------------------

    /// Bind this instance to a previously loaded model
    ///
    /// Seeds the override table from the model's group defaults, takes the
    /// grand bounds, computes the frame bounds for frame 0, and resets the
    /// animation machine. Fails with [`InstanceError::AlreadyInstanced`] if
    /// the instance is bound or disconnected; rebinding requires an explicit
    /// [`release`](Self::release) first.
    pub fn bind_model(&mut self, model: Arc<Model>) -> Result<(), InstanceError> {
        if !matches!(self.binding, Binding::Unbound) {
            return Err(InstanceError::AlreadyInstanced);
        }

        self.overrides = OverrideTable::from_groups(model.groups());
        self.animation.reset();
        self.grand_bounds = model.grand_bounds();
        self.frame_bounds = self
            .compute_frame_bounds(&model, 0)
            .unwrap_or(self.grand_bounds);
        self.bounds_dirty = false;

        self.flags = InstanceFlags::empty();
        self.flags.set(InstanceFlags::VISIBLE, self.defaults.visible);
        self.flags.set(InstanceFlags::COLLIDABLE, self.defaults.collidable);
        self.flags.set(InstanceFlags::GRAND_BOUNDS_VISIBLE, self.debug.grand_bounds);
        self.flags.set(InstanceFlags::FRAME_BOUNDS_VISIBLE, self.debug.frame_bounds);
        self.flags.set(InstanceFlags::AXIS_VISIBLE, self.debug.axes);

        log::debug!(
            "Instance '{}' bound to model '{}' ({} groups, {} frames)",
            self.name,
            model.name(),
            model.group_count(),
            model.frame_count()
        );
        self.binding = Binding::Bound(model);
        Ok(())
    }

    /// Release the bound model and return to the unbound state
    ///
    /// The explicit path to a rebind. Clears the override table and
    /// animation state; keeps name, transform, and configuration.
    pub fn release(&mut self) {
        self.binding = Binding::Unbound;
        self.overrides = OverrideTable::default();
        self.animation.reset();
        self.last_frame_drawn = None;
        self.last_render_time = None;
    }

    /// Sever the shared model reference without releasing for rebind
    ///
    /// Required before the model's last owner drops it. Afterwards the
    /// instance is inert: structural operations fail with
    /// [`InstanceError::DanglingModel`], while collision and render queries
    /// degrade gracefully the same way they do for an unbound instance.
    pub fn disconnect(&mut self) {
        if matches!(self.binding, Binding::Bound(_)) {
            log::debug!("Instance '{}' disconnected from its model", self.name);
        }
        self.binding = Binding::Disconnected;
    }

    /// Check whether this instance is bound to a model
    pub fn is_instanced(&self) -> bool {
        matches!(self.binding, Binding::Bound(_))
    }

    /// Get the model this instance was created from, if still connected
    pub fn model(&self) -> Option<&Arc<Model>> {
        match &self.binding {
            Binding::Bound(model) => Some(model),
            _ => None,
        }
    }

    // --- Per-tick update -------------------------------------------------

    /// Commit all pending state for this tick
    ///
    /// Advances a pending animation transition, refreshes the frame bounds
    /// when the frame (or the bounds-relevant overrides) changed, commits a
    /// dirty transform, and stamps `last_frame_drawn` from the clock.
    ///
    /// A never-bound instance is a quiet no-op; a disconnected one fails
    /// with [`InstanceError::DanglingModel`].
    pub fn update(&mut self, clock: &FrameClock) -> Result<(), InstanceError> {
        let model = match &self.binding {
            Binding::Unbound => {
                log::trace!("Instance '{}' update skipped: not bound", self.name);
                return Ok(());
            }
            Binding::Disconnected => return Err(InstanceError::DanglingModel),
            Binding::Bound(model) => Arc::clone(model),
        };

        let frame_changed = self.animation.advance();
        if frame_changed || self.bounds_dirty {
            if let Some(bounds) = self.compute_frame_bounds(&model, self.animation.current()) {
                self.frame_bounds = bounds;
            }
            self.bounds_dirty = false;
        }

        if self.transform_dirty {
            self.to_world = self.transform.to_matrix();
            self.transform_dirty = false;
        }

        self.last_frame_drawn = Some(clock.frame_count());
        Ok(())
    }

    /// Frame bounds = merged group boxes of groups included in the frame BO
    fn compute_frame_bounds(&self, model: &Model, frame: usize) -> Option<Aabb> {
        let group_bounds = model.group_bounds(frame)?;
        group_bounds
            .iter()
            .enumerate()
            .filter(|(group, _)| {
                self.overrides
                    .get(*group)
                    .map_or(true, |entry| entry.in_frame_bounds)
            })
            .map(|(_, bounds)| *bounds)
            .reduce(|acc, b| acc.merged(&b))
    }

    // --- Animation -------------------------------------------------------

    /// Request a transition to `frame`
    ///
    /// Validates the index against the model's frame count, then either
    /// commits immediately ([`Transition::Forced`]) or stores the frame for
    /// the next [`update`](Self::update) ([`Transition::Deferred`]). On
    /// failure neither the current nor the pending frame changes.
    pub fn set_next_frame(
        &mut self,
        frame: usize,
        transition: Transition,
    ) -> Result<(), InstanceError> {
        let frame_count = self.frame_count()?;
        if frame >= frame_count {
            return Err(InstanceError::InvalidFrame { frame, frame_count });
        }

        self.animation.request(frame, transition);
        if transition == Transition::Forced {
            self.bounds_dirty = true;
        }
        Ok(())
    }

    /// Seek directly to `frame` (forced single-step transition)
    pub fn seek(&mut self, frame: usize) -> Result<(), InstanceError> {
        self.set_next_frame(frame, Transition::Forced)
    }

    /// Get the currently applied animation frame
    pub fn current_frame(&self) -> usize {
        self.animation.current()
    }

    /// Get the last animation frame visited
    pub fn last_frame(&self) -> usize {
        self.animation.last()
    }

    /// Get the pending deferred frame, if any
    pub fn pending_frame(&self) -> Option<usize> {
        self.animation.pending()
    }

    // --- Structural accessors --------------------------------------------

    fn bound_model(&self) -> Result<&Arc<Model>, InstanceError> {
        match &self.binding {
            Binding::Bound(model) => Ok(model),
            Binding::Unbound => Err(InstanceError::NotInstanced),
            Binding::Disconnected => Err(InstanceError::DanglingModel),
        }
    }

    /// Get the bound model's group count
    pub fn group_count(&self) -> Result<usize, InstanceError> {
        Ok(self.bound_model()?.group_count())
    }

    /// Get the bound model's animation frame count
    pub fn frame_count(&self) -> Result<usize, InstanceError> {
        Ok(self.bound_model()?.frame_count())
    }

    /// Look up a group index by exact name match
    ///
    /// Returns `None` when no group matched or no model is bound; callers
    /// must treat `None` as "no group matched", never as a valid index.
    pub fn identify_group(&self, name: &str) -> Option<usize> {
        self.model().and_then(|model| model.group_index(name))
    }

    /// Get a group's name by index
    pub fn group_name(&self, group: usize) -> Option<&str> {
        self.model()
            .and_then(|model| model.group(group))
            .map(|g| g.name.as_str())
    }

    /// Get the world-space vertex positions of the current frame
    pub fn vertices(&self) -> Result<Vec<Vec3>, InstanceError> {
        let model = self.bound_model()?;
        let positions = model
            .frame_positions(self.animation.current())
            .unwrap_or_default();
        Ok(positions
            .into_iter()
            .map(|p| self.to_world.transform_point(&p.into()).coords)
            .collect())
    }

    // --- Transform -------------------------------------------------------

    /// Set the instance transform; committed to the world matrix at the
    /// next [`update`](Self::update)
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.transform_dirty = true;
    }

    /// Set the model-to-world matrix directly, bypassing the deferred
    /// transform commit (the matrix equivalent of a forced frame seek)
    pub fn set_model_matrix(&mut self, matrix: Mat4) {
        self.to_world = matrix;
        self.transform_dirty = false;
    }

    /// Get the committed model-to-world matrix
    pub fn model_matrix(&self) -> Mat4 {
        self.to_world
    }

    // --- Flags, identity, misc state -------------------------------------

    /// Set the instance name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the instance name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the hit points of the instance
    pub fn set_hit_points(&mut self, hit_points: i32) {
        self.hit_points = hit_points;
    }

    /// Get the hit points of the instance
    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    /// Set whether the instance is rendered
    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(InstanceFlags::VISIBLE, visible);
    }

    /// Check whether the instance is rendered
    pub fn is_visible(&self) -> bool {
        self.flags.contains(InstanceFlags::VISIBLE)
    }

    /// Set whether the instance participates in collision
    pub fn set_collidable(&mut self, collidable: bool) {
        self.flags.set(InstanceFlags::COLLIDABLE, collidable);
    }

    /// Check whether the instance participates in collision
    pub fn is_collidable(&self) -> bool {
        self.flags.contains(InstanceFlags::COLLIDABLE)
    }

    /// Set debug visibility of the grand bounding box
    pub fn set_grand_bounds_visible(&mut self, visible: bool) {
        self.flags.set(InstanceFlags::GRAND_BOUNDS_VISIBLE, visible);
    }

    /// Set debug visibility of the frame bounding box, per group selection
    ///
    /// The instance-level flag controls the merged frame box; the selector
    /// controls which groups additionally outline their own boxes.
    pub fn set_frame_bounds_visible(&mut self, visible: bool, selector: GroupSelector<'_>) {
        self.flags.set(InstanceFlags::FRAME_BOUNDS_VISIBLE, visible);
        let indices = self.resolve(selector);
        self.overrides.set_bounds_visible(&indices, visible);
    }

    /// Set debug visibility of axis gizmos, optionally per group too
    pub fn set_axis_visible(&mut self, visible: bool, groups: bool) {
        self.flags.set(InstanceFlags::AXIS_VISIBLE, visible);
        if groups {
            let indices = self.resolve(GroupSelector::All);
            self.overrides.set_axis_visible(&indices, visible);
        }
    }

    /// Get the current flag set
    pub fn flags(&self) -> InstanceFlags {
        self.flags
    }

    /// Get the tick stamp of the most recent committed update
    pub fn last_frame_drawn(&self) -> Option<u64> {
        self.last_frame_drawn
    }

    /// Get the clock reading of the most recent render submission
    pub fn last_render_time(&self) -> Option<f32> {
        self.last_render_time
    }

    /// Store the spatial-partition cells this instance occupies
    ///
    /// The instance stores but never computes partition membership.
    pub fn set_octant_list(&mut self, octants: Vec<u32>) {
        self.octants = octants;
    }

    /// Get the stored spatial-partition cells
    pub fn octant_list(&self) -> &[u32] {
        &self.octants
    }

    // --- Group overrides -------------------------------------------------

    fn resolve(&self, selector: GroupSelector<'_>) -> Vec<usize> {
        let groups = self.model().map_or(&[][..], |model| model.groups());
        selector.resolve(groups)
    }

    /// Get the override table (one record per model group)
    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Set the instance-wide default shader binding and tint
    ///
    /// The fallback for groups without an explicit shader override;
    /// per-group overrides take precedence when present.
    pub fn set_shader(&mut self, shader: ShaderId, tint: Vec3) {
        self.default_shader = shader;
        self.default_tint = tint;
    }

    /// Override the shader binding and tint for the selected groups
    pub fn set_group_shader(&mut self, selector: GroupSelector<'_>, shader: ShaderId, tint: Vec3) {
        let indices = self.resolve(selector);
        self.overrides.set_shader(&indices, shader, tint);
    }

    /// Override the material binding for the selected groups
    pub fn set_group_material(&mut self, selector: GroupSelector<'_>, material: MaterialId) {
        let indices = self.resolve(selector);
        self.overrides.set_material(&indices, material);
    }

    /// Override render visibility for the selected groups
    pub fn set_group_visible(&mut self, selector: GroupSelector<'_>, visible: bool) {
        let indices = self.resolve(selector);
        self.overrides.set_visible(&indices, visible);
    }

    /// Include or exclude the selected groups from the frame bounds
    ///
    /// Takes effect at the next [`update`](Self::update), when the frame
    /// bounds are recomputed.
    pub fn set_group_in_frame_bounds(&mut self, selector: GroupSelector<'_>, included: bool) {
        let indices = self.resolve(selector);
        for &index in &indices {
            if let Some(entry) = self.overrides.get(index) {
                if entry.in_frame_bounds != included {
                    self.bounds_dirty = true;
                }
            }
        }
        self.overrides.set_in_frame_bounds(&indices, included);
    }

    /// Rewrite every group override bound to `old` so it binds `new`
    ///
    /// A bulk rename, not a toggle; returns the number of entries rewritten.
    pub fn swap_materials(&mut self, old: MaterialId, new: MaterialId) -> usize {
        self.overrides.swap_materials(old, new)
    }

    // --- Collision queries -----------------------------------------------

    /// World-space grand bounding box, if a model is bound
    pub fn grand_bounding_box(&self) -> Option<Aabb> {
        self.model()?;
        Some(self.grand_bounds.transformed(&self.to_world))
    }

    /// World-space frame bounding box, if a model is bound
    pub fn frame_bounding_box(&self) -> Option<Aabb> {
        self.model()?;
        Some(self.frame_bounds.transformed(&self.to_world))
    }

    /// World-space per-group boxes at the current frame, frame-BO included
    /// groups only
    fn world_group_bounds(&self) -> Vec<(usize, Aabb)> {
        let Some(model) = self.model() else {
            return Vec::new();
        };
        let Some(group_bounds) = model.group_bounds(self.animation.current()) else {
            return Vec::new();
        };

        group_bounds
            .iter()
            .enumerate()
            .filter(|(group, _)| {
                self.overrides
                    .get(*group)
                    .map_or(true, |entry| entry.in_frame_bounds)
            })
            .map(|(group, bounds)| (group, bounds.transformed(&self.to_world)))
            .collect()
    }

    /// Broad-phase test against another instance
    ///
    /// True when both instances are collidable, both are bound, and their
    /// world-space grand boxes overlap. A grand-level hit can still yield an
    /// empty [`collision_list`](Self::collision_list).
    pub fn is_colliding(&self, other: &Instance) -> bool {
        if !self.is_collidable() || !other.is_collidable() {
            return false;
        }
        match (self.grand_bounding_box(), other.grand_bounding_box()) {
            (Some(a), Some(b)) => a.intersects(&b),
            _ => false,
        }
    }

    /// Narrow-phase group contacts against another instance
    ///
    /// Empty when the broad phase misses; the per-group boxes are never
    /// tested in that case.
    pub fn collision_list(&self, other: &Instance) -> Vec<GroupContact> {
        if !self.is_colliding(other) {
            return Vec::new();
        }

        let contacts =
            collision::contact_pairs(&self.world_group_bounds(), &other.world_group_bounds());
        log::trace!(
            "Instance '{}' vs '{}': {} group contacts",
            self.name,
            other.name,
            contacts.len()
        );
        contacts
    }

    /// Ray pick against this instance's bounding hierarchy
    ///
    /// Tests the grand box first, then returns the closest intersecting
    /// group's frame-level box. Picking ignores the collidable flag; it
    /// depends only on a bound model's volumes.
    pub fn pick(&self, ray: &Ray) -> Option<GroupHit> {
        let grand = self.model().map(|_| self.grand_bounds.transformed(&self.to_world))?;
        grand.intersect_ray(ray)?;
        collision::pick_group(&self.world_group_bounds(), ray)
    }

    // --- Render submission -----------------------------------------------

    /// Submit all visible groups of this instance to the render queue
    ///
    /// Quiet no-op when the instance is not bound or not visible. Each
    /// visible group resolves its shader to the group override when set,
    /// otherwise to the instance-wide default binding. Debug outlines are
    /// submitted for whichever volumes are flagged visible.
    pub fn add_to_render_list(&mut self, queue: &mut RenderQueue, clock: &FrameClock) {
        let Binding::Bound(model) = &self.binding else {
            return;
        };
        if !self.flags.contains(InstanceFlags::VISIBLE) {
            return;
        }

        let frame = self.animation.current();
        for (group, entry) in self.overrides.iter().enumerate() {
            if !entry.visible {
                continue;
            }

            let (shader, tint) = if entry.shader == ShaderId::NONE {
                (self.default_shader, self.default_tint)
            } else {
                (entry.shader, entry.tint)
            };

            queue.push(RenderItem {
                instance: self.name.clone(),
                group,
                frame,
                material: entry.material,
                shader,
                tint,
                transform: self.to_world,
            });
        }

        if self.flags.contains(InstanceFlags::GRAND_BOUNDS_VISIBLE) {
            queue.push_debug(DebugItem {
                instance: self.name.clone(),
                volume: DebugVolume::GrandBounds,
                bounds: self.grand_bounds.transformed(&self.to_world),
            });
        }
        if self.flags.contains(InstanceFlags::FRAME_BOUNDS_VISIBLE) {
            queue.push_debug(DebugItem {
                instance: self.name.clone(),
                volume: DebugVolume::FrameBounds,
                bounds: self.frame_bounds.transformed(&self.to_world),
            });
        }
        if let Some(group_bounds) = model.group_bounds(frame) {
            for (group, entry) in self.overrides.iter().enumerate() {
                let Some(bounds) = group_bounds.get(group) else {
                    continue;
                };
                let world = bounds.transformed(&self.to_world);
                if entry.bounds_visible {
                    queue.push_debug(DebugItem {
                        instance: self.name.clone(),
                        volume: DebugVolume::GroupBounds(group),
                        bounds: world,
                    });
                }
                if entry.axis_visible {
                    queue.push_debug(DebugItem {
                        instance: self.name.clone(),
                        volume: DebugVolume::Axis(group),
                        bounds: world,
                    });
                }
            }
        }

        self.last_render_time = Some(clock.total_time());
    }
}
