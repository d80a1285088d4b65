//! # Instance Runtime
//!
//! Turns a single loaded model (shared geometry, animation frames, named
//! groups) into many independently animated, positioned, and collidable
//! instances.
//!
//! ## Features
//!
//! - **Shared Models**: one immutable `Model` behind `Arc`, any number of
//!   mutable `Instance`s layered on top
//! - **Animation State Machine**: deferred and forced frame transitions,
//!   committed once per tick by `Instance::update`
//! - **Two-Level Collision**: cheap grand-bounds broad phase, per-group
//!   frame-bounds narrow phase, and ray picking
//! - **Group Overrides**: per-instance visibility, shader, material, and
//!   tint without touching shared model data
//! - **Render Queue**: per-tick draw and debug-outline submissions for an
//!   external renderer to drain
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use instance_runtime::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = Arc::new(Model::new(
//!         "cube",
//!         vec![Group::new("body")],
//!         vec![ModelFrame::new(vec![vec![
//!             Vec3::new(-1.0, -1.0, -1.0),
//!             Vec3::new(1.0, 1.0, 1.0),
//!         ]])],
//!     )?);
//!
//!     let mut clock = FrameClock::new();
//!     let mut instance = Instance::new("cube-01");
//!     instance.bind_model(Arc::clone(&model))?;
//!
//!     let mut queue = RenderQueue::new();
//!     clock.tick();
//!     instance.update(&clock)?;
//!     instance.add_to_render_list(&mut queue, &clock);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod bounds;
pub mod model;
pub mod animation;
pub mod groups;
pub mod render;
pub mod collision;
pub mod instance;

pub use instance::{Instance, InstanceError, InstanceFlags};
pub use model::{Group, Model, ModelError, ModelFrame};

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        animation::{AnimationState, Transition},
        bounds::{Aabb, Ray},
        collision::{GroupContact, GroupHit},
        config::{Config, RuntimeConfig},
        foundation::{
            math::{Mat4, Transform, Vec3},
            time::FrameClock,
        },
        groups::{GroupOverride, GroupSelector, OverrideTable},
        Group, Instance, InstanceError, InstanceFlags, Model, ModelError, ModelFrame,
        render::{
            Material, MaterialId, MaterialLibrary, RenderQueue, ShaderCatalog, ShaderId,
        },
    };
}
