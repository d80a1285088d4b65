//! Render-facing surface of the instance runtime
//!
//! GPU command submission is out of scope; this module owns the CPU-side
//! bookkeeping a renderer consumes: material and shader registries handing
//! out stable ids, and the per-tick render queue instances submit into.

pub mod material;
pub mod shader;
pub mod queue;

pub use material::{Material, MaterialId, MaterialLibrary};
pub use shader::{ShaderCatalog, ShaderId, ShaderProgram};
pub use queue::{DebugItem, DebugVolume, RenderItem, RenderQueue};
