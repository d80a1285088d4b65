//! Material system for rendering
//!
//! Materials are registered once in a [`MaterialLibrary`] and referenced by
//! [`MaterialId`] everywhere else; instances and group overrides only ever
//! hold ids, so rebinding a group is a cheap handle write.

use std::collections::HashMap;

/// Stable handle to a registered material
///
/// Id 0 is reserved for "no material".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// The reserved "no material" handle
    pub const NONE: MaterialId = MaterialId(0);
}

/// Material properties for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color (RGB)
    pub base_color: [f32; 3],

    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metallic: f32,

    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,

    /// Alpha/transparency (0.0 = transparent, 1.0 = opaque)
    pub alpha: f32,
}

impl Material {
    /// Create a new material with default properties
    pub fn new() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0], // White
            metallic: 0.0,
            roughness: 0.5,
            alpha: 1.0,
        }
    }

    /// Set the base color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b];
        self
    }

    /// Set the metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Set the roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Set the alpha/transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

/// Central registry of named materials
///
/// Hands out [`MaterialId`]s and resolves names back to ids so the instance
/// API can work entirely in handles.
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: HashMap<MaterialId, Material>,
    names: HashMap<String, MaterialId>,
    next_id: u32,
}

impl MaterialLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            names: HashMap::new(),
            next_id: 1, // Start from 1, reserve 0 for "no material"
        }
    }

    /// Register a material under a name and get its id
    ///
    /// Registering a name twice replaces the stored material and keeps the
    /// original id, so existing bindings pick up the new definition.
    pub fn register(&mut self, name: impl Into<String>, material: Material) -> MaterialId {
        let name = name.into();
        let id = if let Some(&existing) = self.names.get(&name) {
            existing
        } else {
            let id = MaterialId(self.next_id);
            self.next_id += 1;
            self.names.insert(name.clone(), id);
            id
        };

        self.materials.insert(id, material);
        log::debug!("Registered material '{}' as {:?}", name, id);
        id
    }

    /// Look up a material id by name
    pub fn id_of(&self, name: &str) -> Option<MaterialId> {
        self.names.get(name).copied()
    }

    /// Get a material by id
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    /// Get the number of registered materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
