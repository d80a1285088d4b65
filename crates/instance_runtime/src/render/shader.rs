//! Shader program catalog
//!
//! The runtime never talks to the GPU; "compiling" a program here means
//! registering its source pair under a display name and handing out a
//! [`ShaderId`]. The renderer that consumes the render queue owns actual
//! compilation and caching of GPU objects keyed by these ids.

use std::collections::HashMap;

/// Stable handle to a registered shader program
///
/// Id 0 is reserved for "no shader" (renderer default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

impl ShaderId {
    /// The reserved "no shader" handle
    pub const NONE: ShaderId = ShaderId(0);
}

/// Descriptor of a shader program: display name plus source pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    /// Display name the program is looked up by
    pub name: String,

    /// Vertex shader source name
    pub vertex_source: String,

    /// Fragment shader source name
    pub fragment_source: String,
}

/// Central registry of named shader programs
#[derive(Debug, Default)]
pub struct ShaderCatalog {
    programs: HashMap<ShaderId, ShaderProgram>,
    names: HashMap<String, ShaderId>,
    next_id: u32,
}

impl ShaderCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            programs: HashMap::new(),
            names: HashMap::new(),
            next_id: 1, // Start from 1, reserve 0 for "no shader"
        }
    }

    /// Register a program from a vertex/fragment source pair
    ///
    /// Compiling the same display name again replaces the stored sources and
    /// keeps the id, so bound instances pick up the new program.
    pub fn compile(
        &mut self,
        vertex_source: impl Into<String>,
        fragment_source: impl Into<String>,
        name: impl Into<String>,
    ) -> ShaderId {
        let name = name.into();
        let id = if let Some(&existing) = self.names.get(&name) {
            existing
        } else {
            let id = ShaderId(self.next_id);
            self.next_id += 1;
            self.names.insert(name.clone(), id);
            id
        };

        self.programs.insert(
            id,
            ShaderProgram {
                name: name.clone(),
                vertex_source: vertex_source.into(),
                fragment_source: fragment_source.into(),
            },
        );
        log::debug!("Registered shader program '{}' as {:?}", name, id);
        id
    }

    /// Look up a program id by display name
    pub fn id_of(&self, name: &str) -> Option<ShaderId> {
        self.names.get(name).copied()
    }

    /// Get a program descriptor by id
    pub fn get(&self, id: ShaderId) -> Option<&ShaderProgram> {
        self.programs.get(&id)
    }

    /// Get the number of registered programs
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Check whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
