//! Configuration system

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Defaults applied to newly constructed instances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDefaults {
    /// Whether new instances start visible
    pub visible: bool,

    /// Whether new instances participate in collision
    pub collidable: bool,

    /// Hit points new instances start with
    pub hit_points: i32,
}

impl Default for InstanceDefaults {
    fn default() -> Self {
        Self {
            visible: true,
            collidable: true,
            hit_points: 100,
        }
    }
}

/// Debug-draw toggles seeded into instances at bind time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugDrawConfig {
    /// Outline the grand bounding box
    pub grand_bounds: bool,

    /// Outline the current-frame bounding box
    pub frame_bounds: bool,

    /// Draw instance axis gizmos
    pub axes: bool,
}

/// Top-level runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Defaults for new instances
    pub instance: InstanceDefaults,

    /// Debug-draw settings
    pub debug: DebugDrawConfig,
}

impl Config for RuntimeConfig {}
