//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`NDC_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use std::time::Duration;

use ndcube_core::{EngineConfig, ProjectionModel, RotationConfig, RotationStyle, Viewport};

use crate::input::ScriptEntry;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target surface size
    #[serde(default)]
    pub viewport: ViewportConfig,
    /// Engine start-up settings
    #[serde(default)]
    pub engine: EngineSettings,
    /// Frame loop settings
    #[serde(default)]
    pub run: RunConfig,
    /// Text canvas settings
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
    /// Parameter changes replayed while running
    #[serde(default)]
    pub script: Vec<ScriptEntry>,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`NDC_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // NDC_ENGINE__DIMENSION=5 -> engine.dimension = 5
        figment = figment.merge(Env::prefixed("NDC_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Build the core engine settings
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let engine = &self.engine;
        if !engine.rotation_step.is_finite() {
            return Err(ConfigError::invalid(format!(
                "engine.rotation_step = {}: must be finite",
                engine.rotation_step
            )));
        }
        Ok(EngineConfig {
            dimension: engine.dimension,
            projection: engine.projection,
            rotation: RotationConfig {
                step: engine.rotation_step,
                refresh_period: seconds("engine.refresh_period_secs", engine.refresh_period_secs)?,
                style: engine.rotation_style,
                seed: engine.seed,
            },
            transition_duration: seconds("engine.transition_secs", engine.transition_secs)?,
            debug_overlay: self.debug.show_overlay,
        })
    }
}

fn seconds(key: &str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ConfigError::invalid(format!("{} = {}: {}", key, secs, e)))
}

/// Viewport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
        }
    }
}

impl ViewportConfig {
    pub fn to_viewport(&self) -> Viewport {
        Viewport::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Starting dimension
    pub dimension: usize,
    /// Starting projection model
    pub projection: ProjectionModel,
    /// Direction sampling style
    pub rotation_style: RotationStyle,
    /// Angle added per frame along the drift direction
    pub rotation_step: f64,
    /// Seconds between direction refreshes
    pub refresh_period_secs: f64,
    /// Seconds each parameter transition takes
    pub transition_secs: f64,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let defaults = EngineConfig::default();
        Self {
            dimension: defaults.dimension,
            projection: defaults.projection,
            rotation_style: defaults.rotation.style,
            rotation_step: defaults.rotation.step,
            refresh_period_secs: defaults.rotation.refresh_period.as_secs_f64(),
            transition_secs: defaults.transition_duration.as_secs_f64(),
            seed: None,
        }
    }
}

/// Frame loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Frames per second of the engine clock
    pub fps: u32,
    /// Seconds to run before exiting
    pub duration_secs: f64,
    /// Sleep between frames to match wall-clock time
    pub realtime: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            duration_secs: 10.0,
            realtime: true,
        }
    }
}

/// Text canvas configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Print frames to stdout
    pub enabled: bool,
    /// Canvas width in characters
    pub columns: usize,
    /// Canvas height in characters
    pub rows: usize,
    /// Print every n-th frame
    pub every: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            columns: 72,
            rows: 36,
            every: 1,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Start with vertex coordinate labels on
    pub show_overlay: bool,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_overlay: false,
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    /// A value that parsed but cannot be used
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
