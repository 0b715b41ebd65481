//! Configuration schema types for `bandpaint.toml`
//!
//! Defines the structure of the engine configuration file.

use crate::cache::DEFAULT_CAPACITY;
use crate::engine::{EngineOptions, DEFAULT_MAX_STEPS, DEFAULT_TICK_HZ};
use crate::framebuffer::SCREEN_HEIGHT;
use crate::palette::{resolve, PaletteColor, PaletteIndex};
use crate::priority::{PriorityBands, MAX_PRIORITY};
use serde::{Deserialize, Serialize};

/// Highest supported output scale factor
pub const MAX_SCALE: u32 = 16;

/// Highest supported simulation rate
pub const MAX_TICK_HZ: u32 = 1000;

/// Scene build settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Development mode: invalid colors fail the build
    #[serde(default)]
    pub strict: bool,
    /// Number of rendered scenes kept in memory
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Color shown while no scene is ready
    #[serde(default = "default_placeholder")]
    pub placeholder_color: PaletteColor,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            strict: false,
            cache_capacity: default_cache_capacity(),
            placeholder_color: default_placeholder(),
        }
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_placeholder() -> PaletteColor {
    PaletteColor::Index(0)
}

/// Fixed-timestep settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Simulation steps per second
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Most steps run for a single tick
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            max_steps: default_max_steps(),
        }
    }
}

fn default_tick_hz() -> u32 {
    DEFAULT_TICK_HZ
}

fn default_max_steps() -> u32 {
    DEFAULT_MAX_STEPS
}

/// Priority band defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityConfig {
    /// Band priorities, top to bottom, for scenes without their own
    #[serde(default = "default_bands")]
    pub bands: Vec<u8>,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            bands: default_bands(),
        }
    }
}

fn default_bands() -> Vec<u8> {
    PriorityBands::standard().values().to_vec()
}

/// Image output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Nearest-neighbour scale factor for saved images
    #[serde(default = "default_scale")]
    pub scale: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
        }
    }
}

fn default_scale() -> u32 {
    1
}

/// Complete bandpaint.toml configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BandpaintConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub priority: PriorityConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "timing.tick_hz")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bandpaint.toml: '{}' {}", self.field, self.message)
    }
}

impl BandpaintConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut error = |field: &str, message: String| {
            errors.push(ConfigValidationError {
                field: field.to_string(),
                message,
            })
        };

        if self.render.cache_capacity == 0 {
            error("render.cache_capacity", "must be at least 1".to_string());
        }

        if let Err(e) = resolve(&self.render.placeholder_color) {
            error("render.placeholder_color", e.to_string());
        }

        if self.timing.tick_hz == 0 || self.timing.tick_hz > MAX_TICK_HZ {
            error(
                "timing.tick_hz",
                format!("must be between 1 and {}", MAX_TICK_HZ),
            );
        }

        if self.timing.max_steps == 0 {
            error("timing.max_steps", "must be at least 1".to_string());
        }

        let bands = &self.priority.bands;
        if bands.is_empty() || bands.len() > SCREEN_HEIGHT as usize {
            error(
                "priority.bands",
                format!("must contain between 1 and {} values", SCREEN_HEIGHT),
            );
        }
        for (i, &value) in bands.iter().enumerate() {
            if value > MAX_PRIORITY {
                error(
                    &format!("priority.bands[{}]", i),
                    format!("is {}, must be 0-{}", value, MAX_PRIORITY),
                );
            }
        }

        if self.output.scale == 0 || self.output.scale > MAX_SCALE {
            error("output.scale", format!("must be between 1 and {}", MAX_SCALE));
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Resolved placeholder color, black if invalid.
    pub fn placeholder(&self) -> PaletteIndex {
        resolve(&self.render.placeholder_color).unwrap_or(PaletteIndex::BLACK)
    }

    /// Default bands, standard bands if invalid.
    pub fn default_bands(&self) -> PriorityBands {
        PriorityBands::new(self.priority.bands.clone(), SCREEN_HEIGHT).unwrap_or_default()
    }

    /// Engine parameters described by this configuration.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            strict: self.render.strict,
            cache_capacity: self.render.cache_capacity.max(1),
            placeholder: self.placeholder(),
            default_bands: self.default_bands(),
            tick_hz: self.timing.tick_hz,
            max_steps: self.timing.max_steps,
        }
    }
}
