//! Scene descriptors and scene builds.
//!
//! A build is a pure function from a [`SceneDescriptor`] to a
//! [`RenderedScene`]: resolve the background and every primitive against the
//! palette, then rasterize in order. Individual bad primitives are skipped
//! with a [`Warning`] so one typo never blanks a room. Invalid colors are the
//! exception in strict mode, where they fail the whole build.

use crate::framebuffer::{Framebuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::palette::{resolve, PaletteColor, PaletteError, PaletteIndex};
use crate::primitive::{DrawCommand, PrimitiveDesc, ResolveError};
use crate::priority::{PriorityBands, PriorityBuffer, PriorityError, BACKGROUND_PRIORITY};
use crate::raster::Rasterizer;
use crate::warning::Warning;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for scene builds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// Descriptor text could not be parsed at all
    #[error("invalid scene descriptor: {0}")]
    Parse(String),
    /// Strict mode: the background color is not a palette color
    #[error("background: {0}")]
    InvalidBackground(#[source] PaletteError),
    /// Strict mode: a primitive uses a color outside the palette
    #[error("primitive {index}: {source}")]
    InvalidColor {
        index: usize,
        #[source]
        source: PaletteError,
    },
    /// Strict mode: the scene's priority bands are invalid
    #[error("priority bands: {0}")]
    InvalidBands(#[source] PriorityError),
}

/// One entry of a descriptor's primitive list.
///
/// Entries that do not parse as a [`PrimitiveDesc`] are kept verbatim so the
/// build can skip them with a warning instead of rejecting the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimitiveEntry {
    Valid(PrimitiveDesc),
    Malformed(serde_json::Value),
}

impl From<PrimitiveDesc> for PrimitiveEntry {
    fn from(desc: PrimitiveDesc) -> Self {
        PrimitiveEntry::Valid(desc)
    }
}

/// A scene as authored: background, optional bands, ordered primitives.
///
/// # Examples
///
/// ```
/// use bandpaint::scene::SceneDescriptor;
///
/// let desc = SceneDescriptor::from_json(r#"{
///     "background_color": "blue",
///     "primitives": [
///         {"type": "rect", "dims": [0, 150, 320, 50], "color": "green"},
///         {"type": "sparkle", "points": [[40, 20], [200, 35]], "color": "white"}
///     ]
/// }"#).unwrap();
/// assert_eq!(desc.primitives.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    pub background_color: PaletteColor,
    /// Band priorities, top to bottom. Falls back to the engine default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_bands: Option<Vec<u8>>,
    #[serde(default)]
    pub primitives: Vec<PrimitiveEntry>,
}

impl SceneDescriptor {
    pub fn new(background_color: impl Into<PaletteColor>) -> Self {
        Self {
            background_color: background_color.into(),
            priority_bands: None,
            primitives: Vec::new(),
        }
    }

    pub fn with_bands(mut self, bands: Vec<u8>) -> Self {
        self.priority_bands = Some(bands);
        self
    }

    pub fn with_primitive(mut self, primitive: PrimitiveDesc) -> Self {
        self.primitives.push(primitive.into());
        self
    }

    /// Parse descriptor text. Plain JSON first, then JSON5 (comments,
    /// trailing commas, unquoted keys).
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        match serde_json::from_str(text) {
            Ok(desc) => Ok(desc),
            Err(json_err) => json5::from_str(text)
                .map_err(|_| SceneError::Parse(json_err.to_string())),
        }
    }
}

/// Options that shape a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Development mode: invalid colors fail the build
    pub strict: bool,
    /// Bands used when the descriptor carries none
    pub default_bands: PriorityBands,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            strict: false,
            default_bands: PriorityBands::standard(),
        }
    }
}

/// A fully resolved scene, ready to rasterize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub background: PaletteIndex,
    pub bands: PriorityBands,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    /// Resolve a descriptor.
    ///
    /// Returns the scene and every warning for skipped input.
    pub fn resolve(
        desc: &SceneDescriptor,
        options: &BuildOptions,
    ) -> Result<(Scene, Vec<Warning>), SceneError> {
        let mut warnings = Vec::new();

        let background = match resolve(&desc.background_color) {
            Ok(index) => index,
            Err(e) if options.strict => return Err(SceneError::InvalidBackground(e)),
            Err(e) => {
                warnings.push(Warning::emit(format!("background: {}, using black", e)));
                PaletteIndex::BLACK
            }
        };

        let bands = match &desc.priority_bands {
            None => options.default_bands.clone(),
            Some(values) => match PriorityBands::new(values.clone(), SCREEN_HEIGHT) {
                Ok(bands) => bands,
                Err(e) if options.strict => return Err(SceneError::InvalidBands(e)),
                Err(e) => {
                    warnings.push(Warning::emit(format!(
                        "priority bands: {}, using defaults",
                        e
                    )));
                    options.default_bands.clone()
                }
            },
        };

        let mut commands = Vec::with_capacity(desc.primitives.len());
        for (index, entry) in desc.primitives.iter().enumerate() {
            let primitive = match entry {
                PrimitiveEntry::Valid(primitive) => primitive,
                PrimitiveEntry::Malformed(value) => {
                    warnings.push(Warning::emit(format!(
                        "primitive {}: skipped, {}",
                        index,
                        describe_malformed(value)
                    )));
                    continue;
                }
            };

            match primitive.resolve() {
                Ok(command) => commands.push(command),
                Err(ResolveError::Color(source)) if options.strict => {
                    return Err(SceneError::InvalidColor { index, source });
                }
                Err(e) => {
                    warnings.push(Warning::emit(format!("primitive {}: skipped, {}", index, e)));
                }
            }
        }

        Ok((
            Scene {
                background,
                bands,
                commands,
            },
            warnings,
        ))
    }

    /// Rasterize into fresh full-screen buffers.
    pub fn rasterize(&self) -> (Framebuffer, PriorityBuffer, Vec<Warning>) {
        let mut bitmap = Framebuffer::screen(self.background);
        let mut priority = PriorityBuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT, BACKGROUND_PRIORITY);
        let mut warnings = Vec::new();

        let mut raster = Rasterizer::new(&mut bitmap, &mut priority, &self.bands);
        for (index, command) in self.commands.iter().enumerate() {
            if let Err(e) = raster.draw(command) {
                warnings.push(Warning::emit(format!("primitive {}: skipped, {}", index, e)));
            }
        }

        (bitmap, priority, warnings)
    }
}

/// The published output of a scene build. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScene {
    pub bitmap: Framebuffer,
    pub priority: PriorityBuffer,
    pub bands: PriorityBands,
    pub warnings: Vec<Warning>,
}

impl RenderedScene {
    /// Resolve and rasterize a descriptor.
    #[tracing::instrument(level = "debug", skip_all, fields(primitives = desc.primitives.len()))]
    pub fn build(desc: &SceneDescriptor, options: &BuildOptions) -> Result<Self, SceneError> {
        let (scene, mut warnings) = Scene::resolve(desc, options)?;
        let (bitmap, priority, raster_warnings) = scene.rasterize();
        warnings.extend(raster_warnings);

        tracing::debug!(
            drawn = scene.commands.len(),
            warnings = warnings.len(),
            "scene rasterized"
        );

        Ok(Self {
            bitmap,
            priority,
            bands: scene.bands,
            warnings,
        })
    }
}

/// Explain why a raw primitive entry failed to parse.
fn describe_malformed(value: &serde_json::Value) -> String {
    match serde_json::from_value::<PrimitiveDesc>(value.clone()) {
        Err(e) => format!("malformed primitive: {}", e),
        Ok(_) => "malformed primitive".to_string(),
    }
}
