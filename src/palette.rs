//! The fixed 16-color display palette and color validation.
//!
//! Every pixel the engine produces is an index into [`PALETTE`]. Scene and
//! view descriptors may name colors by index, by name, or by hex value, but
//! the value must match a palette entry exactly. There is no nearest-match
//! substitution: an unknown color is an [`PaletteError::InvalidColor`] that
//! lists the closest valid entries so the author can fix the data.

use crate::color::{distance_sq, parse_hex_color, to_hex, Rgb};
use crate::suggest::nearest;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of palette entries.
pub const PALETTE_SIZE: usize = 16;

/// How many candidates an `InvalidColor` error lists.
const CANDIDATE_COUNT: usize = 3;

/// A palette entry: canonical name and RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub name: &'static str,
    pub rgb: Rgb,
}

/// The 16-color EGA palette, index order.
pub const PALETTE: [PaletteEntry; PALETTE_SIZE] = [
    PaletteEntry { name: "black", rgb: [0x00, 0x00, 0x00] },
    PaletteEntry { name: "blue", rgb: [0x00, 0x00, 0xAA] },
    PaletteEntry { name: "green", rgb: [0x00, 0xAA, 0x00] },
    PaletteEntry { name: "cyan", rgb: [0x00, 0xAA, 0xAA] },
    PaletteEntry { name: "red", rgb: [0xAA, 0x00, 0x00] },
    PaletteEntry { name: "magenta", rgb: [0xAA, 0x00, 0xAA] },
    PaletteEntry { name: "brown", rgb: [0xAA, 0x55, 0x00] },
    PaletteEntry { name: "light_gray", rgb: [0xAA, 0xAA, 0xAA] },
    PaletteEntry { name: "dark_gray", rgb: [0x55, 0x55, 0x55] },
    PaletteEntry { name: "light_blue", rgb: [0x55, 0x55, 0xFF] },
    PaletteEntry { name: "light_green", rgb: [0x55, 0xFF, 0x55] },
    PaletteEntry { name: "light_cyan", rgb: [0x55, 0xFF, 0xFF] },
    PaletteEntry { name: "light_red", rgb: [0xFF, 0x55, 0x55] },
    PaletteEntry { name: "light_magenta", rgb: [0xFF, 0x55, 0xFF] },
    PaletteEntry { name: "yellow", rgb: [0xFF, 0xFF, 0x55] },
    PaletteEntry { name: "white", rgb: [0xFF, 0xFF, 0xFF] },
];

/// A validated index into [`PALETTE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PaletteIndex(u8);

impl PaletteIndex {
    pub const BLACK: PaletteIndex = PaletteIndex(0);
    pub const WHITE: PaletteIndex = PaletteIndex(15);

    /// Wrap a raw index, `None` if it is outside the palette.
    pub fn new(index: u8) -> Option<Self> {
        (usize::from(index) < PALETTE_SIZE).then_some(Self(index))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn entry(self) -> PaletteEntry {
        PALETTE[usize::from(self.0)]
    }

    pub fn rgb(self) -> Rgb {
        self.entry().rgb
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// All palette indices in order.
    pub fn all() -> impl Iterator<Item = PaletteIndex> {
        (0..PALETTE_SIZE as u8).map(PaletteIndex)
    }
}

impl fmt::Display for PaletteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

/// A color as written in a descriptor: index, name, or hex string.
///
/// ```
/// use bandpaint::palette::{resolve, PaletteColor};
///
/// let by_index: PaletteColor = serde_json::from_str("14").unwrap();
/// let by_name: PaletteColor = serde_json::from_str("\"yellow\"").unwrap();
/// let by_hex: PaletteColor = serde_json::from_str("\"#FFFF55\"").unwrap();
///
/// assert_eq!(resolve(&by_index).unwrap(), resolve(&by_name).unwrap());
/// assert_eq!(resolve(&by_name).unwrap(), resolve(&by_hex).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteColor {
    Index(i64),
    Text(String),
}

impl From<PaletteIndex> for PaletteColor {
    fn from(index: PaletteIndex) -> Self {
        PaletteColor::Index(i64::from(index.get()))
    }
}

impl From<&str> for PaletteColor {
    fn from(s: &str) -> Self {
        PaletteColor::Text(s.to_string())
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteColor::Index(i) => write!(f, "{}", i),
            PaletteColor::Text(s) => f.write_str(s),
        }
    }
}

/// Error type for palette validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("invalid color '{value}': not in the 16-color palette (nearest: {})", .candidates.join(", "))]
    InvalidColor {
        value: String,
        candidates: Vec<String>,
    },
}

/// Resolve a descriptor color to its palette index.
///
/// Accepted forms, all exact:
/// - integer `0..=15`
/// - palette name, case-insensitive, with `-` or spaces accepted for `_`
/// - `#RGB` or `#RRGGBB` equal to a palette entry
///
/// # Errors
///
/// `PaletteError::InvalidColor` naming the offending value and the nearest
/// palette entries.
pub fn resolve(color: &PaletteColor) -> Result<PaletteIndex, PaletteError> {
    match color {
        PaletteColor::Index(i) => resolve_index(*i),
        PaletteColor::Text(s) if s.trim_start().starts_with('#') => resolve_hex(s.trim()),
        PaletteColor::Text(s) => resolve_name(s),
    }
}

/// Look up an RGB value, exact match only.
pub fn index_of_rgb(rgb: Rgb) -> Option<PaletteIndex> {
    PALETTE
        .iter()
        .position(|entry| entry.rgb == rgb)
        .map(|i| PaletteIndex(i as u8))
}

/// Look up a palette name (normalized), exact match only.
pub fn index_of_name(name: &str) -> Option<PaletteIndex> {
    let normalized = normalize_name(name);
    PALETTE
        .iter()
        .position(|entry| entry.name == normalized)
        .map(|i| PaletteIndex(i as u8))
}

fn resolve_index(i: i64) -> Result<PaletteIndex, PaletteError> {
    if let Some(index) = u8::try_from(i).ok().and_then(PaletteIndex::new) {
        return Ok(index);
    }

    let mut order: Vec<usize> = (0..PALETTE_SIZE).collect();
    order.sort_by_key(|&candidate| (candidate as i64 - i).unsigned_abs());
    Err(invalid(i.to_string(), order.into_iter().take(CANDIDATE_COUNT)))
}

fn resolve_hex(s: &str) -> Result<PaletteIndex, PaletteError> {
    match parse_hex_color(s) {
        Ok(rgb) => index_of_rgb(rgb).ok_or_else(|| {
            let mut order: Vec<usize> = (0..PALETTE_SIZE).collect();
            order.sort_by_key(|&candidate| distance_sq(PALETTE[candidate].rgb, rgb));
            invalid(s.to_string(), order.into_iter().take(CANDIDATE_COUNT))
        }),
        // Malformed hex, fall back to name similarity for the hint
        Err(_) => Err(invalid_by_name(s)),
    }
}

fn resolve_name(s: &str) -> Result<PaletteIndex, PaletteError> {
    index_of_name(s).ok_or_else(|| invalid_by_name(s))
}

fn invalid_by_name(s: &str) -> PaletteError {
    let names: Vec<&str> = PALETTE.iter().map(|entry| entry.name).collect();
    let candidates = nearest(&normalize_name(s), &names, CANDIDATE_COUNT);
    PaletteError::InvalidColor {
        value: s.to_string(),
        candidates: candidates
            .into_iter()
            .filter_map(index_of_name)
            .map(describe)
            .collect(),
    }
}

fn invalid(value: String, candidates: impl Iterator<Item = usize>) -> PaletteError {
    PaletteError::InvalidColor {
        value,
        candidates: candidates.map(|i| describe(PaletteIndex(i as u8))).collect(),
    }
}

fn describe(index: PaletteIndex) -> String {
    format!("{} {} {}", index.get(), index.name(), to_hex(index.rgb()))
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}
