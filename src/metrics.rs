//! Marker widths used to align list item text.
//!
//! Markers differ in width ("1. " vs "10. ", "•" vs a number), so item text
//! is aligned against the width of the widest expected marker instead of the
//! actual one. Widths are measured once per render through a
//! [`MarkerMeasure`] so the list layout never touches a real font.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Widest ordered marker the layout reserves room for.
pub const ORDERED_SAMPLE: &str = "99. ";
/// Unordered marker as measured.
pub const UNORDERED_SAMPLE: &str = "• ";

pub const DEFAULT_ORDERED_WIDTH: i32 = 40;
pub const DEFAULT_UNORDERED_WIDTH: i32 = 30;

/// Something that can tell how wide a marker renders, in device-independent
/// units. `None` means "can't say"; callers fall back to fixed widths.
pub trait MarkerMeasure {
    fn measure(&self, marker: &str) -> Option<i32>;
}

impl<F> MarkerMeasure for F
where
    F: Fn(&str) -> Option<i32>,
{
    fn measure(&self, marker: &str) -> Option<i32> {
        self(marker)
    }
}

/// Measurer for when no font is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMeasurer;

impl MarkerMeasure for FixedMeasurer {
    fn measure(&self, _marker: &str) -> Option<i32> {
        None
    }
}

/// Measures markers by summing glyph advances of a TrueType/OpenType face.
pub struct FontMeasurer {
    data: Vec<u8>,
    size: f32,
}

impl FontMeasurer {
    /// Parse `data` as a font face rendered at `size` units per em.
    pub fn new(data: Vec<u8>, size: f32) -> Result<Self, ttf_parser::FaceParsingError> {
        ttf_parser::Face::parse(&data, 0)?;
        Ok(Self { data, size })
    }

    pub fn from_file(path: &Path, size: f32) -> Result<Self> {
        let data = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(data, size).map_err(|source| Error::Font {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl MarkerMeasure for FontMeasurer {
    fn measure(&self, marker: &str) -> Option<i32> {
        let face = ttf_parser::Face::parse(&self.data, 0).ok()?;
        let mut advance = 0u32;
        for ch in marker.chars() {
            let glyph = face.glyph_index(ch)?;
            advance += u32::from(face.glyph_hor_advance(glyph)?);
        }
        let units_per_em = f32::from(face.units_per_em());
        Some((advance as f32 * self.size / units_per_em).round() as i32)
    }
}

/// Widths of the widest ordered and unordered markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMetrics {
    pub ordered: i32,
    pub unordered: i32,
}

impl Default for MarkerMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_ORDERED_WIDTH, DEFAULT_UNORDERED_WIDTH)
    }
}

impl MarkerMetrics {
    /// Negative widths are clamped to zero.
    pub fn new(ordered: i32, unordered: i32) -> Self {
        Self {
            ordered: ordered.max(0),
            unordered: unordered.max(0),
        }
    }

    /// Measure both sample markers, keeping `self`'s widths for any marker
    /// the measurer can't handle.
    pub fn measured_with(self, measurer: &dyn MarkerMeasure) -> Self {
        let ordered = measurer.measure(ORDERED_SAMPLE).unwrap_or(self.ordered);
        let unordered = measurer.measure(UNORDERED_SAMPLE).unwrap_or(self.unordered);
        tracing::trace!(ordered, unordered, "measured list markers");
        Self::new(ordered, unordered)
    }

    /// Measure with the built-in fallback widths.
    pub fn measure(measurer: &dyn MarkerMeasure) -> Self {
        Self::default().measured_with(measurer)
    }

    pub fn width(&self, ordered: bool) -> i32 {
        if ordered { self.ordered } else { self.unordered }
    }
}
