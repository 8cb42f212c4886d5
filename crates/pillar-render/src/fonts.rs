//! Font lookup for the raster text backend.
//!
//! Text nodes name their font with a free-form key. A [`FontBook`] resolves
//! that key to a parsed [`fontdue::Font`]: first among fonts registered up
//! front, then by treating the key as a font file path, and finally by
//! falling back to the first system font found on [`FONT_SEARCH_PATHS`].

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use pillar_common::warning::warn_once;
use pillar_layout::LayoutError;

/// System font paths tried when a key cannot be resolved.
pub const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Parse font bytes, mapping fontdue's `&str` error into `anyhow`.
fn parse_font(data: Vec<u8>) -> Result<Font> {
    Font::from_bytes(data, FontSettings::default()).map_err(|e| anyhow::anyhow!("{e}"))
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths<'a>(paths: &[&'a str]) -> Option<(Font, &'a str)> {
    for path in paths {
        if let Ok(data) = fs::read(path)
            && let Ok(font) = parse_font(data)
        {
            return Some((font, *path));
        }
    }
    None
}

/// Cache of parsed fonts keyed by the names text nodes use.
#[derive(Default)]
pub struct FontBook {
    fonts: Mutex<HashMap<String, Arc<Font>>>,
    fallback: Mutex<Option<Arc<Font>>>,
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .fonts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        f.debug_struct("FontBook").field("fonts", &keys).finish()
    }
}

impl FontBook {
    /// An empty book. Lookups fall through to files and system fonts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `data` and register it under `key`, replacing any earlier font
    /// with that key.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is not a font fontdue can parse.
    pub fn register_bytes(&self, key: impl Into<String>, data: Vec<u8>) -> Result<()> {
        let key = key.into();
        let font = parse_font(data).with_context(|| format!("failed to parse font '{key}'"))?;
        let _ = self
            .fonts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::new(font));
        Ok(())
    }

    /// Read the font file at `path` and register it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn register_file(&self, key: impl Into<String>, path: &Path) -> Result<()> {
        let data = fs::read(path)
            .with_context(|| format!("failed to read font file '{}'", path.display()))?;
        self.register_bytes(key, data)
    }

    /// Whether `key` is already registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fonts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Resolve `key` to a font.
    ///
    /// An unregistered key is tried as a font file path; if that fails the
    /// first system font is used and a warning is reported once per key.
    /// The empty key asks for the system font directly.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Backend`] if no font can be found at all.
    pub fn resolve(&self, key: &str) -> Result<Arc<Font>, LayoutError> {
        if let Some(font) = self
            .fonts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            return Ok(Arc::clone(font));
        }

        if !key.is_empty()
            && self.register_file(key, Path::new(key)).is_ok()
        {
            tracing::debug!(font = key, "loaded font file");
            return self.resolve(key);
        }

        let font = self.system_fallback()?;
        if !key.is_empty() {
            warn_once(
                "fonts",
                &format!("font '{key}' not found, falling back to a system font"),
            );
        }
        let _ = self
            .fonts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), Arc::clone(&font));
        Ok(font)
    }

    /// The first loadable system font, loaded once.
    fn system_fallback(&self) -> Result<Arc<Font>, LayoutError> {
        let mut fallback = self.fallback.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(font) = fallback.as_ref() {
            return Ok(Arc::clone(font));
        }
        let Some((font, path)) = load_font_from_paths(FONT_SEARCH_PATHS) else {
            return Err(LayoutError::Backend(format!(
                "no usable font: searched {}",
                FONT_SEARCH_PATHS.join(", ")
            )));
        };
        tracing::debug!(path, "loaded system font");
        let font = Arc::new(font);
        *fallback = Some(Arc::clone(&font));
        Ok(font)
    }
}
