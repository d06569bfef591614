use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// How a record's icon reference should be drawn.
///
/// Layout never depends on the kind: icons, glyphs and fallback dots all
/// occupy the same marker slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconKind {
    Url,
    LocalPath,
    LiteralGlyph,
    None,
}

impl IconKind {
    /// `true` when the reference points at raster bytes that must be fetched.
    #[must_use]
    pub fn is_raster(self) -> bool {
        matches!(self, Self::Url | Self::LocalPath)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPolicy {
    /// Lowercase file suffixes treated as local raster images.
    pub raster_extensions: Vec<String>,
}

impl Default for IconPolicy {
    fn default() -> Self {
        Self {
            raster_extensions: [".png", ".jpg", ".jpeg", ".webp"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl IconPolicy {
    pub fn validate(&self) -> ChartResult<()> {
        for extension in &self.raster_extensions {
            if extension.trim().is_empty() {
                return Err(ChartError::InvalidConfig(
                    "`rasterExtensions` entries must not be blank".to_owned(),
                ));
            }
        }
        Ok(())
    }

    fn has_raster_extension(&self, reference: &str) -> bool {
        let lowered = reference.to_lowercase();
        self.raster_extensions
            .iter()
            .any(|extension| lowered.ends_with(&extension.to_lowercase()))
    }
}

/// Classifies an icon reference.
///
/// `http://`/`https://` prefixes (any case) are URLs; other references with
/// a raster suffix are local paths; anything else non-blank is drawn as a
/// literal glyph. Blank references fall back to a dot.
#[must_use]
pub fn classify_icon(reference: &str, policy: &IconPolicy) -> IconKind {
    let reference = reference.trim();
    if reference.is_empty() {
        return IconKind::None;
    }
    if is_http_url(reference) {
        return IconKind::Url;
    }
    if policy.has_raster_extension(reference) {
        return IconKind::LocalPath;
    }
    IconKind::LiteralGlyph
}

pub(crate) fn is_http_url(reference: &str) -> bool {
    let lowered = reference.to_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}
