use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use image::imageops::FilterType;
use tracing::{trace, warn};

use crate::core::{IconKind, IconPolicy, classify_icon};
use crate::error::{ChartError, ChartResult};

/// Where raster bytes for an icon reference live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconLocation {
    Url(String),
    Path(PathBuf),
}

impl IconLocation {
    /// Resolves a raw reference, or `None` for glyphs and blank references.
    #[must_use]
    pub fn from_reference(reference: &str, policy: &IconPolicy) -> Option<Self> {
        let reference = reference.trim();
        match classify_icon(reference, policy) {
            IconKind::Url => Some(Self::Url(normalize_icon_url(reference))),
            IconKind::LocalPath => Some(Self::Path(PathBuf::from(reference))),
            IconKind::LiteralGlyph | IconKind::None => None,
        }
    }
}

/// Rewrites GitHub `blob` page URLs to their raw-content form.
///
/// `https://github.com/u/r/blob/sha/icon.png` becomes
/// `https://raw.githubusercontent.com/u/r/sha/icon.png`. Other URLs pass
/// through unchanged.
#[must_use]
pub fn normalize_icon_url(url: &str) -> String {
    if url.contains("github.com") && url.contains("/blob/") {
        return url
            .replacen("https://github.com/", "https://raw.githubusercontent.com/", 1)
            .replacen("/blob/", "/", 1);
    }
    url.to_owned()
}

/// Source of raw icon bytes. Implementations must bound their own latency.
pub trait IconFetcher: Send + Sync {
    fn fetch(&self, location: &IconLocation) -> ChartResult<Vec<u8>>;
}

/// Reads local raster files; URL locations are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileIconFetcher;

impl IconFetcher for FileIconFetcher {
    fn fetch(&self, location: &IconLocation) -> ChartResult<Vec<u8>> {
        match location {
            IconLocation::Path(path) => {
                std::fs::read(path).map_err(|err| ChartError::IconResolution {
                    reference: path.display().to_string(),
                    reason: err.to_string(),
                })
            }
            IconLocation::Url(url) => Err(ChartError::IconResolution {
                reference: url.clone(),
                reason: "remote icons require the `http-icons` feature".to_owned(),
            }),
        }
    }
}

/// Fetches remote icons over HTTP(S) with a bounded timeout and reads
/// local paths from disk.
#[cfg(feature = "http-icons")]
#[derive(Debug, Clone)]
pub struct HttpIconFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http-icons")]
impl HttpIconFetcher {
    pub fn new(timeout: std::time::Duration) -> ChartResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0")
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ChartError::InvalidConfig(format!("reqwest client error: {e}")))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http-icons")]
impl IconFetcher for HttpIconFetcher {
    fn fetch(&self, location: &IconLocation) -> ChartResult<Vec<u8>> {
        let url = match location {
            IconLocation::Url(url) => url,
            IconLocation::Path(_) => return FileIconFetcher.fetch(location),
        };
        let to_error = |e: reqwest::Error| ChartError::IconResolution {
            reference: url.clone(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(to_error)?;
        let bytes = response.bytes().map_err(to_error)?;
        Ok(bytes.to_vec())
    }
}

/// Decoded square RGBA8 icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterIcon {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Read access to already-resolved icons.
pub trait IconLookup {
    /// Returns the raster for `reference`, or `None` when unavailable.
    fn raster(&self, reference: &str) -> Option<Arc<RasterIcon>>;
}

type IconSlot = Arc<OnceLock<Option<Arc<RasterIcon>>>>;

/// Memoizing, fail-soft icon resolver.
///
/// Each distinct reference is fetched and decoded at most once, even when
/// callers race on it; failures are logged and remembered as unavailable so
/// the marker falls back to a dot.
pub struct IconResolver<F: IconFetcher> {
    fetcher: F,
    policy: IconPolicy,
    pixel_size: u32,
    cache: Mutex<HashMap<String, IconSlot>>,
}

impl<F: IconFetcher> IconResolver<F> {
    pub fn new(fetcher: F, policy: IconPolicy, pixel_size: u32) -> ChartResult<Self> {
        policy.validate()?;
        if pixel_size == 0 {
            return Err(ChartError::InvalidConfig(
                "icon pixel size must be > 0".to_owned(),
            ));
        }
        Ok(Self {
            fetcher,
            policy,
            pixel_size,
            cache: Mutex::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Resolves one reference, using the cache when possible.
    ///
    /// Concurrent callers for the same uncached reference wait on a single
    /// fetch instead of issuing their own.
    pub fn resolve(&self, reference: &str) -> Option<Arc<RasterIcon>> {
        let key = reference.trim();
        let slot = Arc::clone(self.lock_cache().entry(key.to_owned()).or_default());
        if let Some(cached) = slot.get() {
            trace!(reference = key, hit = cached.is_some(), "icon cache hit");
            return cached.clone();
        }

        slot.get_or_init(|| match self.try_resolve(key) {
            Ok(icon) => Some(Arc::new(icon)),
            Err(err) => {
                warn!(reference = key, error = %err, "icon unavailable, using dot marker");
                None
            }
        })
        .clone()
    }

    /// Fetches and decodes without touching the cache, surfacing the error.
    pub fn try_resolve(&self, reference: &str) -> ChartResult<RasterIcon> {
        let location = IconLocation::from_reference(reference, &self.policy).ok_or_else(|| {
            ChartError::IconResolution {
                reference: reference.to_owned(),
                reason: "reference is not a raster location".to_owned(),
            }
        })?;
        let bytes = self.fetcher.fetch(&location)?;
        decode_icon(reference, &bytes, self.pixel_size)
    }

    /// Resolves every distinct raster reference and returns how many are available.
    pub fn resolve_all<'a, I>(&self, references: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut unique: Vec<&str> = references
            .into_iter()
            .map(str::trim)
            .filter(|reference| classify_icon(reference, &self.policy).is_raster())
            .collect();
        unique.sort_unstable();
        unique.dedup();

        #[cfg(feature = "parallel-icons")]
        {
            use rayon::prelude::*;
            unique
                .par_iter()
                .filter(|reference| self.resolve(reference).is_some())
                .count()
        }

        #[cfg(not(feature = "parallel-icons"))]
        {
            unique
                .iter()
                .filter(|reference| self.resolve(reference).is_some())
                .count()
        }
    }

    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<String, IconSlot>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F: IconFetcher> IconLookup for IconResolver<F> {
    fn raster(&self, reference: &str) -> Option<Arc<RasterIcon>> {
        self.resolve(reference)
    }
}

fn decode_icon(reference: &str, bytes: &[u8], pixel_size: u32) -> ChartResult<RasterIcon> {
    let decoded = image::load_from_memory(bytes).map_err(|e| ChartError::IconResolution {
        reference: reference.to_owned(),
        reason: format!("decode failed: {e}"),
    })?;
    let resized = decoded
        .resize_exact(pixel_size, pixel_size, FilterType::Lanczos3)
        .to_rgba8();

    Ok(RasterIcon {
        width: resized.width(),
        height: resized.height(),
        rgba: resized.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::normalize_icon_url;

    #[test]
    fn github_blob_urls_become_raw_urls() {
        assert_eq!(
            normalize_icon_url("https://github.com/u/r/blob/main/icons/a.png"),
            "https://raw.githubusercontent.com/u/r/main/icons/a.png"
        );
        assert_eq!(
            normalize_icon_url("https://example.com/a.png"),
            "https://example.com/a.png"
        );
    }
}
