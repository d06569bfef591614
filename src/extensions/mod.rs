//! Collaborators around the layout core that touch the outside world.
//!
//! Nothing in `core` depends on these modules.

pub mod icons;

#[cfg(feature = "http-icons")]
pub use icons::HttpIconFetcher;
pub use icons::{
    FileIconFetcher, IconFetcher, IconLocation, IconLookup, IconResolver, RasterIcon,
    normalize_icon_url,
};
