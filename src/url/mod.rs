//! URL handling module for Scan-Budget
//!
//! This module provides URL normalization, same-site checks and page
//! classification for frontier ordering.

mod classify;
mod domain;
mod normalize;

pub use classify::classify_page;
pub use domain::{extract_domain, same_site};
pub use normalize::{normalize_parsed, normalize_url};
