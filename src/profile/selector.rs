use crate::profile::types::{ScanProfile, UserTier};
use crate::ProfileError;

/// Largest sitemap that still defaults to a QUICK scan (inclusive)
pub const QUICK_SITEMAP_CEILING: u64 = 50;

/// Chooses the scan profile for a request
///
/// Decision order:
/// 1. An explicit override always wins, unless it asks for DEEP without
///    the enterprise tier, which is an error
/// 2. Enterprise users default to DEEP
/// 3. A sitemap hint picks QUICK for up to 50 URLs, SMART above that
/// 4. Without a hint, pro users get SMART and free users get QUICK
///
/// # Arguments
///
/// * `tier` - The requesting user's subscription tier
/// * `sitemap_url_count` - Number of URLs in the site's sitemap, if known
/// * `user_override` - Profile explicitly requested by the user
///
/// # Returns
///
/// * `Ok(ScanProfile)` - The profile to crawl with
/// * `Err(ProfileError::TierRequired)` - The override is not allowed for this tier
///
/// # Examples
///
/// ```
/// use scan_budget::profile::{select_profile, ScanProfile, UserTier};
///
/// assert_eq!(select_profile(UserTier::Pro, Some(50), None), Ok(ScanProfile::Quick));
/// assert_eq!(select_profile(UserTier::Pro, Some(51), None), Ok(ScanProfile::Smart));
/// assert!(select_profile(UserTier::Free, None, Some(ScanProfile::Deep)).is_err());
/// ```
pub fn select_profile(
    tier: UserTier,
    sitemap_url_count: Option<u64>,
    user_override: Option<ScanProfile>,
) -> Result<ScanProfile, ProfileError> {
    if let Some(requested) = user_override {
        if !can_use_profile(requested, tier) {
            return Err(ProfileError::TierRequired {
                profile: requested,
                required: UserTier::Enterprise,
                actual: tier,
            });
        }
        tracing::debug!("Using requested profile {} for {} tier", requested, tier);
        return Ok(requested);
    }

    let selected = if tier == UserTier::Enterprise {
        ScanProfile::Deep
    } else if let Some(count) = sitemap_url_count {
        if count <= QUICK_SITEMAP_CEILING {
            ScanProfile::Quick
        } else {
            ScanProfile::Smart
        }
    } else if tier == UserTier::Pro {
        ScanProfile::Smart
    } else {
        ScanProfile::Quick
    };

    tracing::debug!(
        "Selected profile {} (tier: {}, sitemap urls: {:?})",
        selected,
        tier,
        sitemap_url_count
    );

    Ok(selected)
}

/// Returns true if the tier is allowed to run the profile
///
/// QUICK and SMART are open to every tier; DEEP requires enterprise.
pub fn can_use_profile(profile: ScanProfile, tier: UserTier) -> bool {
    match profile {
        ScanProfile::Quick | ScanProfile::Smart => true,
        ScanProfile::Deep => tier == UserTier::Enterprise,
    }
}
