use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Maximum number of social links stored on a profile.
pub const MAX_SOCIAL_LINKS: usize = 5;

/// A social link shown on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub platform: String,
}

/// Parse the `socialLinks` multipart field, a JSON-encoded array of links.
///
/// # Errors
///
/// Returns [`CoreError::InvalidSocialLinks`] if the value is not a JSON array
/// of links or holds more than [`MAX_SOCIAL_LINKS`] entries.
pub fn parse_social_links(raw: &str) -> Result<Vec<SocialLink>, CoreError> {
    let links: Vec<SocialLink> = serde_json::from_str(raw)
        .map_err(|e| CoreError::InvalidSocialLinks(e.to_string()))?;

    if links.len() > MAX_SOCIAL_LINKS {
        return Err(CoreError::InvalidSocialLinks(format!(
            "at most {MAX_SOCIAL_LINKS} links allowed, got {}",
            links.len()
        )));
    }

    Ok(links)
}

/// Whole days elapsed between `since` and `now`, never negative.
#[must_use]
pub fn account_age_days(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_days().max(0)
}
