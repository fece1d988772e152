use serde::{Deserialize, Serialize};

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Kind of an uploaded asset, derived from its content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify an upload by its MIME type.
    ///
    /// Anything that is not an image is treated as a video, including a
    /// missing or unrecognised content type.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.trim().to_ascii_lowercase().starts_with("image") {
            Self::Image
        } else {
            Self::Video
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category filter taken from a `?category=` query parameter.
///
/// `None`, an empty string, and `"All"` all mean "every category".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    Any,
    Exact(String),
}

impl CategoryFilter {
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Any,
            Some(value) if value.is_empty() || value == ALL_CATEGORIES => Self::Any,
            Some(value) => Self::Exact(value.to_string()),
        }
    }

    /// The exact category to match, if any.
    #[must_use]
    pub fn as_exact(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Exact(category) => Some(category),
        }
    }
}

/// Interpret a multipart `isPublic` form value. Only the literal `"true"` is public.
#[must_use]
pub fn parse_visibility(raw: Option<&str>) -> bool {
    raw == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_content_types_are_images() {
        assert_eq!(MediaKind::from_content_type("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_content_type("image/gif"), MediaKind::Image);
    }

    #[test]
    fn everything_else_is_video() {
        assert_eq!(MediaKind::from_content_type("video/mp4"), MediaKind::Video);
        assert_eq!(
            MediaKind::from_content_type("application/octet-stream"),
            MediaKind::Video
        );
        assert_eq!(MediaKind::from_content_type(""), MediaKind::Video);
    }

    #[test]
    fn media_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MediaKind::Video).expect("serialize");
        assert_eq!(json, "\"video\"");
    }

    #[test]
    fn all_and_empty_disable_category_filter() {
        assert_eq!(CategoryFilter::from_query(None), CategoryFilter::Any);
        assert_eq!(CategoryFilter::from_query(Some("")), CategoryFilter::Any);
        assert_eq!(CategoryFilter::from_query(Some("All")), CategoryFilter::Any);
    }

    #[test]
    fn category_filter_is_exact_and_case_sensitive() {
        let filter = CategoryFilter::from_query(Some("comedy"));
        assert_eq!(filter.as_exact(), Some("comedy"));
        assert_ne!(filter, CategoryFilter::from_query(Some("Comedy")));
        assert_eq!(CategoryFilter::Any.as_exact(), None);
    }

    #[test]
    fn lowercase_all_is_a_real_category() {
        assert_eq!(
            CategoryFilter::from_query(Some("all")),
            CategoryFilter::Exact("all".to_string())
        );
    }

    #[test]
    fn visibility_only_accepts_literal_true() {
        assert!(parse_visibility(Some("true")));
        assert!(!parse_visibility(Some("TRUE")));
        assert!(!parse_visibility(Some("1")));
        assert!(!parse_visibility(None));
    }
}
