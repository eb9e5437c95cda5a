//! Enumeration types for query parameters and downloads.

use serde::{Deserialize, Serialize};

/// Sort key accepted by the query API's `sortBy` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Search relevance.
    Relevance,
    /// Date of the most recent version.
    LastUpdatedDate,
    /// Date of the first version.
    SubmittedDate,
}

impl SortBy {
    /// Parse the exact wire spelling.
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "relevance" => Some(Self::Relevance),
            "lastUpdatedDate" => Some(Self::LastUpdatedDate),
            "submittedDate" => Some(Self::SubmittedDate),
            _ => None,
        }
    }

    /// Wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::LastUpdatedDate => "lastUpdatedDate",
            Self::SubmittedDate => "submittedDate",
        }
    }
}

/// Sort direction accepted by `sortOrder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest / least relevant first.
    Ascending,
    /// Newest / most relevant first.
    Descending,
}

impl SortOrder {
    /// Parse the exact wire spelling.
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "ascending" => Some(Self::Ascending),
            "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    /// Wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// File format of a downloaded figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG, also the fallback when nothing else matches.
    #[default]
    Png,
    /// JPEG.
    Jpeg,
    /// GIF.
    Gif,
    /// WebP.
    Webp,
}

impl ImageFormat {
    /// Pick a format from the content type or URL suffix.
    ///
    /// Formats are tried in the order PNG, JPEG, GIF, WebP, and either signal
    /// matches. Anything unrecognized is saved as PNG.
    #[must_use]
    pub fn detect(content_type: Option<&str>, url: &str) -> Self {
        let content_type = content_type.unwrap_or_default().to_lowercase();
        let url = url.to_lowercase();

        if content_type.contains("png") || url.ends_with(".png") {
            Self::Png
        } else if content_type.contains("jpeg")
            || content_type.contains("jpg")
            || url.ends_with(".jpg")
            || url.ends_with(".jpeg")
        {
            Self::Jpeg
        } else if content_type.contains("gif") || url.ends_with(".gif") {
            Self::Gif
        } else if content_type.contains("webp") || url.ends_with(".webp") {
            Self::Webp
        } else {
            Self::Png
        }
    }

    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}
