//! Where a description document is read from.

use std::fmt;
use std::path::PathBuf;

/// Source of a description document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionLocation {
    /// A local file.
    File(PathBuf),
    /// An `http` or `https` URL.
    Url(String),
}

impl DescriptionLocation {
    /// Classifies a location string.
    ///
    /// Strings starting with `http://` or `https://`, in any case, are URLs;
    /// everything else is a file path.
    ///
    /// # Examples
    ///
    /// ```
    /// use portico::description::domain::DescriptionLocation;
    ///
    /// assert!(matches!(
    ///     DescriptionLocation::parse("HTTPS://api.example.com/openapi.json"),
    ///     DescriptionLocation::Url(_)
    /// ));
    /// assert!(matches!(
    ///     DescriptionLocation::parse("./openapi.json"),
    ///     DescriptionLocation::File(_)
    /// ));
    /// ```
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lowered = trimmed.to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DescriptionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}
