//! ImageRef: the identifier of a stored photo.
//!
//! An image reference is the lowercase hex SHA-256 digest of the photo bytes
//! followed by `.jpg`. The extension is appended regardless of the actual
//! encoding of the upload.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// File extension appended to every stored blob.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Length of a hex encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// A validated blob identifier (`<64 hex chars>.jpg`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageRef(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("missing .jpg extension")]
    BadExtension,

    #[error("invalid digest length: expected 64 hex chars, got {0}")]
    InvalidLength(usize),

    #[error("digest must be lowercase hex")]
    InvalidHex,
}

impl ImageRef {
    /// Build a reference from a hex digest produced by the blob store.
    pub fn from_hex_digest(digest: &str) -> Result<Self, ImageRefError> {
        Self::check_digest(digest)?;
        Ok(Self(format!("{digest}.{IMAGE_EXTENSION}")))
    }

    /// Validate an identifier read back from storage or supplied by a caller.
    pub fn parse(s: &str) -> Result<Self, ImageRefError> {
        let digest = s
            .strip_suffix(IMAGE_EXTENSION)
            .and_then(|rest| rest.strip_suffix('.'))
            .ok_or(ImageRefError::BadExtension)?;
        Self::check_digest(digest)?;
        Ok(Self(s.to_string()))
    }

    fn check_digest(digest: &str) -> Result<(), ImageRefError> {
        if digest.len() != DIGEST_HEX_LEN {
            return Err(ImageRefError::InvalidLength(digest.len()));
        }
        if !digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(ImageRefError::InvalidHex);
        }
        Ok(())
    }

    /// The hex digest without the extension.
    pub fn digest(&self) -> &str {
        &self.0[..DIGEST_HEX_LEN]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ImageRef {
    type Err = ImageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ImageRef {
    type Error = ImageRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.0
    }
}

impl AsRef<str> for ImageRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_from_hex_digest_appends_extension() {
        let image = ImageRef::from_hex_digest(DIGEST).unwrap();
        assert_eq!(image.as_str(), format!("{DIGEST}.jpg"));
        assert_eq!(image.digest(), DIGEST);
    }

    #[test]
    fn test_parse_valid() {
        let image: ImageRef = format!("{DIGEST}.jpg").parse().unwrap();
        assert_eq!(image.digest(), DIGEST);
    }

    #[test]
    fn test_parse_rejects_wrong_extension() {
        assert_eq!(
            ImageRef::parse(&format!("{DIGEST}.png")),
            Err(ImageRefError::BadExtension)
        );
        assert_eq!(ImageRef::parse(DIGEST), Err(ImageRefError::BadExtension));
    }

    #[test]
    fn test_parse_rejects_traversal() {
        assert!(ImageRef::parse("../../etc/passwd.jpg").is_err());
        assert!(ImageRef::parse(&format!("../{DIGEST}.jpg")).is_err());
    }

    #[test]
    fn test_parse_rejects_uppercase_hex() {
        let upper = format!("{}.jpg", DIGEST.to_uppercase());
        assert_eq!(ImageRef::parse(&upper), Err(ImageRefError::InvalidHex));
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let json = serde_json::json!("default.jpg");
        assert!(serde_json::from_value::<ImageRef>(json).is_err());
    }
}
