//! Content Checksum
//!
//! MD5 of a page's UTF-8 text, rendered as 32 lowercase hex characters.
//! Used only for change detection, never for integrity.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentChecksum(String);

impl ContentChecksum {
    pub fn of(content: &str) -> Self {
        Self(format!("{:x}", md5::compute(content.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a hex string as stored in the lock file
    pub fn matches(&self, stored: &str) -> bool {
        self.0.eq_ignore_ascii_case(stored)
    }
}

impl fmt::Display for ContentChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentChecksum {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
