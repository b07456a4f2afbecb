pub mod error;

pub use error::{ErrorCategory, ErrorClassifier, LlmError, OverloadError, Result};

// =============================================================================
// Domain Newtypes
// =============================================================================

use std::fmt;

/// Type-safe wrapper for a library name (its directory name under the docs root)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LibraryName(String);

impl LibraryName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the compiled artifact (`<library>.md`)
    pub fn compiled_file_name(&self) -> String {
        format!("{}.md", self.0)
    }
}

impl fmt::Display for LibraryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LibraryName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for LibraryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod newtype_tests {
    use super::*;

    #[test]
    fn test_library_name() {
        let name = LibraryName::new("reactjs");
        assert_eq!(name.as_str(), "reactjs");
        assert_eq!(name.compiled_file_name(), "reactjs.md");
        assert_eq!(format!("{}", name), "reactjs");
    }

    #[test]
    fn test_library_name_ordering() {
        let mut names = vec![LibraryName::from("htmx"), LibraryName::from("angular")];
        names.sort();
        assert_eq!(names[0].as_str(), "angular");
    }
}
