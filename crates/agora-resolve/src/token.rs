//! Symbolic class-name tokenization.
//!
//! A symbolic name like `Agora\Packages\Foo_Bar_Controller` is split into
//! three parts before any resolution rule runs:
//!
//! - **namespace parts**: the backslash-separated segments before the
//!   final one (possibly empty),
//! - **stem**: every underscore-separated segment of the final part
//!   except the last, joined back with underscores (`Foo_Bar`),
//! - **suffix**: the final underscore-separated segment (`Controller`).
//!
//! The suffix must match `[A-Za-z0-9_]+`; anything else fails tokenization
//! immediately and no resolution rule is attempted.

use crate::error::ResolveError;

/// The namespace separator in symbolic names.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// A tokenized symbolic class name.
///
/// Construction goes through [`ClassNameToken::parse`], which enforces the
/// suffix charset invariant. A token is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNameToken {
    /// Namespace path segments, most-general first. Empty when the name
    /// carries no namespace.
    namespace: Vec<String>,
    /// All name segments except the last, joined with `_`. Empty for
    /// single-segment names.
    stem: String,
    /// The final name segment.
    suffix: String,
}

impl ClassNameToken {
    /// Parses a raw symbolic name.
    ///
    /// A leading namespace separator is ignored (`\Agora\Util` and
    /// `Agora\Util` tokenize identically).
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidName`] when the final segment is
    /// empty or contains characters outside `[A-Za-z0-9_]`.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let trimmed = raw.trim_start_matches(NAMESPACE_SEPARATOR);

        let mut parts: Vec<&str> = trimmed.split(NAMESPACE_SEPARATOR).collect();
        let last = parts.pop().unwrap_or_default();
        let namespace: Vec<String> = parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();

        let mut segments: Vec<&str> = last.split('_').collect();
        let suffix = segments.pop().unwrap_or_default().to_string();
        let stem = segments.join("_");

        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ResolveError::InvalidName(raw.to_string()));
        }

        Ok(Self {
            namespace,
            stem,
            suffix,
        })
    }

    /// The namespace path segments (empty slice when no namespace).
    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    /// True when the raw name carried at least one namespace segment.
    pub fn has_namespace(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// The stem: leading underscore segments joined with `_`.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// The final underscore segment.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The class name as originally written (stem and suffix rejoined).
    pub fn name(&self) -> String {
        if self.stem.is_empty() {
            self.suffix.clone()
        } else {
            format!("{}_{}", self.stem, self.suffix)
        }
    }

    /// Stem and suffix concatenated without a separator, as used by the
    /// file-naming rules (`Foo_Bar` + `Exception` → `Foo_BarException`).
    pub fn joined(&self) -> String {
        format!("{}{}", self.stem, self.suffix)
    }

    /// The underscore-separated segments of the class name, in order.
    pub fn segments(&self) -> Vec<&str> {
        if self.stem.is_empty() {
            vec![self.suffix.as_str()]
        } else {
            let mut segs: Vec<&str> = self.stem.split('_').collect();
            segs.push(self.suffix.as_str());
            segs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_segment() {
        let token = ClassNameToken::parse("Util").unwrap();
        assert!(!token.has_namespace());
        assert_eq!(token.stem(), "");
        assert_eq!(token.suffix(), "Util");
        assert_eq!(token.name(), "Util");
    }

    #[test]
    fn test_parse_multi_segment() {
        let token = ClassNameToken::parse("Foo_Bar_Controller").unwrap();
        assert_eq!(token.stem(), "Foo_Bar");
        assert_eq!(token.suffix(), "Controller");
        assert_eq!(token.name(), "Foo_Bar_Controller");
        assert_eq!(token.joined(), "Foo_BarController");
        assert_eq!(token.segments(), vec!["Foo", "Bar", "Controller"]);
    }

    #[test]
    fn test_parse_namespaced() {
        let token = ClassNameToken::parse("Agora\\Packages\\Manifest").unwrap();
        assert!(token.has_namespace());
        assert_eq!(token.namespace(), &["Agora", "Packages"]);
        assert_eq!(token.suffix(), "Manifest");
    }

    #[test]
    fn test_parse_leading_separator_ignored() {
        let a = ClassNameToken::parse("\\Agora\\Util").unwrap();
        let b = ClassNameToken::parse("Agora\\Util").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_invalid_suffix() {
        assert!(matches!(
            ClassNameToken::parse("Foo_Bar-Baz"),
            Err(ResolveError::InvalidName(_))
        ));
        assert!(matches!(
            ClassNameToken::parse("Foo_"),
            Err(ResolveError::InvalidName(_))
        ));
        assert!(matches!(
            ClassNameToken::parse(""),
            Err(ResolveError::InvalidName(_))
        ));
    }

    #[test]
    fn test_parse_invalid_suffix_with_namespace() {
        // The charset check applies regardless of namespace.
        assert!(matches!(
            ClassNameToken::parse("Agora\\Foo_Bad!"),
            Err(ResolveError::InvalidName(_))
        ));
    }

    #[test]
    fn test_digits_allowed_in_suffix() {
        let token = ClassNameToken::parse("Login2").unwrap();
        assert_eq!(token.suffix(), "Login2");
    }
}
