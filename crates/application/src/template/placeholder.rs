//! Placeholder parser for `${name}` and `${source.name}` syntax
//!
//! Parses template text to extract placeholder references with their positions.

use std::fmt;
use std::ops::Range;

use docmerge_domain::is_valid_identifier;

/// A placeholder token found in template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderReference {
    /// The placeholder name (without `${ }`), possibly source-qualified.
    pub name: String,

    /// Byte range in the original text where this token appears.
    pub span: Range<usize>,
}

impl PlaceholderReference {
    /// Creates a new placeholder reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses text and extracts all placeholder references.
///
/// # Examples
///
/// ```
/// use docmerge_application::template::parse_placeholders;
///
/// let refs = parse_placeholders("Dear ${title} ${crm.customer},");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "title");
/// assert_eq!(refs[1].name, "crm.customer");
/// ```
#[must_use]
pub fn parse_placeholders(input: &str) -> Vec<PlaceholderReference> {
    let mut references = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch != '$' || chars.next_if(|(_, c)| *c == '{').is_none() {
            continue;
        }

        let start = i;
        let mut name = String::new();
        let mut found_end = false;

        for (j, ch) in chars.by_ref() {
            if ch == '}' {
                let trimmed_name = name.trim();
                if !trimmed_name.is_empty() {
                    references.push(PlaceholderReference::new(trimmed_name, start..j + 1));
                }
                found_end = true;
                break;
            }
            name.push(ch);
        }

        // An unclosed token swallows the rest of the input
        if !found_end {
            break;
        }
    }

    references
}

/// Returns true if the input contains any placeholder token.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    !parse_placeholders(input).is_empty()
}

/// Extracts just the placeholder names, in order and with repeats.
#[must_use]
pub fn extract_placeholder_names(input: &str) -> Vec<String> {
    parse_placeholders(input)
        .into_iter()
        .map(|r| r.name)
        .collect()
}

/// A placeholder name split into its optional source qualifier and the
/// variable name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    /// The source name, if the placeholder is qualified.
    pub source: Option<String>,

    /// The variable name within the source.
    pub name: String,
}

impl Placeholder {
    /// Parses a placeholder name such as `sex` or `crm.customer`.
    ///
    /// Returns `None` if either part is not a valid identifier.
    #[must_use]
    pub fn parse(raw: &str, separator: char) -> Option<Self> {
        let raw = raw.trim();
        let (source, name) = match raw.split_once(separator) {
            Some((source, name)) => (Some(source.trim()), name.trim()),
            None => (None, raw),
        };

        if !is_valid_identifier(name) || !source.is_none_or(is_valid_identifier) {
            return None;
        }

        Some(Self {
            source: source.map(str::to_string),
            name: name.to_string(),
        })
    }

    /// Returns true if the placeholder names a source.
    #[must_use]
    pub const fn is_qualified(&self) -> bool {
        self.source.is_some()
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{source}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_placeholder() {
        let refs = parse_placeholders("${name}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].span, 0..7);
    }

    #[test]
    fn test_parse_multiple_placeholders() {
        let refs = parse_placeholders("${sex} / ${readme} / ${crm.customer}");
        let names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["sex", "readme", "crm.customer"]);
    }

    #[test]
    fn test_parse_with_whitespace() {
        let refs = parse_placeholders("${ name }");
        assert_eq!(refs[0].name, "name");
    }

    #[test]
    fn test_no_placeholders() {
        assert!(parse_placeholders("Hello, World! It costs $5 {really}").is_empty());
        assert!(!has_placeholders("plain text"));
    }

    #[test]
    fn test_unclosed_placeholder() {
        assert!(parse_placeholders("${name").is_empty());
        assert_eq!(extract_placeholder_names("${a} then ${b"), vec!["a"]);
    }

    #[test]
    fn test_empty_placeholder() {
        assert!(parse_placeholders("${}").is_empty());
        assert!(parse_placeholders("${   }").is_empty());
    }

    #[test]
    fn test_adjacent_placeholders() {
        assert_eq!(extract_placeholder_names("${a}${b}${c}"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_repeats_are_kept() {
        assert_eq!(extract_placeholder_names("${a} ${a}"), vec!["a", "a"]);
    }

    #[test]
    fn test_span_positions() {
        let input = "Dear ${name}, welcome!";
        let refs = parse_placeholders(input);
        assert_eq!(&input[refs[0].span.clone()], "${name}");
    }

    #[test]
    fn test_span_with_multibyte_text() {
        let input = "変数 ${sex} です";
        let refs = parse_placeholders(input);
        assert_eq!(&input[refs[0].span.clone()], "${sex}");
    }

    #[test]
    fn test_placeholder_unqualified() {
        let placeholder = Placeholder::parse("sex", '.').unwrap();
        assert_eq!(placeholder.source, None);
        assert_eq!(placeholder.name, "sex");
        assert!(!placeholder.is_qualified());
    }

    #[test]
    fn test_placeholder_qualified() {
        let placeholder = Placeholder::parse("crm.customer", '.').unwrap();
        assert_eq!(placeholder.source.as_deref(), Some("crm"));
        assert_eq!(placeholder.name, "customer");
        assert_eq!(placeholder.to_string(), "crm.customer");
    }

    #[test]
    fn test_placeholder_custom_separator() {
        let placeholder = Placeholder::parse("crm:customer", ':').unwrap();
        assert_eq!(placeholder.source.as_deref(), Some("crm"));
        assert!(Placeholder::parse("crm.customer", ':').is_none());
    }

    #[test]
    fn test_invalid_placeholders() {
        for raw in ["", "1abc", ".name", "crm.", "a.b.c", "has space"] {
            assert!(Placeholder::parse(raw, '.').is_none(), "{raw:?} should be invalid");
        }
    }
}
