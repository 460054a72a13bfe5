//! Route pattern → platform routing `src` rewriting.
//!
//! | Input                  | Output                              |
//! |------------------------|-------------------------------------|
//! | `/^\/$/`               | `^/?(?:/__data.json)?$`             |
//! | `^/$/`                 | `^/?(?:/__data.json)?$`             |
//! | `^/blog/post\/1$/`     | `^/blog/post/1(?:/__data.json)?$`   |
//! | `^/blog/([^/]+?)/?$`   | `^/blog/([^/]+?)/?(?:/__data.json)?$` |
//!
//! The appended suffix lets one rule also serve the route's data-only
//! request (`/blog/x/__data.json`).

/// Suffix matching the companion data request of a route.
pub const DATA_SUFFIX: &str = "(?:/__data.json)?$";

/// Rewrite an anchored route pattern into a routing rule `src`.
///
/// Accepts the regex literal form (`/^...$/`), the internal form (`^...$/`)
/// and a plain anchored regex (`^...$`).
pub fn rewrite_pattern(pattern: &str) -> String {
    let body = strip_delimiters(pattern).replace("\\/", "/");

    // The root must match both `/` and the empty path.
    let body = if body == "^/" { "^/?" } else { body.as_str() };

    format!("{body}{DATA_SUFFIX}")
}

/// Strip the leading literal delimiter and the trailing `$/` (or `$`).
fn strip_delimiters(pattern: &str) -> &str {
    let body = match pattern.strip_prefix('/') {
        Some(rest) if rest.starts_with('^') => rest,
        _ => pattern,
    };

    body.strip_suffix("$/")
        .or_else(|| body.strip_suffix('$'))
        .unwrap_or(body)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_rewrite_root() {
        assert_eq!(rewrite_pattern("^/$/"), "^/?(?:/__data.json)?$");
        assert_eq!(rewrite_pattern("/^\\/$/"), "^/?(?:/__data.json)?$");
        assert_eq!(rewrite_pattern("^/$"), "^/?(?:/__data.json)?$");
    }

    #[test]
    fn test_rewrite_unescapes_separators() {
        assert_eq!(
            rewrite_pattern("^/blog/post\\/1$/"),
            "^/blog/post/1(?:/__data.json)?$"
        );
        assert_eq!(
            rewrite_pattern("/^\\/blog\\/([^/]+?)\\/?$/"),
            "^/blog/([^/]+?)/?(?:/__data.json)?$"
        );
    }

    #[test]
    fn test_rewrite_plain_regex() {
        assert_eq!(
            rewrite_pattern("^/api/.+$"),
            "^/api/.+(?:/__data.json)?$"
        );
    }

    #[test]
    fn test_root_rewrite_matches_empty_and_slash() {
        let re = Regex::new(&rewrite_pattern("^/$/")).unwrap();

        assert!(re.is_match(""));
        assert!(re.is_match("/"));
        assert!(re.is_match("/__data.json"));
        assert!(!re.is_match("/about"));
    }

    #[test]
    fn test_rewrite_matches_data_request() {
        let re = Regex::new(&rewrite_pattern("/^\\/blog\\/([^/]+?)\\/?$/")).unwrap();

        assert!(re.is_match("/blog/hello"));
        assert!(re.is_match("/blog/hello/"));
        assert!(re.is_match("/blog/hello/__data.json"));
        assert!(!re.is_match("/blog/hello/world"));
        assert!(!re.is_match("/blog"));
    }

    #[test]
    fn test_non_root_keeps_exact_anchor() {
        // only the bare root gets the optional slash
        let re = Regex::new(&rewrite_pattern("^/about$/")).unwrap();
        assert!(re.is_match("/about"));
        assert!(!re.is_match("about"));
        assert!(!re.is_match("/about/extra"));
    }
}
