//! Pluralization for log lines.

/// `"s"` unless `n == 1`.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `plural_count(3, "route")` -> `"3 routes"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "function"), "0 functions");
        assert_eq!(plural_count(1, "function"), "1 function");
        assert_eq!(plural_count(2, "route"), "2 routes");
    }
}
