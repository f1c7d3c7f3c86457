//! Search and pagination helpers shared by the repository and API layers.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of upcoming posts on the dashboard.
pub const DEFAULT_UPCOMING_LIMIT: i64 = 5;

/// Maximum number of upcoming posts per request.
pub const MAX_UPCOMING_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

// ---------------------------------------------------------------------------
// ILIKE patterns
// ---------------------------------------------------------------------------

/// Build an `ILIKE` pattern that matches `term` anywhere in a column.
///
/// `%`, `_` and `\` in the term are escaped so they match literally. The
/// resulting pattern relies on PostgreSQL's default `\` escape character.
///
/// # Examples
///
/// ```
/// use genwise_core::search::contains_pattern;
/// assert_eq!(contains_pattern("ai"), "%ai%");
/// assert_eq!(contains_pattern("50%"), "%50\\%%");
/// ```
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Treat an absent or empty search term as "no search". Any other term is
/// passed through verbatim, surrounding whitespace included.
pub fn normalize_term(term: Option<&str>) -> Option<&str> {
    term.filter(|t| !t.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
