//! Cleaning of free-text and identifier inputs.

/// Maximum length of a sanitized free-text token, in characters.
const MAX_SEARCH_LEN: usize = 100;

/// Maximum number of whitespace-separated tokens kept from a search input.
const MAX_SEARCH_TOKENS: usize = 5;

/// Escape LIKE wildcards so user input cannot inject its own patterns.
/// Backslash first, then `%` and `_`.
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Sanitize a categorical substring filter: trim, then escape wildcards.
/// Empty input is absence, not an error.
pub fn sanitize_like(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(escape_like_wildcards(trimmed))
}

/// Sanitize the free-text search input.
///
/// The value ends up embedded in a PostgREST `or=(...)` group, so grouping
/// metacharacters are stripped first; the token count and length caps bound
/// the cost of the disjunctive query.
pub fn sanitize_search(raw: Option<&str>) -> Option<String> {
    let cleaned: String = raw?
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | ',' | '"'))
        .collect();

    let joined = cleaned
        .split_whitespace()
        .take(MAX_SEARCH_TOKENS)
        .collect::<Vec<_>>()
        .join(" ");
    let capped: String = joined.chars().take(MAX_SEARCH_LEN).collect();

    let capped = capped.trim();
    if capped.is_empty() {
        return None;
    }
    Some(escape_like_wildcards(capped))
}

/// Strip every non-digit character from an identifier. Zero digits means
/// the identifier is absent.
pub fn clean_identifier(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() { None } else { Some(digits) }
}
