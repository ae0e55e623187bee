//! Output-field projection against the column whitelist.

use crate::models::FIELDS_ALL;

/// Resolve a requested projection.
///
/// Splits on commas, trims, keeps whitelist members only; an empty result
/// falls back to the given default projection. A literal `*` ("all
/// fields") is honored verbatim.
pub fn resolve_fields(raw: Option<&str>, fallback: &[&str]) -> String {
    let Some(raw) = raw else {
        return fallback.join(",");
    };
    let raw = raw.trim();
    if raw == "*" {
        return "*".to_string();
    }

    let cols: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|col| FIELDS_ALL.contains(col))
        .collect();
    if cols.is_empty() {
        fallback.join(",")
    } else {
        cols.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_FIELDS;

    #[test]
    fn keeps_whitelisted_columns_only() {
        assert_eq!(
            resolve_fields(Some("foo,apellido,bar"), DEFAULT_FIELDS),
            "apellido"
        );
        assert_eq!(
            resolve_fields(Some(" dni , nombres "), DEFAULT_FIELDS),
            "dni,nombres"
        );
    }

    #[test]
    fn falls_back_when_nothing_survives() {
        assert_eq!(
            resolve_fields(Some("foo,bar"), DEFAULT_FIELDS),
            DEFAULT_FIELDS.join(",")
        );
        assert_eq!(
            resolve_fields(Some(""), DEFAULT_FIELDS),
            DEFAULT_FIELDS.join(",")
        );
        assert_eq!(resolve_fields(None, DEFAULT_FIELDS), DEFAULT_FIELDS.join(","));
    }

    #[test]
    fn wildcard_passes_through_verbatim() {
        assert_eq!(resolve_fields(Some("*"), DEFAULT_FIELDS), "*");
        assert_eq!(resolve_fields(Some(" * "), DEFAULT_FIELDS), "*");
    }
}
