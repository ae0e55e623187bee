//! Sort-field whitelisting and direction parsing.

use std::fmt;

use crate::models::{DEFAULT_SORT_FIELD, SORT_FIELDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the sort column and direction.
///
/// The field must be a whitelist member; anything else (including absence)
/// falls back to the default field. Any direction starting with `d`,
/// case-insensitive, sorts descending.
pub fn parse_sort(field: Option<&str>, order: Option<&str>) -> (&'static str, SortOrder) {
    let field = field
        .map(str::trim)
        .and_then(|requested| SORT_FIELDS.iter().find(|known| **known == requested))
        .map_or(DEFAULT_SORT_FIELD, |known| *known);

    let order = if order
        .map(str::trim)
        .is_some_and(|o| o.to_ascii_lowercase().starts_with('d'))
    {
        SortOrder::Desc
    } else {
        SortOrder::Asc
    };

    (field, order)
}
