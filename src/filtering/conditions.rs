//! Compilation of sanitized inputs into PostgREST query parameters.

use crate::models::{
    DEFAULT_FIELDS, DEFAULT_STATS_GROUP, DETAIL_FIELDS, ListParams, STATS_GROUPS,
};

use super::dates::{parse_range_end, parse_range_start};
use super::pagination::{parse_page, parse_page_size};
use super::projection::resolve_fields;
use super::search::{clean_identifier, sanitize_like, sanitize_search};
use super::sort::{SortOrder, parse_sort};

/// A fully sanitized list request. Every field has passed whitelist
/// membership or character-class sanitization; nothing here may carry raw
/// client input.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub q: Option<String>,
    pub dni: Option<String>,
    pub empresa: Option<String>,
    pub sector: Option<String>,
    pub lugar_trabajo: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
    pub updated_from: Option<String>,
    pub updated_to: Option<String>,
    pub page: u64,
    pub page_size: u64,
    pub sort_field: &'static str,
    pub sort_order: SortOrder,
    pub select: String,
}

impl ListQuery {
    /// Sanitize raw list parameters. Infallible by contract: malformed
    /// optional input degrades to absence or defaults.
    #[must_use]
    pub fn from_params(params: &ListParams, max_page_size: u64) -> Self {
        let (sort_field, sort_order) =
            parse_sort(params.sort.as_deref(), params.order.as_deref());
        Self {
            q: sanitize_search(params.q.as_deref()),
            dni: params.dni.as_deref().and_then(clean_identifier),
            empresa: sanitize_like(params.empresa.as_deref()),
            sector: sanitize_like(params.sector.as_deref()),
            lugar_trabajo: sanitize_like(params.lugar_trabajo.as_deref()),
            created_from: parse_range_start(params.created_from.as_deref()),
            created_to: parse_range_end(params.created_to.as_deref()),
            updated_from: parse_range_start(params.updated_from.as_deref()),
            updated_to: parse_range_end(params.updated_to.as_deref()),
            page: parse_page(params.page.as_deref()),
            page_size: parse_page_size(params.page_size.as_deref(), max_page_size),
            sort_field,
            sort_order,
            select: resolve_fields(params.fields.as_deref(), DEFAULT_FIELDS),
        }
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }

    /// Compile into the ordered PostgREST parameter sequence.
    ///
    /// Constraints are conjunctive; the free-text search is the single
    /// disjunctive `or=(...)` group, spanning the surname, given-names and
    /// precomputed full-name columns with case-insensitive substring
    /// matches. Date columns bounded on both sides emit two pairs with the
    /// same key.
    #[must_use]
    pub fn compile(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("select".to_string(), self.select.clone()),
            (
                "order".to_string(),
                format!("{}.{}", self.sort_field, self.sort_order),
            ),
            ("limit".to_string(), self.page_size.to_string()),
            ("offset".to_string(), self.offset().to_string()),
        ];

        if let Some(dni) = &self.dni {
            pairs.push(("dni".to_string(), format!("eq.{dni}")));
        }
        if let Some(q) = &self.q {
            pairs.push((
                "or".to_string(),
                format!(
                    "(apellido.ilike.*{q}*,nombres.ilike.*{q}*,apellido_nombre.ilike.*{q}*)"
                ),
            ));
        }
        if let Some(empresa) = &self.empresa {
            pairs.push(("empresa".to_string(), format!("ilike.*{empresa}*")));
        }
        if let Some(sector) = &self.sector {
            pairs.push(("sector".to_string(), format!("ilike.*{sector}*")));
        }
        if let Some(lugar) = &self.lugar_trabajo {
            pairs.push(("lugar_trabajo".to_string(), format!("ilike.*{lugar}*")));
        }
        if let Some(from) = &self.created_from {
            pairs.push(("creado_en".to_string(), format!("gte.{from}")));
        }
        if let Some(to) = &self.created_to {
            pairs.push(("creado_en".to_string(), format!("lt.{to}")));
        }
        if let Some(from) = &self.updated_from {
            pairs.push(("actualizado_en".to_string(), format!("gte.{from}")));
        }
        if let Some(to) = &self.updated_to {
            pairs.push(("actualizado_en".to_string(), format!("lt.{to}")));
        }

        pairs
    }
}

/// Parameters for a single-record lookup by cleaned identifier.
#[must_use]
pub fn detail_params(select: &str, dni: &str) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), select.to_string()),
        ("dni".to_string(), format!("eq.{dni}")),
        ("limit".to_string(), "1".to_string()),
    ]
}

/// Minimal projection; the total arrives in the count header.
#[must_use]
pub fn count_params() -> Vec<(String, String)> {
    vec![
        ("select".to_string(), "id".to_string()),
        ("limit".to_string(), "1".to_string()),
    ]
}

/// Grouped-aggregation parameters: `select=<group>,count:id` with a group
/// directive, largest groups first.
#[must_use]
pub fn stats_params(group: &str) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), format!("{group},count:id")),
        ("group".to_string(), group.to_string()),
        ("order".to_string(), "count.desc".to_string()),
        ("limit".to_string(), "200".to_string()),
    ]
}

/// Whitelist the grouping column, falling back to the default group.
pub fn resolve_stats_group(raw: Option<&str>) -> &'static str {
    raw.map(str::trim)
        .and_then(|requested| STATS_GROUPS.iter().find(|known| **known == requested))
        .map_or(DEFAULT_STATS_GROUP, |known| *known)
}

/// Projection for the detail endpoint.
#[must_use]
pub fn detail_select(fields: Option<&str>) -> String {
    resolve_fields(fields, DETAIL_FIELDS)
}
