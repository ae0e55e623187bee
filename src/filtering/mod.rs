//! Query-parameter sanitization and PostgREST filter compilation.
//!
//! Untrusted query inputs pass through whitelist membership or
//! character-class sanitization before anything reaches the compiled
//! filter; malformed *optional* inputs degrade to absent or default
//! values rather than failing the request.
//!
//! The compiler emits an **ordered sequence** of key/value pairs, not a
//! map: a date column bounded on both sides appears twice with different
//! operators, and a unique-key representation would silently drop one
//! bound.

pub mod conditions;
pub mod dates;
pub mod pagination;
pub mod projection;
pub mod search;
pub mod sort;

pub use conditions::{
    ListQuery, count_params, detail_params, detail_select, resolve_stats_group, stats_params,
};
pub use dates::{parse_range_end, parse_range_start};
pub use pagination::{has_next, has_prev, parse_page, parse_page_size, parse_total};
pub use projection::resolve_fields;
pub use search::{clean_identifier, sanitize_like, sanitize_search};
pub use sort::{SortOrder, parse_sort};
