use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// A record as returned by the store: an opaque, ordered mapping of
/// projected field name to loosely-typed value. The column set is
/// client-selectable, so no fixed schema is assumed anywhere.
pub type Record = serde_json::Map<String, Value>;

/// Master whitelist of columns a client may select or filter on.
pub const FIELDS_ALL: &[&str] = &[
    "id",
    "dni",
    "numero_socio",
    "apellido",
    "nombres",
    "sexo",
    "empresa",
    "sector",
    "lugar_trabajo",
    "direccion",
    "email",
    "celular",
    "denominacion_funcion",
    "denominacion_posicion",
    "legajo",
    "fecha_nacimiento",
    "fecha_primer_ingreso",
    "creado_en",
    "actualizado_en",
];

/// Projection used by the list endpoint when the client selects nothing.
pub const DEFAULT_FIELDS: &[&str] = &[
    "id",
    "dni",
    "numero_socio",
    "apellido",
    "nombres",
    "empresa",
    "sector",
    "lugar_trabajo",
    "creado_en",
    "actualizado_en",
];

/// Wider projection used by the detail endpoint.
pub const DETAIL_FIELDS: &[&str] = &[
    "id",
    "dni",
    "numero_socio",
    "apellido",
    "nombres",
    "sexo",
    "direccion",
    "email",
    "celular",
    "empresa",
    "sector",
    "lugar_trabajo",
    "denominacion_funcion",
    "denominacion_posicion",
    "legajo",
    "fecha_nacimiento",
    "fecha_primer_ingreso",
    "creado_en",
    "actualizado_en",
];

/// Columns the list endpoint may sort on.
pub const SORT_FIELDS: &[&str] = &[
    "id",
    "dni",
    "numero_socio",
    "apellido",
    "nombres",
    "sexo",
    "empresa",
    "sector",
    "lugar_trabajo",
    "creado_en",
    "actualizado_en",
];

pub const DEFAULT_SORT_FIELD: &str = "apellido";

/// Columns the stats endpoint may group on.
pub const STATS_GROUPS: &[&str] = &["empresa", "sector", "lugar_trabajo"];

pub const DEFAULT_STATS_GROUP: &str = "empresa";

/// Raw query parameters of the list endpoint.
///
/// All fields are optional and lenient: malformed values degrade to their
/// defaults during sanitization instead of rejecting the request. `page`
/// and `page_size` arrive as raw strings for the same reason — a typed
/// extractor would turn `page=abc` into a hard 400.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Free-text search across apellido, nombres and the precomputed
    /// apellido_nombre column.
    pub q: Option<String>,
    /// Identifier filter; every non-digit character is stripped.
    pub dni: Option<String>,
    /// Substring filter on empresa.
    pub empresa: Option<String>,
    /// Substring filter on sector.
    pub sector: Option<String>,
    /// Substring filter on lugar_trabajo.
    pub lugar_trabajo: Option<String>,
    /// Inclusive lower bound on creado_en (`YYYY-MM-DD` or
    /// `YYYY-MM-DDTHH:MM:SS`).
    pub created_from: Option<String>,
    /// Exclusive upper bound on creado_en; a bare date covers that whole day.
    pub created_to: Option<String>,
    /// Inclusive lower bound on actualizado_en.
    pub updated_from: Option<String>,
    /// Exclusive upper bound on actualizado_en.
    pub updated_to: Option<String>,
    /// 1-based page number, default 1.
    pub page: Option<String>,
    /// Rows per page, default 50, capped at the configured maximum.
    pub page_size: Option<String>,
    /// Sort column; values outside the whitelist fall back to apellido.
    pub sort: Option<String>,
    /// Sort direction; anything starting with `d` means descending.
    pub order: Option<String>,
    /// Comma-separated output projection; `*` selects every column.
    pub fields: Option<String>,
    /// `csv` switches the response to a streamed CSV attachment.
    pub format: Option<String>,
}

/// Query parameters of the detail endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DetailParams {
    /// Comma-separated output projection; defaults to the detail projection.
    pub fields: Option<String>,
}

/// Query parameters of the stats endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsParams {
    /// Grouping column; values outside the whitelist fall back to empresa.
    pub group: Option<String>,
}

/// Effective sort of a list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SortSpec {
    pub field: String,
    pub order: String,
}

/// JSON envelope of the list endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListEnvelope {
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Record>,
    pub page: u64,
    pub page_size: u64,
    /// Total rows of the whole filtered set, not just this page.
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub sort: SortSpec,
    pub duration_ms: u64,
}

/// Envelope of the detail endpoint; absence is a valid outcome, not an
/// error.
#[derive(Debug, Serialize, ToSchema)]
pub struct DetailEnvelope {
    #[schema(value_type = Option<Object>)]
    pub data: Option<Record>,
    pub found: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CountEnvelope {
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupCount {
    /// Value of the grouping column; null when the store holds no value.
    #[schema(value_type = Option<String>)]
    pub group: Value,
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsEnvelope {
    pub group_by: String,
    pub data: Vec<GroupCount>,
}

/// Static description of the queryable surface; served without a store
/// call.
#[derive(Debug, Serialize, ToSchema)]
pub struct SchemaEnvelope {
    #[schema(value_type = Vec<String>)]
    pub fields: &'static [&'static str],
    #[schema(value_type = Vec<String>)]
    pub default_fields: &'static [&'static str],
    #[schema(value_type = Vec<String>)]
    pub detail_fields: &'static [&'static str],
    #[schema(value_type = Vec<String>)]
    pub sortable: &'static [&'static str],
    #[schema(value_type = Vec<String>)]
    pub stats_groups: &'static [&'static str],
    pub default_sort: &'static str,
    pub max_page_size: u64,
}
