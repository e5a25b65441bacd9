use serde::Deserialize;
use utoipa::IntoParams;

/// Query params for free-text search
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Matched case-insensitively against name, description and SKU
    pub q: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
