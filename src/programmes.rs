//! Programme catalogue queries: substring filter over resolved titles, then
//! pagination. Records flow through untouched; only the title used for
//! matching is derived.

use serde::Serialize;
use serde_json::Value;

use crate::origin::Origin;
use crate::query::{contains_ci, PageParams};
use crate::store::Record;
use crate::titles::resolve_title;

#[derive(Debug, Serialize)]
pub struct ProgrammePage {
    pub data: Vec<Value>,
    pub total: usize,
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
    pub country: &'static str,
}

/// Filter a loaded programme collection by resolved title, then paginate.
/// `total` counts the filtered set before the page slice is taken.
pub fn query_programmes(
    origin: Origin,
    records: Vec<Record>,
    text_filter: &str,
    pagination: &PageParams,
) -> ProgrammePage {
    let filtered: Vec<Record> = if text_filter.is_empty() {
        records
    } else {
        records
            .into_iter()
            .filter(|record| contains_ci(&resolve_title(origin, record), text_filter))
            .collect()
    };

    let total = filtered.len();
    let data = pagination
        .slice(&filtered)
        .iter()
        .cloned()
        .map(Value::Object)
        .collect();

    ProgrammePage {
        data,
        total,
        page: pagination.page,
        page_size: pagination.page_size,
        country: origin.as_str(),
    }
}
