//! Scholarship catalogue queries: join the application-steps snapshot onto
//! the main snapshot by identifier, run the predicate chain, paginate.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::query::{contains_ci, PageParams};
use crate::store::{first_string, first_value, value_to_string, Record};

// Field aliases, in lookup order. Snapshots from different scrape runs
// disagree on naming; the first alias that yields a value wins.
const ID_KEYS: &[&str] = &["id", "scholarship_id"];
const STEPS_KEYS: &[&str] = &["steps", "application_steps"];
const COUNTRY_KEYS: &[&str] = &["country", "country_region", "countryRegion"];
const LEVEL_KEYS: &[&str] = &["degree_levels", "degreeLevels", "levels"];
const NAME_KEYS: &[&str] = &["name", "title"];
const PROVIDER_KEYS: &[&str] = &["provider", "organizer"];

/// Optional predicates, applied in declaration order. `None` skips the
/// predicate entirely.
#[derive(Debug, Default, Clone)]
pub struct ScholarshipFilters {
    pub country: Option<String>,
    pub level: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`. Records without a deadline pass.
    pub deadline: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScholarshipPage {
    pub data: Vec<Value>,
    pub total: usize,
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
}

/// Join, filter, paginate. `total` counts the records surviving the whole
/// predicate chain, before the page slice is taken.
pub fn query_scholarships(
    main: Vec<Record>,
    details: Vec<Record>,
    filters: &ScholarshipFilters,
    pagination: &PageParams,
) -> ScholarshipPage {
    let lookup = steps_lookup(details);
    let filtered: Vec<Record> = merge_steps(main, &lookup)
        .into_iter()
        .filter(|record| passes(record, filters))
        .collect();

    let total = filtered.len();
    let data = pagination
        .slice(&filtered)
        .iter()
        .cloned()
        .map(Value::Object)
        .collect();

    ScholarshipPage {
        data,
        total,
        page: pagination.page,
        page_size: pagination.page_size,
    }
}

/// Canonical identifier for the join. Numeric and string ids normalize to
/// the same key so `7` and `"7"` refer to one scholarship.
fn record_id(record: &Record) -> Option<String> {
    ID_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(value_to_string))
}

/// Identifier -> steps array from the detail snapshot. Detail records
/// without an identifier are skipped; a duplicate identifier keeps the later
/// occurrence. A record whose steps aliases hold no array maps to `[]`.
fn steps_lookup(details: Vec<Record>) -> HashMap<String, Value> {
    let mut lookup = HashMap::new();
    for record in details {
        let Some(id) = record_id(&record) else {
            continue;
        };
        let steps = first_value(&record, STEPS_KEYS)
            .filter(|value| value.is_array())
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        lookup.insert(id, steps);
    }
    lookup
}

/// Attach a `steps` attribute to every main record: the joined array, or an
/// empty one when no detail record matches.
fn merge_steps(main: Vec<Record>, lookup: &HashMap<String, Value>) -> Vec<Record> {
    main.into_iter()
        .map(|mut record| {
            let steps = record_id(&record)
                .and_then(|id| lookup.get(&id).cloned())
                .unwrap_or_else(|| Value::Array(Vec::new()));
            record.insert("steps".to_string(), steps);
            record
        })
        .collect()
}

fn passes(record: &Record, filters: &ScholarshipFilters) -> bool {
    if let Some(country) = &filters.country {
        let matched = first_string(record, COUNTRY_KEYS)
            .is_some_and(|value| value.eq_ignore_ascii_case(country));
        if !matched {
            return false;
        }
    }

    if let Some(level) = &filters.level {
        let matched = match first_value(record, LEVEL_KEYS) {
            Some(Value::Array(levels)) => levels
                .iter()
                .filter_map(value_to_string)
                .any(|value| value == *level),
            Some(value) => value_to_string(value).is_some_and(|v| v == *level),
            None => false,
        };
        if !matched {
            return false;
        }
    }

    if let Some(floor) = &filters.deadline {
        // Missing (or empty) deadline passes unconditionally; otherwise the
        // YYYY-MM-DD strings compare lexicographically == chronologically.
        if let Some(deadline) = first_string(record, &["deadline"]) {
            if deadline.as_str() < floor.as_str() {
                return false;
            }
        }
    }

    if let Some(text) = &filters.text {
        let name_hit =
            first_string(record, NAME_KEYS).is_some_and(|name| contains_ci(&name, text));
        let provider_hit = first_string(record, PROVIDER_KEYS)
            .is_some_and(|provider| contains_ci(&provider, text));
        if !name_hit && !provider_hit {
            return false;
        }
    }

    true
}
