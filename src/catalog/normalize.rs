//! Spec list repair and deduplication.
//!
//! Repeated edit/save cycles left card spec rows with duplicated labels,
//! label text leaking into the value field, and warranty rows stored with
//! label and value transposed. This pass repairs all three without a schema
//! migration: every load-then-save cycle self-heals the data. The pass is
//! idempotent, so running it on already-clean data changes nothing.

use std::sync::LazyLock;

use indexmap::IndexSet;
use tracing::debug;

use super::types::SpecEntry;

/// Labels that name a warranty-style spec. Rows whose *value* is one of these
/// were stored backwards and get their fields swapped.
pub const WARRANTY_LABELS: [&str; 3] =
    ["Parts Warranty", "Manufacturer Warranty", "Free Diagnostics"];

pub(crate) static TRAILING_COLONS: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"::?$").unwrap());

static LEADING_COLON: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^:?\s*").unwrap());

/// Deduplicates and repairs a raw spec list.
///
/// Rules are applied to each entry in order, first-accepted label wins, and
/// the relative order of accepted entries is preserved:
///
/// 1. drop rows whose value merely repeats the label,
/// 2. drop rows whose value contains the label and is not meaningfully
///    longer (catches "Processor: Processor" style corruption without
///    discarding long values that happen to mention the label),
/// 3. swap rows whose value is a known warranty label,
/// 4. otherwise keep the row, trimmed, unless its label was already seen.
pub fn normalize_specs(specs: &[SpecEntry]) -> Vec<SpecEntry> {
    let mut seen = IndexSet::new();
    let mut accepted = Vec::new();

    for spec in specs {
        let normalized_label = TRAILING_COLONS.replace(&spec.label, "").trim().to_string();
        let normalized_value = LEADING_COLON.replace(&spec.value, "").trim().to_string();

        if normalized_label == normalized_value {
            debug!(label = %spec.label, "dropped spec row whose value repeats its label");
            continue;
        }

        if normalized_value
            .to_lowercase()
            .contains(&normalized_label.to_lowercase())
            && normalized_value.len() < normalized_label.len() + 10
        {
            debug!(label = %spec.label, value = %spec.value, "dropped spec row whose value contains its label");
            continue;
        }

        if WARRANTY_LABELS.contains(&spec.value.as_str())
            && !WARRANTY_LABELS.contains(&spec.label.as_str())
        {
            if !seen.insert(spec.value.clone()) {
                debug!(label = %spec.value, "dropped duplicate warranty spec row");
                continue;
            }
            debug!(label = %spec.value, "swapped transposed warranty spec row");
            accepted.push(SpecEntry {
                label: spec.value.clone(),
                value: spec.label.trim().to_string(),
            });
            continue;
        }

        if !seen.insert(normalized_label) {
            debug!(label = %spec.label, "dropped spec row with duplicate label");
            continue;
        }
        accepted.push(SpecEntry {
            label: spec.label.trim().to_string(),
            value: spec.value.trim().to_string(),
        });
    }

    accepted
}
