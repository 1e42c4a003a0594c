//! In-memory catalog mutation.
//!
//! Every operation either fully applies and returns the new collection, or
//! fails and leaves the caller holding the prior one. Nothing here touches
//! the document; persistence is the caller's concern.

use std::sync::LazyLock;

use tracing::debug;

use crate::Error;

use super::{
    normalize::normalize_specs,
    types::{Category, Filter, Kind, Promotion, Record, RecordDraft},
};

static PRICE_NOISE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"[$,]").unwrap());

/// Remaps a requested category to one valid for the kind: desktops are
/// custom builds or refurbished, laptops are new or refurbished. An
/// incompatible request moves to the nearest valid category instead of
/// failing, so switching kinds never strands a stale category.
pub fn derive_category(kind: Kind, requested: Category) -> Category {
    match (kind, requested) {
        (Kind::Desktop, Category::New) => Category::Custom,
        (Kind::Laptop, Category::Custom) => Category::New,
        (_, category) => category,
    }
}

/// Appends a new record with id `max + 1` (0 for an empty catalog).
pub fn add_record(mut records: Vec<Record>, draft: RecordDraft) -> Result<Vec<Record>, Error> {
    validate_draft(&draft)?;
    let id = records.iter().map(|record| record.id + 1).max().unwrap_or(0);
    debug!(id, name = %draft.name, "adding record");
    records.push(materialize(id, draft));
    Ok(records)
}

/// Replaces the fields of the record with `id` from the draft, keeping the
/// id fixed. A running promotion is cleared: the draft carries the edited
/// price and any discount must be re-applied against it.
pub fn update_record(
    mut records: Vec<Record>,
    id: u32,
    draft: RecordDraft,
) -> Result<Vec<Record>, Error> {
    validate_draft(&draft)?;
    let slot = records
        .iter_mut()
        .find(|record| record.id == id)
        .ok_or(Error::RecordNotFound(id))?;
    debug!(id, name = %draft.name, "updating record");
    *slot = materialize(id, draft);
    Ok(records)
}

/// Removes the record with `id`; silently a no-op when absent (confirmation
/// happens before this call).
pub fn delete_record(records: Vec<Record>, id: u32) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| record.id != id)
        .collect()
}

/// Puts a record on sale at `discount` percent off its current price.
///
/// The price text is parsed by stripping the currency symbol and thousands
/// separators; both promotion prices are formatted as two-decimal currency
/// text. The record's `price` keeps the pre-discount text.
pub fn apply_promotion(mut record: Record, discount: u8) -> Result<Record, Error> {
    if !(1..=50).contains(&discount) {
        return Err(Error::DiscountOutOfRange(discount));
    }
    let amount = PRICE_NOISE.replace_all(&record.price, "");
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| Error::UnparseablePrice(record.price.clone()))?;
    let sale = amount * (1.0 - f64::from(discount) / 100.0);

    debug!(id = record.id, discount, "applying promotion");
    record.promotion = Some(Promotion {
        enabled: true,
        original_price: format!("${amount:.2}"),
        sale_price: format!("${sale:.2}"),
        discount,
    });
    Ok(record)
}

/// Takes a record off sale; no-op when no promotion is active.
pub fn remove_promotion(mut record: Record) -> Record {
    if record.promotion.take().is_some() {
        debug!(id = record.id, "removed promotion");
    }
    record
}

/// Narrows a catalog view to one kind or category.
pub fn filter_records(records: &[Record], filter: Filter) -> Vec<&Record> {
    records
        .iter()
        .filter(|record| match filter {
            Filter::All => true,
            Filter::Kind(kind) => record.kind == Some(kind),
            Filter::Category(category) => record.category == category,
        })
        .collect()
}

fn validate_draft(draft: &RecordDraft) -> Result<(), Error> {
    if draft.name.trim().is_empty() {
        return Err(Error::MissingField("name"));
    }
    if draft.image.is_empty() {
        return Err(Error::MissingField("image"));
    }
    Ok(())
}

fn materialize(id: u32, draft: RecordDraft) -> Record {
    Record {
        id,
        name: draft.name,
        kind: Some(draft.kind),
        category: derive_category(draft.kind, draft.category),
        price: draft.price,
        image: draft.image,
        specs: normalize_specs(&draft.specs),
        promotion: None,
    }
}
