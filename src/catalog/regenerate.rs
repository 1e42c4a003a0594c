//! Catalog region regeneration.
//!
//! Rebuilds the gallery-grid region from a record collection and splices it
//! into the document text, leaving everything outside the region untouched.
//! The region is located by its anchor element rather than by re-matching
//! individual fragments, since the collection's length may differ from the
//! original fragment count after adds and deletes.

use std::fmt::Write as _;
use std::sync::LazyLock;

use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::debug;

use crate::Error;

use super::{
    normalize::normalize_specs,
    types::{Category, Record},
};

/// Spec rows rendered per card. Records may carry more entries in memory;
/// the surplus is dropped from the markup on purpose, matching the
/// four-row card layout.
pub const MAX_SPEC_ROWS: usize = 4;

static GRID_OPEN_TAG: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r#"<[A-Za-z][^>]*\sid\s*=\s*["']gallery-grid["'][^>]*>"#).unwrap()
});

static DIV_TAG: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?i)<(/?)div\b").unwrap());

/// Replaces the gallery-grid region's contents with one freshly built
/// fragment per record, in collection order.
///
/// Display indices are assigned from position, not from record ids, since
/// ids are not contiguous after deletions. An empty collection produces a
/// valid empty region. Fails with [`Error::MissingCatalogRegion`] when the
/// anchor element cannot be found.
pub fn regenerate(document: &str, records: &[Record]) -> Result<String, Error> {
    let open = GRID_OPEN_TAG
        .find(document)
        .ok_or(Error::MissingCatalogRegion)?;
    let tail = &document[open.end()..];
    let close = find_region_close(tail).ok_or(Error::MissingCatalogRegion)?;

    debug!(records = records.len(), "regenerating catalog region");
    let mut out = String::with_capacity(document.len());
    out.push_str(&document[..open.end()]);
    out.push('\n');
    for (position, record) in records.iter().enumerate() {
        render_card(&mut out, position, record);
    }
    out.push_str("     ");
    out.push_str(&tail[close..]);
    Ok(out)
}

/// Finds the byte offset within `rest` of the closing tag that ends the
/// already-opened region, by `<div>` nesting balance. The fragment grammar
/// contains no self-closing or commented-out divs, so tag counting is
/// sufficient.
fn find_region_close(rest: &str) -> Option<usize> {
    let mut depth = 0usize;
    for tag in DIV_TAG.captures_iter(rest) {
        let hit = tag.get(0).unwrap();
        if tag[1].is_empty() {
            depth += 1;
        } else if depth == 0 {
            return Some(hit.start());
        } else {
            depth -= 1;
        }
    }
    None
}

fn render_card(out: &mut String, position: usize, record: &Record) {
    let (badge_class, badge_text) = badge_for(record);
    let promoted = record
        .promotion
        .as_ref()
        .is_some_and(|promotion| promotion.enabled);

    let _ = writeln!(
        out,
        r#"      <div class="gallery-card" data-category="{category}" data-computer-id="{display_id}" data-type="{kind}">"#,
        category = record.category.as_str(),
        display_id = position + 1,
        kind = record.kind.map(|kind| kind.as_str()).unwrap_or(""),
    );
    out.push_str("       <div class=\"gallery-card-inner\">\n");
    out.push_str("        <div class=\"gallery-card-front\">\n");
    if promoted {
        out.push_str("         <div class=\"bf-ribbon-corner\"></div>\n");
    }
    let _ = writeln!(
        out,
        "         <div class=\"gallery-card-badge {badge_class}\">\n          {badge_text}\n         </div>"
    );
    let _ = writeln!(
        out,
        "         <div class=\"gallery-card-image\">\n          <img alt=\"{alt}\" onerror=\"this.src='./assets/logo.png'\" src=\"{src}\"/>\n         </div>",
        alt = encode_double_quoted_attribute(&record.name),
        src = encode_double_quoted_attribute(&record.image),
    );
    out.push_str("        </div>\n");
    out.push_str("        <div class=\"gallery-card-back\">\n");
    let _ = writeln!(
        out,
        "         <h3 class=\"gallery-card-title\">\n          {name}\n         </h3>",
        name = encode_text(&record.name),
    );
    render_price(out, record);
    out.push_str("         <div class=\"gallery-card-specs\">\n");
    for spec in normalize_specs(&record.specs).iter().take(MAX_SPEC_ROWS) {
        let _ = writeln!(
            out,
            "          <div class=\"spec-item\">\n           <strong>{label}:</strong>\n           {value}\n          </div>",
            label = encode_text(&spec.label),
            value = encode_text(&spec.value),
        );
    }
    out.push_str("         </div>\n");
    out.push_str("        </div>\n");
    out.push_str("       </div>\n");
    out.push_str("      </div>\n");
}

fn render_price(out: &mut String, record: &Record) {
    out.push_str("         <div class=\"gallery-card-price\">\n");
    match &record.promotion {
        Some(promotion) if promotion.enabled => {
            let _ = writeln!(
                out,
                "          <span class=\"original-price\">\n           {original}\n          </span>\n          <span class=\"sale-price\">\n           {sale}\n          </span>\n          <span class=\"savings-badge\">\n           Save {discount}%\n          </span>",
                original = encode_text(&promotion.original_price),
                sale = encode_text(&promotion.sale_price),
                discount = promotion.discount,
            );
        }
        _ => {
            let _ = writeln!(out, "          {}", encode_text(&record.price));
        }
    }
    out.push_str("         </div>\n");
}

/// Badge class/text pair: the inverse of the extraction-side mapping. A
/// running promotion takes precedence over the category badge.
fn badge_for(record: &Record) -> (&'static str, &'static str) {
    if record
        .promotion
        .as_ref()
        .is_some_and(|promotion| promotion.enabled)
    {
        return ("badge-black-friday", "Black Friday Sale");
    }
    match record.category {
        Category::Custom => ("badge-custom", "Custom Build"),
        Category::New => ("badge-new", "New"),
        Category::Refurbished => ("badge-refurbished", "Refurbished"),
    }
}
