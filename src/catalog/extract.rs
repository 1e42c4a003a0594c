//! Catalog extraction from the document markup.
//!
//! Walks every `.gallery-card` fragment inside the document's gallery-grid
//! region and maps it to a [`Record`]. Extraction is read-only: the document
//! text is never mutated, and ids are assigned from document order.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use crate::Error;

use super::{
    normalize::{TRAILING_COLONS, normalize_specs},
    types::{Category, Kind, Promotion, Record, SpecEntry},
};

static SAVINGS_PERCENT: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(\d+)%").unwrap());

/// Parses the document and extracts every catalog record in document order.
///
/// Returns [`Error::MissingCatalogRegion`] when the gallery-grid anchor is
/// absent; a present-but-empty region yields an empty collection. Legacy spec
/// rows are normalized on the way in, so a load-then-save cycle heals old
/// data.
pub fn extract(document: &str) -> Result<Vec<Record>, Error> {
    let doc = Html::parse_document(document);

    let grid = Selector::parse("#gallery-grid").unwrap();
    if doc.select(&grid).next().is_none() {
        return Err(Error::MissingCatalogRegion);
    }

    let card = Selector::parse(".gallery-card").unwrap();
    let records = doc
        .select(&card)
        .enumerate()
        .map(|(index, card)| extract_record(index as u32, card))
        .collect();
    Ok(records)
}

fn extract_record(id: u32, card: ElementRef) -> Record {
    let name = text_of(card, ".gallery-card-title").unwrap_or_default();
    let kind = card
        .value()
        .attr("data-type")
        .and_then(Kind::from_attr);
    let image = first_attr(card, ".gallery-card-image img", "src").unwrap_or_default();

    let promotion = extract_promotion(card);
    // Edit forms should show the undiscounted value, so a promoted card's
    // price is the original-price text rather than the generic price element.
    let price = match &promotion {
        Some(promotion) => promotion.original_price.clone(),
        None => text_of(card, ".gallery-card-price").unwrap_or_default(),
    };

    let category = CATEGORY_PROBES
        .iter()
        .find_map(|probe| probe(card))
        .unwrap_or(Category::Refurbished);

    let specs = normalize_specs(&extract_specs(card));

    trace!(id, %name, category = category.as_str(), specs = specs.len(), "extracted card");
    Record {
        id,
        name,
        kind,
        category,
        price,
        image,
        specs,
        promotion,
    }
}

/// A promoted card carries all three of original price, sale price and
/// savings badge; anything less is treated as a plain-priced card.
fn extract_promotion(card: ElementRef) -> Option<Promotion> {
    let original_price = text_of(card, ".original-price")?;
    let sale_price = text_of(card, ".sale-price")?;
    let savings = text_of(card, ".savings-badge")?;
    let discount = SAVINGS_PERCENT
        .captures(&savings)
        .and_then(|captures| captures[1].parse().ok())
        .unwrap_or(10);
    Some(Promotion {
        enabled: true,
        original_price,
        sale_price,
        discount,
    })
}

type CategoryProbe = fn(ElementRef) -> Option<Category>;

/// Priority-ordered category sources: the explicit `data-category` attribute
/// wins, the badge class is the legacy fallback.
const CATEGORY_PROBES: [CategoryProbe; 2] = [category_from_attribute, category_from_badge];

fn category_from_attribute(card: ElementRef) -> Option<Category> {
    card.value()
        .attr("data-category")
        .and_then(Category::from_attr)
}

fn category_from_badge(card: ElementRef) -> Option<Category> {
    // Black-friday badges map to refurbished: promotional items have always
    // been modeled as discounted refurbished stock. Kept as-is for
    // compatibility with existing documents; flagged for product review.
    const BADGE_CLASSES: [(&str, Category); 4] = [
        ("badge-custom", Category::Custom),
        ("badge-refurbished", Category::Refurbished),
        ("badge-new", Category::New),
        ("badge-black-friday", Category::Refurbished),
    ];

    let badge = Selector::parse(r#"[class*="badge-"]"#).unwrap();
    let badge = card.select(&badge).next()?;
    BADGE_CLASSES
        .iter()
        .find(|(class, _)| badge.value().classes().any(|c| c == *class))
        .map(|(_, category)| *category)
}

fn extract_specs(card: ElementRef) -> Vec<SpecEntry> {
    let row = Selector::parse(".gallery-card-specs .spec-item").unwrap();
    let strong = Selector::parse("strong").unwrap();

    card.select(&row)
        .filter_map(|item| {
            let emphasized = item.select(&strong).next()?;
            let emphasized_text = emphasized.text().collect::<String>();
            let full_text = item.text().collect::<String>();

            let label = TRAILING_COLONS
                .replace(emphasized_text.trim(), "")
                .trim()
                .to_string();
            let value = full_text
                .replacen(&emphasized_text, "", 1)
                .trim()
                .to_string();
            (!label.is_empty() && !value.is_empty()).then_some(SpecEntry { label, value })
        })
        .collect()
}

fn text_of(card: ElementRef, css: &str) -> Option<String> {
    let selector = Selector::parse(css).unwrap();
    card.select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

fn first_attr(card: ElementRef, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).unwrap();
    card.select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(str::to_string)
}
