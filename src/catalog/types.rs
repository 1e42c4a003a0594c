//! Core value types for the embedded catalog.
//!
//! A [`Record`] is one catalog entry as it exists between extraction from the
//! document and regeneration back into it. Prices are kept as the formatted
//! display text found in the markup, not as numeric amounts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[default]
    Desktop,
    Laptop,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Desktop => "desktop",
            Kind::Laptop => "laptop",
        }
    }

    /// Reads a `data-type` attribute value. Anything other than the two known
    /// kinds (including the empty string on legacy cards) is unspecified.
    pub fn from_attr(attr: &str) -> Option<Kind> {
        match attr {
            "desktop" => Some(Kind::Desktop),
            "laptop" => Some(Kind::Laptop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Custom,
    New,
    Refurbished,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Custom => "custom",
            Category::New => "new",
            Category::Refurbished => "refurbished",
        }
    }

    pub fn from_attr(attr: &str) -> Option<Category> {
        match attr {
            "custom" => Some(Category::Custom),
            "new" => Some(Category::New),
            "refurbished" => Some(Category::Refurbished),
            _ => None,
        }
    }
}

/// One label/value attribute row on a card, e.g. "Processor" / "Intel Core i7".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecEntry {
    pub label: String,
    pub value: String,
}

impl SpecEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> SpecEntry {
        SpecEntry {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Discounted-price state attached to a record while a sale is running.
///
/// `sale_price` is `original_price` reduced by `discount` percent, both kept
/// as two-decimal currency text. The record's own `price` field keeps the
/// pre-discount text so edit forms show the undiscounted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub enabled: bool,
    pub original_price: String,
    pub sale_price: String,
    pub discount: u8,
}

/// One catalog entry.
///
/// Ids are stable within an edit session only: extraction assigns them by
/// document position and the document itself never stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u32,
    pub name: String,
    /// `None` when the card carries no usable `data-type` attribute.
    pub kind: Option<Kind>,
    pub category: Category,
    pub price: String,
    pub image: String,
    pub specs: Vec<SpecEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
}

/// Add/update payload: everything the operator fills in. The requested
/// category is remapped through [`derive_category`] before storage, and the
/// spec list runs through the normalizer.
///
/// [`derive_category`]: super::mutate::derive_category
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDraft {
    pub name: String,
    #[serde(default)]
    pub kind: Kind,
    pub category: Category,
    pub price: String,
    pub image: String,
    #[serde(default)]
    pub specs: Vec<SpecEntry>,
}

/// Catalog view filter, matching the admin filter tabs: a kind, a category,
/// or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Kind(Kind),
    Category(Category),
}

impl std::str::FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Filter, String> {
        if s == "all" {
            return Ok(Filter::All);
        }
        if let Some(kind) = Kind::from_attr(s) {
            return Ok(Filter::Kind(kind));
        }
        if let Some(category) = Category::from_attr(s) {
            return Ok(Filter::Category(category));
        }
        Err(format!(
            "unknown filter {s:?}: expected all, desktop, laptop, custom, new or refurbished"
        ))
    }
}
