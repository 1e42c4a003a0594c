pub mod catalog;
pub mod config;

#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("document has no catalog region (missing gallery-grid anchor)")]
    MissingCatalogRegion,
    #[error("no record with id {0}")]
    RecordNotFound(u32),
    #[error("discount must be between 1 and 50, got {0}")]
    DiscountOutOfRange(u8),
    #[error("price {0:?} is not a parseable amount")]
    UnparseablePrice(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
