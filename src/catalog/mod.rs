//! Document-embedded catalog processing.
//!
//! The catalog of product records is persisted as repeating card fragments
//! inside a single HTML document rather than as database rows. This module
//! covers the full round trip: extract the records from the document text,
//! mutate them in memory, and regenerate the document with rebuilt
//! fragments. All four stages are synchronous pure functions; [`Session`]
//! strings them together into an explicit edit-session state machine.

pub mod extract;
pub mod mutate;
pub mod normalize;
pub mod regenerate;
pub mod types;

pub use extract::extract;
pub use normalize::normalize_specs;
pub use regenerate::regenerate;

use crate::Error;

use types::{Record, RecordDraft};

/// One edit session over one document: `Loaded -> Editing -> Regenerated`.
///
/// The session owns the source text its records were extracted from, so the
/// regenerated output is always derived from the same snapshot it will
/// replace. There must be at most one in-flight session per document;
/// concurrent sessions editing from two snapshots silently overwrite each
/// other with no merge.
pub struct Session {
    document: String,
    records: Vec<Record>,
    dirty: bool,
}

impl Session {
    /// Extracts the catalog from the document and opens a session over it.
    pub fn load(document: String) -> Result<Session, Error> {
        let records = extract::extract(&document)?;
        Ok(Session {
            document,
            records,
            dirty: false,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Whether any edit has been applied since loading.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn add(&mut self, draft: RecordDraft) -> Result<(), Error> {
        self.records = mutate::add_record(self.records.clone(), draft)?;
        self.dirty = true;
        Ok(())
    }

    pub fn update(&mut self, id: u32, draft: RecordDraft) -> Result<(), Error> {
        self.records = mutate::update_record(self.records.clone(), id, draft)?;
        self.dirty = true;
        Ok(())
    }

    pub fn delete(&mut self, id: u32) {
        self.records = mutate::delete_record(std::mem::take(&mut self.records), id);
        self.dirty = true;
    }

    pub fn promote(&mut self, id: u32, discount: u8) -> Result<(), Error> {
        let index = self.index_of(id)?;
        self.records[index] = mutate::apply_promotion(self.records[index].clone(), discount)?;
        self.dirty = true;
        Ok(())
    }

    pub fn unpromote(&mut self, id: u32) -> Result<(), Error> {
        let index = self.index_of(id)?;
        self.records[index] = mutate::remove_promotion(self.records[index].clone());
        self.dirty = true;
        Ok(())
    }

    /// Re-runs spec normalization over every record and marks the session
    /// dirty so the document is rewritten with healed fragments even when
    /// nothing else changed.
    pub fn renormalize(&mut self) {
        for record in &mut self.records {
            record.specs = normalize::normalize_specs(&record.specs);
        }
        self.dirty = true;
    }

    /// Closes the session, producing the regenerated document text. The only
    /// way back to an editable state is to re-extract from that text.
    pub fn finish(self) -> Result<String, Error> {
        regenerate::regenerate(&self.document, &self.records)
    }

    fn index_of(&self, id: u32) -> Result<usize, Error> {
        self.records
            .iter()
            .position(|record| record.id == id)
            .ok_or(Error::RecordNotFound(id))
    }
}
