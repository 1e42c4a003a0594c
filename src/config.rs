//! Tool configuration, deserialized from a YAML file.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The HTML document holding the catalog region.
    pub document: PathBuf,
    /// Where to drop a timestamped copy of the document before overwriting
    /// it. No backups are taken when unset.
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,
}
