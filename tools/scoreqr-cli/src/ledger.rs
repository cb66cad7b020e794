//! Local code ledger — the JSON file the offline generator appends to.
//!
//! Every generated code lands here first with `synced: false`; a later
//! `sync` run pushes the unsynced entries to the server and stamps them.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub code: String,
    pub created_date: DateTime<Utc>,
    /// URL the printed QR code points at.
    pub verify_url: String,
    pub synced: bool,
    pub sync_date: Option<DateTime<Utc>>,
}

/// Load the ledger, returning an empty one when the file does not exist yet.
pub fn load(path: &Path) -> Result<Vec<LedgerEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read ledger {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse ledger {}", path.display()))
}

pub fn save(path: &Path, entries: &[LedgerEntry]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create ledger directory {}", dir.display()))?;
    }
    let raw = serde_json::to_string_pretty(entries).context("failed to serialize ledger")?;
    fs::write(path, raw).with_context(|| format!("failed to write ledger {}", path.display()))
}

/// Codes already present in the ledger, used as the generation exclusion
/// set. The server's unique constraint stays the real uniqueness guarantee.
pub fn known_codes(entries: &[LedgerEntry]) -> HashSet<String> {
    entries.iter().map(|e| e.code.clone()).collect()
}

/// Stamp the named codes as synced at `sync_date`.
pub fn mark_synced(entries: &mut [LedgerEntry], codes: &HashSet<String>, sync_date: DateTime<Utc>) {
    for entry in entries.iter_mut() {
        if codes.contains(&entry.code) {
            entry.synced = true;
            entry.sync_date = Some(sync_date);
        }
    }
}
