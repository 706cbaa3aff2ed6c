use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::error::MigrateError;
use crate::migrate::config::Subject;

/// Other keys such as `expiresOn` are ignored.
#[derive(Debug, Clone, Deserialize)]
struct UsercacheEntry {
    name: String,
    uuid: String,
}

/// Subjects from the server's `usercache.json`, first occurrence of each UUID wins.
pub fn parse_usercache(raw: &str) -> Result<Vec<Subject>> {
    let entries: Vec<UsercacheEntry> = serde_json::from_str(raw)
        .map_err(|err| MigrateError::InvalidUsercache(err.to_string()))?;

    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let online = Uuid::parse_str(entry.uuid.trim()).map_err(|err| {
            MigrateError::InvalidUsercache(format!("entry {}: {err}", entry.name))
        })?;
        if !seen.insert(online) {
            continue;
        }
        out.push(Subject {
            online,
            name: entry.name,
        });
    }
    Ok(out)
}

pub fn load_usercache(path: &Path) -> Result<Vec<Subject>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_usercache(&raw).with_context(|| format!("failed to load {}", path.display()))
}
