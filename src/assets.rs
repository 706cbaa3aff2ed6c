use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::migrate::config::Subject;

pub const DEFAULT_SUBJECTS_TOML: &str = include_str!("../assets/subjects.toml");

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectTable {
    pub subjects: Vec<Subject>,
}

pub fn default_subjects() -> Result<Vec<Subject>> {
    let table: SubjectTable = toml::from_str(DEFAULT_SUBJECTS_TOML)
        .map_err(|err| anyhow!("embedded subject table is invalid: {err}"))?;
    Ok(table.subjects)
}
