pub mod derive;
pub mod migrate;
pub mod status;
pub mod subjects;
pub mod verify;

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::migrate::config::{self, MigrateConfig};
use crate::migrate::usercache;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub warnings: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            warnings: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    /// Worth surfacing, but only fails the command under `--strict`.
    pub fn warn(&mut self, text: impl Into<String>) {
        self.warnings.push(text.into());
    }

    /// A warning the operator should also see in the printed details.
    pub fn warn_with_detail(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.details.push(format!("WARNING: {text}"));
        self.warnings.push(text);
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }

    pub fn enforce_strict(&mut self, strict: bool) {
        if strict && !self.warnings.is_empty() {
            self.issue(format!(
                "strict mode: {} warning(s) reported",
                self.warnings.len()
            ));
        }
    }
}

/// Where the config and the subject table come from for one invocation.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub config: Option<PathBuf>,
    pub usercache: Option<PathBuf>,
}

pub fn load_effective_config(source: &SourceOptions) -> Result<MigrateConfig> {
    let cfg = config::load_config(source.config.as_deref())?;
    match &source.usercache {
        Some(path) => cfg.with_subjects(usercache::load_usercache(path)?),
        None => Ok(cfg),
    }
}
