use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::MigrateError;

pub const DEFAULT_UID: u32 = 1_124_200_035;
pub const DEFAULT_GID: u32 = 1_124_200_035;
/// Destination files are always owner read/write only; only who owns them is configurable.
pub const OWNER_ONLY_MODE: u32 = 0o600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub online: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnerIdentity {
    pub uid: u32,
    pub gid: u32,
}

impl Default for OwnerIdentity {
    fn default() -> Self {
        Self {
            uid: DEFAULT_UID,
            gid: DEFAULT_GID,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Skips the candidate check entirely when set.
    pub data_dir: Option<PathBuf>,
    pub primary: PathBuf,
    pub fallback: PathBuf,
    pub world: String,
    pub audit_log: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            primary: PathBuf::from("/data"),
            fallback: PathBuf::from("/srv/blockgame-server/data"),
            world: "world".to_string(),
            audit_log: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MigrateConfig {
    pub owner: OwnerIdentity,
    pub paths: PathsConfig,
    pub subjects: Vec<Subject>,
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl MigrateConfig {
    pub fn with_subjects(mut self, subjects: Vec<Subject>) -> Result<Self> {
        self.subjects = subjects;
        validate(&self)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialMigrateConfig {
    owner: Option<OwnerIdentity>,
    paths: Option<PathsConfig>,
    subjects: Option<Vec<Subject>>,
}

fn env_or_u32(var: &str, fallback: u32) -> Result<u32> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<u32>()
            .map_err(|err| anyhow!("invalid {var}={v}: {err}")),
        _ => Ok(fallback),
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => None,
    }
}

pub fn validate(cfg: &MigrateConfig) -> Result<()> {
    let invalid = |msg: String| -> anyhow::Error { MigrateError::InvalidConfig(msg).into() };

    if cfg.paths.world.trim().is_empty() {
        return Err(invalid("world directory name cannot be empty".to_string()));
    }
    if cfg.subjects.is_empty() {
        return Err(invalid("subject table is empty".to_string()));
    }

    let mut seen = BTreeSet::new();
    for subject in &cfg.subjects {
        if subject.name.trim().is_empty() {
            return Err(invalid(format!("subject {} has an empty name", subject.online)));
        }
        if !seen.insert(subject.online) {
            return Err(invalid(format!(
                "duplicate online identifier {}",
                subject.online
            )));
        }
    }
    Ok(())
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(
        dirs::config_dir()?
            .join("offline-migrate")
            .join("config.toml"),
    )
}

/// Pick the config file: an explicit path must exist, the fallbacks may not.
fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(MigrateError::InvalidConfig(format!(
                "config file {} does not exist",
                path.display()
            ))
            .into());
        }
        return Ok(Some(path.to_path_buf()));
    }

    let candidate = env_path("OFFLINE_MIGRATE_CONFIG").or_else(default_config_path);
    Ok(candidate.filter(|path| path.exists()))
}

fn merge_file_config(base: &mut MigrateConfig, path: &Path) -> Result<()> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let parsed: PartialMigrateConfig = toml::from_str(&raw).map_err(|err| {
        MigrateError::InvalidConfig(format!("failed to parse {}: {err}", path.display()))
    })?;
    if let Some(owner) = parsed.owner {
        base.owner = owner;
    }
    if let Some(paths) = parsed.paths {
        base.paths = paths;
    }
    if let Some(subjects) = parsed.subjects {
        base.subjects = subjects;
    }
    base.source = Some(path.to_path_buf());
    Ok(())
}

pub fn load_config(explicit: Option<&Path>) -> Result<MigrateConfig> {
    let mut cfg = MigrateConfig {
        subjects: crate::assets::default_subjects()?,
        ..MigrateConfig::default()
    };
    if let Some(path) = resolve_config_path(explicit)? {
        merge_file_config(&mut cfg, &path)?;
    }

    cfg.owner.uid = env_or_u32("OFFLINE_MIGRATE_UID", cfg.owner.uid)?;
    cfg.owner.gid = env_or_u32("OFFLINE_MIGRATE_GID", cfg.owner.gid)?;
    if let Some(dir) = env_path("OFFLINE_MIGRATE_DATA_DIR") {
        cfg.paths.data_dir = Some(dir);
    }
    cfg.paths.world = env_or_string("OFFLINE_MIGRATE_WORLD", &cfg.paths.world);
    if let Some(log) = env_path("OFFLINE_MIGRATE_AUDIT_LOG") {
        cfg.paths.audit_log = Some(log);
    }

    validate(&cfg)?;
    Ok(cfg)
}
