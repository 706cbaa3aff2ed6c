use std::path::{Path, PathBuf};

use crate::migrate::config::PathsConfig;
use crate::migrate::targets::FileTarget;

#[derive(Debug, Clone)]
pub struct WorldPaths {
    pub data_dir: PathBuf,
    pub world_dir: PathBuf,
    pub audit_log: PathBuf,
}

impl WorldPaths {
    pub fn target_path(&self, target: &FileTarget, identifier: &str) -> PathBuf {
        self.world_dir
            .join(target.subdir)
            .join(format!("{identifier}{}", target.extension))
    }
}

/// The primary candidate wins only when its world directory already exists.
pub fn resolve_data_dir(cfg: &PathsConfig) -> PathBuf {
    if let Some(dir) = &cfg.data_dir {
        return dir.clone();
    }
    if cfg.primary.join(&cfg.world).is_dir() {
        cfg.primary.clone()
    } else {
        cfg.fallback.clone()
    }
}

fn default_audit_log(data_dir: &Path) -> PathBuf {
    data_dir.join("logs").join("offline-migrate.jsonl")
}

pub fn resolve_paths(cfg: &PathsConfig) -> WorldPaths {
    let data_dir = resolve_data_dir(cfg);
    let world_dir = data_dir.join(&cfg.world);
    let audit_log = cfg
        .audit_log
        .clone()
        .unwrap_or_else(|| default_audit_log(&data_dir));
    WorldPaths {
        data_dir,
        world_dir,
        audit_log,
    }
}
