use anyhow::Result;
use std::env;

use crate::commands::{CommandReport, SourceOptions, load_effective_config};
use crate::migrate::config::{OWNER_ONLY_MODE, default_config_path};
use crate::migrate::paths::resolve_paths;

include!(concat!(env!("OUT_DIR"), "/env_allowlist.rs"));

#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    pub source: SourceOptions,
}

fn env_overrides_set() -> Vec<&'static str> {
    GENERATED_ENV_ALLOWLIST
        .iter()
        .copied()
        .filter(|key| env::var_os(key).is_some_and(|v| !v.is_empty()))
        .collect()
}

pub fn run(opts: &StatusOptions) -> Result<CommandReport> {
    let cfg = load_effective_config(&opts.source)?;
    let paths = resolve_paths(&cfg.paths);
    let mut report = CommandReport::new("status");

    match &cfg.source {
        Some(path) => report.detail(format!("config_file={}", path.display())),
        None => report.detail(format!(
            "config_file=none (default location {})",
            default_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "unresolved".to_string())
        )),
    }
    report.detail(format!("data_dir={}", paths.data_dir.display()));
    report.detail(format!("world_dir={}", paths.world_dir.display()));
    report.detail(format!("audit_log={}", paths.audit_log.display()));
    report.detail(format!(
        "owner={}:{} mode={:o}",
        cfg.owner.uid, cfg.owner.gid, OWNER_ONLY_MODE
    ));
    report.detail(format!("subjects={}", cfg.subjects.len()));

    let overrides = env_overrides_set();
    if overrides.is_empty() {
        report.detail("env_overrides=none");
    } else {
        report.detail(format!("env_overrides={}", overrides.join(",")));
    }

    if !paths.world_dir.is_dir() {
        report.issue(format!(
            "missing world directory {}",
            paths.world_dir.display()
        ));
    }
    for subdir in ["playerdata", "advancements", "stats"] {
        let dir = paths.world_dir.join(subdir);
        if paths.world_dir.is_dir() && !dir.is_dir() {
            report.warn_with_detail(format!("missing {}", dir.display()));
        }
    }

    Ok(report)
}
