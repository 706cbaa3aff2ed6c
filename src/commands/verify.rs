use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use crate::commands::{CommandReport, SourceOptions, load_effective_config};
use crate::error::MigrateErrorCode;
use crate::migrate::config::{OWNER_ONLY_MODE, OwnerIdentity};
use crate::migrate::offline_id::{format_uuid, offline_uuid};
use crate::migrate::paths::resolve_paths;
use crate::migrate::targets::TARGETS;
use crate::migrate::util::basename;

#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    pub source: SourceOptions,
    pub strict: bool,
}

fn file_hash(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Everything wrong with `dst` as a migrated copy of `src`.
fn check_destination(src: &Path, dst: &Path, owner: &OwnerIdentity) -> Result<Vec<String>> {
    let mut problems = Vec::new();
    let Ok(meta) = fs::metadata(dst) else {
        problems.push("destination missing".to_string());
        return Ok(problems);
    };
    if !meta.is_file() {
        problems.push("destination is not a regular file".to_string());
        return Ok(problems);
    }
    let expected = file_hash(src)?;
    match file_hash(dst) {
        Ok(actual) if actual != expected => {
            problems.push("content differs from source".to_string());
        }
        Ok(_) => {}
        Err(err) => problems.push(format!("destination unreadable: {err:#}")),
    }
    if meta.uid() != owner.uid || meta.gid() != owner.gid {
        problems.push(format!(
            "owned by {}:{}, expected {}:{}",
            meta.uid(),
            meta.gid(),
            owner.uid,
            owner.gid
        ));
    }
    let mode = meta.mode() & 0o7777;
    if mode != OWNER_ONLY_MODE {
        problems.push(format!("mode {mode:o}, expected {OWNER_ONLY_MODE:o}"));
    }
    Ok(problems)
}

pub fn run(opts: &VerifyOptions) -> Result<CommandReport> {
    let cfg = load_effective_config(&opts.source)?;
    let paths = resolve_paths(&cfg.paths);
    let mut report = CommandReport::new("verify");
    report.detail(format!("world_dir={}", paths.world_dir.display()));

    let mut checked = 0usize;
    for subject in &cfg.subjects {
        let online = format_uuid(&subject.online);
        let offline = format_uuid(&offline_uuid(&subject.name));
        if online == offline {
            report.detail(format!("{}: skipped, same UUID", subject.name));
            continue;
        }

        for target in &TARGETS {
            let src = paths.target_path(target, &online);
            let dst = paths.target_path(target, &offline);
            if !src.exists() {
                if !target.optional {
                    report.warn_with_detail(format!(
                        "{}: {} not found",
                        subject.name,
                        target.label(&online)
                    ));
                }
                continue;
            }
            checked += 1;
            let problems = check_destination(&src, &dst, &cfg.owner)?;
            if problems.is_empty() {
                report.detail(format!("{}: {} ok", subject.name, basename(&dst)));
            }
            for problem in problems {
                report.issue(format!(
                    "{} {}: {}: {problem}",
                    MigrateErrorCode::E003VerifyMismatch.as_str(),
                    subject.name,
                    target.label(&offline)
                ));
            }
        }
    }

    report.detail(format!("files_checked={checked}"));
    report.enforce_strict(opts.strict);
    Ok(report)
}
