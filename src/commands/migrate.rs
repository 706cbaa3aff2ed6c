use anyhow::Result;

use crate::commands::{CommandReport, SourceOptions, load_effective_config};
use crate::error::MigrateErrorCode;
use crate::migrate::audit::AuditLog;
use crate::migrate::migrator::{
    MigrationRun, Migrator, SubjectAction, TargetAction, describe_subject,
};
use crate::migrate::paths::resolve_paths;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    pub source: SourceOptions,
    pub dry_run: bool,
    pub no_audit: bool,
    pub strict: bool,
}

pub fn run(opts: &MigrateOptions) -> Result<CommandReport> {
    let cfg = load_effective_config(&opts.source)?;
    let paths = resolve_paths(&cfg.paths);
    let audit = if opts.no_audit || opts.dry_run {
        AuditLog::disabled()
    } else {
        AuditLog::new(paths.audit_log.clone())
    };

    let mut report = CommandReport::new(if opts.dry_run { "plan" } else { "migrate" });
    report.detail("UUID Migration: online -> offline");
    report.detail("=".repeat(RULE_WIDTH));
    report.detail(format!("world_dir={}", paths.world_dir.display()));
    if let Some(log) = audit.path() {
        report.detail(format!("audit_log={}", log.display()));
    }

    if !paths.world_dir.is_dir() {
        report.issue(format!(
            "world directory {} does not exist",
            paths.world_dir.display()
        ));
        return Ok(report);
    }

    // Outcomes finished before an abort are still rendered.
    let MigrationRun {
        outcomes,
        summary,
        failure,
    } = Migrator::new(&cfg, &paths, &audit)
        .dry_run(opts.dry_run)
        .run();

    for outcome in &outcomes {
        report.detail("");
        for line in describe_subject(outcome, opts.dry_run) {
            report.detail(line);
        }
        if let SubjectAction::Migrated(targets) = &outcome.action {
            for t in targets.iter().filter(|t| t.action == TargetAction::Missing) {
                report.warn(format!(
                    "{}: {} not found",
                    outcome.name,
                    t.target.label(&outcome.online)
                ));
            }
        }
    }

    report.detail("");
    report.detail("=".repeat(RULE_WIDTH));
    report.detail(format!(
        "subjects migrated={} skipped={} aborted={} files copied={} replaced={} bytes={} warnings={}",
        summary.subjects_migrated,
        summary.subjects_skipped,
        summary.subjects_aborted,
        summary.files_copied,
        summary.files_replaced,
        summary.bytes_copied,
        summary.warnings
    ));
    if let Some(err) = failure {
        report.detail("Migration aborted!");
        report.issue(format!(
            "{} {err:#}",
            MigrateErrorCode::E002WriteFailure.as_str()
        ));
    } else if opts.dry_run {
        report.detail("Dry run complete, nothing was written.");
    } else {
        report.detail("Migration complete!");
        report.detail(format!(
            "All files owned by UID:GID {}:{}",
            cfg.owner.uid, cfg.owner.gid
        ));
    }

    report.enforce_strict(opts.strict);
    Ok(report)
}
