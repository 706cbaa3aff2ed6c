use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::MigrateErrorCode;
use crate::migrate::audit::AuditLog;
use crate::migrate::config::{MigrateConfig, Subject};
use crate::migrate::copy::{CopyResult, copy_and_chown};
use crate::migrate::offline_id::{format_uuid, offline_uuid};
use crate::migrate::paths::WorldPaths;
use crate::migrate::targets::{FileTarget, TARGETS};
use crate::migrate::util::basename;
use crate::migrate::warn::{self, WarnEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAction {
    Copied,
    Replaced,
    MissingOptional,
    Missing,
}

#[derive(Debug, Clone)]
pub struct TargetOutcome {
    pub target: FileTarget,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub action: TargetAction,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub enum SubjectAction {
    Skipped,
    Migrated(Vec<TargetOutcome>),
}

#[derive(Debug, Clone)]
pub struct SubjectOutcome {
    pub name: String,
    pub online: String,
    pub offline: String,
    pub action: SubjectAction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub subjects_migrated: usize,
    pub subjects_skipped: usize,
    pub subjects_aborted: usize,
    pub files_copied: usize,
    pub files_replaced: usize,
    pub bytes_copied: u64,
    pub warnings: usize,
}

impl MigrationSummary {
    fn record(&mut self, outcome: &SubjectOutcome, aborted: bool) {
        let SubjectAction::Migrated(targets) = &outcome.action else {
            self.subjects_skipped += 1;
            return;
        };
        if aborted {
            self.subjects_aborted += 1;
        } else {
            self.subjects_migrated += 1;
        }
        for t in targets {
            self.bytes_copied += t.bytes;
            match t.action {
                TargetAction::Copied => self.files_copied += 1,
                TargetAction::Replaced => {
                    self.files_copied += 1;
                    self.files_replaced += 1;
                }
                TargetAction::Missing => self.warnings += 1,
                TargetAction::MissingOptional => {}
            }
        }
    }
}

/// Everything done before the run stopped, and what stopped it.
///
/// An aborted subject keeps the targets it finished, so the operator can
/// see exactly which destinations were already written.
#[derive(Debug)]
pub struct MigrationRun {
    pub outcomes: Vec<SubjectOutcome>,
    pub summary: MigrationSummary,
    pub failure: Option<anyhow::Error>,
}

/// Walks the subject table and re-keys each subject's files.
///
/// In dry-run mode the same decisions are made from existence checks
/// alone and nothing is written, warned or audited.
pub struct Migrator<'a> {
    cfg: &'a MigrateConfig,
    paths: &'a WorldPaths,
    audit: &'a AuditLog,
    dry_run: bool,
}

impl<'a> Migrator<'a> {
    pub fn new(cfg: &'a MigrateConfig, paths: &'a WorldPaths, audit: &'a AuditLog) -> Self {
        Self {
            cfg,
            paths,
            audit,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stops at the first failed subject.
    pub fn run(&self) -> MigrationRun {
        let mut run = MigrationRun {
            outcomes: Vec::with_capacity(self.cfg.subjects.len()),
            summary: MigrationSummary::default(),
            failure: None,
        };
        for subject in &self.cfg.subjects {
            let (outcome, failure) = self.migrate_subject(subject);
            run.summary.record(&outcome, failure.is_some());
            run.outcomes.push(outcome);
            if let Some(err) = failure {
                run.failure = Some(self.abort(subject, err));
                break;
            }
        }
        run
    }

    fn abort(&self, subject: &Subject, err: anyhow::Error) -> anyhow::Error {
        let err = match self.audit_event(
            &subject.name,
            "subject",
            MigrateErrorCode::E002WriteFailure.as_str(),
            &format!("{err:#}"),
        ) {
            Ok(()) => err,
            Err(audit_err) => err.context(format!("audit log also failed: {audit_err:#}")),
        };
        err.context(format!("migration of {} aborted", subject.name))
    }

    /// A skipped subject touches nothing, not even the audit log.
    pub fn migrate_subject(&self, subject: &Subject) -> (SubjectOutcome, Option<anyhow::Error>) {
        let online = format_uuid(&subject.online);
        let offline = format_uuid(&offline_uuid(&subject.name));

        if online == offline {
            let outcome = SubjectOutcome {
                name: subject.name.clone(),
                online,
                offline,
                action: SubjectAction::Skipped,
            };
            return (outcome, None);
        }

        let mut targets = Vec::with_capacity(TARGETS.len());
        let mut failure = None;
        for target in &TARGETS {
            match self.migrate_target(&subject.name, target, &online, &offline) {
                Ok(done) => targets.push(done),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        let outcome = SubjectOutcome {
            name: subject.name.clone(),
            online,
            offline,
            action: SubjectAction::Migrated(targets),
        };
        (outcome, failure)
    }

    fn migrate_target(
        &self,
        name: &str,
        target: &FileTarget,
        online: &str,
        offline: &str,
    ) -> Result<TargetOutcome> {
        let source = self.paths.target_path(target, online);
        let destination = self.paths.target_path(target, offline);

        let result = if self.dry_run {
            if source.exists() {
                CopyResult::Copied {
                    bytes: source.metadata().map(|m| m.len()).unwrap_or(0),
                    replaced: destination.exists(),
                }
            } else {
                CopyResult::SourceMissing
            }
        } else {
            copy_and_chown(&source, &destination, &self.cfg.owner)?
        };

        let (action, bytes) = match result {
            CopyResult::Copied { bytes, replaced } => {
                let action = if replaced {
                    TargetAction::Replaced
                } else {
                    TargetAction::Copied
                };
                (action, bytes)
            }
            CopyResult::SourceMissing if target.optional => (TargetAction::MissingOptional, 0),
            CopyResult::SourceMissing => (TargetAction::Missing, 0),
        };

        match action {
            TargetAction::Copied | TargetAction::Replaced => {
                let message = format!("{} -> {}", basename(&source), basename(&destination));
                self.audit_event(name, "copy", "ok", &message)?;
            }
            TargetAction::Missing => {
                let label = target.label(online);
                if !self.dry_run {
                    warn::emit(&WarnEvent {
                        code: MigrateErrorCode::E001MissingSource.as_str(),
                        subject: name,
                        online,
                        target: &label,
                        reason: "source file not found",
                    });
                }
                self.audit_event(name, "copy", "missing", &label)?;
            }
            TargetAction::MissingOptional => {}
        }

        Ok(TargetOutcome {
            target: *target,
            source,
            destination,
            action,
            bytes,
        })
    }

    fn audit_event(&self, subject: &str, phase: &str, status: &str, message: &str) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        self.audit.append(subject, phase, status, message)
    }
}

/// Progress lines for one subject, in the order the operator expects to read them.
pub fn describe_subject(outcome: &SubjectOutcome, dry_run: bool) -> Vec<String> {
    let mut lines = vec![
        format!("{}:", outcome.name),
        format!("  online:  {}", outcome.online),
        format!("  offline: {}", outcome.offline),
    ];
    let targets = match &outcome.action {
        SubjectAction::Skipped => {
            lines.push("  SKIP: same UUID".to_string());
            return lines;
        }
        SubjectAction::Migrated(targets) => targets,
    };

    let verb = if dry_run { "would copy " } else { "" };
    for t in targets {
        match t.action {
            TargetAction::Copied => lines.push(format!(
                "  {verb}{} -> {}",
                basename(&t.source),
                basename(&t.destination)
            )),
            TargetAction::Replaced => lines.push(format!(
                "  {verb}{} -> {} (replaced existing)",
                basename(&t.source),
                basename(&t.destination)
            )),
            TargetAction::Missing => lines.push(format!(
                "  WARNING: {} not found",
                t.target.label(&outcome.online)
            )),
            TargetAction::MissingOptional => {}
        }
    }
    lines
}
