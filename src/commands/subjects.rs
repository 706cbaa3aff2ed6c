use anyhow::Result;

use crate::assets::SubjectTable;
use crate::commands::{CommandReport, SourceOptions, load_effective_config};
use crate::migrate::offline_id::{format_uuid, offline_uuid};

#[derive(Debug, Clone, Default)]
pub struct SubjectsOptions {
    pub source: SourceOptions,
    pub toml: bool,
}

pub fn run(opts: &SubjectsOptions) -> Result<CommandReport> {
    let cfg = load_effective_config(&opts.source)?;
    let mut report = CommandReport::new("subjects");

    if opts.toml {
        let table = SubjectTable {
            subjects: cfg.subjects,
        };
        for line in toml::to_string(&table)?.lines() {
            report.detail(line);
        }
        return Ok(report);
    }

    for subject in &cfg.subjects {
        let online = format_uuid(&subject.online);
        let offline = format_uuid(&offline_uuid(&subject.name));
        let marker = if online == offline { " (same)" } else { "" };
        report.detail(format!("{online} -> {offline} {}{marker}", subject.name));
    }
    Ok(report)
}
