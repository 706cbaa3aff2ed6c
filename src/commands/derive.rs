use anyhow::Result;

use crate::commands::CommandReport;
use crate::migrate::offline_id::offline_uuid_string;

#[derive(Debug, Clone, Default)]
pub struct DeriveOptions {
    pub names: Vec<String>,
}

pub fn run(opts: &DeriveOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("derive");
    if opts.names.is_empty() {
        report.issue("no names given");
        return Ok(report);
    }
    for name in &opts.names {
        report.detail(format!("{name} {}", offline_uuid_string(name)));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{DeriveOptions, run};

    #[test]
    fn derive_reports_one_line_per_name() {
        let report = run(&DeriveOptions {
            names: vec!["TNTbros101".to_string(), "Cartorson".to_string()],
        })
        .expect("derive");
        assert!(report.ok);
        assert_eq!(
            report.details,
            vec![
                "TNTbros101 32965ceb-5084-3608-b1c8-0bd04a9a83af",
                "Cartorson a582e4fb-c7ae-3cfd-84e6-9f123b8baa3a",
            ]
        );
    }

    #[test]
    fn derive_without_names_is_an_issue() {
        let report = run(&DeriveOptions::default()).expect("derive");
        assert!(!report.ok);
    }
}
