//! Parallel analysis session.
//!
//! Files share no mutable state, so the batch is embarrassingly parallel: a
//! bounded worker pool pulls files from a channel, analyzes each one with
//! the shared registry, and records results through the aggregator. Reports
//! are re-sorted by path at the end so output order never depends on
//! completion order.

use crate::config::ResolvedConfig;
use crate::registry::RuleRegistry;
use crate::report::{Aggregator, FileReport, SourceFile, Summary};
use crossbeam::channel;

/// A batch run over in-memory files.
pub struct Session<'a> {
    config: &'a ResolvedConfig,
    registry: &'a RuleRegistry,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a ResolvedConfig, registry: &'a RuleRegistry) -> Self {
        Session { config, registry }
    }

    /// Analyze one file.
    pub fn lint_file(&self, file: &SourceFile) -> FileReport {
        let diagnostics = crate::lint_text(&file.text, self.config, self.registry);
        FileReport::new(file.path.clone(), diagnostics)
    }

    /// Analyze a batch on a worker pool sized to the host. Files whose
    /// extension is out of scope are skipped.
    pub fn run(&self, files: Vec<SourceFile>) -> (Vec<FileReport>, Summary) {
        let files: Vec<SourceFile> = files
            .into_iter()
            .filter(|f| self.config.applies_to(&f.path))
            .collect();
        if files.is_empty() {
            return (Vec::new(), Summary::default());
        }
        let workers = num_cpus::get().min(files.len()).max(1);
        let aggregator = Aggregator::new();
        let (job_tx, job_rx) = channel::unbounded::<SourceFile>();
        let (report_tx, report_rx) = channel::unbounded::<FileReport>();
        for file in files {
            job_tx.send(file).expect("queue open");
        }
        drop(job_tx);

        let mut reports: Vec<FileReport> = std::thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let report_tx = report_tx.clone();
                let aggregator = &aggregator;
                scope.spawn(move || {
                    while let Ok(file) = job_rx.recv() {
                        let report = self.lint_file(&file);
                        aggregator.record(&report);
                        let _ = report_tx.send(report);
                    }
                });
            }
            drop(report_tx);
            report_rx.iter().collect()
        });

        reports.sort_by(|a, b| a.path.cmp(&b.path));
        (reports, aggregator.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_totals_independent_of_order() {
        let config = ResolvedConfig::default();
        let registry = RuleRegistry::builtin();
        let session = Session::new(&config, &registry);
        let files = vec![
            SourceFile::new("b.ts", "debugger;\n"),
            SourceFile::new("a.ts", "let x = 1;\nuse(x);\n"),
            SourceFile::new("c.ts", "if (x = 1) { run(); }\n"),
        ];
        let (reports, summary) = session.run(files);
        assert_eq!(summary.files, 3);
        assert!(summary.errors >= 2, "debugger and cond-assign are errors");
        // deterministic path order regardless of worker completion
        let paths: Vec<PathBuf> = reports.into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a.ts"),
                PathBuf::from("b.ts"),
                PathBuf::from("c.ts")
            ]
        );
    }

    #[test]
    fn test_out_of_scope_files_skipped() {
        let config = ResolvedConfig::default();
        let registry = RuleRegistry::builtin();
        let session = Session::new(&config, &registry);
        let (reports, summary) = session.run(vec![SourceFile::new("notes.md", "debugger;\n")]);
        assert!(reports.is_empty());
        assert_eq!(summary.files, 0);
    }
}
