//! Status command implementation

use std::path::Path;

use colored::Colorize;
use dk_core::{
    FixedAnswer, PlannedLink, ReconcileOptions, ReconcileOutcome, ReconciliationPlan, Reconciler,
};
use dk_fs::RealFs;
use serde::Serialize;

use crate::context::AppContext;
use crate::error::Result;
use crate::render::TerminalReporter;

/// Machine-readable status report
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    config: &'a Path,
    project_root: &'a Path,
    pending: usize,
    links: Vec<&'a PlannedLink>,
}

/// Run the status command
///
/// Classifies every link and prints the table, or a JSON report with
/// `json`. Never prompts and never touches the filesystem.
pub fn run_status(context: &AppContext, json: bool) -> Result<()> {
    if json {
        let plan = ReconciliationPlan::classify(&RealFs, &context.paths, context.config.links());
        let report = StatusReport {
            config: &context.config_path,
            project_root: &context.project_root,
            pending: plan.pending_count(),
            links: plan.rows().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}: {}", "Config".dimmed(), context.config_path.display());
    println!();

    let mut confirmer = FixedAnswer(false);
    let mut reporter = TerminalReporter::stdout();
    let outcome = Reconciler::new(&RealFs, &context.paths, &mut confirmer, &mut reporter)
        .with_options(ReconcileOptions {
            preview_only: true,
            backup_dir: None,
        })
        .run(context.config.links())?;

    if let ReconcileOutcome::Previewed { pending } = outcome {
        println!(
            "{} link(s) need changes. Run {} to fix them.",
            pending.to_string().yellow().bold(),
            "dk apply".cyan()
        );
    }
    Ok(())
}
