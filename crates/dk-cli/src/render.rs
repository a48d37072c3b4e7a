//! Terminal rendering of the preview table and run events

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use dk_core::{Event, LinkStatus, PlannedLink, ReconciliationPlan, Reporter, TargetValidity};
use tabled::{Table, Tabled, settings::Style};

/// One preview row
#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Link Status")]
    status: String,
    #[tabled(rename = "Target Status")]
    target_status: String,
}

impl From<&PlannedLink> for LinkRow {
    fn from(link: &PlannedLink) -> Self {
        Self {
            source: link.source.display().to_string(),
            target: link.target.display().to_string(),
            status: paint_status(link.status).to_string(),
            target_status: paint_target(link.target_validity).to_string(),
        }
    }
}

/// Writes the preview and events for a person at a terminal.
///
/// Write failures are ignored; there is nowhere left to report them.
pub struct TerminalReporter<W: Write> {
    out: W,
}

impl TerminalReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl std::fmt::Display) {
        let _ = writeln!(self.out, "{}", text);
    }
}

impl<W: Write> Reporter for TerminalReporter<W> {
    fn preview(&mut self, plan: &ReconciliationPlan) {
        if plan.is_empty() {
            self.line("No links configured.".dimmed());
            return;
        }

        let rows: Vec<LinkRow> = plan.rows().map(LinkRow::from).collect();
        let mut table = Table::new(&rows);
        table.with(Style::sharp());
        self.line(table);
        self.line("");
    }

    fn notify(&mut self, event: &Event) {
        match event {
            Event::NoChangesNeeded => {
                self.line("Everything looks good. No changes needed.".green().bold());
            }
            Event::MissingTargets(targets) => {
                self.line("Warning: The following targets do not exist:".yellow().bold());
                for target in targets {
                    self.line(format!("  - {}", target.display()).yellow());
                }
            }
            Event::Aborted(_) => {
                self.line("Exiting without making any changes".yellow());
            }
            Event::BackedUp { original, stored } => {
                self.line(
                    format!("Backed up {} to {}", original.display(), stored.display()).dimmed(),
                );
            }
            Event::Removed { path, directory } => {
                let what = if *directory { "Removed directory" } else { "Removed" };
                self.line(format!("{} {}", what, path.display()));
            }
            Event::Created { source, target } => {
                self.line(
                    format!(
                        "Created symlink: {} -> {}",
                        source.display(),
                        target.display()
                    )
                    .green(),
                );
            }
            Event::ApplyFailed { source, lost } => {
                if *lost {
                    self.line(
                        format!(
                            "Failed to link {}; the original was removed and could not be kept",
                            source.display()
                        )
                        .red()
                        .bold(),
                    );
                } else {
                    self.line(format!("Failed to link {}", source.display()).red());
                }
            }
            Event::Restoring => {
                self.line("Restoring from backup...".yellow().bold());
            }
            Event::Restored { original } => {
                self.line(format!("Restored {}", original.display()));
            }
            Event::RestoreSkipped { stored } => {
                self.line(
                    format!("No backup record for {}, skipping", stored.display()).yellow(),
                );
            }
            Event::RestoreCompleted => {
                self.line("Restore completed".green().bold());
            }
        }
    }
}

fn paint_status(status: LinkStatus) -> ColoredString {
    let text = status.as_str();
    match status {
        LinkStatus::Correct => text.green(),
        LinkStatus::Missing => text.yellow(),
        LinkStatus::Incorrect => text.red(),
        LinkStatus::Nonlink => text.magenta(),
    }
}

fn paint_target(validity: TargetValidity) -> ColoredString {
    let text = validity.as_str();
    match validity {
        TargetValidity::Exists => text.green(),
        TargetValidity::Missing => text.red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn render(f: impl FnOnce(&mut TerminalReporter<Vec<u8>>)) -> String {
        let mut reporter = TerminalReporter::new(Vec::new());
        f(&mut reporter);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn link(source: &str, status: LinkStatus) -> PlannedLink {
        PlannedLink {
            source: PathBuf::from(source),
            target: PathBuf::from(format!("/dots{source}")),
            status,
            target_validity: TargetValidity::Exists,
        }
    }

    #[test]
    fn test_preview_table_has_headers_and_rows() {
        let mut plan = ReconciliationPlan::default();
        plan.push(link("/h/.zshrc", LinkStatus::Nonlink));
        plan.push(link("/h/.bashrc", LinkStatus::Correct));

        let output = render(|r| r.preview(&plan));

        for header in ["Source", "Target", "Link Status", "Target Status"] {
            assert!(output.contains(header), "missing header {header}");
        }
        let bashrc = output.find("/h/.bashrc").unwrap();
        let zshrc = output.find("/h/.zshrc").unwrap();
        assert!(bashrc < zshrc, "correct rows come first");
        assert!(output.contains("NONLINK"));
        assert!(output.contains("EXISTS"));
    }

    #[test]
    fn test_preview_columns_line_up() {
        let mut plan = ReconciliationPlan::default();
        plan.push(link("/h/.bashrc", LinkStatus::Missing));
        plan.push(link("/h/.config/nvim", LinkStatus::Incorrect));

        let output = render(|r| r.preview(&plan));

        let columns: Vec<usize> = output
            .lines()
            .filter(|line| line.contains("/h/"))
            .map(|line| line.find("/dots").unwrap())
            .collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], columns[1]);
    }

    #[test]
    fn test_empty_plan() {
        let output = render(|r| r.preview(&ReconciliationPlan::default()));
        assert!(output.contains("No links configured."));
    }

    #[test]
    fn test_event_messages() {
        let output = render(|r| {
            r.notify(&Event::NoChangesNeeded);
            r.notify(&Event::Removed {
                path: PathBuf::from("/h/nvim"),
                directory: true,
            });
            r.notify(&Event::Created {
                source: PathBuf::from("/h/.bashrc"),
                target: PathBuf::from("/d/.bashrc"),
            });
            r.notify(&Event::ApplyFailed {
                source: PathBuf::from("/h/.zshrc"),
                lost: true,
            });
            r.notify(&Event::Restoring);
            r.notify(&Event::RestoreCompleted);
        });

        assert!(output.contains("Failed to link /h/.zshrc; the original was removed"));
        assert!(output.contains("Everything looks good. No changes needed."));
        assert!(output.contains("Removed directory /h/nvim"));
        assert!(output.contains("Created symlink: /h/.bashrc -> /d/.bashrc"));
        assert!(output.contains("Restoring from backup..."));
        assert!(output.contains("Restore completed"));
    }

    #[test]
    fn test_missing_targets_are_listed() {
        let output = render(|r| {
            r.notify(&Event::MissingTargets(vec![
                PathBuf::from("/d/a"),
                PathBuf::from("/d/b"),
            ]))
        });

        assert!(output.contains("targets do not exist"));
        assert!(output.contains("- /d/a"));
        assert!(output.contains("- /d/b"));
    }
}
