//! docstyle-apply - copy style definitions from a template document
//!
//! Copies `w:style` definitions from a template .docx into a target .docx,
//! leaving the target's content untouched.

mod common;

use clap::Parser;
use colored::*;
use docstyle::render::{rule, LIGHT_RULE_WIDTH};
use docstyle::{ApplyOptions, ApplyReport, StyleAction};
use std::fmt::Write;
use std::path::PathBuf;

/// Copy style definitions from a template to a target document
#[derive(Parser)]
#[command(
    name = "docstyle-apply",
    author = "iyulab",
    version,
    about = "Copy style definitions from a template to a target document",
    long_about = "docstyle-apply - Copy style definitions from a template .docx into a target .docx.\n\n\
                  Existing styles in the target are skipped unless --overwrite is given."
)]
struct Cli {
    /// Template document with styles to copy
    template: PathBuf,

    /// Target document to update
    target: PathBuf,

    /// Comma-separated style names to copy (default: all)
    #[arg(long)]
    styles: Option<String>,

    /// Overwrite existing styles in target
    #[arg(long)]
    overwrite: bool,

    /// Output file (default: modify target in place)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show what would be done without making changes
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    common::init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        common::exit_with_error(&e);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.template.exists() {
        return Err(format!("Template not found: {}", cli.template.display()).into());
    }
    if !cli.target.exists() {
        return Err(format!("Target not found: {}", cli.target.display()).into());
    }

    let mut options = ApplyOptions::new()
        .with_overwrite(cli.overwrite)
        .with_dry_run(cli.dry_run);
    if let Some(ref list) = cli.styles {
        options = options.with_style_list(list);
    }
    if let Some(ref output) = cli.output {
        options = options.with_output(output);
    }

    let pb = common::create_spinner("Applying styles...");
    let result = docstyle::apply_template(&cli.template, &cli.target, &options);
    pb.finish_and_clear();
    let report = result?;

    print!("{}", format_report(&report));
    Ok(())
}

/// Render the outcome of a run for the terminal.
fn format_report(report: &ApplyReport) -> String {
    let mut out = String::new();

    for warning in &report.warnings {
        let _ = writeln!(out, "{}: {}", "Warning".yellow().bold(), warning);
    }

    if report.processed == 0 {
        let _ = writeln!(out, "No styles to copy.");
        return out;
    }

    let _ = writeln!(out, "Template: {}", report.template.display());
    let _ = writeln!(out, "Target: {}", report.target.display());
    let _ = writeln!(out, "Styles to process: {}", report.processed);
    let _ = writeln!(out, "{}", rule('-', LIGHT_RULE_WIDTH));

    for outcome in &report.outcomes {
        let label = match (outcome.action, report.dry_run) {
            (StyleAction::Skipped, true) => continue,
            (StyleAction::Skipped, false) => {
                let _ = writeln!(
                    out,
                    "  {}: {} (exists, use --overwrite)",
                    "SKIP".yellow(),
                    outcome.name
                );
                continue;
            }
            (StyleAction::Added, true) => "WOULD ADD".green(),
            (StyleAction::Replaced, true) => "WOULD REPLACE".cyan(),
            (StyleAction::Added, false) => "ADDED".green(),
            (StyleAction::Replaced, false) => "REPLACED".cyan(),
        };
        let _ = writeln!(out, "  {}: {}", label, outcome.name);
    }

    if let Some(ref output) = report.output {
        let _ = writeln!(out, "{}", rule('-', LIGHT_RULE_WIDTH));
        let _ = writeln!(out, "{}: {}", "Output".bold(), output.display());
    }

    let _ = writeln!(out, "{}", rule('-', LIGHT_RULE_WIDTH));
    let _ = writeln!(out, "Added: {}", report.added().len());
    let _ = writeln!(out, "Replaced: {}", report.replaced().len());
    let _ = writeln!(out, "Skipped: {}", report.skipped().len());

    if report.dry_run {
        let _ = writeln!(out, "\n(Dry run - no changes made)");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "docstyle-apply",
            "template.docx",
            "target.docx",
            "--styles",
            "Heading 1,Title",
            "--overwrite",
            "--dry-run",
            "-o",
            "out.docx",
        ])
        .unwrap();
        assert_eq!(cli.styles.as_deref(), Some("Heading 1,Title"));
        assert!(cli.overwrite);
        assert!(cli.dry_run);
        assert_eq!(cli.output, Some(PathBuf::from("out.docx")));
    }

    fn sample_report(dry_run: bool) -> ApplyReport {
        let mut report = ApplyReport::new("template.docx", "target.docx", dry_run);
        report.processed = 3;
        report.record("Normal", "Normal", StyleAction::Skipped);
        report.record("Heading 1", "Heading1", StyleAction::Replaced);
        report.record("Accent", "Accent", StyleAction::Added);
        report
    }

    #[test]
    fn test_format_report_written() {
        colored::control::set_override(false);
        let mut report = sample_report(false);
        report.output = Some(PathBuf::from("out.docx"));

        let dashes = "-".repeat(40);
        let expected = format!(
            "Template: template.docx
Target: target.docx
Styles to process: 3
{dashes}
  SKIP: Normal (exists, use --overwrite)
  REPLACED: Heading 1
  ADDED: Accent
{dashes}
Output: out.docx
{dashes}
Added: 1
Replaced: 1
Skipped: 1
",
            dashes = dashes
        );
        assert_eq!(format_report(&report), expected);
    }

    #[test]
    fn test_format_report_dry_run() {
        colored::control::set_override(false);
        let text = format_report(&sample_report(true));

        assert!(!text.contains("SKIP"));
        assert!(text.contains("\n  WOULD REPLACE: Heading 1\n  WOULD ADD: Accent\n"));
        assert!(!text.contains("Output:"));
        assert!(text.contains("\nSkipped: 1\n"));
        assert!(text.ends_with("\n(Dry run - no changes made)\n"));
    }

    #[test]
    fn test_format_report_nothing_selected() {
        colored::control::set_override(false);
        let mut report = ApplyReport::new("template.docx", "target.docx", false);
        report
            .warnings
            .push("Style 'Missing' not found in template".to_string());

        assert_eq!(
            format_report(&report),
            "Warning: Style 'Missing' not found in template\nNo styles to copy.\n"
        );
    }
}
