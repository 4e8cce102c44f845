//! docstyle-inspect - report on the style catalog of a Word document
//!
//! Lists styles with their inheritance and formatting, and flags deep or
//! circular inheritance and dangling base styles.

mod common;

use clap::{Parser, ValueEnum};
use docstyle::render::{self, JsonFormat};
use docstyle::{InspectOptions, StyleType};
use std::io::{self, Write};
use std::path::PathBuf;

/// Inspect styles in a Word document
#[derive(Parser)]
#[command(
    name = "docstyle-inspect",
    author = "iyulab",
    version,
    about = "Inspect styles in a Word document",
    long_about = "docstyle-inspect - Dump the style catalog of a .docx file.\n\n\
                  Shows names, IDs, inheritance, key formatting and potential issues\n\
                  (orphaned base styles, deep or circular inheritance)."
)]
struct Cli {
    /// Path to .docx file
    document: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Output compact JSON (no indentation)
    #[arg(long, requires = "json")]
    compact: bool,

    /// Filter by style type
    #[arg(long = "type", value_enum)]
    style_type: Option<TypeFilter>,

    /// Filter by style name (partial match)
    #[arg(long)]
    name: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Style type filter
#[derive(Clone, Copy, ValueEnum)]
enum TypeFilter {
    Paragraph,
    Character,
    Table,
    List,
}

impl From<TypeFilter> for StyleType {
    fn from(filter: TypeFilter) -> Self {
        match filter {
            TypeFilter::Paragraph => StyleType::Paragraph,
            TypeFilter::Character => StyleType::Character,
            TypeFilter::Table => StyleType::Table,
            TypeFilter::List => StyleType::List,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    common::init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        common::exit_with_error(&e);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.document.exists() {
        return Err(format!("File not found: {}", cli.document.display()).into());
    }

    let mut options = InspectOptions::new();
    if let Some(filter) = cli.style_type {
        options = options.with_type_filter(filter.into());
    }
    if let Some(name) = cli.name {
        options = options.with_name_filter(name);
    }

    let pb = common::create_spinner("Reading styles...");
    let result = docstyle::inspect_file(&cli.document, &options);
    pb.finish_and_clear();
    let report = result?;

    let output = if cli.json {
        let format = if cli.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        let mut json = render::to_json(&report, format)?;
        json.push('\n');
        json
    } else {
        render::to_text(&report)
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(output.as_bytes())?;
    Ok(())
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
    fn test_type_filter() {
        let cli =
            Cli::try_parse_from(["docstyle-inspect", "doc.docx", "--type", "list", "--json"])
                .unwrap();
        assert!(matches!(cli.style_type, Some(TypeFilter::List)));
        assert_eq!(StyleType::from(TypeFilter::List), StyleType::List);

        assert!(Cli::try_parse_from(["docstyle-inspect", "doc.docx", "--compact"]).is_err());
        assert!(Cli::try_parse_from(["docstyle-inspect", "doc.docx", "--type", "frame"]).is_err());
    }
}
