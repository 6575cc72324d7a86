//! dnacompare - DNA sequence comparison from FASTA files.
//!
//! ## Usage
//!
//! ```bash
//! dnacompare compare reference.fasta variant.fasta
//! dnacompare compare reference.fasta variant.fasta --format json
//! dnacompare compare reference.fasta variant.fasta --view
//! dnacompare analyze sequence.fasta
//! dnacompare translate sequence.fasta -g 2 -r 2
//! dnacompare codes
//! ```
//!
//! Each FASTA file must hold exactly one DNA record (A, C, G, T only).

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use dnacompare::analysis::{analyze_sequence, translate_orfs};
use dnacompare::controller::run_viewer;
use dnacompare::fasta::read_fasta_dna;
use dnacompare::genetic_code::{GeneticCode, GeneticCodes};
use dnacompare::model::{AppState, FastaRecord};
use dnacompare::mutation::compare;
use dnacompare::report::{
    render_analysis_text, render_comparison_text, AnalysisReport, ComparisonReport,
    DEFAULT_LINE_WIDTH,
};

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text with alignment blocks
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Options shared by report-producing commands
#[derive(clap::Args, Debug)]
struct ReportArgs {
    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "text")]
    format: OutputFormat,

    /// Symbols per line in text reports
    #[arg(short = 'w', long = "width", default_value_t = DEFAULT_LINE_WIDTH)]
    width: usize,

    /// Output file. Use "-" for stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare a variant sequence against a reference
    Compare {
        /// Reference FASTA file
        reference: PathBuf,
        /// Variant FASTA file
        variant: PathBuf,
        /// Open the interactive viewer instead of printing a report
        #[arg(long, conflicts_with_all = ["format", "width", "output"])]
        view: bool,
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Composition, codons, ORFs and translation of one sequence
    Analyze {
        /// FASTA file
        file: PathBuf,
        /// Genetic code for translation (1-33, default: 1 = Standard)
        #[arg(short = 'g', long = "genetic-code", default_value = "1")]
        genetic_code: u8,
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Translate one sequence to protein (FASTA output)
    Translate {
        /// FASTA file
        file: PathBuf,
        /// Genetic code for translation (1-33, default: 1 = Standard)
        #[arg(short = 'g', long = "genetic-code", default_value = "1")]
        genetic_code: u8,
        /// Forward reading frame (1-3)
        #[arg(short = 'r', long = "reading-frame", default_value = "1")]
        reading_frame: u8,
        /// Output file. Use "-" for stdout.
        #[arg(short = 'o', long = "output", default_value = "-")]
        output: String,
    },
    /// List the available genetic codes
    Codes,
}

/// dnacompare - compare DNA sequences and classify their mutations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load(path: &Path) -> Result<FastaRecord> {
    let record = read_fasta_dna(path).with_context(|| format!("Invalid input {}", path.display()))?;
    log::info!("Loaded {} ({} nt) from {}", record.id, record.len(), path.display());
    Ok(record)
}

fn lookup_code(id: u8) -> Result<&'static GeneticCode> {
    // Validate genetic code (1-33, with some gaps)
    if !(1..=33).contains(&id) {
        anyhow::bail!("Genetic code must be 1-33 (got {})", id);
    }
    GeneticCodes::global()
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Unknown genetic code: {}", id))
}

/// Writes to stdout for "-", otherwise to the named file.
fn write_output(output: &str, content: &str) -> Result<()> {
    if output == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(content.as_bytes())?;
        handle.flush()?;
    } else {
        std::fs::write(output, content).with_context(|| format!("Cannot write {}", output))?;
        log::info!("Wrote report to {}", output);
    }
    Ok(())
}

fn check_width(report: &ReportArgs) -> Result<()> {
    if report.width == 0 {
        anyhow::bail!("Line width must be greater than 0");
    }
    Ok(())
}

fn run_compare(reference: &Path, variant: &Path, view: bool, report: &ReportArgs) -> Result<()> {
    check_width(report)?;
    let reference = load(reference)?;
    let variant = load(variant)?;
    let comparison = compare(&reference.sequence, &variant.sequence)?;

    if view {
        let state = AppState::new(comparison, reference.header(), variant.header());
        return run_viewer(state);
    }

    let content = match report.format {
        OutputFormat::Text => render_comparison_text(&reference, &variant, &comparison, report.width),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&ComparisonReport::new(&reference, &variant, &comparison))?;
            json.push('\n');
            json
        }
    };
    write_output(&report.output, &content)
}

fn run_analyze(file: &Path, code_id: u8, report: &ReportArgs) -> Result<()> {
    check_width(report)?;
    let code = lookup_code(code_id)?;
    let record = load(file)?;

    let analysis = analyze_sequence(&record.sequence)?;
    let translated_orfs = translate_orfs(&analysis.orfs, code)?;
    let full_translation = code.translate(&record.sequence, 0)?;

    let content = match report.format {
        OutputFormat::Text => render_analysis_text(
            &record,
            &analysis,
            &translated_orfs,
            &full_translation,
            report.width,
        ),
        OutputFormat::Json => {
            let envelope = AnalysisReport::new(&record, &analysis, &translated_orfs, &full_translation);
            let mut json = serde_json::to_string_pretty(&envelope)?;
            json.push('\n');
            json
        }
    };
    write_output(&report.output, &content)
}

fn run_translate(file: &Path, code_id: u8, reading_frame: u8, output: &str) -> Result<()> {
    if !(1..=3).contains(&reading_frame) {
        anyhow::bail!("Reading frame must be 1-3 (got {})", reading_frame);
    }
    let code = lookup_code(code_id)?;
    let record = load(file)?;

    let translation = code.translate(&record.sequence, (reading_frame - 1) as usize)?;
    let content = format!(">{}\n{}\n", record.header(), translation.protein);
    write_output(output, &content)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match &args.command {
        Command::Compare {
            reference,
            variant,
            view,
            report,
        } => run_compare(reference, variant, *view, report),
        Command::Analyze {
            file,
            genetic_code,
            report,
        } => run_analyze(file, *genetic_code, report),
        Command::Translate {
            file,
            genetic_code,
            reading_frame,
            output,
        } => run_translate(file, *genetic_code, *reading_frame, output),
        Command::Codes => {
            let listing: String = GeneticCodes::global()
                .all()
                .iter()
                .map(|code| format!("{:>2}  {}\n", code.id, code.name))
                .collect();
            write_output("-", &listing)
        }
    }
}
