//! redline: structural track-changes for XML documents
//!
//! Command-line front end for the `xml-redline` comparator.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;
use xml_redline::{CompareOptions, Comparator, ThreeWayMode};

/// Structural track-changes for XML documents
#[derive(Parser)]
#[command(name = "redline")]
#[command(version)]
#[command(about = "Structural track-changes for XML documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge two versions into one annotated document
    #[command(visible_alias = "c")]
    Compare {
        /// Old version
        old: String,
        /// New version
        new: String,
        /// Output file (default: stdout)
        output: Option<String>,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Render two versions side by side
    #[command(visible_alias = "2")]
    Columns {
        /// Old version
        old: String,
        /// New version
        new: String,
        /// Output file for the old (left) column
        left: String,
        /// Output file for the new (right) column
        right: String,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Compare against an original, accepting changes already made in an
    /// intermediate version
    #[command(name = "three-way", visible_alias = "3")]
    ThreeWay {
        /// Original version
        original: String,
        /// Intermediate version
        intermediate: String,
        /// Current version
        current: String,
        /// Output file (default: stdout)
        output: Option<String>,

        /// How changes already in the intermediate version are shown
        #[arg(short, long, value_enum, default_value = "accept")]
        mode: ModeArg,

        #[command(flatten)]
        options: OptionArgs,
    },
}

/// Comparison options shared by all subcommands.
#[derive(Args)]
struct OptionArgs {
    /// Show numbering changes as renumbered blocks instead of text changes
    #[arg(long)]
    ignore_renumbering: bool,

    /// Mark removed blocks read-only
    #[arg(long)]
    removed_read_only: bool,

    /// Tag compared as one indivisible unit (repeatable; replaces defaults)
    #[arg(long = "atomic", value_name = "TAG")]
    atomic: Vec<String>,

    /// Attribute holding stable element identifiers
    #[arg(long, value_name = "NAME", default_value = "id")]
    id_attr: String,
}

impl OptionArgs {
    fn to_options(&self) -> CompareOptions {
        let mut builder = CompareOptions::builder()
            .id_attribute(self.id_attr.clone())
            .ignore_renumbering(self.ignore_renumbering)
            .removed_as_read_only(self.removed_read_only);
        if !self.atomic.is_empty() {
            builder = builder.atomic_tags(self.atomic.iter().cloned());
        }
        builder.build()
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Fold external changes in as plain content
    Accept,
    /// Keep external changes visible as accepted
    Mark,
}

impl From<ModeArg> for ThreeWayMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Accept => ThreeWayMode::AcceptExternal,
            ModeArg::Mark => ThreeWayMode::MarkExternal,
        }
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compare {
            old,
            new,
            output,
            options,
        } => run_compare(&old, &new, output.as_deref(), &options),
        Commands::Columns {
            old,
            new,
            left,
            right,
            options,
        } => run_columns(&old, &new, &left, &right, &options),
        Commands::ThreeWay {
            original,
            intermediate,
            current,
            output,
            mode,
            options,
        } => run_three_way(
            &original,
            &intermediate,
            &current,
            output.as_deref(),
            mode.into(),
            &options,
        ),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn read(label: &str, path: &str) -> io::Result<String> {
    eprintln!("Reading {}: {}", label, path);
    fs::read_to_string(path)
}

fn write_output(path: Option<&str>, markup: &str) -> io::Result<()> {
    let mut output: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    output.write_all(markup.as_bytes())?;
    output.flush()
}

/// Runs a single-column comparison.
fn run_compare(
    old_path: &str,
    new_path: &str,
    output_path: Option<&str>,
    options: &OptionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let old = read("old", old_path)?;
    let new = read("new", new_path)?;

    eprintln!("Comparing...");
    let comparator = Comparator::new(options.to_options());
    let (merged, summary) = comparator.compare_with_summary(&old, &new)?;

    write_output(output_path, &merged)?;

    if summary.is_empty() {
        eprintln!("Compare complete. No changes.");
    } else {
        eprintln!("Compare complete: {}.", summary);
    }
    Ok(())
}

/// Runs a two-column comparison.
fn run_columns(
    old_path: &str,
    new_path: &str,
    left_path: &str,
    right_path: &str,
    options: &OptionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let old = read("old", old_path)?;
    let new = read("new", new_path)?;

    eprintln!("Comparing side by side...");
    let comparator = Comparator::new(options.to_options());
    let (left, right) = comparator.compare_two_column(&old, &new)?;

    write_output(Some(left_path), &left)?;
    write_output(Some(right_path), &right)?;

    eprintln!("Columns written to {} and {}.", left_path, right_path);
    Ok(())
}

/// Runs a three-way comparison.
fn run_three_way(
    original_path: &str,
    intermediate_path: &str,
    current_path: &str,
    output_path: Option<&str>,
    mode: ThreeWayMode,
    options: &OptionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let original = read("original", original_path)?;
    let intermediate = read("intermediate", intermediate_path)?;
    let current = read("current", current_path)?;

    eprintln!("Comparing against intermediate version...");
    let comparator = Comparator::new(options.to_options());
    let merged = comparator.compare_three_way(&original, &intermediate, &current, mode)?;

    write_output(output_path, &merged)?;

    eprintln!("Three-way compare complete.");
    Ok(())
}
