//! setforge CLI
//!
//! Command-line interface for compiling pokeset YAML trees into a
//! validated database and matchmaking rollup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use setforge_compile::report::{self, write_database, write_rollup};
use setforge_compile::{
    BasicResolver, CompileOutcome, LogProgress, RollupOptions, WalkProgress, WalkStats,
    compile_corpus,
};
use setforge_model::{Diagnostic, Severity};

#[derive(Parser)]
#[command(name = "setforge")]
#[command(about = "Compile pokeset YAML trees into a validated database", long_about = None)]
struct Cli {
    /// Corpus root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Common arguments for commands that print the diagnostic report.
#[derive(Args, Clone)]
struct ReportArgs {
    /// Include NOTE-level diagnostics in the report
    #[arg(long)]
    include_notes: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the corpus and write the database and rollup artifacts
    Compile {
        /// Database output file (default: <root>/_compiled.json)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Rollup output file (default: <root>/_matchmaking.json)
        #[arg(long)]
        rollup_out: Option<PathBuf>,

        /// Marker tags that define rollup groups
        #[arg(long = "rollup-tag", value_delimiter = ',')]
        rollup_tags: Option<Vec<String>>,

        /// Minimum occurrences for a trainer tag to enter a rollup group
        #[arg(long, default_value_t = 4)]
        rollup_threshold: usize,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Validate the corpus without writing any artifacts
    Check {
        #[command(flatten)]
        report: ReportArgs,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let root = cli
        .root
        .unwrap_or_else(|| std::env::current_dir().expect("Failed to get current directory"));

    let code = match cli.command {
        Commands::Compile {
            out,
            rollup_out,
            rollup_tags,
            rollup_threshold,
            report,
        } => run_compile(
            &root,
            out,
            rollup_out,
            rollup_tags,
            rollup_threshold,
            report,
        ),
        Commands::Check { report } => run_check(&root, report),
    };

    std::process::exit(code);
}

/// Spinner-backed progress for interactive runs.
struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("/-\\|"),
        );
        Self { bar }
    }
}

impl WalkProgress for SpinnerProgress {
    fn on_file(&self, path: &Path) {
        self.bar.set_message(format!("Loading {}", path.display()));
        self.bar.tick();
    }

    fn on_complete(&self, _stats: &WalkStats) {
        self.bar.finish_and_clear();
    }
}

/// Run the compile command.
fn run_compile(
    root: &Path,
    out: Option<PathBuf>,
    rollup_out: Option<PathBuf>,
    rollup_tags: Option<Vec<String>>,
    rollup_threshold: usize,
    report_args: ReportArgs,
) -> i32 {
    println!(
        "Compiling pokesets in: {}",
        root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    println!();

    let options = RollupOptions {
        markers: rollup_tags.unwrap_or_else(|| RollupOptions::default().markers),
        min_occurrences: rollup_threshold,
    };

    let outcome = match run_pipeline(root, &options) {
        Some(outcome) => outcome,
        None => return 1,
    };

    print_report(&outcome.diagnostics, &report_args);

    let db_path = out.unwrap_or_else(|| root.join(report::DATABASE_FILENAME));
    let rollup_path = rollup_out.unwrap_or_else(|| root.join(report::ROLLUP_FILENAME));

    if let Err(e) = write_database(&db_path, &outcome.sets) {
        eprintln!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        return 1;
    }
    if let Err(e) = write_rollup(&rollup_path, &outcome.rollup) {
        eprintln!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        return 1;
    }

    print_summary(&outcome);
    println!(
        "  {} {} sets written to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        outcome.sets.len(),
        db_path.display(),
    );
    println!(
        "  {} rollup written to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        rollup_path.display(),
    );

    report::exit_status(&outcome.diagnostics)
}

/// Run the check command.
fn run_check(root: &Path, report_args: ReportArgs) -> i32 {
    println!(
        "Checking pokesets in: {}",
        root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    println!();

    let outcome = match compile_corpus(
        root,
        &BasicResolver,
        &RollupOptions::default(),
        Some(&LogProgress),
    ) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            return 1;
        }
    };

    print_report(&outcome.diagnostics, &report_args);
    print_summary(&outcome);

    report::exit_status(&outcome.diagnostics)
}

/// Walk, resolve and cross-check the corpus, with a spinner while it runs.
fn run_pipeline(root: &Path, options: &RollupOptions) -> Option<CompileOutcome> {
    let progress = SpinnerProgress::new();
    match compile_corpus(root, &BasicResolver, options, Some(&progress)) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            progress.bar.finish_and_clear();
            eprintln!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            None
        }
    }
}

/// Print the severity-filtered diagnostic report in accumulation order.
fn print_report(diagnostics: &[Diagnostic], args: &ReportArgs) {
    let min_severity = if args.include_notes {
        Severity::Note
    } else {
        Severity::Warning
    };

    for diag in report::filter_report(diagnostics, min_severity) {
        match diag.severity {
            Severity::Error => println!(
                "  {} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                diag,
            ),
            Severity::Warning => println!(
                "  {} {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                diag,
            ),
            Severity::Note => println!(
                "  {}",
                diag.to_string().if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
}

/// Print the overall summary block.
fn print_summary(outcome: &CompileOutcome) {
    println!();
    println!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    println!(
        "  {} directories, {} files, {} sets",
        outcome.stats.directories, outcome.stats.files, outcome.stats.sets,
    );

    let errors = outcome
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = outcome
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    if errors > 0 {
        println!(
            "  {} {} errors",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            errors,
        );
    }
    if warnings > 0 {
        println!(
            "  {} {} warnings",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            warnings,
        );
    }
    if errors == 0 && warnings == 0 {
        println!(
            "  {} no problems found",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        );
    }
}
