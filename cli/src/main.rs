//! wikiclean CLI - MediaWiki dump to plain-prose corpus
//!
//! A command-line tool for cleaning Chinese Wikipedia dumps into JSON Lines.

use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use wikiclean::{
    clean_document, open_dump, process_dump, CleanOptions, CleaningResult, ProcessOptions,
    ProcessSummary, RecordWriter,
};

/// MediaWiki dump cleaning for language-model corpora
#[derive(Parser)]
#[command(
    name = "wikiclean",
    version,
    about = "Clean MediaWiki dumps into plain Chinese prose",
    long_about = "wikiclean - MediaWiki dump to plain-prose corpus.\n\n\
                  Reads a pages-articles dump (.xml or .xml.bz2), cleans every article\n\
                  and writes the accepted ones as JSON Lines.\n\n\
                  Usage:\n  \
                  wikiclean <dump>                 Process a dump with default settings\n  \
                  wikiclean process <dump> [opts]  Same, explicit form\n  \
                  wikiclean text <file>            Clean one wikitext file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Dump path (for default processing)
    input: Option<PathBuf>,

    #[command(flatten)]
    process: ProcessArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors, hide the progress spinner
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a dump into JSON Lines (default command)
    Process {
        /// Dump path (.xml or .xml.bz2)
        input: PathBuf,

        #[command(flatten)]
        args: ProcessArgs,
    },

    /// Clean a single raw wikitext file
    Text {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep reference, see-also and external link sections
        #[arg(long)]
        no_truncate: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct ProcessArgs {
    /// Output JSON Lines file
    #[arg(short, long, default_value = "zhwiki_cleaned.jsonl")]
    output: PathBuf,

    /// Sample JSON Lines file holding the first accepted records
    #[arg(long, default_value = "sample_1000.jsonl")]
    sample: PathBuf,

    /// Number of records mirrored to the sample file
    #[arg(long, default_value_t = 1000)]
    sample_size: usize,

    /// Stop after this many accepted articles
    #[arg(long)]
    max_articles: Option<u64>,

    /// Articles cleaned per batch
    #[arg(long, default_value_t = 256)]
    batch_size: usize,

    /// Clean on a single thread
    #[arg(long)]
    sequential: bool,

    /// Keep reference, see-also and external link sections
    #[arg(long)]
    no_truncate: bool,

    /// Print the corpus statistics as JSON instead of a report
    #[arg(long)]
    json: bool,
}

impl ProcessArgs {
    fn options(&self) -> ProcessOptions {
        let mut options = ProcessOptions::new()
            .with_batch_size(self.batch_size)
            .with_sample_size(self.sample_size)
            .with_clean_options(clean_options(self.no_truncate));
        if let Some(max) = self.max_articles {
            options = options.with_max_articles(max);
        }
        if self.sequential {
            options = options.sequential();
        }
        options
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let quiet = cli.quiet;

    let Some(command) = cli.command else {
        // Default command (wikiclean <dump>)
        if let Some(input) = cli.input {
            return run_process(&input, &cli.process, quiet);
        }
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Process { input, args } => run_process(&input, &args, quiet)?,

        Commands::Text {
            input,
            output,
            no_truncate,
        } => {
            let raw = fs::read_to_string(&input)?;
            let result = clean_document(&raw, &clean_options(no_truncate));

            match result {
                CleaningResult::Accepted {
                    text,
                    length,
                    cjk_ratio,
                } => {
                    write_output(output.as_deref(), &text)?;
                    if let Some(path) = output {
                        println!(
                            "{} Cleaned text: {} ({} chars, CJK {:.1}%)",
                            "✓".green().bold(),
                            path.display(),
                            length,
                            cjk_ratio * 100.0
                        );
                    }
                }
                CleaningResult::Rejected => {
                    eprintln!(
                        "{} Document rejected by the quality filters",
                        "!".yellow().bold()
                    );
                }
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Process a dump into the output and sample files
fn run_process(
    input: &Path,
    args: &ProcessArgs,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.options();
    let mut reader = open_dump(input)?;

    let main = BufWriter::new(File::create(&args.output)?);
    let mut writer = RecordWriter::new(main);
    if options.sample_size > 0 {
        let sample = BufWriter::new(File::create(&args.sample)?);
        writer = writer.with_sample(sample, options.sample_size);
    }

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        create_spinner("Reading dump...")
    };

    let summary = process_dump(&mut reader, &mut writer, &options, |progress| {
        let minutes = progress.elapsed.as_secs_f64() / 60.0;
        let rate = if minutes > 0.0 {
            progress.pages_seen as f64 / minutes
        } else {
            0.0
        };
        pb.set_message(format!(
            "Pages: {} | Accepted: {} | Rejected: {} | {:.0} pages/min",
            progress.pages_seen, progress.accepted, progress.rejected, rate
        ));
    })?;

    pb.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary.corpus)?);
    } else if !quiet {
        print_report(&summary, args, options.sample_size > 0);
    }

    Ok(())
}

fn print_report(summary: &ProcessSummary, args: &ProcessArgs, with_sample: bool) {
    let corpus = &summary.corpus;
    let dump = &summary.dump;

    println!("{}", "Processing Complete".green().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Output".bold(), args.output.display());
    if with_sample {
        println!(
            "{}: {} ({} records)",
            "Sample".bold(),
            args.sample.display(),
            summary.sampled
        );
    }
    if summary.limit_reached {
        println!("{} Stopped at the article limit", "!".yellow().bold());
    }

    println!("\n{}", "Dump".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Pages".bold(), dump.pages_seen);
    println!("{}: {}", "Other namespaces".bold(), dump.skipped_namespace);
    println!("{}: {}", "Redirects".bold(), dump.skipped_redirect);
    println!("{}: {}", "Malformed".bold(), dump.malformed);

    println!("\n{}", "Corpus".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Accepted".bold(), corpus.accepted);
    println!(
        "{}: {} ({:.1}%)",
        "Rejected".bold(),
        corpus.rejected,
        corpus.filter_rate()
    );
    println!("{}: {:.0}", "Average length".bold(), corpus.average_length());
    println!("{}: {:.3}", "Average CJK ratio".bold(), corpus.average_ratio());

    println!("\n{}", "Length".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("  {:<12} {}", "< 500", corpus.length_short);
    println!("  {:<12} {}", "500 - 2000", corpus.length_medium);
    println!("  {:<12} {}", ">= 2000", corpus.length_long);

    println!("\n{}", "CJK Ratio".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("  {:<12} {}", ">= 0.8", corpus.ratio_high);
    println!("  {:<12} {}", "0.5 - 0.8", corpus.ratio_medium);
    println!("  {:<12} {}", "< 0.5", corpus.ratio_low);

    println!(
        "\n{}: {:.1}s ({:.0} pages/min)",
        "Elapsed".bold(),
        summary.elapsed.as_secs_f64(),
        summary.pages_per_minute()
    );
}

fn clean_options(no_truncate: bool) -> CleanOptions {
    if no_truncate {
        CleanOptions::default().without_truncation()
    } else {
        CleanOptions::default()
    }
}

fn print_version() {
    println!("{} {}", "wikiclean".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("MediaWiki dump to plain-prose corpus");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
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
    fn test_default_process_args() {
        let cli = Cli::try_parse_from(["wikiclean", "dump.xml.bz2"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("dump.xml.bz2")));
        assert_eq!(cli.process.output, PathBuf::from("zhwiki_cleaned.jsonl"));
        assert_eq!(cli.process.sample, PathBuf::from("sample_1000.jsonl"));

        let options = cli.process.options();
        assert_eq!(options.sample_size, 1000);
        assert_eq!(options.batch_size, 256);
        assert!(options.parallel);
        assert!(options.clean.truncate_trailing_sections);
    }

    #[test]
    fn test_process_subcommand_flags() {
        let cli = Cli::try_parse_from([
            "wikiclean",
            "-vv",
            "process",
            "dump.xml",
            "--max-articles",
            "10",
            "--sequential",
            "--no-truncate",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);

        let Some(Commands::Process { input, args }) = cli.command else {
            panic!("expected process subcommand");
        };
        assert_eq!(input, PathBuf::from("dump.xml"));
        let options = args.options();
        assert_eq!(options.max_articles, Some(10));
        assert!(!options.parallel);
        assert!(!options.clean.truncate_trailing_sections);
    }
}
