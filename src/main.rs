use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use is_terminal::IsTerminal;
use revlog::commands::log::{LogOptions, log};
use revlog::commands::stats::stats;
use revlog::commands::traverse::{TraverseOptions, traverse};
use revlog::{LogFormat, Repository, TraversalOrder};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "revlog",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Walk and inspect git history",
    long_about = "Reads commit history through `git rev-list --pretty=raw`, \
    decoding commits lazily and walking their ancestry depth-first or branch-first.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        global = true,
        value_name = "DIR",
        help = "Run as if started in <DIR>"
    )]
    directory: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Enable verbose output (repeat for more)"
    )]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "log",
        about = "Show commit history",
        long_about = "This command decodes the history reachable from a revision and prints \
        every commit with its author, date, annotations and message."
    )]
    Log {
        #[arg(index = 1, default_value = "HEAD", help = "The revision to start from")]
        revision: String,
        #[arg(long, help = "Request plain raw records, without parents or annotations")]
        raw: bool,
        #[arg(short = 'n', long = "max-count", help = "Limit the number of commits")]
        max_count: Option<usize>,
        #[arg(long, default_value_t = 0, help = "Skip this many commits first")]
        skip: usize,
        #[arg(long, help = "Follow only the first parent of merges")]
        first_parent: bool,
        #[arg(long, help = "List every commit with its bisection distance")]
        bisect_all: bool,
        #[arg(index = 2, last = true, help = "Only commits touching these paths")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "traverse",
        about = "List the ancestors of a revision",
        long_about = "This command walks the parents of a revision, printing one commit id per line."
    )]
    Traverse {
        #[arg(index = 1, default_value = "HEAD", help = "The revision to start from")]
        revision: String,
        #[arg(long, help = "Visit ancestors by distance instead of depth-first")]
        branch_first: bool,
        #[arg(long, help = "Maximum distance from the start")]
        depth: Option<usize>,
        #[arg(long, help = "Print the start commit as well")]
        include_self: bool,
        #[arg(long, help = "Print `<predecessor> -> <commit>` pairs")]
        edges: bool,
    },
    #[command(
        name = "stats",
        about = "Show per-file change counts of a commit",
        long_about = "This command prints the lines added and removed in every file a commit \
        touches, compared to its first parent."
    )]
    Stats {
        #[arg(index = 1, default_value = "HEAD", help = "The commit to inspect")]
        revision: String,
    },
}

fn configure_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::filter::LevelFilter;

    let filter = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_tracing(cli.verbose)?;
    colored::control::set_override(std::io::stdout().is_terminal());

    let work_dir = match &cli.directory {
        Some(directory) => directory.clone(),
        None => std::env::current_dir()?,
    };
    let repository = Repository::open(&work_dir)
        .with_context(|| format!("cannot open repository at {}", work_dir.display()))?;

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();

    match cli.command {
        Commands::Log {
            revision,
            raw,
            max_count,
            skip,
            first_parent,
            bisect_all,
            paths,
        } => {
            let opts = LogOptions {
                revision,
                format: if raw { LogFormat::Raw } else { LogFormat::Default },
                max_count,
                skip,
                first_parent,
                bisect_all,
                paths,
            };
            log(&repository, &opts, &mut writer)?
        }
        Commands::Traverse {
            revision,
            branch_first,
            depth,
            include_self,
            edges,
        } => {
            let opts = TraverseOptions {
                revision,
                order: if branch_first {
                    TraversalOrder::BranchFirst
                } else {
                    TraversalOrder::DepthFirst
                },
                depth,
                include_self,
                edges,
            };
            traverse(&repository, &opts, &mut writer)?
        }
        Commands::Stats { revision } => stats(&repository, &revision, &mut writer)?,
    }

    writer.flush()?;
    Ok(())
}
