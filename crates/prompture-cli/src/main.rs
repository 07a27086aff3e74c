mod cmd;
mod output;
mod prompt;
mod root;

use clap::{Parser, Subcommand};
use cmd::{context::ContextArgs, summary::SummaryArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prompture",
    about = "Scaffold and maintain ai-docs: requirements, technical docs, active context and session summaries",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from ai-docs/ or .git/)
    #[arg(long, global = true, env = "PROMPTURE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create ai-docs/ and populate it from the built-in templates
    Init {
        /// Replace an existing ai-docs/ tree without asking
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Update the active context file
    Context(ContextArgs),

    /// Add a document template, or list the available types
    Docs {
        /// Document type (see --list)
        #[arg(long = "type", short = 't', value_name = "TYPE", conflicts_with = "list")]
        doc_type: Option<String>,

        /// List available document types
        #[arg(long, short = 'l')]
        list: bool,
    },

    /// Create, list and archive session summaries
    Summary(SummaryArgs),

    /// Archive stale context and summaries, remove temp files, organize docs
    Clean {
        /// Archive context and summary weeks older than this many days
        /// (default: retention_days from ai-docs/config.yaml)
        #[arg(long, value_name = "DAYS", value_parser = cmd::clean::parse_days)]
        archive_older_than: Option<u32>,

        /// Remove temporary files from ai-docs/
        #[arg(long)]
        clean_temp: bool,

        /// Move loose documents into their category directories
        #[arg(long)]
        organize: bool,

        /// Skip every confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Add ai-docs/ to the project .gitignore
    Gitignore,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { force } => cmd::init::run(&root, force, cli.json),
        Commands::Context(args) => cmd::context::run(&root, args, cli.json),
        Commands::Docs { doc_type, list } => {
            cmd::docs::run(&root, doc_type.as_deref(), list, cli.json)
        }
        Commands::Summary(args) => cmd::summary::run(&root, args, cli.json),
        Commands::Clean {
            archive_older_than,
            clean_temp,
            organize,
            force,
        } => cmd::clean::run(
            &root,
            cmd::clean::CleanFlags {
                archive_older_than,
                clean_temp,
                organize,
                force,
            },
            cli.json,
        ),
        Commands::Gitignore => cmd::gitignore::run(&root, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
