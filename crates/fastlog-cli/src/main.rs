mod clock;
mod cmd_backup;
mod cmd_config;
mod cmd_edit;
mod cmd_history;
mod cmd_init;
mod cmd_log;
mod cmd_status;
#[cfg(feature = "tui")]
mod cmd_watch;
mod ctx;
mod prompt;
#[cfg(feature = "tui")]
mod tui;

use clap::{Parser, Subcommand};
use fastlog_core::Phase;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fastlog", version, about = "Intermittent-fasting log")]
struct Cli {
    /// Store directory (defaults to $FASTLOG_HOME or the user data dir)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Fasting window in hours (overrides config)
    #[arg(long, global = true)]
    fast_hours: Option<u32>,
    /// Eating window in hours (overrides config)
    #[arg(long, global = true)]
    eat_hours: Option<u32>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the store and an empty log
    Init,
    /// Log a transition (start fasting / start eating)
    Log {
        /// When it happened (defaults to now)
        #[arg(long)]
        at: Option<String>,
        /// Phase to start (defaults to the opposite of the current one)
        #[arg(long)]
        phase: Option<Phase>,
        /// Don't ask before breaking a fast early
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the current phase and time to the next transition
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recent transitions with interval durations and scores
    History {
        /// Number of entries, newest first
        #[arg(long, default_value_t = fastlog_core::ENTRIES_TO_SHOW)]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move an event to a new time
    Edit {
        /// Current time of the event
        old: String,
        /// New time
        new: String,
    },
    /// Delete the event(s) at a time
    Delete {
        /// Time of the event
        at: String,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Write a versioned JSON backup
    Backup {
        /// Output file (defaults to stdout; "auto" writes into the store's backups dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the log from a backup file ("-" reads stdin)
    Restore {
        file: PathBuf,
        /// Merge into the existing log instead of replacing it
        #[arg(long)]
        merge: bool,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the log as tab-separated text
    Export,
    /// Read or change persisted configuration
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
    /// Live progress screen
    #[cfg(feature = "tui")]
    Watch,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("FASTLOG_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let ctx = ctx::Ctx::load(cli.store, cli.fast_hours, cli.eat_hours)?;

    match cli.cmd {
        Command::Init => cmd_init::execute(&ctx),
        Command::Log { at, phase, yes } => cmd_log::execute(&ctx, at.as_deref(), phase, yes),
        Command::Status { json } => cmd_status::execute(&ctx, json),
        Command::History { limit, json } => cmd_history::execute(&ctx, limit, json),
        Command::Edit { old, new } => cmd_edit::reschedule(&ctx, &old, &new),
        Command::Delete { at, yes } => cmd_edit::delete(&ctx, &at, yes),
        Command::Backup { out } => cmd_backup::backup(&ctx, out.as_deref()),
        Command::Restore { file, merge, yes } => cmd_backup::restore(&ctx, &file, merge, yes),
        Command::Export => cmd_backup::export(&ctx),
        Command::Config { cmd } => cmd_config::run(cmd, &ctx),
        #[cfg(feature = "tui")]
        Command::Watch => cmd_watch::execute(&ctx),
    }
}
