use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// "0.3.2" for releases, "0.3.2@abc1234 2025-01-15" for dev builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("RMJOURNAL_GIT_HASH");
    const COMMIT_DATE: &str = env!("RMJOURNAL_COMMIT_DATE");
    const RELEASE: &str = env!("RMJOURNAL_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "rmjournal", bin_name = "rmjournal", version = get_version())]
#[command(
    about = "Adds recurring daily items to a reMarkable bullet journal",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to ./config.yml, then the user config dir)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Back up the journal, add the recurring items and publish it (default)
    Update {
        /// Write the updated .rmdoc here instead of publishing it
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the items configured for a date
    Items {
        /// YYYY-MM-DD, today, tomorrow or yesterday
        #[arg(default_value = "today")]
        date: String,

        /// Number of consecutive days to show
        #[arg(short = 'n', long, default_value_t = 1)]
        days: u32,
    },

    /// Show which pages hold the dated entries
    Pages,
}

impl Cli {
    /// The requested command, `update` when none was given.
    pub fn command_or_default(&self) -> Commands {
        match &self.command {
            Some(Commands::Update { output }) => Commands::Update {
                output: output.clone(),
            },
            Some(Commands::Items { date, days }) => Commands::Items {
                date: date.clone(),
                days: *days,
            },
            Some(Commands::Pages) => Commands::Pages,
            None => Commands::Update { output: None },
        }
    }
}
