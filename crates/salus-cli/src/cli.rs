use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use salus_core::config::CompanyField;

#[derive(Parser)]
#[command(name = "salus")]
#[command(about = "Search and manage the medicine inventory from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name for API and auth configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search items by name
    Search {
        /// Search query
        query: Vec<String>,
        /// Number of items to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Type-ahead suggestions driven by lines on stdin
    ///
    /// Each line replaces the search text. `/submit`, `/select N`, `/esc`,
    /// `/outside` and `/quit` act like the matching UI gestures.
    Suggest,
    /// Add a medicine to the inventory
    #[command(alias = "new")]
    Add {
        /// Medicine name
        name: Vec<String>,
        /// Manufacturer (new names are created)
        #[arg(long, value_name = "NAME")]
        company: String,
        /// Storage location (new names are created)
        #[arg(long, value_name = "NAME")]
        location: String,
    },
    /// List known manufacturers
    Companies {
        /// Only show names containing this text
        filter: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known storage locations
    Locations {
        /// Only show names containing this text
        filter: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new account
    Register {
        #[arg(long, value_name = "NAME")]
        username: String,
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Defaults to --password
        #[arg(long, value_name = "PASSWORD")]
        repeat_password: Option<String>,
        /// Do not wait before printing the login redirect
        #[arg(long)]
        no_wait: bool,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the API token stored for a profile
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Inventory API base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Maximum suggestions per lookup
        #[arg(long, value_name = "N")]
        suggestion_limit: Option<usize>,
        /// Quiet period before a lookup, in milliseconds
        #[arg(long, value_name = "MS")]
        debounce_ms: Option<u64>,
        /// Suggestions need more trimmed characters than this
        #[arg(long, value_name = "N")]
        visibility_threshold: Option<usize>,
        /// Payload field holding the manufacturer (company, company_name, either)
        #[arg(long, value_name = "FIELD")]
        company_field: Option<CompanyField>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the effective configuration
    Show {
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store a bearer token in the keychain
    SetToken {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Bearer token sent with inventory requests
        #[arg(long, value_name = "TOKEN")]
        token: String,
    },
    /// Show where the profile's token comes from
    Status {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
    /// Remove the stored token
    Logout {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}
