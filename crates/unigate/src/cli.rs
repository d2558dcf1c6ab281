//! Clap derive structures for the `unigate` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};

use unigate_api::types::{AccessStatus, AppUserRole, CampusZoneType, ReportFormat};
use unigate_config::TokenStoreKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// unigate -- campus access control from the command line
#[derive(Debug, Parser)]
#[command(
    name = "unigate",
    version,
    about = "UniGate campus access control from the command line",
    long_about = "Sign in to a UniGate deployment, inspect your access history and\n\
        permissions, and administer rules, users and campus structure.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Deployment profile to use
    #[arg(long, short = 'p', env = "UNIGATE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, short = 'u', env = "UNIGATE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Where the session token is kept (overrides profile)
    #[arg(long, env = "UNIGATE_TOKEN_STORE", global = true, value_parser = parse_token_store)]
    pub token_store: Option<TokenStoreKind>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UNIGATE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "UNIGATE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "UNIGATE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

fn parse_token_store(raw: &str) -> Result<TokenStoreKind, String> {
    raw.parse()
        .map_err(|_| format!("expected keyring, file or memory, got '{raw}'"))
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login(LoginArgs),

    /// End the session and forget the stored token
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Change or reset your password
    Password(PasswordArgs),

    /// Personal summary: recent visits and rule count
    Home,

    /// Your access history, page by page
    #[command(alias = "hist")]
    History(HistoryArgs),

    /// Access rules
    Rules(RulesArgs),

    /// Every access attempt on campus (admin)
    Logs(LogsArgs),

    /// Admin overview: users, access points, denials
    #[command(alias = "dash")]
    Dashboard,

    /// Access statistics over a date range (admin)
    Analytics(AnalyticsArgs),

    /// Print the campus tree (buildings, floors, rooms, access points)
    Campus,

    /// Manage buildings
    Buildings(BuildingsArgs),

    /// Manage floors
    Floors(FloorsArgs),

    /// Manage rooms
    Rooms(RoomsArgs),

    /// Manage access points
    #[command(alias = "ap")]
    AccessPoints(AccessPointsArgs),

    /// Manage user accounts (admin)
    Users(UsersArgs),

    /// Download an access-log report (admin)
    Report(ReportArgs),

    /// Save your QR access badge as an image
    #[command(alias = "qr")]
    Qrcode(QrcodeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from this environment variable instead of prompting
    #[arg(long, value_name = "VAR")]
    pub password_env: Option<String>,
}

#[derive(Debug, Args)]
pub struct PasswordArgs {
    #[command(subcommand)]
    pub command: PasswordCommand,
}

#[derive(Debug, Subcommand)]
pub enum PasswordCommand {
    /// Change the signed-in account's password
    Change,

    /// Email a one-time reset code
    RequestReset {
        #[arg(long, short = 'e')]
        email: String,
    },

    /// Set a new password with an emailed code, then sign in
    Reset {
        #[arg(long, short = 'e')]
        email: String,

        /// One-time code from the reset email
        #[arg(long)]
        otp: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HISTORY & LOGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Entries per page
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: u32,

    /// Number of pages to load
    #[arg(long, default_value = "1", conflicts_with = "all")]
    pub pages: u32,

    /// Keep loading until the history is exhausted
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Only show attempts with this outcome
    #[arg(long, short = 's')]
    pub status: Option<AccessStatus>,

    /// Show only the newest N entries
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    /// First day (YYYY-MM-DD), defaults to 30 days ago
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RULES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

/// Filter flags shared by `rules list`.
#[derive(Debug, Args)]
pub struct RuleFilterArgs {
    #[arg(long)]
    pub role: Option<AppUserRole>,

    #[arg(long)]
    pub zone: Option<CampusZoneType>,

    /// Active on or after (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Active on or before (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Window opens at (HH:MM:SS)
    #[arg(long)]
    pub start_time: Option<NaiveTime>,

    /// Window closes at (HH:MM:SS)
    #[arg(long)]
    pub end_time: Option<NaiveTime>,
}

/// Fields of a rule for create/update.
#[derive(Debug, Args)]
pub struct RuleFields {
    #[arg(long)]
    pub role: AppUserRole,

    #[arg(long)]
    pub zone: CampusZoneType,

    /// Deny instead of grant
    #[arg(long)]
    pub deny: bool,

    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    #[arg(long)]
    pub start_time: Option<NaiveTime>,

    #[arg(long)]
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// Rules that apply to you
    My,

    /// All rules, optionally filtered (admin)
    #[command(alias = "ls")]
    List(RuleFilterArgs),

    /// Create a rule (admin)
    Create(RuleFields),

    /// Replace a rule (admin)
    Update {
        id: i64,

        #[command(flatten)]
        fields: RuleFields,
    },

    /// Delete a rule (admin)
    #[command(alias = "rm")]
    Delete { id: i64 },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CAMPUS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BuildingsArgs {
    #[command(subcommand)]
    pub command: BuildingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BuildingsCommand {
    #[command(alias = "ls")]
    List,
    Get { id: i64 },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    #[command(alias = "rm")]
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct FloorsArgs {
    #[command(subcommand)]
    pub command: FloorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FloorsCommand {
    #[command(alias = "ls")]
    List,
    Get { id: i64 },
    Create {
        #[arg(long)]
        building: i64,
        #[arg(long)]
        number: i32,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        building: i64,
        #[arg(long)]
        number: i32,
        #[arg(long)]
        description: Option<String>,
    },
    #[command(alias = "rm")]
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    #[command(alias = "ls")]
    List,
    Get { id: i64 },
    Create {
        #[arg(long)]
        floor: i64,
        #[arg(long)]
        name: String,
        /// Zone type the room belongs to
        #[arg(long = "type")]
        room_type: CampusZoneType,
        #[arg(long)]
        capacity: Option<u32>,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        floor: i64,
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        room_type: CampusZoneType,
        #[arg(long)]
        capacity: Option<u32>,
        #[arg(long)]
        description: Option<String>,
    },
    #[command(alias = "rm")]
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct AccessPointsArgs {
    #[command(subcommand)]
    pub command: AccessPointsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccessPointsCommand {
    #[command(alias = "ls")]
    List,
    Get { id: i64 },
    Create {
        #[arg(long)]
        room: i64,
        #[arg(long)]
        identifier: String,
        /// Reader technology, e.g. QR or RFID
        #[arg(long = "type", default_value = "QR")]
        kind: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        room: i64,
        #[arg(long)]
        identifier: String,
        #[arg(long = "type", default_value = "QR")]
        kind: String,
    },
    #[command(alias = "rm")]
    Delete { id: i64 },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    #[command(alias = "ls")]
    List,

    /// Create an account; the server emails the initial password
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "Student")]
        role: AppUserRole,
    },

    Update {
        id: i64,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },

    #[command(alias = "rm")]
    Delete { id: i64 },

    /// Change an account's role
    AssignRole {
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: AppUserRole,
    },

    /// Upload a new avatar for the signed-in account
    Avatar {
        /// PNG, JPEG, GIF or WebP image
        file: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FILES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Document format
    #[arg(long, short = 'f', default_value = "pdf")]
    pub format: ReportFormat,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[arg(long)]
    pub status: Option<AccessStatus>,

    #[arg(long)]
    pub user: Option<i64>,

    #[arg(long)]
    pub access_point: Option<i64>,

    /// Output file (defaults to report.<ext> in the current directory)
    #[arg(long = "out", short = 'O')]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct QrcodeArgs {
    /// Output file
    #[arg(long = "out", short = 'O', default_value = "qrcode.png")]
    pub out: PathBuf,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
