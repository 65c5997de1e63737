use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Output format for CLI commands
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

#[derive(Parser)]
#[command(name = "nixt")]
#[command(version, about = "Nixt - dashboard access and account management")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (defaults to ~/.nixt/nixt.db)
    #[arg(long, global = true, env = "NIXT_DB_PATH")]
    pub db_path: Option<String>,

    /// API base URL including the version prefix
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Dashboard role grants
    Grant {
        #[command(subcommand)]
        command: GrantCommands,
    },

    /// Dashboard session
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommands,
    },

    /// Shared controller data
    Shared {
        #[command(subcommand)]
        command: SharedCommands,
    },

    /// Account sign-in and identity
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// User management
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Subscription management
    Subscriptions {
        #[command(subcommand)]
        command: SubscriptionCommands,
    },

    /// Project management
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Project admin management
    Admins {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Language and theme
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Client,
    Manager,
    Viewer,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderArg {
    All,
    Local,
    Google,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LanguageArg {
    Ar,
    En,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    Active,
    Pending,
    Completed,
    Onhold,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Subcommand)]
pub enum GrantCommands {
    /// Grant dashboard access (replaces an existing grant with the same role)
    Add {
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        #[arg(short, long, value_enum)]
        role: RoleArg,

        /// Dashboard section the grant may see (repeatable)
        #[arg(short, long = "section")]
        sections: Vec<String>,

        /// Administrator recorded as the grantor
        #[arg(long, default_value = "")]
        added_by: String,

        /// Create the grant disabled
        #[arg(long)]
        inactive: bool,
    },

    /// Revoke grants for an email; ends that email's dashboard session
    Remove {
        email: String,

        /// Only revoke this role
        #[arg(short, long, value_enum)]
        role: Option<RoleArg>,
    },

    /// Update every grant stored under an email (exact match)
    Update(GrantUpdateArgs),

    /// List all grants
    List,

    /// Show the active roles of an email
    Roles { email: String },
}

#[derive(Args)]
pub struct GrantUpdateArgs {
    pub email: String,

    #[arg(long)]
    pub new_email: Option<String>,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long, value_enum)]
    pub role: Option<RoleArg>,

    /// Replace the visible sections (repeatable)
    #[arg(short, long = "section")]
    pub sections: Option<Vec<String>>,

    #[arg(long)]
    pub added_by: Option<String>,

    /// Enable or disable the grants
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Subcommand)]
pub enum DashboardCommands {
    /// Open a dashboard session for an email
    Login {
        email: String,

        /// Pick a role when the email holds several
        #[arg(short, long, value_enum)]
        role: Option<RoleArg>,
    },

    /// End the dashboard session
    Logout,

    /// Show the dashboard session
    Status,
}

#[derive(Subcommand)]
pub enum SharedCommands {
    /// Show the shared controller snapshot
    Show,

    /// Replace lists in the snapshot from JSON array files
    Update {
        #[arg(long)]
        clients: Option<PathBuf>,
        #[arg(long)]
        projects: Option<PathBuf>,
        #[arg(long)]
        transactions: Option<PathBuf>,
        #[arg(long)]
        activities: Option<PathBuf>,
        #[arg(long)]
        users: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password
    Login {
        email: String,

        /// Password (prompted when omitted)
        #[arg(long, env = "NIXT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        email: String,

        /// Password (prompted when omitted)
        #[arg(long, env = "NIXT_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        display_name: Option<String>,
    },

    /// Sign in with a Google ID token
    Google { credential: String },

    /// Sign out and forget stored tokens
    Logout,

    /// Show the signed-in identity
    Whoami,

    /// Re-fetch the identity, refreshing the token if it expired
    Refresh,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List accounts
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, value_enum, default_value = "all")]
        provider: ProviderArg,
    },

    /// Show one account
    Show { id: String },
}

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// List a user's subscriptions
    List { user_id: String },

    /// Cancel a subscription immediately
    Cancel { id: String },

    /// Cancel your own subscription
    CancelMine,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects
    List {
        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,

        #[arg(long)]
        order: Option<String>,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,

        /// Only projects owned by this user
        #[arg(long)]
        user: Option<String>,

        /// Only projects where this admin is on the team
        #[arg(long, conflicts_with = "user")]
        team_member: Option<String>,
    },

    /// Show one project
    Show { id: String },

    /// Project counts by status
    Stats,

    /// Delete a project
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// List project admins with their accounts
    List,

    /// Make a user a project admin
    Add {
        user_id: String,

        /// Permission key (repeatable)
        #[arg(short, long = "permission")]
        permissions: Vec<String>,
    },

    /// Replace an admin's permissions
    Permissions {
        admin_id: String,

        /// Permission keys; none clears all
        permissions: Vec<String>,
    },

    /// Remove a project admin
    Remove { admin_id: String },
}

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show or set the interface language
    Language {
        #[arg(value_enum)]
        language: Option<LanguageArg>,
    },

    /// Show or set the color theme
    Theme {
        /// Theme index
        index: Option<usize>,

        /// Advance to the next theme
        #[arg(long, conflicts_with = "index")]
        next: bool,
    },
}
