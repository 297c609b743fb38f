//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use nextcloud_core::TracingOutputFormat;

use crate::config::Overrides;

/// nextcloud - talk to a Nextcloud instance from the terminal
#[derive(Debug, Parser)]
#[command(name = "nextcloud")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "NEXTCLOUD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log format on stderr (pretty, compact, json)
    #[arg(long, env = "NEXTCLOUD_LOG_FORMAT", global = true)]
    pub log_format: Option<TracingOutputFormat>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection flags overriding `config.toml`.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Instance URL
    #[arg(long, env = "NEXTCLOUD_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// User name
    #[arg(long, short, env = "NEXTCLOUD_USER", global = true)]
    pub user: Option<String>,

    /// Password or app password (supports pass:: and env:: references)
    #[arg(long, env = "NEXTCLOUD_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Request timeout in seconds, 0 to disable
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl ConnectionArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            username: self.user.clone(),
            password: self.password.clone(),
            insecure: self.insecure,
            timeout: self.timeout,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Talk conversations, participants and chat
    Talk {
        #[command(subcommand)]
        action: TalkAction,
    },

    /// Files over WebDAV
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },

    /// Shares
    Shares {
        #[command(subcommand)]
        action: SharesAction,
    },

    /// User provisioning
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Show server capabilities
    Capabilities,

    /// List the registered API wrappers
    Wrappers,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Conversation type accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoomKind {
    OneToOne,
    Group,
    Public,
}

/// Talk actions.
#[derive(Debug, Subcommand)]
pub enum TalkAction {
    /// List your conversations
    List {
        /// Load the status of one-to-one partners
        #[arg(long)]
        include_status: bool,
    },

    /// Create a conversation
    Create {
        name: String,

        #[arg(long, value_enum, default_value = "group")]
        r#type: RoomKind,

        /// User, group or circle to invite
        #[arg(long)]
        invite: Option<String>,

        /// Source of the invite (groups, circles)
        #[arg(long)]
        source: Option<String>,
    },

    /// Show one conversation
    Get { token: String },

    /// List open conversations
    Open {
        #[arg(long)]
        search: Option<String>,
    },

    /// Rename a conversation
    Rename { token: String, name: String },

    /// Delete a conversation
    Delete { token: String },

    /// List participants
    Participants {
        token: String,

        #[arg(long)]
        include_status: bool,
    },

    /// Add a participant
    Add {
        token: String,
        participant: String,

        #[arg(long)]
        source: Option<String>,
    },

    /// Read chat messages
    Messages {
        token: String,

        #[arg(long, default_value = "5")]
        limit: u32,

        /// Continue after this message id
        #[arg(long)]
        after: Option<i64>,
    },
}

/// Files actions. Paths are relative to your files root.
#[derive(Debug, Subcommand)]
pub enum FilesAction {
    /// List a folder
    Ls {
        #[arg(default_value = "")]
        path: String,

        /// Request every documented property
        #[arg(long)]
        all: bool,
    },

    /// Show properties of a file or folder
    Info { path: String },

    /// Create a folder
    Mkdir { path: String },

    /// Delete a file or folder
    Rm { path: String },

    /// Upload a local file
    Put { local: PathBuf, remote: String },

    /// Copy a file or folder
    Cp {
        source: String,
        destination: String,

        #[arg(long)]
        overwrite: bool,
    },

    /// Move a file or folder
    Mv {
        source: String,
        destination: String,

        #[arg(long)]
        overwrite: bool,
    },

    /// Mark a file or folder as favorite
    Favorite {
        path: String,

        /// Remove the mark instead
        #[arg(long)]
        unset: bool,
    },

    /// List favorites
    Favorites {
        #[arg(default_value = "")]
        path: String,
    },

    /// List versions of a file
    Versions {
        path: String,

        /// Skip the file id lookup
        #[arg(long)]
        file_id: Option<u64>,
    },
}

/// Share kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShareKind {
    User,
    Group,
    Link,
    Federated,
}

/// Shares actions.
#[derive(Debug, Subcommand)]
pub enum SharesAction {
    /// List shares
    List {
        #[arg(long)]
        path: Option<String>,
    },

    /// Show one share
    Get { id: u64 },

    /// Create a share
    Create {
        path: String,

        #[arg(long, value_enum)]
        r#type: ShareKind,

        /// Recipient user or group
        #[arg(long)]
        with: Option<String>,

        /// Permission bits (1 read, 2 update, 4 create, 8 delete, 16 share)
        #[arg(long)]
        permissions: Option<u8>,

        #[arg(long)]
        password: Option<String>,
    },

    /// Delete a share
    Delete { id: u64 },
}

/// Users actions.
#[derive(Debug, Subcommand)]
pub enum UsersAction {
    /// List users
    List {
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,
    },

    /// Show one user
    Get { uid: String },

    /// Change a user attribute
    Edit {
        uid: String,
        field: String,
        value: String,
    },

    /// Enable a user
    Enable { uid: String },

    /// Disable a user
    Disable { uid: String },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
