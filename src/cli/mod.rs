use clap::{Parser, Subcommand};
use covenant::wallet::ManagementCall;
use covenant::AccountId;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub mod act;
pub mod config;
pub mod executor;
pub mod init;
pub mod status;
pub mod store;
pub mod version;

use act::Request;
use config::{default_config_path, LoggingConfig, WalletConfig};

#[derive(Parser)]
#[command(name = "covenant")]
#[command(author = "Covenant Project")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for Covenant shared-custody wallets", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.local/share/covenant/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the wallet state file from the configuration
    Init {
        /// Replace an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Show owners, limits and pending operations
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Request a transfer, call or account creation
    Execute {
        /// Calling owner (label or hex id)
        #[arg(long = "as")]
        as_owner: String,

        /// Recipient (label or hex id), or `create` for a new account
        #[arg(long)]
        to: String,

        /// Value to move
        #[arg(long)]
        amount: u128,

        /// Call data or creation code, hex encoded
        #[arg(long)]
        payload: Option<String>,

        /// Distinguishes otherwise identical requests
        #[arg(long, default_value_t = 0)]
        nonce: u64,
    },

    /// Confirm a pending action
    Confirm {
        #[arg(long = "as")]
        as_owner: String,

        /// Operation id (hex)
        #[arg(long)]
        operation: String,
    },

    /// Withdraw a confirmation
    Revoke {
        #[arg(long = "as")]
        as_owner: String,

        /// Operation id (hex)
        #[arg(long)]
        operation: String,
    },

    /// Record incoming value
    Deposit {
        /// Sender (label or hex id)
        #[arg(long)]
        from: String,

        #[arg(long)]
        amount: u128,
    },

    /// Vote to add an owner
    AddOwner {
        #[arg(long = "as")]
        as_owner: String,

        #[arg(long)]
        owner: String,
    },

    /// Vote to remove an owner
    RemoveOwner {
        #[arg(long = "as")]
        as_owner: String,

        #[arg(long)]
        owner: String,
    },

    /// Vote to replace one owner with another
    ChangeOwner {
        #[arg(long = "as")]
        as_owner: String,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },

    /// Vote to change the number of confirmations required
    ChangeRequirement {
        #[arg(long = "as")]
        as_owner: String,

        #[arg(long)]
        required: usize,
    },

    /// Vote to change the daily allowance
    SetDailyLimit {
        #[arg(long = "as")]
        as_owner: String,

        #[arg(long)]
        limit: u128,
    },

    /// Vote to reset the amount spent today
    ResetSpentToday {
        #[arg(long = "as")]
        as_owner: String,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    // Logging follows the config when it can be read.
    let logging = WalletConfig::load(&config_path)
        .map(|c| c.logging)
        .unwrap_or_default();
    init_tracing(&logging);

    let request = match cli.command {
        Commands::Init { force } => return init::execute(&config_path, force),
        Commands::Status { json } => return status::execute(&config_path, json),
        Commands::Version => {
            version::execute();
            return Ok(());
        }
        Commands::Execute {
            as_owner,
            to,
            amount,
            payload,
            nonce,
        } => Request::Execute {
            caller: as_owner,
            to,
            amount,
            payload,
            nonce,
        },
        Commands::Confirm {
            as_owner,
            operation,
        } => Request::Confirm {
            caller: as_owner,
            operation,
        },
        Commands::Revoke {
            as_owner,
            operation,
        } => Request::Revoke {
            caller: as_owner,
            operation,
        },
        Commands::Deposit { from, amount } => Request::Deposit { from, amount },
        Commands::AddOwner { as_owner, owner } => manage(
            as_owner,
            ManagementCall::AddOwner {
                owner: AccountId::parse_or_label(&owner),
            },
        ),
        Commands::RemoveOwner { as_owner, owner } => manage(
            as_owner,
            ManagementCall::RemoveOwner {
                owner: AccountId::parse_or_label(&owner),
            },
        ),
        Commands::ChangeOwner { as_owner, from, to } => manage(
            as_owner,
            ManagementCall::ChangeOwner {
                from: AccountId::parse_or_label(&from),
                to: AccountId::parse_or_label(&to),
            },
        ),
        Commands::ChangeRequirement { as_owner, required } => {
            manage(as_owner, ManagementCall::ChangeRequirement { required })
        }
        Commands::SetDailyLimit { as_owner, limit } => {
            manage(as_owner, ManagementCall::SetDailyLimit { limit })
        }
        Commands::ResetSpentToday { as_owner } => {
            manage(as_owner, ManagementCall::ResetSpentToday)
        }
    };

    act::execute(&config_path, request).await
}

fn manage(caller: String, call: ManagementCall) -> Request {
    Request::Manage { caller, call }
}

/// Install the global subscriber, falling back to `info` on a bad filter
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
