//! Wallet entry points driven from the command line.
//!
//! Each invocation loads the state file, runs one entry point as the named
//! caller, prints the outcome and the notices it produced, then saves.

use super::config::WalletConfig;
use super::store::{load_wallet, save_wallet};
use covenant::wallet::{ManagementCall, Notice, Outcome};
use covenant::{AccountId, Action, OperationId};
use std::path::Path;

/// One wallet request, with owners given as labels or hex ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Execute {
        caller: String,
        to: String,
        amount: u128,
        payload: Option<String>,
        nonce: u64,
    },
    Confirm {
        caller: String,
        operation: String,
    },
    Revoke {
        caller: String,
        operation: String,
    },
    Deposit {
        from: String,
        amount: u128,
    },
    Manage {
        caller: String,
        call: ManagementCall,
    },
}

/// Recipient argument meaning "create a new account"
pub const CREATE_RECIPIENT: &str = "create";

pub async fn execute(config_path: &Path, request: Request) -> Result<(), Box<dyn std::error::Error>> {
    let config = WalletConfig::load(config_path)?;
    let state_path = &config.state.path;
    let mut wallet = load_wallet(state_path)?;

    let outcome = match request {
        Request::Execute {
            caller,
            to,
            amount,
            payload,
            nonce,
        } => {
            let action = parse_action(&to, amount, payload.as_deref())?;
            wallet
                .execute(&AccountId::parse_or_label(&caller), action, nonce)
                .await?
        }
        Request::Confirm { caller, operation } => {
            let operation: OperationId = operation.parse()?;
            wallet
                .confirm(&AccountId::parse_or_label(&caller), &operation)
                .await?
        }
        Request::Revoke { caller, operation } => {
            let operation: OperationId = operation.parse()?;
            wallet.revoke(&AccountId::parse_or_label(&caller), &operation)
        }
        Request::Deposit { from, amount } => {
            wallet.deposit(&AccountId::parse_or_label(&from), amount)
        }
        Request::Manage { caller, call } => {
            wallet.manage(&AccountId::parse_or_label(&caller), call)?
        }
    };

    print_outcome(&outcome);
    for notice in wallet.take_notices() {
        println!("   {}", describe_notice(&notice));
    }

    save_wallet(state_path, &wallet)?;
    Ok(())
}

/// Build an action from CLI arguments
pub fn parse_action(
    to: &str,
    amount: u128,
    payload: Option<&str>,
) -> Result<Action, Box<dyn std::error::Error>> {
    let payload = match payload {
        Some(hex_str) => hex::decode(hex_str.trim_start_matches("0x"))
            .map_err(|e| format!("Invalid payload hex: {}", e))?,
        None => Vec::new(),
    };

    if to == CREATE_RECIPIENT {
        return Ok(Action::create(amount, payload));
    }
    Ok(Action::call(AccountId::parse_or_label(to), amount, payload))
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Executed(execution) => {
            println!("✅ Executed");
            if !execution.operation.is_zero() {
                println!("   Operation: {}", execution.operation);
            }
            if let Some(created) = execution.created {
                println!("   Created account: {}", created);
            }
        }
        Outcome::Applied => println!("✅ Applied"),
        Outcome::Pending(operation) => {
            println!("⏳ Pending");
            println!("   Operation: {}", operation);
        }
        Outcome::Ignored(reason) => println!("⚠️  Ignored: {}", reason.describe()),
    }
}

fn describe_notice(notice: &Notice) -> String {
    match notice {
        Notice::Confirmation { owner, operation } => {
            format!("confirmation by {} on {}", owner.short(), operation)
        }
        Notice::Revoke { owner, operation } => {
            format!("revoke by {} on {}", owner.short(), operation)
        }
        Notice::OwnerChanged {
            old_owner,
            new_owner,
        } => format!("owner {} replaced by {}", old_owner.short(), new_owner.short()),
        Notice::OwnerAdded { new_owner } => format!("owner {} added", new_owner.short()),
        Notice::OwnerRemoved { old_owner } => format!("owner {} removed", old_owner.short()),
        Notice::RequirementChanged { required } => format!("quorum set to {}", required),
        Notice::DailyLimitChanged { limit } => format!("daily limit set to {}", limit),
        Notice::SpentTodayReset => "spent today reset".to_string(),
        Notice::Deposit { from, amount } => format!("deposit of {} from {}", amount, from.short()),
        Notice::ConfirmationNeeded {
            operation,
            initiator,
            amount,
            recipient,
            ..
        } => format!(
            "{} needs confirmations ({} -> {}, initiated by {})",
            operation,
            amount,
            recipient,
            initiator.short()
        ),
        Notice::SingleTransact {
            owner,
            amount,
            recipient,
            ..
        } => format!("{} -> {} on {}'s authority", amount, recipient, owner.short()),
        Notice::MultiTransact {
            owner,
            operation,
            amount,
            recipient,
            ..
        } => format!(
            "{} -> {} executed as {} (final vote by {})",
            amount,
            recipient,
            operation,
            owner.short()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant::wallet::Recipient;
    use tempfile::TempDir;

    fn init_wallet(temp_dir: &TempDir) -> std::path::PathBuf {
        let config_path = temp_dir.path().join("config.toml");
        WalletConfig::create_default(&config_path, &temp_dir.path().join("wallet.cbor")).unwrap();
        super::super::init::execute(&config_path, false).unwrap();
        config_path
    }

    #[test]
    fn test_parse_action_transfer() {
        let action = parse_action("bob", 5, None).unwrap();
        assert!(action.is_plain());
        assert_eq!(action.recipient, Recipient::Account(AccountId::from_label("bob")));
    }

    #[test]
    fn test_parse_action_create_with_payload() {
        let action = parse_action("create", 0, Some("0xdeadbeef")).unwrap();
        assert_eq!(action.recipient, Recipient::Create);
        assert_eq!(action.payload, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_parse_action_rejects_bad_hex() {
        assert!(parse_action("bob", 1, Some("zz")).is_err());
    }

    #[tokio::test]
    async fn test_execute_under_limit_spends() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = init_wallet(&temp_dir);

        let request = Request::Execute {
            caller: "alice".to_string(),
            to: "dave".to_string(),
            amount: 40,
            payload: None,
            nonce: 0,
        };
        execute(&config_path, request).await.unwrap();

        let wallet = load_wallet(&temp_dir.path().join("wallet.cbor")).unwrap();
        assert_eq!(wallet.spent_today(), 40);
        assert!(wallet.pending_operations().is_empty());
    }

    #[tokio::test]
    async fn test_deferred_action_persists_between_runs() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = init_wallet(&temp_dir);
        let state_path = temp_dir.path().join("wallet.cbor");

        let request = Request::Execute {
            caller: "alice".to_string(),
            to: "dave".to_string(),
            amount: 500,
            payload: None,
            nonce: 0,
        };
        execute(&config_path, request).await.unwrap();

        let wallet = load_wallet(&state_path).unwrap();
        let pending = wallet.pending_operations();
        assert_eq!(pending.len(), 1);

        let confirm = Request::Confirm {
            caller: "bob".to_string(),
            operation: pending[0].to_string(),
        };
        execute(&config_path, confirm).await.unwrap();

        let wallet = load_wallet(&state_path).unwrap();
        assert!(wallet.pending_operations().is_empty());
        assert!(wallet.queued(&pending[0]).is_none());
    }

    #[tokio::test]
    async fn test_management_vote_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = init_wallet(&temp_dir);
        let state_path = temp_dir.path().join("wallet.cbor");

        for caller in ["alice", "bob"] {
            let request = Request::Manage {
                caller: caller.to_string(),
                call: ManagementCall::ChangeRequirement { required: 3 },
            };
            execute(&config_path, request).await.unwrap();
        }

        let wallet = load_wallet(&state_path).unwrap();
        assert_eq!(wallet.required(), 3);
    }

    #[tokio::test]
    async fn test_bad_operation_id_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = init_wallet(&temp_dir);

        let request = Request::Confirm {
            caller: "bob".to_string(),
            operation: "not-hex".to_string(),
        };
        assert!(execute(&config_path, request).await.is_err());
    }
}
