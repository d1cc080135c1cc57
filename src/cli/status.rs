use super::config::WalletConfig;
use super::store::{load_wallet, CliWallet};
use serde_json::json;
use std::path::Path;

/// Show wallet policy and open operations
///
/// Displays:
/// - Owners in slot order and the quorum
/// - Daily limit, amount spent today and what is left
/// - Every open operation with its remaining confirmations and queued action
///
/// With `json`, prints the same data as one JSON object instead.
pub fn execute(config_path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = WalletConfig::load(config_path)?;
    let wallet = load_wallet(&config.state.path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status_json(&wallet))?);
        return Ok(());
    }

    println!("📊 Covenant Wallet Status");
    println!();
    println!(
        "Owners: {} (quorum {})",
        wallet.owner_count(),
        wallet.required()
    );
    for owner in wallet.owners() {
        println!("  {}", owner);
    }
    println!();
    println!("Daily limit: {}", wallet.daily_limit());
    println!("Spent today: {}", wallet.spent_today());
    println!("Remaining:   {}", wallet.remaining_today());
    println!();

    let pending = wallet.pending_operations();
    if pending.is_empty() {
        println!("No pending operations");
        return Ok(());
    }

    println!("Pending operations: {}", pending.len());
    for operation in pending {
        let remaining = wallet.votes_remaining(&operation).unwrap_or(0);
        println!("  {} ({} more confirmation(s))", operation, remaining);
        match wallet.queued(&operation) {
            Some(action) => println!(
                "    {} -> {} payload {} byte(s)",
                action.amount,
                action.recipient,
                action.payload.len()
            ),
            None => println!("    management call"),
        }
    }

    Ok(())
}

fn status_json(wallet: &CliWallet) -> serde_json::Value {
    let pending: Vec<_> = wallet
        .pending_operations()
        .into_iter()
        .map(|operation| {
            let action = wallet.queued(&operation).map(|action| {
                json!({
                    "recipient": action.recipient.to_string(),
                    "amount": action.amount.to_string(),
                    "payload": hex::encode(&action.payload),
                })
            });
            json!({
                "operation": operation.to_string(),
                "votes_remaining": wallet.votes_remaining(&operation),
                "action": action,
            })
        })
        .collect();

    json!({
        "owners": wallet.owners().iter().map(|o| o.to_string()).collect::<Vec<_>>(),
        "required": wallet.required(),
        "daily_limit": wallet.daily_limit().to_string(),
        "spent_today": wallet.spent_today().to_string(),
        "pending": pending,
    })
}
