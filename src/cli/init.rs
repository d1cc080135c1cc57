use super::config::{default_state_path, WalletConfig};
use super::executor::SimulatedExecutor;
use super::store::save_wallet;
use covenant::wallet::SystemDayClock;
use covenant::Wallet;
use std::path::Path;

/// Create a wallet state file from the configuration
///
/// If the config file doesn't exist, a default one is generated first.
/// Refuses to overwrite an existing state file unless `force` is set.
pub fn execute(config_path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !config_path.exists() {
        println!("📝 No config file found. Creating default configuration...");
        WalletConfig::create_default(config_path, &default_state_path())?;
        println!("   Created: {}", config_path.display());
    }

    let config = WalletConfig::load(config_path)?;
    config.validate()?;

    let state_path = &config.state.path;
    if state_path.exists() && !force {
        return Err(format!(
            "Wallet state already exists at '{}'. Use --force to replace it.",
            state_path.display()
        )
        .into());
    }

    let owners = config.owner_ids();
    let wallet = Wallet::new(
        &owners,
        config.wallet.required,
        u128::from(config.wallet.daily_limit),
        SimulatedExecutor,
        SystemDayClock,
    )?;
    save_wallet(state_path, &wallet)?;

    println!("✅ Wallet initialized");
    println!("   State: {}", state_path.display());
    println!(
        "   Owners: {} (quorum {})",
        wallet.owner_count(),
        wallet.required()
    );
    for (label, id) in config.wallet.owners.iter().zip(owners.iter()) {
        println!("     {} {}", id, label);
    }
    println!("   Daily limit: {}", wallet.daily_limit());

    Ok(())
}
