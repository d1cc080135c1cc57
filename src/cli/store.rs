//! Wallet state file: a CBOR `WalletSnapshot` kept between CLI invocations.

use super::executor::SimulatedExecutor;
use covenant::wallet::{SystemDayClock, WalletSnapshot};
use covenant::Wallet;
use std::fs;
use std::path::Path;

pub type CliWallet = Wallet<SimulatedExecutor, SystemDayClock>;

/// Load the wallet from `path`.
pub fn load_wallet(path: &Path) -> Result<CliWallet, Box<dyn std::error::Error>> {
    let bytes = fs::read(path).map_err(|e| {
        format!(
            "Failed to read wallet state '{}': {} (run `covenant init` first)",
            path.display(),
            e
        )
    })?;
    let snapshot = WalletSnapshot::from_bytes(&bytes)?;
    Ok(Wallet::restore(snapshot, SimulatedExecutor, SystemDayClock))
}

/// Write the wallet to `path`, replacing the previous file atomically.
pub fn save_wallet(path: &Path, wallet: &CliWallet) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = wallet.snapshot().to_bytes()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create state directory: {}", e))?;
    }

    let tmp = path.with_extension("cbor.tmp");
    fs::write(&tmp, bytes)
        .map_err(|e| format!("Failed to write wallet state '{}': {}", tmp.display(), e))?;
    fs::rename(&tmp, path)
        .map_err(|e| format!("Failed to replace wallet state '{}': {}", path.display(), e))?;

    Ok(())
}
