/// Display version information
pub fn execute() {
    println!("covenant {}", env!("CARGO_PKG_VERSION"));
    println!("Operator CLI for Covenant shared-custody wallets");
}
