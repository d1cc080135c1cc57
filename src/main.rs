//! `covenant` operator binary. All logic lives in the library; this only
//! parses arguments and reports failures.

mod cli;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::execute(cli).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
