//! KDL QR tool binary.
//!
//! Runs a single command, or the interactive session when none is given.

use std::io;

use clap::Parser;

use kdl_qr_lib::cli::Cli;
use kdl_qr_lib::launch::split_prefill;
use kdl_qr_lib::{commands, session};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    kdl_qr_lib::init_tracing();

    // `fall=` style prefill tokens are not clap syntax; take them out first.
    let (prefill, args) = split_prefill(std::env::args());
    let cli = Cli::parse_from(args);

    if let Some(case) = &prefill {
        tracing::info!(case_number = %case, "Case number prefilled from command line");
    }

    let mut state = kdl_qr_lib::init_foundation(prefill);

    match cli.cmd {
        Some(cmd) => commands::run(cmd, &mut state).await,
        None => {
            let stdin = io::stdin();
            session::run_session(&mut state, stdin.lock(), io::stdout()).await
        }
    }
}
