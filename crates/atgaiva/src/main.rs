//! Main entry point for atgaiva
//!
//! - CLI mode: any command-line arguments select the command-line interface
//! - GUI mode: a bare launch opens the window

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    if atgaiva_cli::should_run_cli_mode() {
        atgaiva_cli::run().await.map_err(|e| anyhow::anyhow!(e))?;
    } else if let Err(e) = atgaiva_gui::run() {
        eprintln!("GUI error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
