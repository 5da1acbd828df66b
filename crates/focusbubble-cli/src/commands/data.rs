use clap::Subcommand;
use focusbubble_core::storage::SessionStore;
use focusbubble_core::CoreError;

use super::load_app;

#[derive(Subcommand)]
pub enum DataAction {
    /// Print all stored data as JSON
    Export,
    /// Delete the current session and all history (preferences survive)
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), CoreError> {
    let mut app = load_app()?;

    match action {
        DataAction::Export => {
            let bundle = app.store().export_all()?;
            println!("{}", serde_json::to_string_pretty(&bundle)?);
        }
        DataAction::Clear { yes } => {
            if !yes {
                eprintln!("This deletes the current session and all history. Re-run with --yes.");
                return Ok(());
            }
            app.reset()?;
            app.store_mut().clear_all()?;
            println!("All session data cleared.");
        }
    }
    Ok(())
}
