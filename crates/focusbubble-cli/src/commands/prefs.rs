use clap::Subcommand;
use focusbubble_core::{CoreError, Preferences};

use super::load_app;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// List all preferences
    List,
    /// Print one preference value
    Get { key: String },
    /// Update one preference (out-of-range values are clamped)
    Set { key: String, value: String },
}

pub fn run(action: PrefsAction) -> Result<(), CoreError> {
    let mut app = load_app()?;

    match action {
        PrefsAction::List => {
            let prefs = app.preferences();
            for key in Preferences::keys() {
                if let Some(value) = prefs.get(key) {
                    println!("{key} = {value}");
                }
            }
        }
        PrefsAction::Get { key } => match app.preferences().get(&key) {
            Some(value) => println!("{value}"),
            None => {
                return Err(CoreError::Config(
                    focusbubble_core::ConfigError::UnknownKey(key),
                ))
            }
        },
        PrefsAction::Set { key, value } => {
            let prefs = app.set_preference(&key, &value)?;
            // Echo the stored value; clamping may have adjusted it.
            if let Some(stored) = prefs.get(&key) {
                println!("{key} = {stored}");
            }
        }
    }
    Ok(())
}
