use clap::Subcommand;
use focusbubble_core::{CoreError, SessionPhase};

use super::load_app;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a new focus session
    Start,
    /// Pause the current session
    Pause,
    /// Resume a paused session
    Resume,
    /// Discard the current session without archiving
    Reset,
    /// Archive the current session into history
    Complete,
    /// Print the current state snapshot as JSON
    Status,
}

pub fn run(action: SessionAction) -> Result<(), CoreError> {
    let mut app = load_app()?;

    match action {
        SessionAction::Start => match app.start(true)? {
            Some(_) => println!("Session started."),
            None => println!("A session is already in progress."),
        },
        SessionAction::Pause => match app.pause()? {
            Some(_) => println!(
                "Session paused at {}.",
                focusbubble_core::stats::format_clock(app.elapsed_secs())
            ),
            None => println!("No active session to pause."),
        },
        SessionAction::Resume => match app.resume(true)? {
            Some(_) => println!("Session resumed."),
            None => println!("No paused session to resume."),
        },
        SessionAction::Reset => {
            app.reset()?;
            println!("Session discarded.");
        }
        SessionAction::Complete => match app.complete()? {
            Some(record) => {
                println!(
                    "Session completed: {} tracked, {} distraction(s), ~{} focused.",
                    focusbubble_core::stats::format_duration(record.duration_secs),
                    record.distraction_count,
                    focusbubble_core::stats::format_duration(record.estimated_focus_secs),
                );
            }
            None => println!("No session to complete."),
        },
        SessionAction::Status => {
            // Checkpoint elapsed time before reporting.
            if app.phase() != SessionPhase::Inactive {
                app.tick()?;
            }
            println!("{}", serde_json::to_string_pretty(&app.snapshot())?);
        }
    }
    Ok(())
}
