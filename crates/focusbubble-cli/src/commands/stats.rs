use clap::Subcommand;
use focusbubble_core::stats::{format_clock, format_duration};
use focusbubble_core::storage::SessionStore;
use focusbubble_core::CoreError;

use super::load_app;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Live statistics for the current session
    Show,
    /// Completed session history
    History {
        /// Print raw records as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), CoreError> {
    let app = load_app()?;

    match action {
        StatsAction::Show => {
            let stats = app.stats();
            println!("State:            {:?}", app.phase());
            println!("Elapsed:          {}", format_clock(stats.elapsed_secs));
            println!("Distractions:     {}", stats.distraction_count);
            println!(
                "Distraction time: {}",
                format_clock(stats.estimated_distraction_secs)
            );
            println!("Focus time:       {}", format_clock(stats.focus_secs));
            println!("Focus ratio:      {}%", stats.focus_ratio_pct);
        }
        StatsAction::History { json } => {
            let history = app.store().load_history()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("No completed sessions yet.");
            } else {
                for record in &history {
                    println!(
                        "{}  {:>8}  {} distraction(s), ~{} focused",
                        record.date.format("%Y-%m-%d %H:%M"),
                        format_clock(record.duration_secs),
                        record.distraction_count,
                        format_duration(record.estimated_focus_secs),
                    );
                }
            }
        }
    }
    Ok(())
}
