//! Terminal rendering of the poll state

use colored::*;
use exportwatch_core::domain::export::FailureRecord;
use exportwatch_core::domain::poll::{PollPhase, PollState};

/// Print a one-line progress update
pub fn print_progress(state: &PollState) {
    match &state.last_error {
        Some(err) => println!(
            "{} poll {} failed ({} in a row): {}",
            "!".yellow(),
            state.polls,
            state.consecutive_failures,
            err.dimmed()
        ),
        None => println!("{} still exporting (poll {})", "…".cyan(), state.polls),
    }
}

/// Print the final summary once the poller stopped
pub fn print_summary(state: &PollState) {
    println!();
    println!("{}", "Export Summary:".bold());
    println!("  Status:    {}", colorize_phase(state.phase));

    if let Some(finished) = state.finished_at {
        println!("  Finished:  {}", finished.format("%Y-%m-%d %H:%M:%S"));
    }

    match state.phase {
        PollPhase::Done => {
            println!("  Exported:  {}", state.success_count.to_string().green());
            println!("  Failed:    {}", failed_count(state.fails.len()));

            if !state.fails.is_empty() {
                println!("\n{}", "Failures:".bold());
                for failure in &state.fails {
                    println!("  {} {}", "✗".red(), format_failure(failure));
                }
            }
        }
        PollPhase::Failed => {
            if let Some(err) = &state.last_error {
                println!("  Error:     {}", err.red());
            }
        }
        PollPhase::Polling => {
            println!("  {}", "Stopped before the export finished.".yellow());
        }
    }
}

fn colorize_phase(phase: PollPhase) -> ColoredString {
    match phase {
        PollPhase::Polling => "exporting".cyan(),
        PollPhase::Done => "finished".green(),
        PollPhase::Failed => "unreachable".red(),
    }
}

fn failed_count(count: usize) -> ColoredString {
    if count == 0 {
        count.to_string().normal()
    } else {
        count.to_string().red()
    }
}

/// Strings print bare; anything else prints as compact JSON
fn format_failure(failure: &FailureRecord) -> String {
    match failure {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
