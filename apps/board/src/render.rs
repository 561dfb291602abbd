//! Plain-text rendering of a board.

use std::fmt::Write;

use hireboard_core::candidates::BoardColumns;
use hireboard_core::jobs::Job;

/// Renders each column as a header followed by its cards in position order.
pub fn render_board(columns: &BoardColumns) -> String {
    let mut out = String::new();
    for (stage, cards) in columns.iter() {
        let _ = writeln!(out, "{} ({})", stage.as_str().to_uppercase(), cards.len());
        for card in cards {
            let _ = writeln!(out, "  {:>3}. #{} {}", card.position, card.id, card.email);
        }
    }
    out
}

pub fn render_jobs(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No jobs.\n".to_string();
    }
    let width = jobs.iter().map(|job| job.id.len()).max().unwrap_or(0);
    jobs.iter()
        .map(|job| format!("{:<width$}  {}\n", job.id, job.name, width = width))
        .collect()
}
