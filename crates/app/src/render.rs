//! Plain-text rendering for the terminal.

use std::io::{self, Write};

use quiz_core::model::{ProficiencyBand, QuizListing};
use services::Dashboard;

pub fn write_listings(out: &mut impl Write, listings: &[QuizListing]) -> io::Result<()> {
    if listings.is_empty() {
        return writeln!(out, "No quizzes in the catalog.");
    }
    let id_width = listings
        .iter()
        .map(|l| l.id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max(2);
    writeln!(out, "{:<id_width$}  {:>9}  TITLE", "ID", "QUESTIONS")?;
    for listing in listings {
        writeln!(
            out,
            "{:<id_width$}  {:>9}  {}",
            listing.id.as_str(),
            listing.question_count,
            listing.title
        )?;
    }
    Ok(())
}

fn band_marker(band: ProficiencyBand) -> &'static str {
    match band {
        ProficiencyBand::None => " ",
        ProficiencyBand::Low => "!",
        ProficiencyBand::Mid => "~",
        ProficiencyBand::High => "*",
    }
}

pub fn write_dashboard(out: &mut impl Write, dashboard: &Dashboard) -> io::Result<()> {
    if dashboard.is_empty() {
        return writeln!(out, "No quiz results yet.");
    }

    let name_width = dashboard
        .rows
        .iter()
        .map(|r| r.display_name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    let cell_width = dashboard
        .columns
        .iter()
        .map(|c| c.quiz_id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max(10);

    write!(out, "{:<name_width$}  {:>8}  {:>11}", "NAME", "ATTEMPTS", "PROFICIENCY")?;
    for column in &dashboard.columns {
        write!(out, "  {:>cell_width$}", column.quiz_id.as_str())?;
    }
    writeln!(out, "  LAST ATTEMPT")?;

    for row in &dashboard.rows {
        let proficiency = format!("{}% {}", row.proficiency, band_marker(row.band));
        write!(
            out,
            "{:<name_width$}  {:>8}  {:>11}",
            row.display_name, row.total_attempts, proficiency
        )?;
        for cell in &row.cells {
            let text = cell.map_or_else(
                || "-".to_owned(),
                |c| format!("{}% ({}x)", c.highest_score, c.attempts),
            );
            write!(out, "  {text:>cell_width$}")?;
        }
        writeln!(out, "  {}", row.last_attempt_at.format("%Y-%m-%d %H:%M"))?;
    }

    writeln!(out)?;
    for column in &dashboard.columns {
        writeln!(out, "{}: {}", column.quiz_id, column.title)?;
    }
    writeln!(out, "Proficiency: * 80%+  ~ 50-79%  ! below 50%")
}
