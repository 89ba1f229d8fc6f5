//! Console rendering of daily totals

use std::fmt::Write;

use crate::data::DailyTotal;

/// Printed instead of a table when there are no rows
pub const NO_DATA_MESSAGE: &str = "No forecast data found.";

/// Renders the daily table, one line per day, with a trailing newline
///
/// ```text
/// Solcast PV energy forecast (kWh):
///   Day          Mean    Optimistic   (% of 15 kWh)
///   Sun 08-10:    12.34     15.67    (104.5%) (remaining)
/// ```
pub fn render_report(rows: &[DailyTotal], capacity_kwh: f64) -> String {
    if rows.is_empty() {
        return format!("{NO_DATA_MESSAGE}\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "Solcast PV energy forecast (kWh):");
    let _ = writeln!(out, "  Day          Mean    Optimistic   (% of {capacity_kwh:.0} kWh)");

    for row in rows {
        let suffix = if row.is_today { " (remaining)" } else { "" };
        let _ = writeln!(
            out,
            "  {}:  {:6.2}    {:6.2}    ({:5.1}%){}",
            row.date.format("%a %m-%d"),
            row.kwh_mean,
            row.kwh_opt,
            row.optimistic_percent(capacity_kwh),
            suffix
        );
    }

    out
}
