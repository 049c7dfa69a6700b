use std::io::{self, Write};
use std::path::Path;

use thermo_forge::{Notice, Phase};

use crate::util::text::{list_or_dash, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// Rows shown before a table is cut short.
const MAX_ROWS: usize = 40;

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Column {
    header: &'static str,
    align: Align,
    max_width: usize,
}

impl Column {
    const fn left(header: &'static str, max_width: usize) -> Self {
        Self {
            header,
            align: Align::Left,
            max_width,
        }
    }

    const fn right(header: &'static str, max_width: usize) -> Self {
        Self {
            header,
            align: Align::Right,
            max_width,
        }
    }
}

pub fn print_phase_summary(phase: &Phase, file: &Path) {
    let mut out = io::stdout().lock();

    let standard_states = if phase.supports_standard_states() {
        "per species"
    } else {
        "none"
    };
    let rows = vec![
        ("File", file.display().to_string()),
        ("Phase", phase.name().to_string()),
        ("Model", phase.model_kind().to_string()),
        ("Elements", phase.elements().len().to_string()),
        ("Species", phase.n_species().to_string()),
        ("Standard States", standard_states.to_string()),
        ("Temperature", format!("{:.2} K", phase.temperature())),
        ("Pressure", format!("{:.1} Pa", phase.pressure())),
    ];

    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|(key, value)| vec![key.to_string(), value])
        .collect();
    let columns = [Column::left("Property", 16), Column::right("Value", 32)];
    print_table(&mut out, "Phase Summary", &columns, &rows);
}

pub fn print_elements(phase: &Phase) {
    let mut out = io::stdout().lock();

    let rows: Vec<Vec<String>> = phase
        .elements()
        .iter()
        .map(|e| {
            let entropy = if e.has_known_entropy() {
                format!("{:.3}", e.entropy298)
            } else {
                "-".to_string()
            };
            vec![
                e.symbol.clone(),
                format!("{:.5}", e.atomic_weight),
                e.atomic_number.to_string(),
                entropy,
            ]
        })
        .collect();

    let columns = [
        Column::left("Symbol", 8),
        Column::right("Weight", 12),
        Column::right("Z", 4),
        Column::right("S298 (J/kmol/K)", 16),
    ];
    print_table(&mut out, "Elements", &columns, &rows);
}

pub fn print_species(phase: &Phase) {
    let mut out = io::stdout().lock();

    let mole_fractions = phase.mole_fractions();
    let rows: Vec<Vec<String>> = phase
        .species()
        .iter()
        .enumerate()
        .map(|(k, s)| {
            let standard_state = phase
                .standard_state(k)
                .map(|ss| ss.kind().to_string())
                .unwrap_or_else(|| "-".to_string());
            vec![
                s.name.clone(),
                s.formula(),
                format!("{:+}", s.charge),
                format!("{:.4}", mole_fractions.get(k).copied().unwrap_or(0.0)),
                standard_state,
            ]
        })
        .collect();

    let columns = [
        Column::left("Name", 12),
        Column::left("Formula", 10),
        Column::right("Charge", 6),
        Column::right("X", 6),
        Column::left("Std. State", 14),
    ];
    print_table(&mut out, "Species", &columns, &rows);
}

pub fn print_notices(notices: &[Notice]) {
    if notices.is_empty() {
        return;
    }
    let mut out = io::stdout().lock();

    let rows: Vec<Vec<String>> = notices
        .iter()
        .map(|n| vec![n.origin.clone(), n.message.clone()])
        .collect();
    let columns = [Column::left("Origin", 24), Column::left("Message", 24)];
    print_table(&mut out, "Deprecation Notices", &columns, &rows);
}

/// One row per phase: name, model key (or `-`), and `ok` or the error text.
pub fn print_check_results(results: &[(String, String, Result<(), String>)]) {
    let mut out = io::stdout().lock();

    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|(name, model, outcome)| {
            let status = match outcome {
                Ok(()) => "ok".to_string(),
                Err(message) => message.clone(),
            };
            vec![name.clone(), model.clone(), status]
        })
        .collect();
    let columns = [
        Column::left("Phase", 14),
        Column::left("Model", 14),
        Column::left("Status", 24),
    ];
    print_table(&mut out, "Check Results", &columns, &rows);
}

pub fn print_models(title: &str, models: &[(String, Vec<String>)]) {
    let mut out = io::stdout().lock();

    let rows: Vec<Vec<String>> = models
        .iter()
        .map(|(key, aliases)| vec![key.clone(), list_or_dash(aliases)])
        .collect();
    let columns = [Column::left("Key", 22), Column::left("Aliases", 30)];
    print_table(&mut out, title, &columns, &rows);
}

fn print_table(out: &mut impl Write, title: &str, columns: &[Column], rows: &[Vec<String>]) {
    let mut shown: Vec<Vec<String>> = rows.iter().take(MAX_ROWS).cloned().collect();
    if rows.len() > MAX_ROWS {
        let mut more = vec!["...".to_string(); columns.len()];
        if let Some(last) = more.last_mut() {
            *last = format!("({} more)", rows.len() - MAX_ROWS);
        }
        shown.push(more);
    }

    let widths = column_widths(columns, &shown);
    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}{}", INDENT, left, segments.join(mid), right)
    };

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let headers: Vec<String> = columns.iter().map(|c| c.header.to_string()).collect();
    let _ = writeln!(out, "{}", format_row(columns, &widths, &headers));
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));
    for row in &shown {
        let _ = writeln!(out, "{}", format_row(columns, &widths, row));
    }
    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

fn column_widths(columns: &[Column], rows: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(column.header.chars().count()))
                .max()
                .unwrap_or(0)
                .min(column.max_width)
        })
        .collect()
}

fn format_row(columns: &[Column], widths: &[usize], cells: &[String]) -> String {
    let formatted: Vec<String> = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (column, &width))| {
            let cell = truncate(cells.get(i).map(String::as_str).unwrap_or(""), width);
            match column.align {
                Align::Left => format!("{:<width$}", cell, width = width),
                Align::Right => format!("{:>width$}", cell, width = width),
            }
        })
        .collect();
    format!("{}│ {} │", INDENT, formatted.join(" │ "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_fit_content_within_limits() {
        let columns = [Column::left("Key", 6), Column::right("N", 10)];
        let rows = vec![
            vec!["ideal-gas".to_string(), "1".to_string()],
            vec!["ig".to_string(), "12".to_string()],
        ];
        assert_eq!(column_widths(&columns, &rows), [6, 2]);
    }

    #[test]
    fn rows_are_padded_and_truncated() {
        let columns = [Column::left("Key", 6), Column::right("N", 3)];
        let row = format_row(&columns, &[6, 3], &["ideal-gas".to_string(), "7".to_string()]);
        assert_eq!(row, format!("{}│ ideal… │   7 │", INDENT));
    }

    #[test]
    fn long_tables_are_cut_short() {
        let columns = [Column::left("Name", 8)];
        let rows: Vec<Vec<String>> = (0..MAX_ROWS + 3).map(|i| vec![format!("S{i}")]).collect();
        let mut buffer = Vec::new();
        print_table(&mut buffer, "Species", &columns, &rows);
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("(3 more)"));
        assert!(!text.contains(&format!("S{}", MAX_ROWS)));
    }
}
