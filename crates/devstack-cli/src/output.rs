use serde::Serialize;

// ---------------------------------------------------------------------------
// Severity-colored status lines
// ---------------------------------------------------------------------------

const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const CYAN: &str = "\x1b[96m";
const RESET: &str = "\x1b[0m";

fn colorize(color: &str, message: &str) -> String {
    // Respect NO_COLOR and non-tty pipelines enough to keep logs greppable.
    if std::env::var_os("NO_COLOR").is_some() {
        message.to_string()
    } else {
        format!("{color}{message}{RESET}")
    }
}

pub fn info(message: &str) {
    println!("{}", colorize(CYAN, message));
}

pub fn success(message: &str) {
    println!("{}", colorize(GREEN, message));
}

pub fn warn(message: &str) {
    println!("{}", colorize(YELLOW, message));
}

pub fn error(message: &str) {
    eprintln!("{}", colorize(RED, message));
}

// ---------------------------------------------------------------------------
// JSON / table rendering
// ---------------------------------------------------------------------------

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    // Calculate column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    // Print header
    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  "));

    // Print separator
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    // Print rows
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  "));
    }
}
