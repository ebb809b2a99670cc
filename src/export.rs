use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::TabError;
use crate::engine::{ColumnDef, Row};

/// Quotes a field when it holds separators or line breaks, doubling embedded quotes.
pub fn wrap_cell_content(c: &str) -> String {
    let needs_escaping = c.contains('"');
    let needs_wrapping = c.chars().any(|c| matches!(c, ' ' | '\t' | ',' | '\n' | '\r'));
    let mut out = String::from(c);

    if needs_escaping {
        out = out.replace('"', "\"\"");
    }
    if needs_wrapping || needs_escaping {
        out = format!("\"{out}\"");
    }
    out
}

/// One CSV line with the raw values of the value-bearing columns.
pub fn csv_line<T: Row>(row: &T, columns: &[ColumnDef<T>]) -> String {
    columns
        .iter()
        .filter(|c| c.has_value())
        .map(|c| wrap_cell_content(&c.value(row).to_string()))
        .collect::<Vec<String>>()
        .join(",")
}

pub fn csv_header<T: Row>(columns: &[ColumnDef<T>]) -> String {
    columns
        .iter()
        .filter(|c| c.has_value())
        .map(|c| wrap_cell_content(c.header()))
        .collect::<Vec<String>>()
        .join(",")
}

/// `<dir>/<name>-export.csv`, with the name reduced to file friendly characters.
pub fn export_path(dir: &Path, name: &str) -> PathBuf {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    dir.join(format!("{}-export.csv", stem.trim_matches('-')))
}

/// Writes header plus `rows` as CSV, returns the number of data lines.
pub fn write_csv<'a, T, I>(path: &Path, columns: &[ColumnDef<T>], rows: I) -> Result<usize, TabError>
where
    T: Row + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", csv_header(columns))?;
    let mut count = 0;
    for row in rows {
        writeln!(out, "{}", csv_line(row, columns))?;
        count += 1;
    }
    out.flush()?;
    info!("Exported {count} rows to {}", path.display());
    Ok(count)
}
