use crate::constants::CSV_HEADER;
use crate::error::Result;
use crate::metrics::ExportMetrics;
use crate::types::Operator;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, info, instrument};

/// Writes the roster as comma-separated text with a header row.
///
/// Column order is fixed (`name,iconURL,profileURL,birthday`). Operators
/// without a birthday get an empty last column.
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    sep: char,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self { sep: ',' }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the whole file into memory. Same input, same bytes.
    pub fn render(&self, operators: &[Operator]) -> String {
        let mut buf: Vec<u8> = Vec::new();
        // Writes into a Vec can't fail.
        let _ = self.write_to(&mut buf, operators);
        match String::from_utf8(buf) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
        }
    }

    pub fn write_to<W: Write>(&self, mut w: W, operators: &[Operator]) -> io::Result<()> {
        write_row(&mut w, &CSV_HEADER, self.sep)?;
        for op in operators {
            let birthday = op.birthday.as_deref().unwrap_or("");
            write_row(
                &mut w,
                &[op.name.as_str(), op.icon_url.as_str(), op.profile_url.as_str(), birthday],
                self.sep,
            )?;
        }
        w.flush()
    }

    /// Write the export to `path`, replacing any existing file.
    #[instrument(skip(self, path, operators), fields(path = %path.display(), rows = operators.len()))]
    pub fn export(&self, path: &Path, operators: &[Operator]) -> Result<()> {
        let contents = self.render(operators);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ExportMetrics::record_error();
                error!("Could not create {}: {}", parent.display(), e);
                e
            })?;
        }

        if let Err(e) = fs::write(path, contents.as_bytes()) {
            ExportMetrics::record_error();
            error!("Failed to write {}: {}", path.display(), e);
            return Err(e.into());
        }

        ExportMetrics::record_written(operators.len(), contents.len());
        info!("💾 Wrote {} operators to {}", operators.len(), path.display());
        Ok(())
    }
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single delimited row. Fields holding the separator, quotes or line
/// breaks are quoted with inner quotes doubled.
fn write_row<W: Write>(w: &mut W, row: &[&str], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{}", sep)?;
        } else {
            first = false;
        }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}
