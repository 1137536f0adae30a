// WHY: flat CSV of (find, replace, mode) rows lets rule sets move between machines and spreadsheets
// Every field is double-quoted with embedded quotes doubled; output starts with a BOM

use tracing::{debug, warn};

use crate::error::Error;
use crate::rules::Rule;
use crate::settings::Settings;

pub const BOM: char = '\u{FEFF}';
pub const HEADER: &str = "find,replace,mode";

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    /// Modes that did not exist before the import
    pub created_modes: Vec<String>,
    /// One `MalformedImportRow` per skipped row
    pub errors: Vec<Error>,
}

fn push_field(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Serialize every rule of every mode, modes in name order, rules in list order
pub fn export_csv(settings: &Settings) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(HEADER);
    out.push('\n');

    let mut rows = 0;
    for set in settings.modes() {
        for rule in &set.pairs {
            push_field(&mut out, &rule.find);
            out.push(',');
            push_field(&mut out, &rule.replace);
            out.push(',');
            push_field(&mut out, &set.name);
            out.push('\n');
            rows += 1;
        }
    }

    debug!(rows, "Exported rules to CSV");
    out
}

/// Parse one data row into exactly three quoted fields
pub fn parse_row(line: &str, line_number: usize) -> Result<[String; 3], Error> {
    let malformed = |reason: String| Error::MalformedImportRow {
        line: line_number,
        reason,
    };

    let mut fields: Vec<String> = Vec::with_capacity(3);
    let mut chars = line.chars().peekable();

    loop {
        match chars.next() {
            Some('"') => {}
            Some(other) => return Err(malformed(format!("expected '\"' but found {other:?}"))),
            None => return Err(malformed("expected a quoted field".to_string())),
        }

        let mut field = String::new();
        loop {
            match chars.next() {
                Some('"') if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                Some('"') => break,
                Some(ch) => field.push(ch),
                None => return Err(malformed("unterminated quoted field".to_string())),
            }
        }
        fields.push(field);

        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(other) => {
                return Err(malformed(format!("expected ',' after field but found {other:?}")))
            }
        }
    }

    let count = fields.len();
    <[String; 3]>::try_from(fields).map_err(|_| malformed(format!("expected 3 fields, found {count}")))
}

/// Trim the mode field; a row without a mode name is malformed
fn checked_mode(row: [String; 3], line_number: usize) -> Result<[String; 3], Error> {
    let [find, replace, mode] = row;
    let mode = mode.trim();
    if mode.is_empty() {
        return Err(Error::MalformedImportRow {
            line: line_number,
            reason: "mode name is empty".to_string(),
        });
    }
    Ok([find, replace, mode.to_string()])
}

/// Append the rules in `csv` to `settings`
///
/// Rows that do not parse are skipped and reported; unknown mode names create new modes.
pub fn import_csv(csv: &str, settings: &mut Settings) -> Result<ImportReport, Error> {
    let csv = csv.strip_prefix(BOM).unwrap_or(csv);
    let mut lines = csv.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

    let header = lines.next().unwrap_or_default();
    if !header.to_lowercase().contains(HEADER) {
        return Err(Error::UnrecognizedHeader);
    }

    let mut report = ImportReport::default();
    for (index, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // header is line 1
        let line_number = index + 2;
        match parse_row(line, line_number).and_then(|row| checked_mode(row, line_number)) {
            Ok([find, replace, mode]) => {
                if settings.push_pair(&mode, Rule::new(find, replace)) {
                    report.created_modes.push(mode);
                }
                report.imported += 1;
            }
            Err(e) => {
                warn!(line = line_number, error = %e, "Skipping malformed CSV row");
                report.skipped += 1;
                report.errors.push(e);
            }
        }
    }

    debug!(
        imported = report.imported,
        skipped = report.skipped,
        created = report.created_modes.len(),
        "Imported rules from CSV"
    );
    Ok(report)
}
