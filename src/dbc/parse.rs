use crate::dbc::core;
use crate::dbc::types::database::{Database, DatabaseBuilder};
use crate::types::errors::DbcParseError;

use std::convert::Infallible;
use std::fs::File;
use std::io::{BufReader, Read};
use std::str::FromStr;

use encoding_rs::WINDOWS_1252;

/// Parses DBC text and returns the resulting [`Database`].
///
/// The text is processed line by line; each trimmed line is routed by its
/// first token:
/// - **Messages** (from `BO_` lines) open the current message
/// - **Signals** (from `SG_` lines) are appended to the current message
/// - **Signal comments** (from `CM_ SG_` lines, possibly spanning several lines)
/// - **Value tables** (from `VAL_` lines)
///
/// # Leniency
/// Parsing never fails. A line that matches none of the records above, or
/// that matches a keyword but not its grammar, is skipped without diagnostics
/// beyond a `trace` event, and leaves the parser state as it was: after a
/// malformed `BO_` line the previous message stays open. An `SG_` line with
/// no open message is skipped too.
///
/// A `CM_ SG_` comment continues on the following lines only while its quote
/// is open, and stops at the next line that starts a record. An unterminated
/// comment is dropped and that line is parsed normally.
///
/// # Example
/// ```
/// use can_decode::dbc;
///
/// let db = dbc::parse::from_str(
///     "BO_ 256 EngineData: 8 ECU\n SG_ RPM : 0|16@1+ (0.25,0) [0|16000] \"rpm\" Dash\n",
/// );
/// assert_eq!(db.message_by_id(256).map(|m| m.signals.len()), Some(1));
/// ```
pub fn from_str(text: &str) -> Database {
    let mut builder: DatabaseBuilder = DatabaseBuilder::default();
    let mut lines = text.lines().peekable();

    while let Some(raw) = lines.next() {
        let line: &str = raw.trim();

        // skip comments and empty lines
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        // Extract first and second part from the line
        let mut parts = line.split_ascii_whitespace();
        let first: &str = parts.next().unwrap_or("");
        let second: &str = parts.next().unwrap_or("");

        match first {
            "BO_" => match core::bo_::decode(line) {
                Some(message) => {
                    builder.open_message(message);
                }
                None => tracing::trace!(line, "skipping malformed BO_ record"),
            },
            "SG_" => match core::sg_::decode(line) {
                Some(signal) => {
                    if !builder.push_signal(signal) {
                        tracing::trace!(line, "skipping SG_ record outside of a message");
                    }
                }
                None => tracing::trace!(line, "skipping malformed SG_ record"),
            },
            "CM_" if second == "SG_" => {
                // Continue on the next lines only while a quote is open,
                // and never across the start of another record
                let mut full_comment_line: String = line.to_string();
                while core::strings::count_unescaped_quotes(&full_comment_line) == 1 {
                    let Some(next) = lines.next_if(|next| !starts_record(next)) else {
                        break;
                    };
                    full_comment_line.push('\n');
                    full_comment_line.push_str(next.trim());
                }
                match core::comments::cm_sg_::decode(&full_comment_line) {
                    Some((key, comment)) => builder.set_signal_comment(key, comment),
                    None => tracing::trace!(line, "skipping malformed CM_ SG_ record"),
                }
            }
            "VAL_" => match core::val_::decode(line) {
                Some((key, table)) => builder.set_value_table(key, table),
                None => tracing::trace!(line, "skipping malformed VAL_ record"),
            },
            _ => {}
        }
    }

    let db: Database = builder.finish();
    tracing::info!(
        messages = db.message_count(),
        signals = db.signal_count(),
        signal_comments = db.signal_comment_count(),
        value_tables = db.value_table_count(),
        transmitters = db.transmitter_count(),
        "parsed DBC"
    );
    db
}

/// Keywords that open a DBC record. A quoted comment never runs into a line
/// starting with one of them.
const RECORD_KEYWORDS: &[&str] = &[
    "VERSION",
    "NS_",
    "BS_",
    "BU_",
    "BO_",
    "SG_",
    "EV_",
    "CM_",
    "BA_DEF_",
    "BA_DEF_DEF_",
    "BA_DEF_REL_",
    "BA_DEF_DEF_REL_",
    "BA_",
    "BA_REL_",
    "VAL_",
    "VAL_TABLE_",
    "BO_TX_BU_",
    "SIG_VALTYPE_",
    "SIG_GROUP_",
    "SG_MUL_VAL_",
    "BU_SG_REL_",
    "BU_BO_REL_",
    "BU_EV_REL_",
    "ENVVAR_DATA_",
    "SGTYPE_",
];

fn starts_record(line: &str) -> bool {
    line.split_ascii_whitespace()
        .next()
        .map(|first| first.trim_end_matches(':'))
        .is_some_and(|first| RECORD_KEYWORDS.contains(&first))
}

/// Reads a `.dbc` file and parses it with [`from_str`].
///
/// The file is decoded as Windows-1252, the encoding most DBC editors write;
/// plain ASCII files decode unchanged.
///
/// # Errors
/// Returns an `Err(DbcParseError)` if:
/// - The path does not end in `.dbc`.
/// - The file cannot be opened.
/// - There are I/O errors while reading.
pub fn from_file(path: &str) -> Result<Database, DbcParseError> {
    // check if provided file has .dbc format
    if !path.ends_with(".dbc") {
        return Err(DbcParseError::InvalidExtension {
            path: path.to_string(),
        });
    }

    let file: File = File::open(path).map_err(|source| DbcParseError::OpenFile {
        path: path.to_string(),
        source,
    })?;
    let mut reader: BufReader<File> = BufReader::new(file);

    // read raw bytes
    let mut bytes: Vec<u8> = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| DbcParseError::Read {
            path: path.to_string(),
            source,
        })?;

    // Decode in Windows-1252
    let (text, _, _) = WINDOWS_1252.decode(&bytes);
    Ok(from_str(&text))
}

impl FromStr for Database {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(from_str(s))
    }
}
