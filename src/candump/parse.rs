use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::candump::types::{decoded_frame::DecodedFrame, options::LogOptions};
use crate::dbc::types::database::Database;
use crate::types::errors::CandumpError;

/// Result of decoding a whole candump log.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogDecode {
    /// Decoded frames, in input order.
    pub frames: Vec<DecodedFrame>,
    /// Non-blank lines that are not candump frames.
    pub skipped: usize,
    /// Frames dropped by the interface filter.
    pub filtered: usize,
    /// `true` if the cancel flag stopped decoding before the end.
    pub cancelled: bool,
}

enum LineOutcome {
    Blank,
    Skipped,
    Filtered,
    Frame(DecodedFrame),
}

fn decode_line(db: &Database, line: &str, options: &LogOptions) -> LineOutcome {
    if line.trim().is_empty() {
        return LineOutcome::Blank;
    }
    match DecodedFrame::from_line(Some(db), line) {
        None => LineOutcome::Skipped,
        Some(frame) if !options.accepts_interface(&frame.interface) => LineOutcome::Filtered,
        Some(frame) => LineOutcome::Frame(frame),
    }
}

/// Decodes every line of a candump log against `db`.
///
/// Lines are processed in batches of `options.batch_size`. Before each batch
/// the optional `cancel` flag is read; once set, decoding stops and the frames
/// decoded so far are returned with `cancelled = true`. With
/// `options.parallel` each batch is decoded on the rayon pool; the output
/// order always matches the input order.
///
/// Lines that are not candump frames are counted in `skipped`, never errors.
pub fn decode_log(
    db: &Database,
    text: &str,
    options: &LogOptions,
    cancel: Option<&AtomicBool>,
) -> LogDecode {
    let lines: Vec<&str> = text.lines().collect();
    let mut log: LogDecode = LogDecode::default();

    for batch in lines.chunks(options.effective_batch_size()) {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            log.cancelled = true;
            tracing::debug!(decoded = log.frames.len(), "candump decoding cancelled");
            break;
        }

        let outcomes: Vec<LineOutcome> = if options.parallel {
            batch
                .par_iter()
                .map(|line| decode_line(db, line, options))
                .collect()
        } else {
            batch
                .iter()
                .map(|line| decode_line(db, line, options))
                .collect()
        };

        for outcome in outcomes {
            match outcome {
                LineOutcome::Blank => {}
                LineOutcome::Skipped => log.skipped += 1,
                LineOutcome::Filtered => log.filtered += 1,
                LineOutcome::Frame(frame) => log.frames.push(frame),
            }
        }
    }

    tracing::info!(
        frames = log.frames.len(),
        skipped = log.skipped,
        filtered = log.filtered,
        cancelled = log.cancelled,
        "decoded candump log"
    );
    log
}

/// Reads a candump log file and decodes it with [`decode_log`].
///
/// Invalid UTF-8 is replaced rather than rejected; such lines are then skipped.
///
/// # Errors
/// Returns an `Err(CandumpError)` if the file cannot be opened or read.
pub fn from_file(
    path: &str,
    db: &Database,
    options: &LogOptions,
    cancel: Option<&AtomicBool>,
) -> Result<LogDecode, CandumpError> {
    let file: File = File::open(path).map_err(|source| CandumpError::OpenFile {
        path: path.to_string(),
        source,
    })?;
    let mut reader: BufReader<File> = BufReader::new(file);

    let mut bytes: Vec<u8> = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| CandumpError::Read {
            path: path.to_string(),
            source,
        })?;

    let text = String::from_utf8_lossy(&bytes);
    Ok(decode_log(db, &text, options, cancel))
}
