//! FASTA parser and DNA validator.
//!
//! This module handles reading and parsing FASTA text. It supports both
//! single-line and multi-line sequences, and validates single-record DNA
//! inputs before they reach the comparison engine.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! >another_sequence
//! TGCATGCATGCA...
//! ```

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::model::FastaRecord;

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty FASTA input")]
    EmptyFile,

    #[error("FASTA format must start with '>' character")]
    MissingHeader,

    #[error("FASTA header cannot be empty (line {0})")]
    EmptyHeader(usize),

    #[error("No sequence found after header")]
    MissingSequence,

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),

    #[error("Expected a single FASTA record, found {0}")]
    MultipleRecords(usize),

    #[error("Invalid DNA characters found: {0}")]
    InvalidCharacters(String),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Parses a FASTA file and returns all its records.
///
/// # Examples
///
/// ```no_run
/// use dnacompare::fasta::parse_fasta_file;
///
/// let records = parse_fasta_file("sequences.fasta").unwrap();
/// println!("Loaded {} sequences", records.len());
/// ```
pub fn parse_fasta_file<P: AsRef<Path>>(path: P) -> FastaResult<Vec<FastaRecord>> {
    let file = File::open(path)?;
    parse_fasta(BufReader::new(file))
}

/// Parses FASTA content from a reader.
///
/// Records with no sequence lines are dropped.
pub fn parse_fasta<R: BufRead>(reader: R) -> FastaResult<Vec<FastaRecord>> {
    let mut records = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for (idx, line_result) in reader.lines().enumerate() {
        let line_number = idx + 1;
        let line = line_result?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                if !record.is_empty() {
                    records.push(record);
                }
            }

            let header = header.trim();
            let (id, description) = match header.split_once(char::is_whitespace) {
                Some((id, rest)) => (id, Some(rest.trim())),
                None => (header, None),
            };

            if id.is_empty() {
                return Err(FastaError::EmptyHeader(line_number));
            }

            let mut record = FastaRecord::new(id, String::new()).with_raw_header(header);
            if let Some(desc) = description.filter(|d| !d.is_empty()) {
                record = record.with_description(desc);
            }
            current = Some(record);
        } else {
            let record = current
                .as_mut()
                .ok_or(FastaError::SequenceWithoutHeader(line_number))?;
            record
                .sequence
                .extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }

    if let Some(record) = current {
        if !record.is_empty() {
            records.push(record);
        }
    }

    if records.is_empty() {
        return Err(FastaError::EmptyFile);
    }

    log::debug!("Parsed {} FASTA record(s)", records.len());
    Ok(records)
}

/// Parses FASTA content from a string.
pub fn parse_fasta_str(content: &str) -> FastaResult<Vec<FastaRecord>> {
    parse_fasta(content.as_bytes())
}

/// Checks that a sequence only contains A, T, C and G (case-insensitive).
///
/// The error lists every offending symbol once, sorted.
pub fn validate_dna_sequence(sequence: &str) -> FastaResult<()> {
    let invalid: BTreeSet<char> = sequence
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| !matches!(c, 'A' | 'T' | 'C' | 'G'))
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        let listed: Vec<String> = invalid.iter().map(char::to_string).collect();
        Err(FastaError::InvalidCharacters(listed.join(", ")))
    }
}

/// Parses and validates a single-record DNA FASTA text.
///
/// The returned sequence is uppercased and guaranteed non-empty and made of
/// A, T, C and G only.
pub fn validate_fasta_dna(fasta_text: &str) -> FastaResult<FastaRecord> {
    let text = fasta_text.trim();
    if text.is_empty() {
        return Err(FastaError::EmptyFile);
    }
    if !text.starts_with('>') {
        return Err(FastaError::MissingHeader);
    }

    // The parser drops headers with no sequence; count them here instead.
    let headers = text
        .lines()
        .filter(|line| line.trim_start().starts_with('>'))
        .count();
    if headers > 1 {
        return Err(FastaError::MultipleRecords(headers));
    }

    let mut records = match parse_fasta_str(text) {
        Ok(records) => records,
        Err(FastaError::EmptyFile) => return Err(FastaError::MissingSequence),
        Err(e) => return Err(e),
    };
    let mut record = records.pop().ok_or(FastaError::MissingSequence)?;

    record.sequence.make_ascii_uppercase();
    validate_dna_sequence(&record.sequence)?;
    Ok(record)
}

/// Reads and validates a single-record DNA FASTA file.
pub fn read_fasta_dna<P: AsRef<Path>>(path: P) -> FastaResult<FastaRecord> {
    let content = std::fs::read_to_string(path)?;
    validate_fasta_dna(&content)
}
