//! Single-sequence statistics.
//!
//! Nucleotide composition, reverse complement, codon split, start/stop
//! codon positions and open reading frames of one validated DNA sequence.

use serde::Serialize;
use thiserror::Error;

use crate::genetic_code::{GeneticCode, Translation, TranslationError};

const START_CODON: &[u8; 3] = b"ATG";
const STOP_CODONS: [&[u8; 3]; 3] = [b"TAA", b"TAG", b"TGA"];

/// Errors that can occur during sequence analysis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Cannot complement base '{0}'")]
    InvalidBase(char),
}

/// Per-base counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NucleotideCounts {
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "T")]
    pub t: usize,
    #[serde(rename = "C")]
    pub c: usize,
    #[serde(rename = "G")]
    pub g: usize,
}

/// GC and AT content in percent, rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Percentages {
    pub gc_percent: f64,
    pub at_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopCodonHit {
    pub position: usize,
    pub codon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartStopCodons {
    pub start_codons: Vec<usize>,
    pub stop_codons: Vec<StopCodonHit>,
}

/// An ATG..stop span in one of the three forward frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Orf {
    pub frame: usize,
    pub start: usize,
    /// Exclusive end, stop codon included
    pub end: usize,
    pub length: usize,
    pub sequence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedOrf {
    #[serde(flatten)]
    pub orf: Orf,
    pub translation: Translation,
}

/// Everything computed for a single sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceAnalysis {
    pub length: usize,
    pub nucleotide_counts: NucleotideCounts,
    pub percentages: Percentages,
    pub reverse_complement: String,
    pub codons: Vec<String>,
    pub start_stop_codons: StartStopCodons,
    pub orfs: Vec<Orf>,
}

fn is_stop(codon: &[u8]) -> bool {
    STOP_CODONS.iter().any(|stop| codon == stop.as_slice())
}

pub fn count_nucleotides(sequence: &str) -> NucleotideCounts {
    sequence
        .bytes()
        .fold(NucleotideCounts::default(), |mut counts, b| {
            match b.to_ascii_uppercase() {
                b'A' => counts.a += 1,
                b'T' => counts.t += 1,
                b'C' => counts.c += 1,
                b'G' => counts.g += 1,
                _ => {}
            }
            counts
        })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// GC% and AT% of the sequence; both 0 for an empty sequence.
pub fn calculate_percentages(sequence: &str) -> Percentages {
    if sequence.is_empty() {
        return Percentages::default();
    }
    let counts = count_nucleotides(sequence);
    let total = sequence.len() as f64;
    Percentages {
        gc_percent: round2((counts.g + counts.c) as f64 / total * 100.0),
        at_percent: round2((counts.a + counts.t) as f64 / total * 100.0),
    }
}

pub fn reverse_complement(sequence: &str) -> Result<String, AnalysisError> {
    sequence
        .chars()
        .rev()
        .map(|c| match c.to_ascii_uppercase() {
            'A' => Ok('T'),
            'T' => Ok('A'),
            'C' => Ok('G'),
            'G' => Ok('C'),
            other => Err(AnalysisError::InvalidBase(other)),
        })
        .collect()
}

/// Full codons from offset 0; a trailing partial codon is dropped.
pub fn split_into_codons(sequence: &str) -> Vec<String> {
    sequence
        .as_bytes()
        .chunks_exact(3)
        .map(|codon| String::from_utf8_lossy(codon).to_ascii_uppercase())
        .collect()
}

/// Positions of ATG and of every stop codon, at every offset.
pub fn find_start_stop_codons(sequence: &str) -> StartStopCodons {
    let upper = sequence.to_ascii_uppercase();
    let mut found = StartStopCodons::default();

    for (position, codon) in upper.as_bytes().windows(3).enumerate() {
        if codon == START_CODON {
            found.start_codons.push(position);
        } else if is_stop(codon) {
            found.stop_codons.push(StopCodonHit {
                position,
                codon: String::from_utf8_lossy(codon).into_owned(),
            });
        }
    }

    found
}

/// Detects ORFs in the three forward frames.
///
/// An ORF runs from an ATG to the first in-frame stop codon (included).
/// Scanning resumes right after that stop; an ATG without an in-frame stop
/// is skipped.
pub fn detect_orfs(sequence: &str) -> Vec<Orf> {
    let upper = sequence.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    let mut orfs = Vec::new();

    for frame in 0..3 {
        let mut i = frame;
        while i + 3 <= bytes.len() {
            if &bytes[i..i + 3] != START_CODON {
                i += 3;
                continue;
            }

            let stop = (i + 3..)
                .step_by(3)
                .take_while(|&j| j + 3 <= bytes.len())
                .find(|&j| is_stop(&bytes[j..j + 3]));

            match stop {
                Some(j) => {
                    let end = j + 3;
                    orfs.push(Orf {
                        frame,
                        start: i,
                        end,
                        length: end - i,
                        sequence: upper[i..end].to_string(),
                    });
                    i = end;
                }
                None => i += 3,
            }
        }
    }

    log::trace!("Found {} ORF(s) in {} nt", orfs.len(), bytes.len());
    orfs
}

/// Translates each ORF with the given genetic code.
pub fn translate_orfs(orfs: &[Orf], code: &GeneticCode) -> Result<Vec<TranslatedOrf>, TranslationError> {
    orfs.iter()
        .map(|orf| {
            Ok(TranslatedOrf {
                orf: orf.clone(),
                translation: code.translate(&orf.sequence, 0)?,
            })
        })
        .collect()
}

/// Runs every single-sequence analysis.
pub fn analyze_sequence(sequence: &str) -> Result<SequenceAnalysis, AnalysisError> {
    Ok(SequenceAnalysis {
        length: sequence.len(),
        nucleotide_counts: count_nucleotides(sequence),
        percentages: calculate_percentages(sequence),
        reverse_complement: reverse_complement(sequence)?,
        codons: split_into_codons(sequence),
        start_stop_codons: find_start_stop_codons(sequence),
        orfs: detect_orfs(sequence),
    })
}
