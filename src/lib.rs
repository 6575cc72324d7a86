//! # dnacompare - DNA sequence comparison
//!
//! Compares a reference and a variant DNA sequence read from FASTA text:
//! positional alignment, substitution/insertion/deletion classification,
//! and a protein-level diff of both translations.
//!
//! ## Architecture
//!
//! - `genetic_code`: NCBI genetic code tables and translation
//! - `mutation`: positional alignment and mutation classification
//! - `model`: result types and viewer state
//! - `fasta`: FASTA parsing and DNA validation
//! - `analysis`: single-sequence statistics and ORF detection
//! - `report`: text and JSON reports
//! - `event`, `ui`, `controller`: interactive comparison viewer
//!
//! ## Example
//!
//! ```
//! use dnacompare::mutation::compare;
//!
//! let result = compare("ATGCGT", "ATGCGTAA").unwrap();
//! assert_eq!(result.classification.insertions, 1);
//! assert_eq!(result.alignment.marker_string(), "||||||  ");
//! ```

pub mod analysis;
pub mod controller;
pub mod event;
pub mod fasta;
pub mod genetic_code;
pub mod model;
pub mod mutation;
pub mod report;
pub mod ui;
