//! Positional alignment and mutation classification.
//!
//! Two sequences are compared column by column over their common-length
//! prefix; every differing column is a substitution. A length difference is
//! reported as one insertion (variant longer) or one deletion (reference
//! longer) covering the trailing symbols.
//!
//! ## Limitations
//!
//! This is a linear positional scan, not a dynamic-programming alignment.
//! It is meant for closely related sequences (a reference and a variant
//! with at most one length-changing event at the tail). An internal
//! insertion or deletion shifts every following column and shows up as a
//! run of substitutions plus a trailing indel.

use thiserror::Error;

use crate::genetic_code::{translate, TranslationError};
use crate::model::{
    AlignmentRecord, Comparison, Marker, Mutation, MutationTally, ProteinComparison,
    ProteinMutation,
};

/// Errors that can occur while comparing sequences.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("Invalid sequence: {0} sequence is empty")]
    InvalidSequence(&'static str),

    #[error("Translation failed: {0}")]
    Translation(#[from] TranslationError),
}

/// Result type for comparison operations.
pub type CompareResult<T> = Result<T, CompareError>;

/// Classifies the differences between two symbol strings.
///
/// Returns the marker track (as long as the longer input) and the events in
/// ascending position order.
fn classify(reference: &str, variant: &str) -> (Vec<Marker>, Vec<Mutation>) {
    let reference: Vec<char> = reference.chars().collect();
    let variant: Vec<char> = variant.chars().collect();
    let common = reference.len().min(variant.len());
    let mut markers = Vec::with_capacity(reference.len().max(variant.len()));
    let mut mutations = Vec::new();

    for (position, (&r, &v)) in reference.iter().zip(&variant).enumerate() {
        if r == v {
            markers.push(Marker::Match);
        } else {
            markers.push(Marker::Mismatch);
            mutations.push(Mutation::Substitution {
                position,
                reference: r,
                variant: v,
            });
        }
    }

    if variant.len() > reference.len() {
        let tail = &variant[common..];
        markers.extend(std::iter::repeat(Marker::ReferenceGap).take(tail.len()));
        mutations.push(Mutation::Insertion {
            position: common,
            length: tail.len(),
            sequence: tail.iter().collect(),
        });
    } else if reference.len() > variant.len() {
        let tail = &reference[common..];
        markers.extend(std::iter::repeat(Marker::VariantGap).take(tail.len()));
        mutations.push(Mutation::Deletion {
            position: common,
            length: tail.len(),
            sequence: tail.iter().collect(),
        });
    }

    (markers, mutations)
}

fn ensure_non_empty(reference: &str, variant: &str) -> CompareResult<()> {
    if reference.is_empty() {
        return Err(CompareError::InvalidSequence("reference"));
    }
    if variant.is_empty() {
        return Err(CompareError::InvalidSequence("variant"));
    }
    Ok(())
}

/// Aligns a variant against a reference position by position.
///
/// Both inputs are uppercased before comparison. Columns and positions
/// count characters, not bytes.
///
/// # Errors
///
/// `CompareError::InvalidSequence` if either input is empty.
pub fn align(reference: &str, variant: &str) -> CompareResult<AlignmentRecord> {
    ensure_non_empty(reference, variant)?;

    let seq1 = reference.to_ascii_uppercase();
    let seq2 = variant.to_ascii_uppercase();
    let (markers, mutations) = classify(&seq1, &seq2);

    Ok(AlignmentRecord {
        seq1,
        seq2,
        markers,
        mutations,
    })
}

/// Classifies differences between two protein strings with the same
/// positional rules as [`align`].
///
/// Empty proteins are accepted: a sequence shorter than one codon
/// translates to nothing.
pub fn classify_protein_mutations(protein1: &str, protein2: &str) -> Vec<ProteinMutation> {
    classify(protein1, protein2).1
}

/// Translates both sequences and diffs the resulting proteins.
pub fn compare_proteins(reference: &str, variant: &str) -> CompareResult<ProteinComparison> {
    let translation1 = translate(reference)?;
    let translation2 = translate(variant)?;
    let protein_mutations = classify_protein_mutations(&translation1.protein, &translation2.protein);

    Ok(ProteinComparison {
        protein1: translation1.protein.clone(),
        protein2: translation2.protein.clone(),
        protein_mutations,
        translation1,
        translation2,
    })
}

/// Full comparison of a reference and a variant: nucleotide alignment,
/// per-kind tally, and protein-level diff.
///
/// Either the whole comparison succeeds or nothing is returned.
pub fn compare(reference: &str, variant: &str) -> CompareResult<Comparison> {
    let alignment = align(reference, variant)?;
    let classification = MutationTally::from_mutations(&alignment.mutations);
    let protein_comparison = compare_proteins(&alignment.seq1, &alignment.seq2)?;

    log::debug!(
        "Compared {} nt against {} nt: {} substitution(s), {} insertion(s), {} deletion(s), {} protein mutation(s)",
        alignment.length_seq1(),
        alignment.length_seq2(),
        classification.substitutions,
        classification.insertions,
        classification.deletions,
        protein_comparison.protein_mutations.len()
    );

    Ok(Comparison {
        alignment,
        classification,
        protein_comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_sequences() {
        let result = compare("ATGCGTACGT", "ATGCGTACGT").unwrap();
        assert!(result.alignment.mutations.is_empty());
        assert_eq!(result.alignment.marker_string(), "||||||||||");
        assert!(result.alignment.markers.iter().all(|&m| m == Marker::Match));
        assert_eq!(result.classification, MutationTally::default());
        assert!(result.protein_comparison.protein_mutations.is_empty());
    }

    #[test]
    fn test_single_substitution() {
        let result = compare("ATGCGTACGTAGCTAGCTAG", "ATGCGTACGTAGCAAGCTAG").unwrap();

        assert_eq!(
            result.alignment.mutations,
            vec![Mutation::Substitution { position: 13, reference: 'T', variant: 'A' }]
        );
        assert_eq!(
            result.classification,
            MutationTally { substitutions: 1, insertions: 0, deletions: 0 }
        );
        assert_eq!(result.alignment.marker_string(), "|||||||||||||*||||||");
    }

    #[test]
    fn test_trailing_insertion() {
        let alignment = align("ATGCGT", "ATGCGTAA").unwrap();
        assert_eq!(
            alignment.mutations,
            vec![Mutation::Insertion { position: 6, length: 2, sequence: "AA".into() }]
        );
        assert_eq!(alignment.len(), 8);
        assert_eq!(&alignment.markers[6..], &[Marker::ReferenceGap, Marker::ReferenceGap]);
        assert_eq!(alignment.marker_string(), "||||||  ");
    }

    #[test]
    fn test_columns_count_characters() {
        let alignment = align("AéA", "AAAé").unwrap();
        assert_eq!(
            alignment.mutations,
            vec![
                Mutation::Substitution { position: 1, reference: 'é', variant: 'A' },
                Mutation::Insertion { position: 3, length: 1, sequence: "é".into() },
            ]
        );
        assert_eq!(alignment.len(), 4);
        assert_eq!(alignment.length_seq1(), 3);
    }

    #[test]
    fn test_trailing_deletion() {
        let alignment = align("ATGCGTAA", "ATGCGT").unwrap();
        assert_eq!(
            alignment.mutations,
            vec![Mutation::Deletion { position: 6, length: 2, sequence: "AA".into() }]
        );
        assert_eq!(&alignment.markers[6..], &[Marker::VariantGap, Marker::VariantGap]);
    }

    #[test]
    fn test_substitutions_precede_indel() {
        let alignment = align("ATGCGT", "TTGCCTGG").unwrap();
        let kinds: Vec<_> = alignment.mutations.iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, vec!["substitution", "substitution", "insertion"]);
        let positions: Vec<_> = alignment.mutations.iter().map(|m| m.position()).collect();
        assert_eq!(positions, vec![0, 4, 6]);
    }

    #[test]
    fn test_mutation_count_invariant() {
        let pairs = [
            ("ATGCGT", "ATGCGT"),
            ("ATGCGT", "TTGCGA"),
            ("ATGCGT", "ATGAGTCCC"),
            ("ATGCGTCCC", "AAGCG"),
            ("A", "ATGCGT"),
        ];
        for (reference, variant) in pairs {
            let result = compare(reference, variant).unwrap();
            let tally = result.classification;
            let indel = usize::from(tally.insertions > 0 || tally.deletions > 0);
            assert_eq!(result.alignment.mutation_count(), tally.substitutions + indel);
            assert!(tally.insertions == 0 || tally.deletions == 0);
            assert!(tally.insertions + tally.deletions <= 1);
            assert_eq!(
                result.alignment.len(),
                reference.len().max(variant.len())
            );
        }
    }

    #[test]
    fn test_repeated_comparison_is_stable() {
        let first = compare("ATGCGTACGT", "ATGAGTAC").unwrap();
        let second = compare("ATGCGTACGT", "ATGAGTAC").unwrap();
        assert_eq!(first.classification, second.classification);
        assert_eq!(first, second);
    }

    #[test]
    fn test_internal_indel_is_not_realigned() {
        // One base removed at position 2 shifts every later column.
        let result = compare("ATGCGT", "ATCGT").unwrap();
        assert_eq!(result.classification.substitutions, 3);
        assert_eq!(result.classification.deletions, 1);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(compare("", "ATG").unwrap_err(), CompareError::InvalidSequence("reference"));
        assert_eq!(compare("ATG", "").unwrap_err(), CompareError::InvalidSequence("variant"));
        assert!(align("", "").is_err());
    }

    #[test]
    fn test_lowercase_input() {
        let alignment = align("atgc", "ATGA").unwrap();
        assert_eq!(alignment.seq1, "ATGC");
        assert_eq!(alignment.mutation_count(), 1);
    }

    #[test]
    fn test_protein_comparison() {
        // GCT (A) -> GAT (D) at codon 1, stop codon compared like any symbol
        let result = compare("ATGGCTTAAGGG", "ATGGATTAAGGG").unwrap();
        let proteins = &result.protein_comparison;
        assert_eq!(proteins.protein1, "MA*G");
        assert_eq!(proteins.protein2, "MD*G");
        assert_eq!(
            proteins.protein_mutations,
            vec![Mutation::Substitution { position: 1, reference: 'A', variant: 'D' }]
        );
        assert_eq!(proteins.translation1.codons.len(), 4);
    }

    #[test]
    fn test_protein_length_difference() {
        let result = compare("ATGGCT", "ATGGCTTGGAA").unwrap();
        assert_eq!(
            result.protein_comparison.protein_mutations,
            vec![Mutation::Insertion { position: 2, length: 1, sequence: "W".into() }]
        );
    }

    #[test]
    fn test_classify_empty_proteins() {
        assert!(classify_protein_mutations("", "").is_empty());
        assert_eq!(
            classify_protein_mutations("", "MA"),
            vec![Mutation::Insertion { position: 0, length: 2, sequence: "MA".into() }]
        );
        // Sequences shorter than a codon still compare
        let result = compare("AT", "AC").unwrap();
        assert!(result.protein_comparison.protein1.is_empty());
        assert!(result.protein_comparison.protein_mutations.is_empty());
    }

    #[test]
    fn test_invalid_symbol_surfaces_codon_error() {
        let err = compare("ATGNNN", "ATGAAA").unwrap_err();
        assert!(matches!(
            err,
            CompareError::Translation(TranslationError::InvalidCodon { position: 3, .. })
        ));
    }
}
