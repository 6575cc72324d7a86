//! Genetic code definitions and translation logic.
//!
//! This module provides:
//! - NCBI genetic code tables (1-33)
//! - Codon to amino acid translation
//! - Whole-sequence translation with the codon list and codon map
//!
//! Translation reads consecutive non-overlapping triplets and does not stop
//! at stop codons: every full codon yields one symbol (`*` for stops) so
//! that regions behind a stop remain comparable between two sequences.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during translation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Invalid codon '{codon}' at position {position}")]
    InvalidCodon { codon: String, position: usize },
}

/// Result type for translation operations.
pub type TranslationResult<T> = Result<T, TranslationError>;

/// One translated codon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodonEntry {
    pub codon: String,
    pub amino_acid: char,
    /// Offset of the codon from the translation start
    pub position: usize,
}

/// Result of translating a nucleotide sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Translation {
    /// One amino acid per full codon
    pub protein: String,
    /// All codons, including a trailing partial one
    pub codons: Vec<String>,
    /// Per-codon detail for the translated codons
    pub codon_map: Vec<CodonEntry>,
}

/// A genetic code table for translating codons to amino acids.
#[derive(Debug, Clone)]
pub struct GeneticCode {
    /// NCBI genetic code ID
    pub id: u8,
    /// Name of the genetic code
    pub name: String,
    /// Codon to amino acid mapping (64 entries)
    codon_table: HashMap<[u8; 3], char>,
}

impl GeneticCode {
    /// Creates a new genetic code from an NCBI `ncbieaa` string.
    ///
    /// # Arguments
    /// * `id` - NCBI genetic code ID
    /// * `name` - Name of the genetic code
    /// * `ncbieaa` - 64-character string of amino acids (NCBI order)
    fn new(id: u8, name: &str, ncbieaa: &str) -> Self {
        const BASES: &[u8; 4] = b"TCAG";

        // NCBI order: TTT, TTC, TTA, TTG, TCT, TCC, ... (Base1, Base2, Base3)
        let codons = BASES.iter().flat_map(|&b1| {
            BASES
                .iter()
                .flat_map(move |&b2| BASES.iter().map(move |&b3| [b1, b2, b3]))
        });
        let codon_table = codons.zip(ncbieaa.chars()).collect();

        Self {
            id,
            name: name.to_string(),
            codon_table,
        }
    }

    /// Translates a single codon, case-insensitively.
    ///
    /// Returns `None` for anything that is not three symbols from {A, C, G, T}.
    pub fn translate_codon(&self, codon: &[u8]) -> Option<char> {
        let key: [u8; 3] = codon.try_into().ok()?;
        self.codon_table.get(&key.map(|b| b.to_ascii_uppercase())).copied()
    }

    /// Translates a nucleotide sequence starting at `offset`.
    ///
    /// Offsets at or past the end give an empty translation. A trailing
    /// group of one or two symbols is listed in `codons` but not translated.
    pub fn translate(&self, sequence: &str, offset: usize) -> TranslationResult<Translation> {
        let bytes = sequence.as_bytes();
        if offset >= bytes.len() {
            return Ok(Translation::default());
        }
        let frame = &bytes[offset..];

        let mut translation = Translation {
            protein: String::with_capacity(frame.len() / 3),
            codons: Vec::with_capacity(frame.len().div_ceil(3)),
            codon_map: Vec::with_capacity(frame.len() / 3),
        };

        for (idx, chunk) in frame.chunks(3).enumerate() {
            let codon = String::from_utf8_lossy(chunk).to_ascii_uppercase();
            if chunk.len() < 3 {
                translation.codons.push(codon);
                break;
            }

            let position = idx * 3;
            let amino_acid = self.translate_codon(chunk).ok_or_else(|| {
                TranslationError::InvalidCodon {
                    codon: codon.clone(),
                    position: offset + position,
                }
            })?;

            translation.protein.push(amino_acid);
            translation.codon_map.push(CodonEntry {
                codon: codon.clone(),
                amino_acid,
                position,
            });
            translation.codons.push(codon);
        }

        log::trace!(
            "Translated {} nt with code {} into {} aa",
            frame.len(),
            self.id,
            translation.protein.len()
        );
        Ok(translation)
    }
}

/// All available genetic codes from NCBI.
pub struct GeneticCodes {
    codes: Vec<GeneticCode>,
}

impl GeneticCodes {
    /// Creates the complete set of NCBI genetic codes.
    pub fn new() -> Self {
        let codes = vec![
            GeneticCode::new(1, "Standard",
                "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(2, "Vertebrate Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG"),
            GeneticCode::new(3, "Yeast Mitochondrial",
                "FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(4, "Mold/Protozoan/Coelenterate Mito...",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(5, "Invertebrate Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(6, "Ciliate/Dasycladacean/Hexamita Nuclear",
                "FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(9, "Echinoderm/Flatworm Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(10, "Euplotid Nuclear",
                "FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(11, "Bacterial/Archaeal/Plant Plastid",
                "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(12, "Alternative Yeast Nuclear",
                "FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(13, "Ascidian Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG"),
            GeneticCode::new(14, "Alternative Flatworm Mitochondrial",
                "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(15, "Blepharisma Macronuclear",
                "FFLLSSSSYY*QCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(16, "Chlorophycean Mitochondrial",
                "FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(21, "Trematode Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(22, "Scenedesmus obliquus Mitochondrial",
                "FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(23, "Thraustochytrium Mitochondrial",
                "FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(24, "Rhabdopleuridae Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG"),
            GeneticCode::new(25, "Candidate Division SR1/Gracilibacteria",
                "FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(26, "Pachysolen tannophilus Nuclear",
                "FFLLSSSSYY**CC*WLLLAPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(27, "Karyorelict Nuclear",
                "FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(28, "Condylostoma Nuclear",
                "FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(29, "Mesodinium Nuclear",
                "FFLLSSSSYYYYCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(30, "Peritrich Nuclear",
                "FFLLSSSSYYEECC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(31, "Blastocrithidia Nuclear",
                "FFLLSSSSYYEECCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(32, "Balanophoraceae Plastid",
                "FFLLSSSSYY*WCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(33, "Cephalodiscidae Mitochondrial",
                "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG"),
        ];

        Self { codes }
    }

    /// Process-wide read-only registry, built on first use.
    pub fn global() -> &'static GeneticCodes {
        static CODES: OnceLock<GeneticCodes> = OnceLock::new();
        CODES.get_or_init(GeneticCodes::new)
    }

    /// Returns all genetic codes.
    pub fn all(&self) -> &[GeneticCode] {
        &self.codes
    }

    /// Gets a genetic code by ID.
    pub fn get(&self, id: u8) -> Option<&GeneticCode> {
        self.codes.iter().find(|c| c.id == id)
    }

    /// Gets the Standard genetic code (table 1, always first).
    pub fn standard(&self) -> &GeneticCode {
        &self.codes[0]
    }
}

impl Default for GeneticCodes {
    fn default() -> Self {
        Self::new()
    }
}

/// Translates a nucleotide sequence from offset 0 with the Standard code.
pub fn translate(sequence: &str) -> TranslationResult<Translation> {
    GeneticCodes::global().standard().translate(sequence, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_code_translation() {
        let standard = GeneticCodes::global().standard();
        assert_eq!(standard.id, 1);

        assert_eq!(standard.translate_codon(b"ATG"), Some('M')); // Start codon
        assert_eq!(standard.translate_codon(b"TAA"), Some('*'));
        assert_eq!(standard.translate_codon(b"TAG"), Some('*'));
        assert_eq!(standard.translate_codon(b"TGA"), Some('*'));
        assert_eq!(standard.translate_codon(b"TTT"), Some('F'));
        assert_eq!(standard.translate_codon(b"GGG"), Some('G'));
    }

    #[test]
    fn test_table_is_complete() {
        for code in GeneticCodes::global().all() {
            assert_eq!(code.codon_table.len(), 64, "code {} incomplete", code.id);
        }
    }

    #[test]
    fn test_unknown_codons() {
        let standard = GeneticCodes::global().standard();
        assert_eq!(standard.translate_codon(b"ATN"), None);
        assert_eq!(standard.translate_codon(b"AUG"), None);
        assert_eq!(standard.translate_codon(b"AT"), None);
        assert_eq!(standard.translate_codon(b"ATGC"), None);
    }

    #[test]
    fn test_translate_examples() {
        assert_eq!(translate("ATGGCT").unwrap().protein, "MA");
        assert_eq!(translate("TAA").unwrap().protein, "*");
    }

    #[test]
    fn test_no_early_stop() {
        let translation = translate("ATGTAAGGG").unwrap();
        assert_eq!(translation.protein, "M*G");
        assert_eq!(translation.codons, vec!["ATG", "TAA", "GGG"]);
    }

    #[test]
    fn test_partial_trailing_codon() {
        let translation = translate("ATGTTTTA").unwrap();
        assert_eq!(translation.protein, "MF");
        assert_eq!(translation.codons, vec!["ATG", "TTT", "TA"]);
        assert_eq!(translation.codon_map.len(), 2);
        assert_eq!(translation.codon_map[1].position, 3);
        assert_eq!(translation.codon_map[1].amino_acid, 'F');
    }

    #[test]
    fn test_codon_and_protein_counts() {
        let seq = "ATGCGTACGTAGCTAGCTAGA";
        for len in 0..=seq.len() {
            let translation = translate(&seq[..len]).unwrap();
            assert_eq!(translation.codons.len(), len.div_ceil(3));
            assert_eq!(translation.protein.len(), len / 3);
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(translate("atgGcT").unwrap().protein, "MA");
        assert_eq!(translate("atg").unwrap().codons, vec!["ATG"]);
    }

    #[test]
    fn test_invalid_codon() {
        let err = translate("ATGNNN").unwrap_err();
        assert_eq!(
            err,
            TranslationError::InvalidCodon { codon: "NNN".to_string(), position: 3 }
        );
    }

    #[test]
    fn test_offset_translation() {
        let standard = GeneticCodes::global().standard();
        let seq = "AATGTTTTAG";
        assert_eq!(standard.translate(seq, 0).unwrap().protein, "NVL");
        assert_eq!(standard.translate(seq, 1).unwrap().protein, "MF*");
        assert_eq!(standard.translate(seq, 2).unwrap().protein, "CF");
        assert_eq!(standard.translate(seq, 10).unwrap(), Translation::default());
    }

    #[test]
    fn test_different_genetic_codes() {
        let codes = GeneticCodes::global();
        assert_eq!(codes.get(1).unwrap().translate_codon(b"TGA"), Some('*'));
        // In vertebrate mitochondrial (code 2), TGA is Trp (W)
        assert_eq!(codes.get(2).unwrap().translate_codon(b"TGA"), Some('W'));
        assert!(codes.get(7).is_none());
    }
}
