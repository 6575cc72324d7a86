//! Report rendering.
//!
//! Turns comparison and analysis results into either plain text (with the
//! alignment chunked into fixed-width blocks) or a JSON envelope whose
//! field names mirror the result types.

use std::fmt::Write;

use serde::Serialize;

use crate::analysis::{SequenceAnalysis, TranslatedOrf};
use crate::genetic_code::Translation;
use crate::model::{AlignmentRecord, Comparison, FastaRecord, Mutation};

/// Default number of alignment columns per block.
pub const DEFAULT_LINE_WIDTH: usize = 60;

/// One fixed-width slice of an alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentBlock {
    /// 0-based column of the first symbol in the block
    pub start: usize,
    /// Reference row, '-' where the reference has no symbol
    pub reference: String,
    pub markers: String,
    /// Variant row, '-' where the variant has no symbol
    pub variant: String,
}

impl AlignmentBlock {
    /// Number of columns in the block.
    pub fn width(&self) -> usize {
        self.markers.len()
    }
}

fn padded_row(sequence: &str, start: usize, end: usize) -> String {
    let mut symbols = sequence.chars().skip(start);
    (start..end)
        .map(|_| symbols.next().unwrap_or('-'))
        .collect()
}

/// Splits an alignment into blocks of at most `width` columns.
pub fn alignment_blocks(record: &AlignmentRecord, width: usize) -> Vec<AlignmentBlock> {
    let width = width.max(1);
    let markers = record.marker_string();

    (0..record.len())
        .step_by(width)
        .map(|start| {
            let end = (start + width).min(record.len());
            AlignmentBlock {
                start,
                reference: padded_row(&record.seq1, start, end),
                markers: markers[start..end].to_string(),
                variant: padded_row(&record.seq2, start, end),
            }
        })
        .collect()
}

fn write_wrapped(out: &mut String, indent: &str, text: &str, width: usize) {
    if text.is_empty() {
        let _ = writeln!(out, "{}(empty)", indent);
        return;
    }
    for line in textwrap::wrap(text, width.max(1)) {
        let _ = writeln!(out, "{}{}", indent, line);
    }
}

fn write_mutations(out: &mut String, mutations: &[Mutation]) {
    if mutations.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for mutation in mutations {
        let _ = writeln!(out, "  {}", mutation);
    }
}

/// Renders a comparison as a plain-text report.
pub fn render_comparison_text(
    reference: &FastaRecord,
    variant: &FastaRecord,
    comparison: &Comparison,
    width: usize,
) -> String {
    let alignment = &comparison.alignment;
    let tally = comparison.classification;
    let mut out = String::new();

    let _ = writeln!(out, "Reference: {} ({} nt)", reference.header(), alignment.length_seq1());
    let _ = writeln!(out, "Variant:   {} ({} nt)", variant.header(), alignment.length_seq2());
    let _ = writeln!(out);

    let _ = writeln!(out, "Alignment");
    let label_width = alignment.len().to_string().len();
    for block in alignment_blocks(alignment, width) {
        let first = block.start + 1;
        let last = block.start + block.width();
        let _ = writeln!(out, "{:>w$} {} {}", first, block.reference, last, w = label_width);
        let _ = writeln!(out, "{:>w$} {}", "", block.markers, w = label_width);
        let _ = writeln!(out, "{:>w$} {} {}", first, block.variant, last, w = label_width);
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Mutations ({}): {} substitution(s), {} insertion(s), {} deletion(s)",
        alignment.mutation_count(),
        tally.substitutions,
        tally.insertions,
        tally.deletions
    );
    write_mutations(&mut out, &alignment.mutations);
    let _ = writeln!(out);

    let proteins = &comparison.protein_comparison;
    let _ = writeln!(out, "Protein comparison");
    let _ = writeln!(out, "  Reference protein ({} aa):", proteins.protein1.len());
    write_wrapped(&mut out, "    ", &proteins.protein1, width);
    let _ = writeln!(out, "  Variant protein ({} aa):", proteins.protein2.len());
    write_wrapped(&mut out, "    ", &proteins.protein2, width);
    let _ = writeln!(out, "Protein mutations ({}):", proteins.protein_mutations.len());
    write_mutations(&mut out, &proteins.protein_mutations);

    out
}

/// Renders a single-sequence analysis as a plain-text report.
pub fn render_analysis_text(
    record: &FastaRecord,
    analysis: &SequenceAnalysis,
    translated_orfs: &[TranslatedOrf],
    full_translation: &Translation,
    width: usize,
) -> String {
    let counts = analysis.nucleotide_counts;
    let mut out = String::new();

    let _ = writeln!(out, "Sequence: {} ({} nt)", record.header(), analysis.length);
    let _ = writeln!(
        out,
        "Composition: A={} T={} C={} G={} | GC {:.2}% | AT {:.2}%",
        counts.a, counts.t, counts.c, counts.g,
        analysis.percentages.gc_percent,
        analysis.percentages.at_percent
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Reverse complement:");
    write_wrapped(&mut out, "  ", &analysis.reverse_complement, width);

    let starts = &analysis.start_stop_codons.start_codons;
    let stops = &analysis.start_stop_codons.stop_codons;
    let _ = writeln!(out, "Start codons (ATG): {}", starts.len());
    let _ = writeln!(out, "Stop codons: {}", stops.len());
    let _ = writeln!(out, "Codons: {}", analysis.codons.len());
    let _ = writeln!(out);

    let _ = writeln!(out, "Translation ({} aa):", full_translation.protein.len());
    write_wrapped(&mut out, "  ", &full_translation.protein, width);
    let _ = writeln!(out);

    let _ = writeln!(out, "ORFs ({}):", translated_orfs.len());
    for orf in translated_orfs {
        let _ = writeln!(
            out,
            "  frame {} [{}..{}) {} nt -> {}",
            orf.orf.frame + 1,
            orf.orf.start,
            orf.orf.end,
            orf.orf.length,
            orf.translation.protein
        );
    }

    out
}

#[derive(Debug, Serialize)]
struct HeaderedSequence<'a> {
    header: String,
    sequence: &'a str,
}

impl<'a> HeaderedSequence<'a> {
    fn new(record: &'a FastaRecord) -> Self {
        Self {
            header: record.header(),
            sequence: &record.sequence,
        }
    }
}

/// JSON envelope of a two-sequence comparison.
#[derive(Debug, Serialize)]
pub struct ComparisonReport<'a> {
    success: bool,
    sequence1: HeaderedSequence<'a>,
    sequence2: HeaderedSequence<'a>,
    comparison: &'a Comparison,
}

impl<'a> ComparisonReport<'a> {
    pub fn new(reference: &'a FastaRecord, variant: &'a FastaRecord, comparison: &'a Comparison) -> Self {
        Self {
            success: true,
            sequence1: HeaderedSequence::new(reference),
            sequence2: HeaderedSequence::new(variant),
            comparison,
        }
    }
}

/// JSON envelope of a single-sequence analysis.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    success: bool,
    header: String,
    sequence: &'a str,
    analysis: &'a SequenceAnalysis,
    translated_orfs: &'a [TranslatedOrf],
    full_translation: &'a Translation,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(
        record: &'a FastaRecord,
        analysis: &'a SequenceAnalysis,
        translated_orfs: &'a [TranslatedOrf],
        full_translation: &'a Translation,
    ) -> Self {
        Self {
            success: true,
            header: record.header(),
            sequence: &record.sequence,
            analysis,
            translated_orfs,
            full_translation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_sequence, translate_orfs};
    use crate::genetic_code::{translate, GeneticCodes};
    use crate::mutation::{align, compare};

    #[test]
    fn test_blocks_cover_alignment() {
        let record = align("ATGCGTACGT", "ATGAGTACGTAAC").unwrap();
        let blocks = alignment_blocks(&record, 4);

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks.iter().map(AlignmentBlock::width).sum::<usize>(), 13);
        assert_eq!(blocks[0].reference, "ATGC");
        assert_eq!(blocks[0].markers, "|||*");
        assert_eq!(blocks[0].variant, "ATGA");
        assert_eq!(blocks[2].start, 8);
        assert_eq!(blocks[2].reference, "GT--");
        assert_eq!(blocks[2].markers, "||  ");
        assert_eq!(blocks[3].variant, "C");
    }

    #[test]
    fn test_zero_width_is_clamped() {
        let record = align("ACG", "ACG").unwrap();
        assert_eq!(alignment_blocks(&record, 0).len(), 3);
    }

    #[test]
    fn test_comparison_text() {
        let reference = FastaRecord::new("ref", "ATGCGTAA");
        let variant = FastaRecord::new("var", "ATGAGT");
        let comparison = compare(&reference.sequence, &variant.sequence).unwrap();

        let text = render_comparison_text(&reference, &variant, &comparison, 60);
        assert!(text.contains("Reference: ref (8 nt)"));
        assert!(text.contains("1 ATGCGTAA 8"));
        assert!(text.contains("1 ATGAGT-- 8"));
        assert!(text.contains("Mutations (2): 1 substitution(s), 0 insertion(s), 1 deletion(s)"));
        assert!(text.contains("substitution at 3: C -> A"));
        assert!(text.contains("deletion at 6 (2 bp): AA"));
    }

    #[test]
    fn test_comparison_json_fields() {
        let reference = FastaRecord::new("ref", "ATGCGT");
        let variant = FastaRecord::new("var", "ATGCGTAA");
        let comparison = compare(&reference.sequence, &variant.sequence).unwrap();

        let json = serde_json::to_value(ComparisonReport::new(&reference, &variant, &comparison)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["sequence2"]["header"], "var");
        let alignment = &json["comparison"]["alignment"];
        assert_eq!(alignment["alignment"], "||||||  ");
        assert_eq!(alignment["mutation_count"], 1);
        assert_eq!(alignment["length_seq2"], 8);
        assert_eq!(alignment["mutations"][0]["type"], "insertion");
        assert_eq!(alignment["mutations"][0]["sequence"], "AA");
        assert_eq!(json["comparison"]["mutation_classification"]["insertions"], 1);
        assert_eq!(json["comparison"]["protein_comparison"]["protein1"], "MR");
    }

    #[test]
    fn test_analysis_report() {
        let record = FastaRecord::new("orf", "CATGGCTTGAC");
        let analysis = analyze_sequence(&record.sequence).unwrap();
        let orfs = translate_orfs(&analysis.orfs, GeneticCodes::global().standard()).unwrap();
        let translation = translate(&record.sequence).unwrap();

        let text = render_analysis_text(&record, &analysis, &orfs, &translation, 60);
        assert!(text.contains("frame 2 [1..10) 9 nt -> MA*"));

        let json = serde_json::to_value(AnalysisReport::new(&record, &analysis, &orfs, &translation)).unwrap();
        assert_eq!(json["analysis"]["nucleotide_counts"]["G"], 3);
        assert_eq!(json["translated_orfs"][0]["start"], 1);
        assert_eq!(json["translated_orfs"][0]["translation"]["protein"], "MA*");
        assert_eq!(json["full_translation"]["protein"], "HGL");
    }
}
