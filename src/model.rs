//! Data model for sequence comparison.
//!
//! This module contains all data structures for representing:
//! - FASTA records handed to the comparison engine
//! - Alignment marker tracks and mutation events
//! - Comparison results (alignment, tallies, protein diff)
//! - Viewer state for the interactive comparison display
//!
//! All result types are plain values: they are created fresh for each
//! comparison and serialize to JSON with the field names used in reports.

use std::ops::Range;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::genetic_code::Translation;

/// A single FASTA record: identifier, optional description and sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FastaRecord {
    /// The sequence identifier (first word of the header, without '>')
    pub id: String,
    /// Remainder of the header line after the identifier
    pub description: Option<String>,
    /// Header line as read (without '>'), whitespace kept verbatim
    pub raw_header: Option<String>,
    /// The sequence data
    pub sequence: String,
}

impl FastaRecord {
    /// Creates a new record without description.
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            raw_header: None,
            sequence: sequence.into(),
        }
    }

    /// Sets the header description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Keeps the header line exactly as it was read.
    pub fn with_raw_header(mut self, header: impl Into<String>) -> Self {
        self.raw_header = Some(header.into());
        self
    }

    /// Returns the full header text (identifier and description).
    ///
    /// The header line as read wins over the rebuilt one.
    pub fn header(&self) -> String {
        if let Some(raw) = &self.raw_header {
            return raw.clone();
        }
        match &self.description {
            Some(desc) => format!("{} {}", self.id, desc),
            None => self.id.clone(),
        }
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Gets a slice of the sequence data, clamped to the sequence bounds.
    pub fn slice(&self, range: Range<usize>) -> &str {
        let start = range.start.min(self.sequence.len());
        let end = range.end.min(self.sequence.len());
        &self.sequence[start..end]
    }
}

/// One position of the alignment marker track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Both sequences carry the same symbol
    Match,
    /// Both sequences have a symbol here but they differ
    Mismatch,
    /// Only the variant has a symbol here (insertion tail)
    ReferenceGap,
    /// Only the reference has a symbol here (deletion tail)
    VariantGap,
}

impl Marker {
    /// Display symbol of the marker.
    pub fn symbol(self) -> char {
        match self {
            Marker::Match => '|',
            Marker::Mismatch => '*',
            Marker::ReferenceGap | Marker::VariantGap => ' ',
        }
    }

    /// Returns true for either gap kind.
    pub fn is_gap(self) -> bool {
        matches!(self, Marker::ReferenceGap | Marker::VariantGap)
    }
}

/// A classified difference between a reference and a variant.
///
/// Nucleotide and protein comparisons share this shape; only the symbol
/// alphabet differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mutation {
    /// A single mismatched position inside the common-length prefix.
    Substitution {
        position: usize,
        reference: char,
        variant: char,
    },
    /// Trailing symbols present only in the variant.
    Insertion {
        position: usize,
        length: usize,
        sequence: String,
    },
    /// Trailing symbols present only in the reference.
    Deletion {
        position: usize,
        length: usize,
        sequence: String,
    },
}

/// Protein-level mutations use the same event shape over amino acids.
pub type ProteinMutation = Mutation;

impl Mutation {
    /// 0-based position of the event.
    pub fn position(&self) -> usize {
        match self {
            Mutation::Substitution { position, .. }
            | Mutation::Insertion { position, .. }
            | Mutation::Deletion { position, .. } => *position,
        }
    }

    /// Number of alignment columns the event covers.
    pub fn span(&self) -> usize {
        match self {
            Mutation::Substitution { .. } => 1,
            Mutation::Insertion { length, .. } | Mutation::Deletion { length, .. } => *length,
        }
    }

    /// Columns covered by the event.
    pub fn columns(&self) -> Range<usize> {
        self.position()..self.position() + self.span()
    }

    /// Lowercase kind name, as written in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Substitution { .. } => "substitution",
            Mutation::Insertion { .. } => "insertion",
            Mutation::Deletion { .. } => "deletion",
        }
    }
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mutation::Substitution {
                position,
                reference,
                variant,
            } => write!(f, "substitution at {}: {} -> {}", position, reference, variant),
            Mutation::Insertion {
                position,
                length,
                sequence,
            } => write!(f, "insertion at {} ({} bp): {}", position, length, sequence),
            Mutation::Deletion {
                position,
                length,
                sequence,
            } => write!(f, "deletion at {} ({} bp): {}", position, length, sequence),
        }
    }
}

/// Positional alignment of a reference against a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    /// Reference sequence as presented
    pub seq1: String,
    /// Variant sequence as presented
    pub seq2: String,
    /// One marker per column; as long as the longer input
    pub markers: Vec<Marker>,
    /// Events in ascending position order
    pub mutations: Vec<Mutation>,
}

impl AlignmentRecord {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns true if the alignment has no columns.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Renders the marker track as a string.
    pub fn marker_string(&self) -> String {
        self.markers.iter().map(|m| m.symbol()).collect()
    }

    /// Number of mutation events.
    pub fn mutation_count(&self) -> usize {
        self.mutations.len()
    }

    pub fn length_seq1(&self) -> usize {
        self.seq1.chars().count()
    }

    pub fn length_seq2(&self) -> usize {
        self.seq2.chars().count()
    }
}

impl Serialize for AlignmentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AlignmentRecord", 7)?;
        state.serialize_field("seq1", &self.seq1)?;
        state.serialize_field("seq2", &self.seq2)?;
        state.serialize_field("alignment", &self.marker_string())?;
        state.serialize_field("mutations", &self.mutations)?;
        state.serialize_field("mutation_count", &self.mutation_count())?;
        state.serialize_field("length_seq1", &self.length_seq1())?;
        state.serialize_field("length_seq2", &self.length_seq2())?;
        state.end()
    }
}

/// Per-kind counts of mutation events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MutationTally {
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl MutationTally {
    /// Tallies events by their tag.
    pub fn from_mutations(mutations: &[Mutation]) -> Self {
        mutations.iter().fold(Self::default(), |mut tally, m| {
            match m {
                Mutation::Substitution { .. } => tally.substitutions += 1,
                Mutation::Insertion { .. } => tally.insertions += 1,
                Mutation::Deletion { .. } => tally.deletions += 1,
            }
            tally
        })
    }

    /// Total number of events.
    pub fn total(&self) -> usize {
        self.substitutions + self.insertions + self.deletions
    }
}

/// Protein translations of both inputs and their positional diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProteinComparison {
    pub protein1: String,
    pub protein2: String,
    pub protein_mutations: Vec<ProteinMutation>,
    pub translation1: Translation,
    pub translation2: Translation,
}

/// Complete result of comparing a reference with a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub alignment: AlignmentRecord,
    #[serde(rename = "mutation_classification")]
    pub classification: MutationTally,
    pub protein_comparison: ProteinComparison,
}

/// The viewport defines which alignment columns are currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Index of the first visible column
    pub first_col: usize,
    /// Number of visible columns
    pub visible_cols: usize,
}

impl Viewport {
    pub fn new(visible_cols: usize) -> Self {
        Self {
            first_col: 0,
            visible_cols,
        }
    }

    /// Returns the range of visible columns.
    pub fn col_range(&self) -> Range<usize> {
        self.first_col..self.first_col + self.visible_cols
    }

    /// Checks if a column is visible.
    pub fn is_col_visible(&self, col: usize) -> bool {
        self.col_range().contains(&col)
    }
}

/// Viewer mode for handling different input states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Command input mode (after pressing ':')
    Command(String),
}

/// The complete state of the comparison viewer.
#[derive(Debug)]
pub struct AppState {
    /// The comparison being displayed
    pub comparison: Comparison,
    /// Reference label (FASTA header)
    pub reference_label: String,
    /// Variant label (FASTA header)
    pub variant_label: String,
    /// Current viewport
    pub viewport: Viewport,
    /// Current column
    pub cursor: usize,
    /// Current mode
    pub mode: AppMode,
    /// Whether the viewer should quit
    pub should_quit: bool,
    /// Status message to display
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(
        comparison: Comparison,
        reference_label: impl Into<String>,
        variant_label: impl Into<String>,
    ) -> Self {
        let tally = comparison.classification;
        Self {
            comparison,
            reference_label: reference_label.into(),
            variant_label: variant_label.into(),
            viewport: Viewport::new(0),
            cursor: 0,
            mode: AppMode::Normal,
            should_quit: false,
            status_message: Some(format!(
                "{} substitution(s), {} insertion(s), {} deletion(s)",
                tally.substitutions, tally.insertions, tally.deletions
            )),
        }
    }

    /// Number of alignment columns.
    pub fn alignment_length(&self) -> usize {
        self.comparison.alignment.len()
    }

    /// Index of the mutation covering the cursor column, if any.
    pub fn mutation_at_cursor(&self) -> Option<usize> {
        self.comparison
            .alignment
            .mutations
            .iter()
            .position(|m| m.columns().contains(&self.cursor))
    }

    /// Updates the viewport width based on terminal dimensions.
    pub fn update_viewport_size(&mut self, cols: usize) {
        self.viewport.visible_cols = cols;
        self.ensure_cursor_visible();
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.ensure_cursor_visible();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor + 1 < self.alignment_length() {
            self.cursor += 1;
            self.ensure_cursor_visible();
        }
    }

    pub fn goto_first_column(&mut self) {
        self.cursor = 0;
        self.ensure_cursor_visible();
    }

    pub fn goto_last_column(&mut self) {
        self.cursor = self.alignment_length().saturating_sub(1);
        self.ensure_cursor_visible();
    }

    /// Moves one screen width to the left.
    pub fn page_left(&mut self) {
        let step = self.viewport.visible_cols.max(1);
        self.cursor = self.cursor.saturating_sub(step);
        self.ensure_cursor_visible();
    }

    /// Moves one screen width to the right.
    pub fn page_right(&mut self) {
        let step = self.viewport.visible_cols.max(1);
        let last = self.alignment_length().saturating_sub(1);
        self.cursor = (self.cursor + step).min(last);
        self.ensure_cursor_visible();
    }

    /// Jumps to the first mutation starting after the cursor.
    pub fn next_mutation(&mut self) {
        let next = self
            .comparison
            .alignment
            .mutations
            .iter()
            .map(Mutation::position)
            .find(|&pos| pos > self.cursor);
        match next {
            Some(pos) => {
                self.cursor = pos;
                self.ensure_cursor_visible();
                self.status_message = None;
            }
            None => self.status_message = Some("No further mutation".to_string()),
        }
    }

    /// Jumps to the last mutation starting before the cursor.
    pub fn previous_mutation(&mut self) {
        let previous = self
            .comparison
            .alignment
            .mutations
            .iter()
            .map(Mutation::position)
            .filter(|&pos| pos < self.cursor)
            .max();
        match previous {
            Some(pos) => {
                self.cursor = pos;
                self.ensure_cursor_visible();
                self.status_message = None;
            }
            None => self.status_message = Some("No previous mutation".to_string()),
        }
    }

    /// Ensures the cursor is visible in the viewport, with centering behavior.
    fn ensure_cursor_visible(&mut self) {
        if !self.viewport.is_col_visible(self.cursor) {
            self.center_column();
        }
        self.clamp_viewport();
    }

    fn center_column(&mut self) {
        if self.viewport.visible_cols > 0 {
            let half = self.viewport.visible_cols / 2;
            self.viewport.first_col = self.cursor.saturating_sub(half);
        }
    }

    /// Clamps the viewport and cursor to valid alignment bounds.
    fn clamp_viewport(&mut self) {
        let length = self.alignment_length();
        if self.viewport.first_col + self.viewport.visible_cols > length {
            self.viewport.first_col = length.saturating_sub(self.viewport.visible_cols);
        }
        self.cursor = self.cursor.min(length.saturating_sub(1));
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = AppMode::Command(String::new());
    }

    pub fn command_input(&mut self, c: char) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.push(c);
        }
    }

    pub fn command_backspace(&mut self) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.pop();
            if cmd.is_empty() {
                self.mode = AppMode::Normal;
            }
        }
    }

    /// Executes the current command (`:q`, `:quit`, or `:<column>`).
    pub fn execute_command(&mut self) {
        if let AppMode::Command(cmd) = std::mem::take(&mut self.mode) {
            match cmd.as_str() {
                "q" | "quit" => self.should_quit = true,
                _ => match cmd.parse::<usize>() {
                    Ok(col) if col > 0 && col <= self.alignment_length() => {
                        self.cursor = col - 1;
                        self.ensure_cursor_visible();
                    }
                    Ok(col) => self.status_message = Some(format!("Invalid column: {}", col)),
                    Err(_) => self.status_message = Some(format!("Unknown command: {}", cmd)),
                },
            }
        }
        self.mode = AppMode::Normal;
    }

    pub fn cancel_command(&mut self) {
        self.mode = AppMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::compare;

    fn viewer(reference: &str, variant: &str, cols: usize) -> AppState {
        let comparison = compare(reference, variant).unwrap();
        let mut state = AppState::new(comparison, "ref", "var");
        state.update_viewport_size(cols);
        state
    }

    #[test]
    fn test_record_header() {
        let record = FastaRecord::new("seq1", "ACGT").with_description("human BRCA1");
        assert_eq!(record.header(), "seq1 human BRCA1");
        let record = record.with_raw_header("seq1\thuman  BRCA1");
        assert_eq!(record.header(), "seq1\thuman  BRCA1");
        assert_eq!(record.len(), 4);
        assert_eq!(record.slice(2..10), "GT");
    }

    #[test]
    fn test_marker_symbols() {
        assert_eq!(Marker::Match.symbol(), '|');
        assert_eq!(Marker::Mismatch.symbol(), '*');
        assert_eq!(Marker::ReferenceGap.symbol(), ' ');
        assert!(Marker::VariantGap.is_gap());
        assert!(!Marker::Mismatch.is_gap());
    }

    #[test]
    fn test_tally_counts_tags() {
        let mutations = vec![
            Mutation::Substitution { position: 1, reference: 'A', variant: 'G' },
            Mutation::Substitution { position: 4, reference: 'C', variant: 'T' },
            Mutation::Deletion { position: 6, length: 2, sequence: "AA".into() },
        ];
        let tally = MutationTally::from_mutations(&mutations);
        assert_eq!(tally, MutationTally { substitutions: 2, insertions: 0, deletions: 1 });
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_mutation_json_shape() {
        let sub = Mutation::Substitution { position: 13, reference: 'C', variant: 'A' };
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "substitution", "position": 13, "reference": "C", "variant": "A"})
        );

        let ins = Mutation::Insertion { position: 6, length: 2, sequence: "AA".into() };
        let json = serde_json::to_value(&ins).unwrap();
        assert_eq!(json["type"], "insertion");
        assert_eq!(json["length"], 2);
        assert_eq!(ins.columns(), 6..8);
    }

    #[test]
    fn test_viewer_mutation_navigation() {
        let mut state = viewer("ATGCGTACGT", "ATTCGTACCTAA", 4);
        assert_eq!(state.cursor, 0);

        state.next_mutation();
        assert_eq!(state.cursor, 2);
        assert_eq!(state.mutation_at_cursor(), Some(0));

        state.next_mutation();
        assert_eq!(state.cursor, 8);
        state.next_mutation();
        assert_eq!(state.cursor, 10);
        assert!(state.viewport.is_col_visible(10));

        state.next_mutation();
        assert_eq!(state.cursor, 10);
        assert_eq!(state.status_message.as_deref(), Some("No further mutation"));

        state.previous_mutation();
        assert_eq!(state.cursor, 8);
    }

    #[test]
    fn test_viewer_bounds() {
        let mut state = viewer("ACGTACGT", "ACGTACGT", 3);
        state.move_left();
        assert_eq!(state.cursor, 0);
        state.goto_last_column();
        assert_eq!(state.cursor, 7);
        assert_eq!(state.viewport.first_col, 5);
        state.move_right();
        assert_eq!(state.cursor, 7);
        state.page_left();
        assert_eq!(state.cursor, 4);
    }

    #[test]
    fn test_viewer_commands() {
        let mut state = viewer("ACGTACGT", "ACGTACGT", 3);
        state.enter_command_mode();
        state.command_input('5');
        state.execute_command();
        assert_eq!(state.cursor, 4);
        assert_eq!(state.mode, AppMode::Normal);

        state.enter_command_mode();
        state.command_input('9');
        state.execute_command();
        assert_eq!(state.status_message.as_deref(), Some("Invalid column: 9"));

        state.enter_command_mode();
        state.command_input('q');
        state.execute_command();
        assert!(state.should_quit);
    }
}
