//! TUI rendering of a comparison.
//!
//! Layout:
//! - Alignment panel: reference, marker and variant rows, with sticky row
//!   labels on the left and columns colored by their marker
//! - Mutation list, with the event under the cursor highlighted
//! - Status bar with mode, message and position

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::model::{AppMode, AppState, Marker};

/// Width reserved for row labels (including border and padding).
const NAME_PANEL_WIDTH: u16 = 14;
/// Minimum width for the alignment panel.
const MIN_SEQ_PANEL_WIDTH: u16 = 10;
/// Ruler, reference, markers, variant, plus borders.
const ALIGNMENT_PANEL_HEIGHT: u16 = 6;
const STATUS_BAR_HEIGHT: u16 = 1;

/// Background color for an alignment column.
pub fn marker_color(marker: Marker) -> Color {
    match marker {
        Marker::Match => Color::Green,
        Marker::Mismatch => Color::Red,
        Marker::ReferenceGap | Marker::VariantGap => Color::DarkGray,
    }
}

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(ALIGNMENT_PANEL_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(frame.area());

    let alignment_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(NAME_PANEL_WIDTH),
            Constraint::Min(MIN_SEQ_PANEL_WIDTH),
        ])
        .split(main_layout[0]);

    render_labels_panel(frame, state, alignment_layout[0]);
    render_alignment_panel(frame, state, alignment_layout[1]);
    render_mutation_list(frame, state, main_layout[1]);
    render_status_bar(frame, state, main_layout[2]);
}

fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() > max_len {
        let kept: String = label.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    } else {
        label.to_string()
    }
}

/// Renders the sticky row labels.
fn render_labels_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let max_len = NAME_PANEL_WIDTH.saturating_sub(3) as usize;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            truncate_label(&state.reference_label, max_len),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            truncate_label(&state.variant_label, max_len),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ];

    let block = Block::default().borders(Borders::ALL).title("Rows");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Builds the styled spans of one sequence row for the visible columns.
fn sequence_row<'a>(state: &AppState, sequence: &str, cols: std::ops::Range<usize>) -> Line<'a> {
    let markers = &state.comparison.alignment.markers;
    let bytes = sequence.as_bytes();

    let spans: Vec<Span> = cols
        .map(|col| {
            let c = bytes.get(col).map_or('-', |&b| b as char);
            let bg = marker_color(markers[col]);
            let style = if col == state.cursor {
                Style::default().fg(bg).bg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Black).bg(bg)
            };
            Span::styled(c.to_string(), style)
        })
        .collect();

    Line::from(spans)
}

/// Renders the alignment rows with colored columns.
fn render_alignment_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let alignment = &state.comparison.alignment;
    let start_col = state.viewport.first_col;
    let end_col = (start_col + state.viewport.visible_cols).min(alignment.len());
    let cols = start_col..end_col;

    let ruler: String = cols
        .clone()
        .map(|col| if (col + 1) % 10 == 0 { '+' } else { '.' })
        .collect();
    let marker_row: String = alignment.markers[cols.clone()].iter().map(|m| m.symbol()).collect();

    let lines = vec![
        Line::from(Span::styled(ruler, Style::default().fg(Color::DarkGray))),
        sequence_row(state, &alignment.seq1, cols.clone()),
        Line::from(Span::styled(marker_row, Style::default().fg(Color::Yellow))),
        sequence_row(state, &alignment.seq2, cols),
    ];

    let title = format!(
        "Alignment [Col: {} | View: {}-{}/{}]",
        state.cursor + 1,
        start_col + 1,
        end_col,
        alignment.len()
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the nucleotide and protein mutation lists.
fn render_mutation_list(frame: &mut Frame, state: &AppState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let alignment = &state.comparison.alignment;
    let items: Vec<ListItem> = alignment
        .mutations
        .iter()
        .map(|m| ListItem::new(m.to_string()))
        .collect();
    let title = format!("Mutations ({})", alignment.mutation_count());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
    let mut list_state = ListState::default().with_selected(state.mutation_at_cursor());
    frame.render_stateful_widget(list, halves[0], &mut list_state);

    let proteins = &state.comparison.protein_comparison;
    let items: Vec<ListItem> = proteins
        .protein_mutations
        .iter()
        .map(|m| ListItem::new(m.to_string()))
        .collect();
    let title = format!("Protein mutations ({})", proteins.protein_mutations.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, halves[1]);
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let (mode_str, command_str) = match &state.mode {
        AppMode::Normal => ("NORMAL", String::new()),
        AppMode::Command(cmd) => ("COMMAND", format!(":{}", cmd)),
    };

    let position_info = format!("Col {}/{} ", state.cursor + 1, state.alignment_length());
    let message = state.status_message.as_deref().unwrap_or("");

    let left_content = if command_str.is_empty() {
        format!(" {} | {} ", mode_str, message)
    } else {
        format!(" {} | {} ", mode_str, command_str)
    };

    let left_len = left_content.len();
    let status_line = Line::from(vec![
        Span::styled(left_content, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(
            " ".repeat((area.width as usize).saturating_sub(left_len + position_info.len())),
            Style::default().bg(Color::Cyan),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

/// Number of alignment columns that fit in a terminal of the given width.
pub fn calculate_visible_columns(terminal_width: u16) -> usize {
    // Account for the label panel and the alignment panel borders
    terminal_width.saturating_sub(NAME_PANEL_WIDTH + 2) as usize
}
