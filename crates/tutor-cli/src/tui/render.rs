//! Drawing the worksheet with ratatui.

use std::time::Instant;

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tutor_core::{CellMark, DigitRow, RowId, Step, StepSequencer};
use tutor_model::{Digit, ProgressMarker};

use super::app::{App, CellHit, Tone};

const CELL_WIDTH: u16 = 3;
const HELP: &str =
    "0-9 type · ←/→ move · Tab/Shift-Tab row · Enter submit · g give up · n next · r refresh · q quit";

/// Draws one frame and returns the screen position of every input cell.
pub fn draw(frame: &mut Frame, app: &App, now: Instant) -> Vec<CellHit> {
    let [header, body, status, help] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, app);
    let hits = render_worksheet(frame, body, app.session().sequencer(), now);
    render_status(frame, status, app);
    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        help,
    );
    hits
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let index = session.controller().current_index();
    let mut spans = vec![
        Span::styled(
            format!("Level {}/{}", session.level() + 1, session.max_level() + 1),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  Question {}/10  ", index + 1)),
    ];
    for (i, marker) in session.progress().iter().enumerate() {
        let style = match marker {
            ProgressMarker::Correct => Style::default().fg(Color::Green),
            ProgressMarker::Incorrect => Style::default().fg(Color::Red),
            ProgressMarker::Unanswered => Style::default().fg(Color::DarkGray),
        };
        let style = if i == index {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        };
        spans.push(Span::styled(format!("{} ", marker.symbol()), style));
    }
    let source = if app.is_refreshing() {
        format!("  source: {} (auto-refresh)", session.provider_label())
    } else {
        format!("  source: {}", session.provider_label())
    };
    spans.push(Span::styled(source, Style::default().fg(Color::DarkGray)));
    let cache = app.cache();
    if cache.last_error().is_some() {
        spans.push(Span::styled(
            "  refresh failed",
            Style::default().fg(Color::Red),
        ));
    } else if let Some(at) = cache.last_refresh() {
        let updated = format!("  updated {}", at.format("%H:%M UTC"));
        if app.source_is_stale(Utc::now()) {
            spans.push(Span::styled(
                format!("{updated} (stale)"),
                Style::default().fg(Color::Yellow),
            ));
        } else {
            spans.push(Span::styled(updated, Style::default().fg(Color::DarkGray)));
        }
    }

    let block = Block::default().borders(Borders::ALL).title("Long multiplication");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Columns needed so every row fits right-aligned.
fn grid_columns(sequencer: &StepSequencer) -> usize {
    let problem = sequencer.problem();
    let multiplier_digits = problem.multiplier().to_string().len() + 1;
    sequencer
        .partial_rows()
        .map(|(_, row)| row.len())
        .chain([
            sequencer.product_row().len(),
            problem.multiplicand().to_string().len(),
            multiplier_digits,
            sequencer.carry().map_or(0, |carry| carry.len()),
        ])
        .max()
        .unwrap_or(1)
}

struct Grid {
    left: u16,
    columns: usize,
}

impl Grid {
    /// Screen x of the first cell of a right-aligned row of `len` cells.
    fn row_x(&self, len: usize) -> u16 {
        self.left + (self.columns.saturating_sub(len) as u16) * CELL_WIDTH
    }

    fn pad(&self, len: usize) -> Span<'static> {
        Span::raw(" ".repeat(self.columns.saturating_sub(len) * CELL_WIDTH as usize))
    }
}

fn render_worksheet(
    frame: &mut Frame,
    area: Rect,
    sequencer: &StepSequencer,
    now: Instant,
) -> Vec<CellHit> {
    let problem = sequencer.problem();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} × {}", problem.multiplicand(), problem.multiplier()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = grid_columns(sequencer);
    let width = columns as u16 * CELL_WIDTH;
    let grid = Grid {
        left: inner.x + inner.width.saturating_sub(width) / 2,
        columns,
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut hits = Vec::new();
    let mut cursor = None;
    let focus = sequencer.focus();
    let mut y = inner.y;

    if let Some(carry) = sequencer.carry() {
        let flash = carry.flash_index(now);
        let active = if focus == RowId::Carry {
            carry.active_index()
        } else {
            None
        };
        let x = grid.row_x(carry.len());
        let mut spans = vec![grid.pad(carry.len())];
        for (index, cell) in carry.cells().iter().enumerate() {
            let mut style = Style::default().fg(Color::DarkGray);
            if flash == Some(index) {
                style = style.bg(Color::Yellow).fg(Color::Black);
            }
            if active == Some(index) {
                style = style.add_modifier(Modifier::REVERSED);
                cursor = Some((x + index as u16 * CELL_WIDTH + 1, y));
            }
            spans.push(Span::styled(boxed(*cell), style));
            hits.push(hit(x, y, index, RowId::Carry));
        }
        lines.push(Line::from(spans));
        y += 1;
    }

    let multiplicand = problem.multiplicand().to_string();
    lines.push(static_line(&grid, None, &multiplicand));
    let multiplier = problem.multiplier().to_string();
    lines.push(static_line(&grid, Some('×'), &multiplier));
    lines.push(rule(&grid));
    y += 3;

    let partials: Vec<(RowId, &DigitRow)> = sequencer.partial_rows().collect();
    for (id, row) in &partials {
        lines.push(answer_line(&grid, *id, row, focus, y, &mut hits, &mut cursor));
        y += 1;
    }
    if !partials.is_empty() {
        lines.push(rule(&grid));
        y += 1;
    }
    let product = sequencer.product_row();
    lines.push(answer_line(
        &grid,
        RowId::Product,
        product,
        focus,
        y,
        &mut hits,
        &mut cursor,
    ));

    lines.push(Line::raw(""));
    if sequencer.step() == Step::AllSubmitted {
        lines.push(
            Line::styled(
                "Correct!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        );
    }

    let sheet = Rect::new(grid.left, inner.y, width.min(inner.width), inner.height);
    frame.render_widget(Paragraph::new(lines), sheet);
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
    hits
}

fn answer_line(
    grid: &Grid,
    id: RowId,
    row: &DigitRow,
    focus: RowId,
    y: u16,
    hits: &mut Vec<CellHit>,
    cursor: &mut Option<(u16, u16)>,
) -> Line<'static> {
    let x = grid.row_x(row.len());
    let active = if focus == id { row.active_index() } else { None };
    let mut spans = vec![grid.pad(row.len())];
    for (index, cell) in row.cells().iter().enumerate() {
        let mut style = match row.cell_mark(index) {
            CellMark::Correct => Style::default().fg(Color::Green),
            CellMark::Incorrect => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            CellMark::Unchecked => Style::default(),
        };
        if active == Some(index) {
            style = style.add_modifier(Modifier::REVERSED);
            *cursor = Some((x + index as u16 * CELL_WIDTH + 1, y));
        }
        spans.push(Span::styled(boxed(*cell), style));
        hits.push(hit(x, y, index, id));
    }
    Line::from(spans)
}

fn static_line(grid: &Grid, sign: Option<char>, digits: &str) -> Line<'static> {
    let mut text = " ".repeat(grid.columns.saturating_sub(digits.len()) * CELL_WIDTH as usize);
    if let Some(sign) = sign {
        text.replace_range(1..2, &sign.to_string());
    }
    for c in digits.chars() {
        text.push(' ');
        text.push(c);
        text.push(' ');
    }
    Line::styled(text, Style::default().add_modifier(Modifier::BOLD))
}

fn rule(grid: &Grid) -> Line<'static> {
    Line::raw("─".repeat(grid.columns * CELL_WIDTH as usize))
}

fn boxed(cell: Option<Digit>) -> String {
    format!("[{}]", cell.map_or(' ', Digit::as_char))
}

fn hit(x: u16, y: u16, index: usize, row: RowId) -> CellHit {
    CellHit {
        area: Rect::new(x + index as u16 * CELL_WIDTH, y, CELL_WIDTH, 1),
        row,
        index,
    }
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = match app.notice() {
        Some(notice) => {
            let color = match notice.tone {
                Tone::Info => Color::Cyan,
                Tone::Success => Color::Green,
                Tone::Problem => Color::Red,
            };
            (notice.text.clone(), Style::default().fg(color))
        }
        None => (
            "Fill in the rows, then press Enter to check.".to_string(),
            Style::default(),
        ),
    };
    let paragraph = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
