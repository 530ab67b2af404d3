use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tutor_core::{LevelTransition, MultiplicationProblem, RowId};
use tutor_model::{ProgressMarker, QuestionBank};

use crate::types::PlayOutcome;

pub fn print_session_summary(outcome: &PlayOutcome) {
    println!("Questions: {}", outcome.source);
    println!(
        "Level {} in progress: {}",
        outcome.level + 1,
        markers_text(&outcome.progress)
    );
    if outcome.history.is_empty() {
        println!("No sets completed.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Set"),
        header_cell("Level"),
        header_cell("Answers"),
        header_cell("Score"),
        header_cell("Result"),
        header_cell("Next level"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for (number, summary) in outcome.history.iter().enumerate() {
        let markers: Vec<ProgressMarker> = summary
            .outcomes
            .iter()
            .map(|&correct| ProgressMarker::from_outcome(Some(correct)))
            .collect();
        table.add_row(vec![
            dim_cell(number + 1),
            Cell::new(summary.level + 1),
            Cell::new(markers_text(&markers)),
            Cell::new(format!("{}/{}", summary.correct_count, summary.outcomes.len())),
            transition_cell(summary.transition),
            Cell::new(summary.next_level + 1),
        ]);
    }
    println!("{table}");
}

/// Row breakdown printed by `decompose`.
pub fn print_rows_table(problem: &MultiplicationProblem) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Position"),
        header_cell("Digit"),
        header_cell("Expected"),
        header_cell("Length"),
        header_cell("Alignment"),
        header_cell("Fill"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    if problem.needs_carry_row() {
        table.add_row(vec![
            Cell::new(RowId::Carry).fg(Color::DarkGrey),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new(problem.carry_slots()),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    for partial in problem.partial_products() {
        table.add_row(vec![
            Cell::new(RowId::Partial(partial.digit_position)),
            Cell::new(partial.digit_position),
            Cell::new(partial.digit),
            Cell::new(&partial.expected_value),
            Cell::new(partial.expected_value.len()),
            Cell::new(partial.alignment),
            Cell::new(partial.alignment.fill_direction()),
        ]);
    }
    let product = problem
        .rows()
        .into_iter()
        .find(|row| row.id == RowId::Product);
    if let Some(row) = product {
        table.add_row(vec![
            Cell::new(row.id).add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new(&row.expected_value).add_attribute(Attribute::Bold),
            Cell::new(row.expected_value.len()),
            Cell::new(row.alignment),
            Cell::new(row.alignment.fill_direction()),
        ]);
    }
    println!("{table}");
}

/// Per-level counts printed by `fetch`.
pub fn print_bank_table(bank: &QuestionBank) {
    println!("Fingerprint: {}", bank.fingerprint());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Level"),
        header_cell("Questions"),
        header_cell("First"),
        header_cell("Largest product"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    let mut total = 0usize;
    for (level, questions) in bank.iter() {
        total += questions.len();
        let first = questions
            .first()
            .map_or_else(|| dim_cell("-"), Cell::new);
        let largest = questions
            .iter()
            .filter_map(|question| question.multiplicand.checked_mul(question.multiplier))
            .max()
            .map_or_else(|| dim_cell("-"), Cell::new);
        table.add_row(vec![
            Cell::new(level + 1),
            Cell::new(questions.len()),
            first,
            largest,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn markers_text(markers: &[ProgressMarker]) -> String {
    markers.iter().map(|marker| marker.symbol()).collect()
}

fn transition_cell(transition: LevelTransition) -> Cell {
    let color = match transition {
        LevelTransition::Promoted | LevelTransition::Wrapped => Color::Green,
        LevelTransition::HeldBack => Color::Yellow,
        LevelTransition::Regressed => Color::Red,
    };
    Cell::new(transition).fg(color)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
