//! Plain-text rendering of a solved worksheet.

use tutor_core::MultiplicationProblem;

/// Lays the problem out the way it is written on paper: operands,
/// partial products and the product, right-aligned under rules.
#[must_use]
pub fn render_worksheet(problem: &MultiplicationProblem) -> String {
    let multiplicand = problem.multiplicand().to_string();
    let multiplier = problem.multiplier().to_string();
    let partials: Vec<&str> = problem
        .partial_products()
        .iter()
        .map(|p| p.expected_value.as_str())
        .collect();
    let product = problem.final_product();

    let width = partials
        .iter()
        .map(|value| value.len())
        .chain([multiplicand.len(), multiplier.len() + 2, product.len()])
        .max()
        .unwrap_or(0);
    let rule = "-".repeat(width);

    let mut lines = vec![
        format!("{multiplicand:>width$}"),
        format!("×{multiplier:>w$}", w = width - 1),
        rule.clone(),
    ];
    if !partials.is_empty() {
        lines.extend(partials.iter().map(|value| format!("{value:>width$}")));
        lines.push(rule);
    }
    lines.push(format!("{product:>width$}"));
    lines.join("\n")
}

/// `11700 + 1404 = 13104 ✓`, or `7 × 8 = 56` for one-digit multipliers.
#[must_use]
pub fn partial_sum_line(problem: &MultiplicationProblem) -> String {
    let partials = problem.partial_products();
    if partials.is_empty() {
        return format!(
            "{} × {} = {}",
            problem.multiplicand(),
            problem.multiplier(),
            problem.final_product()
        );
    }
    let terms: Vec<&str> = partials.iter().map(|p| p.expected_value.as_str()).collect();
    let check = if problem.partial_sum().to_string() == problem.final_product() {
        "✓"
    } else {
        "✗"
    };
    format!("{} = {} {check}", terms.join(" + "), problem.partial_sum())
}
