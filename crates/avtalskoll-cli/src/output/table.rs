use avtalskoll_core::checks::CheckOutcome;

/// Widest a column may grow before its text is cut.
const MAX_WIDTH: usize = 40;

pub fn print(outcome: &CheckOutcome) {
    let report = &outcome.report;
    println!("=== {} ===\n", report.check.title());
    println!("  {}\n", outcome.summary);

    if report.is_empty() {
        return;
    }

    let cells: Vec<Vec<String>> = report
        .deviations
        .iter()
        .map(|d| {
            report
                .columns
                .iter()
                .map(|c| d.get(c).map(|v| v.to_string()).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = report
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain([name.chars().count()])
                .max()
                .unwrap_or(0)
                .min(MAX_WIDTH)
        })
        .collect();

    let header: Vec<String> = report
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, w)| format!("{:<w$}", clip(name, *w), w = *w))
        .collect();
    println!("  {}", header.join("  ").trim_end());

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("  {}", rule.join("  "));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, w)| format!("{:<w$}", clip(value, *w), w = *w))
            .collect();
        println!("  {}", line.join("  ").trim_end());
    }
}

/// Cut `text` to at most `width` characters, marking the cut with "~".
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}
