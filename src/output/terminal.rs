// Colored terminal output for score reports.

use colored::Colorize;

use super::{truncate_chars, ScoreReport};

/// Display a set of score reports, with per-topic breakdowns where present.
pub fn display_reports(reports: &[ScoreReport], topics: &[Vec<String>]) {
    if reports.is_empty() {
        println!("No measures were run.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Topic Evaluation ({} topics) ===", topics.len()).bold()
    );
    println!();

    for report in reports {
        println!(
            "  {:<12} {:>10}  {}",
            report.measure.bold(),
            format_score(report.score),
            describe_params(report).dimmed()
        );

        for (i, value) in report.per_topic.iter().enumerate() {
            let preview = topics
                .get(i)
                .map(|t| truncate_chars(&t.join(" "), 60))
                .unwrap_or_default();
            println!(
                "      {:>3}. {:>10}  {}",
                i + 1,
                format_score(*value),
                preview.dimmed()
            );
        }
    }
    println!();
}

/// Format a score to four decimals, marking NaN as undefined.
pub fn format_score(score: f64) -> String {
    if score.is_nan() {
        "undefined".yellow().to_string()
    } else {
        format!("{score:.4}").bright_green().to_string()
    }
}

fn describe_params(report: &ScoreReport) -> String {
    let mut parts = vec![format!("topk={}", report.topk)];
    if let Some(weight) = report.weight {
        parts.push(format!("weight={weight}"));
    }
    if let Some(coherence) = &report.coherence {
        parts.push(format!("coherence={coherence}"));
    }
    parts.join(" ")
}
