//! Formatted terminal output.
//!
//! Formatting lives here so the fitting and integration code stays free of
//! presentation concerns, and output changes stay local.

use crate::domain::{DatasetStats, FittedModel, IntegralResult};
use crate::fit::FamilyRanking;
use crate::io::RowError;

/// Rejected rows listed individually before the rest are summarized.
const MAX_LISTED_ROW_ERRORS: usize = 10;

/// Dataset summary + fitted model.
pub fn format_fit_summary(
    source: &str,
    stats: &DatasetStats,
    row_errors: &[RowError],
    model: &FittedModel,
) -> String {
    let mut out = String::new();

    out.push_str("=== fitint - curve fit ===\n");
    out.push_str(&format_dataset(source, stats));
    out.push_str(&format_row_errors(row_errors));

    out.push_str("\nModel:\n");
    out.push_str(&format!("- family      : {}\n", model.family.display_name()));
    out.push_str(&format!("- coefficients: {}\n", fmt_vec(&model.coefficients)));
    out.push_str(&format!(
        "- R²          : {:.6} (SSE={:.6}, RMSE={:.6}, n={})\n",
        model.quality.r_squared, model.quality.sse, model.quality.rmse, model.quality.n
    ));
    out.push_str(&format!("- expression  : {}\n", model.expression));

    out
}

/// Integration result block.
pub fn format_integral(integral: &IntegralResult) -> String {
    format!(
        "\nIntegral over [{}, {}] (N={}): {}\n",
        integral.lower, integral.upper, integral.subdivisions, integral.value
    )
}

/// Family comparison table, best first, followed by skipped families.
pub fn format_ranking(source: &str, stats: &DatasetStats, ranking: &FamilyRanking) -> String {
    let mut out = String::new();

    out.push_str("=== fitint - family ranking ===\n");
    out.push_str(&format_dataset(source, stats));
    out.push('\n');

    out.push_str(&format!("{:<4} {:<22} {:>12} {:>14}  {}\n", "rank", "family", "R²", "SSE", "expression"));
    out.push_str(&format!("{:-<4} {:-<22} {:->12} {:->14}  {:-<10}\n", "", "", "", "", ""));
    for (i, model) in ranking.ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<22} {:>12.6} {:>14.6}  {}\n",
            i + 1,
            model.family.display_name(),
            model.quality.r_squared,
            model.quality.sse,
            model.expression
        ));
    }

    for (family, reason) in &ranking.skipped {
        out.push_str(&format!("  (skipped {}) {reason}\n", family.display_name()));
    }

    out
}

fn format_dataset(source: &str, stats: &DatasetStats) -> String {
    format!(
        "Data: {source}\nPoints: n={} | x=[{}, {}] | y=[{}, {}]\n",
        stats.n_points, stats.x_min, stats.x_max, stats.y_min, stats.y_max
    )
}

fn format_row_errors(row_errors: &[RowError]) -> String {
    if row_errors.is_empty() {
        return String::new();
    }
    let mut out = format!("Skipped rows: {}\n", row_errors.len());
    for e in row_errors.iter().take(MAX_LISTED_ROW_ERRORS) {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    if row_errors.len() > MAX_LISTED_ROW_ERRORS {
        out.push_str(&format!("  ... and {} more\n", row_errors.len() - MAX_LISTED_ROW_ERRORS));
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitOptions, ModelFamily, SamplePair};
    use crate::error::FitError;
    use crate::fit::{fit, rank_families};

    fn line_samples() -> Vec<SamplePair> {
        [(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]
            .into_iter()
            .map(SamplePair::from)
            .collect()
    }

    #[test]
    fn summary_lists_model_and_row_errors() {
        let samples = line_samples();
        let stats = DatasetStats::from_samples(&samples).unwrap();
        let model = fit(&samples, ModelFamily::Linear).unwrap();
        let errors = vec![RowError {
            line: 4,
            message: "Blank `y`".to_string(),
        }];

        let txt = format_fit_summary("test.csv", &stats, &errors, &model);
        assert!(txt.contains("Data: test.csv\n"));
        assert!(txt.contains("Points: n=3 | x=[1, 3] | y=[3, 7]\n"));
        assert!(txt.contains("Skipped rows: 1\n  line 4: Blank `y`\n"));
        assert!(txt.contains(&format!("- expression  : {}\n", model.expression)));
        assert!(txt.contains("R²          : 1.000000"));
    }

    #[test]
    fn long_row_error_lists_are_truncated() {
        let errors: Vec<RowError> = (0..13)
            .map(|i| RowError {
                line: i + 2,
                message: "bad".to_string(),
            })
            .collect();
        let txt = format_row_errors(&errors);
        assert_eq!(txt.lines().count(), 1 + MAX_LISTED_ROW_ERRORS + 1);
        assert!(txt.ends_with("  ... and 3 more\n"));
    }

    #[test]
    fn integral_block() {
        let txt = format_integral(&IntegralResult {
            lower: 0.0,
            upper: 3.0,
            subdivisions: 1000,
            value: 9.0,
        });
        assert_eq!(txt, "\nIntegral over [0, 3] (N=1000): 9\n");
    }

    #[test]
    fn ranking_table_orders_rows_and_lists_skips() {
        let samples = line_samples();
        let stats = DatasetStats::from_samples(&samples).unwrap();
        let mut ranking = rank_families(&samples, 2, &FitOptions::default());
        ranking
            .skipped
            .push((ModelFamily::Polynomial(9), FitError::InvalidOrder(11)));

        let txt = format_ranking("inline", &stats, &ranking);
        let rank_one = txt
            .lines()
            .find(|l| l.starts_with("1 "))
            .unwrap_or_default()
            .to_string();
        let best = ranking.best().unwrap();
        assert!(rank_one.contains(&best.family.display_name()));
        assert!(txt.contains("(skipped polynomial (order 9))"));
    }
}
