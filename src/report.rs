//! Plain-text rendering of an [`InsightsAggregate`].

use std::fmt::Write as _;

use crate::AnalysisOptions;
use crate::insights::{InsightKey, InsightValue, InsightsAggregate};

const RULE: usize = 70;
const SECTION_RULE: usize = 50;

/// Renders the report. Sections whose insight is missing or empty are left out.
pub fn render_report(insights: &InsightsAggregate, opts: &AnalysisOptions) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "TICKET ANALYSIS REPORT");
    let _ = writeln!(out, "{rule}");

    if let Some(InsightValue::Pairs(keywords)) = insights.get(InsightKey::TopKeywords) {
        if !keywords.is_empty() {
            section(&mut out, "TOP KEYWORDS IN TICKET SUBJECTS");
            for (term, count) in keywords.iter().take(opts.report_keywords) {
                let _ = writeln!(out, "  - {term}: {count} mentions");
            }
        }
    }

    if let Some(InsightValue::Terms(terms)) = insights.get(InsightKey::TfidfTerms) {
        if !terms.is_empty() {
            section(&mut out, "KEY THEMES IDENTIFIED");
            for (i, term) in terms.iter().take(opts.report_themes).enumerate() {
                let _ = writeln!(out, "  {}. {term}", i + 1);
            }
        }
    }

    if let Some(InsightValue::Distribution(dist)) = insights.get(InsightKey::SentimentDistribution)
    {
        if !dist.is_empty() {
            section(&mut out, "SENTIMENT ANALYSIS");
            let total: usize = dist.iter().map(|(_, n)| n).sum();
            for (label, title) in [
                ("positive", "Positive"),
                ("neutral", "Neutral"),
                ("negative", "Negative"),
            ] {
                let count = lookup(dist, label);
                let _ = writeln!(out, "  - {title}: {count} ({:.1}%)", percent(count, total));
            }
            let average = match insights.get(InsightKey::AvgSentiment) {
                Some(InsightValue::Scalar(v)) => *v,
                _ => 0.0,
            };
            let _ = writeln!(out, "  - Average Sentiment Score: {average:.2}");
        }
    }

    for (key, title) in [
        (InsightKey::StatusDistribution, "TICKET STATUS DISTRIBUTION"),
        (InsightKey::PriorityDistribution, "TICKET PRIORITY DISTRIBUTION"),
    ] {
        if let Some(InsightValue::Distribution(dist)) = insights.get(key) {
            if !dist.is_empty() {
                section(&mut out, title);
                for (label, count) in dist {
                    let _ = writeln!(out, "  - {label}: {count}");
                }
            }
        }
    }

    if let Some(InsightValue::Distribution(months)) = insights.get(InsightKey::MonthlyDistribution)
    {
        if !months.is_empty() {
            section(&mut out, "TICKETS BY MONTH");
            let mut sorted: Vec<&(String, usize)> = months.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            let skip = sorted.len().saturating_sub(opts.report_months);
            for (month, count) in sorted.into_iter().skip(skip) {
                let _ = writeln!(out, "  - {month}: {count}");
            }
        }
    }

    let _ = writeln!(out);
    let _ = write!(out, "{rule}");
    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}:");
    let _ = writeln!(out, "{}", "-".repeat(SECTION_RULE));
}

fn lookup(dist: &[(String, usize)], label: &str) -> usize {
    dist.iter()
        .find(|(l, _)| l == label)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(items: &[(&str, usize)]) -> InsightValue {
        InsightValue::Distribution(items.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    #[test]
    fn sections_follow_fixed_order() {
        let agg = InsightsAggregate::from_entries([
            (InsightKey::MonthlyDistribution, dist(&[("2024-01", 3)])),
            (InsightKey::StatusDistribution, dist(&[("open", 2)])),
            (
                InsightKey::TopKeywords,
                InsightValue::Pairs(vec![("login".to_string(), 2)]),
            ),
            (InsightKey::TfidfTerms, InsightValue::Terms(vec!["login".to_string()])),
        ]);
        let report = render_report(&agg, &AnalysisOptions::default());
        let keywords = report.find("TOP KEYWORDS").unwrap();
        let themes = report.find("KEY THEMES").unwrap();
        let status = report.find("TICKET STATUS").unwrap();
        let monthly = report.find("TICKETS BY MONTH").unwrap();
        assert!(keywords < themes && themes < status && status < monthly);
        assert!(!report.contains("PRIORITY"));
        assert!(!report.contains("SENTIMENT"));
        assert!(report.contains("  - login: 2 mentions"));
        assert!(report.contains("  1. login"));
    }

    #[test]
    fn sentiment_percentages_and_average() {
        let agg = InsightsAggregate::from_entries([
            (InsightKey::AvgSentiment, InsightValue::Scalar(-0.126)),
            (
                InsightKey::SentimentDistribution,
                dist(&[("positive", 1), ("neutral", 1), ("negative", 1)]),
            ),
        ]);
        let report = render_report(&agg, &AnalysisOptions::default());
        assert!(report.contains("  - Positive: 1 (33.3%)"));
        assert!(report.contains("  - Average Sentiment Score: -0.13"));
    }

    #[test]
    fn zero_total_sentiment_is_zero_percent() {
        let agg = InsightsAggregate::from_entries([
            (InsightKey::AvgSentiment, InsightValue::Scalar(0.0)),
            (
                InsightKey::SentimentDistribution,
                dist(&[("positive", 0), ("neutral", 0), ("negative", 0)]),
            ),
        ]);
        let report = render_report(&agg, &AnalysisOptions::default());
        assert!(report.contains("  - Neutral: 0 (0.0%)"));
    }

    #[test]
    fn only_last_six_months_ascending() {
        let months: Vec<(String, usize)> = (1..=9).map(|m| (format!("2024-{m:02}"), m)).collect();
        let mut shuffled = months.clone();
        shuffled.reverse();
        let agg = InsightsAggregate::from_entries([(
            InsightKey::MonthlyDistribution,
            InsightValue::Distribution(shuffled),
        )]);
        let report = render_report(&agg, &AnalysisOptions::default());
        assert!(!report.contains("2024-03"));
        let shown: Vec<usize> = (4..=9)
            .map(|m| report.find(&format!("2024-{m:02}")).unwrap())
            .collect();
        assert!(shown.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let agg = InsightsAggregate::from_entries([(
            InsightKey::TopKeywords,
            InsightValue::Pairs(Vec::new()),
        )]);
        let report = render_report(&agg, &AnalysisOptions::default());
        assert!(!report.contains("TOP KEYWORDS"));
        assert!(report.starts_with(&"=".repeat(70)));
        assert!(report.ends_with(&"=".repeat(70)));
    }
}
