//! Polarity of ticket subjects.

use std::fmt;

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::AnalysisOptions;
use crate::columns::ColumnRole;
use crate::insights::{Outcome, SkipReason};
use crate::table::Table;

/// Scores a piece of text in `[-1.0, 1.0]`.
pub trait PolarityScorer: Sync {
    fn score(&self, text: &str) -> f64;
}

/// VADER compound score: the valence lexicon with its booster, negation,
/// contrast and punctuation rules, normalised into `[-1.0, 1.0]`.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl Default for VaderScorer {
    fn default() -> Self {
        VaderScorer {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl fmt::Debug for VaderScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaderScorer")
    }
}

impl PolarityScorer for VaderScorer {
    fn score(&self, text: &str) -> f64 {
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentDistribution {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn entries(&self) -> Vec<(String, usize)> {
        vec![
            ("positive".to_string(), self.positive),
            ("neutral".to_string(), self.neutral),
            ("negative".to_string(), self.negative),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentSummary {
    pub column: String,
    pub average: f64,
    pub distribution: SentimentDistribution,
}

/// Buckets scores; `threshold` is inclusive on the neutral side.
pub fn bucket_scores(scores: &[f64], threshold: f64) -> SentimentDistribution {
    let mut dist = SentimentDistribution::default();
    for &s in scores {
        if s > threshold {
            dist.positive += 1;
        } else if s < -threshold {
            dist.negative += 1;
        } else {
            dist.neutral += 1;
        }
    }
    dist
}

pub fn analyze_sentiment(
    table: &Table,
    column: Option<&str>,
    scorer: &dyn PolarityScorer,
    opts: &AnalysisOptions,
) -> Outcome<SentimentSummary> {
    let Some((column, subjects)) = column.and_then(|c| table.text_values(c).map(|v| (c, v)))
    else {
        return Outcome::Skipped(SkipReason::UnresolvedColumn(ColumnRole::Subject));
    };

    let scores: Vec<f64> = subjects.iter().map(|s| scorer.score(s)).collect();
    let average = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    Outcome::Analyzed(SentimentSummary {
        column: column.to_string(),
        average,
        distribution: bucket_scores(&scores, opts.sentiment_threshold),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn neutral_without_lexicon_words() {
        assert_eq!(VaderScorer::default().score("Invoice 1234 for March"), 0.0);
    }

    #[test]
    fn polar_subjects_leave_the_neutral_band() {
        let scorer = VaderScorer::default();
        for positive in ["Wonderful experience", "Great support, thanks!"] {
            assert!(scorer.score(positive) > 0.1, "{positive}");
        }
        for negative in [
            "Unhappy with service",
            "Disappointing response time",
            "Terrible delay",
        ] {
            assert!(scorer.score(negative) < -0.1, "{negative}");
        }
    }

    #[test]
    fn booster_scales() {
        let scorer = VaderScorer::default();
        assert!(scorer.score("very good") > scorer.score("good"));
    }

    #[test]
    fn negation_flips() {
        let scorer = VaderScorer::default();
        assert!(scorer.score("good") > 0.0);
        assert!(scorer.score("not good") < 0.0);
    }

    #[test]
    fn scores_stay_in_range() {
        let scorer = VaderScorer::default();
        for text in [
            "absolutely perfect best excellent awesome!!!",
            "WORST. TERRIBLE. HORRIBLE. AWFUL!!!",
        ] {
            assert!((-1.0..=1.0).contains(&scorer.score(text)), "{text}");
        }
    }

    #[test]
    fn buckets_use_inclusive_neutral_band() {
        let dist = bucket_scores(&[0.1, -0.1, 0.11, -0.11, 0.0], 0.1);
        assert_eq!(
            dist,
            SentimentDistribution {
                positive: 1,
                neutral: 3,
                negative: 1
            }
        );
        assert_eq!(dist.total(), 5);
    }

    #[test]
    fn buckets_sum_to_scored_subjects() {
        let table = Table::from_rows(
            vec!["Subject".into()],
            vec![
                vec![Some(Cell::Text("Great help".into()))],
                vec![None],
                vec![Some(Cell::Text("Terrible delay".into()))],
                vec![Some(Cell::Text("Invoice for March".into()))],
            ],
        );
        let scorer = VaderScorer::default();
        let summary = analyze_sentiment(
            &table,
            Some("Subject"),
            &scorer,
            &AnalysisOptions::default(),
        );
        let summary = summary.value().unwrap();
        assert_eq!(summary.distribution.total(), 3);
        assert_eq!(summary.distribution.neutral, 1);
    }

    #[test]
    fn empty_column_averages_zero() {
        let table = Table::from_rows(vec!["Subject".into()], Vec::new());
        let scorer = VaderScorer::default();
        let summary = analyze_sentiment(
            &table,
            Some("Subject"),
            &scorer,
            &AnalysisOptions::default(),
        );
        assert_eq!(summary.value().unwrap().average, 0.0);
    }
}
