//! Analyzer results and the aggregate they are merged into.
//!
//! Each analyzer hands back an [`Outcome`]: either its value or the reason it
//! produced nothing. The orchestrator collects those into [`AnalyzerResults`]
//! and builds one read-only [`InsightsAggregate`] from them, which is the only
//! thing the report and the serializer ever see.

use std::collections::BTreeMap;
use std::fmt;

use crate::categorical::CategoricalDistribution;
use crate::columns::ColumnRole;
use crate::keywords::KeywordThemes;
use crate::sentiment::SentimentSummary;
use crate::temporal::MonthlyDistribution;

/// Why an analyzer (or one of its optional outputs) contributed nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    UnresolvedColumn(ColumnRole),
    TooFewDocuments { found: usize },
    AnalysisFailure(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnresolvedColumn(role) => write!(f, "no {role} column found"),
            SkipReason::TooFewDocuments { found } => {
                write!(f, "need more than 2 subjects, found {found}")
            }
            SkipReason::AnalysisFailure(msg) => write!(f, "analysis failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Analyzed(T),
    Skipped(SkipReason),
}

impl<T> Outcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Analyzed(v) => Some(v),
            Outcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Outcome::Analyzed(_) => None,
            Outcome::Skipped(reason) => Some(reason),
        }
    }
}

/// Insight names, declared in report/serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InsightKey {
    TopKeywords,
    TfidfTerms,
    AvgSentiment,
    SentimentDistribution,
    StatusDistribution,
    PriorityDistribution,
    MonthlyDistribution,
}

impl InsightKey {
    pub const ALL: [InsightKey; 7] = [
        InsightKey::TopKeywords,
        InsightKey::TfidfTerms,
        InsightKey::AvgSentiment,
        InsightKey::SentimentDistribution,
        InsightKey::StatusDistribution,
        InsightKey::PriorityDistribution,
        InsightKey::MonthlyDistribution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InsightKey::TopKeywords => "top_keywords",
            InsightKey::TfidfTerms => "tfidf_terms",
            InsightKey::AvgSentiment => "avg_sentiment",
            InsightKey::SentimentDistribution => "sentiment_distribution",
            InsightKey::StatusDistribution => "status_distribution",
            InsightKey::PriorityDistribution => "priority_distribution",
            InsightKey::MonthlyDistribution => "monthly_distribution",
        }
    }

    pub fn from_name(name: &str) -> Option<InsightKey> {
        InsightKey::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for InsightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsightValue {
    /// Ranked `(term, count)` pairs.
    Pairs(Vec<(String, usize)>),
    Terms(Vec<String>),
    /// Label counts in display order.
    Distribution(Vec<(String, usize)>),
    Scalar(f64),
}

/// Everything the analyzers returned for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerResults {
    pub keywords: Outcome<KeywordThemes>,
    pub sentiment: Outcome<SentimentSummary>,
    pub status: Outcome<CategoricalDistribution>,
    pub priority: Outcome<CategoricalDistribution>,
    pub monthly: Outcome<MonthlyDistribution>,
}

impl AnalyzerResults {
    /// `(section, reason)` for every output that was not produced.
    pub fn skipped(&self) -> Vec<(&'static str, SkipReason)> {
        let mut skipped = Vec::new();
        let mut note = |section, reason: Option<&SkipReason>| {
            if let Some(reason) = reason {
                skipped.push((section, reason.clone()));
            }
        };
        note("keywords", self.keywords.skip_reason());
        if let Some(k) = self.keywords.value() {
            note("themes", k.themes.skip_reason());
        }
        note("sentiment", self.sentiment.skip_reason());
        note("status", self.status.skip_reason());
        note("priority", self.priority.skip_reason());
        note("monthly", self.monthly.skip_reason());
        skipped
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightsAggregate {
    entries: BTreeMap<InsightKey, InsightValue>,
}

impl InsightsAggregate {
    pub fn from_results(results: &AnalyzerResults) -> Self {
        let mut entries = BTreeMap::new();

        if let Some(k) = results.keywords.value() {
            entries.insert(InsightKey::TopKeywords, InsightValue::Pairs(k.keywords.clone()));
            if let Some(terms) = k.themes.value() {
                entries.insert(InsightKey::TfidfTerms, InsightValue::Terms(terms.terms.clone()));
            }
        }
        if let Some(s) = results.sentiment.value() {
            entries.insert(InsightKey::AvgSentiment, InsightValue::Scalar(s.average));
            entries.insert(
                InsightKey::SentimentDistribution,
                InsightValue::Distribution(s.distribution.entries()),
            );
        }
        if let Some(d) = results.status.value() {
            entries.insert(
                InsightKey::StatusDistribution,
                InsightValue::Distribution(d.counts.clone()),
            );
        }
        if let Some(d) = results.priority.value() {
            entries.insert(
                InsightKey::PriorityDistribution,
                InsightValue::Distribution(d.counts.clone()),
            );
        }
        if let Some(m) = results.monthly.value() {
            entries.insert(
                InsightKey::MonthlyDistribution,
                InsightValue::Distribution(m.months.iter().map(|(k, v)| (k.clone(), *v)).collect()),
            );
        }

        InsightsAggregate { entries }
    }

    /// Builds an aggregate from already-materialised entries, e.g. a parsed summary file.
    pub fn from_entries(entries: impl IntoIterator<Item = (InsightKey, InsightValue)>) -> Self {
        InsightsAggregate {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, key: InsightKey) -> Option<&InsightValue> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: InsightKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (InsightKey, &InsightValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
