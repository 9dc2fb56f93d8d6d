//! # ticket_insights
//!
//! Descriptive analytics over an exported table of support tickets: frequent
//! subject keywords, TF-IDF theme terms, subject sentiment, status and
//! priority mix, and monthly volume.
//!
//! The pipeline is
//! [`TicketSource`] -> [`load_table`] -> [`ResolvedColumns`] -> four independent
//! analyzers -> [`InsightsAggregate`] -> [`render_report`] / [`write_insights`].
//!
//! ```no_run
//! use ticket_insights::{AnalysisOptions, ExplicitPath, run_pipeline};
//!
//! let opts = AnalysisOptions::default();
//! let run = run_pipeline(&ExplicitPath("tickets.csv".into()), &opts).unwrap();
//! println!("{}", ticket_insights::render_report(&run.insights, &opts));
//! ```

pub mod categorical;
pub mod columns;
pub mod error;
pub mod export;
pub mod insights;
pub mod keywords;
pub mod office;
pub mod report;
pub mod sentiment;
pub mod source;
pub mod table;
pub mod temporal;

use std::path::PathBuf;

use log::warn;

pub use categorical::{CategoricalDistribution, analyze_categorical};
pub use columns::{ColumnRole, ResolvedColumns, resolve_column};
pub use error::{InsightsError, Result};
pub use export::{DEFAULT_OUTPUT_NAME, output_path, parse_insights, read_insights, write_insights};
pub use insights::{
    AnalyzerResults, InsightKey, InsightValue, InsightsAggregate, Outcome, SkipReason,
};
pub use keywords::{KeywordThemes, ThemeTerms, analyze_keywords};
pub use report::render_report;
pub use sentiment::{VaderScorer, PolarityScorer, SentimentSummary, analyze_sentiment};
pub use source::{DirectorySearch, ExplicitPath, TicketSource};
pub use table::{Cell, Column, Table, load_table};
pub use temporal::{MonthlyDistribution, analyze_monthly};

/// Tunables shared by the analyzers, the report and the summary writer.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Keywords stored in the summary.
    pub keyword_limit: usize,
    /// Vocabulary size of the theme model.
    pub theme_limit: usize,
    pub report_keywords: usize,
    pub report_themes: usize,
    pub report_months: usize,
    /// Scores strictly beyond +/- this value are positive/negative.
    pub sentiment_threshold: f64,
    /// Run the analyzers on the rayon pool.
    pub parallel: bool,
    /// Summary file name, joined onto the input file's directory.
    pub output_name: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            keyword_limit: 15,
            theme_limit: 20,
            report_keywords: 10,
            report_themes: 8,
            report_months: 6,
            sentiment_threshold: 0.1,
            parallel: true,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

/// Everything one analysis produced.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub input: PathBuf,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub resolved: ResolvedColumns,
    pub results: AnalyzerResults,
    pub insights: InsightsAggregate,
    /// `(section, reason)` for every section that was not produced.
    pub skipped: Vec<(&'static str, SkipReason)>,
    /// Summary file, once written.
    pub output: Option<PathBuf>,
}

/// Runs the four analyzers over an already loaded table.
pub fn analyze_table(table: &Table, opts: &AnalysisOptions) -> AnalyzerResults {
    let resolved = ResolvedColumns::resolve(table);
    analyze_table_with(table, &resolved, &VaderScorer::default(), opts)
}

/// Runs the analyzers against the given column bindings.
pub fn analyze_table_with(
    table: &Table,
    resolved: &ResolvedColumns,
    scorer: &dyn PolarityScorer,
    opts: &AnalysisOptions,
) -> AnalyzerResults {
    let subject = resolved.get(ColumnRole::Subject);

    let keywords = || analyze_keywords(table, subject, opts);
    let sentiment = || analyze_sentiment(table, subject, scorer, opts);
    let categorical = || {
        (
            analyze_categorical(table, ColumnRole::Status, resolved.get(ColumnRole::Status)),
            analyze_categorical(
                table,
                ColumnRole::Priority,
                resolved.get(ColumnRole::Priority),
            ),
        )
    };
    let monthly = || analyze_monthly(table, resolved.get(ColumnRole::Date));

    let ((keywords, sentiment), ((status, priority), monthly)) = if opts.parallel {
        rayon::join(
            || rayon::join(keywords, sentiment),
            || rayon::join(categorical, monthly),
        )
    } else {
        ((keywords(), sentiment()), (categorical(), monthly()))
    };

    AnalyzerResults {
        keywords,
        sentiment,
        status,
        priority,
        monthly,
    }
}

/// Locates, loads and analyzes the ticket file, then writes the summary
/// beside it. Load and write failures are fatal; analyzer skips are not.
pub fn run_pipeline(source: &dyn TicketSource, opts: &AnalysisOptions) -> Result<PipelineRun> {
    let input = source.locate()?;
    let table = load_table(&input)?;
    let mut run = run_on_table(input, &table, opts);
    let target = output_path(&run.input, &opts.output_name);
    run.output = Some(write_insights(&run.insights, &target)?);
    Ok(run)
}

/// Analysis without persisting anything.
pub fn run_on_table(input: PathBuf, table: &Table, opts: &AnalysisOptions) -> PipelineRun {
    let resolved = ResolvedColumns::resolve(table);
    let results = analyze_table_with(table, &resolved, &VaderScorer::default(), opts);
    let insights = InsightsAggregate::from_results(&results);
    let skipped = results.skipped();
    for (section, reason) in &skipped {
        warn!("Skipping {section}: {reason}");
    }

    PipelineRun {
        input,
        row_count: table.row_count(),
        columns: table
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        resolved,
        results,
        insights,
        skipped,
        output: None,
    }
}
