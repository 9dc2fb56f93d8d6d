//! Subject keywords and TF-IDF themes.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::AnalysisOptions;
use crate::columns::ColumnRole;
use crate::insights::{Outcome, SkipReason};
use crate::table::Table;

/// Whole-word fillers removed before keyword counting.
static FILLERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(the|a|an|and|or|is|in|to|for|of|on|with|at|from)\b")
        .expect("static filler pattern")
});

/// Two or more word characters, the usual vectorizer token.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("static token pattern"));

const TRIM_CHARS: &[char] = &['.', ',', '!', '?', ';', ':', '"'];

/// English stopwords excluded from theme terms.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

static STOP_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// Vocabulary kept by the theme model, alphabetical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeTerms {
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordThemes {
    pub column: String,
    /// `(term, count)`, most frequent first.
    pub keywords: Vec<(String, usize)>,
    pub themes: Outcome<ThemeTerms>,
}

pub fn analyze_keywords(
    table: &Table,
    column: Option<&str>,
    opts: &AnalysisOptions,
) -> Outcome<KeywordThemes> {
    let Some(column) = column else {
        return Outcome::Skipped(SkipReason::UnresolvedColumn(ColumnRole::Subject));
    };
    let Some(subjects) = table.text_values(column) else {
        return Outcome::Skipped(SkipReason::UnresolvedColumn(ColumnRole::Subject));
    };

    let keywords = top_keywords(&subjects, opts.keyword_limit);
    let themes = if subjects.len() > 2 {
        match fit_themes(&subjects, opts.theme_limit) {
            Ok(themes) => Outcome::Analyzed(themes),
            Err(e) => Outcome::Skipped(SkipReason::AnalysisFailure(e)),
        }
    } else {
        Outcome::Skipped(SkipReason::TooFewDocuments {
            found: subjects.len(),
        })
    };

    Outcome::Analyzed(KeywordThemes {
        column: column.to_string(),
        keywords,
        themes,
    })
}

/// Counts meaningful subject words. Ties keep the order words were first seen.
pub fn top_keywords(subjects: &[String], limit: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for subject in subjects {
        let cleaned = FILLERS.replace_all(subject, "");
        for word in cleaned.split_whitespace() {
            let trimmed = word.trim_matches(TRIM_CHARS);
            if trimmed.chars().count() <= 3 {
                continue;
            }
            let word = trimmed.to_lowercase();
            match index.get(&word) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(word.clone(), counts.len());
                    counts.push((word, 1));
                }
            }
        }
    }

    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

/// Fits the theme vocabulary over raw subjects.
///
/// The `max_features` most frequent non-stopword tokens are kept (ties broken
/// alphabetically) and returned in alphabetical order.
pub fn fit_themes(subjects: &[String], max_features: usize) -> Result<ThemeTerms, String> {
    let mut term_counts: BTreeMap<String, usize> = BTreeMap::new();
    for subject in subjects {
        let lower = subject.to_lowercase();
        for token in TOKEN.find_iter(&lower).map(|m| m.as_str()) {
            if !STOP_SET.contains(token) {
                *term_counts.entry(token.to_string()).or_insert(0) += 1;
            }
        }
    }

    if term_counts.is_empty() {
        return Err("empty vocabulary; subjects only contain stop words".to_string());
    }

    let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(max_features);
    let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
    terms.sort();

    Ok(ThemeTerms { terms })
}
