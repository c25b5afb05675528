//! Language breakdown

use common::models::{LanguageShare, LanguageSize};

use crate::analytics::round_to;

/// Languages shown in a breakdown
pub const TOP_LANGUAGES: usize = 5;

/// Colour for languages missing from [`LANGUAGE_COLORS`]
pub const DEFAULT_LANGUAGE_COLOR: &str = "#8b949e";

/// GitHub linguist colours for common languages
pub const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#3178c6"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("C#", "#178600"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Ruby", "#701516"),
    ("PHP", "#4F5D95"),
    ("Swift", "#F05138"),
    ("Kotlin", "#A97BFF"),
    ("Scala", "#c22d40"),
    ("Shell", "#89e051"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("Vue", "#41b883"),
    ("Dart", "#00B4AB"),
    ("R", "#198CE7"),
    ("MATLAB", "#e16737"),
    ("Perl", "#0298c3"),
    ("Lua", "#000080"),
    ("Haskell", "#5e5086"),
    ("Elixir", "#6e4a7e"),
    ("Clojure", "#db5855"),
    ("Objective-C", "#438eff"),
    ("Jupyter Notebook", "#DA5B0B"),
    ("Dockerfile", "#384d54"),
    ("Makefile", "#427819"),
];

pub fn language_color(name: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(lang, _)| *lang == name)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_LANGUAGE_COLOR)
}

/// Largest languages by bytes, with their share of all listed bytes
pub fn language_shares(languages: &[LanguageSize], limit: usize) -> Vec<LanguageShare> {
    let total: u64 = languages.iter().map(|l| l.bytes).sum();

    let mut sorted: Vec<&LanguageSize> = languages.iter().collect();
    sorted.sort_by(|a, b| b.bytes.cmp(&a.bytes));

    sorted
        .into_iter()
        .take(limit)
        .map(|lang| LanguageShare {
            name: lang.name.clone(),
            bytes: lang.bytes,
            percentage: if total == 0 {
                0.0
            } else {
                round_to(lang.bytes as f64 / total as f64 * 100.0, 1)
            },
            color: language_color(&lang.name),
        })
        .collect()
}
