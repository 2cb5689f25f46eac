//! Derivation of missing profile fields from free text
//!
//! Profile sources rarely expose experience years or an industry label
//! directly; these helpers estimate them from headline/about text the same
//! way display-only fields like "1,234+ connections" are turned into counts.
//! Pure functions over borrowed text.

use std::sync::OnceLock;

use regex::Regex;

fn experience_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(\d+)\+?\s*years?\s*(?:of\s*)?experience").expect("valid regex"),
            Regex::new(r"(\d+)\+?\s*years?\s*in\b").expect("valid regex"),
            Regex::new(r"(\d+)\+?\s*yrs?\s*(?:of\s*)?experience").expect("valid regex"),
        ]
    })
}

/// Estimate years of experience from headline/about text.
///
/// Explicit "N years" mentions win; otherwise seniority keywords give a rough
/// band. Returns None when the text carries no signal.
pub fn estimate_experience_years(headline: Option<&str>, about: Option<&str>) -> Option<u32> {
    let text = join_text(headline, about)?;

    for pattern in experience_patterns() {
        if let Some(captures) = pattern.captures(&text) {
            if let Ok(years) = captures[1].parse::<u32>() {
                return Some(years);
            }
        }
    }

    if contains_any(&text, &["senior", "lead", "principal", "director"]) {
        Some(8)
    } else if contains_any(&text, &["manager", "supervisor"]) {
        Some(5)
    } else if contains_any(&text, &["junior", "associate", "entry"]) {
        Some(2)
    } else {
        None
    }
}

/// Infer an industry label from keyword buckets in headline/about text.
pub fn infer_industry(headline: Option<&str>, about: Option<&str>) -> Option<String> {
    let text = join_text(headline, about)?;

    let buckets: [(&str, &[&str]); 9] = [
        ("Technology", &["software", "tech", "programming", "developer", "engineer"]),
        ("Finance", &["finance", "banking", "investment", "financial", "accounting"]),
        ("Healthcare", &["healthcare", "medical", "health", "pharmaceutical", "biotech"]),
        ("Marketing", &["marketing", "advertising", "brand"]),
        ("Sales", &["sales", "business development", "account management"]),
        ("Consulting", &["consulting", "consultant", "advisory"]),
        ("Education", &["education", "teaching", "academic", "university"]),
        ("Retail", &["retail", "e-commerce", "commerce"]),
        ("Manufacturing", &["manufacturing", "production", "industrial"]),
    ];

    buckets
        .iter()
        .find(|(_, keywords)| contains_any(&text, keywords))
        .map(|(industry, _)| (*industry).to_string())
}

/// Parse a connection count out of display strings like "500+" or "1,234".
pub fn parse_connection_count(display: &str) -> Option<u32> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"(\d[\d,]*)").expect("valid regex"));

    let captures = digits.captures(display)?;
    captures[1].replace(',', "").parse().ok()
}

/// Whether an extracted name looks like a real person name: at least two
/// words and a handful of characters.
pub fn plausible_name(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.len() >= 3 && trimmed.split_whitespace().count() >= 2
}

fn join_text(headline: Option<&str>, about: Option<&str>) -> Option<String> {
    let text = format!(
        "{} {}",
        headline.unwrap_or_default(),
        about.unwrap_or_default()
    )
    .trim()
    .to_lowercase();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
