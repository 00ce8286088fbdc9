// src/extractors/year.rs
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns for Year Labels (Lazy Static) ---
// Order is priority: the most specific label wins when a cell holds several numbers,
// e.g. "Wintersemester 2024 (Stichtag: 31.12.2024)".
static YEAR_LABEL_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "WS2024"
        r"WS(\d{4})",
        // "Wintersemester 2024", "Studienjahr 2023/24"
        r"(?:Wintersemester|Studienjahr)\s*(\d{4})",
        // bare "2024"
        r"\b(20\d{2})\b",
    ]
    .iter()
    .map(|pat| Regex::new(pat).expect("Failed to compile year label pattern"))
    .collect()
});

/// Extracts a calendar year from a header cell's text.
/// Returns `None` for empty input or when no pattern applies.
pub fn extract_year(text: &str) -> Option<i32> {
    if text.is_empty() {
        return None;
    }
    YEAR_LABEL_RE.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}
