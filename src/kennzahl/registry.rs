// src/kennzahl/registry.rs

// --- Static Lookup Tables ---
// Built once on first use, never mutated afterwards.
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use unicode_normalization::UnicodeNormalization;

/// Reporting years accepted anywhere in the pipeline.
pub const VALID_YEARS: RangeInclusive<i32> = 2019..=2029;

/// Official institution codes of the Wissensbilanz scheme.
pub const INSTITUTIONS: &[(&str, &str)] = &[
    ("UA", "Universität Wien"),
    ("UB", "Universität Graz"),
    ("UC", "Universität Innsbruck"),
    ("UD", "Universität Salzburg"),
    ("UE", "Technische Universität Wien"),
    ("UF", "Technische Universität Graz"),
    ("UG", "Montanuniversität Leoben"),
    ("UH", "Universität für Bodenkultur Wien"),
    ("UI", "Veterinärmedizinische Universität Wien"),
    ("UJ", "Wirtschaftsuniversität Wien"),
    ("UK", "Universität Linz"),
    ("UL", "Universität Klagenfurt"),
    ("UM", "Universität für Weiterbildung Krems"),
    ("UN", "Medizinische Universität Wien"),
    ("UO", "Medizinische Universität Graz"),
    ("UQ", "Medizinische Universität Innsbruck"),
    ("UR", "Akademie der bildenden Künste Wien"),
    ("US", "Universität für angewandte Kunst Wien"),
    ("UT", "Universität für Musik und darstellende Kunst Wien"),
    ("UU", "Universität Mozarteum Salzburg"),
    ("UV", "Universität für Musik und darstellende Kunst Graz"),
    ("UW", "Universität für künstlerische und industrielle Gestaltung Linz"),
];

/// Source workbook file names (ASCII-folded) and the metric code each one feeds.
pub const FILE_TO_METRIC: &[(&str, &str)] = &[
    ("1-A-1 Personal - Koepfe.xlsx", "1-A-1"),
    ("1-A-1 Personal - VZAe.xlsx", "1-A-1-VZA"),
    ("1-A-2 Berufungen an die Universitaet.xlsx", "1-A-2"),
    ("1-A-3 Frauenquote in Kollegialorganen.xlsx", "1-A-3"),
    ("1-A-4 Gender pay gap.xlsx", "1-A-4"),
    ("1-A-5 Repraesentanz von Frauen in Berufungsverfahren.xlsx", "1-A-5"),
    ("2-A-1 ProfessorInnen und Aequivalente.xlsx", "2-A-1"),
    ("2-A-2 Eingerichtete Studien.xlsx", "2-A-2"),
    ("2-A-3 Studienabschlussquote.xlsx", "2-A-3"),
    ("2-A-4 Besondere Zulassungsbedingungen.xlsx", "2-A-4"),
    ("2-A-5 Anzahl Studierenden.xlsx", "2-A-5"),
    ("2-A-6 Anzahl Pruefungsaktive.xlsx", "2-A-6"),
    ("2-A-7 Anzahl belegte ordentliche Studien.xlsx", "2-A-7"),
    ("2-A-8 Ordentliche Studierende (outgoing).xlsx", "2-A-8"),
    ("2-A-9 Ordentliche Studierende (incoming).xlsx", "2-A-9"),
    ("2-B-1 Doktoratsstudierende mit BV zur Universitaet.xlsx", "2-B-1"),
    ("3-A-1 Ausserordentliche Studienabschluesse.xlsx", "3-A-1"),
    ("3-A-2 Studienabschluesse in der Toleranzstudiendauer.xlsx", "3-A-2"),
    ("3-A-3 Studienabschluesse mit studienbezogenem Auslandsaufenthalt.xlsx", "3-A-3"),
];

/// Metric whose workbook only reports one institution in a fixed row window.
pub const SINGLE_INSTITUTION_METRIC: &str = "3-A-1";
/// The institution that metric is restricted to.
pub const SINGLE_INSTITUTION_CODE: &str = "UM";
/// Metric whose workbook uses letter codes and grouped "Insgesamt" rows.
pub const GROUPED_LETTER_METRIC: &str = "3-A-3";

static INSTITUTION_BY_CODE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| INSTITUTIONS.iter().copied().collect());

// "A" -> "UA", ... ; there is no "P".
static INSTITUTION_BY_LETTER: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    INSTITUTIONS
        .iter()
        .map(|(code, _)| (code[1..].to_string(), *code))
        .collect()
});

static METRIC_BY_FILE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| FILE_TO_METRIC.iter().copied().collect());

pub fn is_valid_institution(code: &str) -> bool {
    INSTITUTION_BY_CODE.contains_key(code)
}

/// Returns the canonical `'static` code for a valid institution code.
pub fn institution_code(code: &str) -> Option<&'static str> {
    INSTITUTION_BY_CODE.get_key_value(code).map(|(k, _)| *k)
}

pub fn institution_name(code: &str) -> Option<&'static str> {
    INSTITUTION_BY_CODE.get(code).copied()
}

/// Translates a single-letter code ("B") to its two-character form ("UB").
pub fn institution_for_letter(letter: &str) -> Option<&'static str> {
    INSTITUTION_BY_LETTER.get(letter).copied()
}

pub fn is_valid_year(year: i32) -> bool {
    VALID_YEARS.contains(&year)
}

/// Looks up the metric code for a source file name.
/// Names are composed (NFC) and umlauts and ß folded first, so "Köpfe", its
/// decomposed form from macOS archives, and "Koepfe" all resolve alike.
pub fn metric_for_file(file_name: &str) -> Option<&'static str> {
    let composed: String = file_name.nfc().collect();
    METRIC_BY_FILE.get(fold_umlauts(&composed).as_str()).copied()
}

fn fold_umlauts(s: &str) -> String {
    let mut folded = String::with_capacity(s.len() + 4);
    for ch in s.chars() {
        match ch {
            'ä' => folded.push_str("ae"),
            'ö' => folded.push_str("oe"),
            'ü' => folded.push_str("ue"),
            'Ä' => folded.push_str("Ae"),
            'Ö' => folded.push_str("Oe"),
            'Ü' => folded.push_str("Ue"),
            'ß' => folded.push_str("ss"),
            _ => folded.push(ch),
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_sizes() {
        assert_eq!(INSTITUTIONS.len(), 22);
        assert_eq!(FILE_TO_METRIC.len(), 19);
        assert!(!is_valid_institution("UP"));
        assert_eq!(institution_name("UI"), Some("Veterinärmedizinische Universität Wien"));
    }

    #[test]
    fn test_letter_table() {
        assert_eq!(institution_for_letter("A"), Some("UA"));
        assert_eq!(institution_for_letter("W"), Some("UW"));
        assert_eq!(institution_for_letter("P"), None);
        assert_eq!(institution_for_letter("a"), None);
    }

    #[test]
    fn test_year_range_bounds() {
        assert!(is_valid_year(2019));
        assert!(is_valid_year(2029));
        assert!(!is_valid_year(2018));
        assert!(!is_valid_year(2030));
    }

    #[test]
    fn test_metric_lookup_folds_umlauts() {
        assert_eq!(metric_for_file("1-A-1 Personal - Köpfe.xlsx"), Some("1-A-1"));
        assert_eq!(metric_for_file("1-A-1 Personal - Koepfe.xlsx"), Some("1-A-1"));
        assert_eq!(metric_for_file("1-A-1 Personal - VZÄ.xlsx"), Some("1-A-1-VZA"));
        assert_eq!(metric_for_file("1-A-1 Personal - VZAe.xlsx"), Some("1-A-1-VZA"));
        assert_eq!(
            metric_for_file("3-A-1 Außerordentliche Studienabschlüsse.xlsx"),
            Some("3-A-1")
        );
        assert_eq!(metric_for_file("Notizen.xlsx"), None);
    }

    #[test]
    fn test_metric_lookup_accepts_decomposed_names() {
        assert_eq!(metric_for_file("1-A-1 Personal - Ko\u{308}pfe.xlsx"), Some("1-A-1"));
        assert_eq!(metric_for_file("1-A-1 Personal - VZA\u{308}.xlsx"), Some("1-A-1-VZA"));
        assert_eq!(
            metric_for_file("2-A-6 Anzahl Pru\u{308}fungsaktive.xlsx"),
            Some("2-A-6")
        );
    }
}
