//! Date expressions in travel notes and the year-inference rule.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Feb 29 may be several years away; give up beyond that.
const MAX_YEAR_LOOKAHEAD: i32 = 8;

const POLISH_MONTHS: [&str; 12] = [
    "stycznia",
    "lutego",
    "marca",
    "kwietnia",
    "maja",
    "czerwca",
    "lipca",
    "sierpnia",
    "września",
    "października",
    "listopada",
    "grudnia",
];

const ENGLISH_MONTH_PREFIXES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const MONTH_NAMES: &str = "stycznia|lutego|marca|kwietnia|maja|czerwca|lipca|sierpnia|września|października|listopada|grudnia|january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

const ENGLISH_MONTH_NAMES: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

/// A date expression found in a note, resolved to a calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMention {
    /// The expression exactly as written in the note
    pub text: String,
    pub date: NaiveDate,
    /// `false` when the note spelled out the year
    pub year_inferred: bool,
}

/// Resolve a day and month without a year against `today`.
///
/// The current year is used when that date is today or still ahead,
/// otherwise the next year. Dates that do not exist in the chosen year
/// (Feb 29) move to the next year in which they do.
pub fn infer_year(month: u32, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let current_year = today.year();

    if let Some(date) = NaiveDate::from_ymd_opt(current_year, month, day) {
        if date >= today {
            return Some(date);
        }
    }

    (current_year + 1..=current_year + MAX_YEAR_LOOKAHEAD)
        .find_map(|year| NaiveDate::from_ymd_opt(year, month, day))
}

/// Two-digit years in numeric dates ("10.01.27") belong to this century.
fn expand_year(year: i32) -> i32 {
    if year < 100 {
        2000 + year
    } else {
        year
    }
}

fn iso_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap())
}

fn numeric_with_year_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})[./](\d{1,2})[./](\d{4}|\d{2})\b").unwrap())
}

// Two-digit month keeps decimals such as "1.5 km" out.
fn numeric_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})[./](\d{2})\b").unwrap())
}

/// Words after which "12.05" is a clock time.
const TIME_MARKERS: [&str; 10] = [
    "o", "godz", "godz.", "godzina", "godzinie", "ok.", "około", "at", "around", "about",
];

/// Units that turn "10.12" into a price, distance or duration.
const UNIT_SUFFIXES: [&str; 10] = ["h", "zł", "pln", "eur", "km", "min", "am", "pm", "%", "€"];

/// Whether a bare `D.MM` match reads as a clock time or a quantity rather
/// than a day and month.
fn is_time_or_quantity(note: &str, start: usize, end: usize) -> bool {
    let after = &note[end..];
    if after.starts_with(|c: char| matches!(c, '.' | '/' | ':' | ','))
        && after[1..].starts_with(|c: char| c.is_ascii_digit())
    {
        return true;
    }

    let previous_word = note[..start]
        .split_whitespace()
        .next_back()
        .map(|word| word.trim_start_matches(|c: char| !c.is_alphanumeric()).to_lowercase());
    if previous_word.is_some_and(|word| TIME_MARKERS.contains(&word.as_str())) {
        return true;
    }

    let following = after.trim_start().to_lowercase();
    UNIT_SUFFIXES.iter().any(|unit| {
        following
            .strip_prefix(unit)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric()))
    })
}

fn day_first_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)\b(\d{{1,2}})(?:\.|st|nd|rd|th)?\s+(?:of\s+)?({MONTH_NAMES})\b(?:\s+(\d{{4}})\b)?"
        ))
        .unwrap()
    })
}

fn month_first_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)\b({ENGLISH_MONTH_NAMES})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(\d{{4}})\b)?"
        ))
        .unwrap()
    })
}

fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let index = POLISH_MONTHS
        .iter()
        .position(|month| *month == name)
        .or_else(|| {
            ENGLISH_MONTH_PREFIXES
                .iter()
                .position(|prefix| name.starts_with(prefix))
        })?;
    Some(index as u32 + 1)
}

struct RawMention {
    start: usize,
    end: usize,
    text: String,
    year: Option<i32>,
    month: u32,
    day: u32,
}

impl RawMention {
    fn resolve(self, today: NaiveDate) -> Option<(usize, DateMention)> {
        let (date, year_inferred) = match self.year {
            Some(year) => (NaiveDate::from_ymd_opt(year, self.month, self.day)?, false),
            None => (infer_year(self.month, self.day, today)?, true),
        };
        Some((
            self.start,
            DateMention {
                text: self.text,
                date,
                year_inferred,
            },
        ))
    }
}

fn parse_number<T: std::str::FromStr>(caps: &regex::Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

/// Find every date expression in `note` and resolve it, in note order.
///
/// Years written in the note are kept verbatim; the rest go through
/// [`infer_year`]. Expressions that are not real calendar dates are skipped.
pub fn find_date_mentions(note: &str, today: NaiveDate) -> Vec<DateMention> {
    let mut raw: Vec<RawMention> = Vec::new();

    // Most specific patterns first; later matches overlapping them are ignored.
    let mut push = |start: usize, end: usize, year: Option<i32>, month: u32, day: u32| {
        if raw.iter().any(|seen| start < seen.end && seen.start < end) {
            return;
        }
        raw.push(RawMention {
            start,
            end,
            text: note[start..end].to_string(),
            year,
            month,
            day,
        });
    };

    for caps in iso_pattern().captures_iter(note) {
        let Some(whole) = caps.get(0) else { continue };
        if let (Some(year), Some(month), Some(day)) = (
            parse_number(&caps, 1),
            parse_number(&caps, 2),
            parse_number(&caps, 3),
        ) {
            push(whole.start(), whole.end(), Some(year), month, day);
        }
    }

    for caps in day_first_pattern().captures_iter(note) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(month) = caps.get(2).and_then(|m| month_from_name(m.as_str())) else {
            continue;
        };
        if let Some(day) = parse_number(&caps, 1) {
            push(whole.start(), whole.end(), parse_number(&caps, 3), month, day);
        }
    }

    for caps in month_first_pattern().captures_iter(note) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(month) = caps.get(1).and_then(|m| month_from_name(m.as_str())) else {
            continue;
        };
        if let Some(day) = parse_number(&caps, 2) {
            push(whole.start(), whole.end(), parse_number(&caps, 3), month, day);
        }
    }

    for caps in numeric_with_year_pattern().captures_iter(note) {
        let Some(whole) = caps.get(0) else { continue };
        if let (Some(day), Some(month), Some(year)) = (
            parse_number(&caps, 1),
            parse_number(&caps, 2),
            parse_number(&caps, 3),
        ) {
            push(whole.start(), whole.end(), Some(expand_year(year)), month, day);
        }
    }

    for caps in numeric_pattern().captures_iter(note) {
        let Some(whole) = caps.get(0) else { continue };
        if is_time_or_quantity(note, whole.start(), whole.end()) {
            continue;
        }
        if let (Some(day), Some(month)) = (parse_number(&caps, 1), parse_number(&caps, 2)) {
            push(whole.start(), whole.end(), None, month, day);
        }
    }

    let mut resolved: Vec<(usize, DateMention)> = raw
        .into_iter()
        .filter_map(|mention| mention.resolve(today))
        .collect();
    resolved.sort_by_key(|(start, _)| *start);
    resolved.into_iter().map(|(_, mention)| mention).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn reference() -> NaiveDate {
        date(2025, 11, 5)
    }

    #[test]
    fn upcoming_date_stays_in_current_year() {
        assert_eq!(infer_year(11, 15, reference()), Some(date(2025, 11, 15)));
        assert_eq!(infer_year(12, 31, reference()), Some(date(2025, 12, 31)));
    }

    #[test]
    fn passed_date_moves_to_next_year() {
        assert_eq!(infer_year(6, 5, reference()), Some(date(2026, 6, 5)));
        assert_eq!(infer_year(1, 10, reference()), Some(date(2026, 1, 10)));
        assert_eq!(infer_year(11, 4, reference()), Some(date(2026, 11, 4)));
    }

    #[test]
    fn today_counts_as_not_passed() {
        assert_eq!(infer_year(11, 5, reference()), Some(date(2025, 11, 5)));
    }

    #[test]
    fn leap_day_moves_to_next_leap_year() {
        assert_eq!(infer_year(2, 29, reference()), Some(date(2028, 2, 29)));
        assert_eq!(infer_year(2, 30, reference()), None);
        assert_eq!(infer_year(13, 1, reference()), None);
    }

    #[test]
    fn polish_month_names_are_resolved() {
        let mentions = find_date_mentions("Wyjazd 15 listopada, powrót 5 czerwca", reference());

        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].text, "15 listopada");
        assert_eq!(mentions[0].date, date(2025, 11, 15));
        assert!(mentions[0].year_inferred);
        assert_eq!(mentions[1].text, "5 czerwca");
        assert_eq!(mentions[1].date, date(2026, 6, 5));
    }

    #[test]
    fn explicit_year_is_kept_verbatim() {
        let mentions = find_date_mentions(
            "Kraków 12.03.2024, then Gdańsk on 2 września 2030 and 2024-01-07",
            reference(),
        );

        let resolved: Vec<_> = mentions.iter().map(|m| (m.text.as_str(), m.date)).collect();
        assert_eq!(
            resolved,
            [
                ("12.03.2024", date(2024, 3, 12)),
                ("2 września 2030", date(2030, 9, 2)),
                ("2024-01-07", date(2024, 1, 7)),
            ]
        );
        assert!(mentions.iter().all(|m| !m.year_inferred));
    }

    #[test]
    fn english_month_first() {
        let mentions = find_date_mentions("Arriving November 15th, leaving Jan 10", reference());
        let dates: Vec<_> = mentions.iter().map(|m| m.date).collect();
        assert_eq!(dates, [date(2025, 11, 15), date(2026, 1, 10)]);
    }

    #[test]
    fn numeric_day_month() {
        let mentions = find_date_mentions("od 20.12 do 02.01", reference());
        let dates: Vec<_> = mentions.iter().map(|m| m.date).collect();
        assert_eq!(dates, [date(2025, 12, 20), date(2026, 1, 2)]);
    }

    #[test]
    fn numbers_that_are_not_dates_are_ignored() {
        let mentions = find_date_mentions(
            "Weekend w Krakowie, 2 dni, bilet 4.50 zł, spacer 1.5 km, 31.02",
            reference(),
        );
        assert!(mentions.is_empty(), "{mentions:?}");
    }

    #[test]
    fn two_digit_year_is_kept_as_written() {
        let mentions = find_date_mentions("Kraków od 10.01.27 do 12.01.27", reference());

        let resolved: Vec<_> = mentions.iter().map(|m| (m.text.as_str(), m.date)).collect();
        assert_eq!(
            resolved,
            [("10.01.27", date(2027, 1, 10)), ("12.01.27", date(2027, 1, 12))]
        );
        assert!(mentions.iter().all(|m| !m.year_inferred));
    }

    #[test]
    fn clock_times_are_not_dates() {
        for note in [
            "pociąg o 12.05, kolacja o 19.10",
            "zbiórka godz. 9.30, wyjazd około 10.11",
            "dinner at 19.10, back around 11.05",
        ] {
            let mentions = find_date_mentions(note, reference());
            assert!(mentions.is_empty(), "{note}: {mentions:?}");
        }
    }

    #[test]
    fn quantities_are_not_dates() {
        for note in ["trasa 10.12 km", "bilet 12.05 zł", "spacer 1.10h", "sala 10.11.2 m"] {
            let mentions = find_date_mentions(note, reference());
            assert!(mentions.is_empty(), "{note}: {mentions:?}");
        }
    }

    #[test]
    fn bare_day_month_still_resolves_next_to_prepositions() {
        let mentions = find_date_mentions("przyjazd 20.12, powrót do 02.01.", reference());
        let dates: Vec<_> = mentions.iter().map(|m| m.date).collect();
        assert_eq!(dates, [date(2025, 12, 20), date(2026, 1, 2)]);
    }
}
