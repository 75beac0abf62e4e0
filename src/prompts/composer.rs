use super::{
    dates::{find_date_mentions, DateMention},
    options::PlanOptions,
};
use chrono::{Datelike, NaiveDate};

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// System and user prompt for one itinerary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompts {
    pub system: String,
    pub user: String,
}

/// Google Maps search link for `place` in `city`, whitespace replaced by `+`.
pub fn map_search_link(place: &str, city: &str) -> String {
    let query = place
        .split_whitespace()
        .chain(city.split_whitespace())
        .collect::<Vec<_>>()
        .join("+");
    format!("{MAPS_SEARCH_URL}{query}")
}

/// Build the prompts for turning `note` into an itinerary.
///
/// `today` is the reference date for year inference; callers pass it in so
/// the output is deterministic.
pub fn compose_prompts(
    note: &str,
    options: &PlanOptions,
    preference_tags: &[String],
    today: NaiveDate,
) -> ComposedPrompts {
    ComposedPrompts {
        system: system_prompt(today),
        user: user_prompt(note, options, preference_tags, today),
    }
}

fn system_prompt(today: NaiveDate) -> String {
    let current_year = today.year();
    let next_year = current_year + 1;
    let today_iso = today.format("%Y-%m-%d");
    let weekday = today.format("%A");

    format!(
        "You are an experienced travel planner. You turn a traveller's free-form notes into a \
realistic, well-paced day-by-day itinerary and always answer by calling the provided tool.

Today's date is {today_iso} ({weekday}).

Dates:
- If the note contains explicit dates, set `date` (ISO format YYYY-MM-DD) and `dayOfWeek` for every day of the plan.
- If the note has no explicit or unambiguous dates, omit `date` and `dayOfWeek` entirely. Never output placeholders such as \"TBD\" or empty strings.
- A year written in the note is always used exactly as written.
- When a date has a day and month but no year: use {current_year} if that day has not passed yet (it is on or after {today_iso}), otherwise use {next_year}.

Write titles and descriptions in the language of the note. Keep places real and verifiable."
    )
}

fn user_prompt(
    note: &str,
    options: &PlanOptions,
    preference_tags: &[String],
    today: NaiveDate,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Create a travel itinerary based on this note:\n\"\"\"\n{}\n\"\"\"\n\n",
        note.trim()
    ));

    prompt.push_str(&format!(
        "Trip preferences:\n- Travel style: {}\n- Transport: {}\n- Budget: {}\n",
        options.style_line(),
        options.transport_line(),
        options.budget_line()
    ));

    let mentions = find_date_mentions(note, today);
    if !mentions.is_empty() {
        prompt.push('\n');
        prompt.push_str(&dates_block(&mentions));
    }

    let tags = normalize_tags(preference_tags);
    if !tags.is_empty() {
        prompt.push('\n');
        prompt.push_str(&preferences_block(&tags));
    }

    prompt.push('\n');
    prompt.push_str(&structure_block());
    prompt
}

fn dates_block(mentions: &[DateMention]) -> String {
    let mut block = String::from("Dates found in the note (use these exact calendar dates):\n");
    for mention in mentions {
        let source = if mention.year_inferred {
            "year inferred"
        } else {
            "year as written"
        };
        block.push_str(&format!(
            "- \"{}\" = {} ({}, {})\n",
            mention.text,
            mention.date.format("%Y-%m-%d"),
            mention.date.format("%A"),
            source
        ));
    }
    block
}

/// Trimmed, non-empty, case-insensitively unique tags in input order.
fn normalize_tags(tags: &[String]) -> Vec<&str> {
    let mut seen: Vec<String> = Vec::new();
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| {
            let key = tag.to_lowercase();
            if seen.contains(&key) {
                false
            } else {
                seen.push(key);
                true
            }
        })
        .collect()
}

fn preferences_block(tags: &[&str]) -> String {
    format!(
        "Traveller interests: {}\n\
- Include at least one attraction or venue matching each of these interests.\n\
- Balance these interests with authentic local highlights; do not build the whole plan around them.\n",
        tags.join(", ")
    )
}

fn structure_block() -> String {
    let example = map_search_link("Wawel Castle", "Krakow");
    format!(
        "Output requirements:\n\
- Number days from 1 and give each day a short `title`.\n\
- Put activities under `activities` keyed by time of day: `morning`, `afternoon`, `evening`. \
Every key is optional; leave out a period with nothing planned instead of sending an empty list.\n\
- Every activity must have a `description` of one or two sentences.\n\
- Every activity must have `priceCategory`, exactly one of: free, budget, moderate, expensive.\n\
- `logistics.mapLink` must use the template {MAPS_SEARCH_URL}<place>+<city> with spaces replaced by \"+\", \
for example {example}. Never use shortened links.\n\
- Put one short disclaimer about prices and opening hours in the top-level `disclaimer` field, never inside `days`.\n"
    )
}
