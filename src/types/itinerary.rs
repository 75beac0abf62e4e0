use crate::completion_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured multi-day itinerary built from a travel note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[completion_schema(
    name = "itinerary_plan",
    description = "Create a day-by-day travel itinerary from the user's note"
)]
pub struct Itinerary {
    /// Days of the trip in chronological order
    pub days: Vec<Day>,
    /// Short disclaimer about prices, opening hours and the need to verify details
    pub disclaimer: String,
}

/// One day of the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// 1-based day counter within the trip
    pub day: u32,
    /// ISO date (YYYY-MM-DD); only when the note contains explicit dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Day of the week matching `date`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,
    /// Short theme for the day
    pub title: String,
    /// Activities grouped by time of day; every period is optional
    pub activities: DayActivities,
}

/// Activities keyed by time of day. A missing period means nothing is planned then.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DayActivities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning: Option<Vec<Activity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afternoon: Option<Vec<Activity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening: Option<Vec<Activity>>,
}

impl DayActivities {
    /// Iterate over every activity, morning first.
    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        [&self.morning, &self.afternoon, &self.evening]
            .into_iter()
            .flatten()
            .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Name of the place or activity
    pub name: String,
    /// One or two sentences on what to do there
    pub description: String,
    /// Rough cost class of the activity
    pub price_category: PriceCategory,
    /// Practical details for getting there
    pub logistics: Logistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PriceCategory {
    Free,
    Budget,
    Moderate,
    Expensive,
}

impl PriceCategory {
    pub const ALL: [PriceCategory; 4] = [
        PriceCategory::Free,
        PriceCategory::Budget,
        PriceCategory::Moderate,
        PriceCategory::Expensive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceCategory::Free => "free",
            PriceCategory::Budget => "budget",
            PriceCategory::Moderate => "moderate",
            PriceCategory::Expensive => "expensive",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Logistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Google Maps search link for the place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
    /// Suggested time to spend, e.g. "2h"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}
