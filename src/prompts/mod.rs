//! Prompt composition for itinerary requests.

mod composer;
pub mod dates;
mod options;

pub use composer::{compose_prompts, map_search_link, ComposedPrompts};
pub use dates::{find_date_mentions, infer_year, DateMention};
pub use options::{BudgetLevel, PlanOptions, TransportMode, TravelStyle, UnknownOption};
