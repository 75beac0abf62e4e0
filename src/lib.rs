//! tripgen-rs: turns free-text travel notes into schema-validated itineraries
//!
//! A note plus a few personalization options goes in; the crate composes the
//! prompts, asks an OpenAI-compatible provider for exactly one tool call
//! carrying the itinerary, repairs the shapes models commonly get wrong,
//! validates the result against the [`Itinerary`] schema and retries within
//! a configurable bound when validation fails.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tripgen_rs::{ItineraryPlanner, OpenAIClient, PlanOptions};
//! use tripgen_rs::prompts::{BudgetLevel, TransportMode, TravelStyle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = std::env::var("OPENAI_API_KEY")?;
//!     let planner = ItineraryPlanner::new(OpenAIClient::new(api_key)?);
//!
//!     let options = PlanOptions::new(
//!         TravelStyle::Leisure,
//!         TransportMode::Public,
//!         BudgetLevel::Standard,
//!     );
//!     let plan = planner
//!         .generate_plan("Weekend w Krakowie, Wawel, Rynek, dwa dni", Some(options), None)
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&plan)?);
//!     Ok(())
//! }
//! ```

extern crate self as tripgen_rs;

pub mod core;
pub mod error;
pub mod prompts;
pub mod schemas;
pub(crate) mod services;
pub mod types;

pub use self::core::{
    retry_decision, GenerationRequest, ItineraryPlanner, RetryDecision, StructuredGenerator,
    DEFAULT_MAX_ATTEMPTS,
};
pub use error::{GenerationError, Result, ValidationIssue};
pub use prompts::{compose_prompts, ComposedPrompts, PlanOptions};
pub use schemas::{CompletionSchema, SchemaHandle};
pub use services::openai_client::{
    ChatCompletionRequest, OpenAIClient, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use services::repair::{repair, repair_document};
pub use services::transport::CompletionTransport;
pub use tripgen_macros::completion_schema;
pub use types::itinerary::{Activity, Day, DayActivities, Itinerary, Logistics, PriceCategory};

pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;
