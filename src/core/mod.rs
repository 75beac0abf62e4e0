pub mod generator;
pub mod planner;
pub mod request;

pub use generator::{retry_decision, RetryDecision, StructuredGenerator, DEFAULT_MAX_ATTEMPTS};
pub use planner::ItineraryPlanner;
pub use request::GenerationRequest;
