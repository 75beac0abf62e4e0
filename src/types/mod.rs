pub mod itinerary;

pub use itinerary::{Activity, Day, DayActivities, Itinerary, Logistics, PriceCategory};
