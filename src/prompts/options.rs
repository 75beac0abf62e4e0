use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Leisure,
    Adventure,
    Cultural,
    Relaxation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Car,
    Public,
    Walking,
    Bike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Economy,
    Standard,
    Luxury,
}

/// Personalization for one plan. Unset fields fall back to a textual default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TravelStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetLevel>,
}

impl PlanOptions {
    pub fn new(style: TravelStyle, transport: TransportMode, budget: BudgetLevel) -> Self {
        Self {
            style: Some(style),
            transport: Some(transport),
            budget: Some(budget),
        }
    }

    pub(crate) fn style_line(&self) -> String {
        match self.style {
            Some(style) => format!("{} ({})", style.as_str(), style.guidance()),
            None => "not specified (mix sightseeing with some free time)".to_string(),
        }
    }

    pub(crate) fn transport_line(&self) -> String {
        match self.transport {
            Some(mode) => format!("{} ({})", mode.as_str(), mode.guidance()),
            None => "not specified (assume public transport and walking)".to_string(),
        }
    }

    pub(crate) fn budget_line(&self) -> String {
        match self.budget {
            Some(level) => format!("{} ({})", level.as_str(), level.guidance()),
            None => "not specified (assume a standard mid-range budget)".to_string(),
        }
    }
}

impl TravelStyle {
    pub const ALL: [TravelStyle; 4] = [
        TravelStyle::Leisure,
        TravelStyle::Adventure,
        TravelStyle::Cultural,
        TravelStyle::Relaxation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelStyle::Leisure => "leisure",
            TravelStyle::Adventure => "adventure",
            TravelStyle::Cultural => "cultural",
            TravelStyle::Relaxation => "relaxation",
        }
    }

    fn guidance(&self) -> &'static str {
        match self {
            TravelStyle::Leisure => "relaxed pace, classic sights, time for cafes and walks",
            TravelStyle::Adventure => "active days, outdoor activities, off the beaten path",
            TravelStyle::Cultural => "museums, history, architecture and local traditions",
            TravelStyle::Relaxation => "few activities per day, long breaks, spas and parks",
        }
    }
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Car,
        TransportMode::Public,
        TransportMode::Walking,
        TransportMode::Bike,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Public => "public",
            TransportMode::Walking => "walking",
            TransportMode::Bike => "bike",
        }
    }

    fn guidance(&self) -> &'static str {
        match self {
            TransportMode::Car => "places may be spread out, mention parking where relevant",
            TransportMode::Public => "public transport, keep stops reachable by tram, bus or metro",
            TransportMode::Walking => "keep each day within a walkable area",
            TransportMode::Bike => "bike-friendly routes, moderate distances",
        }
    }
}

impl BudgetLevel {
    pub const ALL: [BudgetLevel; 3] = [
        BudgetLevel::Economy,
        BudgetLevel::Standard,
        BudgetLevel::Luxury,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Economy => "economy",
            BudgetLevel::Standard => "standard",
            BudgetLevel::Luxury => "luxury",
        }
    }

    fn guidance(&self) -> &'static str {
        match self {
            BudgetLevel::Economy => "prefer free and budget places",
            BudgetLevel::Standard => "standard mid-range prices, occasional splurge",
            BudgetLevel::Luxury => "premium venues and experiences are welcome",
        }
    }
}

/// Error for option values outside their enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
    expected: String,
}

macro_rules! option_from_str {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownOption;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let normalized = value.trim().to_ascii_lowercase();
                <$ty>::ALL
                    .into_iter()
                    .find(|candidate| candidate.as_str() == normalized)
                    .ok_or_else(|| UnknownOption {
                        kind: $kind,
                        value: value.to_string(),
                        expected: <$ty>::ALL
                            .iter()
                            .map(|candidate| candidate.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_from_str!(TravelStyle, "travel style");
option_from_str!(TransportMode, "transport mode");
option_from_str!(BudgetLevel, "budget level");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Leisure".parse::<TravelStyle>(), Ok(TravelStyle::Leisure));
        assert_eq!(" PUBLIC ".parse::<TransportMode>(), Ok(TransportMode::Public));
        assert_eq!("luxury".parse::<BudgetLevel>(), Ok(BudgetLevel::Luxury));
    }

    #[test]
    fn unknown_value_lists_alternatives() {
        let err = "cheap".parse::<BudgetLevel>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown budget level `cheap` (expected one of: economy, standard, luxury)"
        );
    }

    #[test]
    fn unknown_value_is_a_std_error() {
        let err: Box<dyn std::error::Error> = Box::new("hiking".parse::<TravelStyle>().unwrap_err());
        assert!(err.source().is_none());
        assert!(err.to_string().starts_with("unknown travel style `hiking`"));
    }

    #[test]
    fn unset_options_use_textual_defaults() {
        let options = PlanOptions::default();
        assert!(options.style_line().starts_with("not specified"));
        assert!(options.transport_line().starts_with("not specified"));
        assert!(options.budget_line().starts_with("not specified"));
    }

    #[test]
    fn options_deserialize_from_wire_names() {
        let options: PlanOptions =
            serde_json::from_str(r#"{"style":"cultural","budget":"economy"}"#).unwrap();
        assert_eq!(options.style, Some(TravelStyle::Cultural));
        assert_eq!(options.transport, None);
        assert_eq!(options.budget, Some(BudgetLevel::Economy));
    }
}
