#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::{collections::VecDeque, sync::Mutex};
use tripgen_rs::{CompletionTransport, GenerationError, GenerationRequest, Result};

/// Deterministic provider that replays scripted tool call arguments.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(documents: Vec<Value>) -> Self {
        Self::new(documents.into_iter().map(|doc| Ok(doc.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionTransport for ScriptedTransport {
    async fn send(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GenerationError::Server {
                    status: None,
                    message: "script exhausted".to_string(),
                })
            })
    }
}

pub fn activity(name: &str, price: &str) -> Value {
    json!({
        "name": name,
        "description": format!("Visit {name}."),
        "priceCategory": price,
        "logistics": {
            "mapLink": format!(
                "https://www.google.com/maps/search/?api=1&query={}+Krakow",
                name.replace(' ', "+")
            ),
            "estimatedTime": "2h"
        }
    })
}

/// Valid two-day Kraków itinerary.
pub fn krakow_weekend() -> Value {
    json!({
        "days": [
            {
                "day": 1,
                "title": "Wawel and the Old Town",
                "activities": {
                    "morning": [activity("Wawel Castle", "moderate")],
                    "afternoon": [activity("Main Market Square", "free")],
                    "evening": [activity("Kazimierz", "budget")]
                }
            },
            {
                "day": 2,
                "title": "Museums",
                "activities": {
                    "morning": [activity("Sukiennice", "budget")]
                }
            }
        ],
        "disclaimer": "Prices and opening hours may change."
    })
}
