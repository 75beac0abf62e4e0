mod common;

use common::{krakow_weekend, ScriptedTransport};
use serde_json::json;
use tripgen_rs::{
    GenerationError, GenerationRequest, Itinerary, StructuredGenerator,
};

fn request() -> GenerationRequest {
    GenerationRequest::for_schema::<Itinerary>("system", "user")
}

fn invalid_price() -> serde_json::Value {
    let mut document = krakow_weekend();
    document["days"][0]["activities"]["morning"][0]["priceCategory"] = json!("pricey");
    document
}

#[tokio::test]
async fn single_attempt_never_resends_on_validation_failure() {
    let generator = StructuredGenerator::new(ScriptedTransport::replying(vec![
        invalid_price(),
        krakow_weekend(),
    ]));
    assert_eq!(generator.max_attempts(), 1);

    let result = generator.generate::<Itinerary>(&request()).await;

    assert!(matches!(result, Err(GenerationError::SchemaValidation { .. })));
    assert_eq!(generator.transport().calls(), 1);
}

#[tokio::test]
async fn second_attempt_recovers_from_validation_failure() {
    let generator = StructuredGenerator::new(ScriptedTransport::replying(vec![
        invalid_price(),
        krakow_weekend(),
    ]))
    .with_max_attempts(2);

    let itinerary = generator.generate::<Itinerary>(&request()).await.unwrap();

    assert_eq!(itinerary.days.len(), 2);
    assert_eq!(generator.transport().calls(), 2);

    let requests = generator.transport().requests();
    assert_eq!(requests[0].user_prompt(), requests[1].user_prompt());
    assert_eq!(requests[0].system_prompt(), requests[1].system_prompt());
}

#[tokio::test]
async fn exhausted_attempts_return_last_validation_error() {
    let generator = StructuredGenerator::new(ScriptedTransport::replying(vec![
        invalid_price(),
        invalid_price(),
        invalid_price(),
    ]))
    .with_max_attempts(3);

    let err = generator
        .generate::<Itinerary>(&request())
        .await
        .unwrap_err();

    assert_eq!(generator.transport().calls(), 3);
    assert!(err
        .issues()
        .iter()
        .any(|issue| issue.path == "/days/0/activities/morning/0/priceCategory"));
}

#[tokio::test]
async fn transport_errors_are_not_retried() {
    let errors = vec![
        GenerationError::RateLimit {
            retry_after: Some(10),
        },
        GenerationError::Authentication,
        GenerationError::BadRequest("tools[0] invalid".to_string()),
        GenerationError::Server {
            status: Some(502),
            message: "bad gateway".to_string(),
        },
    ];

    for error in errors {
        let code = error.error_code();
        let generator = StructuredGenerator::new(ScriptedTransport::new(vec![
            Err(error),
            Ok(krakow_weekend().to_string()),
        ]))
        .with_max_attempts(3);

        let result = generator.generate::<Itinerary>(&request()).await;

        assert_eq!(result.unwrap_err().error_code(), code);
        assert_eq!(generator.transport().calls(), 1, "{code} was retried");
    }
}

#[tokio::test]
async fn truncated_json_is_not_retried() {
    let generator = StructuredGenerator::new(ScriptedTransport::new(vec![
        Ok("{\"days\": [{\"day\": 1,".to_string()),
        Ok(krakow_weekend().to_string()),
    ]))
    .with_max_attempts(2);

    let result = generator.generate::<Itinerary>(&request()).await;

    tokio_test::assert_err!(&result);
    assert!(matches!(
        result,
        Err(GenerationError::InvalidJsonResponse { .. })
    ));
    assert_eq!(generator.transport().calls(), 1);
}

#[tokio::test]
async fn malformed_shapes_are_repaired_before_validation() {
    let document = json!({
        "days": [
            { "disclaimer": "Check prices before you go." },
            null,
            {
                "day": 1,
                "title": "Old Town",
                "activities": [
                    common::activity("Wawel Castle", "moderate"),
                    common::activity("Main Market Square", "free"),
                    common::activity("Kazimierz", "budget")
                ]
            },
            { "day": 2, "title": "Rest", "activities": { "evening": [common::activity("Vistula boulevards", "free")] } }
        ]
    });
    let generator = StructuredGenerator::new(ScriptedTransport::replying(vec![document]));

    let itinerary = generator.generate::<Itinerary>(&request()).await.unwrap();

    assert_eq!(itinerary.disclaimer, "Check prices before you go.");
    assert_eq!(itinerary.days.len(), 2);
    let first = &itinerary.days[0].activities;
    assert!(first.morning.is_none());
    assert_eq!(first.afternoon.as_ref().map(Vec::len), Some(3));
    assert!(itinerary.days[1].activities.morning.is_none());
}

#[test]
fn zero_attempts_is_clamped_to_one() {
    let generator = StructuredGenerator::new(ScriptedTransport::default()).with_max_attempts(0);
    assert_eq!(generator.max_attempts(), 1);
}
