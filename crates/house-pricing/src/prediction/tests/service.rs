use super::common::*;
use std::sync::Arc;
use std::time::Duration;

use crate::prediction::{
    FixedNoise, FormField, LatencyProfile, Notifier, PredictionService, PredictionServiceError,
    RepositoryError,
};

#[tokio::test]
async fn predict_returns_formatted_view() {
    let (service, _) = build_service();
    let view = service
        .predict(&complete_form())
        .await
        .expect("prediction succeeds");

    assert_eq!(view.price, 6_904_350);
    assert_eq!(view.formatted_price, "₹69 Lakh");
    assert_eq!(view.confidence, 0.85);
    assert_eq!(
        view.factors,
        vec!["Premium location", "Main road access", "Spacious layout"]
    );
}

#[tokio::test]
async fn predict_rejects_invalid_forms_before_pricing() {
    let (service, _) = build_service();
    let mut form = complete_form();
    form.insert("area".to_string(), "25000".to_string());
    form.remove("parking");

    let error = service.predict(&form).await.expect_err("form invalid");
    match error {
        PredictionServiceError::Validation(errors) => {
            assert_eq!(errors.len(), 2);
            assert!(errors.get(FormField::Area).is_some());
            assert_eq!(
                errors.get(FormField::Parking),
                Some("Please select parking spaces")
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn predicted_price_stays_within_variation_band() {
    let total = COMPLETE_FORM_TOTAL as f64;
    for position in [0.0, 0.25, 0.5, 0.75, 0.999] {
        let service = PredictionService::new(
            Arc::new(FixedNoise::new(position)),
            Arc::new(MemoryRepository::default()),
            LatencyProfile::immediate(),
            Notifier::default(),
        );
        let view = service.predict(&complete_form()).await.expect("valid");
        let price = view.price as f64;
        assert!(price >= (total * 0.9).floor(), "{price} below band");
        assert!(price <= (total * 1.1).ceil(), "{price} above band");
        assert!(view.confidence >= 0.85 && view.confidence < 0.95);
    }
}

#[tokio::test(start_paused = true)]
async fn predict_waits_for_configured_delay() {
    let service = PredictionService::new(
        Arc::new(FixedNoise::midpoint()),
        Arc::new(MemoryRepository::default()),
        LatencyProfile {
            delay: Duration::from_millis(2000),
            jitter: Duration::from_millis(1000),
            save_delay: Duration::ZERO,
        },
        Notifier::default(),
    );

    let started = tokio::time::Instant::now();
    service.predict(&complete_form()).await.expect("valid");
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(2500), "waited {elapsed:?}");
    assert!(elapsed < Duration::from_millis(2600), "waited {elapsed:?}");
}

#[tokio::test]
async fn save_stores_prediction_and_acknowledges() {
    let (service, repository) = build_service();
    let view = service.predict(&complete_form()).await.expect("valid");

    let ack = service.save(view.clone()).await.expect("save succeeds");
    assert!(ack.saved.id.0.starts_with("pred-"));
    assert_eq!(ack.saved.prediction, view);
    assert_eq!(ack.notification.message, "✓ Saved to Wishlist");

    let stored = repository.saved.lock().expect("mutex").clone();
    assert_eq!(stored.len(), 1);

    let listed = service.saved(10).expect("list succeeds");
    assert_eq!(listed[0].id, ack.saved.id);
}

#[tokio::test]
async fn saved_lists_most_recent_first_and_honours_limit() {
    let (service, _) = build_service();
    let view = service.predict(&complete_form()).await.expect("valid");
    let first = service.save(view.clone()).await.expect("save").saved;
    let second = service.save(view).await.expect("save").saved;

    let listed = service.saved(1).expect("list succeeds");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, second.id);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn save_surfaces_repository_failures() {
    let service = unavailable_service();
    let view = build_service()
        .0
        .predict(&complete_form())
        .await
        .expect("valid");

    let error = service.save(view).await.expect_err("repository offline");
    assert!(matches!(
        error,
        PredictionServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}
