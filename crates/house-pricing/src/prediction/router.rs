use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::PredictionView;
use super::repository::PredictionRepository;
use super::service::{PredictionService, PredictionServiceError};
use super::validation::{single_valued, RawForm};

const DEFAULT_SAVED_LIMIT: usize = 20;

/// Router builder exposing the estimate form endpoints.
pub fn prediction_router<R>(service: Arc<PredictionService<R>>) -> Router
where
    R: PredictionRepository + 'static,
{
    Router::new()
        .route("/api/v1/predictions", post(predict_json_handler::<R>))
        .route("/api/v1/predictions/form", post(predict_form_handler::<R>))
        .route(
            "/api/v1/predictions/saved",
            post(save_handler::<R>).get(saved_handler::<R>),
        )
        .route("/api/v1/search", get(search_handler::<R>))
        .route("/api/v1/navigate", get(navigate_handler::<R>))
        .with_state(service)
}

/// Collapse JSON scalars into the strings a form control would have posted.
pub(crate) fn form_from_json(payload: BTreeMap<String, Value>) -> RawForm {
    payload
        .into_iter()
        .filter_map(|(key, value)| {
            let raw = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(true) => "yes".to_string(),
                Value::Bool(false) => "no".to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key, raw))
        })
        .collect()
}

pub(crate) async fn predict_json_handler<R>(
    State(service): State<Arc<PredictionService<R>>>,
    Json(payload): Json<BTreeMap<String, Value>>,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let form = form_from_json(payload);
    let result = service.predict(&form).await;
    prediction_response(&service, result)
}

pub(crate) async fn predict_form_handler<R>(
    State(service): State<Arc<PredictionService<R>>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let form = single_valued(pairs);
    let result = service.predict(&form).await;
    prediction_response(&service, result)
}

/// Maps a prediction outcome to a response. Estimation itself cannot fail, so
/// the 500 arm only catches service errors added later.
pub(crate) fn prediction_response<R>(
    service: &PredictionService<R>,
    result: Result<PredictionView, PredictionServiceError>,
) -> Response
where
    R: PredictionRepository + 'static,
{
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(PredictionServiceError::Validation(errors)) => {
            let payload = json!({ "errors": errors });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => {
            tracing::error!(error = %other, "prediction failed");
            let payload = json!({
                "error": other.to_string(),
                "notification": service.notifier().prediction_failed(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn save_handler<R>(
    State(service): State<Arc<PredictionService<R>>>,
    Json(prediction): Json<PredictionView>,
) -> Response
where
    R: PredictionRepository + 'static,
{
    match service.save(prediction).await {
        Ok(ack) => (StatusCode::CREATED, Json(ack)).into_response(),
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SavedQuery {
    #[serde(default)]
    limit: Option<usize>,
}

pub(crate) async fn saved_handler<R>(
    State(service): State<Arc<PredictionService<R>>>,
    Query(query): Query<SavedQuery>,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_SAVED_LIMIT);
    match service.saved(limit) {
        Ok(predictions) => {
            let payload = json!({
                "notification": service.notifier().opening_saved(),
                "predictions": predictions,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub(crate) async fn search_handler<R>(
    State(service): State<Arc<PredictionService<R>>>,
    Query(query): Query<SearchQuery>,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let notifications = service.notifier().search(&query.q);
    (StatusCode::OK, Json(notifications)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NavigateQuery {
    #[serde(default)]
    link: String,
}

pub(crate) async fn navigate_handler<R>(
    State(service): State<Arc<PredictionService<R>>>,
    Query(query): Query<NavigateQuery>,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let notification = service.notifier().navigation(&query.link);
    (StatusCode::OK, Json(notification)).into_response()
}
