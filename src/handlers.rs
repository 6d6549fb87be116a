//! Request handlers: validate the inbound body, run the use case, and turn
//! whatever happens into a JSON response.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::ai::agents::{ResponsePayload, Tutor};
use crate::ai::prompts::{PromptSpec, UseCase};
use crate::ai::template::Variables;
use crate::error::CoachError;

pub struct AppState {
    pub tutor: Tutor,
}

pub type JsonBody = Result<Json<Value>, JsonRejection>;

pub async fn health_check() -> Json<HashMap<&'static str, &'static str>> {
    Json(HashMap::from([("status", "healthy"), ("service", "codecraft")]))
}

pub async fn handle(state: Arc<AppState>, use_case: UseCase, body: JsonBody) -> Response {
    let request_id = Uuid::new_v4();
    log::info!("[{request_id}] POST {}", use_case.route());

    match process(&state, use_case, body).await {
        Ok(payload) => {
            log::info!("[{request_id}] {} ok", use_case.name());
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(e) => {
            match &e {
                CoachError::Validation(msg) => log::warn!("[{request_id}] rejected: {msg}"),
                e if e.is_defect() => log::error!("[{request_id}] prompt defect: {e}"),
                e => log::error!("[{request_id}] {} failed: {e}", use_case.name()),
            }
            e.into_response()
        }
    }
}

async fn process(
    state: &AppState,
    use_case: UseCase,
    body: JsonBody,
) -> Result<ResponsePayload, CoachError> {
    let spec = state.tutor.catalog().get(use_case);
    let Json(body) = body.map_err(|rejection| CoachError::Validation(rejection.body_text()))?;
    let object = body
        .as_object()
        .ok_or_else(|| CoachError::Validation(spec.missing_message.to_string()))?;

    let variables = extract_variables(spec, object)?;
    state.tutor.run(use_case, &variables).await
}

/// Pulls every bound field out of the body. Absent, null, non-string and
/// empty values all count as missing.
pub fn extract_variables(
    spec: &PromptSpec,
    body: &Map<String, Value>,
) -> Result<Variables, CoachError> {
    spec.inputs
        .iter()
        .map(|binding| match body.get(binding.field).and_then(Value::as_str) {
            Some(value) if !value.is_empty() => {
                Ok((binding.variable.to_string(), value.to_string()))
            }
            _ => Err(CoachError::Validation(spec.missing_message.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompts::PromptCatalog;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn maps_client_fields_to_template_variables() {
        let catalog = PromptCatalog::load().unwrap();
        let spec = catalog.get(UseCase::GetHints);
        let vars = extract_variables(spec, &object(json!({
            "problem": "Two sum",
            "currentCode": "def f(): pass",
            "ignored": 3
        })))
        .unwrap();

        assert_eq!(vars.len(), 2);
        assert_eq!(vars["problem"], "Two sum");
        assert_eq!(vars["code"], "def f(): pass");
    }

    #[test]
    fn empty_null_and_non_string_fields_are_missing() {
        let catalog = PromptCatalog::load().unwrap();
        let spec = catalog.get(UseCase::GenerateProblem);

        for body in [
            json!({ "dataStructure": "graph" }),
            json!({ "dataStructure": "graph", "difficulty": "" }),
            json!({ "dataStructure": null, "difficulty": "easy" }),
            json!({ "dataStructure": 7, "difficulty": "easy" }),
        ] {
            let err = extract_variables(spec, &object(body)).unwrap_err();
            assert_eq!(err.to_string(), "Missing dataStructure or difficulty");
        }
    }

    #[test]
    fn whitespace_only_value_is_present() {
        let catalog = PromptCatalog::load().unwrap();
        let spec = catalog.get(UseCase::EvaluateSolution);
        let body = object(json!({ "problem": "p", "solution": " " }));
        let vars = extract_variables(spec, &body).unwrap();
        assert_eq!(vars["solution"], " ");
    }
}
