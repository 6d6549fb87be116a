use super::client::ModelGateway;
use super::prompts::{PromptCatalog, UseCase};
use super::template::Variables;
use crate::error::CoachError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Problem { problem: String },
    Solution { solution: String },
    Hints { hints: Vec<String> },
    Feedback { feedback: String },
    Error { error: String },
}

impl ResponsePayload {
    pub fn shape(use_case: UseCase, reply: String) -> Self {
        match use_case {
            UseCase::GenerateProblem => ResponsePayload::Problem { problem: reply },
            UseCase::GetSolution => ResponsePayload::Solution { solution: reply },
            UseCase::GetHints => ResponsePayload::Hints { hints: split_hints(&reply) },
            UseCase::EvaluateSolution => ResponsePayload::Feedback { feedback: reply },
        }
    }
}

/// One hint per line, exactly as the model wrote them. Empty lines are kept.
pub fn split_hints(reply: &str) -> Vec<String> {
    reply.split('\n').map(str::to_string).collect()
}

/// Runs a single use case: render the prompt, ask the model, shape the reply.
#[derive(Clone)]
pub struct Tutor {
    gateway: Arc<dyn ModelGateway>,
    catalog: Arc<PromptCatalog>,
}

impl Tutor {
    pub fn new(gateway: Arc<dyn ModelGateway>, catalog: Arc<PromptCatalog>) -> Self {
        Self { gateway, catalog }
    }

    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    pub async fn run(
        &self,
        use_case: UseCase,
        variables: &Variables,
    ) -> Result<ResponsePayload, CoachError> {
        let prompt = self.catalog.get(use_case).render(variables)?;
        let reply = self.gateway.complete(&prompt).await?;
        log::debug!("{} reply: {} chars", use_case.name(), reply.len());
        Ok(ResponsePayload::shape(use_case, reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::stub::StubGateway;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn tutor(stub: Arc<StubGateway>) -> Tutor {
        Tutor::new(stub, Arc::new(PromptCatalog::load().unwrap()))
    }

    #[test]
    fn hints_split_on_line_breaks_in_order() {
        assert_eq!(
            split_hints("1. Do X\n2. Do Y\n3. Do Z"),
            vec!["1. Do X", "2. Do Y", "3. Do Z"]
        );
    }

    #[test]
    fn hint_count_follows_the_reply() {
        assert_eq!(split_hints("only one"), vec!["only one"]);
        assert_eq!(split_hints("a\n\nb\n"), vec!["a", "", "b", ""]);
    }

    #[test]
    fn payloads_serialize_to_flat_objects() {
        let hints = ResponsePayload::shape(UseCase::GetHints, "1. a\n2. b".into());
        assert_eq!(serde_json::to_value(&hints).unwrap(), json!({ "hints": ["1. a", "2. b"] }));

        let feedback = ResponsePayload::shape(UseCase::EvaluateSolution, "Correct".into());
        assert_eq!(serde_json::to_value(&feedback).unwrap(), json!({ "feedback": "Correct" }));

        let err = ResponsePayload::Error { error: "boom".into() };
        assert_eq!(serde_json::to_value(&err).unwrap(), json!({ "error": "boom" }));
    }

    #[tokio::test]
    async fn run_renders_prompt_and_shapes_reply() {
        let stub = Arc::new(StubGateway::replying("Problem Title: Islands"));
        let tutor = tutor(stub.clone());

        let payload = tutor
            .run(
                UseCase::GenerateProblem,
                &vars(&[("data_structure", "graph"), ("difficulty", "medium")]),
            )
            .await
            .unwrap();

        assert_eq!(
            payload,
            ResponsePayload::Problem { problem: "Problem Title: Islands".into() }
        );
        assert_eq!(stub.calls(), 1);
        let prompt = stub.last_prompt().unwrap();
        assert!(prompt.contains("Generate a medium data structure problem involving graph."));
    }

    #[tokio::test]
    async fn render_failure_never_reaches_gateway() {
        let stub = Arc::new(StubGateway::replying("unused"));
        let tutor = tutor(stub.clone());

        let err = tutor
            .run(UseCase::GetHints, &vars(&[("problem", "p")]))
            .await
            .unwrap_err();

        assert!(matches!(err, CoachError::MissingVariable(ref n) if n == "code"));
        assert_eq!(stub.calls(), 0);
    }
}
