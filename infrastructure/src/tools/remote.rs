//! fetch_remote_doc tool: fetch a document from the remote docs API

use async_trait::async_trait;
use refdesk_application::ports::external_call::ExternalRequest;
use refdesk_application::ports::tool_handler::{HandlerError, ToolHandler};
use refdesk_application::resilience::GuardedDependency;
use refdesk_domain::catalog::{CatalogRepository, RemoteDocument};
use refdesk_domain::tool::{CachePolicy, ToolDefinition, ToolInvocation, ToolPayload};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::{MAX_SUGGESTIONS, name_parameter};

/// Tool name constant
pub const FETCH_REMOTE_DOC: &str = "fetch_remote_doc";

pub fn fetch_remote_doc_definition(dependency: &str) -> ToolDefinition {
    ToolDefinition::new(
        FETCH_REMOTE_DOC,
        "Fetch the full document for an entry from the remote docs API.",
    )
    .with_parameter(name_parameter())
    .with_dependency(dependency)
    .with_cache_policy(CachePolicy::success_for(Duration::from_secs(10 * 60)))
}

/// Handler for `fetch_remote_doc`
///
/// The remote API answers `GET {base_url}/{name}` with a JSON object
/// (`title`, `body`) or a plain-text body.
pub struct FetchRemoteDocHandler {
    definition: ToolDefinition,
    dependency: GuardedDependency,
    catalog: Option<Arc<dyn CatalogRepository>>,
}

impl FetchRemoteDocHandler {
    pub fn new(dependency: GuardedDependency) -> Self {
        Self {
            definition: fetch_remote_doc_definition(dependency.name()),
            dependency,
            catalog: None,
        }
    }

    /// Use the local catalog to suggest names when the remote has no document
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogRepository>) -> Self {
        self.catalog = Some(catalog);
        self
    }
}

fn parse_document(name: &str, url: String, body: Value) -> Result<RemoteDocument, HandlerError> {
    match body {
        Value::Object(map) => {
            let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
            let body = text("body").or_else(|| text("content")).ok_or_else(|| {
                HandlerError::internal(format!(
                    "Remote document '{}' has no 'body' field",
                    name
                ))
            })?;
            Ok(RemoteDocument {
                name: name.to_string(),
                title: text("title").unwrap_or_else(|| name.to_string()),
                body,
                source_url: url,
            })
        }
        Value::String(body) => Ok(RemoteDocument {
            name: name.to_string(),
            title: name.to_string(),
            body,
            source_url: url,
        }),
        other => Err(HandlerError::internal(format!(
            "Remote document '{}' has unexpected shape: {}",
            name, other
        ))),
    }
}

#[async_trait]
impl ToolHandler for FetchRemoteDocHandler {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn handle(&self, invocation: &ToolInvocation) -> Result<ToolPayload, HandlerError> {
        let name = invocation
            .require_string("name")
            .map_err(HandlerError::internal)?;

        let response = self.dependency.call(ExternalRequest::get(name)).await?;

        if response.is_not_found() {
            let suggestions = self
                .catalog
                .as_ref()
                .map(|c| c.suggest(name, MAX_SUGGESTIONS))
                .unwrap_or_default();
            return Err(HandlerError::not_found(
                format!("No remote document named '{}'", name),
                suggestions,
            ));
        }
        if !response.is_success() {
            return Err(HandlerError::Dependency {
                dependency: self.dependency.name().to_string(),
                message: format!("Unexpected HTTP status {}", response.status),
            });
        }

        parse_document(name, response.url, response.body).map(ToolPayload::RemoteDocument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use refdesk_application::ports::external_call::{
        ExternalCallError, ExternalCallPort, ExternalResponse,
    };
    use refdesk_application::resilience::CircuitBreaker;
    use refdesk_domain::resilience::{BreakerPolicy, BreakerState};
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers every request with the same canned outcome
    struct FixedPort {
        outcome: Result<ExternalResponse, ExternalCallError>,
        paths: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ExternalCallPort for FixedPort {
        async fn call(&self, request: ExternalRequest) -> Result<ExternalResponse, ExternalCallError> {
            self.paths.lock().unwrap().push(request.path);
            self.outcome.clone()
        }
    }

    fn handler(outcome: Result<ExternalResponse, ExternalCallError>) -> (FetchRemoteDocHandler, Arc<FixedPort>) {
        let port = Arc::new(FixedPort {
            outcome,
            paths: Mutex::new(Vec::new()),
        });
        let breaker = Arc::new(CircuitBreaker::new(
            "remote_docs",
            BreakerPolicy::new(2, Duration::from_secs(60)),
        ));
        let dependency = GuardedDependency::new(port.clone(), breaker);
        let handler = FetchRemoteDocHandler::new(dependency)
            .with_catalog(Arc::new(StaticCatalog::builtin().unwrap()));
        (handler, port)
    }

    fn call(name: &str) -> ToolInvocation {
        ToolInvocation::new(FETCH_REMOTE_DOC).with_arg("name", name)
    }

    #[tokio::test]
    async fn test_fetch_json_document() {
        let (handler, port) = handler(Ok(ExternalResponse::new(
            200,
            json!({"title": "Retry with Backoff", "body": "Full text"}),
        )
        .with_url("https://docs.example.org/api/entries/retry")));

        match handler.handle(&call("retry")).await.unwrap() {
            ToolPayload::RemoteDocument(doc) => {
                assert_eq!(doc.name, "retry");
                assert_eq!(doc.title, "Retry with Backoff");
                assert_eq!(doc.body, "Full text");
                assert!(doc.source_url.ends_with("/retry"));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
        assert_eq!(*port.paths.lock().unwrap(), vec!["retry".to_string()]);
        assert_eq!(handler.definition().dependency.as_deref(), Some("remote_docs"));
    }

    #[tokio::test]
    async fn test_fetch_plain_text_document() {
        let (handler, _) = handler(Ok(ExternalResponse::new(200, json!("plain body"))));
        match handler.handle(&call("retry")).await.unwrap() {
            ToolPayload::RemoteDocument(doc) => {
                assert_eq!(doc.title, "retry");
                assert_eq!(doc.body, "plain body");
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let (handler, _) = handler(Ok(ExternalResponse::new(404, json!({"error": "missing"}))));
        match handler.handle(&call("circut-breaker")).await.unwrap_err() {
            HandlerError::NotFound { suggestions, .. } => {
                assert_eq!(suggestions[0], "circuit-breaker");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_errors_open_the_circuit() {
        let (handler, port) = handler(Ok(ExternalResponse::new(502, json!(null))));

        for _ in 0..2 {
            let err = handler.handle(&call("retry")).await.unwrap_err();
            assert!(matches!(err, HandlerError::Dependency { .. }));
        }
        assert_eq!(handler.dependency.breaker().state(), BreakerState::Open);

        let err = handler.handle(&call("retry")).await.unwrap_err();
        assert!(matches!(err, HandlerError::CircuitOpen(ref d) if d == "remote_docs"));
        assert_eq!(port.paths.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_document_is_internal() {
        let err = parse_document("retry", String::new(), json!({"title": "x"})).unwrap_err();
        assert!(matches!(err, HandlerError::Internal(_)));
        let err = parse_document("retry", String::new(), json!(42)).unwrap_err();
        assert!(matches!(err, HandlerError::Internal(_)));
    }
}
