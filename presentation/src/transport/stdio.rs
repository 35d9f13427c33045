//! Line-delimited JSON transport
//!
//! Each input line is one request `{"name": "...", "params": {...}}`; each
//! output line is the matching response envelope. Lines are answered in
//! order. Malformed lines get a `VALIDATION_ERROR` envelope and the loop
//! keeps going.

use refdesk_application::ToolDispatcher;
use refdesk_domain::tool::{FieldViolation, ToolFailure, ToolResult};
use serde_json::Value;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub requests: usize,
    pub failures: usize,
}

fn malformed(field: &str, constraint: &str, message: impl Into<String>) -> ToolResult {
    ToolResult::failure(ToolFailure::validation(&[FieldViolation::new(
        field, constraint, message,
    )]))
}

/// Decode one request line and run it
async fn handle_line(dispatcher: &ToolDispatcher, line: &str) -> ToolResult {
    let request: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return malformed("request", "json", format!("Invalid JSON: {}", e)),
    };
    let Value::Object(mut request) = request else {
        return malformed("request", "type", "Expected a JSON object");
    };

    let name = match request.remove("name") {
        Some(Value::String(name)) => name,
        Some(_) => return malformed("name", "type", "Expected a string"),
        None => return malformed("name", "required", "Missing tool name"),
    };
    let params = request.remove("params").unwrap_or(Value::Null);

    dispatcher.invoke_json(&name, params).await
}

/// Serve requests from `reader` until EOF or cancellation
pub async fn serve_lines<R, W>(
    dispatcher: &ToolDispatcher,
    reader: R,
    mut writer: W,
    token: CancellationToken,
) -> io::Result<ServeSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut summary = ServeSummary::default();

    loop {
        let line = tokio::select! {
            _ = token.cancelled() => {
                info!("Transport cancelled");
                break;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            debug!("Input closed");
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = handle_line(dispatcher, line).await;
        summary.requests += 1;
        if !result.is_success() {
            summary.failures += 1;
        }

        let mut out = result.to_envelope().to_string();
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }

    info!(
        requests = summary.requests,
        failures = summary.failures,
        "Transport stopped"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use refdesk_application::ports::tool_handler::{HandlerError, ToolHandler};
    use refdesk_application::resilience::TtlCache;
    use refdesk_domain::tool::{ToolDefinition, ToolInvocation, ToolParameter, ToolPayload};
    use std::sync::Arc;
    use tokio::io::BufReader;

    struct EchoExamples {
        definition: ToolDefinition,
    }

    #[async_trait]
    impl ToolHandler for EchoExamples {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn handle(&self, invocation: &ToolInvocation) -> Result<ToolPayload, HandlerError> {
            let name = invocation
                .require_string("name")
                .map_err(HandlerError::internal)?;
            Ok(ToolPayload::Examples {
                name: name.to_string(),
                examples: vec![],
            })
        }
    }

    fn dispatcher() -> ToolDispatcher {
        let handler = EchoExamples {
            definition: ToolDefinition::new("get_examples", "echo")
                .with_parameter(ToolParameter::new("name", "slug", true)),
        };
        ToolDispatcher::new(Arc::new(TtlCache::new()))
            .register(Arc::new(handler))
            .unwrap()
    }

    async fn run(input: &str) -> (ServeSummary, Vec<Value>) {
        let mut output = Vec::new();
        let summary = serve_lines(
            &dispatcher(),
            BufReader::new(input.as_bytes()),
            &mut output,
            CancellationToken::new(),
        )
        .await
        .unwrap();
        let responses = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (summary, responses)
    }

    #[tokio::test]
    async fn test_one_response_per_request() {
        let input = concat!(
            r#"{"name": "get_examples", "params": {"name": " retry "}}"#,
            "\n\n",
            r#"{"name": "nope"}"#,
            "\n",
        );
        let (summary, responses) = run(input).await;

        assert_eq!(summary, ServeSummary { requests: 2, failures: 1 });
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["kind"], "examples");
        assert_eq!(responses[0]["name"], "retry");
        assert_eq!(responses[1]["code"], "UNKNOWN_TOOL");
    }

    #[tokio::test]
    async fn test_malformed_lines_keep_the_loop_alive() {
        let input = concat!(
            "not json\n",
            "[1, 2]\n",
            r#"{"params": {}}"#,
            "\n",
            r#"{"name": 7}"#,
            "\n",
            r#"{"name": "get_examples", "params": "retry"}"#,
            "\n",
        );
        let (summary, responses) = run(input).await;

        assert_eq!(summary.requests, 5);
        assert_eq!(summary.failures, 5);
        let constraints: Vec<_> = responses
            .iter()
            .map(|r| r["details"]["violations"][0]["constraint"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(constraints, vec!["json", "type", "required", "type", "type"]);
        assert!(responses.iter().all(|r| r["code"] == "VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_cancellation_stops_the_loop() {
        let (client, server) = tokio::io::duplex(64);
        let token = CancellationToken::new();
        let dispatcher = dispatcher();

        let stop = token.clone();
        let cancel = async move {
            tokio::task::yield_now().await;
            stop.cancel();
        };
        let (summary, _) = tokio::join!(
            serve_lines(&dispatcher, BufReader::new(server), tokio::io::sink(), token),
            cancel
        );

        assert_eq!(summary.unwrap().requests, 0);
        drop(client);
    }
}
