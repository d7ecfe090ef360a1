//! Run Turn use case.
//!
//! Takes one user message through the dispatch loop:
//!
//! 1. Build the prompt from the tool list and the message
//! 2. Ask the model backend for text (`AwaitModel → GotText`)
//! 3. Extract an embedded tool call (`NoCallFound | CallFound`)
//! 4. Dispatch it through the [`ToolExecutorPort`] (`Dispatched`)
//! 5. Produce exactly one reply (`Responded`)
//!
//! Tool failures and backend failures are part of the reply, never errors.
//! The only error is cancellation.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::shared::{check_cancelled, run_cancellable};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use toolgate_domain::prompt::AgentPromptTemplate;
use toolgate_domain::tool::{
    entities::ToolCall,
    extraction::{Extraction, NoCallReason, extract_tool_call},
    value_objects::ToolResult,
};
use toolgate_domain::turn::{TurnPhase, TurnTrace, render_backend_error, render_tool_response};
use toolgate_domain::util::preview;
use tracing::{debug, info, warn};

/// Errors that can occur during a turn.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RunTurnError {
    #[error("Turn cancelled")]
    Cancelled,
}

impl RunTurnError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunTurnError::Cancelled)
    }
}

/// Input for the [`RunTurnUseCase`].
#[derive(Debug, Clone)]
pub struct RunTurnInput {
    /// The user's message.
    pub message: String,
}

impl RunTurnInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Everything a turn produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunTurnOutput {
    /// The single user-visible reply
    pub response: String,
    /// Raw model text, absent when the backend failed
    pub model_text: Option<String>,
    /// Why the text was not treated as a call
    pub no_call_reason: Option<NoCallReason>,
    /// The extracted call, if any
    pub call: Option<ToolCall>,
    /// The dispatch outcome, if a call was dispatched
    pub result: Option<ToolResult>,
    /// Phases visited, starting at `AwaitModel` and ending at `Responded`
    pub phases: Vec<TurnPhase>,
}

/// Use case for running one dispatch turn.
///
/// Holds only shared, immutable collaborators so concurrent turns can use
/// the same instance.
pub struct RunTurnUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
}

impl Clone for RunTurnUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
        }
    }
}

impl RunTurnUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, tool_executor: Arc<dyn ToolExecutorPort>) -> Self {
        Self {
            gateway,
            tool_executor,
        }
    }

    /// Run a turn to completion.
    pub async fn execute(&self, input: RunTurnInput) -> Result<RunTurnOutput, RunTurnError> {
        self.run(input, None).await
    }

    /// Run a turn that stops as soon as `token` is cancelled.
    ///
    /// Cancellation drops the in-flight model request or tool dispatch.
    pub async fn execute_cancellable(
        &self,
        input: RunTurnInput,
        token: CancellationToken,
    ) -> Result<RunTurnOutput, RunTurnError> {
        self.run(input, Some(token)).await
    }

    async fn run(
        &self,
        input: RunTurnInput,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<RunTurnOutput, RunTurnError> {
        check_cancelled(&cancellation_token)?;
        info!(
            model = self.gateway.model(),
            "Starting turn: {}",
            preview(&input.message, 100)
        );

        let mut trace = TurnTrace::new();
        let prompt = AgentPromptTemplate::user_turn(self.tool_executor.tool_spec(), &input.message);

        let completion = run_cancellable(&cancellation_token, self.gateway.complete(&prompt)).await?;
        trace.advance(TurnPhase::GotText);

        let model_text = match completion {
            Ok(text) => text,
            Err(e) => {
                // Backend failures become the reply; they are never parsed for calls
                warn!(error = %e, "Model backend failed");
                trace.advance(TurnPhase::NoCallFound);
                trace.advance(TurnPhase::Responded);
                return Ok(RunTurnOutput {
                    response: render_backend_error(&e.to_string()),
                    model_text: None,
                    no_call_reason: None,
                    call: None,
                    result: None,
                    phases: trace.phases().to_vec(),
                });
            }
        };
        debug!("Model text: {}", preview(&model_text, 200));

        let call = match extract_tool_call(&model_text) {
            Extraction::Call(call) => call,
            Extraction::NoCall(reason) => {
                if let Some(diagnostic) = reason.to_tool_error() {
                    debug!(error = %diagnostic, "Ambiguous tool-call candidates, treating as text");
                } else {
                    debug!(reason = reason.as_str(), "No tool call in model text");
                }
                trace.advance(TurnPhase::NoCallFound);
                trace.advance(TurnPhase::Responded);
                return Ok(RunTurnOutput {
                    response: model_text.clone(),
                    model_text: Some(model_text),
                    no_call_reason: Some(reason),
                    call: None,
                    result: None,
                    phases: trace.phases().to_vec(),
                });
            }
        };
        trace.advance(TurnPhase::CallFound);

        info!(tool = %call.tool_name, "Dispatching extracted tool call");
        if let Some(reasoning) = &call.reasoning {
            debug!(tool = %call.tool_name, "Model reasoning: {}", preview(reasoning, 200));
        }

        let result = run_cancellable(&cancellation_token, self.tool_executor.execute(&call)).await?;
        trace.advance(TurnPhase::Dispatched);

        if let Some(error) = result.error() {
            warn!(tool = %call.tool_name, error = %error, "Tool call failed");
        }

        let response = render_tool_response(&result);
        trace.advance(TurnPhase::Responded);

        Ok(RunTurnOutput {
            response,
            model_text: Some(model_text),
            no_call_reason: None,
            call: Some(call),
            result: Some(result),
            phases: trace.phases().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use toolgate_domain::tool::entities::{ParamType, ToolDefinition, ToolParameter, ToolSpec};
    use toolgate_domain::tool::value_objects::{ToolError, ToolErrorKind};

    // ==================== Test Mocks ====================

    struct MockGateway {
        reply: Result<String, String>,
        delay: Duration,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGateway {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: Duration::ZERO,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                reply: Err(reason.to_string()),
                delay: Duration::ZERO,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn slow(text: &str, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::replying(text)
            }
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        fn model(&self) -> &str {
            "mock"
        }

        async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone().map_err(GatewayError::ConnectionError)
        }
    }

    struct MockExecutor {
        spec: ToolSpec,
        delay: Duration,
        finished: AtomicBool,
    }

    impl MockExecutor {
        fn new() -> Self {
            let spec = ToolSpec::new().register(
                ToolDefinition::new("add_numbers", "Add two numbers together")
                    .with_parameter(
                        ToolParameter::new("a", "First number", true).with_type(ParamType::Number),
                    )
                    .with_parameter(
                        ToolParameter::new("b", "Second number", true).with_type(ParamType::Number),
                    ),
            );
            Self {
                spec,
                delay: Duration::ZERO,
                finished: AtomicBool::new(false),
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for MockExecutor {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.finished.store(true, Ordering::SeqCst);
            if !self.has_tool(&call.tool_name) {
                return ToolResult::failure(
                    &call.tool_name,
                    ToolError::tool_not_found(&call.tool_name),
                );
            }
            let a = call.get_i64("a").unwrap_or_default();
            let b = call.get_i64("b").unwrap_or_default();
            ToolResult::success(&call.tool_name, a + b)
        }
    }

    fn use_case(gateway: MockGateway, executor: MockExecutor) -> RunTurnUseCase {
        RunTurnUseCase::new(Arc::new(gateway), Arc::new(executor))
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_plain_reply_is_returned_unchanged() {
        let uc = use_case(MockGateway::replying("Paris."), MockExecutor::new());

        let output = uc.execute(RunTurnInput::new("Capital of France?")).await.unwrap();

        assert_eq!(output.response, "Paris.");
        assert_eq!(output.no_call_reason, Some(NoCallReason::NoBraces));
        assert!(output.call.is_none());
        assert_eq!(
            output.phases,
            vec![
                TurnPhase::AwaitModel,
                TurnPhase::GotText,
                TurnPhase::NoCallFound,
                TurnPhase::Responded
            ]
        );
    }

    #[tokio::test]
    async fn test_prompt_lists_tools_and_message() {
        let gateway = Arc::new(MockGateway::replying("ok"));
        let uc = RunTurnUseCase::new(gateway.clone(), Arc::new(MockExecutor::new()));

        uc.execute(RunTurnInput::new("add 2 and 3")).await.unwrap();

        let prompts = gateway.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- add_numbers: Add two numbers together"));
        assert!(prompts[0].ends_with("User: add 2 and 3"));
    }

    #[tokio::test]
    async fn test_embedded_call_is_dispatched() {
        let uc = use_case(
            MockGateway::replying(
                r#"I'll add them: {"thought": "math", "tool": "add_numbers", "parameters": {"a": 2, "b": 3}}"#,
            ),
            MockExecutor::new(),
        );

        let output = uc.execute(RunTurnInput::new("add 2 and 3")).await.unwrap();

        assert_eq!(output.response, "Tool 'add_numbers' executed: 5");
        let result = output.result.unwrap();
        assert!(result.is_success());
        assert_eq!(result.output(), Some(&serde_json::json!(5)));
        assert_eq!(output.call.unwrap().reasoning.as_deref(), Some("math"));
        assert_eq!(
            output.phases,
            vec![
                TurnPhase::AwaitModel,
                TurnPhase::GotText,
                TurnPhase::CallFound,
                TurnPhase::Dispatched,
                TurnPhase::Responded
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_tool_is_not_fatal() {
        let uc = use_case(
            MockGateway::replying(r#"{"tool": "launch_rocket", "parameters": {}}"#),
            MockExecutor::new(),
        );

        let output = uc.execute(RunTurnInput::new("go")).await.unwrap();

        assert_eq!(
            output.result.unwrap().error_kind(),
            Some(ToolErrorKind::ToolNotFound)
        );
        assert!(output.response.starts_with("Tool 'launch_rocket' failed: [TOOL_NOT_FOUND]"));
        assert_eq!(output.phases.last(), Some(&TurnPhase::Responded));
    }

    #[tokio::test]
    async fn test_ambiguous_text_is_returned_as_text() {
        let uc = use_case(
            MockGateway::replying("maybe {tool: add_numbers} works"),
            MockExecutor::new(),
        );

        let output = uc.execute(RunTurnInput::new("hm")).await.unwrap();

        assert_eq!(output.response, "maybe {tool: add_numbers} works");
        assert!(matches!(
            output.no_call_reason,
            Some(NoCallReason::Ambiguous { .. })
        ));
    }

    #[tokio::test]
    async fn test_backend_error_becomes_reply() {
        let uc = use_case(MockGateway::failing("connection refused"), MockExecutor::new());

        let output = uc.execute(RunTurnInput::new("hello")).await.unwrap();

        assert_eq!(
            output.response,
            "Model backend error: Connection error: connection refused"
        );
        assert!(output.model_text.is_none());
        assert_eq!(output.phases.last(), Some(&TurnPhase::Responded));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let uc = use_case(MockGateway::replying("hi"), MockExecutor::new());
        let token = CancellationToken::new();
        token.cancel();

        let err = uc
            .execute_cancellable(RunTurnInput::new("hello"), token)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_abandons_model_call() {
        let uc = use_case(
            MockGateway::slow("too late", Duration::from_secs(30)),
            MockExecutor::new(),
        );
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            uc.execute_cancellable(RunTurnInput::new("hello"), token),
        )
        .await
        .expect("cancellation should be prompt");

        assert_eq!(outcome.unwrap_err(), RunTurnError::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_abandons_dispatch() {
        let executor = Arc::new(MockExecutor::slow(Duration::from_secs(30)));
        let uc = RunTurnUseCase::new(
            Arc::new(MockGateway::replying(
                r#"{"tool": "add_numbers", "parameters": {"a": 1, "b": 1}}"#,
            )),
            executor.clone(),
        );
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            uc.execute_cancellable(RunTurnInput::new("add"), token),
        )
        .await
        .expect("cancellation should be prompt");

        assert!(outcome.unwrap_err().is_cancelled());
        assert!(!executor.finished.load(Ordering::SeqCst));
    }
}
