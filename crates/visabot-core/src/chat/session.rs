//! ChatSession -- a single conversational context with the remote service.
//!
//! The session owns the system instruction, the model selector, and the
//! turn history. Every `send_message` call replays the history so the
//! remote model sees the whole conversation.
//!
//! One session is shared by every caller of the relay. Concurrent calls
//! each snapshot the history before their remote round trip and append
//! their own turn after it, so unrelated conversations interleave in the
//! same history in completion order.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use visabot_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message};

use crate::llm::box_provider::BoxLlmProvider;

/// A long-lived conversational session with the remote generative-language service.
pub struct ChatSession {
    id: Uuid,
    model: String,
    system_instruction: String,
    started_at: DateTime<Utc>,
    provider: BoxLlmProvider,
    history: Mutex<Vec<Message>>,
}

impl ChatSession {
    /// Open a session against `provider` with a fixed model and system instruction.
    pub fn open(
        provider: BoxLlmProvider,
        model: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            model: model.into(),
            system_instruction: system_instruction.into(),
            started_at: Utc::now(),
            provider,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Number of turns (user and model) recorded so far.
    pub fn history_len(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Send one user message and return the model's reply.
    ///
    /// The user turn and the reply are appended to the history only when
    /// the remote call succeeds.
    pub async fn send_message(&self, text: &str) -> Result<CompletionResponse, LlmError> {
        let user_turn = Message::user(text);
        let request = self.build_request(user_turn.clone());

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %self.model,
            session_id = %self.id,
            history_len = request.messages.len() - 1,
        );

        let response = self.provider.complete(&request).instrument(span).await?;

        debug!(
            session_id = %self.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            finish_reason = %response.finish_reason,
            "Chat turn completed"
        );

        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.push(user_turn);
        history.push(Message::model(response.content.clone()));

        Ok(response)
    }

    /// Build a request carrying the current history followed by `user_turn`.
    fn build_request(&self, user_turn: Message) -> CompletionRequest {
        let mut messages = self
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        messages.push(user_turn);

        CompletionRequest {
            model: self.model.clone(),
            system: Some(self.system_instruction.clone()),
            messages,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use visabot_types::llm::{FinishReason, MessageRole, Usage};

    use crate::llm::provider::LlmProvider;

    /// Replies with the number of messages it was sent; fails on "fail".
    #[derive(Default)]
    struct CountingProvider {
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl LlmProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            if request.messages.last().map(|m| m.content.as_str()) == Some("fail") {
                return Err(LlmError::Network("connection refused".into()));
            }
            Ok(CompletionResponse {
                id: Some("resp-1".into()),
                content: format!("seen {}", request.messages.len()),
                model: request.model.clone(),
                finish_reason: FinishReason::Stop,
                usage: Usage {
                    input_tokens: 3,
                    output_tokens: 2,
                },
            })
        }
    }

    fn make_session() -> (ChatSession, Arc<Mutex<Vec<CompletionRequest>>>) {
        let provider = CountingProvider::default();
        let seen = provider.seen.clone();
        let session = ChatSession::open(
            BoxLlmProvider::new(provider),
            "gemini-flash-latest",
            "Only talk about visas.",
        );
        (session, seen)
    }

    #[tokio::test]
    async fn test_send_message_carries_system_instruction_and_model() {
        let (session, seen) = make_session();
        let reply = session.send_message("hello").await.unwrap();
        assert_eq!(reply.content, "seen 1");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "gemini-flash-latest");
        assert_eq!(seen[0].system.as_deref(), Some("Only talk about visas."));
        assert_eq!(seen[0].messages, vec![Message::user("hello")]);
    }

    #[tokio::test]
    async fn test_history_grows_with_each_successful_turn() {
        let (session, seen) = make_session();
        session.send_message("first").await.unwrap();
        let reply = session.send_message("second").await.unwrap();

        assert_eq!(reply.content, "seen 3");
        assert_eq!(session.history_len(), 4);

        let seen = seen.lock().unwrap();
        let roles: Vec<_> = seen[1].messages.iter().map(|m| m.role.clone()).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::Model, MessageRole::User]
        );
        assert_eq!(seen[1].messages[1].content, "seen 1");
    }

    #[tokio::test]
    async fn test_failed_turn_is_not_recorded() {
        let (session, _) = make_session();
        session.send_message("first").await.unwrap();
        let err = session.send_message("fail").await.unwrap_err();

        assert!(matches!(err, LlmError::Network(_)));
        assert_eq!(session.history_len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_turns_are_all_recorded() {
        let (session, seen) = make_session();
        let messages = ["one", "two", "three", "four"];
        let replies =
            futures_util::future::join_all(messages.iter().map(|m| session.send_message(m))).await;

        assert!(replies.iter().all(Result::is_ok));
        assert_eq!(session.history_len(), 8);
        assert_eq!(seen.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_session_accessors() {
        let (session, _) = make_session();
        assert_eq!(session.model(), "gemini-flash-latest");
        assert_eq!(session.provider_name(), "counting");
        assert_eq!(session.history_len(), 0);
        assert!(session.started_at() <= Utc::now());
    }
}
