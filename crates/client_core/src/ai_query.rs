//! Question/answer lifecycle for the AI assistant panel.
//!
//! Independent of the list: it has its own generation counter and never reads
//! or writes list state. Overlapping questions are allowed to run to completion
//! on the wire, but only the newest one may settle the exchange.

use std::{sync::Arc, time::Duration};

use shared::error::FetchError;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    generation::{Generation, GenerationCounter},
    transport::{with_timeout, AnswerApi},
};

/// Shown for every failed question regardless of cause.
pub const AI_FAILURE_MESSAGE: &str =
    "Maaf, terjadi kesalahan saat berkomunikasi dengan asisten AI. Silakan coba lagi nanti.";
pub const AI_BUSY_MESSAGE: &str = "Memproses pertanyaan...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiPhase {
    Idle,
    Submitting,
    Answered,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiExchange {
    pub question: String,
    pub answer: Option<String>,
    pub phase: AiPhase,
}

impl AiExchange {
    pub fn failure_message(&self) -> Option<&'static str> {
        (self.phase == AiPhase::Failed).then_some(AI_FAILURE_MESSAGE)
    }

    pub fn status_line(&self) -> Option<&str> {
        match self.phase {
            AiPhase::Idle => None,
            AiPhase::Submitting => Some(AI_BUSY_MESSAGE),
            AiPhase::Answered => self.answer.as_deref(),
            AiPhase::Failed => Some(AI_FAILURE_MESSAGE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiSnapshot {
    pub generation: Generation,
    pub exchange: Option<AiExchange>,
}

impl AiSnapshot {
    pub fn phase(&self) -> AiPhase {
        self.exchange
            .as_ref()
            .map_or(AiPhase::Idle, |exchange| exchange.phase)
    }

    pub fn is_submitting(&self) -> bool {
        self.phase() == AiPhase::Submitting
    }
}

#[derive(Debug, Clone)]
pub struct PendingAsk {
    pub generation: Generation,
    pub question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOutcome {
    /// Blank question; nothing changed and nothing was sent.
    Ignored,
    Answered,
    Failed,
    /// A newer question was asked before this answer arrived.
    Superseded,
}

#[derive(Default)]
struct AiState {
    generations: GenerationCounter,
    exchange: Option<AiExchange>,
}

pub struct AiQueryController {
    api: Arc<dyn AnswerApi>,
    request_timeout: Duration,
    inner: Mutex<AiState>,
}

impl AiQueryController {
    pub fn new(api: Arc<dyn AnswerApi>, request_timeout: Duration) -> Self {
        Self {
            api,
            request_timeout,
            inner: Mutex::new(AiState::default()),
        }
    }

    pub async fn snapshot(&self) -> AiSnapshot {
        let state = self.inner.lock().await;
        AiSnapshot {
            generation: state.generations.current(),
            exchange: state.exchange.clone(),
        }
    }

    pub async fn ask(&self, question: &str) -> AskOutcome {
        let Some(pending) = self.begin_ask(question).await else {
            return AskOutcome::Ignored;
        };
        let response =
            with_timeout(self.request_timeout, self.api.ask(&pending.question)).await;
        self.apply_answer(pending.generation, response).await
    }

    /// Transition into `Submitting`, replacing any previous exchange. Returns
    /// `None` without touching state when the question is blank.
    pub async fn begin_ask(&self, question: &str) -> Option<PendingAsk> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        let mut state = self.inner.lock().await;
        let generation = state.generations.advance();
        state.exchange = Some(AiExchange {
            question: question.to_string(),
            answer: None,
            phase: AiPhase::Submitting,
        });
        debug!(generation = generation.0, "ai: question submitted");
        Some(PendingAsk {
            generation,
            question: question.to_string(),
        })
    }

    /// Settle the exchange for `generation`, unless a newer question exists.
    pub async fn apply_answer(
        &self,
        generation: Generation,
        response: Result<String, FetchError>,
    ) -> AskOutcome {
        let mut state = self.inner.lock().await;
        if !state.generations.is_current(generation) {
            debug!(
                generation = generation.0,
                current = state.generations.current().0,
                "ai: stale answer discarded"
            );
            return AskOutcome::Superseded;
        }
        let Some(exchange) = state.exchange.as_mut() else {
            return AskOutcome::Superseded;
        };

        match response {
            Ok(answer) => {
                info!(generation = generation.0, "ai: answer received");
                exchange.answer = Some(answer);
                exchange.phase = AiPhase::Answered;
                AskOutcome::Answered
            }
            Err(err) => {
                warn!(
                    generation = generation.0,
                    kind = err.kind().as_str(),
                    error = %err,
                    "ai: question failed"
                );
                exchange.answer = None;
                exchange.phase = AiPhase::Failed;
                AskOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/ai_query_tests.rs"]
mod tests;
