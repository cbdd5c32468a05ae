use async_trait::async_trait;
use serde::Deserialize;

use crate::claude::{ClaudeApiClient, ClaudeApiError};
use crate::models::{Difficulty, EvaluateRequest, Evaluation, Problem};

/// The AI side of the trainer: produces problems and grades answers.
#[async_trait]
pub trait TranslationTutor: Send + Sync {
    async fn generate_problem(&self, difficulty: Difficulty) -> Result<Problem, ClaudeApiError>;

    async fn evaluate(&self, request: &EvaluateRequest) -> Result<Evaluation, ClaudeApiError>;
}

const SYSTEM_PROMPT: &str = "You are an English tutor for Japanese learners. \
Reply with a single JSON object and nothing else.";

#[derive(Deserialize)]
struct ProblemReply {
    japanese: String,
    #[serde(default)]
    hint: Option<String>,
}

pub struct ClaudeTutor {
    client: ClaudeApiClient,
}

impl ClaudeTutor {
    pub fn new(client: ClaudeApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TranslationTutor for ClaudeTutor {
    async fn generate_problem(&self, difficulty: Difficulty) -> Result<Problem, ClaudeApiError> {
        let prompt = format!(
            "Write one Japanese sentence for a learner to translate into English ({}). \
             Respond as {{\"japanese\": string, \"hint\": string}}.",
            difficulty.describe()
        );

        let reply: ProblemReply = self.client.reply_json(SYSTEM_PROMPT, &prompt, 512).await?;

        if reply.japanese.trim().is_empty() {
            return Err(ClaudeApiError::MalformedReply(
                "problem has no Japanese sentence".to_string(),
            ));
        }

        Ok(Problem {
            japanese: reply.japanese,
            hint: reply.hint.filter(|h| !h.trim().is_empty()),
            difficulty,
        })
    }

    async fn evaluate(&self, request: &EvaluateRequest) -> Result<Evaluation, ClaudeApiError> {
        let prompt = format!(
            "Level: {}\nJapanese: {}\nLearner's English: {}\n\
             Grade the translation. Respond as {{\"correctTranslation\": string, \
             \"feedback\": string, \"score\": integer 0-100, \"improvements\": [string]}}.",
            request.difficulty.describe(),
            request.japanese,
            request.user_translation
        );

        // score is clamped to 0..=100 while decoding
        self.client.reply_json(SYSTEM_PROMPT, &prompt, 1024).await
    }
}
