use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::oneshot;

use crate::claude::ClaudeApiError;

// Difficulty tiers offered by the trainer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    MiddleSchool,
    HighSchool,
    BasicVerbs,
    BusinessEmail,
    Toeic,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::MiddleSchool => "middle_school",
            Difficulty::HighSchool => "high_school",
            Difficulty::BasicVerbs => "basic_verbs",
            Difficulty::BusinessEmail => "business_email",
            Difficulty::Toeic => "toeic",
        }
    }

    // Short description handed to the tutor
    pub fn describe(&self) -> &'static str {
        match self {
            Difficulty::MiddleSchool => "junior high school level, short everyday sentences",
            Difficulty::HighSchool => "senior high school level, compound sentences",
            Difficulty::BasicVerbs => "practice with basic verbs such as get, take, make and have",
            Difficulty::BusinessEmail => "polite business email phrasing",
            Difficulty::Toeic => "TOEIC-style workplace sentences",
        }
    }
}

// Japanese sentence to translate
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Problem {
    pub japanese: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateProblemRequest {
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProblemResponse {
    pub problem: Problem,
    pub current_count: u32,
    pub daily_limit: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub japanese: String,
    pub user_translation: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub correct_translation: String,
    pub feedback: String,
    #[serde(deserialize_with = "clamped_score")]
    pub score: u8,
    #[serde(default)]
    pub improvements: Vec<String>,
}

// Model scores arrive as any JSON number; round and clamp into 0..=100
fn clamped_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    pub user_id: String,
    pub current_count: u32,
    pub daily_limit: u32,
    pub remaining: u32,
    pub daily_limit_reached: bool,
}

// Work handed to the tutor worker
#[derive(Debug, Clone)]
pub enum TutorJob {
    Problem(Difficulty),
    Evaluate(EvaluateRequest),
}

#[derive(Debug)]
pub enum TutorReply {
    Problem(Problem),
    Evaluation(Evaluation),
}

// Queued job - holds the job + response channel
pub struct QueuedJob {
    pub job: TutorJob,
    pub response_tx: oneshot::Sender<Result<TutorReply, ClaudeApiError>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn difficulty_wire_names() {
        let d: Difficulty = serde_json::from_value(json!("business_email")).unwrap();
        assert_eq!(d, Difficulty::BusinessEmail);
        assert_eq!(serde_json::to_value(Difficulty::Toeic).unwrap(), json!("toeic"));
        assert_eq!(Difficulty::MiddleSchool.as_str(), "middle_school");
    }

    #[test]
    fn evaluate_request_uses_camel_case() {
        let req: EvaluateRequest = serde_json::from_value(json!({
            "japanese": "私は毎朝コーヒーを飲みます。",
            "userTranslation": "I drink coffee every morning.",
            "difficulty": "middle_school"
        }))
        .unwrap();
        assert_eq!(req.user_translation, "I drink coffee every morning.");
    }

    #[test]
    fn evaluation_score_is_clamped() {
        let score = |raw: serde_json::Value| {
            serde_json::from_value::<Evaluation>(json!({
                "correctTranslation": "I like cats.",
                "feedback": "ok",
                "score": raw
            }))
            .unwrap()
            .score
        };
        assert_eq!(score(json!(85)), 85);
        assert_eq!(score(json!(85.5)), 86);
        assert_eq!(score(json!(-1)), 0);
        assert_eq!(score(json!(300)), 100);
    }

    #[test]
    fn evaluation_score_must_be_numeric() {
        let parsed = serde_json::from_value::<Evaluation>(json!({
            "correctTranslation": "I like cats.",
            "feedback": "ok",
            "score": "high"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn usage_response_field_names() {
        let body = serde_json::to_value(UsageResponse {
            user_id: "anonymous".into(),
            current_count: 3,
            daily_limit: 100,
            remaining: 97,
            daily_limit_reached: false,
        })
        .unwrap();
        assert_eq!(body["currentCount"], 3);
        assert_eq!(body["dailyLimit"], 100);
        assert_eq!(body["dailyLimitReached"], false);
    }
}
