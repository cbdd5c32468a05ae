use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

use crate::models::{EvaluateRequest, Evaluation};

// Cache entry with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub evaluation: Evaluation,
    pub created_at: Instant,
}

impl CacheEntry {
    pub fn new(evaluation: Evaluation) -> Self {
        Self {
            evaluation,
            created_at: Instant::now(),
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

// Cache key: hash of difficulty + japanese + translation, NUL-separated
pub fn make_cache_key(req: &EvaluateRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(req.difficulty.as_str());
    hasher.update([0u8]);
    hasher.update(req.japanese.trim());
    hasher.update([0u8]);
    hasher.update(req.user_translation.trim());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn req(japanese: &str, translation: &str) -> EvaluateRequest {
        EvaluateRequest {
            japanese: japanese.to_string(),
            user_translation: translation.to_string(),
            difficulty: Difficulty::HighSchool,
        }
    }

    #[test]
    fn same_answer_same_key() {
        assert_eq!(
            make_cache_key(&req("本を読む。", "I read a book.")),
            make_cache_key(&req(" 本を読む。", "I read a book.  "))
        );
    }

    #[test]
    fn field_boundaries_do_not_collide() {
        assert_ne!(
            make_cache_key(&req("ab", "c")),
            make_cache_key(&req("a", "bc"))
        );
    }

    #[test]
    fn difficulty_is_part_of_key() {
        let mut other = req("本を読む。", "I read a book.");
        other.difficulty = Difficulty::Toeic;
        assert_ne!(make_cache_key(&req("本を読む。", "I read a book.")), make_cache_key(&other));
    }

    #[test]
    fn freshness_respects_ttl() {
        let entry = CacheEntry::new(Evaluation {
            correct_translation: "I read a book.".into(),
            feedback: "Perfect.".into(),
            score: 100,
            improvements: vec![],
        });
        assert!(entry.is_fresh(Duration::from_secs(60)));
        assert!(!entry.is_fresh(Duration::ZERO));
    }
}
