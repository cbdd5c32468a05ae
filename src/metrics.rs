use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("trainer_requests_total", "Total number of API requests").unwrap();
    pub static ref PROBLEMS_GENERATED: Counter =
        register_counter!("trainer_problems_generated_total", "Problems returned to clients").unwrap();
    pub static ref QUOTA_REJECTIONS: Counter =
        register_counter!("trainer_quota_rejections_total", "Problem requests refused by the daily quota").unwrap();
    pub static ref EVAL_CACHE_HITS: Counter =
        register_counter!("trainer_eval_cache_hits_total", "Evaluation cache hits").unwrap();
    pub static ref EVAL_CACHE_MISSES: Counter =
        register_counter!("trainer_eval_cache_misses_total", "Evaluation cache misses").unwrap();
    pub static ref EVAL_CACHE_SIZE: Gauge =
        register_gauge!("trainer_eval_cache_size", "Current number of cached evaluations").unwrap();
    pub static ref QUOTA_IDENTITIES: Gauge =
        register_gauge!("trainer_quota_identities", "Identities with a quota record").unwrap();
    pub static ref TUTOR_LATENCY: Histogram = register_histogram!(
        "trainer_tutor_latency_seconds",
        "Time from queueing a tutor job to its reply"
    )
    .unwrap();
}

// Render every registered metric in the text exposition format
pub fn render() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| e.to_string())?;
    String::from_utf8(buffer).map_err(|e| e.to_string())
}
