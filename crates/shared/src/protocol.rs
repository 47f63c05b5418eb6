use serde::{Deserialize, Serialize};

pub const SCRAPER_PATH: &str = "/scraper";

/// Body of `POST /scraper`. Carries no fields and serializes to `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperRunRequest {}

/// Body of `GET /scraper`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperStatus {
    pub runs_started: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_request_is_an_empty_json_object() {
        let encoded = serde_json::to_string(&ScraperRunRequest::default()).expect("encode");
        assert_eq!(encoded, "{}");
    }

    #[test]
    fn run_request_tolerates_unknown_fields() {
        let decoded: ScraperRunRequest =
            serde_json::from_str(r#"{"force":true}"#).expect("decode");
        assert_eq!(decoded, ScraperRunRequest {});
    }
}
