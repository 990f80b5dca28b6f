//! Summary generators.
//!
//! [`DisabledSummary`] never produces text. With the `llm` feature,
//! [`OpenAiSummaryAdapter`] asks a chat-completions endpoint for a short
//! paragraph. Every failure degrades to `None` so the report falls back to
//! its fixed sentence.

use crate::domain::summary::SummaryPayload;
use crate::ports::summary_port::SummaryPort;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant summarizing stock performance metrics. \
Write in simple, clear English. Be concise. \
Do NOT give financial advice (no 'buy/sell/should'). \
Use the numbers provided; do not invent data.";

pub const MAX_TOKENS: u32 = 260;
pub const TEMPERATURE: f32 = 0.4;

/// User message wrapping the payload JSON with the formatting instructions.
pub fn user_prompt(payload: &SummaryPayload) -> String {
    format!(
        "Write a short summary (120-180 words) of this analysis.\n\n\
         Requirements:\n\
         - 1 short paragraph + 3 bullet key takeaways.\n\
         - Mention return, volatility, and Sharpe ratio.\n\
         - If there are two tickers, mention who had better risk-adjusted performance.\n\
         - End with: 'Not financial advice.'\n\n\
         DATA:\n{}",
        payload.to_json()
    )
}

/// Summary generator for runs without a language model.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSummary;

impl SummaryPort for DisabledSummary {
    fn summarize(&self, _payload: &SummaryPayload, _enabled: bool) -> Option<String> {
        None
    }
}

#[cfg(feature = "llm")]
pub use openai::OpenAiSummaryAdapter;

#[cfg(feature = "llm")]
mod openai {
    use super::{MAX_TOKENS, SYSTEM_PROMPT, TEMPERATURE, user_prompt};
    use crate::domain::error::AgentError;
    use crate::domain::run_config::SummaryConfig;
    use crate::domain::summary::SummaryPayload;
    use crate::ports::summary_port::SummaryPort;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;
    use tracing::{debug, warn};

    const TIMEOUT_SECS: u64 = 30;

    #[derive(Serialize)]
    struct ChatMessage<'a> {
        role: &'a str,
        content: &'a str,
    }

    #[derive(Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        messages: Vec<ChatMessage<'a>>,
        max_tokens: u32,
        temperature: f32,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        choices: Vec<ChatChoice>,
    }

    #[derive(Deserialize)]
    struct ChatChoice {
        message: ChatResponseMessage,
    }

    #[derive(Deserialize)]
    struct ChatResponseMessage {
        content: Option<String>,
    }

    pub struct OpenAiSummaryAdapter {
        config: SummaryConfig,
        client: reqwest::blocking::Client,
    }

    impl OpenAiSummaryAdapter {
        pub fn new(config: SummaryConfig) -> Result<Self, AgentError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(TIMEOUT_SECS))
                .build()
                .map_err(|e| AgentError::Summary {
                    reason: format!("failed to build HTTP client: {e}"),
                })?;
            Ok(Self { config, client })
        }

        fn request(&self, api_key: &str, payload: &SummaryPayload) -> Result<String, AgentError> {
            let user = user_prompt(payload);
            let body = ChatRequest {
                model: &self.config.model,
                messages: vec![
                    ChatMessage {
                        role: "system",
                        content: SYSTEM_PROMPT,
                    },
                    ChatMessage {
                        role: "user",
                        content: &user,
                    },
                ],
                max_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
            };

            let summary_err = |reason: String| AgentError::Summary { reason };
            let response = self
                .client
                .post(format!("{}/chat/completions", self.config.api_base.trim_end_matches('/')))
                .header("Authorization", format!("Bearer {api_key}"))
                .json(&body)
                .send()
                .map_err(|e| summary_err(format!("request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().unwrap_or_default();
                return Err(summary_err(format!("HTTP {status}: {text}")));
            }

            let parsed: ChatResponse = response
                .json()
                .map_err(|e| summary_err(format!("failed to parse response: {e}")))?;
            let text = parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .map(|t| t.trim().to_string())
                .unwrap_or_default();
            if text.is_empty() {
                return Err(summary_err("empty completion".into()));
            }
            Ok(text)
        }
    }

    impl SummaryPort for OpenAiSummaryAdapter {
        fn summarize(&self, payload: &SummaryPayload, enabled: bool) -> Option<String> {
            if !enabled {
                return None;
            }
            let api_key = match std::env::var(&self.config.api_key_env) {
                Ok(key) if !key.trim().is_empty() => key,
                _ => {
                    debug!(var = %self.config.api_key_env, "no API key, skipping summary");
                    return None;
                }
            };
            match self.request(&api_key, payload) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(error = %e, "summary unavailable");
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::RunStore;

    #[test]
    fn disabled_summary_is_always_none() {
        let store = RunStore::new();
        let payload = SummaryPayload::from_store(&store, &["AAPL"], "1y");
        assert_eq!(DisabledSummary.summarize(&payload, true), None);
        assert_eq!(DisabledSummary.summarize(&payload, false), None);
    }

    #[test]
    fn user_prompt_embeds_payload() {
        let store = RunStore::new();
        let payload = SummaryPayload::from_store(&store, &["AAPL"], "6mo");
        let prompt = user_prompt(&payload);
        assert!(prompt.starts_with("Write a short summary"));
        assert!(prompt.contains("\"mode\": \"single\""));
        assert!(prompt.contains("\"period\": \"6mo\""));
        assert!(prompt.contains("Not financial advice."));
    }

    #[cfg(feature = "llm")]
    #[test]
    fn missing_api_key_yields_none() {
        use crate::domain::run_config::SummaryConfig;

        let config = SummaryConfig {
            api_key_env: "FINAGENT_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..SummaryConfig::default()
        };
        let adapter = OpenAiSummaryAdapter::new(config).unwrap();
        let store = RunStore::new();
        let payload = SummaryPayload::from_store(&store, &["AAPL"], "1y");
        assert_eq!(adapter.summarize(&payload, true), None);
    }
}
