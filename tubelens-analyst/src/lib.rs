//! The analysis orchestrator.
//!
//! One narrow seam, [`VideoAnalyst`], sits between the web surface and the
//! external agent: `analyze(credential, url)` returns the agent's markdown
//! report verbatim or one of two failures. [`AgentAnalyst`] is the concrete
//! implementation, assembling an OpenAI-compatible agent with the
//! `fetch_video_data` capability per invocation. The surface depends only
//! on the trait, so tests can swap in a stub and assert the agent is never
//! reached on validation failures.

use std::sync::Arc;

use async_trait::async_trait;
use tubelens_llm::agent::Agent;
use tubelens_llm::openai::OpenAiChatModel;
use tubelens_youtube::{VideoDataTool, YouTubeClient};

mod instructions;

pub use instructions::{timestamped_instructions, ANALYST_INSTRUCTIONS};

#[derive(thiserror::Error, Debug)]
pub enum AnalystError {
    /// The upstream agent invocation raised.
    #[error("upstream agent call failed: {0}")]
    ExternalService(String),

    /// The upstream call completed but returned no usable text.
    #[error("agent returned no usable text")]
    EmptyResult,
}

/// The one operation the surface needs from the analysis side.
#[async_trait]
pub trait VideoAnalyst: Send + Sync {
    /// Produce a markdown report for `video_url` using the caller's
    /// credential. The returned text is the agent's output, untouched.
    async fn analyze(&self, credential: &str, video_url: &str) -> Result<String, AnalystError>;
}

/// Configuration for [`AgentAnalyst`], injected at startup.
#[derive(Debug, Clone)]
pub struct AnalystConfig {
    /// Model identifier, e.g. `gpt-4o`.
    pub model: String,
    /// Chat-completions endpoint base, trailing slash included.
    pub endpoint: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            model: tubelens_llm::DEFAULT_OPENAI_MODEL.to_string(),
            endpoint: tubelens_llm::openai::OPENAI_API_BASE.to_string(),
            temperature: Some(0.3),
            max_tokens: None,
        }
    }
}

/// Concrete analyst backed by an OpenAI-compatible model and the YouTube
/// video-data tool.
///
/// The credential arrives per call (each session supplies its own key), so
/// the model client is built at invocation time; the tool client and
/// configuration are fixed at startup. Results are never cached: the same
/// URL re-invokes the agent each time.
pub struct AgentAnalyst {
    config: AnalystConfig,
    youtube: YouTubeClient,
}

impl AgentAnalyst {
    pub fn new(config: AnalystConfig, youtube: YouTubeClient) -> Self {
        Self { config, youtube }
    }
}

#[async_trait]
impl VideoAnalyst for AgentAnalyst {
    async fn analyze(&self, credential: &str, video_url: &str) -> Result<String, AnalystError> {
        let model =
            OpenAiChatModel::with_base(&self.config.endpoint, credential.to_string(), self.config.model.clone())
                .map_err(|e| AnalystError::ExternalService(e.to_string()))?;

        let mut agent = Agent::new(Arc::new(model), timestamped_instructions())
            .with_tool(Arc::new(VideoDataTool::new(self.youtube.clone())));
        if let Some(t) = self.config.temperature {
            agent = agent.with_temperature(t);
        }
        if let Some(m) = self.config.max_tokens {
            agent = agent.with_max_tokens(m);
        }

        tracing::info!(model = %self.config.model, %video_url, "analysis started");

        let reply = agent
            .run(&format!("Analyze this video: {video_url}"))
            .await
            .map_err(|e| AnalystError::ExternalService(e.to_string()))?;

        if reply.text.trim().is_empty() {
            return Err(AnalystError::EmptyResult);
        }

        tracing::info!(chars = reply.text.len(), "analysis finished");
        Ok(reply.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_pin_the_report_shape() {
        assert!(ANALYST_INSTRUCTIONS.contains("## 🔍 Video Overview"));
        assert!(ANALYST_INSTRUCTIONS.contains("## 🕑 Timestamped Outline"));
        assert!(ANALYST_INSTRUCTIONS.contains("## ⭐ Key Insights & Takeaways"));
        assert!(ANALYST_INSTRUCTIONS.contains("## 🖼️ Visual & Practical Notes"));
    }

    #[test]
    fn instructions_carry_the_current_date() {
        let text = timestamped_instructions();
        assert!(text.starts_with(ANALYST_INSTRUCTIONS));
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        assert!(text.contains(&today), "{text}");
    }

    #[test]
    fn default_config_targets_openai() {
        let cfg = AnalystConfig::default();
        assert!(cfg.endpoint.ends_with('/'));
        assert_eq!(cfg.model, "gpt-4o");
    }
}
