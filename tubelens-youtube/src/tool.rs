//! The `fetch_video_data` tool handed to analysis agents.

use async_trait::async_trait;
use serde::Deserialize;
use tubelens_llm::tool::{Tool, ToolError};

use crate::captions::{find_caption_track, format_transcript, parse_timedtext};
use crate::client::{YouTubeClient, YoutubeError};
use crate::id::VideoId;

/// Keeps the tool output comfortably inside the model's context window.
const TRANSCRIPT_CHAR_BUDGET: usize = 24_000;

#[derive(Debug, Deserialize)]
struct VideoDataArgs {
    video_url: String,
}

/// Gathers public metadata and the caption transcript for one video and
/// renders them as a plain-text block the model can read.
pub struct VideoDataTool {
    client: YouTubeClient,
    transcript_char_budget: usize,
}

impl VideoDataTool {
    pub fn new(client: YouTubeClient) -> Self {
        Self {
            client,
            transcript_char_budget: TRANSCRIPT_CHAR_BUDGET,
        }
    }

    async fn gather(&self, video: &VideoId) -> Result<String, YoutubeError> {
        let meta = self.client.oembed(video).await?;

        let mut out = String::new();
        out.push_str(&format!("Video title: {}\n", meta.title));
        out.push_str(&format!("Channel: {}\n", meta.author_name));
        if let Some(channel_url) = &meta.author_url {
            out.push_str(&format!("Channel URL: {}\n", channel_url));
        }
        out.push_str(&format!("Watch URL: {}\n", video.watch_url()));

        // Captions are best-effort: plenty of videos have none, and the
        // model should still get the metadata in that case.
        match self.transcript(video).await {
            Ok(Some(transcript)) => {
                out.push_str("\nTranscript (timestamped):\n");
                out.push_str(&transcript);
            }
            Ok(None) => {
                out.push_str("\nTranscript: no caption track is available for this video.\n");
            }
            Err(e) => {
                tracing::warn!(video = %video, error = %e, "transcript fetch failed");
                out.push_str("\nTranscript: could not be retrieved.\n");
            }
        }

        Ok(out)
    }

    async fn transcript(&self, video: &VideoId) -> Result<Option<String>, YoutubeError> {
        let html = self.client.watch_page(video).await?;
        let Some(track_url) = find_caption_track(&html) else {
            return Ok(None);
        };

        let xml = self.client.timedtext(&track_url).await?;
        let cues = parse_timedtext(&xml);
        if cues.is_empty() {
            return Ok(None);
        }
        Ok(Some(format_transcript(&cues, self.transcript_char_budget)))
    }
}

#[async_trait]
impl Tool for VideoDataTool {
    fn name(&self) -> &str {
        "fetch_video_data"
    }

    fn description(&self) -> &str {
        "Fetch public metadata (title, channel) and the timestamped caption \
         transcript for a YouTube video URL. Returns plain text."
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "video_url": {
                    "type": "string",
                    "description": "Full YouTube video URL"
                }
            },
            "required": ["video_url"]
        })
    }

    async fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
        let args: VideoDataArgs = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        let video = VideoId::parse(&args.video_url)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        tracing::info!(video = %video, "fetch_video_data invoked");
        self.gather(&video)
            .await
            .map_err(|e| ToolError::Failed(e.to_string()))
    }
}
