//! YouTube video-data capability for TubeLens agents.
//!
//! Given a video URL this crate resolves the video id, pulls public oEmbed
//! metadata, discovers the caption track on the watch page, and fetches the
//! timedtext transcript when one exists. [`VideoDataTool`] packages all of
//! that behind the `tubelens-llm` tool interface so the model can request
//! video data mid-conversation.
//!
//! No video or audio is ever downloaded; only metadata and captions.

pub mod captions;
pub mod client;
pub mod id;
pub mod tool;

pub use client::{OembedMetadata, YouTubeClient, YoutubeError};
pub use id::{VideoId, VideoUrlError};
pub use tool::VideoDataTool;
