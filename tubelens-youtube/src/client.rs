//! HTTP access to the public YouTube endpoints we rely on.

use serde::Deserialize;
use std::borrow::Cow;
use tubelens_http::{HttpClient, HttpError, RequestOpts};

use crate::id::{VideoId, VideoUrlError};

const YOUTUBE_BASE: &str = "https://www.youtube.com/";

#[derive(thiserror::Error, Debug)]
pub enum YoutubeError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Url(#[from] VideoUrlError),
}

/// Public oEmbed metadata for a video. No API key required.
#[derive(Debug, Clone, Deserialize)]
pub struct OembedMetadata {
    pub title: String,
    pub author_name: String,
    #[serde(default)]
    pub author_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Clone)]
pub struct YouTubeClient {
    http: HttpClient,
}

impl YouTubeClient {
    pub fn new() -> Result<Self, HttpError> {
        Self::with_base(YOUTUBE_BASE)
    }

    /// Point the client at another base URL. Used by tests.
    pub fn with_base(base: &str) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(base)?,
        })
    }

    /// Fetch oEmbed metadata for a watch URL.
    pub async fn oembed(&self, video: &VideoId) -> Result<OembedMetadata, YoutubeError> {
        let watch_url = video.watch_url();
        let meta = self
            .http
            .get_json(
                "oembed",
                RequestOpts {
                    query: Some(vec![
                        ("url", Cow::Owned(watch_url)),
                        ("format", Cow::Borrowed("json")),
                    ]),
                    ..Default::default()
                },
            )
            .await?;
        Ok(meta)
    }

    /// Fetch the watch page HTML (carries the embedded player response).
    pub async fn watch_page(&self, video: &VideoId) -> Result<String, YoutubeError> {
        let html = self
            .http
            .get_text(
                "watch",
                RequestOpts {
                    query: Some(vec![("v", Cow::Borrowed(video.as_str()))]),
                    ..Default::default()
                },
            )
            .await?;
        Ok(html)
    }

    /// Fetch a timedtext document from the absolute URL found on the watch
    /// page.
    pub async fn timedtext(&self, track_url: &str) -> Result<String, YoutubeError> {
        let xml = self
            .http
            .get_text(
                track_url,
                RequestOpts {
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await?;
        Ok(xml)
    }
}
