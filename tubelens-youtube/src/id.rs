use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum VideoUrlError {
    #[error("not a valid URL: {0}")]
    Invalid(String),

    #[error("not a YouTube URL: {0}")]
    NotYoutube(String),

    #[error("no video id found in URL: {0}")]
    NoVideoId(String),
}

/// An eleven-character YouTube video id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    /// Extract the video id from any of the common URL shapes:
    /// `watch?v=`, `youtu.be/`, `shorts/`, `embed/`, `live/`, `v/`.
    pub fn parse(raw: &str) -> Result<Self, VideoUrlError> {
        let url = Url::parse(raw.trim()).map_err(|_| VideoUrlError::Invalid(raw.to_string()))?;

        let host = url
            .host_str()
            .map(|h| h.trim_start_matches("www.").trim_start_matches("m."))
            .unwrap_or_default();

        let candidate = match host {
            "youtu.be" => url.path_segments().and_then(|mut s| s.next()).map(str::to_string),
            "youtube.com" | "youtube-nocookie.com" | "music.youtube.com" => {
                let mut segments = url.path_segments().into_iter().flatten();
                match segments.next() {
                    Some("watch") => url
                        .query_pairs()
                        .find(|(k, _)| k == "v")
                        .map(|(_, v)| v.into_owned()),
                    Some("shorts") | Some("embed") | Some("live") | Some("v") => {
                        segments.next().map(str::to_string)
                    }
                    _ => None,
                }
            }
            _ => return Err(VideoUrlError::NotYoutube(raw.to_string())),
        };

        match candidate {
            Some(id) if is_video_id(&id) => Ok(Self(id)),
            _ => Err(VideoUrlError::NoVideoId(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this id.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
