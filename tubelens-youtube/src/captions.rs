//! Caption-track discovery and timedtext parsing.
//!
//! The watch page embeds the player response JSON, which carries the list
//! of caption tracks. We pull the first track's `baseUrl` out of that blob
//! and fetch the timedtext XML it points at. Not every video has captions;
//! callers treat absence as a normal outcome.

use std::sync::OnceLock;

use regex::Regex;

/// One caption cue with its start offset in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLine {
    pub start_secs: f64,
    pub text: String,
}

fn track_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""captionTracks":\[\{"baseUrl":"([^"]+)""#).unwrap())
}

fn cue_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<text start="([0-9.]+)"[^>]*>(.*?)</text>"#).unwrap()
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

/// Find the first caption track URL embedded in a watch page.
pub fn find_caption_track(watch_html: &str) -> Option<String> {
    let captured = track_re().captures(watch_html)?;
    let raw = captured.get(1)?.as_str();
    // The URL sits inside a JSON string literal.
    Some(raw.replace("\\u0026", "&").replace("\\/", "/"))
}

/// Parse timedtext XML into ordered caption cues.
pub fn parse_timedtext(xml: &str) -> Vec<CaptionLine> {
    cue_re()
        .captures_iter(xml)
        .filter_map(|cap| {
            let start_secs: f64 = cap.get(1)?.as_str().parse().ok()?;
            let body = tag_re().replace_all(cap.get(2)?.as_str(), " ");
            let text = unescape(&body);
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                None
            } else {
                Some(CaptionLine { start_secs, text })
            }
        })
        .collect()
}

/// Render cues as timestamped lines, capped at `char_budget` characters.
pub fn format_transcript(lines: &[CaptionLine], char_budget: usize) -> String {
    let mut out = String::new();
    for line in lines {
        let rendered = format!("[{}] {}\n", format_timestamp(line.start_secs), line.text);
        if out.len() + rendered.len() > char_budget {
            out.push_str("[transcript truncated]\n");
            break;
        }
        out.push_str(&rendered);
    }
    out
}

/// Seconds to `hh:mm:ss`.
pub fn format_timestamp(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

fn unescape(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}
