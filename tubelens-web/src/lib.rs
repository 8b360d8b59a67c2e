//! The TubeLens web surface.
//!
//! One HTML page plus a small JSON API. The page obtains a session id,
//! stores the user's API credential in that session, triggers analyses,
//! and renders/downloads the resulting markdown report.
//!
//! ## Endpoint map
//!
//! | Route                               | Description                        |
//! |-------------------------------------|------------------------------------|
//! | `GET  /`                            | The single page                    |
//! | `GET  /health`                      | Liveness probe                     |
//! | `POST /api/session`                 | Create a session                   |
//! | `POST /api/credential`              | Store the session credential       |
//! | `POST /api/analyze`                 | Run an analysis                    |
//! | `GET  /api/report/:id`              | Current report (markdown + html)   |
//! | `GET  /api/report/:id/download`     | Report as an attachment            |

pub mod error;
pub mod page;
pub mod render;
pub mod routes;
pub mod session;

pub use routes::{build_app, AppState};
pub use session::{Session, SessionStore};

/// Fixed name of the downloaded report file.
pub const REPORT_FILENAME: &str = "youtube_video_analysis.md";
