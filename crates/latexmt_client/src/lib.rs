//! LaTeX-MT client: HTTP/WebSocket I/O and effect execution.
mod directory;
mod engine;
mod http;
mod log_feed;
mod settings;
mod submit;
mod types;

pub use directory::JobDirectory;
pub use engine::ClientHandle;
pub use http::{endpoint_url, ReqwestApi};
pub use log_feed::{log_feed_url, parse_frame, stream_job_log, ChannelEventSink, EventSink};
pub use settings::ClientSettings;
pub use submit::Submitter;
pub use types::{
    ClientEvent, DocumentPayload, FailureKind, FetchError, JobId, JobSummary, LogFrame,
    StreamToken,
};
