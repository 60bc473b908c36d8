use std::collections::BTreeMap;
use std::fmt;

use crate::JobId;

/// Token for one log connection. Allocated by the registry and never reused,
/// so a late notification from a closed connection cannot be mistaken for one
/// from its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId(u64);

impl StreamId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream#{}", self.0)
    }
}

/// One frame pushed by the job log feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMessage {
    Line(String),
    Error(String),
}

/// Append-only log text with a scroll position that follows the tail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogSink {
    text: String,
    scroll_offset: usize,
}

impl LogSink {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn is_scrolled_to_end(&self) -> bool {
        self.scroll_offset == self.text.len()
    }

    fn append(&mut self, chunk: &str) {
        self.text.push_str(chunk);
        self.scroll_offset = self.text.len();
    }
}

/// Formats a feed-reported error the way it is shown inside a log sink.
pub fn format_stream_error(message: &str) -> String {
    let mut formatted = format!("Error: {message}");
    if !formatted.ends_with('\n') {
        formatted.push('\n');
    }
    formatted
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSession {
    pub job_id: JobId,
    pub stream: StreamId,
    pub sink: LogSink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Opened(StreamId),
    Closed(StreamId),
}

/// Owner of every open log session, keyed by job id.
///
/// Holds at most one session per job. Opening, closing and purging all happen
/// here; callers only receive the stream tokens they must act on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogStreamRegistry {
    sessions: BTreeMap<JobId, LogSession>,
    next_stream: u64,
}

impl LogStreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn is_open(&self, job_id: JobId) -> bool {
        self.sessions.contains_key(&job_id)
    }

    pub fn session(&self, job_id: JobId) -> Option<&LogSession> {
        self.sessions.get(&job_id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &LogSession> {
        self.sessions.values()
    }

    /// Closes the job's session when one is open, otherwise opens a new one.
    pub fn toggle(&mut self, job_id: JobId) -> ToggleOutcome {
        match self.close(job_id) {
            Some(stream) => ToggleOutcome::Closed(stream),
            None => ToggleOutcome::Opened(self.open(job_id)),
        }
    }

    fn open(&mut self, job_id: JobId) -> StreamId {
        self.next_stream += 1;
        let stream = StreamId(self.next_stream);
        self.sessions.insert(
            job_id,
            LogSession {
                job_id,
                stream,
                sink: LogSink::default(),
            },
        );
        stream
    }

    /// Drops the job's session. Returns the stream whose connection must be
    /// shut down, or `None` when nothing was open.
    pub fn close(&mut self, job_id: JobId) -> Option<StreamId> {
        self.sessions.remove(&job_id).map(|session| session.stream)
    }

    pub fn close_all(&mut self) -> Vec<(JobId, StreamId)> {
        std::mem::take(&mut self.sessions)
            .into_values()
            .map(|session| (session.job_id, session.stream))
            .collect()
    }

    /// Appends a feed message to the matching session's sink.
    ///
    /// Returns `false` when the message belongs to a stream that is no longer
    /// registered for the job; such messages are discarded.
    pub fn deliver(&mut self, job_id: JobId, stream: StreamId, message: &LogMessage) -> bool {
        let Some(session) = self.live_session_mut(job_id, stream) else {
            return false;
        };
        match message {
            LogMessage::Line(line) => session.sink.append(line),
            LogMessage::Error(error) => session.sink.append(&format_stream_error(error)),
        }
        true
    }

    /// Purges a session whose connection was terminated by the far end.
    ///
    /// Returns `false` when the stream had already been closed locally.
    pub fn remote_closed(&mut self, job_id: JobId, stream: StreamId) -> bool {
        if self.live_session_mut(job_id, stream).is_none() {
            return false;
        }
        self.sessions.remove(&job_id);
        true
    }

    fn live_session_mut(&mut self, job_id: JobId, stream: StreamId) -> Option<&mut LogSession> {
        self.sessions
            .get_mut(&job_id)
            .filter(|session| session.stream == stream)
    }
}
