use client_logging::{client_debug, client_info, client_warn};
use futures_util::StreamExt;
use serde::Deserialize;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::http::endpoint_url;
use crate::{ClientEvent, FailureKind, FetchError, JobId, LogFrame, StreamToken};

/// Receives events produced off the caller's thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// `ws(s)://.../api/jobs/{id}/log` for the given HTTP base URL.
pub fn log_feed_url(base: &Url, job_id: JobId) -> Result<Url, FetchError> {
    let mut url = endpoint_url(base, &format!("api/jobs/{job_id}/log"))?;
    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("no websocket scheme for {other}"),
            ))
        }
    };
    url.set_scheme(scheme).map_err(|()| {
        FetchError::new(FailureKind::InvalidUrl, format!("cannot switch to {scheme}"))
    })?;
    Ok(url)
}

#[derive(Deserialize)]
struct WireFrame {
    error: Option<String>,
    log_line: Option<String>,
}

/// Decodes one text frame. Frames that are neither `{error}` nor `{log_line}`
/// become errors so that they still show up in the log view.
pub fn parse_frame(text: &str) -> LogFrame {
    match serde_json::from_str::<WireFrame>(text) {
        Ok(WireFrame {
            error: Some(error), ..
        }) => LogFrame::Error(error),
        Ok(WireFrame {
            log_line: Some(line),
            ..
        }) => LogFrame::Line(line),
        Ok(_) => LogFrame::Error(format!("unrecognised log frame: {text}")),
        Err(err) => LogFrame::Error(format!("malformed log frame: {err}")),
    }
}

/// Pumps one job's log feed into `sink` until `cancel` fires or the server
/// goes away.
///
/// `LogClosed` is emitted only when the feed ends on its own; a cancelled feed
/// sends a close frame and returns quietly.
pub async fn stream_job_log(
    url: Url,
    job_id: JobId,
    stream: StreamToken,
    cancel: CancellationToken,
    sink: &dyn EventSink,
) {
    let connect = tokio::select! {
        _ = cancel.cancelled() => return,
        result = tokio_tungstenite::connect_async(url.as_str()) => result,
    };
    let mut socket = match connect {
        Ok((socket, _response)) => socket,
        Err(err) => {
            client_warn!("Log feed for job {} failed to connect: {}", job_id, err);
            sink.emit(ClientEvent::LogClosed { job_id, stream });
            return;
        }
    };
    client_info!("Opened log feed for job {} ({})", job_id, stream);

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                let _ = socket.close(None).await;
                client_info!("Closed log feed for job {} ({})", job_id, stream);
                return;
            }
            next = socket.next() => next,
        };

        let text = match next {
            Some(Ok(Message::Text(text))) => text.as_str().to_owned(),
            Some(Ok(Message::Binary(bytes))) => String::from_utf8_lossy(&bytes).into_owned(),
            Some(Ok(Message::Close(_))) | None => {
                client_info!("Log feed for job {} closed by server", job_id);
                break;
            }
            Some(Ok(_)) => continue,
            Some(Err(err)) => {
                client_warn!("Log feed for job {} failed: {}", job_id, err);
                break;
            }
        };

        let frame = parse_frame(&text);
        if let LogFrame::Error(error) = &frame {
            client_debug!("Log feed for job {} reported: {}", job_id, error);
        }
        sink.emit(ClientEvent::LogFrame {
            job_id,
            stream,
            frame,
        });
    }

    sink.emit(ClientEvent::LogClosed { job_id, stream });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_url_switches_scheme() {
        let base = Url::parse("https://tools.example.org/latexmt/").unwrap();
        assert_eq!(
            log_feed_url(&base, 12).unwrap().as_str(),
            "wss://tools.example.org/latexmt/api/jobs/12/log"
        );

        let base = Url::parse("http://127.0.0.1:5000").unwrap();
        assert_eq!(
            log_feed_url(&base, 3).unwrap().as_str(),
            "ws://127.0.0.1:5000/api/jobs/3/log"
        );
    }

    #[test]
    fn error_field_wins_over_log_line() {
        assert_eq!(
            parse_frame(r#"{"error": "Job 4 does not exist"}"#),
            LogFrame::Error("Job 4 does not exist".to_string())
        );
        assert_eq!(
            parse_frame(r#"{"log_line": "INFO:worker:start\n"}"#),
            LogFrame::Line("INFO:worker:start\n".to_string())
        );
        assert!(matches!(parse_frame("{}"), LogFrame::Error(_)));
        assert!(matches!(parse_frame("not json"), LogFrame::Error(_)));
    }
}
