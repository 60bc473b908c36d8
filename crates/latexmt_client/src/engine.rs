use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::{client_debug, client_error, client_warn};
use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::log_feed::{log_feed_url, stream_job_log, ChannelEventSink, EventSink};
use crate::{
    ClientEvent, ClientSettings, DocumentPayload, FetchError, JobDirectory, JobId, ReqwestApi,
    StreamToken, Submitter,
};

enum ClientCommand {
    FetchJobs,
    Translate {
        fields: Vec<(String, String)>,
    },
    SubmitJob {
        fields: Vec<(String, String)>,
        document: DocumentPayload,
    },
    OpenLog {
        job_id: JobId,
        stream: StreamToken,
    },
    CloseLog {
        job_id: JobId,
        stream: StreamToken,
    },
}

struct LiveFeed {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// How long shutdown waits for cancelled feeds to finish their close handshake.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Front door to the background I/O thread.
///
/// Commands are fire-and-forget; results come back as [`ClientEvent`]s through
/// [`ClientHandle::try_recv`]. Call [`ClientHandle::shutdown`] to close open
/// feeds cleanly before exiting.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
    worker: thread::JoinHandle<()>,
}

impl ClientHandle {
    pub fn new(settings: &ClientSettings) -> Result<Self, FetchError> {
        let api = ReqwestApi::new(settings)?;
        let base_url = api.base_url().clone();
        Ok(Self::with_api(Arc::new(api), base_url))
    }

    /// Runs against any API implementation; log feeds are opened relative to
    /// `base_url`.
    pub fn with_api<A>(api: Arc<A>, base_url: Url) -> Self
    where
        A: JobDirectory + Submitter + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    client_error!("Failed to start the client runtime: {}", err);
                    return;
                }
            };
            let mut feeds: HashMap<StreamToken, LiveFeed> = HashMap::new();

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    ClientCommand::OpenLog { job_id, stream } => {
                        let url = match log_feed_url(&base_url, job_id) {
                            Ok(url) => url,
                            Err(err) => {
                                client_warn!("No log feed url for job {}: {}", job_id, err);
                                let _ = event_tx.send(ClientEvent::LogClosed { job_id, stream });
                                continue;
                            }
                        };
                        let cancel = CancellationToken::new();
                        let sink = ChannelEventSink::new(event_tx.clone());
                        let task_cancel = cancel.clone();
                        let task = runtime.spawn(async move {
                            stream_job_log(url, job_id, stream, task_cancel, &sink).await;
                        });
                        feeds.insert(stream, LiveFeed { cancel, task });
                    }
                    ClientCommand::CloseLog { job_id, stream } => {
                        if let Some(feed) = feeds.remove(&stream) {
                            if !feed.task.is_finished() {
                                client_debug!("Closing log feed for job {} ({})", job_id, stream);
                                feed.cancel.cancel();
                            }
                        }
                    }
                    command => {
                        let api = api.clone();
                        let sink = ChannelEventSink::new(event_tx.clone());
                        runtime.spawn(async move {
                            handle_request(api.as_ref(), command, &sink).await;
                        });
                    }
                }
            }

            let closing: Vec<JoinHandle<()>> = feeds
                .into_values()
                .map(|feed| {
                    feed.cancel.cancel();
                    feed.task
                })
                .collect();
            if !closing.is_empty() {
                client_debug!("Waiting for {} log feeds to close", closing.len());
                runtime.block_on(async {
                    let _ = tokio::time::timeout(CLOSE_GRACE, join_all(closing)).await;
                });
            }
            runtime.shutdown_timeout(CLOSE_GRACE);
        });

        Self {
            cmd_tx,
            event_rx,
            worker,
        }
    }

    /// Stops accepting commands, closes every live feed and waits for the
    /// background thread to finish.
    pub fn shutdown(self) {
        let Self {
            cmd_tx,
            event_rx: _,
            worker,
        } = self;
        drop(cmd_tx);
        if worker.join().is_err() {
            client_error!("Client thread panicked during shutdown");
        }
    }

    pub fn fetch_jobs(&self) {
        let _ = self.cmd_tx.send(ClientCommand::FetchJobs);
    }

    pub fn translate(&self, fields: Vec<(String, String)>) {
        let _ = self.cmd_tx.send(ClientCommand::Translate { fields });
    }

    pub fn submit_job(&self, fields: Vec<(String, String)>, document: DocumentPayload) {
        let _ = self
            .cmd_tx
            .send(ClientCommand::SubmitJob { fields, document });
    }

    pub fn open_log(&self, job_id: JobId, stream: StreamToken) {
        let _ = self.cmd_tx.send(ClientCommand::OpenLog { job_id, stream });
    }

    /// Shuts a feed down unless it already ended by itself.
    pub fn close_log(&self, job_id: JobId, stream: StreamToken) {
        let _ = self.cmd_tx.send(ClientCommand::CloseLog { job_id, stream });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_request<A>(api: &A, command: ClientCommand, sink: &dyn EventSink)
where
    A: JobDirectory + Submitter,
{
    match command {
        ClientCommand::FetchJobs => {
            sink.emit(ClientEvent::JobsListed(api.list_jobs().await));
        }
        ClientCommand::Translate { fields } => {
            sink.emit(ClientEvent::TranslationDone(api.translate(&fields).await));
        }
        ClientCommand::SubmitJob { fields, document } => {
            sink.emit(ClientEvent::JobSubmitted(
                api.submit_job(&fields, document).await,
            ));
        }
        ClientCommand::OpenLog { .. } | ClientCommand::CloseLog { .. } => {}
    }
}
