use client_logging::{client_debug, client_error, client_info, client_warn};
use latexmt_client::{ClientEvent, ClientHandle, DocumentPayload, JobSummary, LogFrame};
use latexmt_core::{Effect, JobRecord, LogMessage, Msg, StreamId};

/// Executes core effects through the client and turns client events back
/// into core messages.
pub struct EffectRunner {
    client: ClientHandle,
}

impl EffectRunner {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchJobs => {
                    client_debug!("FetchJobs");
                    self.client.fetch_jobs();
                }
                Effect::OpenLogStream { job_id, stream } => {
                    client_info!("OpenLogStream job_id={} {}", job_id, stream);
                    self.client.open_log(job_id, stream.get());
                }
                Effect::CloseLogStream { job_id, stream } => {
                    client_info!("CloseLogStream job_id={} {}", job_id, stream);
                    self.client.close_log(job_id, stream.get());
                }
                Effect::Translate { fields } => {
                    client_info!("Translate fields={}", fields.len());
                    self.client.translate(fields);
                }
                Effect::SubmitJob { fields, document } => {
                    client_info!(
                        "SubmitJob file={} bytes={}",
                        document.file_name,
                        document.bytes.len()
                    );
                    self.client.submit_job(
                        fields,
                        DocumentPayload {
                            file_name: document.file_name,
                            bytes: document.bytes,
                        },
                    );
                }
            }
        }
    }

    /// Waits for the client to finish the closes already queued.
    pub fn shutdown(self) {
        self.client.shutdown();
    }

    /// Collects every client event that arrived since the last call.
    pub fn drain_events(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.client.try_recv() {
            inbox.push(map_event(event, refresh_timestamp));
        }
        inbox
    }
}

fn refresh_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

pub(crate) fn map_event(event: ClientEvent, fetched_at: impl FnOnce() -> String) -> Msg {
    match event {
        ClientEvent::JobsListed(Ok(jobs)) => Msg::JobsFetched {
            jobs: jobs.into_iter().map(map_job).collect(),
            fetched_at: fetched_at(),
        },
        ClientEvent::JobsListed(Err(err)) => {
            client_warn!("Fetching jobs failed: {}", err);
            Msg::JobsFetchFailed {
                error: err.to_string(),
            }
        }
        ClientEvent::TranslationDone(result) => {
            if let Err(err) = &result {
                client_warn!("Translation request failed: {}", err);
            }
            Msg::TranslationFinished(result.map_err(|err| err.to_string()))
        }
        ClientEvent::JobSubmitted(result) => {
            if let Err(err) = &result {
                client_warn!("Job submission failed: {}", err);
            }
            Msg::JobSubmissionFinished(result.map(|_| ()).map_err(|err| err.to_string()))
        }
        ClientEvent::LogFrame {
            job_id,
            stream,
            frame,
        } => {
            let message = match frame {
                LogFrame::Line(line) => LogMessage::Line(line),
                LogFrame::Error(error) => {
                    client_error!("Log feed for job {}: {}", job_id, error);
                    LogMessage::Error(error)
                }
            };
            Msg::LogMessageReceived {
                job_id,
                stream: StreamId::new(stream),
                message,
            }
        }
        ClientEvent::LogClosed { job_id, stream } => Msg::LogStreamEnded {
            job_id,
            stream: StreamId::new(stream),
        },
    }
}

fn map_job(job: JobSummary) -> JobRecord {
    JobRecord {
        id: job.id,
        status: job.status,
        download_url: job.download_url,
        src_lang: job.src_lang,
        tgt_lang: job.tgt_lang,
    }
}
