use crate::{DocumentUpload, JobId, StreamId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the job list; the result comes back as `Msg::JobsFetched` or
    /// `Msg::JobsFetchFailed`.
    FetchJobs,
    OpenLogStream { job_id: JobId, stream: StreamId },
    /// Shut the connection down unless it is already closed.
    CloseLogStream { job_id: JobId, stream: StreamId },
    Translate { fields: Vec<(String, String)> },
    SubmitJob {
        fields: Vec<(String, String)>,
        document: DocumentUpload,
    },
}
