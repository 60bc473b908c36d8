#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Poll timer fired or the user asked for a refresh.
    RefreshRequested,
    /// A job-list fetch completed. `fetched_at` is a display timestamp.
    JobsFetched {
        jobs: Vec<crate::JobRecord>,
        fetched_at: String,
    },
    /// A job-list fetch failed; the table is left as it was.
    JobsFetchFailed { error: String },
    /// User clicked the Logs button of a job row.
    LogToggleClicked { job_id: crate::JobId },
    /// A frame arrived on a log stream.
    LogMessageReceived {
        job_id: crate::JobId,
        stream: crate::StreamId,
        message: crate::LogMessage,
    },
    /// The far end closed a log stream (or it failed to connect).
    LogStreamEnded {
        job_id: crate::JobId,
        stream: crate::StreamId,
    },
    /// Close every open log view, e.g. before quitting.
    CloseAllLogs,
    /// User edited a form field.
    FieldChanged {
        form: crate::FormKind,
        field: String,
        value: String,
    },
    /// User picked the document to submit.
    DocumentChosen(crate::DocumentUpload),
    /// User submitted the inline translation form.
    TranslateSubmitted,
    /// The inline translation request settled.
    TranslationFinished(Result<String, String>),
    /// User submitted the document form.
    JobSubmitted,
    /// The document submission settled.
    JobSubmissionFinished(Result<(), String>),
    /// Fallback for placeholder wiring.
    NoOp,
}
