//! LaTeX-MT core: pure job-table / log-stream state machine and view-model helpers.
mod effect;
mod form;
mod job_table;
mod log_registry;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use form::{
    DocumentUpload, FormFields, FormKind, FormState, ValidationReport, ValidationRules,
    DEFAULT_SRC_LANG, DEFAULT_TGT_LANG,
};
pub use job_table::{JobId, JobRecord, JobTable, ReconcileOutcome};
pub use log_registry::{
    format_stream_error, LogMessage, LogSession, LogSink, LogStreamRegistry, StreamId,
    ToggleOutcome,
};
pub use msg::Msg;
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, FormView, JobRowView, LogPaneView};
