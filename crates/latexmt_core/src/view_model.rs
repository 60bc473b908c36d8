use crate::{FormState, JobId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub rows: Vec<JobRowView>,
    pub open_logs: usize,
    pub inline_form: FormView,
    pub output_text: String,
    pub document_form: FormView,
    pub document_name: Option<String>,
    pub last_refresh: Option<String>,
    pub last_refresh_error: Option<String>,
    pub last_submission_error: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn row(&self, job_id: JobId) -> Option<&JobRowView> {
        self.rows.iter().find(|row| row.job_id == job_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub status: String,
    pub download_url: Option<String>,
    pub src_lang: Option<String>,
    pub tgt_lang: Option<String>,
    /// Present while the job's log view is open; rendered beneath the row.
    pub log: Option<LogPaneView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaneView {
    pub text: String,
    pub scroll_offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormView {
    pub fields: Vec<(String, String)>,
    pub invalid: Vec<String>,
    pub disabled: bool,
}

impl FormView {
    pub(crate) fn from_state(form: &FormState) -> Self {
        Self {
            fields: form.fields.to_pairs(),
            invalid: form.invalid_fields().map(ToOwned::to_owned).collect(),
            disabled: form.is_disabled(),
        }
    }

    pub fn is_invalid(&self, field: &str) -> bool {
        self.invalid.iter().any(|name| name == field)
    }
}
