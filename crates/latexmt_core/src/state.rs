use crate::view_model::{AppViewModel, FormView, JobRowView, LogPaneView};
use crate::{DocumentUpload, FormKind, FormState, JobTable, LogStreamRegistry, ValidationRules};

/// Everything the UI shows, owned in one place and only changed by `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) jobs: JobTable,
    pub(crate) logs: LogStreamRegistry,
    pub(crate) inline_form: FormState,
    pub(crate) output_text: String,
    pub(crate) document_form: FormState,
    pub(crate) document: Option<DocumentUpload>,
    pub(crate) rules: ValidationRules,
    pub(crate) last_refresh: Option<String>,
    pub(crate) last_refresh_error: Option<String>,
    pub(crate) last_submission_error: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_rules(ValidationRules::standard())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: ValidationRules) -> Self {
        Self {
            jobs: JobTable::new(),
            logs: LogStreamRegistry::new(),
            inline_form: FormState::for_kind(FormKind::Inline),
            output_text: String::new(),
            document_form: FormState::for_kind(FormKind::Document),
            document: None,
            rules,
            last_refresh: None,
            last_refresh_error: None,
            last_submission_error: None,
            dirty: false,
        }
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    pub fn logs(&self) -> &LogStreamRegistry {
        &self.logs
    }

    pub fn inline_form(&self) -> &FormState {
        &self.inline_form
    }

    pub fn document_form(&self) -> &FormState {
        &self.document_form
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .jobs
            .rows()
            .iter()
            .map(|job| JobRowView {
                job_id: job.id,
                status: job.status.clone(),
                download_url: job.download_url.clone(),
                src_lang: job.src_lang.clone(),
                tgt_lang: job.tgt_lang.clone(),
                log: self.logs.session(job.id).map(|session| LogPaneView {
                    text: session.sink.text().to_string(),
                    scroll_offset: session.sink.scroll_offset(),
                }),
            })
            .collect();

        AppViewModel {
            rows,
            open_logs: self.logs.len(),
            inline_form: FormView::from_state(&self.inline_form),
            output_text: self.output_text.clone(),
            document_form: FormView::from_state(&self.document_form),
            document_name: self.document.as_ref().map(|doc| doc.file_name.clone()),
            last_refresh: self.last_refresh.clone(),
            last_refresh_error: self.last_refresh_error.clone(),
            last_submission_error: self.last_submission_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
