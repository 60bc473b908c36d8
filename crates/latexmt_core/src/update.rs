use crate::{AppState, Effect, FormKind, Msg, ToggleOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RefreshRequested => vec![Effect::FetchJobs],
        Msg::JobsFetched { jobs, fetched_at } => {
            let outcome = state.jobs.reconcile(jobs);
            // A new timestamp alone does not mark the state dirty.
            let first = state.last_refresh.is_none();
            let recovered = state.last_refresh_error.take().is_some();
            state.last_refresh = Some(fetched_at);
            if first || recovered || !outcome.is_unchanged() {
                state.mark_dirty();
            }
            // Removed rows take their log views with them.
            let mut effects = Vec::new();
            for job_id in outcome.removed {
                if let Some(stream) = state.logs.close(job_id) {
                    effects.push(Effect::CloseLogStream { job_id, stream });
                }
            }
            effects
        }
        Msg::JobsFetchFailed { error } => {
            if state.last_refresh_error.as_deref() != Some(error.as_str()) {
                state.last_refresh_error = Some(error);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::LogToggleClicked { job_id } => {
            if !state.jobs.contains(job_id) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match state.logs.toggle(job_id) {
                ToggleOutcome::Opened(stream) => vec![Effect::OpenLogStream { job_id, stream }],
                ToggleOutcome::Closed(stream) => vec![Effect::CloseLogStream { job_id, stream }],
            }
        }
        Msg::LogMessageReceived {
            job_id,
            stream,
            message,
        } => {
            if state.logs.deliver(job_id, stream, &message) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::LogStreamEnded { job_id, stream } => {
            if state.logs.remote_closed(job_id, stream) {
                state.mark_dirty();
                // Lets the runner forget the finished connection.
                vec![Effect::CloseLogStream { job_id, stream }]
            } else {
                Vec::new()
            }
        }
        Msg::CloseAllLogs => {
            let closed = state.logs.close_all();
            if !closed.is_empty() {
                state.mark_dirty();
            }
            closed
                .into_iter()
                .map(|(job_id, stream)| Effect::CloseLogStream { job_id, stream })
                .collect()
        }
        Msg::FieldChanged { form, field, value } => {
            let form = match form {
                FormKind::Inline => &mut state.inline_form,
                FormKind::Document => &mut state.document_form,
            };
            if form.is_disabled() {
                return (state, Vec::new());
            }
            form.fields.set(field, value);
            state.mark_dirty();
            Vec::new()
        }
        Msg::DocumentChosen(document) => {
            state.document_form.mark_valid("document");
            state.document = Some(document);
            state.mark_dirty();
            Vec::new()
        }
        Msg::TranslateSubmitted => {
            if state.inline_form.is_disabled() {
                return (state, Vec::new());
            }
            let report = state.rules.validate(&state.inline_form.fields);
            state.inline_form.apply_report(&report);
            state.mark_dirty();
            if !report.is_valid() {
                return (state, Vec::new());
            }

            state.inline_form.set_disabled(true);
            state.output_text.clear();
            state.last_submission_error = None;
            vec![Effect::Translate {
                fields: state.inline_form.fields.to_pairs(),
            }]
        }
        Msg::TranslationFinished(result) => {
            // Controls come back regardless of the outcome.
            state.inline_form.set_disabled(false);
            match result {
                Ok(text) => state.output_text = text,
                Err(error) => state.last_submission_error = Some(error),
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::JobSubmitted => {
            let Some(document) = state.document.clone() else {
                state.document_form.mark_invalid("document");
                state.mark_dirty();
                return (state, Vec::new());
            };
            state.document_form.mark_valid("document");
            state.last_submission_error = None;
            state.mark_dirty();
            vec![Effect::SubmitJob {
                fields: state.document_form.fields.to_pairs(),
                document,
            }]
        }
        Msg::JobSubmissionFinished(result) => {
            if let Err(error) = result {
                state.last_submission_error = Some(error);
                state.mark_dirty();
            }
            // The new job should show up without waiting for the next poll.
            vec![Effect::FetchJobs]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
