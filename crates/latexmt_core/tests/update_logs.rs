use std::sync::Once;

use latexmt_core::{
    update, AppState, Effect, JobId, JobRecord, LogMessage, Msg, StreamId,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn with_jobs(ids: &[JobId]) -> AppState {
    let jobs = ids
        .iter()
        .map(|&id| JobRecord::new(id, "processing", None))
        .collect();
    let (mut state, _) = update(
        AppState::new(),
        Msg::JobsFetched {
            jobs,
            fetched_at: "now".to_string(),
        },
    );
    state.consume_dirty();
    state
}

fn open_log(state: AppState, job_id: JobId) -> (AppState, StreamId) {
    let (state, effects) = update(state, Msg::LogToggleClicked { job_id });
    match effects.as_slice() {
        [Effect::OpenLogStream { job_id: opened, stream }] if *opened == job_id => (state, *stream),
        other => panic!("unexpected effects {other:?}"),
    }
}

fn receive(state: AppState, job_id: JobId, stream: StreamId, message: LogMessage) -> AppState {
    let (state, effects) = update(
        state,
        Msg::LogMessageReceived {
            job_id,
            stream,
            message,
        },
    );
    assert!(effects.is_empty());
    state
}

fn log_text(state: &AppState, job_id: JobId) -> Option<String> {
    state.view().row(job_id).and_then(|row| row.log.clone()).map(|log| log.text)
}

#[test]
fn toggling_twice_restores_previous_state() {
    init_logging();
    let state = with_jobs(&[1]);
    let before = state.view();

    let (state, stream) = open_log(state, 1);
    assert!(state.view().row(1).unwrap().log.is_some());
    assert_eq!(state.view().open_logs, 1);

    let (mut state, effects) = update(state, Msg::LogToggleClicked { job_id: 1 });
    assert_eq!(effects, vec![Effect::CloseLogStream { job_id: 1, stream }]);
    assert!(state.consume_dirty());
    assert_eq!(state.view(), before);
}

#[test]
fn rapid_toggles_never_open_two_sessions() {
    init_logging();
    let state = with_jobs(&[3]);
    let (state, first) = open_log(state, 3);
    let (state, _) = update(state, Msg::LogToggleClicked { job_id: 3 });
    let (state, second) = open_log(state, 3);

    assert_ne!(first, second);
    assert_eq!(state.logs().len(), 1);
    assert_eq!(state.logs().session(3).unwrap().stream, second);
}

#[test]
fn toggle_for_unknown_job_is_ignored() {
    init_logging();
    let state = with_jobs(&[1]);
    let (mut state, effects) = update(state, Msg::LogToggleClicked { job_id: 42 });

    assert!(effects.is_empty());
    assert!(state.logs().is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn log_lines_append_in_arrival_order() {
    init_logging();
    let (mut state, stream) = open_log(with_jobs(&[1]), 1);
    let lines: Vec<String> = (0..25).map(|n| format!("line {n}\n")).collect();
    for line in &lines {
        state = receive(state, 1, stream, LogMessage::Line(line.clone()));
    }

    assert_eq!(log_text(&state, 1).unwrap(), lines.concat());
    let sink = &state.logs().session(1).unwrap().sink;
    assert!(sink.is_scrolled_to_end());
}

#[test]
fn error_frames_keep_the_stream_open() {
    init_logging();
    let (state, stream) = open_log(with_jobs(&[1]), 1);
    let state = receive(state, 1, stream, LogMessage::Line("starting\n".to_string()));
    let state = receive(
        state,
        1,
        stream,
        LogMessage::Error("No log file for job 1".to_string()),
    );
    let state = receive(state, 1, stream, LogMessage::Line("still here\n".to_string()));

    assert!(state.logs().is_open(1));
    assert_eq!(
        log_text(&state, 1).unwrap(),
        "starting\nError: No log file for job 1\nstill here\n"
    );
}

#[test]
fn messages_from_a_closed_stream_are_discarded() {
    init_logging();
    let (state, old) = open_log(with_jobs(&[1]), 1);
    let (state, _) = update(state, Msg::LogToggleClicked { job_id: 1 });
    let (state, current) = open_log(state, 1);

    let state = receive(state, 1, old, LogMessage::Line("late\n".to_string()));
    let (state, effects) = update(state, Msg::LogStreamEnded { job_id: 1, stream: old });
    assert!(effects.is_empty());

    let state = receive(state, 1, current, LogMessage::Line("fresh\n".to_string()));
    assert_eq!(log_text(&state, 1).unwrap(), "fresh\n");
    assert_eq!(state.logs().session(1).unwrap().stream, current);
}

#[test]
fn remote_close_purges_the_session() {
    init_logging();
    let (state, stream) = open_log(with_jobs(&[1, 2]), 1);
    let (mut state, effects) = update(state, Msg::LogStreamEnded { job_id: 1, stream });

    assert_eq!(effects, vec![Effect::CloseLogStream { job_id: 1, stream }]);
    assert!(state.logs().is_empty());
    assert!(state.view().row(1).unwrap().log.is_none());
    assert!(state.consume_dirty());

    // The next click opens a fresh view.
    let (state, reopened) = open_log(state, 1);
    assert_ne!(reopened, stream);
    assert!(state.logs().is_open(1));
}

#[test]
fn close_all_tears_down_every_session() {
    init_logging();
    let state = with_jobs(&[1, 2, 3]);
    let (state, a) = open_log(state, 1);
    let (state, b) = open_log(state, 3);

    let (state, effects) = update(state, Msg::CloseAllLogs);
    assert_eq!(
        effects,
        vec![
            Effect::CloseLogStream { job_id: 1, stream: a },
            Effect::CloseLogStream { job_id: 3, stream: b },
        ]
    );
    assert!(state.logs().is_empty());

    let (_state, effects) = update(state, Msg::CloseAllLogs);
    assert!(effects.is_empty());
}
