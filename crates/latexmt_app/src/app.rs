use std::fs;
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use latexmt_client::{ClientHandle, FetchError};
use latexmt_core::{update, AppState, DocumentUpload, FormKind, Msg};

use crate::config::{config_path, load_config, AppConfig};
use crate::effects::EffectRunner;
use crate::logging;
use crate::ui::commands::{parse_command, Command, HELP};
use crate::ui::render::render;

/// How long the loop waits for input before checking for client events.
const EVENT_POLL: Duration = Duration::from_millis(20);

enum AppInput {
    Msg(Msg),
    Console(String),
    ConsoleClosed,
}

pub fn run_app() -> Result<(), FetchError> {
    let path = config_path();
    let (config, config_error) = match load_config(&path) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    logging::initialize(
        config.log_destination,
        client_logging::parse_level(&config.log_level),
    );
    if let Some(err) = config_error {
        client_warn!("Using default configuration: {}", err);
        eprintln!("Using default configuration: {err}");
    }
    client_info!("Connecting to {}", config.client.base_url);

    let client = ClientHandle::new(&config.client)?;
    let mut app = App {
        state: AppState::with_rules(config.validation_rules()),
        runner: EffectRunner::new(client),
        base_url: config.client.base_url.clone(),
    };

    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    spawn_console_reader(input_tx.clone());
    spawn_poll_timer(input_tx, config.poll_interval());

    println!("{HELP}");
    app.dispatch(Msg::RefreshRequested);

    loop {
        match input_rx.recv_timeout(EVENT_POLL) {
            Ok(AppInput::Msg(msg)) => app.dispatch(msg),
            Ok(AppInput::Console(line)) => {
                if !app.handle_console_line(&line) {
                    break;
                }
            }
            Ok(AppInput::ConsoleClosed) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        for msg in app.runner.drain_events() {
            app.dispatch(msg);
        }
        app.render_if_dirty();
    }

    app.dispatch(Msg::CloseAllLogs);
    client_info!("Shutting down");
    app.runner.shutdown();
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
    base_url: String,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn render_if_dirty(&mut self) {
        if self.state.consume_dirty() {
            println!("{}", render(&self.state.view(), &self.base_url));
        }
    }

    /// Returns `false` when the user asked to quit.
    fn handle_console_line(&mut self, line: &str) -> bool {
        match parse_command(line) {
            None => {}
            Some(Command::Dispatch(msg)) => self.dispatch(msg),
            Some(Command::LoadField { field, path }) => match fs::read_to_string(&path) {
                Ok(value) => self.dispatch(Msg::FieldChanged {
                    form: FormKind::Inline,
                    field,
                    value,
                }),
                Err(err) => report(&format!("Could not read {}: {err}", path.display())),
            },
            Some(Command::SubmitDocument(path)) => match read_document(&path) {
                Ok(document) => {
                    self.dispatch(Msg::DocumentChosen(document));
                    self.dispatch(Msg::JobSubmitted);
                }
                Err(err) => report(&format!("Could not read {}: {err}", path.display())),
            },
            Some(Command::Help) => println!("{HELP}"),
            Some(Command::Quit) => return false,
            Some(Command::Invalid(message)) => println!("{message}"),
        }
        true
    }
}

fn report(message: &str) {
    client_warn!("{}", message);
    println!("{message}");
}

fn read_document(path: &Path) -> io::Result<DocumentUpload> {
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    Ok(DocumentUpload { file_name, bytes })
}

fn spawn_console_reader(tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(AppInput::Console(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppInput::ConsoleClosed);
    });
}

// Background tick that keeps the job table in sync with the server.
fn spawn_poll_timer(tx: mpsc::Sender<AppInput>, interval: Duration) {
    thread::spawn(move || loop {
        thread::sleep(interval);
        if tx.send(AppInput::Msg(Msg::RefreshRequested)).is_err() {
            break;
        }
    });
}
