use std::path::PathBuf;

use latexmt_core::{FormKind, JobId, Msg};

pub const HELP: &str = "\
commands:
  refresh                  fetch the job list now
  logs <id>                open or close the log view of a job
  set <field> <value>      set a translation field (\\n for newlines)
  set-doc <field> <value>  set a document field
  load <field> <path>      set a translation field from a file
  translate                translate the inline text
  submit <path>            submit a document as a new job
  help                     show this text
  quit                     close all log views and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    LoadField { field: String, path: PathBuf },
    SubmitDocument(PathBuf),
    Help,
    Quit,
    Invalid(String),
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = split_word(line);

    let command = match word {
        "refresh" | "r" => Command::Dispatch(Msg::RefreshRequested),
        "logs" | "l" => match rest.parse::<JobId>() {
            Ok(job_id) => Command::Dispatch(Msg::LogToggleClicked { job_id }),
            Err(_) => Command::Invalid("usage: logs <job id>".to_string()),
        },
        "set" => field_change(FormKind::Inline, rest),
        "set-doc" => field_change(FormKind::Document, rest),
        "load" => match split_word(rest) {
            (field, path) if !field.is_empty() && !path.is_empty() => Command::LoadField {
                field: field.to_string(),
                path: PathBuf::from(path),
            },
            _ => Command::Invalid("usage: load <field> <path>".to_string()),
        },
        "translate" | "t" => Command::Dispatch(Msg::TranslateSubmitted),
        "submit" if !rest.is_empty() => Command::SubmitDocument(PathBuf::from(rest)),
        "submit" => Command::Invalid("usage: submit <path>".to_string()),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command {other:?}, try help")),
    };
    Some(command)
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

fn field_change(form: FormKind, rest: &str) -> Command {
    let (field, value) = split_word(rest);
    if field.is_empty() {
        return Command::Invalid("usage: set <field> <value>".to_string());
    }
    Command::Dispatch(Msg::FieldChanged {
        form,
        field: field.to_string(),
        value: value.replace("\\n", "\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_requires_numeric_id() {
        assert_eq!(
            parse_command("logs 12"),
            Some(Command::Dispatch(Msg::LogToggleClicked { job_id: 12 }))
        );
        assert!(matches!(
            parse_command("logs twelve"),
            Some(Command::Invalid(_))
        ));
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn set_keeps_inner_spaces_and_unescapes_newlines() {
        assert_eq!(
            parse_command("set mask_placeholder  foo %INDEX% bar"),
            Some(Command::Dispatch(Msg::FieldChanged {
                form: FormKind::Inline,
                field: "mask_placeholder".to_string(),
                value: "foo %INDEX% bar".to_string(),
            }))
        );
        assert_eq!(
            parse_command("set-doc glossary a=b\\nc=d"),
            Some(Command::Dispatch(Msg::FieldChanged {
                form: FormKind::Document,
                field: "glossary".to_string(),
                value: "a=b\nc=d".to_string(),
            }))
        );
    }

    #[test]
    fn set_without_value_clears_the_field() {
        assert_eq!(
            parse_command("set glossary"),
            Some(Command::Dispatch(Msg::FieldChanged {
                form: FormKind::Inline,
                field: "glossary".to_string(),
                value: String::new(),
            }))
        );
    }

    #[test]
    fn submit_and_load_take_paths() {
        assert_eq!(
            parse_command("submit papers/intro.tex"),
            Some(Command::SubmitDocument(PathBuf::from("papers/intro.tex")))
        );
        assert_eq!(
            parse_command("load input_text notes/abstract.tex"),
            Some(Command::LoadField {
                field: "input_text".to_string(),
                path: PathBuf::from("notes/abstract.tex"),
            })
        );
        assert!(matches!(parse_command("submit"), Some(Command::Invalid(_))));
        assert!(matches!(parse_command("load input_text"), Some(Command::Invalid(_))));
    }
}
