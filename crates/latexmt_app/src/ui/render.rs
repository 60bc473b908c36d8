use std::fmt::Write as _;

use latexmt_core::{AppViewModel, FormView, JobRowView, LogPaneView};

/// Log views show the last lines up to the scroll position.
pub const LOG_TAIL_LINES: usize = 12;

pub fn render(view: &AppViewModel, base_url: &str) -> String {
    let mut out = String::new();

    let refreshed = view.last_refresh.as_deref().unwrap_or("never");
    let _ = write!(
        out,
        "Jobs: {} | open logs: {} | refreshed: {}",
        view.rows.len(),
        view.open_logs,
        refreshed
    );
    if let Some(error) = &view.last_refresh_error {
        let _ = write!(out, " | refresh failed: {error}");
    }
    out.push('\n');

    if view.rows.is_empty() {
        out.push_str("  (no jobs)\n");
    }
    for row in &view.rows {
        render_row(&mut out, row, base_url);
    }

    render_form(&mut out, "Translate", &view.inline_form);
    if !view.output_text.is_empty() {
        out.push_str("Output:\n");
        for line in view.output_text.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    render_form(&mut out, "Document", &view.document_form);
    if let Some(name) = &view.document_name {
        let _ = writeln!(out, "  document: {name}");
    }
    if let Some(error) = &view.last_submission_error {
        let _ = writeln!(out, "Submission failed: {error}");
    }

    out
}

fn render_row(out: &mut String, row: &JobRowView, base_url: &str) {
    let _ = write!(out, "  #{:<5} {}", row.job_id, row.status);
    if let (Some(src), Some(tgt)) = (&row.src_lang, &row.tgt_lang) {
        let _ = write!(out, " ({src}->{tgt})");
    }
    if let Some(url) = &row.download_url {
        let _ = write!(out, "  download: {}", absolute_link(base_url, url));
    }
    out.push('\n');

    if let Some(log) = &row.log {
        render_log(out, log);
    }
}

fn render_log(out: &mut String, log: &LogPaneView) {
    let visible = log.text.get(..log.scroll_offset).unwrap_or(&log.text);
    let lines: Vec<&str> = visible.lines().collect();
    if lines.is_empty() {
        out.push_str("      | (waiting for log output)\n");
        return;
    }
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    if start > 0 {
        let _ = writeln!(out, "      | ... {start} earlier lines");
    }
    for line in &lines[start..] {
        let _ = writeln!(out, "      | {line}");
    }
}

fn render_form(out: &mut String, title: &str, form: &FormView) {
    let state = if form.disabled { " (sending...)" } else { "" };
    let _ = writeln!(out, "{title}{state}:");
    for (name, value) in &form.fields {
        let marker = if form.is_invalid(name) { " [invalid]" } else { "" };
        let first_line = value.lines().next().unwrap_or("");
        let more = if value.lines().nth(1).is_some() { " ..." } else { "" };
        let _ = writeln!(out, "  {name} = {first_line:?}{more}{marker}");
    }
    for name in &form.invalid {
        if !form.fields.iter().any(|(field, _)| field == name) {
            let _ = writeln!(out, "  {name} [missing]");
        }
    }
}

fn absolute_link(base_url: &str, url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}
