use std::fmt;

use chrono::NaiveDateTime;

// Labels as printed by schtasks /fo LIST /v on English and Spanish
// Windows. Matched case-insensitively against the start of each line.
const NEXT_RUN_LABELS: &[&str] = &["next run time:", "siguiente ejecución:"];
const STATUS_LABELS: &[&str] = &["status:", "estado:"];

// Formats schtasks prints next-run timestamps in, depending on locale.
const NEXT_RUN_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Ready,
    Running,
    Disabled,
    Other(String),
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Ready => write!(f, "Ready"),
            TaskStatus::Running => write!(f, "Running"),
            TaskStatus::Disabled => write!(f, "Disabled"),
            TaskStatus::Other(raw) => write!(f, "{raw}"),
        }
    }
}

fn normalize_status(raw: &str) -> TaskStatus {
    let lower = raw.to_lowercase();
    if lower.contains("ready") || lower.contains("listo") {
        TaskStatus::Ready
    } else if lower.contains("running") || lower.contains("en ejecución") {
        TaskStatus::Running
    } else if lower.contains("disabled") || lower.contains("deshabilitada") {
        TaskStatus::Disabled
    } else {
        TaskStatus::Other(raw.to_string())
    }
}

// Timestamps are reprinted as YYYY-MM-DD HH:MM; anything unparseable
// (e.g. "N/A") passes through untouched.
fn normalize_next_run(raw: &str) -> String {
    for format in NEXT_RUN_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return parsed.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    raw.to_string()
}

fn value_after_label(line: &str, labels: &[&str]) -> Option<String> {
    let lower = line.to_lowercase();
    if !labels.iter().any(|label| lower.starts_with(label)) {
        return None;
    }
    let (_, value) = line.split_once(':')?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

// Pulls next-run time and status out of schtasks query output. Anything it
// cannot make sense of reads as absent, never as an error.
pub fn parse_query_output(text: &str) -> (Option<String>, Option<TaskStatus>) {
    let mut next_run = None;
    let mut status = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(value) = value_after_label(line, NEXT_RUN_LABELS) {
            next_run = Some(normalize_next_run(&value));
        }
        if let Some(value) = value_after_label(line, STATUS_LABELS) {
            status = Some(normalize_status(&value));
        }
    }

    (next_run, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_query_output() {
        let text = "\
HostName:      WORKSTATION
TaskName:      \\BackupMySQL_nightly
Next Run Time: 01/03/2024 14:30:00
Status:        Ready
Logon Mode:    Interactive only
";
        let (next_run, status) = parse_query_output(text);
        assert_eq!(next_run.as_deref(), Some("2024-03-01 14:30"));
        assert_eq!(status, Some(TaskStatus::Ready));
    }

    #[test]
    fn parses_spanish_query_output() {
        let text = "\
Nombre de host:       EQUIPO
Nombre de tarea:      \\BackupMySQL_nightly
Siguiente ejecución:  01/03/2024 14:30:00
Estado:               Deshabilitada.
";
        let (next_run, status) = parse_query_output(text);
        assert_eq!(next_run.as_deref(), Some("2024-03-01 14:30"));
        assert_eq!(status, Some(TaskStatus::Disabled));
    }

    #[test]
    fn running_status_matches_both_locales() {
        assert_eq!(normalize_status("Running"), TaskStatus::Running);
        assert_eq!(normalize_status("En ejecución."), TaskStatus::Running);
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status = normalize_status("Queued");
        assert_eq!(status, TaskStatus::Other("Queued".to_string()));
        assert_eq!(status.to_string(), "Queued");
    }

    #[test]
    fn malformed_output_reads_as_absent() {
        assert_eq!(parse_query_output("complete nonsense"), (None, None));
        assert_eq!(parse_query_output(""), (None, None));
        // A label with no colon-separated value stays absent too.
        assert_eq!(parse_query_output("Status\nNext Run Time"), (None, None));
    }

    #[test]
    fn labels_with_empty_values_read_as_absent() {
        assert_eq!(parse_query_output("Next Run Time:\nStatus:   \n"), (None, None));
    }

    #[test]
    fn unparseable_next_run_passes_through() {
        let (next_run, _) = parse_query_output("Next Run Time: N/A\nStatus: Ready\n");
        assert_eq!(next_run.as_deref(), Some("N/A"));
    }

    #[test]
    fn iso_timestamps_are_accepted_too() {
        let (next_run, _) = parse_query_output("Next Run Time: 2024-03-01 14:30\n");
        assert_eq!(next_run.as_deref(), Some("2024-03-01 14:30"));
    }
}
