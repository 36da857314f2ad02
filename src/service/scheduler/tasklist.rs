use std::time::Duration;

use log::warn;
use tokio::process::Command;

use crate::service::command::run_capture;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub name: String,
    pub pid: String,
    pub info: String,
}

fn base_name(process: &str) -> String {
    let lower = process.to_lowercase();
    lower.strip_suffix(".exe").unwrap_or(&lower).to_string()
}

// tasklist /fo csv /nh prints one quoted CSV record per process:
// "name","pid","session","session#","mem". Only the first two fields
// matter here.
pub fn parse_tasklist_csv(text: &str, watched_exe: &str) -> Vec<ProcessEntry> {
    let watched = base_name(watched_exe);
    let mut entries = Vec::new();

    for line in text.lines() {
        let parts: Vec<&str> = line
            .split("\",\"")
            .map(|part| part.trim().trim_matches('"'))
            .collect();
        if parts.len() < 2 {
            continue;
        }
        let name = parts[0];
        let pid = parts[1];

        if base_name(name) == "mysqldump" {
            entries.push(ProcessEntry {
                name: name.to_string(),
                pid: pid.to_string(),
                info: "mysqldump running".to_string(),
            });
        } else if !watched.is_empty() && base_name(name) == watched {
            entries.push(ProcessEntry {
                name: name.to_string(),
                pid: pid.to_string(),
                info: "scheduled backup task".to_string(),
            });
        }
    }

    entries
}

// Snapshot of the processes a backup in flight shows up as. Any failure
// reads as "nothing running".
pub async fn list_processes(watched_exe: &str, timeout: Duration) -> Vec<ProcessEntry> {
    let mut cmd = Command::new("tasklist");
    cmd.arg("/fo").arg("csv").arg("/nh");

    match run_capture(cmd, timeout).await {
        Ok(output) if output.status.success() => {
            parse_tasklist_csv(&String::from_utf8_lossy(&output.stdout), watched_exe)
        }
        Ok(_) => Vec::new(),
        Err(err) => {
            warn!("could not list processes: {err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
\"System Idle Process\",\"0\",\"Services\",\"0\",\"8 K\"
\"mysqldump.exe\",\"4812\",\"Console\",\"1\",\"12,304 K\"
\"backup-scheduler.exe\",\"5120\",\"Console\",\"1\",\"9,812 K\"
\"notepad.exe\",\"6644\",\"Console\",\"1\",\"15,204 K\"
";

    #[test]
    fn keeps_only_watched_processes() {
        let entries = parse_tasklist_csv(SAMPLE, "backup-scheduler.exe");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "mysqldump.exe");
        assert_eq!(entries[0].pid, "4812");
        assert_eq!(entries[1].name, "backup-scheduler.exe");
        assert_eq!(entries[1].pid, "5120");
    }

    #[test]
    fn matches_names_with_or_without_exe_suffix() {
        let text = "\"MYSQLDUMP\",\"77\",\"Console\",\"1\",\"1 K\"\n";
        let entries = parse_tasklist_csv(text, "");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pid, "77");
    }

    #[test]
    fn short_or_garbled_lines_are_skipped() {
        let text = "no quotes here\n\"lonely\"\n";
        assert!(parse_tasklist_csv(text, "anything.exe").is_empty());
    }
}
