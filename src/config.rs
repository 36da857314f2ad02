use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Weekday};
use ini::Ini;
use log::warn;

use crate::error::Result;

pub const TIME_FORMAT: &str = "%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const SECTION_PREFIX: &str = "job_";

// The kind values double as `schtasks /sc` arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScheduleKind {
    Once,
    Daily,
    Weekly,
    Hourly,
}

impl ScheduleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::Once => "once",
            ScheduleKind::Daily => "daily",
            ScheduleKind::Weekly => "weekly",
            ScheduleKind::Hourly => "hourly",
        }
    }
}

impl FromStr for ScheduleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "once" => Ok(ScheduleKind::Once),
            "daily" => Ok(ScheduleKind::Daily),
            "weekly" => Ok(ScheduleKind::Weekly),
            "hourly" => Ok(ScheduleKind::Hourly),
            other => Err(format!("unknown schedule kind '{other}'")),
        }
    }
}

impl std::fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// schtasks weekday codes, uppercase three-letter.
pub fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

pub fn join_weekdays(days: &[Weekday]) -> String {
    days.iter()
        .map(|d| weekday_code(*d))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    // Store key; the task name with spaces replaced by underscores.
    pub name: String,
    // Display name registered with the OS scheduler.
    pub task_name: String,
    pub kind: ScheduleKind,
    pub time: NaiveTime,
    pub date: Option<NaiveDate>,
    pub weekdays: Vec<Weekday>,
    pub every_hours: Option<u32>,
    pub database: String,
    pub tables: Vec<String>,
    pub destination: PathBuf,
    pub user: String,
    pub password: String,
    pub compress: bool,
}

fn section_name(job_name: &str) -> String {
    format!("{SECTION_PREFIX}{job_name}")
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct JobStore {
    path: PathBuf,
}

impl JobStore {
    pub fn new(path: impl Into<PathBuf>) -> JobStore {
        JobStore { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_ini(&self) -> Result<Ini> {
        if self.path.exists() {
            Ok(Ini::load_from_file(&self.path)?)
        } else {
            Ok(Ini::new())
        }
    }

    // Saving under an existing name replaces that job's section wholesale.
    pub fn save(&self, job: &Job) -> Result<()> {
        let mut conf = self.read_ini()?;
        let section = section_name(&job.name);
        conf.delete(Some(section.clone()));
        conf.with_section(Some(section))
            .set("kind", job.kind.as_str())
            .set("time", job.time.format(TIME_FORMAT).to_string())
            .set(
                "date",
                job.date
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
            )
            .set("weekdays", join_weekdays(&job.weekdays))
            .set(
                "every_hours",
                job.every_hours.map(|n| n.to_string()).unwrap_or_default(),
            )
            .set("database", job.database.as_str())
            .set("tables", job.tables.join(","))
            .set("destination", job.destination.to_string_lossy().as_ref())
            .set("user", job.user.as_str())
            .set("password", job.password.as_str())
            .set("zip", if job.compress { "true" } else { "false" })
            .set("task_name", job.task_name.as_str());
        conf.write_to_file(&self.path)?;
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Option<Job>> {
        let conf = self.read_ini()?;
        match conf.section(Some(section_name(name))) {
            Some(props) => Ok(Some(job_from_props(name, props))),
            None => Ok(None),
        }
    }

    pub fn list(&self) -> Result<Vec<Job>> {
        let conf = self.read_ini()?;
        let mut jobs = Vec::new();
        for (section, props) in conf.iter() {
            let Some(section) = section else { continue };
            let Some(name) = section.strip_prefix(SECTION_PREFIX) else {
                continue;
            };
            jobs.push(job_from_props(name, props));
        }
        Ok(jobs)
    }

    pub fn remove(&self, name: &str) -> Result<bool> {
        let mut conf = self.read_ini()?;
        let existed = conf.delete(Some(section_name(name))).is_some();
        if existed {
            conf.write_to_file(&self.path)?;
        }
        Ok(existed)
    }
}

// Field-by-field tolerant decode: jobs written by hand or by older versions
// still load, with absent or unreadable values falling back to defaults.
fn job_from_props(name: &str, props: &ini::Properties) -> Job {
    let get = |key: &str| props.get(key).unwrap_or("");

    let kind = match get("kind").parse::<ScheduleKind>() {
        Ok(kind) => kind,
        Err(_) => {
            warn!("job '{name}': unreadable schedule kind, assuming daily");
            ScheduleKind::Daily
        }
    };
    let time = NaiveTime::parse_from_str(get("time"), TIME_FORMAT).unwrap_or_else(|_| {
        warn!("job '{name}': unreadable time, assuming 00:00");
        NaiveTime::default()
    });
    let date = NaiveDate::parse_from_str(get("date"), DATE_FORMAT).ok();
    let weekdays = split_list(get("weekdays"))
        .iter()
        .filter_map(|code| code.parse::<Weekday>().ok())
        .collect();
    let every_hours = get("every_hours").trim().parse::<u32>().ok();
    let task_name = match props.get("task_name") {
        Some(task_name) if !task_name.is_empty() => task_name.to_string(),
        _ => name.to_string(),
    };

    Job {
        name: name.to_string(),
        task_name,
        kind,
        time,
        date,
        weekdays,
        every_hours,
        database: get("database").to_string(),
        tables: split_list(get("tables")),
        destination: PathBuf::from(get("destination")),
        user: get("user").to_string(),
        password: get("password").to_string(),
        compress: parse_bool(get("zip")),
    }
}
