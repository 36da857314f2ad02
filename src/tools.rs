use std::path::{Path, PathBuf};

use log::{debug, warn};
use which::which;

use crate::error::{BackupError, Result};

pub const MYSQLDUMP: &str = "mysqldump";
pub const MYSQL: &str = "mysql";

// XAMPP-style install locations probed before falling back to PATH.
const FIXED_TOOL_DIRS: &[&str] = &[
    "C:\\xampp\\mysql\\bin",
    "C:\\Program Files\\xampp\\mysql\\bin",
    "C:\\Program Files (x86)\\xampp\\mysql\\bin",
    "D:\\xampp\\mysql\\bin",
    "D:\\Program Files\\xampp\\mysql\\bin",
];

fn exe_file_name(tool: &str) -> String {
    format!("{tool}{}", std::env::consts::EXE_SUFFIX)
}

pub struct ToolLocator {
    candidate_dirs: Vec<PathBuf>,
    scratch_root: PathBuf,
}

impl ToolLocator {
    pub fn new(extra_dirs: Vec<PathBuf>) -> ToolLocator {
        let mut candidate_dirs = extra_dirs;
        candidate_dirs.extend(FIXED_TOOL_DIRS.iter().map(PathBuf::from));
        ToolLocator {
            candidate_dirs,
            scratch_root: std::env::temp_dir(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_dirs(candidate_dirs: Vec<PathBuf>, scratch_root: PathBuf) -> ToolLocator {
        ToolLocator {
            candidate_dirs,
            scratch_root,
        }
    }

    pub fn locate(&self, tool: &str) -> Result<PathBuf> {
        let file_name = exe_file_name(tool);
        for dir in &self.candidate_dirs {
            let candidate = dir.join(&file_name);
            if candidate.is_file() {
                debug!("found {tool} at {}", candidate.display());
                return Ok(candidate);
            }
        }
        which(tool).map_err(|_| BackupError::tool_not_found(tool))
    }

    // Locate the tool and run it from a staged copy in the scratch
    // directory, so a mid-backup XAMPP update cannot pull the binary out
    // from under a running dump. Falls back to the original location when
    // the copy cannot be made.
    pub fn locate_staged(&self, tool: &str) -> Result<PathBuf> {
        let found = self.locate(tool)?;
        Ok(self.stage(tool, &found))
    }

    fn stage(&self, tool: &str, found: &Path) -> PathBuf {
        let staged_dir = self.scratch_root.join(format!("{tool}_safe"));
        let staged = staged_dir.join(exe_file_name(tool));

        let up_to_date = match (staged.metadata(), found.metadata()) {
            (Ok(staged_meta), Ok(found_meta)) => staged_meta.len() == found_meta.len(),
            _ => false,
        };
        if up_to_date {
            return staged;
        }

        let copied = std::fs::create_dir_all(&staged_dir)
            .and_then(|_| std::fs::copy(found, &staged))
            .map(|_| ());
        match copied {
            Ok(()) => {
                debug!("staged {tool} into {}", staged.display());
                staged
            }
            Err(err) => {
                warn!("could not stage {tool}, running it in place: {err}");
                found.to_path_buf()
            }
        }
    }
}
