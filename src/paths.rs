use std::path::Path;

use crate::error::{BackupError, Result};

// Windows system and tool locations a backup must never be written into.
// Matching is done on the lowercased, backslash-normalized path so that
// "C:/Windows/temp" and "c:\windows\temp" are both caught.
const DISALLOWED_PREFIXES: &[&str] = &[
    "c:\\program files",
    "c:\\program files (x86)",
    "c:\\windows",
    "c:\\programdata",
    "c:\\xampp\\mysql\\bin",
];

pub fn destination_allowed(path: &Path) -> bool {
    let normalized = path.to_string_lossy().to_lowercase().replace('/', "\\");
    !DISALLOWED_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}

pub fn ensure_destination_allowed(path: &Path) -> Result<()> {
    if destination_allowed(path) {
        Ok(())
    } else {
        Err(BackupError::DestinationNotAllowed(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn rejects_disallowed_prefixes() {
        for path in [
            "C:\\Program Files\\backups",
            "c:\\program files (x86)\\stuff",
            "C:\\Windows\\Temp",
            "C:\\ProgramData\\dumps",
            "C:\\xampp\\mysql\\bin",
        ] {
            assert!(!destination_allowed(Path::new(path)), "{path} should be rejected");
        }
    }

    #[test]
    fn rejection_is_case_insensitive_and_separator_normalized() {
        assert!(!destination_allowed(Path::new("c:/WINDOWS/temp")));
        assert!(!destination_allowed(Path::new("C:/program FILES/x")));
        assert!(!destination_allowed(Path::new("c:/programdata")));
    }

    #[test]
    fn accepts_ordinary_folders() {
        for path in [
            "C:\\Users\\ana\\Backups",
            "D:\\backups",
            "C:\\ProgramFiles", // no separator, different folder
            "backups/mysql",
        ] {
            assert!(destination_allowed(Path::new(path)), "{path} should be allowed");
        }
    }

    #[test]
    fn ensure_returns_typed_error() {
        let err = ensure_destination_allowed(Path::new("C:\\Windows\\Temp")).unwrap_err();
        match err {
            BackupError::DestinationNotAllowed(p) => {
                assert_eq!(p, PathBuf::from("C:\\Windows\\Temp"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
