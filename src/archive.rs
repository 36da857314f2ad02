use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

// Pack a dump file into a sibling .zip holding it as its only entry. The
// archive stores the bare file name, so extracting it anywhere yields the
// original dump. The .sql is removed afterwards unless the caller keeps it.
pub fn compress_to_zip(path: &Path, keep_original: bool) -> Result<PathBuf> {
    let zip_path = path.with_extension("zip");
    let entry_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup.sql".to_string());

    let mut writer = ZipWriter::new(File::create(&zip_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(entry_name, options)?;
    std::io::copy(&mut File::open(path)?, &mut writer)?;
    writer.finish()?;

    if !keep_original {
        std::fs::remove_file(path)?;
    }
    debug!("compressed {} into {}", path.display(), zip_path.display());
    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn replaces_dump_with_zip_holding_bare_name() {
        let dir = TempDir::new().unwrap();
        let sql = dir.path().join("shop_backup_2024-03-01_10-00-00.sql");
        std::fs::write(&sql, "CREATE TABLE t (id INT);\n").unwrap();

        let zip_path = compress_to_zip(&sql, false).unwrap();
        assert_eq!(
            zip_path,
            dir.path().join("shop_backup_2024-03-01_10-00-00.zip")
        );
        assert!(!sql.exists());

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
        let mut entry = archive.by_index(0).unwrap();
        assert_eq!(entry.name(), "shop_backup_2024-03-01_10-00-00.sql");
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "CREATE TABLE t (id INT);\n");
    }

    #[test]
    fn can_keep_the_original_alongside_the_zip() {
        let dir = TempDir::new().unwrap();
        let sql = dir.path().join("shop_backup.sql");
        std::fs::write(&sql, "SELECT 1;\n").unwrap();

        let zip_path = compress_to_zip(&sql, true).unwrap();
        assert!(sql.exists());
        assert!(zip_path.exists());
    }

    #[test]
    fn fails_when_dump_is_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.sql");
        assert!(compress_to_zip(&missing, false).is_err());
    }
}
