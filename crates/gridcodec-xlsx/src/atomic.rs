//! Replace a file only once its new contents are complete

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{XlsxError, XlsxResult};

fn parent_dir_or_dot(path: &Path) -> &Path {
    // `Path::parent` is `Some("")` for a bare file name
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Write `dest` through a temp file in the same directory.
///
/// The temp file is flushed, synced and renamed over `dest` only when
/// `write_fn` succeeds. On any error it is deleted and `dest` is untouched.
/// The parent directory must already exist.
pub(crate) fn atomic_write<T>(
    dest: &Path,
    write_fn: impl FnOnce(&mut File) -> XlsxResult<T>,
) -> XlsxResult<T> {
    let dir = parent_dir_or_dot(dest);
    let mut tmp = NamedTempFile::new_in(dir)?;
    let out = write_fn(tmp.as_file_mut())?;

    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;

    tmp.into_temp_path()
        .persist(dest)
        .map_err(|e| XlsxError::Io(e.error))?;

    log::debug!("replaced {}", dest.display());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn dir_entries(dir: &Path) -> Vec<std::path::PathBuf> {
        let mut entries: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        entries.sort();
        entries
    }

    #[test]
    fn test_replaces_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("out.bin");
        fs::write(&dest, b"old").unwrap();

        atomic_write(&dest, |f| Ok(f.write_all(b"new")?)).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new");
        assert_eq!(dir_entries(tmp.path()), vec![dest]);
    }

    #[test]
    fn test_failed_write_leaves_target_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("existing.bin");
        fs::write(&dest, b"sentinel").unwrap();

        let err = atomic_write(&dest, |f| {
            f.write_all(b"partial")?;
            Err::<(), _>(XlsxError::Parse("simulated failure".into()))
        })
        .unwrap_err();

        assert!(matches!(err, XlsxError::Parse(_)));
        assert_eq!(fs::read(&dest).unwrap(), b"sentinel");
        assert_eq!(dir_entries(tmp.path()), vec![dest]);
    }

    #[test]
    fn test_missing_parent_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("nested").join("out.bin");

        let mut called = false;
        let err = atomic_write(&dest, |_| {
            called = true;
            Ok(())
        })
        .unwrap_err();

        assert!(matches!(err, XlsxError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
        assert!(!called);
        assert!(!tmp.path().join("nested").exists());
    }
}
