use std::path::{Path, PathBuf};

/// Walk up from `start` looking for a directory that contains `marker`.
///
/// `start` itself is checked first. Returns the first directory containing the
/// marker, or `None` once the filesystem root has been checked.
#[must_use]
pub fn find_up(start: &Path, marker: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(marker).exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_find_up_in_start_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        assert_eq!(
            find_up(dir.path(), "package.json"),
            Some(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_find_up_walks_parents() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let nested = dir.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            find_up(&nested, "package.json"),
            Some(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_find_up_nearest_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let inner = dir.path().join("packages").join("a");
        fs::create_dir_all(&inner).unwrap();
        fs::write(inner.join("package.json"), "{}").unwrap();

        assert_eq!(find_up(&inner.join("src"), "package.json"), Some(inner));
    }

    #[test]
    fn test_find_up_missing_marker() {
        let dir = tempdir().unwrap();
        assert_eq!(find_up(dir.path(), "definitely-not-a-marker.json"), None);
    }
}
