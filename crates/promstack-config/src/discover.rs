//! Executable discovery over an ordered candidate list.

use std::path::{Path, PathBuf};

/// Return the first candidate path that exists on disk.
///
/// A pure function of the provided list; relative candidates resolve against
/// the process working directory.
pub fn first_existing<P: AsRef<Path>>(candidates: &[P]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|p| p.as_ref())
        .find(|p| p.exists())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_existing_picks_first_match() {
        let dir = TempDir::new().unwrap();
        let second = dir.path().join("second");
        let third = dir.path().join("third");
        std::fs::write(&second, b"").unwrap();
        std::fs::write(&third, b"").unwrap();

        let candidates = vec![dir.path().join("missing"), second.clone(), third];
        assert_eq!(first_existing(&candidates), Some(second));
    }

    #[test]
    fn test_first_existing_none_exist() {
        let dir = TempDir::new().unwrap();
        let candidates = vec![dir.path().join("a"), dir.path().join("b")];
        assert_eq!(first_existing(&candidates), None);
    }

    #[test]
    fn test_first_existing_empty_list() {
        let candidates: Vec<PathBuf> = Vec::new();
        assert_eq!(first_existing(&candidates), None);
    }

    #[test]
    fn test_first_existing_preserves_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, b"").unwrap();
        std::fs::write(&b, b"").unwrap();

        assert_eq!(first_existing(&[b.clone(), a]), Some(b));
    }
}
