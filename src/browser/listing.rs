//! Directory listing
//!
//! Reading a directory is done by the runtime, not the browser, so the browser
//! itself stays free of file system access and can be driven from tests.

use std::fs;
use std::io;
use std::path::Path;

/// One raw directory entry, before hidden/allowed filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirItem {
    pub name: String,
    pub is_dir: bool,
}

impl DirItem {
    pub fn file(name: &str) -> Self {
        DirItem {
            name: name.to_string(),
            is_dir: false,
        }
    }

    pub fn dir(name: &str) -> Self {
        DirItem {
            name: name.to_string(),
            is_dir: true,
        }
    }
}

/// Whether an entry name is hidden (dotfiles)
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// List `dir`, directories first, then by name.
///
/// Symlinks are followed so a link to a directory is navigable.
pub fn read_dir(dir: &Path) -> io::Result<Vec<DirItem>> {
    let mut items = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = match entry.file_type()? {
            ft if ft.is_symlink() => fs::metadata(entry.path())
                .map(|m| m.is_dir())
                .unwrap_or(false),
            ft => ft.is_dir(),
        };
        items.push(DirItem { name, is_dir });
    }
    sort_items(&mut items);
    Ok(items)
}

pub(crate) fn sort_items(items: &mut [DirItem]) {
    items.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_names() {
        assert!(is_hidden(".env"));
        assert!(is_hidden(".git"));
        assert!(!is_hidden("get.hurl"));
        assert!(!is_hidden("a.b"));
    }

    #[test]
    fn test_read_dir_sorts_directories_first() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.hurl"), "GET http://x").unwrap();
        fs::write(tmp.path().join("a.txt"), "").unwrap();
        fs::create_dir(tmp.path().join("zeta")).unwrap();

        let items = read_dir(tmp.path()).unwrap();
        assert_eq!(
            items,
            vec![DirItem::dir("zeta"), DirItem::file("a.txt"), DirItem::file("b.hurl")]
        );
    }

    #[test]
    fn test_read_dir_missing() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(read_dir(&tmp.path().join("gone")).is_err());
    }
}
