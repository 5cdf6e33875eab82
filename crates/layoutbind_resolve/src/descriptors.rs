//! Enumeration of descriptor files and their layout families.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use layoutbind_common::{DescriptorName, LayoutName};
use layoutbind_store::StoreError;

/// Returns the layout family a descriptor file belongs to.
pub fn family_of(path: &Path) -> Option<LayoutName> {
    DescriptorName::from_path(path).map(|name| name.family)
}

/// Lists every descriptor file directly inside `dir`, sorted.
///
/// A folder that does not exist holds no descriptors. A folder that exists but
/// cannot be listed is an error, since nothing sensible can be generated from it.
pub fn list_descriptor_files(dir: &Path) -> Result<BTreeSet<PathBuf>, StoreError> {
    if !dir.exists() {
        return Ok(BTreeSet::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| StoreError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && DescriptorName::from_path(&path).is_some() {
            files.insert(path);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_of_variants() {
        assert_eq!(family_of(Path::new("/i/foo-layout.xml")).as_deref(), Some("foo"));
        assert_eq!(
            family_of(Path::new("/i/foo-layout-land.xml")).as_deref(),
            Some("foo")
        );
        assert_eq!(family_of(Path::new("/i/notes.txt")), None);
    }

    #[test]
    fn lists_only_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("foo-layout.xml"), "").unwrap();
        std::fs::write(dir.path().join("foo-layout-land.xml"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested.xml")).unwrap();

        let files = list_descriptor_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&dir.path().join("foo-layout.xml")));
        assert!(files.contains(&dir.path().join("foo-layout-land.xml")));
    }

    #[test]
    fn missing_folder_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_descriptor_files(&dir.path().join("absent"))
            .unwrap()
            .is_empty());
    }
}
