//! Descriptor fingerprinting and change detection.
//!
//! Hosts that cannot tell which descriptor files changed since the last build
//! can fingerprint the descriptor folder and compare the result with the
//! fingerprints recorded in the previous [`DependencyLog`](crate::DependencyLog).

use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use layoutbind_common::ContentHash;

use crate::error::StoreError;

/// Result of comparing current descriptor fingerprints against recorded ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Files with no recorded fingerprint.
    pub new_files: Vec<PathBuf>,

    /// Files whose content hash differs from the recorded one.
    pub modified_files: Vec<PathBuf>,

    /// Files that were recorded but are no longer present.
    pub deleted_files: Vec<PathBuf>,

    /// Files whose content hash matches the recorded one.
    pub unchanged_files: Vec<PathBuf>,
}

impl ChangeSet {
    /// Returns `true` if there are no new, modified, or deleted files.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// Files that were added or modified, as the resolver's `out_of_date` input.
    pub fn out_of_date(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .new_files
            .iter()
            .chain(&self.modified_files)
            .cloned()
            .collect();
        files.sort();
        files
    }

    /// Files that were deleted, as the resolver's `removed` input.
    pub fn removed(&self) -> Vec<PathBuf> {
        self.deleted_files.clone()
    }
}

/// Content hashes of the descriptor files present at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprints {
    /// File name to content hash.
    pub hashes: BTreeMap<String, ContentHash>,
    /// Files that exist but could not be read.
    pub unreadable: BTreeSet<String>,
}

impl Fingerprints {
    /// Returns `true` if the file is present, readable or not.
    pub fn contains(&self, name: &str) -> bool {
        self.hashes.contains_key(name) || self.unreadable.contains(name)
    }
}

/// Computes content hashes of descriptor files and detects changes.
pub struct DescriptorHasher;

impl DescriptorHasher {
    /// Computes the content hash of a single file.
    pub fn hash_file(path: &Path) -> Result<ContentHash, StoreError> {
        let content = std::fs::read(path).map_err(|e| StoreError::io(path, e))?;
        Ok(ContentHash::from_bytes(&content))
    }

    /// Fingerprints the given descriptor files, keyed by file name.
    ///
    /// A file that vanished since it was listed is left out and later shows up
    /// as deleted. A file that exists but cannot be read goes into
    /// [`Fingerprints::unreadable`] so it is never mistaken for a deletion.
    pub fn fingerprint<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> Fingerprints {
        let mut fingerprints = Fingerprints::default();
        for path in paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match Self::hash_file(path) {
                Ok(hash) => {
                    fingerprints.hashes.insert(name.to_string(), hash);
                }
                Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "descriptor vanished before hashing");
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "cannot fingerprint descriptor");
                    fingerprints.unreadable.insert(name.to_string());
                }
            }
        }
        fingerprints
    }

    /// Compares current fingerprints against recorded ones.
    ///
    /// Recorded maps are keyed by file name; the returned paths are joined onto
    /// `info_dir`. Unreadable files count as modified when they were recorded
    /// and as new otherwise.
    pub fn detect_changes(
        info_dir: &Path,
        current: &Fingerprints,
        recorded: &BTreeMap<String, ContentHash>,
    ) -> ChangeSet {
        let mut changes = ChangeSet::default();

        for (name, hash) in &current.hashes {
            let path = info_dir.join(name);
            match recorded.get(name) {
                Some(previous) if previous == hash => changes.unchanged_files.push(path),
                Some(_) => changes.modified_files.push(path),
                None => changes.new_files.push(path),
            }
        }
        for name in &current.unreadable {
            let path = info_dir.join(name);
            if recorded.contains_key(name) {
                changes.modified_files.push(path);
            } else {
                changes.new_files.push(path);
            }
        }
        changes.new_files.sort();
        changes.modified_files.sort();

        changes.deleted_files = recorded
            .keys()
            .filter(|name| !current.contains(name))
            .map(|name| info_dir.join(name))
            .collect();

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_file_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo-layout.xml");
        std::fs::write(&path, "<layout/>").unwrap();

        let h1 = DescriptorHasher::hash_file(&path).unwrap();
        let h2 = DescriptorHasher::hash_file(&path).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn hash_file_nonexistent_errors() {
        let result = DescriptorHasher::hash_file(Path::new("/nonexistent/foo-layout.xml"));
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    fn hashes(entries: &[(&str, &str)]) -> BTreeMap<String, ContentHash> {
        entries
            .iter()
            .map(|(name, data)| (name.to_string(), ContentHash::from_bytes(data.as_bytes())))
            .collect()
    }

    fn readable(entries: &[(&str, &str)]) -> Fingerprints {
        Fingerprints {
            hashes: hashes(entries),
            unreadable: BTreeSet::new(),
        }
    }

    #[test]
    fn fingerprint_keys_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a-layout.xml");
        let b = dir.path().join("b-layout.xml");
        std::fs::write(&a, "a").unwrap();
        std::fs::write(&b, "b").unwrap();
        let missing = dir.path().join("gone-layout.xml");

        let fingerprints = DescriptorHasher::fingerprint(&[a, b, missing]);
        assert_eq!(fingerprints.hashes.len(), 2);
        assert!(fingerprints.hashes.contains_key("a-layout.xml"));
        assert!(fingerprints.hashes.contains_key("b-layout.xml"));
        assert!(fingerprints.unreadable.is_empty());
        assert!(!fingerprints.contains("gone-layout.xml"));
    }

    #[test]
    fn unreadable_descriptor_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked-layout.xml");
        std::fs::create_dir(&blocked).unwrap();

        let fingerprints = DescriptorHasher::fingerprint(&[blocked]);
        assert!(fingerprints.hashes.is_empty());
        assert!(fingerprints.unreadable.contains("blocked-layout.xml"));
        assert!(fingerprints.contains("blocked-layout.xml"));
    }

    #[test]
    fn unreadable_descriptor_is_modified_not_deleted() {
        let info_dir = Path::new("/info");
        let recorded = hashes(&[("blocked-layout.xml", "old"), ("kept-layout.xml", "k")]);
        let mut current = readable(&[("kept-layout.xml", "k")]);
        current.unreadable.insert("blocked-layout.xml".to_string());
        current.unreadable.insert("fresh-layout.xml".to_string());

        let changes = DescriptorHasher::detect_changes(info_dir, &current, &recorded);
        assert_eq!(changes.modified_files, vec![info_dir.join("blocked-layout.xml")]);
        assert_eq!(changes.new_files, vec![info_dir.join("fresh-layout.xml")]);
        assert!(changes.deleted_files.is_empty());
        assert!(changes.removed().is_empty());
    }

    #[test]
    fn detect_all_categories() {
        let info_dir = Path::new("/info");
        let recorded = hashes(&[
            ("kept-layout.xml", "same"),
            ("edited-layout.xml", "old"),
            ("deleted-layout.xml", "same"),
        ]);
        let current = readable(&[
            ("kept-layout.xml", "same"),
            ("edited-layout.xml", "new"),
            ("added-layout.xml", "same"),
        ]);

        let changes = DescriptorHasher::detect_changes(info_dir, &current, &recorded);
        assert_eq!(changes.new_files, vec![info_dir.join("added-layout.xml")]);
        assert_eq!(changes.modified_files, vec![info_dir.join("edited-layout.xml")]);
        assert_eq!(changes.deleted_files, vec![info_dir.join("deleted-layout.xml")]);
        assert_eq!(changes.unchanged_files, vec![info_dir.join("kept-layout.xml")]);
        assert!(!changes.is_empty());
        assert_eq!(
            changes.out_of_date(),
            vec![
                info_dir.join("added-layout.xml"),
                info_dir.join("edited-layout.xml")
            ]
        );
        assert_eq!(changes.removed(), vec![info_dir.join("deleted-layout.xml")]);
    }

    #[test]
    fn nothing_changed() {
        let current = readable(&[("a-layout.xml", "a")]);
        let changes =
            DescriptorHasher::detect_changes(Path::new("/info"), &current, &current.hashes);
        assert!(changes.is_empty());
        assert_eq!(changes.unchanged_files.len(), 1);
    }
}
