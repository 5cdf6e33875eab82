//! Naming convention for per-configuration descriptor files.
//!
//! The markup stage writes one descriptor per physical layout file, named
//! `<family>-layout[-<config>].xml`: `main-layout.xml` for the default variant
//! and `main-layout-land.xml` for the landscape one. Every variant of a family
//! shares the `<family>` prefix, which is the key used for invalidation.

use std::fmt;
use std::path::Path;

/// Marker separating the family name from the configuration qualifier.
pub const LAYOUT_MARKER: &str = "-layout";

/// File extension of descriptor files.
pub const DESCRIPTOR_EXT: &str = "xml";

/// The parsed name of a descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorName {
    /// The layout family (logical layout name) this variant belongs to.
    pub family: String,
    /// The configuration qualifier (e.g. `land`, `sw600dp-v13`), `None` for the default.
    pub config: Option<String>,
}

impl DescriptorName {
    /// Parses a descriptor file name such as `foo-layout-land.xml`.
    ///
    /// Files without the layout marker fall back to their stem as the family name.
    /// Returns `None` for files that are not descriptors at all.
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(DESCRIPTOR_EXT)?.strip_suffix('.')?;
        if stem.is_empty() {
            return None;
        }
        if let Some(idx) = stem.find(LAYOUT_MARKER) {
            let family = &stem[..idx];
            let rest = &stem[idx + LAYOUT_MARKER.len()..];
            if !family.is_empty() {
                if rest.is_empty() {
                    return Some(Self {
                        family: family.to_string(),
                        config: None,
                    });
                }
                if let Some(config) = rest.strip_prefix('-') {
                    if !config.is_empty() {
                        return Some(Self {
                            family: family.to_string(),
                            config: Some(config.to_string()),
                        });
                    }
                }
            }
        }
        Some(Self {
            family: stem.to_string(),
            config: None,
        })
    }

    /// Parses the file-name component of a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::parse)
    }

    /// Returns the canonical file name for this descriptor.
    pub fn file_name(&self) -> String {
        match &self.config {
            Some(config) => format!("{}{LAYOUT_MARKER}-{config}.{DESCRIPTOR_EXT}", self.family),
            None => format!("{}{LAYOUT_MARKER}.{DESCRIPTOR_EXT}", self.family),
        }
    }
}

impl fmt::Display for DescriptorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.config {
            Some(config) => write!(f, "{} ({config})", self.family),
            None => write!(f, "{}", self.family),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_variant() {
        let name = DescriptorName::parse("foo-layout.xml").unwrap();
        assert_eq!(name.family, "foo");
        assert_eq!(name.config, None);
    }

    #[test]
    fn config_variant() {
        let name = DescriptorName::parse("foo-layout-land.xml").unwrap();
        assert_eq!(name.family, "foo");
        assert_eq!(name.config.as_deref(), Some("land"));
    }

    #[test]
    fn multi_qualifier_config() {
        let name = DescriptorName::parse("main_activity-layout-sw600dp-v13.xml").unwrap();
        assert_eq!(name.family, "main_activity");
        assert_eq!(name.config.as_deref(), Some("sw600dp-v13"));
    }

    #[test]
    fn no_marker_uses_stem() {
        let name = DescriptorName::parse("header.xml").unwrap();
        assert_eq!(name.family, "header");
        assert!(name.config.is_none());
    }

    #[test]
    fn non_descriptor_rejected() {
        assert!(DescriptorName::parse("foo-layout.json").is_none());
        assert!(DescriptorName::parse(".xml").is_none());
        assert!(DescriptorName::parse("xml").is_none());
    }

    #[test]
    fn file_name_roundtrip() {
        for raw in ["foo-layout.xml", "foo-layout-land.xml"] {
            assert_eq!(DescriptorName::parse(raw).unwrap().file_name(), raw);
        }
    }

    #[test]
    fn from_path_uses_file_name() {
        let name = DescriptorName::from_path(Path::new("/tmp/info/bar-layout-port.xml")).unwrap();
        assert_eq!(name.family, "bar");
        assert_eq!(format!("{name}"), "bar (port)");
    }
}
