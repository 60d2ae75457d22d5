//! Page directory tree and lookup.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::error::DirectoryError;

/// A navigable destination: a path and a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageLeaf {
    /// Route path, always beginning with `/`.
    pub path: String,
    /// What a staff member finds at this destination.
    pub description: String,
}

/// One named top-level entry in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    /// A directly navigable page.
    Page(PageLeaf),
    /// A group of related pages.
    Group {
        /// Optional landing path for the group itself.
        path: Option<String>,
        /// Optional description of the group.
        description: Option<String>,
        /// The group's pages, in declaration order.
        pages: Vec<(String, PageLeaf)>,
    },
}

/// A flattened directory entry, borrowed from the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry<'a> {
    /// Page name (section name for top-level pages).
    pub name: &'a str,
    /// Route path.
    pub path: &'a str,
    /// Description shown in help replies.
    pub description: &'a str,
}

/// The page directory: named sections in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDirectory {
    sections: Vec<(String, Section)>,
}

impl PageDirectory {
    /// Creates a builder for constructing a directory in code.
    #[must_use]
    pub fn builder() -> PageDirectoryBuilder {
        PageDirectoryBuilder {
            sections: Vec::new(),
        }
    }

    /// Loads a directory from its generated JSON source.
    ///
    /// JSON object order is preserved as declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse, a section is neither
    /// a page nor a group, or a page path does not begin with `/`.
    pub fn from_json_str(source: &str) -> Result<Self, DirectoryError> {
        let raw: RawDirectory =
            serde_json::from_str(source).map_err(|e| DirectoryError::Parse {
                reason: e.to_string(),
            })?;

        let mut sections = Vec::with_capacity(raw.0.len());
        for (name, section) in raw.0 {
            let section = match (section.pages, section.path, section.description) {
                (Some(pages), path, description) => Section::Group {
                    path,
                    description,
                    pages: pages.0,
                },
                (None, Some(path), Some(description)) => {
                    Section::Page(PageLeaf { path, description })
                }
                (None, _, _) => {
                    return Err(DirectoryError::IncompleteSection { section: name });
                }
            };
            sections.push((name, section));
        }

        let directory = Self { sections };
        directory.validate()?;
        Ok(directory)
    }

    /// Returns the sections in declaration order.
    #[must_use]
    pub fn sections(&self) -> &[(String, Section)] {
        &self.sections
    }

    /// Flattens the directory by one level of recursion.
    ///
    /// A top-level page contributes itself under its section name; a group
    /// contributes its pages. Entries come out in declaration order.
    #[must_use]
    pub fn flatten(&self) -> Vec<PageEntry<'_>> {
        let mut entries = Vec::new();
        for (name, section) in &self.sections {
            match section {
                Section::Page(leaf) => entries.push(PageEntry {
                    name,
                    path: &leaf.path,
                    description: &leaf.description,
                }),
                Section::Group { pages, .. } => {
                    for (page_name, leaf) in pages {
                        entries.push(PageEntry {
                            name: page_name,
                            path: &leaf.path,
                            description: &leaf.description,
                        });
                    }
                }
            }
        }
        entries
    }

    /// Finds the first entry mentioned in a free-text message.
    ///
    /// An entry matches when its lower-cased name, or its bare path segment,
    /// appears as a substring of the lower-cased message. Plain substring
    /// containment, first match in declaration order wins.
    #[must_use]
    pub fn find_in_message(&self, message: &str) -> Option<PageEntry<'_>> {
        let needle = message.to_lowercase();
        self.flatten().into_iter().find(|entry| {
            let name = entry.name.to_lowercase();
            if needle.contains(&name) {
                return true;
            }
            let segment = entry.path.trim_start_matches('/').to_lowercase();
            !segment.is_empty() && needle.contains(&segment)
        })
    }

    fn validate(&self) -> Result<(), DirectoryError> {
        for entry in self.flatten() {
            if !entry.path.starts_with('/') {
                return Err(DirectoryError::InvalidPath {
                    name: entry.name.to_string(),
                    path: entry.path.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for constructing a directory in code.
#[derive(Debug)]
pub struct PageDirectoryBuilder {
    sections: Vec<(String, Section)>,
}

impl PageDirectoryBuilder {
    /// Adds a top-level page.
    #[must_use]
    pub fn page(
        mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.sections.push((
            name.into(),
            Section::Page(PageLeaf {
                path: path.into(),
                description: description.into(),
            }),
        ));
        self
    }

    /// Adds a group of `(name, path, description)` pages.
    #[must_use]
    pub fn group(mut self, name: impl Into<String>, pages: &[(&str, &str, &str)]) -> Self {
        let pages = pages
            .iter()
            .map(|(page_name, path, description)| {
                (
                    (*page_name).to_string(),
                    PageLeaf {
                        path: (*path).to_string(),
                        description: (*description).to_string(),
                    },
                )
            })
            .collect();
        self.sections.push((
            name.into(),
            Section::Group {
                path: None,
                description: None,
                pages,
            },
        ));
        self
    }

    /// Builds the directory, validating every page path.
    ///
    /// # Errors
    ///
    /// Returns an error if any page path does not begin with `/`.
    pub fn build(self) -> Result<PageDirectory, DirectoryError> {
        let directory = PageDirectory {
            sections: self.sections,
        };
        directory.validate()?;
        Ok(directory)
    }
}

/// Raw section as it appears in the generated JSON.
#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    pages: Option<PageMap>,
}

/// Ordered `name -> leaf` map; plain serde maps would lose document order.
#[derive(Debug)]
struct PageMap(Vec<(String, PageLeaf)>);

impl<'de> Deserialize<'de> for PageMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PageMapVisitor;

        impl<'de> Visitor<'de> for PageMapVisitor {
            type Value = PageMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of page name to page definition")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut pages = Vec::new();
                while let Some((name, leaf)) = access.next_entry::<String, PageLeaf>()? {
                    pages.push((name, leaf));
                }
                Ok(PageMap(pages))
            }
        }

        deserializer.deserialize_map(PageMapVisitor)
    }
}

/// Ordered `section name -> raw section` map.
#[derive(Debug)]
struct RawDirectory(Vec<(String, RawSection)>);

impl<'de> Deserialize<'de> for RawDirectory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawDirectoryVisitor;

        impl<'de> Visitor<'de> for RawDirectoryVisitor {
            type Value = RawDirectory;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of section name to section definition")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sections = Vec::new();
                while let Some((name, section)) = access.next_entry::<String, RawSection>()? {
                    sections.push((name, section));
                }
                Ok(RawDirectory(sections))
            }
        }

        deserializer.deserialize_map(RawDirectoryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PageDirectory {
        PageDirectory::from_json_str(
            r#"{
                "Business Info": {
                    "path": "/business-info",
                    "description": "Look up business records."
                },
                "Documents": {
                    "pages": {
                        "Document Generation": {
                            "path": "/document-generation",
                            "description": "Generate client documents."
                        },
                        "Document Lodgement": {
                            "path": "/document-lodgement",
                            "description": "Lodge signed documents."
                        }
                    }
                },
                "Site Profiling": {
                    "path": "/site-profiling",
                    "description": "Profile a site's energy usage."
                }
            }"#,
        )
        .expect("valid directory")
    }

    #[test]
    fn flatten_preserves_declaration_order() {
        let dir = sample();
        let names: Vec<&str> = dir.flatten().iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![
                "Business Info",
                "Document Generation",
                "Document Lodgement",
                "Site Profiling"
            ]
        );
    }

    #[test]
    fn top_level_page_flattens_under_section_name() {
        let directory = sample();
        let entries = directory.flatten();
        assert_eq!(entries[0].name, "Business Info");
        assert_eq!(entries[0].path, "/business-info");
    }

    #[test]
    fn incomplete_section_is_rejected() {
        let err = PageDirectory::from_json_str(r#"{"Broken": {"path": "/broken"}}"#).unwrap_err();
        assert_eq!(
            err,
            DirectoryError::IncompleteSection {
                section: "Broken".to_string()
            }
        );
    }

    #[test]
    fn path_without_leading_slash_is_rejected() {
        let err = PageDirectory::from_json_str(
            r#"{"Bad": {"path": "bad-path", "description": "No slash."}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            DirectoryError::InvalidPath {
                name: "Bad".to_string(),
                path: "bad-path".to_string()
            }
        );
    }

    #[test]
    fn find_matches_page_name_case_insensitively() {
        let directory = sample();
        let entry = directory
            .find_in_message("where is business info")
            .expect("match");
        assert_eq!(entry.path, "/business-info");
        assert_eq!(entry.description, "Look up business records.");
    }

    #[test]
    fn find_matches_bare_path_segment() {
        let directory = sample();
        let entry = directory
            .find_in_message("take me to document-lodgement please")
            .expect("match");
        assert_eq!(entry.name, "Document Lodgement");
    }

    #[test]
    fn find_returns_first_declared_on_ambiguity() {
        let directory = PageDirectory::builder()
            .page("Invoices", "/invoices", "All invoices.")
            .page("Invoices Archive", "/invoices-archive", "Old invoices.")
            .build()
            .expect("valid directory");

        // "invoices" is a substring of both names; the earlier declaration wins.
        let entry = directory
            .find_in_message("open the invoices archive")
            .expect("match");
        assert_eq!(entry.path, "/invoices");
    }

    #[test]
    fn find_returns_none_without_mention() {
        assert!(sample().find_in_message("completely unrelated").is_none());
    }

    #[test]
    fn builder_matches_json_form() {
        let built = PageDirectory::builder()
            .page("Business Info", "/business-info", "Look up business records.")
            .group(
                "Documents",
                &[
                    (
                        "Document Generation",
                        "/document-generation",
                        "Generate client documents.",
                    ),
                    (
                        "Document Lodgement",
                        "/document-lodgement",
                        "Lodge signed documents.",
                    ),
                ],
            )
            .page(
                "Site Profiling",
                "/site-profiling",
                "Profile a site's energy usage.",
            )
            .build()
            .expect("valid directory");

        assert_eq!(built.flatten(), sample().flatten());
    }

    #[test]
    fn builder_rejects_invalid_path() {
        let err = PageDirectory::builder()
            .page("Bad", "no-slash", "Broken.")
            .build()
            .unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidPath { .. }));
    }
}
