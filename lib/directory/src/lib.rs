//! Static page directory for the greenline console.
//!
//! The directory is the hierarchical map of navigable destinations and their
//! descriptions, produced once by a deployment-time generation step and
//! consumed read-only by the assistant's help resolver and the reply
//! linkifier. It is an explicitly constructed value, built at startup and
//! injected wherever it is needed — never ambient module state.
//!
//! Declaration order is load-bearing: help resolution returns the first
//! matching entry, so earlier-declared sections win on ambiguous matches.
//!
//! # Example
//!
//! ```
//! use greenline_directory::PageDirectory;
//!
//! let directory = PageDirectory::builder()
//!     .page("Business Info", "/business-info", "Look up business records.")
//!     .group(
//!         "Documents",
//!         &[("Document Generation", "/document-generation", "Generate documents.")],
//!     )
//!     .build()
//!     .expect("valid directory");
//!
//! let entry = directory
//!     .find_in_message("where is business info")
//!     .expect("match");
//! assert_eq!(entry.path, "/business-info");
//! ```

pub mod directory;
pub mod error;
pub mod linkify;

pub use directory::{PageDirectory, PageDirectoryBuilder, PageEntry, PageLeaf, Section};
pub use error::DirectoryError;
