//! Bold-marker linkification for assistant replies.
//!
//! Assistant replies name pages as `**Page Name**`. Markers that correspond
//! to a directory entry are rewritten into anchors so the UI renders them as
//! navigation links. Applying the pass twice is a no-op: the first pass
//! consumes the markers, and the plain anchor text does not re-match.

use crate::directory::PageDirectory;

impl PageDirectory {
    /// Replaces each known `**Name**` marker with an anchor to its page.
    ///
    /// Unknown names are left untouched.
    #[must_use]
    pub fn linkify(&self, text: &str) -> String {
        let mut out = text.to_string();
        for entry in self.flatten() {
            let marker = format!("**{}**", entry.name);
            if out.contains(&marker) {
                let anchor = format!("<a href=\"{}\">{}</a>", entry.path, entry.name);
                out = out.replace(&marker, &anchor);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> PageDirectory {
        PageDirectory::builder()
            .page("Business Info", "/business-info", "Look up business records.")
            .page(
                "Site Profiling",
                "/site-profiling",
                "Profile a site's energy usage.",
            )
            .build()
            .expect("valid directory")
    }

    #[test]
    fn replaces_known_marker_with_anchor() {
        let out = directory().linkify("Head to **Business Info** to search.");
        assert_eq!(
            out,
            "Head to <a href=\"/business-info\">Business Info</a> to search."
        );
    }

    #[test]
    fn replaces_every_known_marker() {
        let out = directory().linkify("Use **Business Info** or **Site Profiling**.");
        assert!(out.contains("<a href=\"/business-info\">Business Info</a>"));
        assert!(out.contains("<a href=\"/site-profiling\">Site Profiling</a>"));
        assert!(!out.contains("**"));
    }

    #[test]
    fn leaves_unknown_markers_alone() {
        let text = "See **Unknown Page** for details.";
        assert_eq!(directory().linkify(text), text);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let directory = directory();
        let once = directory.linkify("Head to **Business Info** to search.");
        let twice = directory.linkify(&once);
        assert_eq!(once, twice);
    }
}
