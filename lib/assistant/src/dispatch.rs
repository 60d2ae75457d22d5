//! Rule-based dispatch for the floating assistant.
//!
//! Dispatch decides whether a message is navigation help the console can
//! answer itself. Messages without a trigger keyword are left to the
//! generative fallback. Triggered messages are resolved against the page
//! directory first, then against an ordered list of category rules whose
//! evaluation order is the priority: the first rule whose keyword appears
//! in the message wins, so overlapping keyword sets (`loa` appears in both
//! the document-generation and client-strategy rules) resolve to the
//! earlier rule.

use greenline_directory::PageDirectory;

use crate::reply::ToolReply;

/// Keywords that route a message into help resolution.
///
/// Checked by substring containment against the lower-cased message.
pub const TRIGGER_KEYWORDS: &[&str] = &[
    "help",
    "explain",
    "how do i",
    "where can i",
    "where is",
    "generate",
    "create",
    "make",
];

/// One entry in the category fallthrough chain.
///
/// Rules are plain data so the priority order is inspectable; they are
/// evaluated in slice order, first match wins.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Short identifier, used in logs and tests.
    pub name: &'static str,
    /// Keywords checked by substring containment.
    pub keywords: &'static [&'static str],
    /// Canned reply text for this category.
    pub reply: &'static str,
    /// Default navigation suggestion for this category.
    pub suggested_page: &'static str,
}

/// The category chain, in priority order.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        name: "utilities",
        keywords: &["utility", "utilities", "invoice", "bill", "meter", "supplier", "mpan", "mprn"],
        reply: "For utility supplies and invoices, start from the utility search page. \
                You can look up supplies by MPAN, MPRN, or supplier reference and open \
                invoice uploads from there.",
        suggested_page: "/utility-search",
    },
    CategoryRule {
        name: "lodgement",
        keywords: &["upload", "lodge", "lodgement", "attach"],
        reply: "Signed documents are lodged against a business record on the document \
                lodgement page.",
        suggested_page: "/document-lodgement",
    },
    CategoryRule {
        name: "generation",
        keywords: &["document", "loa", "letter", "contract", "proposal", "pdf"],
        reply: "LOAs, contracts, and proposal documents are generated on the document \
                generation page. Pick the client and template and the backend does the rest.",
        suggested_page: "/document-generation",
    },
    CategoryRule {
        name: "strategy",
        keywords: &["strategy", "client", "loa", "review", "account"],
        reply: "Client strategy reviews live on the client strategy page, including LOA \
                status and account history.",
        suggested_page: "/client-strategy",
    },
    CategoryRule {
        name: "profiling",
        keywords: &["site", "profile", "profiling", "portfolio", "footprint"],
        reply: "Site energy usage and sustainability footprints are profiled on the site \
                profiling page.",
        suggested_page: "/site-profiling",
    },
];

/// Generic reply when nothing more specific matches.
const FALLBACK_REPLY: &str = "I couldn't match that to a specific page. Most lookups start \
                              from the business info page — search for the business there and \
                              follow the links to its utilities, documents, and strategy.";

/// The primary business-lookup page, suggested by the generic fallback.
const FALLBACK_PAGE: &str = "/business-info";

/// Classifies messages and produces rule-based replies.
///
/// Stateless per call; the directory and rules are fixed at construction.
#[derive(Debug)]
pub struct Dispatcher {
    directory: PageDirectory,
    rules: &'static [CategoryRule],
}

impl Dispatcher {
    /// Creates a dispatcher over the given directory with the default
    /// category chain.
    #[must_use]
    pub fn new(directory: PageDirectory) -> Self {
        Self {
            directory,
            rules: CATEGORY_RULES,
        }
    }

    /// Returns the injected page directory.
    #[must_use]
    pub fn directory(&self) -> &PageDirectory {
        &self.directory
    }

    /// Returns the category chain in priority order.
    #[must_use]
    pub fn rules(&self) -> &'static [CategoryRule] {
        self.rules
    }

    /// Classifies a message.
    ///
    /// Returns `None` when no trigger keyword appears — the caller should
    /// hand the message to the generative fallback.
    #[must_use]
    pub fn dispatch(&self, message: &str) -> Option<ToolReply> {
        let lowered = message.to_lowercase();
        if !TRIGGER_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return None;
        }
        Some(self.resolve_help(message))
    }

    /// Resolves a triggered message to navigation help.
    ///
    /// Directory entries win over category rules; the generic fallback
    /// always answers.
    #[must_use]
    pub fn resolve_help(&self, message: &str) -> ToolReply {
        if let Some(entry) = self.directory.find_in_message(message) {
            return ToolReply::navigation(entry.description, entry.path);
        }

        let lowered = message.to_lowercase();
        for rule in self.rules {
            if rule.keywords.iter().any(|k| lowered.contains(k)) {
                tracing::debug!(category = rule.name, "help resolved by category rule");
                return ToolReply::navigation(rule.reply, rule.suggested_page);
            }
        }

        ToolReply::navigation(FALLBACK_REPLY, FALLBACK_PAGE)
    }
}
