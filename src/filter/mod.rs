pub mod pattern;
pub mod wildcard;

pub use pattern::filter_tabs;

use crate::tab::{TabInput, TabKind, TabRecord, TabUri};

/// Trait for anything the pattern engine can select over: live host tabs and
/// history records both qualify.
pub trait TabLike {
    fn label(&self) -> &str;
    fn kind(&self) -> TabKind;
    /// Single location, for plain document tabs.
    fn uri(&self) -> Option<&TabUri>;
    /// (original, modified) pair, for diff tabs.
    fn diff_uris(&self) -> Option<(&TabUri, &TabUri)>;
    /// Pinned tabs can be exempted from bulk closing. History records are
    /// never pinned.
    fn is_pinned(&self) -> bool {
        false
    }
}

impl TabLike for TabRecord {
    fn label(&self) -> &str {
        TabRecord::label(self)
    }

    fn kind(&self) -> TabKind {
        TabRecord::kind(self)
    }

    fn uri(&self) -> Option<&TabUri> {
        TabInput::uri(self.input())
    }

    fn diff_uris(&self) -> Option<(&TabUri, &TabUri)> {
        TabInput::diff_uris(self.input())
    }
}

/// Drop pinned tabs from a close selection, for callers honoring the
/// `close_pinned_tabs = false` configuration default.
pub fn without_pinned<'a, T: TabLike>(tabs: Vec<&'a T>) -> Vec<&'a T> {
    tabs.into_iter().filter(|tab| !tab.is_pinned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stand-in for a live host tab, which carries pin state that history
    /// records do not.
    struct LiveTab {
        label: String,
        uri: TabUri,
        pinned: bool,
    }

    impl TabLike for LiveTab {
        fn label(&self) -> &str {
            &self.label
        }

        fn kind(&self) -> TabKind {
            TabKind::Text
        }

        fn uri(&self) -> Option<&TabUri> {
            Some(&self.uri)
        }

        fn diff_uris(&self) -> Option<(&TabUri, &TabUri)> {
            None
        }

        fn is_pinned(&self) -> bool {
            self.pinned
        }
    }

    fn live(label: &str, pinned: bool) -> LiveTab {
        LiveTab {
            label: label.to_string(),
            uri: TabUri::new(format!("file:///ws/{}", label)),
            pinned,
        }
    }

    #[test]
    fn test_without_pinned_exempts_pinned_tabs() {
        let tabs = vec![live("a.rs", false), live("b.rs", true), live("c.rs", false)];

        // "Close everything except a.rs": invert keeps the non-matches.
        let to_close = filter_tabs(&tabs, "a.rs", true, None);
        assert_eq!(to_close.len(), 2);

        let to_close = without_pinned(to_close);
        let labels: Vec<&str> = to_close.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["c.rs"]);
    }

    #[test]
    fn test_history_records_are_never_pinned() {
        let record = TabRecord::new(
            "a.rs",
            TabInput::Text {
                uri: TabUri::new("file:///ws/a.rs"),
            },
        );
        assert!(!TabLike::is_pinned(&record));
    }
}
