//! Tab records.
//!
//! A [`TabRecord`] describes one editor tab, either currently open or
//! previously closed (history). The location shape depends on the tab kind:
//! plain document tabs carry a single URI, diff tabs carry an original and a
//! modified URI, and webview/terminal/unknown tabs carry none. The shape is
//! encoded in the [`TabInput`] union so an inconsistent combination (a diff
//! tab without both sides, say) cannot be constructed.

use serde::{Deserialize, Serialize};

/// Tab kind tag, derived once from the host's tab-input variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TabKind {
    Text,
    Notebook,
    Custom,
    TextDiff,
    NotebookDiff,
    Webview,
    Terminal,
    Unknown,
}

impl TabKind {
    /// Whether tabs of this kind are recorded in the closed-tab history.
    ///
    /// Webview, terminal and unknown tabs have no reopenable location, so
    /// they never enter the history cache.
    pub fn is_trackable(self) -> bool {
        !matches!(self, TabKind::Webview | TabKind::Terminal | TabKind::Unknown)
    }
}

/// Canonical string form of a tab location (URI or plain path).
///
/// Locations compare by this string form, not by host object identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabUri(String);

impl TabUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path component: for `scheme://authority/a/b` returns `/a/b`, for a
    /// bare path returns the whole string.
    pub fn path(&self) -> &str {
        match self.0.find("://") {
            Some(idx) => {
                let rest = &self.0[idx + 3..];
                match rest.find('/') {
                    Some(slash) => &rest[slash..],
                    None => "",
                }
            }
            None => &self.0,
        }
    }

    /// Containing-folder path: the path component with its final segment
    /// removed. `/a/b/c.txt` -> `/a/b`, `/c.txt` -> `/`.
    pub fn folder(&self) -> &str {
        let path = self.path();
        match path.rfind('/') {
            Some(0) => "/",
            Some(idx) => &path[..idx],
            None => "",
        }
    }
}

impl std::fmt::Display for TabUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind-dependent location shape. One variant per tab kind, carrying exactly
/// the fields valid for that kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabInput {
    Text { uri: TabUri },
    Notebook { uri: TabUri },
    Custom { uri: TabUri },
    TextDiff { original: TabUri, modified: TabUri },
    NotebookDiff { original: TabUri, modified: TabUri },
    Webview,
    Terminal,
    Unknown,
}

impl TabInput {
    pub fn kind(&self) -> TabKind {
        match self {
            TabInput::Text { .. } => TabKind::Text,
            TabInput::Notebook { .. } => TabKind::Notebook,
            TabInput::Custom { .. } => TabKind::Custom,
            TabInput::TextDiff { .. } => TabKind::TextDiff,
            TabInput::NotebookDiff { .. } => TabKind::NotebookDiff,
            TabInput::Webview => TabKind::Webview,
            TabInput::Terminal => TabKind::Terminal,
            TabInput::Unknown => TabKind::Unknown,
        }
    }

    /// Single location, for plain document tabs.
    pub fn uri(&self) -> Option<&TabUri> {
        match self {
            TabInput::Text { uri } | TabInput::Notebook { uri } | TabInput::Custom { uri } => {
                Some(uri)
            }
            _ => None,
        }
    }

    /// (original, modified) pair, for diff tabs.
    pub fn diff_uris(&self) -> Option<(&TabUri, &TabUri)> {
        match self {
            TabInput::TextDiff { original, modified }
            | TabInput::NotebookDiff { original, modified } => Some((original, modified)),
            _ => None,
        }
    }
}

/// One editor tab, open or historical. Immutable after construction.
///
/// Equality covers label, kind and location strings; the timestamp is
/// informational and never part of equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "RawTab", try_from = "RawTab")]
pub struct TabRecord {
    label: String,
    input: TabInput,
    timestamp: Option<u64>,
}

impl TabRecord {
    pub fn new(label: impl Into<String>, input: TabInput) -> Self {
        Self {
            label: label.into(),
            input,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> TabKind {
        self.input.kind()
    }

    pub fn input(&self) -> &TabInput {
        &self.input
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }
}

impl PartialEq for TabRecord {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.input == other.input
    }
}

impl Eq for TabRecord {}

impl std::fmt::Display for TabRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.input {
            TabInput::TextDiff { original, modified }
            | TabInput::NotebookDiff { original, modified } => {
                write!(f, "{:?}: {} <-> {}", self.kind(), original, modified)
            }
            input => match input.uri() {
                Some(uri) => write!(f, "{:?}: {}", self.kind(), uri),
                None => write!(f, "{:?}: {}", self.kind(), self.label),
            },
        }
    }
}

/// Flat persisted shape: `{label, type, uri?, originalUri?, modifiedUri?,
/// timestamp?}`. Absent fields are omitted, not null.
#[derive(Serialize, Deserialize)]
struct RawTab {
    label: String,
    #[serde(rename = "type")]
    kind: TabKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
    #[serde(default, rename = "originalUri", skip_serializing_if = "Option::is_none")]
    original_uri: Option<String>,
    #[serde(default, rename = "modifiedUri", skip_serializing_if = "Option::is_none")]
    modified_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<u64>,
}

impl From<TabRecord> for RawTab {
    fn from(record: TabRecord) -> Self {
        let kind = record.input.kind();
        let (uri, original_uri, modified_uri) = match record.input {
            TabInput::Text { uri } | TabInput::Notebook { uri } | TabInput::Custom { uri } => {
                (Some(uri.0), None, None)
            }
            TabInput::TextDiff { original, modified }
            | TabInput::NotebookDiff { original, modified } => {
                (None, Some(original.0), Some(modified.0))
            }
            TabInput::Webview | TabInput::Terminal | TabInput::Unknown => (None, None, None),
        };
        RawTab {
            label: record.label,
            kind,
            uri,
            original_uri,
            modified_uri,
            timestamp: record.timestamp,
        }
    }
}

impl TryFrom<RawTab> for TabRecord {
    type Error = String;

    fn try_from(raw: RawTab) -> Result<Self, Self::Error> {
        let label = raw.label;
        let single = |uri: Option<String>| {
            uri.map(TabUri)
                .ok_or_else(|| format!("{:?} tab '{}' is missing its uri", raw.kind, label))
        };
        let pair = |o: Option<String>, m: Option<String>| match (o, m) {
            (Some(o), Some(m)) => Ok((TabUri(o), TabUri(m))),
            _ => Err(format!("{:?} tab '{}' is missing a diff uri", raw.kind, label)),
        };

        let input = match raw.kind {
            TabKind::Text => TabInput::Text {
                uri: single(raw.uri)?,
            },
            TabKind::Notebook => TabInput::Notebook {
                uri: single(raw.uri)?,
            },
            TabKind::Custom => TabInput::Custom {
                uri: single(raw.uri)?,
            },
            TabKind::TextDiff => {
                let (original, modified) = pair(raw.original_uri, raw.modified_uri)?;
                TabInput::TextDiff { original, modified }
            }
            TabKind::NotebookDiff => {
                let (original, modified) = pair(raw.original_uri, raw.modified_uri)?;
                TabInput::NotebookDiff { original, modified }
            }
            TabKind::Webview => TabInput::Webview,
            TabKind::Terminal => TabInput::Terminal,
            TabKind::Unknown => TabInput::Unknown,
        };

        Ok(TabRecord {
            label,
            input,
            timestamp: raw.timestamp,
        })
    }
}
