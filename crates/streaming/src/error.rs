use formats::GeoJsonError;
use runtime::EventKind;
use scene::DatasetKind;

/// Why a dataset fetch produced no usable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    Status(u16),
    /// Network, IO or body-read failure.
    Transport(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "HTTP {code}"),
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// A failed dataset load. Contained per dataset kind; never fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    Fetch {
        kind: DatasetKind,
        url: String,
        error: FetchError,
    },
    Malformed {
        kind: DatasetKind,
        url: String,
        error: GeoJsonError,
    },
}

impl LoadError {
    pub fn kind(&self) -> DatasetKind {
        match self {
            LoadError::Fetch { kind, .. } | LoadError::Malformed { kind, .. } => *kind,
        }
    }

    pub fn event_kind(&self) -> EventKind {
        match self {
            LoadError::Fetch { .. } => EventKind::FetchFailure,
            LoadError::Malformed { .. } => EventKind::MalformedDataset,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Fetch { kind, url, error } => {
                write!(f, "{kind} fetch failed for {url}: {error}")
            }
            LoadError::Malformed { kind, url, error } => {
                write!(f, "{kind} dataset at {url} is malformed: {error}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Fetch { error, .. } => Some(error),
            LoadError::Malformed { error, .. } => Some(error),
        }
    }
}
