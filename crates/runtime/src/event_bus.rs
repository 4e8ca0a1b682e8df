use foundation::ids::LoadToken;

/// What a recorded [`Event`] is about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    DayRequested,
    DatasetApplied,
    StaleDiscarded,
    FetchFailure,
    MalformedDataset,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::DayRequested => "day_requested",
            EventKind::DatasetApplied => "dataset_applied",
            EventKind::StaleDiscarded => "stale_discarded",
            EventKind::FetchFailure => "fetch_failure",
            EventKind::MalformedDataset => "malformed_dataset",
        }
    }

    /// Failures are what the observability sink exists for.
    pub fn is_failure(self) -> bool {
        matches!(self, EventKind::FetchFailure | EventKind::MalformedDataset)
    }
}

/// One entry in the session's observability record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// 0-based position in emission order.
    pub seq: u64,
    pub token: LoadToken,
    pub kind: EventKind,
    pub message: String,
}

/// Append-only, ordered event record.
#[derive(Debug, Default)]
pub struct EventBus {
    next_seq: u64,
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, token: LoadToken, kind: EventKind, message: impl Into<String>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            seq,
            token,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(|e| e.kind.is_failure())
    }
}
