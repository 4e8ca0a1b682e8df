//! Async fetch driver for a [`Session`].
//!
//! Each `request_day` spawns one task per dataset; completions come back over
//! a channel in whatever order the network produces them and are applied to
//! the session one at a time, on the caller's task. The session itself never
//! leaves that task, so no locking is involved.

use std::sync::Arc;

use foundation::ids::{Day, LoadToken};
use layers::panel::PanelSurface;
use layers::viewport::MapViewport;
use tokio::sync::mpsc;

use crate::error::FetchError;
use crate::request::DatasetRequest;
use crate::session::{ApplyOutcome, Session};
use crate::source::DatasetSource;

/// A finished fetch, not yet applied.
#[derive(Debug)]
pub struct Resolved {
    pub request: DatasetRequest,
    pub result: Result<String, FetchError>,
}

pub struct LoadDriver<S> {
    source: Arc<S>,
    tx: mpsc::UnboundedSender<Resolved>,
    rx: mpsc::UnboundedReceiver<Resolved>,
    in_flight: usize,
}

impl<S: DatasetSource + 'static> LoadDriver<S> {
    pub fn new(source: S) -> Self {
        Self::with_shared(Arc::new(source))
    }

    pub fn with_shared(source: Arc<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Fetches spawned and not yet received, across all requested days.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts `day` on the session and spawns both fetches.
    ///
    /// Must be called from within a tokio runtime. Earlier fetches are left
    /// running; their responses are discarded by the session on arrival.
    pub fn request_day<V, P>(&mut self, session: &mut Session<V, P>, day: Day) -> LoadToken
    where
        V: MapViewport,
        P: PanelSurface,
    {
        let requests = session.load_day(day);
        let token = requests.token;
        for request in requests.into_array() {
            self.spawn_fetch(request);
        }
        token
    }

    fn spawn_fetch(&mut self, request: DatasetRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = source.fetch(&request.url).await;
            // The receiver lives as long as the driver; a send error means it was dropped.
            let _ = tx.send(Resolved { request, result });
        });
    }

    /// Waits for the next fetch to finish, or returns `None` if nothing is in flight.
    pub async fn next_resolved(&mut self) -> Option<Resolved> {
        if self.in_flight == 0 {
            return None;
        }
        let resolved = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(resolved)
    }

    /// Applies the next finished fetch to `session`.
    pub async fn pump<V, P>(&mut self, session: &mut Session<V, P>) -> Option<ApplyOutcome>
    where
        V: MapViewport,
        P: PanelSurface,
    {
        let resolved = self.next_resolved().await?;
        Some(session.resolve(&resolved.request, resolved.result))
    }

    /// Applies every outstanding fetch, in completion order.
    pub async fn settle<V, P>(&mut self, session: &mut Session<V, P>) -> Vec<ApplyOutcome>
    where
        V: MapViewport,
        P: PanelSurface,
    {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.pump(session).await {
            outcomes.push(outcome);
        }
        outcomes
    }
}
