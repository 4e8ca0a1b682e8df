//! Owned application state and the day-loading state machine.
//!
//! A [`Session`] is created once at startup and lives for the whole viewing
//! session. All mutation happens through its methods on a single thread:
//! `load_day` mints a token and hands back the two fetches to perform;
//! `resolve` applies (or discards) each response as it arrives; map events and
//! direct selection calls keep the marker styles and the info panel in step.

use std::collections::BTreeSet;

use formats::{FeatureCollection, GeoPoint};
use foundation::ids::{Day, LoadToken};
use foundation::time::Time;
use layers::layer::LayerId;
use layers::panel::{InfoPanelBridge, PanelSurface, RenderRequest};
use layers::symbology::marker_style;
use layers::vector::{PointLayerSnapshot, PolygonLayerSnapshot};
use layers::viewport::{FeatureRef, MapEvent, MapViewport};
use runtime::{EventBus, EventKind, Metrics};
use scene::{
    ClickTarget, DatasetKind, DayDataset, Feature, FeatureIndex, FeatureStore, PickOptions,
    SelectionState, pick,
};
use tracing::{debug, info, warn};

use crate::config::HazardProfile;
use crate::error::{FetchError, LoadError};
use crate::request::{DatasetRequest, DayRequests};

/// What happened to one resolved fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied {
        kind: DatasetKind,
        day: Day,
        features: usize,
        /// Points only: the feature re-selected by identity, if any.
        reselected: Option<FeatureIndex>,
    },
    /// The response belonged to a superseded request and changed nothing.
    Stale { kind: DatasetKind, token: LoadToken },
    /// The previous dataset of this kind stays on screen.
    Failed(LoadError),
}

pub struct Session<V, P> {
    profile: HazardProfile,
    bridge: InfoPanelBridge,
    store: FeatureStore,
    selection: SelectionState,
    viewport: V,
    panel: P,
    token: LoadToken,
    requested_day: Option<Day>,
    pending: BTreeSet<DatasetKind>,
    last_render: RenderRequest,
    bus: EventBus,
    metrics: Metrics,
    clock: fn() -> Time,
}

impl<V: MapViewport, P: PanelSurface> Session<V, P> {
    /// Creates the session and shows the "no selection" panel.
    pub fn new(profile: HazardProfile, viewport: V, panel: P) -> Self {
        let bridge = InfoPanelBridge::new(profile.panel.clone());
        let mut session = Self {
            profile,
            bridge,
            store: FeatureStore::new(),
            selection: SelectionState::new(),
            viewport,
            panel,
            token: LoadToken::default(),
            requested_day: None,
            pending: BTreeSet::new(),
            last_render: RenderRequest::ShowDefault,
            bus: EventBus::new(),
            metrics: Metrics::new(),
            clock: Time::now,
        };
        session.render(RenderRequest::ShowDefault);
        session
    }

    /// Replaces the wall clock used for cache-busting and `loaded_at`.
    pub fn with_clock(mut self, clock: fn() -> Time) -> Self {
        self.clock = clock;
        self
    }

    pub fn profile(&self) -> &HazardProfile {
        &self.profile
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn current_token(&self) -> LoadToken {
        self.token
    }

    /// Day most recently requested, whether or not its data has arrived.
    pub fn requested_day(&self) -> Option<Day> {
        self.requested_day
    }

    pub fn last_render(&self) -> &RenderRequest {
        &self.last_render
    }

    /// `true` while a fetch of the current request is outstanding.
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Starts a day change.
    ///
    /// The new token supersedes any request still in flight. The current
    /// selection is held, not cleared, so it can be re-found in the new points.
    pub fn load_day(&mut self, day: Day) -> DayRequests {
        self.token = self.token.next();
        self.requested_day = Some(day);
        self.pending = BTreeSet::from([DatasetKind::Points, DatasetKind::Polygons]);

        let cache_bust = (self.clock)().as_millis();
        let request = |kind: DatasetKind, url: String| DatasetRequest {
            token: self.token,
            day,
            kind,
            url,
        };
        let requests = DayRequests {
            token: self.token,
            day,
            points: request(DatasetKind::Points, self.profile.points_url(day, cache_bust)),
            polygons: request(
                DatasetKind::Polygons,
                self.profile.polygons_url(day, cache_bust),
            ),
        };

        info!("loading day {day} (request {})", self.token);
        self.metrics.inc_counter("loader.requests", 1);
        self.bus
            .emit(self.token, EventKind::DayRequested, format!("day {day}"));
        requests
    }

    /// Applies the outcome of one fetch issued by [`Session::load_day`].
    ///
    /// Responses whose token is no longer current are discarded before anything
    /// is inspected, successes and failures alike.
    pub fn resolve(
        &mut self,
        request: &DatasetRequest,
        result: Result<String, FetchError>,
    ) -> ApplyOutcome {
        if request.token != self.token || !self.pending.remove(&request.kind) {
            debug!(
                "discarding stale {} response for day {} (request {}, current {})",
                request.kind, request.day, request.token, self.token
            );
            self.metrics.inc_counter("loader.stale_discarded", 1);
            self.bus.emit(
                request.token,
                EventKind::StaleDiscarded,
                format!("{} day {}", request.kind, request.day),
            );
            return ApplyOutcome::Stale {
                kind: request.kind,
                token: request.token,
            };
        }

        let parsed = result
            .map_err(|error| LoadError::Fetch {
                kind: request.kind,
                url: request.url.clone(),
                error,
            })
            .and_then(|body| {
                FeatureCollection::parse(&body).map_err(|error| LoadError::Malformed {
                    kind: request.kind,
                    url: request.url.clone(),
                    error,
                })
            });
        let collection = match parsed {
            Ok(c) => c,
            Err(err) => {
                self.report_failure(request.token, &err);
                return ApplyOutcome::Failed(err);
            }
        };

        let features: Vec<Feature> = collection
            .features
            .iter()
            .map(|g| Feature::from_geo(g, self.profile.identity_fields.as_slice()))
            .collect();
        let dataset = DayDataset::new(
            request.kind,
            request.day,
            request.token,
            (self.clock)(),
            features,
        );
        let count = dataset.len();

        let reselected = match request.kind {
            DatasetKind::Points => self.install_points(dataset),
            DatasetKind::Polygons => {
                self.install_polygons(dataset);
                None
            }
        };

        info!(
            "applied {} for day {} ({count} features)",
            request.kind, request.day
        );
        self.metrics
            .inc_counter(format!("loader.{}.applied", request.kind), 1);
        self.metrics
            .set_gauge(format!("store.{}", request.kind), count as i64);
        self.bus.emit(
            request.token,
            EventKind::DatasetApplied,
            format!("{} day {} ({count} features)", request.kind, request.day),
        );

        ApplyOutcome::Applied {
            kind: request.kind,
            day: request.day,
            features: count,
            reselected,
        }
    }

    /// Swaps the points layer and re-derives the selection against it.
    fn install_points(&mut self, dataset: DayDataset) -> Option<FeatureIndex> {
        // Reconcile first: it reads the held key before clearing it.
        let reselected = self.selection.reconcile(&dataset);
        self.store.replace(dataset);

        if let Some(points) = self.store.points() {
            self.viewport.show_points(PointLayerSnapshot::extract(
                points,
                &self.selection,
                &self.profile.style,
            ));
        }

        let request = reselected
            .and_then(|i| self.store.point(i))
            .map(|f| RenderRequest::ShowFeature(f.attributes.clone()))
            .unwrap_or(RenderRequest::ShowDefault);
        self.render(request);
        reselected
    }

    fn install_polygons(&mut self, dataset: DayDataset) {
        self.store.replace(dataset);
        if let Some(polygons) = self.store.polygons() {
            self.viewport.show_polygons(PolygonLayerSnapshot::extract(
                polygons,
                &self.profile.style,
                &self.profile.popup_title,
            ));
        }
    }

    fn report_failure(&mut self, token: LoadToken, err: &LoadError) {
        warn!("{err}");
        self.metrics
            .inc_counter(format!("loader.{}.failed", err.kind()), 1);
        self.bus.emit(token, err.event_kind(), err.to_string());
    }

    /// Selects a point feature of the current points layer.
    ///
    /// Returns `false` if `index` does not name a current feature.
    pub fn select_feature(&mut self, index: FeatureIndex) -> bool {
        let Some(feature) = self.store.point(index) else {
            return false;
        };
        let key = feature.identity_key.clone();
        let attributes = feature.attributes.clone();

        let changed = self.selection.select(index, key);
        self.restyle(&changed);
        self.render(RenderRequest::ShowFeature(attributes));
        true
    }

    pub fn clear_selection(&mut self) {
        if let Some(demoted) = self.selection.clear() {
            self.restyle(&[demoted]);
        }
        self.render(RenderRequest::ShowDefault);
    }

    pub fn hover(&mut self, index: FeatureIndex) {
        if self.store.point(index).is_none() {
            return;
        }
        let changed = self.selection.hover(index);
        self.restyle(&changed);
    }

    pub fn unhover(&mut self, index: FeatureIndex) {
        if self.selection.unhover(index) {
            self.restyle(&[index]);
        }
    }

    /// Routes one interaction from the map surface.
    ///
    /// Feature events raised on a layer that has since been replaced are ignored.
    pub fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::FeatureClick(r) => {
                if self.is_live(r, DatasetKind::Points) {
                    self.select_feature(r.index);
                }
            }
            MapEvent::FeatureHover(r) => {
                if self.is_live(r, DatasetKind::Points) {
                    self.hover(r.index);
                }
            }
            MapEvent::FeatureUnhover(r) => {
                if self.is_live(r, DatasetKind::Points) {
                    self.unhover(r.index);
                }
            }
            MapEvent::RegionClick(r) => {
                if !self.is_live(r, DatasetKind::Polygons) {
                    return;
                }
                if let Some(region) = self.store.polygon(r.index) {
                    let popup =
                        layers::labels::popup_for(&region.attributes, &self.profile.popup_title);
                    self.viewport.open_popup(r.layer, r.index, popup);
                }
                // Regions are not facilities: the click reaches the map as well.
                self.clear_selection();
            }
            MapEvent::BackgroundClick => self.clear_selection(),
        }
    }

    /// Resolves a click location to exactly one event and handles it.
    pub fn click_at(&mut self, at: GeoPoint, opts: PickOptions) -> MapEvent {
        let event = match pick(&self.store, at, opts) {
            ClickTarget::Point(index) => match self.layer_id(DatasetKind::Points) {
                Some(layer) => MapEvent::FeatureClick(FeatureRef::new(layer, index)),
                None => MapEvent::BackgroundClick,
            },
            ClickTarget::Polygon(index) => match self.layer_id(DatasetKind::Polygons) {
                Some(layer) => MapEvent::RegionClick(FeatureRef::new(layer, index)),
                None => MapEvent::BackgroundClick,
            },
            ClickTarget::Background => MapEvent::BackgroundClick,
        };
        self.handle_event(event);
        event
    }

    /// Id of the layer currently rendered for `kind`.
    pub fn layer_id(&self, kind: DatasetKind) -> Option<LayerId> {
        self.store
            .dataset(kind)
            .map(|d| LayerId::new(kind, d.token))
    }

    /// The panel shows a feature exactly when something is selected.
    pub fn panel_matches_selection(&self) -> bool {
        self.selection.selected_key().is_some() == self.last_render.is_feature()
    }

    fn is_live(&mut self, r: FeatureRef, kind: DatasetKind) -> bool {
        let live = r.layer.kind == kind && self.layer_id(kind) == Some(r.layer);
        if !live {
            debug!("ignoring event from superseded layer {:?}", r.layer);
            self.metrics.inc_counter("viewport.events_ignored", 1);
        }
        live
    }

    fn restyle(&mut self, indices: &[FeatureIndex]) {
        let Some(layer) = self.layer_id(DatasetKind::Points) else {
            return;
        };
        for &index in indices {
            let Some(feature) = self.store.point(index) else {
                continue;
            };
            let style = marker_style(
                &feature.attributes,
                self.selection.substate(index),
                &self.profile.style,
            );
            self.viewport.restyle_marker(layer, index, style);
        }
    }

    fn render(&mut self, request: RenderRequest) {
        self.panel.present(self.bridge.render(&request));
        self.last_render = request;
    }
}
