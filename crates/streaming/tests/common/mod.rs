#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use foundation::ids::Day;
use foundation::time::Time;
use layers::panel::{PanelView, RecordingPanel};
use layers::viewport::HeadlessViewport;
use serde_json::{Value, json};
use streaming::{BoxFuture, DatasetSource, FetchError, HazardProfile, Session};

pub type TestSession = Session<HeadlessViewport, RecordingPanel>;

pub const POINTS_BASE: &str = "points";
pub const OUTLOOK_BASE: &str = "outlooks";

pub fn day(n: u8) -> Day {
    Day::new(n).expect("valid day")
}

fn fixed_clock() -> Time {
    Time::from_millis(1_700_000_000_000)
}

pub fn severe_session() -> TestSession {
    let profile = HazardProfile::severe().with_bases(POINTS_BASE, OUTLOOK_BASE);
    Session::new(profile, HeadlessViewport::new(), RecordingPanel::new()).with_clock(fixed_clock)
}

pub fn facility(name: &str, lon: f64, lat: f64, props: Value) -> Value {
    let mut properties = props;
    properties["FACILITY_NAME"] = json!(name);
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": { "type": "Point", "coordinates": [lon, lat] },
    })
}

pub fn outlook(label: &str, min: f64, max: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": { "LABEL": label, "fill": "#ffe066", "stroke": "#ddaa00" },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[min, min], [max, min], [max, max], [min, max], [min, min]]],
        },
    })
}

pub fn collection(features: Vec<Value>) -> String {
    json!({ "type": "FeatureCollection", "features": features }).to_string()
}

/// Facility name shown on the panel, or `None` for the prompt.
pub fn panel_facility(session: &TestSession) -> Option<String> {
    match session.panel().current()? {
        PanelView::Prompt(_) => None,
        PanelView::Feature(panel) => Some(panel.facility.clone()),
    }
}

pub fn points_path(day: u8) -> String {
    format!("{POINTS_BASE}/SPC_day_{day}.geojson")
}

pub fn outlook_path(day: u8) -> String {
    format!("{OUTLOOK_BASE}/SPCOutlook_day_{day}.geojson")
}

/// Serves canned bodies after a fixed delay, keyed by path (query ignored).
/// Unknown paths answer 404.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    routes: HashMap<String, (Duration, Result<String, FetchError>)>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: impl Into<String>, delay_ms: u64, body: String) -> Self {
        self.routes
            .insert(path.into(), (Duration::from_millis(delay_ms), Ok(body)));
        self
    }

    pub fn fail(mut self, path: impl Into<String>, delay_ms: u64, error: FetchError) -> Self {
        self.routes
            .insert(path.into(), (Duration::from_millis(delay_ms), Err(error)));
        self
    }
}

impl DatasetSource for ScriptedSource {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<String, FetchError>> {
        let path = url.split_once('?').map_or(url, |(p, _)| p).to_string();
        Box::pin(async move {
            match self.routes.get(&path) {
                Some((delay, result)) => {
                    tokio::time::sleep(*delay).await;
                    result.clone()
                }
                None => Err(FetchError::Status(404)),
            }
        })
    }
}
