mod commands;

use std::env;

use commands::Command;
use foundation::ids::Day;
use layers::panel::{PanelSurface, PanelView};
use layers::viewport::{FeatureRef, HeadlessViewport, MapEvent};
use scene::{DatasetKind, PickOptions};
use streaming::{ApplyOutcome, AutoSource, HazardKind, HazardProfile, LoadDriver, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type ViewerSession = Session<HeadlessViewport, StdoutPanel>;

/// Prints every panel render to stdout.
struct StdoutPanel;

impl PanelSurface for StdoutPanel {
    fn present(&mut self, view: PanelView) {
        println!("----\n{view}\n----");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        error!("viewer failed: {e}");
        std::process::exit(1);
    }
}

fn profile_from_env() -> Result<HazardProfile, BoxError> {
    let mut profile = match env::var("HAZARD_PROFILE") {
        Ok(path) => HazardProfile::load(&path)?,
        Err(_) => {
            let kind: HazardKind = env::var("HAZARD_KIND")
                .unwrap_or_else(|_| "severe".to_string())
                .parse()?;
            HazardProfile::builtin(kind)
        }
    };
    if let Ok(base) = env::var("HAZARD_POINTS_BASE") {
        profile.points_base = base;
    }
    if let Ok(base) = env::var("HAZARD_OUTLOOK_BASE") {
        profile.outlook_base = base;
    }
    Ok(profile)
}

async fn run() -> Result<(), BoxError> {
    let profile = profile_from_env()?;
    let data_root = env::var("HAZARD_DATA_ROOT").unwrap_or_else(|_| ".".to_string());
    let start_day = Day::new(
        env::var("HAZARD_START_DAY")
            .unwrap_or_else(|_| "1".to_string())
            .parse()?,
    )?;

    info!(
        "{:?} viewer: points from {}, outlooks from {}",
        profile.kind, profile.points_base, profile.outlook_base
    );

    let mut session = Session::new(profile, HeadlessViewport::new(), StdoutPanel);
    let mut driver = LoadDriver::new(AutoSource::new(&data_root));
    driver.request_day(&mut session, start_day);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            outcome = driver.pump(&mut session), if driver.in_flight() > 0 => {
                if let Some(ApplyOutcome::Failed(err)) = outcome {
                    println!("! {err}");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match commands::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => apply(&mut driver, &mut session, command),
                    Err(e) => println!("? {e}"),
                }
            }
        }
    }

    info!("viewer exiting");
    Ok(())
}

fn apply(driver: &mut LoadDriver<AutoSource>, session: &mut ViewerSession, command: Command) {
    match command {
        Command::Day(day) => {
            driver.request_day(session, day);
        }
        Command::Click(at) => {
            let event = session.click_at(at, PickOptions::default());
            debug!("click resolved to {event:?}");
        }
        Command::Hover(index) | Command::Unhover(index) => {
            let Some(layer) = session.layer_id(DatasetKind::Points) else {
                println!("? no points loaded");
                return;
            };
            let target = FeatureRef::new(layer, index);
            session.handle_event(match command {
                Command::Hover(_) => MapEvent::FeatureHover(target),
                _ => MapEvent::FeatureUnhover(target),
            });
        }
        Command::Background => session.handle_event(MapEvent::BackgroundClick),
        Command::Show => print_summary(session),
        Command::Quit => {}
    }
}

fn print_summary(session: &ViewerSession) {
    let describe = |kind: DatasetKind| match session.store().dataset(kind) {
        Some(d) => format!("{kind}: day {} ({} features)", d.day, d.len()),
        None => format!("{kind}: none"),
    };
    println!("{}", describe(DatasetKind::Points));
    println!("{}", describe(DatasetKind::Polygons));
    match session.selection().selected() {
        Some(s) => println!("selected: {} (#{})", s.key, s.index.0),
        None => println!("selected: none"),
    }
    if session.is_loading() {
        println!("loading day {}", session.requested_day().map_or(0, Day::get));
    }
    for (name, value) in session.metrics().snapshot().counters {
        println!("{name} = {value}");
    }
}
