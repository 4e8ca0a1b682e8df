//! Line-oriented gestures read from stdin.

use foundation::ids::Day;
use formats::GeoPoint;
use scene::FeatureIndex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Day selector.
    Day(Day),
    /// Click at a map location; routed to a marker, a region or the background.
    Click(GeoPoint),
    Hover(FeatureIndex),
    Unhover(FeatureIndex),
    Background,
    /// Print the panel and layer summary.
    Show,
    Quit,
}

pub fn parse(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".to_string());
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("day", [d]) => {
            let n: u8 = d.parse().map_err(|_| format!("not a day: {d}"))?;
            Command::Day(Day::new(n).map_err(|e| e.to_string())?)
        }
        ("click", [lon, lat]) => Command::Click(GeoPoint::new(number(lon)?, number(lat)?)),
        ("hover", [i]) => Command::Hover(index(i)?),
        ("unhover", [i]) => Command::Unhover(index(i)?),
        ("background", []) => Command::Background,
        ("show", []) => Command::Show,
        ("quit" | "exit", []) => Command::Quit,
        _ => return Err(format!("unrecognized command: {}", line.trim())),
    };
    Ok(command)
}

fn number(s: &str) -> Result<f64, String> {
    s.parse().map_err(|_| format!("not a number: {s}"))
}

fn index(s: &str) -> Result<FeatureIndex, String> {
    s.parse()
        .map(FeatureIndex)
        .map_err(|_| format!("not a feature index: {s}"))
}
