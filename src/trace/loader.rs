use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::Context;
use serde_json::Value;

use crate::{
    foundation::{
        core::Point,
        error::{ReplayError, ReplayResult},
    },
    trace::model::{SelfState, SimulationFrame, Trace, VegetationState},
};

const SELF_KEY: &str = "self";
const PATH_KEY: &str = "path";

#[derive(serde::Deserialize)]
struct RawSelf {
    coordinates: [f64; 2],
    heading: f64,
}

#[derive(serde::Deserialize)]
struct RawVegetation {
    coordinates: [f64; 2],
    #[serde(rename = "type")]
    kind: String,
    radius: f64,
}

/// Load a newline-delimited JSON trace and rescale it into scene units.
pub fn load_trace(path: &Path, scale: f64) -> ReplayResult<Trace> {
    let f = File::open(path).with_context(|| format!("open trace '{}'", path.display()))?;
    let trace = parse_trace(BufReader::new(f), scale)?;
    tracing::info!(path = %path.display(), takes = trace.len(), "loaded trace");
    Ok(trace)
}

/// Parse one take per line. Any bad line, blank ones included, fails the whole load,
/// reporting its 1-based line number.
pub fn parse_trace<R: BufRead>(reader: R, scale: f64) -> ReplayResult<Trace> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ReplayError::validation("trace scale must be finite and > 0"));
    }

    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("read trace line {line_no}"))?;
        frames.push(parse_frame(&line, line_no, scale)?);
    }

    Ok(Trace { frames })
}

fn parse_frame(line: &str, line_no: usize, scale: f64) -> ReplayResult<SimulationFrame> {
    let value: Value = serde_json::from_str(line).map_err(|source| ReplayError::TraceParse {
        line: line_no,
        source,
    })?;
    let Value::Object(entries) = value else {
        return Err(ReplayError::schema(line_no, "expected a JSON object"));
    };

    let scaled = |[x, y]: [f64; 2]| Point::new(x * scale, y * scale);

    let mut robot = None;
    let mut path = Vec::new();
    let mut vegetation = BTreeMap::new();
    for (id, entry) in entries {
        match id.as_str() {
            SELF_KEY => {
                let raw: RawSelf = serde_json::from_value(entry)
                    .map_err(|e| ReplayError::schema(line_no, format!("'{SELF_KEY}': {e}")))?;
                robot = Some(SelfState {
                    coordinates: scaled(raw.coordinates),
                    heading: raw.heading,
                });
            }
            PATH_KEY => {
                let raw: Vec<[f64; 2]> = serde_json::from_value(entry)
                    .map_err(|e| ReplayError::schema(line_no, format!("'{PATH_KEY}': {e}")))?;
                path = raw.into_iter().map(scaled).collect();
            }
            _ => {
                let raw: RawVegetation = serde_json::from_value(entry)
                    .map_err(|e| ReplayError::schema(line_no, format!("'{id}': {e}")))?;
                let state = VegetationState {
                    coordinates: scaled(raw.coordinates),
                    kind: raw.kind,
                    radius: raw.radius * scale,
                };
                vegetation.insert(id, state);
            }
        }
    }

    let robot = robot.ok_or_else(|| ReplayError::schema(line_no, "missing 'self' entry"))?;
    Ok(SimulationFrame {
        robot,
        path,
        vegetation,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/trace/loader.rs"]
mod tests;
