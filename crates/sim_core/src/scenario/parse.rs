//! Scenario record parser.
//!
//! One record per line, whitespace separated; blank lines and lines
//! starting with `#` are ignored:
//!
//! ```text
//! <timestamp> DriverRequest <driver_id> <row,col> <speed>
//! <timestamp> RiderRequest <rider_id> <origin row,col> <dest row,col> <patience>
//! ```

use std::fmt;

use crate::grid::Location;

/// Seed data for a driver's first request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSpec {
    pub id: String,
    pub location: Location,
    pub speed: u64,
}

/// Seed data for a rider's request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiderSpec {
    pub id: String,
    pub origin: Location,
    pub destination: Location,
    pub patience: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioEventKind {
    DriverRequest(DriverSpec),
    RiderRequest(RiderSpec),
}

/// One seed event for the simulation, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioEvent {
    pub timestamp: u64,
    pub kind: ScenarioEventKind,
}

impl fmt::Display for ScenarioEvent {
    /// Formats the event back into its scenario record line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ScenarioEventKind::DriverRequest(spec) => write!(
                f,
                "{} DriverRequest {} {} {}",
                self.timestamp, spec.id, spec.location, spec.speed
            ),
            ScenarioEventKind::RiderRequest(spec) => write!(
                f,
                "{} RiderRequest {} {} {} {}",
                self.timestamp, spec.id, spec.origin, spec.destination, spec.patience
            ),
        }
    }
}

/// Errors encountered while parsing a scenario, with 1-based line numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    MissingField { line: usize, field: &'static str },
    InvalidNumber { line: usize, field: &'static str, value: String },
    InvalidLocation { line: usize, value: String },
    ZeroSpeed { line: usize },
    UnknownRecord { line: usize, record: String },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::MissingField { line, field } => {
                write!(f, "line {line}: missing field '{field}'")
            }
            ScenarioError::InvalidNumber { line, field, value } => {
                write!(f, "line {line}: invalid {field} '{value}'")
            }
            ScenarioError::InvalidLocation { line, value } => {
                write!(f, "line {line}: invalid location '{value}'")
            }
            ScenarioError::ZeroSpeed { line } => {
                write!(f, "line {line}: driver speed must be positive")
            }
            ScenarioError::UnknownRecord { line, record } => {
                write!(f, "line {line}: unknown record kind '{record}'")
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

/// Parses a whole scenario file into validated seed events.
pub fn parse_scenario(input: &str) -> Result<Vec<ScenarioEvent>, ScenarioError> {
    let mut events = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        events.push(parse_record(line, trimmed)?);
    }
    Ok(events)
}

fn parse_record(line: usize, record: &str) -> Result<ScenarioEvent, ScenarioError> {
    let mut tokens = record.split_whitespace();
    let mut next_field = |field: &'static str| {
        tokens
            .next()
            .ok_or(ScenarioError::MissingField { line, field })
    };

    let timestamp = parse_number(line, "timestamp", next_field("timestamp")?)?;
    let record_kind = next_field("record kind")?;
    let kind = match record_kind {
        "DriverRequest" => {
            let id = next_field("driver id")?.to_string();
            let location = parse_location(line, next_field("location")?)?;
            let speed = parse_number(line, "speed", next_field("speed")?)?;
            if speed == 0 {
                return Err(ScenarioError::ZeroSpeed { line });
            }
            ScenarioEventKind::DriverRequest(DriverSpec {
                id,
                location,
                speed,
            })
        }
        "RiderRequest" => {
            let id = next_field("rider id")?.to_string();
            let origin = parse_location(line, next_field("origin")?)?;
            let destination = parse_location(line, next_field("destination")?)?;
            let patience = parse_number(line, "patience", next_field("patience")?)?;
            ScenarioEventKind::RiderRequest(RiderSpec {
                id,
                origin,
                destination,
                patience,
            })
        }
        other => {
            return Err(ScenarioError::UnknownRecord {
                line,
                record: other.to_string(),
            })
        }
    };

    Ok(ScenarioEvent { timestamp, kind })
}

fn parse_number(line: usize, field: &'static str, value: &str) -> Result<u64, ScenarioError> {
    value.parse().map_err(|_| ScenarioError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

fn parse_location(line: usize, value: &str) -> Result<Location, ScenarioError> {
    value.parse().map_err(|_| ScenarioError::InvalidLocation {
        line,
        value: value.to_string(),
    })
}
