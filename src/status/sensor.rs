//! The two status sensors exposed by a notes instance.

use serde::Serialize;
use serde_json::{json, Value};

use super::NotesSnapshot;

/// Which sensor to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// Number of active notes.
    Count,
    /// Full notes list as attributes.
    List,
}

impl SensorKind {
    pub const ALL: [SensorKind; 2] = [SensorKind::Count, SensorKind::List];

    pub fn name(&self) -> &'static str {
        match self {
            SensorKind::Count => "Voice Notes Count",
            SensorKind::List => "Voice Notes List",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SensorKind::Count => "mdi:note-text",
            SensorKind::List => "mdi:format-list-bulleted",
        }
    }

    fn id_suffix(&self) -> &'static str {
        match self {
            SensorKind::Count => "count",
            SensorKind::List => "list",
        }
    }

    fn unit(&self) -> Option<&'static str> {
        match self {
            SensorKind::Count => Some("notes"),
            SensorKind::List => None,
        }
    }

    /// Render this sensor's state for one instance.
    pub fn render(&self, entry_id: &str, snapshot: &NotesSnapshot) -> SensorState {
        let (state, attributes) = match self {
            SensorKind::Count => {
                let summary = snapshot.summary();
                (
                    json!(summary.active),
                    json!({
                        "total_notes": summary.total,
                        "active_notes": summary.active,
                        "completed_notes": summary.completed,
                        "last_note": summary.last_note,
                    }),
                )
            }
            SensorKind::List => (
                json!(format!("{} active notes", snapshot.active_count())),
                json!({
                    "notes": snapshot.formatted_list(),
                    "notes_count": snapshot.total(),
                }),
            ),
        };

        SensorState {
            unique_id: format!("{}_{}", entry_id, self.id_suffix()),
            name: self.name(),
            icon: self.icon(),
            unit_of_measurement: self.unit(),
            state,
            attributes,
        }
    }
}

/// A rendered sensor: state plus attributes, ready to publish.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub name: &'static str,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<&'static str>,
    pub state: Value,
    pub attributes: Value,
}

/// Render both sensors.
pub fn render_all(entry_id: &str, snapshot: &NotesSnapshot) -> Vec<SensorState> {
    SensorKind::ALL
        .iter()
        .map(|kind| kind.render(entry_id, snapshot))
        .collect()
}

/// One-line human readable form of a sensor.
pub fn format_sensor(sensor: &SensorState) -> String {
    let state = match &sensor.state {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match sensor.unit_of_measurement {
        Some(unit) => format!("{}: {} {}", sensor.name, state, unit),
        None => format!("{}: {}", sensor.name, state),
    }
}
