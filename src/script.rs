//! Gesture scripts: JSON Lines of pointer and tool-bar events replayed into an engine.
//!
//! ```text
//! {"event":"tool","tool":"line"}
//! {"event":"down","x":120.5,"y":80}
//! {"event":"move","x":160,"y":95}
//! {"event":"up","x":200,"y":110}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::io::BufRead;

use canvas::camera::Point;
use canvas::doc::{HexColor, StyleError};
use canvas::engine::{Action, Engine};
use canvas::input::{Button, Tool};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: {source}")]
    Style { line: usize, source: StyleError },
    #[error("failed to read script: {0}")]
    Read(#[from] std::io::Error),
}

/// Which pointer button a `down`/`up` event uses. Defaults to primary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl From<ScriptButton> for Button {
    fn from(button: ScriptButton) -> Self {
        match button {
            ScriptButton::Primary => Self::Primary,
            ScriptButton::Middle => Self::Middle,
            ScriptButton::Secondary => Self::Secondary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ScriptEvent {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ScriptButton,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ScriptButton,
    },
    Leave,
    Tool {
        tool: Tool,
    },
    Color {
        color: HexColor,
    },
    Width {
        width: u8,
    },
    /// Remove the marker with this 1-based number.
    Remove {
        marker: usize,
    },
    Clear,
}

/// A parsed event with the script line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub event: ScriptEvent,
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns the first unreadable or malformed line.
pub fn parse(reader: impl BufRead) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut events = Vec::new();
    for (index, raw) in reader.lines().enumerate() {
        let raw = raw?;
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(trimmed).map_err(|e| ScriptError::Parse { line, message: e.to_string() })?;
        events.push(ScriptLine { line, event });
    }
    Ok(events)
}

/// Counts of what a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub markers_added: usize,
    pub annotations_added: usize,
    pub discarded: usize,
}

/// Feed every event into `engine` in order.
///
/// # Errors
///
/// Returns [`ScriptError::Style`] for a colour or width the tool bar rejects.
pub fn replay(engine: &mut Engine, script: &[ScriptLine]) -> Result<ReplayStats, ScriptError> {
    let mut stats = ReplayStats::default();
    for ScriptLine { line, event } in script {
        let actions = apply(engine, event).map_err(|source| ScriptError::Style { line: *line, source })?;
        stats.events += 1;
        for action in &actions {
            match action {
                Action::MarkerAdded { .. } => stats.markers_added += 1,
                Action::AnnotationAdded(_) => stats.annotations_added += 1,
                Action::GestureDiscarded => stats.discarded += 1,
                _ => {}
            }
        }
        tracing::debug!(line, ?event, actions = actions.len(), "script event");
    }
    Ok(stats)
}

fn apply(engine: &mut Engine, event: &ScriptEvent) -> Result<Vec<Action>, StyleError> {
    let actions = match *event {
        ScriptEvent::Down { x, y, button } => engine.on_pointer_down(Point::new(x, y), button.into()),
        ScriptEvent::Move { x, y } => engine.on_pointer_move(Point::new(x, y)),
        ScriptEvent::Up { x, y, button } => engine.on_pointer_up(Point::new(x, y), button.into()),
        ScriptEvent::Leave => engine.on_pointer_leave(),
        ScriptEvent::Tool { tool } => engine.set_tool(tool),
        ScriptEvent::Color { color } => {
            engine.core.set_stroke_color(color);
            Vec::new()
        }
        ScriptEvent::Width { width } => {
            engine.core.set_stroke_width(width)?;
            Vec::new()
        }
        ScriptEvent::Remove { marker } => match marker.checked_sub(1) {
            Some(index) => engine.core.remove_marker(index),
            None => Vec::new(),
        },
        ScriptEvent::Clear => engine.core.clear_all(),
    };
    Ok(actions)
}
