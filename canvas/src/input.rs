//! Input model: tools, pointer buttons, and the gesture state machine.
//!
//! `Tool` captures what a pointer-down should do. `InputState` is either
//! idle or tracking one in-progress `Gesture` between pointer-down and
//! pointer-up; the gesture holds every sample needed to build the final
//! [`Shape`] on release, or a preview shape while the drag is live.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera::ImageCoord;
use crate::doc::{PixelPoint, Shape, StrokeStyle};

/// Which drawing tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Drop a numbered marker on click (default).
    #[default]
    Point,
    /// Drag a free-form polyline.
    Freehand,
    /// Drag a circle out from its centre.
    Circle,
    /// Drag a straight segment.
    Line,
}

impl Tool {
    /// Whether this tool draws by dragging rather than by a single click.
    #[must_use]
    pub fn is_gesture(self) -> bool {
        matches!(self, Self::Freehand | Self::Circle | Self::Line)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Freehand => "freehand",
            Self::Circle => "circle",
            Self::Line => "line",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(Self::Point),
            "freehand" => Ok(Self::Freehand),
            "circle" => Ok(Self::Circle),
            "line" => Ok(Self::Line),
            other => Err(format!("unknown tool '{other}' (expected point, freehand, circle or line)")),
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Persistent tool-bar state visible to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    /// Style applied to annotations started from now on.
    pub stroke: StrokeStyle,
}

/// An in-progress drag, in image space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Segment from `start` to the live endpoint.
    Line { start: PixelPoint, end: Option<ImageCoord> },
    /// Circle centred on `start` through the live endpoint.
    Circle { start: PixelPoint, end: Option<ImageCoord> },
    /// Polyline; `path` begins with the pointer-down sample.
    Freehand { start: PixelPoint, path: Vec<PixelPoint> },
}

impl Gesture {
    /// Start a gesture for `tool` at `coord`. Returns `None` for click tools.
    #[must_use]
    pub fn begin(tool: Tool, coord: ImageCoord) -> Option<Self> {
        let start = PixelPoint::fresh(coord, "point");
        match tool {
            Tool::Point => None,
            Tool::Line => Some(Self::Line { start, end: None }),
            Tool::Circle => Some(Self::Circle { start, end: None }),
            Tool::Freehand => Some(Self::Freehand { path: vec![start.clone()], start }),
        }
    }

    /// The tool that started this gesture.
    #[must_use]
    pub fn tool(&self) -> Tool {
        match self {
            Self::Line { .. } => Tool::Line,
            Self::Circle { .. } => Tool::Circle,
            Self::Freehand { .. } => Tool::Freehand,
        }
    }

    /// Record a pointer-move sample.
    ///
    /// Freehand appends to the path; line and circle replace the endpoint.
    pub fn sample(&mut self, coord: ImageCoord) {
        match self {
            Self::Line { end, .. } | Self::Circle { end, .. } => *end = Some(coord),
            Self::Freehand { path, .. } => path.push(PixelPoint::fresh(coord, "point")),
        }
    }

    /// Number of samples recorded so far, including the pointer-down sample.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        match self {
            Self::Line { end, .. } | Self::Circle { end, .. } => 1 + usize::from(end.is_some()),
            Self::Freehand { path, .. } => path.len(),
        }
    }

    /// Build the committed shape for a pointer-up at `up`.
    ///
    /// A freehand with fewer than two recorded samples degrades to a point at
    /// its start; otherwise the release sample closes the path.
    #[must_use]
    pub fn finish(self, up: ImageCoord) -> Shape {
        match self {
            Self::Line { start, .. } => Shape::Line { x: start.x, y: start.y, end_x: up.x, end_y: up.y },
            Self::Circle { start, .. } => Shape::Circle { x: start.x, y: start.y, end_x: up.x, end_y: up.y },
            Self::Freehand { start, mut path } => {
                if path.len() < 2 {
                    Shape::Point { x: start.x, y: start.y }
                } else {
                    path.push(PixelPoint::fresh(up, "point"));
                    Shape::Freehand { path }
                }
            }
        }
    }

    /// The shape to draw as a dashed preview, if there is enough to show.
    #[must_use]
    pub fn preview(&self) -> Option<Shape> {
        match self {
            Self::Line { start, end } => {
                end.map(|e| Shape::Line { x: start.x, y: start.y, end_x: e.x, end_y: e.y })
            }
            Self::Circle { start, end } => {
                end.map(|e| Shape::Circle { x: start.x, y: start.y, end_x: e.x, end_y: e.y })
            }
            Self::Freehand { path, .. } => (path.len() > 1).then(|| Shape::Freehand { path: path.clone() }),
        }
    }
}

/// The gesture state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A drag is in progress.
    Drawing {
        /// The samples recorded so far.
        gesture: Gesture,
        /// Style captured at pointer-down.
        style: StrokeStyle,
    },
}

impl InputState {
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
