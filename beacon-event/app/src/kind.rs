use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of telemetry event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    ScreenView,
    ButtonClick,
    RenderTime,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::ScreenView,
        EventKind::ButtonClick,
        EventKind::RenderTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ScreenView => "SCREEN_VIEW",
            EventKind::ButtonClick => "BUTTON_CLICK",
            EventKind::RenderTime => "RENDER_TIME",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for EventKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCREEN_VIEW" => Ok(EventKind::ScreenView),
            "BUTTON_CLICK" => Ok(EventKind::ButtonClick),
            "RENDER_TIME" => Ok(EventKind::RenderTime),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// A/B test arm an event was produced under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::A => "A",
            Variant::B => "B",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Variant::A),
            "B" => Ok(Variant::B),
            other => Err(format!("unknown variant '{other}', expected A or B")),
        }
    }
}
