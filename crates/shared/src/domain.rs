use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ClickId);

pub const IDLE_LABEL: &str = "Run Scraper";
pub const SUCCESS_LABEL: &str = "Scraper started!";
pub const FAILURE_LABEL: &str = "Scraper run failed.";

/// Display state of the trigger button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    #[default]
    Idle,
    Pending,
    Success,
    Failure,
}

impl ButtonState {
    /// Text shown on the control. The label stays on the idle text while a
    /// request is in flight.
    pub fn label(self) -> &'static str {
        match self {
            ButtonState::Idle | ButtonState::Pending => IDLE_LABEL,
            ButtonState::Success => SUCCESS_LABEL,
            ButtonState::Failure => FAILURE_LABEL,
        }
    }

    pub fn marker(self) -> Option<ButtonMarker> {
        match self {
            ButtonState::Idle | ButtonState::Pending => None,
            ButtonState::Success => Some(ButtonMarker::Success),
            ButtonState::Failure => Some(ButtonMarker::Fail),
        }
    }

    pub fn appearance(self) -> ButtonAppearance {
        ButtonAppearance {
            label: self.label(),
            marker: self.marker(),
        }
    }

    /// Success and Failure are the only states a reset timer clears.
    pub fn is_settled(self) -> bool {
        matches!(self, ButtonState::Success | ButtonState::Failure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonMarker {
    Success,
    Fail,
}

impl ButtonMarker {
    pub fn css_class(self) -> &'static str {
        match self {
            ButtonMarker::Success => "success",
            ButtonMarker::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonAppearance {
    pub label: &'static str,
    pub marker: Option<ButtonMarker>,
}

impl fmt::Display for ButtonAppearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.marker {
            Some(marker) => write!(f, "[{}] ({})", self.label, marker.css_class()),
            None => write!(f, "[{}]", self.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_keeps_idle_label_without_marker() {
        assert_eq!(ButtonState::Pending.appearance(), ButtonState::Idle.appearance());
        assert_eq!(ButtonState::Pending.marker(), None);
    }

    #[test]
    fn settled_states_carry_their_marker() {
        assert_eq!(
            ButtonState::Success.appearance().to_string(),
            "[Scraper started!] (success)"
        );
        assert_eq!(
            ButtonState::Failure.appearance().to_string(),
            "[Scraper run failed.] (fail)"
        );
        assert_eq!(ButtonState::Idle.appearance().to_string(), "[Run Scraper]");
    }
}
