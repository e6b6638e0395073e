//! Availability — whether an entity is reachable, derived from its state.

use serde::{Deserialize, Serialize};

/// State value reported by entities that cannot be reached.
pub const STATE_UNAVAILABLE: &str = "unavailable";
/// State value reported by entities whose state is not known yet.
pub const STATE_UNKNOWN: &str = "unknown";

/// Payload published on the `availability` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Online,
    Offline,
}

impl Availability {
    /// `Offline` iff the state is `unavailable`, `unknown` or absent.
    #[must_use]
    pub fn from_state(state: Option<&str>) -> Self {
        match state {
            None | Some(STATE_UNAVAILABLE | STATE_UNKNOWN) => Self::Offline,
            Some(_) => Self::Online,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_online_for_regular_state() {
        assert_eq!(Availability::from_state(Some("on")), Availability::Online);
        assert_eq!(Availability::from_state(Some("21.5")), Availability::Online);
    }

    #[test]
    fn should_report_offline_when_state_is_unavailable() {
        assert_eq!(
            Availability::from_state(Some("unavailable")),
            Availability::Offline
        );
    }

    #[test]
    fn should_report_offline_when_state_is_unknown() {
        assert_eq!(Availability::from_state(Some("unknown")), Availability::Offline);
    }

    #[test]
    fn should_report_offline_when_state_is_absent() {
        assert_eq!(Availability::from_state(None), Availability::Offline);
    }

    #[test]
    fn should_display_lowercase_variant_name() {
        assert_eq!(Availability::Online.to_string(), "online");
        assert_eq!(Availability::Offline.to_string(), "offline");
    }
}
