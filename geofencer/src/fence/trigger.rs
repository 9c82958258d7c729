//! Trigger actions attached to geofences.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque action the backend fires when a fence transition matches.
///
/// The coordinator stores the action and attaches it to the fence at
/// registration time; it never invokes the action itself. The only action
/// shape this crate knows about is "open a URI", matching what a platform
/// hands to its notification layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerAction {
    uri: String,
}

impl TriggerAction {
    /// Create an action that opens the given URI on transition.
    pub fn open_uri(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// The URI this action opens.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for TriggerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "open {}", self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_uri_round_trip() {
        let action = TriggerAction::open_uri("http://www.tokyo-skytree.jp/");
        assert_eq!(action.uri(), "http://www.tokyo-skytree.jp/");
    }

    #[test]
    fn test_display() {
        let action = TriggerAction::open_uri("http://example.com/");
        assert_eq!(action.to_string(), "open http://example.com/");
    }
}
