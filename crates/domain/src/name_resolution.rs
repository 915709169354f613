use serde::{Deserialize, Serialize};

/// Registry answer for one hostname: the owner's identity and the relays it
/// publishes to. Missing fields decode as empty; emptiness is handled by the
/// later pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NameResolution {
    #[serde(rename = "npub", default)]
    pub identity: String,

    #[serde(default)]
    pub relays: Vec<String>,
}

impl NameResolution {
    pub fn new(identity: impl Into<String>, relays: Vec<String>) -> Self {
        Self {
            identity: identity.into(),
            relays,
        }
    }
}
