//! Push frame decoding.

use serde::Deserialize;

use pidash_types::{DnsQuery, HealthSample};

use crate::state::Action;

/// A text frame from the push channel. Fields other than `query` and
/// `health` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub query: Option<DnsQuery>,
    #[serde(default)]
    pub health: Option<HealthSample>,
}

impl PushPayload {
    /// Actions carried by this payload, query first.
    pub fn into_actions(self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(2);
        if let Some(new_query) = self.query {
            actions.push(Action::NewQuery { new_query });
        }
        if let Some(new_health) = self.health {
            actions.push(Action::NewHealth { new_health });
        }
        actions
    }
}

/// Decode a text frame into the actions it carries.
pub fn decode(text: &str) -> Result<Vec<Action>, serde_json::Error> {
    let payload: PushPayload = serde_json::from_str(text)?;
    Ok(payload.into_actions())
}
