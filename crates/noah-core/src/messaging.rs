//! One-byte broadcasts between nearby helpers.
//!
//! Each turn every helper returns one value from its observation callback.
//! The value is reduced to a byte according to the [`MessagePolicy`] and
//! delivered to every other mobile helper within the communication radius.
//! Reachability uses true positions, independent of sight. Noah neither
//! sends to nor receives from anyone. Messages live for one turn only.

use std::collections::BTreeMap;

use noah_agents::{HelperState, ProtocolViolation};
use noah_types::{HelperId, Message};
use tracing::warn;

use crate::config::MessagePolicy;

/// Pairs of mobile helpers close enough to exchange messages this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunicationGraph {
    neighbors: BTreeMap<HelperId, Vec<HelperId>>,
}

impl CommunicationGraph {
    /// Compute reachability from current helper positions.
    ///
    /// Neighbor lists come out in ascending id order as long as `helpers`
    /// is sorted by id.
    pub fn build(helpers: &[HelperState], radius: f64) -> Self {
        let mobile: Vec<&HelperState> = helpers.iter().filter(|h| !h.is_noah()).collect();
        let mut neighbors: BTreeMap<HelperId, Vec<HelperId>> =
            mobile.iter().map(|h| (h.id, Vec::new())).collect();

        for (i, a) in mobile.iter().enumerate() {
            for b in mobile.iter().skip(i.saturating_add(1)) {
                if a.position.distance(b.position) <= radius {
                    neighbors.entry(a.id).or_default().push(b.id);
                    neighbors.entry(b.id).or_default().push(a.id);
                }
            }
        }
        for list in neighbors.values_mut() {
            list.sort_unstable();
        }

        Self { neighbors }
    }

    /// Helpers that hear `id`, in ascending id order.
    pub fn neighbors(&self, id: HelperId) -> &[HelperId] {
        self.neighbors.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Whether `a` and `b` can exchange messages.
    pub fn connected(&self, a: HelperId, b: HelperId) -> bool {
        self.neighbors(a).contains(&b)
    }
}

/// Reduce an observation value to the byte that gets broadcast.
///
/// # Errors
///
/// Returns [`ProtocolViolation::MessageOutOfRange`] for values above 255
/// under [`MessagePolicy::Reject`].
pub fn encode_payload(
    helper: HelperId,
    raw: u32,
    policy: MessagePolicy,
) -> Result<u8, ProtocolViolation> {
    if let Ok(byte) = u8::try_from(raw) {
        return Ok(byte);
    }
    match policy {
        MessagePolicy::Mask => {
            let masked = raw.to_le_bytes()[0];
            warn!(%helper, raw, masked, "Message out of range, keeping low byte");
            Ok(masked)
        }
        MessagePolicy::Reject => Err(ProtocolViolation::MessageOutOfRange {
            helper,
            value: raw,
        }),
    }
}

/// Build every helper's inbox from this turn's payloads.
///
/// Each inbox holds one message per reachable neighbor, in ascending
/// neighbor id order. Helpers with no neighbors get an empty inbox.
pub fn route_messages(
    graph: &CommunicationGraph,
    helpers: &[HelperState],
    payloads: &BTreeMap<HelperId, u8>,
) -> BTreeMap<HelperId, Vec<Message>> {
    let views: BTreeMap<HelperId, _> = helpers.iter().map(|h| (h.id, h.view())).collect();

    helpers
        .iter()
        .map(|helper| {
            let inbox = graph
                .neighbors(helper.id)
                .iter()
                .filter_map(|sender| {
                    let from = *views.get(sender)?;
                    let contents = *payloads.get(sender)?;
                    Some(Message { from, contents })
                })
                .collect();
            (helper.id, inbox)
        })
        .collect()
}
