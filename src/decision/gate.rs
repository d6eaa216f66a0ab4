//! Pending decisions and the gate that enforces them.
//!
//! A pending decision is a blocking rule prompt on one player. While it is
//! set, the only well-formed command from that player is its resolution:
//!
//! | Decision | Accepted command | Shape |
//! |---|---|---|
//! | `DiscardToHandLimit{limit}` | `DISCARD_TO_HAND_LIMIT` | unique hand ids, none immovable, leaving exactly `limit` |
//! | `SearchPick{pickCount}` | `SEARCH_PICK` | exactly `pickCount` unique ids from the candidates |
//! | `Other{type}` | nothing | blocks every command |
//!
//! Resolving commands sent with no decision pending are rejected too.
//! The gate never mutates; callers apply the command only after `check`
//! returns `Ok`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cards::CardRegistry;
use crate::core::{Command, InstanceId, PlayerId, PlayerState, RulesConfig, SessionState};

/// Wire tag of the hand-limit decision.
pub const DISCARD_TO_HAND_LIMIT: &str = "DISCARD_TO_HAND_LIMIT";

/// Wire tag of the search decision.
pub const SEARCH_PICK: &str = "SEARCH_PICK";

/// A blocking rule prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDecision", into = "RawDecision")]
pub enum PendingDecision {
    /// Discard down to `limit` cards.
    DiscardToHandLimit {
        /// Why the decision was raised.
        reason: String,
        /// Hand size the discard must leave.
        limit: usize,
    },
    /// Pick `pick_count` cards from a presented candidate set.
    SearchPick {
        /// Why the decision was raised.
        reason: String,
        /// Exact number of ids to pick.
        pick_count: usize,
        /// Presented ids. Empty when the authority did not disclose them.
        candidates: Vec<InstanceId>,
        /// Card that opened the search, if known.
        source: Option<InstanceId>,
    },
    /// A decision type this client does not understand.
    Other {
        /// Raw type tag.
        kind: String,
        /// Why the decision was raised.
        reason: String,
    },
}

impl PendingDecision {
    /// Wire tag.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            PendingDecision::DiscardToHandLimit { .. } => DISCARD_TO_HAND_LIMIT,
            PendingDecision::SearchPick { .. } => SEARCH_PICK,
            PendingDecision::Other { kind, .. } => kind,
        }
    }

    /// Why the decision was raised.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            PendingDecision::DiscardToHandLimit { reason, .. }
            | PendingDecision::SearchPick { reason, .. }
            | PendingDecision::Other { reason, .. } => reason,
        }
    }

    /// True when `command` is the resolution this decision asks for.
    #[must_use]
    pub fn matches(&self, command: &Command) -> bool {
        matches!(
            (self, command),
            (PendingDecision::DiscardToHandLimit { .. }, Command::DiscardToHandLimit { .. })
                | (PendingDecision::SearchPick { .. }, Command::SearchPick { .. })
        )
    }
}

/// Untyped wire shape of a decision.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDecision {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pick_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    candidates: Vec<InstanceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_id: Option<InstanceId>,
}

impl From<RawDecision> for PendingDecision {
    fn from(raw: RawDecision) -> Self {
        let reason = raw.reason.unwrap_or_default();
        match (raw.kind.as_str(), raw.limit, raw.pick_count) {
            (DISCARD_TO_HAND_LIMIT, Some(limit), _) => {
                PendingDecision::DiscardToHandLimit { reason, limit }
            }
            (SEARCH_PICK, _, pick_count) => PendingDecision::SearchPick {
                reason,
                pick_count: pick_count.unwrap_or(1),
                candidates: raw.candidates,
                source: raw.source_id,
            },
            _ => PendingDecision::Other {
                kind: raw.kind,
                reason,
            },
        }
    }
}

impl From<PendingDecision> for RawDecision {
    fn from(decision: PendingDecision) -> Self {
        match decision {
            PendingDecision::DiscardToHandLimit { reason, limit } => RawDecision {
                kind: DISCARD_TO_HAND_LIMIT.to_string(),
                reason: Some(reason),
                limit: Some(limit),
                ..RawDecision::default()
            },
            PendingDecision::SearchPick {
                reason,
                pick_count,
                candidates,
                source,
            } => RawDecision {
                kind: SEARCH_PICK.to_string(),
                reason: Some(reason),
                pick_count: Some(pick_count),
                candidates,
                source_id: source,
                ..RawDecision::default()
            },
            PendingDecision::Other { kind, reason } => RawDecision {
                kind,
                reason: Some(reason),
                ..RawDecision::default()
            },
        }
    }
}

/// Validates commands against a player's pending decision.
pub struct DecisionGate<'a> {
    registry: &'a CardRegistry,
    rules: &'a RulesConfig,
}

impl<'a> DecisionGate<'a> {
    /// Create a gate over the given content and rules.
    #[must_use]
    pub fn new(registry: &'a CardRegistry, rules: &'a RulesConfig) -> Self {
        Self { registry, rules }
    }

    /// Check whether `player_id` may issue `command` in `state`.
    ///
    /// Returns every reason the command is not well-formed.
    pub fn check(
        &self,
        state: &SessionState,
        player_id: &PlayerId,
        command: &Command,
    ) -> Result<(), Vec<String>> {
        let Some(player) = state.player(player_id) else {
            return Err(vec![format!("unknown player {player_id}")]);
        };

        match (&player.pending_decision, command) {
            (None, cmd) if cmd.is_resolving() => Err(vec!["no pending decision".to_string()]),
            (None, _) => Ok(()),
            (Some(pending), cmd) if !pending.matches(cmd) => Err(vec![format!(
                "pending decision {} must be resolved first",
                pending.kind()
            )]),
            (
                Some(PendingDecision::DiscardToHandLimit { limit, .. }),
                Command::DiscardToHandLimit { discard_ids },
            ) => self.check_discard(state, player, *limit, discard_ids),
            (
                Some(PendingDecision::SearchPick {
                    pick_count,
                    candidates,
                    ..
                }),
                Command::SearchPick { pick_ids },
            ) => check_pick(*pick_count, candidates, pick_ids),
            (Some(pending), _) => Err(vec![format!(
                "pending decision {} must be resolved first",
                pending.kind()
            )]),
        }
    }

    fn check_discard(
        &self,
        state: &SessionState,
        player: &PlayerState,
        limit: usize,
        discard_ids: &[InstanceId],
    ) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let need = player.hand.len().saturating_sub(limit);

        if discard_ids.len() != need {
            errors.push(format!("must discard exactly {need} cards"));
        }
        if !all_unique(discard_ids) {
            errors.push("duplicate card in selection".to_string());
        }
        for id in discard_ids {
            if !player.hand.contains(id) {
                errors.push(format!("card {id} is not in hand"));
                continue;
            }
            let immovable = self
                .registry
                .definition_of(state, id)
                .is_some_and(|def| def.has_keyword(&self.rules.immovable_keyword));
            if immovable {
                errors.push(format!("card {id} cannot be discarded"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_pick(
    pick_count: usize,
    candidates: &[InstanceId],
    pick_ids: &[InstanceId],
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if pick_ids.len() != pick_count {
        errors.push(format!("must pick exactly {pick_count} cards"));
    }
    if !all_unique(pick_ids) {
        errors.push("duplicate card in selection".to_string());
    }
    if !candidates.is_empty() {
        for id in pick_ids.iter().filter(|id| !candidates.contains(id)) {
            errors.push(format!("card {id} is not a candidate"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn all_unique(ids: &[InstanceId]) -> bool {
    ids.iter().collect::<BTreeSet<_>>().len() == ids.len()
}
