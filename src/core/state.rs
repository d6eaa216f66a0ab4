//! Session state: the full snapshot exchanged with the authority.
//!
//! ## SessionState
//!
//! Everything the authority knows about one session:
//! - Version (monotonic) and seed
//! - Per-player zones, limits, resources and pending decision
//! - Combat progression (round, turn order, current index)
//! - The global card-instance registry
//!
//! Collections use `im` persistent structures so the local engine can clone
//! a snapshot in O(1), mutate the clone and either commit or drop it.
//!
//! The client never edits a synchronized snapshot in place; it only ever
//! replaces it with a newer one (see `sync::Dispatcher`).

use std::collections::{BTreeMap, BTreeSet};

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::RulesConfig;
use super::ids::{InstanceId, PlayerId};
use crate::cards::CardInstance;
use crate::decision::PendingDecision;
use crate::zones::Zone;

fn default_hand_limit() -> usize {
    RulesConfig::default().hand_limit
}

fn default_field_limit() -> usize {
    RulesConfig::default().field_limit
}

/// Per-player zones, limits and resources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Owner of this state.
    pub player_id: PlayerId,

    // === Zones ===
    /// Draw pile; front is the top.
    #[serde(default)]
    pub deck: Vector<InstanceId>,
    /// Hand, in draw order.
    #[serde(default)]
    pub hand: Vector<InstanceId>,
    /// Discard pile, oldest first.
    #[serde(default)]
    pub grave: Vector<InstanceId>,
    /// Installed cards.
    #[serde(default)]
    pub field: Vector<InstanceId>,
    /// Removed from play.
    #[serde(default)]
    pub excluded: Vector<InstanceId>,
    /// The EX slot.
    #[serde(default)]
    pub ex_card: Option<InstanceId>,

    // === EX ===
    /// Authority-reported EX cooldown flag.
    #[serde(default)]
    pub ex_on_cooldown: bool,
    /// Owner turn-starts remaining before EX is usable again.
    #[serde(default)]
    pub ex_cooldown: u32,

    // === Decision ===
    /// Blocking rule prompt, if any.
    #[serde(default)]
    pub pending_decision: Option<PendingDecision>,

    // === Per-turn flags ===
    /// Hand swap already used this turn.
    #[serde(default)]
    pub swapped_this_turn: bool,
    /// Cards played via PLAY_CARD this turn.
    #[serde(default)]
    pub cards_played_this_turn: u32,
    /// EX used this turn.
    #[serde(default)]
    pub used_ex_this_turn: bool,

    // === Resources and limits ===
    /// Current action points.
    #[serde(default)]
    pub ap: u32,
    /// Soft hand limit.
    #[serde(default = "default_hand_limit")]
    pub hand_limit: usize,
    /// Hard field limit.
    #[serde(default = "default_field_limit")]
    pub field_limit: usize,
}

impl PlayerState {
    /// Create an empty player with limits taken from `rules`.
    #[must_use]
    pub fn new(player_id: PlayerId, rules: &RulesConfig) -> Self {
        Self {
            player_id,
            deck: Vector::new(),
            hand: Vector::new(),
            grave: Vector::new(),
            field: Vector::new(),
            excluded: Vector::new(),
            ex_card: None,
            ex_on_cooldown: false,
            ex_cooldown: 0,
            pending_decision: None,
            swapped_this_turn: false,
            cards_played_this_turn: 0,
            used_ex_this_turn: false,
            ap: rules.ap_per_turn,
            hand_limit: rules.hand_limit,
            field_limit: rules.field_limit,
        }
    }

    /// Ordered contents of a sequence zone. `None` for the EX slot.
    #[must_use]
    pub fn zone(&self, zone: Zone) -> Option<&Vector<InstanceId>> {
        match zone {
            Zone::Deck => Some(&self.deck),
            Zone::Hand => Some(&self.hand),
            Zone::Grave => Some(&self.grave),
            Zone::Field => Some(&self.field),
            Zone::Excluded => Some(&self.excluded),
            Zone::Ex => None,
        }
    }

    /// Mutable access to a sequence zone. `None` for the EX slot.
    pub fn zone_mut(&mut self, zone: Zone) -> Option<&mut Vector<InstanceId>> {
        match zone {
            Zone::Deck => Some(&mut self.deck),
            Zone::Hand => Some(&mut self.hand),
            Zone::Grave => Some(&mut self.grave),
            Zone::Field => Some(&mut self.field),
            Zone::Excluded => Some(&mut self.excluded),
            Zone::Ex => None,
        }
    }

    /// Number of cards in a zone (0 or 1 for the EX slot).
    #[must_use]
    pub fn zone_size(&self, zone: Zone) -> usize {
        match self.zone(zone) {
            Some(cards) => cards.len(),
            None => usize::from(self.ex_card.is_some()),
        }
    }

    /// Check whether `id` is in `zone`.
    #[must_use]
    pub fn contains(&self, zone: Zone, id: &InstanceId) -> bool {
        match self.zone(zone) {
            Some(cards) => cards.contains(id),
            None => self.ex_card.as_ref() == Some(id),
        }
    }

    /// Find the zone holding `id`, if this player owns it.
    #[must_use]
    pub fn locate(&self, id: &InstanceId) -> Option<Zone> {
        Zone::ALL.into_iter().find(|&zone| self.contains(zone, id))
    }

    /// Total cards across every zone including the EX slot.
    #[must_use]
    pub fn card_count(&self) -> usize {
        Zone::ALL.iter().map(|&zone| self.zone_size(zone)).sum()
    }

    /// EX is blocked by either the local counter or the authority flag.
    #[must_use]
    pub fn ex_blocked(&self) -> bool {
        self.ex_on_cooldown || self.ex_cooldown > 0
    }
}

/// Combat progression.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatState {
    /// Round number (starts at 1).
    pub round: u32,
    /// Turn order; a permutation of the active players.
    #[serde(default)]
    pub turn_order: Vec<PlayerId>,
    /// Index into `turn_order` of whoever is acting.
    #[serde(default)]
    pub current_turn_index: usize,
    /// Authority's view of the acting player (redundant with the index).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_turn_player: Option<PlayerId>,
    /// Initiative rolls, when the authority computed them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiatives: Option<BTreeMap<String, i64>>,
    /// Groups of actors that tied on initiative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative_tie_groups: Option<Vec<Vec<String>>>,
}

impl CombatState {
    /// The acting player, if the index is valid.
    #[must_use]
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.turn_order.get(self.current_turn_index)
    }

    /// Check whether it is `player`'s turn.
    #[must_use]
    pub fn is_turn_of(&self, player: &PlayerId) -> bool {
        self.current_player() == Some(player)
    }
}

/// A violated placement or turn invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// An instance is listed in more than one zone (or twice in one).
    #[error("instance {0} is placed more than once")]
    Duplicated(InstanceId),
    /// An instance exists in the registry but in no zone.
    #[error("instance {0} is registered but not placed")]
    Unplaced(InstanceId),
    /// A zone lists an instance the registry does not know.
    #[error("instance {0} is placed but not registered")]
    Unregistered(InstanceId),
    /// The instance's recorded zone or owner disagrees with its placement.
    #[error("instance {id} recorded in {recorded} but placed in {placed}")]
    ZoneMismatch {
        /// Offending instance.
        id: InstanceId,
        /// Zone stored on the instance.
        recorded: Zone,
        /// Zone it was actually found in.
        placed: Zone,
    },
    /// The instance sits in a zone of a player who does not own it.
    #[error("instance {0} is placed under the wrong owner")]
    OwnerMismatch(InstanceId),
    /// `current_turn_index` is out of range or turn order repeats a player.
    #[error("turn order is not a valid permutation")]
    TurnOrder,
}

/// Full authoritative session snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Human-facing session code.
    #[serde(default)]
    pub session_code: String,
    /// Authority-internal session id.
    #[serde(default)]
    pub session_id: String,
    /// Monotonic state version; bumped on every accepted command.
    pub version: u64,
    /// Session random seed.
    #[serde(default)]
    pub seed: i64,
    /// Players by id.
    #[serde(default)]
    pub players: OrdMap<PlayerId, PlayerState>,
    /// Combat progression, once started.
    #[serde(default)]
    pub combat: Option<CombatState>,
    /// Every live card instance.
    #[serde(default)]
    pub cards: OrdMap<InstanceId, CardInstance>,
}

impl SessionState {
    /// Create an empty session at version 0.
    #[must_use]
    pub fn new(session_code: impl Into<String>, seed: i64) -> Self {
        Self {
            session_code: session_code.into(),
            seed,
            ..Self::default()
        }
    }

    /// Seed as the unsigned value the RNG consumes.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.seed as u64
    }

    /// Get a player's state.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    /// Get a mutable player state.
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(id)
    }

    /// Get a card instance.
    #[must_use]
    pub fn card(&self, id: &InstanceId) -> Option<&CardInstance> {
        self.cards.get(id)
    }

    /// The acting player, if combat is running.
    #[must_use]
    pub fn current_turn_player(&self) -> Option<&PlayerId> {
        self.combat.as_ref().and_then(CombatState::current_player)
    }

    /// Instances registered to `owner`.
    #[must_use]
    pub fn owned_instances(&self, owner: &PlayerId) -> usize {
        self.cards.values().filter(|c| &c.owner_id == owner).count()
    }

    /// Verify that every instance sits in exactly one zone of its owner and
    /// that the turn order is a valid permutation.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let mut placed = BTreeSet::new();

        for (player_id, player) in &self.players {
            for zone in Zone::ALL {
                let ids: Vec<&InstanceId> = match player.zone(zone) {
                    Some(cards) => cards.iter().collect(),
                    None => player.ex_card.iter().collect(),
                };
                for id in ids {
                    if !placed.insert(id.clone()) {
                        return Err(IntegrityError::Duplicated(id.clone()));
                    }
                    let card = self
                        .cards
                        .get(id)
                        .ok_or_else(|| IntegrityError::Unregistered(id.clone()))?;
                    if card.zone != zone {
                        return Err(IntegrityError::ZoneMismatch {
                            id: id.clone(),
                            recorded: card.zone,
                            placed: zone,
                        });
                    }
                    if &card.owner_id != player_id {
                        return Err(IntegrityError::OwnerMismatch(id.clone()));
                    }
                }
            }
        }

        if let Some(id) = self.cards.keys().find(|id| !placed.contains(*id)) {
            return Err(IntegrityError::Unplaced(id.clone()));
        }

        if let Some(combat) = &self.combat {
            let unique: BTreeSet<_> = combat.turn_order.iter().collect();
            let valid_index = combat.turn_order.is_empty()
                || combat.current_turn_index < combat.turn_order.len();
            if unique.len() != combat.turn_order.len() || !valid_index {
                return Err(IntegrityError::TurnOrder);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::CardDefId;

    fn seeded_state() -> SessionState {
        let rules = RulesConfig::default();
        let me = PlayerId::new("me");
        let mut state = SessionState::new("ABC123", 7);
        let mut player = PlayerState::new(me.clone(), &rules);
        for i in 0..3 {
            let id = InstanceId::new(format!("c{i}"));
            player.deck.push_back(id.clone());
            state.cards.insert(
                id.clone(),
                CardInstance::new(id, CardDefId::new("C001"), me.clone(), Zone::Deck),
            );
        }
        state.players.insert(me, player);
        state
    }

    #[test]
    fn test_player_zone_access() {
        let state = seeded_state();
        let me = state.player(&PlayerId::new("me")).unwrap();

        assert_eq!(me.zone_size(Zone::Deck), 3);
        assert_eq!(me.zone_size(Zone::Ex), 0);
        assert_eq!(me.locate(&InstanceId::new("c1")), Some(Zone::Deck));
        assert_eq!(me.card_count(), 3);
        assert!(me.zone(Zone::Ex).is_none());
    }

    #[test]
    fn test_integrity_ok() {
        assert_eq!(seeded_state().check_integrity(), Ok(()));
    }

    #[test]
    fn test_integrity_detects_duplicate() {
        let mut state = seeded_state();
        let me = state.player_mut(&PlayerId::new("me")).unwrap();
        me.hand.push_back(InstanceId::new("c0"));

        assert_eq!(
            state.check_integrity(),
            Err(IntegrityError::Duplicated(InstanceId::new("c0")))
        );
    }

    #[test]
    fn test_integrity_detects_loss() {
        let mut state = seeded_state();
        let me = state.player_mut(&PlayerId::new("me")).unwrap();
        me.deck.pop_back();

        assert_eq!(
            state.check_integrity(),
            Err(IntegrityError::Unplaced(InstanceId::new("c2")))
        );
    }

    #[test]
    fn test_integrity_detects_zone_mismatch() {
        let mut state = seeded_state();
        let me = state.player_mut(&PlayerId::new("me")).unwrap();
        let id = me.deck.pop_front().unwrap();
        me.hand.push_back(id);

        assert!(matches!(
            state.check_integrity(),
            Err(IntegrityError::ZoneMismatch { .. })
        ));
    }

    #[test]
    fn test_integrity_turn_order() {
        let mut state = seeded_state();
        state.combat = Some(CombatState {
            round: 1,
            turn_order: vec![PlayerId::new("me")],
            current_turn_index: 3,
            ..CombatState::default()
        });
        assert_eq!(state.check_integrity(), Err(IntegrityError::TurnOrder));
    }

    #[test]
    fn test_wire_shape() {
        let body = r#"{
            "sessionCode": "ABC123",
            "sessionId": "s-1",
            "version": 4,
            "seed": -12,
            "players": {
                "me": {
                    "playerId": "me",
                    "deck": ["c1"],
                    "hand": [],
                    "grave": [],
                    "field": [],
                    "excluded": [],
                    "exCard": null,
                    "exOnCooldown": false,
                    "pendingDecision": {"type": "DISCARD_TO_HAND_LIMIT", "reason": "draw", "limit": 6},
                    "handLimit": 6,
                    "fieldLimit": 5
                }
            },
            "combat": {"round": 2, "turnOrder": ["me"], "currentTurnIndex": 0, "currentTurnPlayer": "me"},
            "cards": {
                "c1": {"instanceId": "c1", "defId": "C001", "ownerId": "me", "zone": "DECK", "counters": {}}
            }
        }"#;

        let state: SessionState = serde_json::from_str(body).unwrap();
        assert_eq!(state.version, 4);
        assert_eq!(state.seed, -12);
        assert_eq!(state.current_turn_player(), Some(&PlayerId::new("me")));
        let me = state.player(&PlayerId::new("me")).unwrap();
        assert!(me.pending_decision.is_some());
        assert_eq!(state.check_integrity(), Ok(()));
    }
}
