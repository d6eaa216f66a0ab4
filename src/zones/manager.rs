//! Zone manager for card locations and movement.
//!
//! The `ZoneManager` applies the offline transition rules to a
//! `SessionState`. It supports:
//! - Checked moves (the card must be in the stated source zone)
//! - Draw with grave refill
//! - Deck shuffles driven by a `DeterministicRng`
//! - Instance creation and explicit removal
//!
//! Every operation keeps the placement invariant: an instance id appears in
//! exactly one zone of its owner and its recorded `zone` matches. The only
//! way an instance disappears is a token entering a zone it cannot occupy,
//! or an explicit `remove_instance`.
//!
//! Moves append to the back of the destination sequence; the deck's front is
//! its top.

use thiserror::Error;

use crate::cards::{CardInstance, CardRegistry};
use crate::core::{CardDefId, DeterministicRng, InstanceId, PlayerId, SessionState};
use crate::events::EngineEvent;

use super::zone::Zone;

/// A zone transition could not be applied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ZoneError {
    /// The player is not in the session.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    /// The instance is not in the session.
    #[error("unknown card {0}")]
    UnknownInstance(InstanceId),
    /// The instance is not where the move claims it is.
    #[error("card {id} is not in {zone}")]
    NotInZone {
        /// Instance being moved.
        id: InstanceId,
        /// Zone it was expected in.
        zone: Zone,
    },
    /// The player's EX slot already holds a card.
    #[error("ex slot of {0} is occupied")]
    ExOccupied(PlayerId),
}

/// Where a moved card ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The card now sits in the destination zone.
    Moved,
    /// The card was a token and vanished.
    Vanished,
}

/// Applies zone transitions to a session, collecting the resulting events.
pub struct ZoneManager<'a> {
    state: &'a mut SessionState,
    registry: &'a CardRegistry,
    events: &'a mut Vec<EngineEvent>,
}

impl<'a> ZoneManager<'a> {
    /// Wrap a session for mutation.
    pub fn new(
        state: &'a mut SessionState,
        registry: &'a CardRegistry,
        events: &'a mut Vec<EngineEvent>,
    ) -> Self {
        Self {
            state,
            registry,
            events,
        }
    }

    /// Read-only view of the state being mutated.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &*self.state
    }

    fn is_token(&self, id: &InstanceId) -> bool {
        self.registry
            .definition_of(&*self.state, id)
            .is_some_and(|def| def.token)
    }

    /// Remove `id` from `from` without emitting events.
    fn detach(&mut self, owner: &PlayerId, id: &InstanceId, from: Zone) -> Result<(), ZoneError> {
        let player = self
            .state
            .player_mut(owner)
            .ok_or_else(|| ZoneError::UnknownPlayer(owner.clone()))?;

        let missing = || ZoneError::NotInZone {
            id: id.clone(),
            zone: from,
        };
        match player.zone_mut(from) {
            Some(cards) => {
                let index = cards.index_of(id).ok_or_else(missing)?;
                cards.remove(index);
            }
            None => {
                if player.ex_card.as_ref() != Some(id) {
                    return Err(missing());
                }
                player.ex_card = None;
            }
        }
        Ok(())
    }

    /// Place `id` at the back of `to` without emitting events.
    fn attach(&mut self, owner: &PlayerId, id: &InstanceId, to: Zone) -> Result<(), ZoneError> {
        let player = self
            .state
            .player_mut(owner)
            .ok_or_else(|| ZoneError::UnknownPlayer(owner.clone()))?;

        match player.zone_mut(to) {
            Some(cards) => cards.push_back(id.clone()),
            None => {
                if player.ex_card.is_some() {
                    return Err(ZoneError::ExOccupied(owner.clone()));
                }
                player.ex_card = Some(id.clone());
            }
        }
        if let Some(card) = self.state.cards.get_mut(id) {
            card.zone = to;
        }
        Ok(())
    }

    fn relocate(
        &mut self,
        owner: &PlayerId,
        id: &InstanceId,
        from: Zone,
        to: Zone,
    ) -> Result<MoveOutcome, ZoneError> {
        if !self.state.cards.contains_key(id) {
            return Err(ZoneError::UnknownInstance(id.clone()));
        }
        if to == Zone::Ex && from != Zone::Ex {
            let occupied = self
                .state
                .player(owner)
                .is_some_and(|p| p.ex_card.is_some());
            if occupied {
                return Err(ZoneError::ExOccupied(owner.clone()));
            }
        }
        self.detach(owner, id, from)?;

        if to.removes_tokens() && self.is_token(id) {
            self.state.cards.remove(id);
            self.events
                .push(EngineEvent::log(format!("token {id} vanished ({from} → {to})")));
            return Ok(MoveOutcome::Vanished);
        }

        self.attach(owner, id, to)?;
        Ok(MoveOutcome::Moved)
    }

    /// Move one card between two of its owner's zones.
    pub fn move_card(
        &mut self,
        owner: &PlayerId,
        id: &InstanceId,
        from: Zone,
        to: Zone,
    ) -> Result<MoveOutcome, ZoneError> {
        let outcome = self.relocate(owner, id, from, to)?;
        if outcome == MoveOutcome::Moved {
            self.events.push(EngineEvent::moved(owner, from, to, 1));
        }
        Ok(outcome)
    }

    /// Shuffle a player's deck.
    pub fn shuffle_deck<R: DeterministicRng>(&mut self, owner: &PlayerId, rng: &mut R) -> Result<(), ZoneError> {
        let player = self
            .state
            .player_mut(owner)
            .ok_or_else(|| ZoneError::UnknownPlayer(owner.clone()))?;

        let mut cards: Vec<InstanceId> = player.deck.iter().cloned().collect();
        rng.shuffle(&mut cards);
        player.deck = cards.into_iter().collect();

        self.events.push(EngineEvent::shuffled(owner));
        Ok(())
    }

    /// Move the whole grave into the deck and shuffle it. Returns the number
    /// of cards moved.
    pub fn refill_deck_from_grave<R: DeterministicRng>(
        &mut self,
        owner: &PlayerId,
        rng: &mut R,
    ) -> Result<usize, ZoneError> {
        let grave: Vec<InstanceId> = self
            .state
            .player(owner)
            .ok_or_else(|| ZoneError::UnknownPlayer(owner.clone()))?
            .grave
            .iter()
            .cloned()
            .collect();

        let mut moved = 0;
        for id in &grave {
            if self.relocate(owner, id, Zone::Grave, Zone::Deck)? == MoveOutcome::Moved {
                moved += 1;
            }
        }

        self.events.push(EngineEvent::refilled(owner));
        self.shuffle_deck(owner, rng)?;
        Ok(moved)
    }

    /// Draw up to `count` cards from the top of the deck, refilling from the
    /// grave whenever the deck runs out. Stops early only when both are
    /// empty. Returns the number of cards drawn.
    pub fn draw<R: DeterministicRng>(
        &mut self,
        owner: &PlayerId,
        count: usize,
        rng: &mut R,
    ) -> Result<usize, ZoneError> {
        let mut drawn = 0;
        let flush = |events: &mut Vec<EngineEvent>, drawn: &mut usize| {
            if *drawn > 0 {
                let n = u32::try_from(*drawn).unwrap_or(u32::MAX);
                events.push(EngineEvent::moved(owner, Zone::Deck, Zone::Hand, n));
            }
            *drawn = 0;
        };
        let mut total = 0;

        for _ in 0..count {
            let player = self
                .state
                .player(owner)
                .ok_or_else(|| ZoneError::UnknownPlayer(owner.clone()))?;

            if player.deck.is_empty() {
                if player.grave.is_empty() {
                    break;
                }
                flush(&mut *self.events, &mut drawn);
                self.refill_deck_from_grave(owner, rng)?;
            }

            let Some(top) = self.state.player(owner).and_then(|p| p.deck.front().cloned()) else {
                break;
            };
            self.relocate(owner, &top, Zone::Deck, Zone::Hand)?;
            drawn += 1;
            total += 1;
        }

        flush(&mut *self.events, &mut drawn);
        Ok(total)
    }

    /// Create a new instance of `def_id` in `zone`.
    pub fn create_instance(
        &mut self,
        owner: &PlayerId,
        def_id: CardDefId,
        zone: Zone,
    ) -> Result<InstanceId, ZoneError> {
        if self.state.player(owner).is_none() {
            return Err(ZoneError::UnknownPlayer(owner.clone()));
        }

        let mut n = self.state.owned_instances(owner) + 1;
        let id = loop {
            let candidate = InstanceId::new(format!("{owner}-{n}"));
            if !self.state.cards.contains_key(&candidate) {
                break candidate;
            }
            n += 1;
        };

        self.state.cards.insert(
            id.clone(),
            CardInstance::new(id.clone(), def_id, owner.clone(), zone),
        );
        if let Err(err) = self.attach(owner, &id, zone) {
            self.state.cards.remove(&id);
            return Err(err);
        }
        Ok(id)
    }

    /// Remove an instance from play entirely.
    pub fn remove_instance(&mut self, id: &InstanceId) -> Result<CardInstance, ZoneError> {
        let card = self
            .state
            .card(id)
            .cloned()
            .ok_or_else(|| ZoneError::UnknownInstance(id.clone()))?;
        self.detach(&card.owner_id, id, card.zone)?;
        self.state.cards.remove(id);
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::core::{GameRng, PlayerState, RulesConfig};

    fn setup(deck: usize) -> (SessionState, CardRegistry, PlayerId) {
        let me = PlayerId::new("me");
        let mut state = SessionState::new("ABC123", 1);
        state
            .players
            .insert(me.clone(), PlayerState::new(me.clone(), &RulesConfig::default()));
        let registry = CardRegistry::from_definitions([
            CardDefinition::new("C001", "Strike", 1),
            CardDefinition::new("T001", "Spark", 0).as_token(),
        ]);

        let mut events = Vec::new();
        let mut zones = ZoneManager::new(&mut state, &registry, &mut events);
        for _ in 0..deck {
            zones
                .create_instance(&me, CardDefId::new("C001"), Zone::Deck)
                .unwrap();
        }
        (state, registry, me)
    }

    #[test]
    fn test_create_instance_ids_unique() {
        let (state, _, me) = setup(3);
        let player = state.player(&me).unwrap();
        assert_eq!(player.deck.len(), 3);
        assert_eq!(state.cards.len(), 3);
        assert!(state.check_integrity().is_ok());
    }

    #[test]
    fn test_move_checks_source() {
        let (mut state, registry, me) = setup(2);
        let id = state.player(&me).unwrap().deck[0].clone();
        let mut events = Vec::new();
        let mut zones = ZoneManager::new(&mut state, &registry, &mut events);

        let err = zones.move_card(&me, &id, Zone::Hand, Zone::Grave).unwrap_err();
        assert!(matches!(err, ZoneError::NotInZone { .. }));

        zones.move_card(&me, &id, Zone::Deck, Zone::Hand).unwrap();
        assert_eq!(state.card(&id).unwrap().zone, Zone::Hand);
        assert!(state.check_integrity().is_ok());
    }

    #[test]
    fn test_draw_refills_from_grave() {
        let (mut state, registry, me) = setup(5);
        {
            let player = state.player_mut(&me).unwrap();
            for _ in 0..4 {
                let id = player.deck.pop_front().unwrap();
                player.grave.push_back(id);
            }
        }
        for id in state.player(&me).unwrap().grave.clone() {
            state.cards.get_mut(&id).unwrap().zone = Zone::Grave;
        }

        let mut events = Vec::new();
        let mut rng = GameRng::new(9);
        let drawn = ZoneManager::new(&mut state, &registry, &mut events)
            .draw(&me, 3, &mut rng)
            .unwrap();

        let player = state.player(&me).unwrap();
        assert_eq!(drawn, 3);
        assert_eq!(player.hand.len(), 3);
        assert_eq!(player.deck.len(), 2);
        assert!(player.grave.is_empty());
        assert!(events.iter().any(|e| matches!(e, EngineEvent::DeckRefilled(_))));
        assert!(state.check_integrity().is_ok());
    }

    #[test]
    fn test_draw_stops_when_exhausted() {
        let (mut state, registry, me) = setup(2);
        let mut events = Vec::new();
        let mut rng = GameRng::new(9);
        let drawn = ZoneManager::new(&mut state, &registry, &mut events)
            .draw(&me, 5, &mut rng)
            .unwrap();
        assert_eq!(drawn, 2);
    }

    #[test]
    fn test_token_vanishes_into_grave() {
        let (mut state, registry, me) = setup(0);
        let mut events = Vec::new();
        let mut zones = ZoneManager::new(&mut state, &registry, &mut events);
        let token = zones
            .create_instance(&me, CardDefId::new("T001"), Zone::Field)
            .unwrap();

        let outcome = zones.move_card(&me, &token, Zone::Field, Zone::Grave).unwrap();
        assert_eq!(outcome, MoveOutcome::Vanished);
        assert!(state.card(&token).is_none());
        assert!(state.check_integrity().is_ok());
    }

    #[test]
    fn test_ex_slot_single() {
        let (mut state, registry, me) = setup(1);
        let mut events = Vec::new();
        let mut zones = ZoneManager::new(&mut state, &registry, &mut events);
        zones
            .create_instance(&me, CardDefId::new("C001"), Zone::Ex)
            .unwrap();

        let err = zones
            .create_instance(&me, CardDefId::new("C001"), Zone::Ex)
            .unwrap_err();
        assert_eq!(err, ZoneError::ExOccupied(me.clone()));
        assert!(state.check_integrity().is_ok());
    }
}
