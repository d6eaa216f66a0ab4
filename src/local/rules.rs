//! Offline rules: how each command changes a session.
//!
//! `LocalRules::apply` mutates the snapshot it is handed and may fail part
//! way through. The engine only ever applies to a scratch clone and drops
//! it on error, so a rejected command leaves no trace.
//!
//! ## Card routing
//!
//! | Class | From | Result |
//! |---|---|---|
//! | Attack, Utility | hand | grave (or the card's `resolveTo` zone) |
//! | Install | hand | field, refused when the field is full |
//! | Install | field | activates in place |
//! | Search | hand | stays in hand; raises a `SEARCH_PICK` decision |
//! | EX | - | refused; use `USE_EX` |

use std::collections::BTreeMap;

use thiserror::Error;

use crate::cards::{CardClass, CardDefinition, CardRegistry};
use crate::core::{Command, DeterministicRng, InstanceId, PlayerId, PlayerState, RulesConfig, SessionState};
use crate::decision::PendingDecision;
use crate::events::{DecisionCleared, DecisionSet, EngineEvent, TurnAdvanced};
use crate::turn::{resources, TurnError, TurnMachine};
use crate::zones::{Zone, ZoneError, ZoneManager};

const HAND_LIMIT_REASON: &str = "hand limit exceeded";

/// Why the local engine refused a command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Turn or resource rule.
    #[error(transparent)]
    Turn(#[from] TurnError),
    /// Zone transition failed.
    #[error(transparent)]
    Zone(#[from] ZoneError),
    /// Any other rule.
    #[error("{0}")]
    Rule(String),
}

impl Rejection {
    fn rule(reason: impl Into<String>) -> Self {
        Rejection::Rule(reason.into())
    }
}

/// Applies commands to a session under a fixed card pool and rule set.
pub struct LocalRules<'a> {
    registry: &'a CardRegistry,
    rules: &'a RulesConfig,
}

impl<'a> LocalRules<'a> {
    /// Create rules over the given content.
    #[must_use]
    pub fn new(registry: &'a CardRegistry, rules: &'a RulesConfig) -> Self {
        Self { registry, rules }
    }

    /// Apply `command` from `player_id`. Decision gating is the caller's job.
    pub fn apply<R: DeterministicRng>(
        &self,
        state: &mut SessionState,
        player_id: &PlayerId,
        command: &Command,
        rng: &mut R,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), Rejection> {
        if state.player(player_id).is_none() {
            return Err(ZoneError::UnknownPlayer(player_id.clone()).into());
        }

        match command {
            Command::StartCombat => self.start_combat(state, player_id, rng, events),
            Command::Draw { count } => self.draw(state, player_id, *count, rng, events),
            Command::EndTurn => self.end_turn(state, player_id, rng, events),
            Command::HandSwap => self.hand_swap(state, player_id, rng, events),
            Command::PlayCard { card_id, .. } => self.play_card(state, player_id, card_id, events),
            Command::UseEx { .. } => self.use_ex(state, player_id, events),
            Command::DiscardToHandLimit { discard_ids } => {
                self.discard(state, player_id, discard_ids, events)
            }
            Command::SearchPick { pick_ids } => {
                self.search_pick(state, player_id, pick_ids, rng, events)
            }
        }
    }

    fn definition(&self, state: &SessionState, id: &InstanceId) -> Result<&'a CardDefinition, Rejection> {
        let card = state
            .card(id)
            .ok_or_else(|| ZoneError::UnknownInstance(id.clone()))?;
        self.registry
            .get(&card.def_id)
            .ok_or_else(|| Rejection::rule(format!("unknown card definition {}", card.def_id)))
    }

    fn require_turn(state: &SessionState, player_id: &PlayerId) -> Result<(), Rejection> {
        let combat = state.combat.as_ref().ok_or(TurnError::CombatNotStarted)?;
        if !combat.is_turn_of(player_id) {
            return Err(TurnError::NotYourTurn.into());
        }
        Ok(())
    }

    fn player_mut<'s>(state: &'s mut SessionState, player_id: &PlayerId) -> Result<&'s mut PlayerState, Rejection> {
        state
            .player_mut(player_id)
            .ok_or_else(|| ZoneError::UnknownPlayer(player_id.clone()).into())
    }

    /// Set a discard decision if the player is over the hand limit and has
    /// nothing pending.
    fn raise_hand_limit(&self, state: &mut SessionState, player_id: &PlayerId, events: &mut Vec<EngineEvent>) {
        let Some(player) = state.player(player_id) else {
            return;
        };
        if player.pending_decision.is_some() {
            return;
        }
        let decision =
            resources::hand_limit_decision(state, player, self.registry, self.rules, HAND_LIMIT_REASON);
        if let (Some(decision), Some(player)) = (decision, state.player_mut(player_id)) {
            events.push(EngineEvent::PendingDecisionSet(DecisionSet {
                player_id: player_id.clone(),
                decision_type: decision.kind().to_string(),
                reason: decision.reason().to_string(),
            }));
            player.pending_decision = Some(decision);
        }
    }

    fn start_combat<R: DeterministicRng>(
        &self,
        state: &mut SessionState,
        actor: &PlayerId,
        rng: &mut R,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), Rejection> {
        if state.combat.is_some() {
            return Err(TurnError::CombatAlreadyStarted.into());
        }

        // Initiative: 1d100 each, highest first; ties keep seating order.
        let mut rolls: Vec<(PlayerId, i64)> = state
            .players
            .keys()
            .map(|id| (id.clone(), rng.below(100) as i64 + 1))
            .collect();
        rolls.sort_by(|a, b| b.1.cmp(&a.1));

        let mut by_roll: BTreeMap<i64, Vec<String>> = BTreeMap::new();
        for (id, roll) in &rolls {
            by_roll.entry(*roll).or_default().push(id.to_string());
        }
        let ties: Vec<Vec<String>> = by_roll.into_values().filter(|g| g.len() > 1).collect();

        let order: Vec<PlayerId> = rolls.iter().map(|(id, _)| id.clone()).collect();
        let mut combat = TurnMachine::start(order.clone())?;
        combat.initiatives = Some(rolls.iter().map(|(id, r)| (id.to_string(), *r)).collect());
        combat.initiative_tie_groups = Some(ties.clone());
        state.combat = Some(combat);

        for id in &order {
            let drawn = ZoneManager::new(state, self.registry, events).draw(id, self.rules.opening_hand, rng)?;
            let player = Self::player_mut(state, id)?;
            resources::begin_turn(player, self.rules);
            player.ex_cooldown = 0;
            player.ex_on_cooldown = false;
            self.raise_hand_limit(state, id, events);
            events.push(EngineEvent::log(format!("{id} draws {drawn} (combat start)")));
        }

        for (id, roll) in &rolls {
            events.push(EngineEvent::log(format!("initiative {id} = {roll}")));
        }
        if !ties.is_empty() {
            events.push(EngineEvent::log(format!("initiative tie among players: {ties:?}")));
        }
        let names: Vec<&str> = order.iter().map(PlayerId::as_str).collect();
        events.push(EngineEvent::log(format!(
            "{actor} starts combat. order={}",
            names.join(",")
        )));
        if let Some(first) = order.first() {
            events.push(EngineEvent::TurnAdvanced(TurnAdvanced {
                next_player_id: first.clone(),
                round: 1,
            }));
        }
        Ok(())
    }

    fn draw<R: DeterministicRng>(
        &self,
        state: &mut SessionState,
        player_id: &PlayerId,
        count: u32,
        rng: &mut R,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), Rejection> {
        if count == 0 {
            return Err(Rejection::rule("count must be positive"));
        }
        let drawn = ZoneManager::new(state, self.registry, events).draw(player_id, count as usize, rng)?;
        self.raise_hand_limit(state, player_id, events);
        events.push(EngineEvent::log(format!("{player_id} draws {drawn}")));
        Ok(())
    }

    fn end_turn<R: DeterministicRng>(
        &self,
        state: &mut SessionState,
        player_id: &PlayerId,
        rng: &mut R,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), Rejection> {
        Self::require_turn(state, player_id)?;
        events.push(EngineEvent::log(format!("{player_id} ends turn")));

        let combat = state.combat.as_mut().ok_or(TurnError::CombatNotStarted)?;
        let transition = TurnMachine::advance(combat)?;
        let next = transition.next;

        let player = Self::player_mut(state, &next)?;
        resources::begin_turn(player, self.rules);
        let draw = self.rules.turn_start_draw(player.hand.len());
        ZoneManager::new(state, self.registry, events).draw(&next, draw, rng)?;
        self.raise_hand_limit(state, &next, events);
        events.push(EngineEvent::log(format!("{next} draws {draw} (turn start)")));

        events.push(EngineEvent::TurnAdvanced(TurnAdvanced {
            next_player_id: next,
            round: transition.round,
        }));
        Ok(())
    }

    fn hand_swap<R: DeterministicRng>(
        &self,
        state: &mut SessionState,
        player_id: &PlayerId,
        rng: &mut R,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), Rejection> {
        Self::require_turn(state, player_id)?;
        let player = state
            .player(player_id)
            .ok_or_else(|| ZoneError::UnknownPlayer(player_id.clone()))?;
        if player.swapped_this_turn {
            return Err(TurnError::AlreadySwapped.into());
        }
        if player.hand.is_empty() {
            return Err(Rejection::rule("hand is empty"));
        }

        let keyword = &self.rules.immovable_keyword;
        let discard = player
            .hand
            .iter()
            .find(|id| {
                self.registry
                    .definition_of(state, id)
                    .map_or(true, |def| !def.has_keyword(keyword))
            })
            .cloned()
            .ok_or_else(|| Rejection::rule("no card in hand can be discarded"))?;

        let mut zones = ZoneManager::new(state, self.registry, events);
        zones.move_card(player_id, &discard, Zone::Hand, Zone::Grave)?;
        zones.draw(player_id, 1, rng)?;

        Self::player_mut(state, player_id)?.swapped_this_turn = true;
        self.raise_hand_limit(state, player_id, events);
        events.push(EngineEvent::log(format!("{player_id} hand swaps (discard 1, draw 1)")));
        Ok(())
    }

    fn play_card(
        &self,
        state: &mut SessionState,
        player_id: &PlayerId,
        card_id: &InstanceId,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), Rejection> {
        Self::require_turn(state, player_id)?;

        let card = state
            .card(card_id)
            .ok_or_else(|| ZoneError::UnknownInstance(card_id.clone()))?;
        if &card.owner_id != player_id {
            return Err(Rejection::rule("not your card"));
        }
        let from = card.zone;
        if from != Zone::Hand && from != Zone::Field {
            return Err(Rejection::rule(format!("card not in hand: {card_id}")));
        }
        let def = self.definition(state, card_id)?;
        let class = def.class();

        // `None` leaves the card where it is: an installed card activating, or a
        // search card waiting on its pick.
        let to = match (class, from) {
            (CardClass::Ex, _) => return Err(Rejection::rule("EX cards are used with USE_EX")),
            (CardClass::Install, Zone::Field) => None,
            (CardClass::Install, _) => Some(Zone::Field),
            (CardClass::Search, _) => {
                if state.player(player_id).is_some_and(|p| p.deck.is_empty()) {
                    return Err(Rejection::rule("deck is empty"));
                }
                None
            }
            (_, Zone::Field) => Some(Zone::Grave),
            _ => Some(def.resolve_to.unwrap_or(Zone::Grave)),
        };
        if to == Some(Zone::Field) {
            resources::check_field_capacity(Self::player_mut(state, player_id)?)?;
        }

        let player = Self::player_mut(state, player_id)?;
        resources::spend_ap(player, def.cost)?;
        player.cards_played_this_turn += 1;

        match to {
            Some(to) => {
                ZoneManager::new(state, self.registry, events).move_card(player_id, card_id, from, to)?;
            }
            None if class == CardClass::Search => self.open_search(state, player_id, card_id, events)?,
            None => {
                events.push(EngineEvent::log(format!("{player_id} activates {}", def.id)));
                return Ok(());
            }
        }

        events.push(EngineEvent::log(format!("{player_id} plays {}", def.id)));
        Ok(())
    }

    /// Candidates: deck cards at the preferred cost, else the top of the
    /// deck; at most `search_pool` either way.
    fn open_search(
        &self,
        state: &mut SessionState,
        player_id: &PlayerId,
        source: &InstanceId,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), Rejection> {
        let player = state
            .player(player_id)
            .ok_or_else(|| ZoneError::UnknownPlayer(player_id.clone()))?;

        let pool = self.rules.search_pool;
        let preferred: Vec<InstanceId> = player
            .deck
            .iter()
            .filter(|id| {
                self.registry
                    .definition_of(state, id)
                    .is_some_and(|def| def.cost == self.rules.search_preferred_cost)
            })
            .take(pool)
            .cloned()
            .collect();
        let candidates = if preferred.is_empty() {
            player.deck.iter().take(pool).cloned().collect()
        } else {
            preferred
        };

        let decision = PendingDecision::SearchPick {
            reason: "search".to_string(),
            pick_count: 1,
            candidates,
            source: Some(source.clone()),
        };
        events.push(EngineEvent::PendingDecisionSet(DecisionSet {
            player_id: player_id.clone(),
            decision_type: decision.kind().to_string(),
            reason: decision.reason().to_string(),
        }));
        Self::player_mut(state, player_id)?.pending_decision = Some(decision);
        Ok(())
    }

    fn search_pick<R: DeterministicRng>(
        &self,
        state: &mut SessionState,
        player_id: &PlayerId,
        pick_ids: &[InstanceId],
        rng: &mut R,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), Rejection> {
        let player = Self::player_mut(state, player_id)?;
        let source = match player.pending_decision.take() {
            Some(PendingDecision::SearchPick { source, .. }) => source,
            _ => return Err(Rejection::rule("no pending decision")),
        };

        let mut zones = ZoneManager::new(state, self.registry, events);
        for id in pick_ids {
            zones.move_card(player_id, id, Zone::Deck, Zone::Hand)?;
        }
        zones.shuffle_deck(player_id, rng)?;
        let played_from = source
            .as_ref()
            .and_then(|s| zones.state().card(s))
            .map(|card| card.zone)
            .filter(|zone| matches!(zone, Zone::Hand | Zone::Field));
        if let (Some(source), Some(from)) = (source, played_from) {
            zones.move_card(player_id, &source, from, Zone::Grave)?;
        }

        events.push(EngineEvent::PendingDecisionCleared(DecisionCleared {
            player_id: player_id.clone(),
            decision_type: crate::decision::SEARCH_PICK.to_string(),
        }));
        self.raise_hand_limit(state, player_id, events);
        Ok(())
    }

    fn use_ex(
        &self,
        state: &mut SessionState,
        player_id: &PlayerId,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), Rejection> {
        Self::require_turn(state, player_id)?;
        let ex_id = state
            .player(player_id)
            .and_then(|p| p.ex_card.clone())
            .ok_or_else(|| Rejection::rule("ex card not set"))?;
        let def = self.definition(state, &ex_id)?;

        let player = Self::player_mut(state, player_id)?;
        resources::check_ex_ready(player)?;
        resources::spend_ap(player, def.cost)?;
        resources::start_ex_cooldown(player, self.rules);

        self.raise_hand_limit(state, player_id, events);
        events.push(EngineEvent::log(format!(
            "{player_id} uses EX {} ({}) (cooldown {} turns)",
            def.id, def.name, self.rules.ex_cooldown_turns
        )));
        Ok(())
    }

    fn discard(
        &self,
        state: &mut SessionState,
        player_id: &PlayerId,
        discard_ids: &[InstanceId],
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), Rejection> {
        let mut zones = ZoneManager::new(state, self.registry, events);
        for id in discard_ids {
            zones.move_card(player_id, id, Zone::Hand, Zone::Grave)?;
        }

        let player = Self::player_mut(state, player_id)?;
        let cleared = player.pending_decision.take();
        events.push(EngineEvent::PendingDecisionCleared(DecisionCleared {
            player_id: player_id.clone(),
            decision_type: cleared.map_or_else(
                || crate::decision::DISCARD_TO_HAND_LIMIT.to_string(),
                |d| d.kind().to_string(),
            ),
        }));
        events.push(EngineEvent::log(format!(
            "{player_id} discards {} to hand limit",
            discard_ids.len()
        )));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::core::{CardDefId, GameRng};

    struct Table {
        state: SessionState,
        registry: CardRegistry,
        rules: RulesConfig,
        rng: GameRng,
    }

    impl Table {
        fn new(deck: &[&str]) -> Self {
            let registry = CardRegistry::demo_catalog();
            let rules = RulesConfig::default();
            let me = PlayerId::new("me");
            let mut state = SessionState::new("ABC123", 5);
            state.players.insert(me.clone(), PlayerState::new(me.clone(), &rules));
            let mut events = Vec::new();
            let mut zones = ZoneManager::new(&mut state, &registry, &mut events);
            for def in deck {
                zones.create_instance(&me, CardDefId::new(*def), Zone::Deck).unwrap();
            }
            zones
                .create_instance(&me, CardRegistry::demo_ex(), Zone::Ex)
                .unwrap();
            Self {
                state,
                registry,
                rules,
                rng: GameRng::new(9),
            }
        }

        fn run(&mut self, command: Command) -> Result<Vec<EngineEvent>, Rejection> {
            let mut events = Vec::new();
            LocalRules::new(&self.registry, &self.rules).apply(
                &mut self.state,
                &PlayerId::new("me"),
                &command,
                &mut self.rng,
                &mut events,
            )?;
            Ok(events)
        }

        fn me(&self) -> &PlayerState {
            self.state.player(&PlayerId::new("me")).unwrap()
        }
    }

    #[test]
    fn test_start_combat_deals_opening_hand() {
        let mut table = Table::new(&["C001"; 12]);
        let events = table.run(Command::StartCombat).unwrap();

        assert_eq!(table.me().hand.len(), 4);
        assert_eq!(table.me().deck.len(), 8);
        assert_eq!(table.me().ap, 3);
        let combat = table.state.combat.as_ref().unwrap();
        assert_eq!(combat.round, 1);
        assert_eq!(combat.initiatives.as_ref().unwrap().len(), 1);
        assert!(matches!(events.last(), Some(EngineEvent::TurnAdvanced(_))));

        assert_eq!(
            table.run(Command::StartCombat),
            Err(Rejection::Turn(TurnError::CombatAlreadyStarted))
        );
    }

    #[test]
    fn test_attack_goes_to_grave() {
        let mut table = Table::new(&["C001"; 12]);
        table.run(Command::StartCombat).unwrap();
        let card = table.me().hand[0].clone();

        table.run(Command::play(card.clone())).unwrap();
        assert_eq!(table.me().ap, 2);
        assert!(table.me().grave.contains(&card));
        assert_eq!(table.me().cards_played_this_turn, 1);
    }

    #[test]
    fn test_install_field_limit() {
        let mut table = Table::new(&["C006"; 12]);
        table.rules = RulesConfig::default().with_ap_per_turn(10);
        table.state.player_mut(&PlayerId::new("me")).unwrap().field_limit = 1;
        table.run(Command::StartCombat).unwrap();
        let a = table.me().hand[0].clone();
        let b = table.me().hand[1].clone();

        table.run(Command::play(a.clone())).unwrap();
        assert!(table.me().field.contains(&a));
        assert_eq!(
            table.run(Command::play(b)),
            Err(Rejection::Turn(TurnError::FieldFull { limit: 1 }))
        );

        // Activating an installed card does not move it.
        table.run(Command::play(a.clone())).unwrap();
        assert_eq!(table.me().field.len(), 1);
    }

    #[test]
    fn test_search_raises_decision() {
        // Opening hand is the top four: one search card and three Bash.
        let mut table = Table::new(&[
            "C005", "C008", "C008", "C008", "C008", "C008", "C008", "C008", "C001", "C005", "C002",
            "C008",
        ]);
        table.run(Command::StartCombat).unwrap();

        let search = table.me().hand[0].clone();
        assert_eq!(table.state.card(&search).unwrap().def_id.as_str(), "C005");
        table.run(Command::play(search.clone())).unwrap();

        let Some(PendingDecision::SearchPick { candidates, .. }) = &table.me().pending_decision else {
            panic!("expected search decision");
        };
        assert_eq!(candidates.len(), 3);
        assert!(candidates
            .iter()
            .all(|id| table.registry.definition_of(&table.state, id).unwrap().cost == 1));
        assert!(table.me().hand.contains(&search));

        let pick = candidates[0].clone();
        table.run(Command::pick(&[pick.clone()])).unwrap();
        assert!(table.me().hand.contains(&pick));
        assert!(table.me().grave.contains(&search));
        assert!(table.me().pending_decision.is_none());
    }

    #[test]
    fn test_use_ex_cooldown() {
        let mut table = Table::new(&["C001"; 12]);
        table.run(Command::StartCombat).unwrap();

        table.run(Command::UseEx { target_player_ids: Default::default() }).unwrap();
        assert_eq!(table.me().ap, 2);
        assert_eq!(table.me().ex_cooldown, 2);
        assert!(table
            .run(Command::UseEx { target_player_ids: Default::default() })
            .is_err());
    }

    #[test]
    fn test_hand_swap_once() {
        let mut table = Table::new(&["C001"; 12]);
        table.run(Command::StartCombat).unwrap();
        let first = table.me().hand[0].clone();

        table.run(Command::HandSwap).unwrap();
        assert_eq!(table.me().hand.len(), 4);
        assert!(table.me().grave.contains(&first));
        assert_eq!(
            table.run(Command::HandSwap),
            Err(Rejection::Turn(TurnError::AlreadySwapped))
        );
    }

    #[test]
    fn test_draw_raises_hand_limit() {
        let mut table = Table::new(&["C001"; 12]);
        table.run(Command::Draw { count: 7 }).unwrap();
        assert!(matches!(
            table.me().pending_decision,
            Some(PendingDecision::DiscardToHandLimit { limit: 6, .. })
        ));
        assert_eq!(
            table.run(Command::Draw { count: 0 }),
            Err(Rejection::rule("count must be positive"))
        );
    }

    #[test]
    fn test_resolve_to_override() {
        let mut table = Table::new(&["X001"; 6]);
        table.registry.insert(
            CardDefinition::new("X001", "Vanishing Step", 0)
                .with_type("ATTACK")
                .resolving_to(Zone::Excluded),
        );
        table.run(Command::StartCombat).unwrap();
        let card = table.me().hand[0].clone();

        table.run(Command::play(card.clone())).unwrap();
        assert!(table.me().excluded.contains(&card));
    }

    #[test]
    fn test_resolve_to_field_respects_limit() {
        let mut table = Table::new(&["X002"; 8]);
        table.registry.insert(
            CardDefinition::new("X002", "Lingering Blade", 0)
                .with_type("ATTACK")
                .resolving_to(Zone::Field),
        );
        table.state.player_mut(&PlayerId::new("me")).unwrap().field_limit = 1;
        table.run(Command::StartCombat).unwrap();
        let first = table.me().hand[0].clone();
        let second = table.me().hand[1].clone();

        table.run(Command::play(first.clone())).unwrap();
        assert!(table.me().field.contains(&first));
        assert_eq!(
            table.run(Command::play(second.clone())),
            Err(Rejection::Turn(TurnError::FieldFull { limit: 1 }))
        );
        assert!(table.me().hand.contains(&second));
        assert_eq!(table.me().field.len(), 1);
    }

    #[test]
    fn test_field_attack_goes_to_grave() {
        let mut table = Table::new(&["X003"; 8]);
        table.registry.insert(
            CardDefinition::new("X003", "Echo Strike", 1)
                .with_type("ATTACK")
                .resolving_to(Zone::Field),
        );
        table.run(Command::StartCombat).unwrap();
        let card = table.me().hand[0].clone();

        table.run(Command::play(card.clone())).unwrap();
        assert!(table.me().field.contains(&card));
        assert_eq!(table.me().ap, 2);

        let events = table.run(Command::play(card.clone())).unwrap();
        assert!(table.me().field.is_empty());
        assert!(table.me().grave.contains(&card));
        assert_eq!(table.me().ap, 1);
        assert!(events.contains(&EngineEvent::moved(&PlayerId::new("me"), Zone::Field, Zone::Grave, 1)));
    }
}
