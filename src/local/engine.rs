//! Offline session authority.
//!
//! `LocalEngine` hosts any number of sessions in memory and speaks the same
//! `Transport` contract as the remote authority, so the dispatcher cannot
//! tell the two apart.
//!
//! ## Command processing
//!
//! 1. A `commandId` already accepted in this session is rejected
//!    (`duplicate command`) with the state unchanged.
//! 2. An `expectedVersion` that differs from the current version is
//!    rejected (`version mismatch`).
//! 3. The decision gate runs.
//! 4. The command is applied to a clone of the state with an RNG keyed by
//!    `(seed, version)`. On success the clone is committed with the version
//!    bumped; on failure it is dropped.
//!
//! Because the state uses `im` collections the clone is O(1) and only the
//! touched paths are copied.

use rand::RngCore;
use rustc_hash::{FxHashMap, FxHashSet};

use super::rules::LocalRules;
use crate::cards::{CardDefinition, CardRegistry};
use crate::core::{
    CardDefId, Command, CommandRequest, DeterministicRng, GameRng, PlayerId, PlayerState,
    RulesConfig, SessionState,
};
use crate::decision::DecisionGate;
use crate::error::ApiError;
use crate::events::EngineEvent;
use crate::sync::{CreateSessionResponse, EngineResponse, JoinSessionResponse, Transport};
use crate::zones::{Zone, ZoneError, ZoneManager};

/// Alphabet for join codes; no 0/O, 1/I/L.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Join code length.
pub const CODE_LEN: usize = 6;

/// Game master id used when none is supplied.
pub const DEFAULT_GM: &str = "gm";

struct HostedSession {
    state: SessionState,
    gm_id: PlayerId,
    processed: FxHashSet<String>,
}

/// In-memory authority running the offline rules.
pub struct LocalEngine {
    registry: CardRegistry,
    rules: RulesConfig,
    sessions: FxHashMap<String, HostedSession>,
    starter_deck: Vec<CardDefId>,
    starter_ex: Option<CardDefId>,
    rng: GameRng,
}

impl LocalEngine {
    /// Create an engine over the given content. `seed` drives join codes
    /// and session seeds.
    #[must_use]
    pub fn new(registry: CardRegistry, rules: RulesConfig, seed: u64) -> Self {
        Self {
            registry,
            rules,
            sessions: FxHashMap::default(),
            starter_deck: CardRegistry::demo_deck(),
            starter_ex: Some(CardRegistry::demo_ex()),
            rng: GameRng::new(seed),
        }
    }

    /// Engine over the built-in demo catalog and default rules.
    #[must_use]
    pub fn demo(seed: u64) -> Self {
        Self::new(CardRegistry::demo_catalog(), RulesConfig::default(), seed)
    }

    /// Set the deck and EX card handed to joining players.
    #[must_use]
    pub fn with_starter(mut self, deck: Vec<CardDefId>, ex: Option<CardDefId>) -> Self {
        self.starter_deck = deck;
        self.starter_ex = ex;
        self
    }

    /// Card pool.
    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// Rule numbers.
    #[must_use]
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Current state of a session.
    #[must_use]
    pub fn session(&self, code: &str) -> Option<&SessionState> {
        self.sessions.get(code).map(|s| &s.state)
    }

    /// Number of hosted sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn hosted(&mut self, code: &str) -> Result<&mut HostedSession, ApiError> {
        self.sessions
            .get_mut(code)
            .ok_or_else(|| not_found("session not found"))
    }

    fn unique_code(&mut self) -> String {
        loop {
            let code: String = (0..CODE_LEN)
                .map(|_| char::from(CODE_ALPHABET[self.rng.below(CODE_ALPHABET.len())]))
                .collect();
            if !self.sessions.contains_key(&code) {
                return code;
            }
        }
    }

    /// Open a new session with no players.
    pub fn create(&mut self, gm_id: &PlayerId) -> CreateSessionResponse {
        let gm_id = if gm_id.is_blank() {
            PlayerId::new(DEFAULT_GM)
        } else {
            PlayerId::new(gm_id.as_str().trim())
        };
        let code = self.unique_code();
        let seed = self.rng.next_u64() as i64;

        let mut state = SessionState::new(code.clone(), seed);
        state.session_id = format!("local-{code}");

        log::debug!(target: "duel_tower::local", "session {code} created by {gm_id}");
        self.sessions.insert(
            code.clone(),
            HostedSession {
                state: state.clone(),
                gm_id: gm_id.clone(),
                processed: FxHashSet::default(),
            },
        );
        CreateSessionResponse { code, gm_id, state }
    }

    /// Seat `player_id` with the starter deck and EX card, shuffling the
    /// deck with the player's own stream. Joining twice is a no-op.
    pub fn join(&mut self, code: &str, player_id: &PlayerId) -> Result<SessionState, ApiError> {
        if player_id.is_blank() {
            return Err(ApiError::status(
                400,
                Some(serde_json::json!({"message": "playerId is required"})),
            ));
        }
        let player_id = PlayerId::new(player_id.as_str().trim());
        let deck = self.starter_deck.clone();
        let ex = self.starter_ex.clone();
        let rules = &self.rules;
        let hosted = self
            .sessions
            .get_mut(code)
            .ok_or_else(|| not_found("session not found"))?;

        if hosted.state.player(&player_id).is_some() {
            return Ok(hosted.state.clone());
        }

        let mut next = hosted.state.clone();
        next.players
            .insert(player_id.clone(), PlayerState::new(player_id.clone(), rules));

        let mut events = Vec::new();
        seat_player(&mut next, &self.registry, &player_id, &deck, ex.as_ref(), &mut events).map_err(
            |err| ApiError::status(500, Some(serde_json::json!({"message": err.to_string()}))),
        )?;

        next.version += 1;
        log::debug!(target: "duel_tower::local", "{player_id} joined {code}");
        hosted.state = next;
        Ok(hosted.state.clone())
    }

    /// Run one command through the duplicate, version and decision checks
    /// and apply it transactionally.
    pub fn process(&mut self, code: &str, request: &CommandRequest) -> Result<EngineResponse, ApiError> {
        let registry = &self.registry;
        let rules = &self.rules;
        let hosted = self
            .sessions
            .get_mut(code)
            .ok_or_else(|| not_found("session not found"))?;

        if matches!(request.command, Command::StartCombat) && request.player_id != hosted.gm_id {
            return Err(ApiError::status(403, Some(serde_json::json!({"message": "gm only"}))));
        }

        let reject = |state: &SessionState, errors: Vec<String>| {
            log::warn!(
                target: "duel_tower::local",
                "{} from {} rejected: {}",
                request.command.kind(),
                request.player_id,
                errors.join("; ")
            );
            EngineResponse::rejected(state.clone(), errors)
        };

        if let Some(id) = &request.command_id {
            if hosted.processed.contains(id) {
                return Ok(reject(&hosted.state, vec!["duplicate command".to_string()]));
            }
        }
        if let Some(expected) = request.expected_version {
            if expected != hosted.state.version {
                return Ok(reject(&hosted.state, vec!["version mismatch".to_string()]));
            }
        }
        if let Err(errors) =
            DecisionGate::new(registry, rules).check(&hosted.state, &request.player_id, &request.command)
        {
            return Ok(reject(&hosted.state, errors));
        }

        let mut next = hosted.state.clone();
        let mut rng = GameRng::for_action(next.rng_seed(), next.version);
        let mut events: Vec<EngineEvent> = Vec::new();
        let applied = LocalRules::new(registry, rules).apply(
            &mut next,
            &request.player_id,
            &request.command,
            &mut rng,
            &mut events,
        );
        if let Err(rejection) = applied {
            return Ok(reject(&hosted.state, vec![rejection.to_string()]));
        }

        next.version += 1;
        if let Some(id) = &request.command_id {
            hosted.processed.insert(id.clone());
        }
        log::debug!(
            target: "duel_tower::local",
            "{} from {} applied, now v{}",
            request.command.kind(),
            request.player_id,
            next.version
        );
        hosted.state = next;
        Ok(EngineResponse::accepted(hosted.state.clone(), events))
    }
}

fn seat_player(
    state: &mut SessionState,
    registry: &CardRegistry,
    player_id: &PlayerId,
    deck: &[CardDefId],
    ex: Option<&CardDefId>,
    events: &mut Vec<EngineEvent>,
) -> Result<(), ZoneError> {
    let mut zones = ZoneManager::new(state, registry, events);
    for def in deck {
        zones.create_instance(player_id, def.clone(), Zone::Deck)?;
    }
    if let Some(ex) = ex {
        zones.create_instance(player_id, ex.clone(), Zone::Ex)?;
    }
    let mut rng = GameRng::for_player(zones.state().rng_seed(), player_id.as_str());
    zones.shuffle_deck(player_id, &mut rng)
}

fn not_found(message: &str) -> ApiError {
    ApiError::status(404, Some(serde_json::json!({ "message": message })))
}

impl Transport for LocalEngine {
    fn create_session(&mut self, gm_id: &PlayerId) -> Result<CreateSessionResponse, ApiError> {
        Ok(self.create(gm_id))
    }

    fn session_state(&mut self, code: &str) -> Result<SessionState, ApiError> {
        Ok(self.hosted(code)?.state.clone())
    }

    fn join_session(&mut self, code: &str, player_id: &PlayerId) -> Result<JoinSessionResponse, ApiError> {
        Ok(JoinSessionResponse {
            state: self.join(code, player_id)?,
        })
    }

    fn send_command(&mut self, code: &str, request: &CommandRequest) -> Result<EngineResponse, ApiError> {
        self.process(code, request)
    }

    fn card_definitions(&mut self) -> Result<Vec<CardDefinition>, ApiError> {
        Ok(self.registry.iter().cloned().collect())
    }
}
