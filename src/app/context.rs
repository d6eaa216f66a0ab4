//! Application context: the one owner of all client state.
//!
//! ## AppContext
//!
//! Holds the dispatcher (and through it the held snapshot), the log book,
//! the card catalog, the run map and the session metadata, plus the store
//! they are persisted to. Every operation that changes a slot writes it back
//! before returning; a failed write is logged and otherwise ignored.
//!
//! Startup reads all four slots. Anything absent or unreadable falls back to
//! its default, so a corrupt store never prevents the client from starting.

use std::time::Instant;

use super::content::{ContentState, ContentStatus};
use super::run::{RunNode, RunState};
use super::session::{LocalSession, SessionPhase};
use crate::cards::CardRegistry;
use crate::core::{ClientConfig, Command, CommandRequest, PlayerId, RulesConfig, SessionState};
use crate::decision::DecisionGate;
use crate::error::ApiError;
use crate::events::{translate, LogBook, LogSnapshot};
use crate::persist::{load_or_default, save, try_load, KeyValueStore, Slot};
use crate::sync::{system_now_ms, Adoption, Dispatcher, SessionBinding, SubmitOutcome, SyncState, Transport};

/// Owned client state over a transport `T` and a store `S`.
pub struct AppContext<T, S> {
    dispatcher: Dispatcher<T>,
    log: LogBook,
    content: ContentState,
    run: RunState,
    session: LocalSession,
    store: S,
    rules: RulesConfig,
    clock: fn() -> u64,
}

impl<T: Transport, S: KeyValueStore> AppContext<T, S> {
    /// Restore a context from `store` using the wall clock.
    pub fn new(transport: T, store: S, config: &ClientConfig) -> Self {
        Self::with_clock(transport, store, config, system_now_ms)
    }

    /// Restore a context from `store` with an injected clock.
    pub fn with_clock(transport: T, store: S, config: &ClientConfig, clock: fn() -> u64) -> Self {
        let mut dispatcher = Dispatcher::from_config(transport, config).with_clock(clock);

        let mut log = LogBook::from_config(config);
        if let Some(snapshot) = try_load::<LogSnapshot>(&store, Slot::Log) {
            log.restore(snapshot);
        }

        let session: LocalSession = load_or_default(&store, Slot::Session);
        let mut run = try_load::<RunState>(&store, Slot::Run).unwrap_or_else(|| RunState::new(clock()));
        run.ensure_choices();

        dispatcher.restore(load_or_default::<SyncState>(&store, Slot::Combat));
        if session.has_code() {
            dispatcher.bind(SessionBinding::new(session.code.clone(), session.me.clone()));
        }

        Self {
            dispatcher,
            log,
            content: ContentState::default(),
            run,
            session,
            store,
            rules: RulesConfig::default(),
            clock,
        }
    }

    /// Use `rules` for local decision checks.
    #[must_use]
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Seed the card catalog, e.g. with the demo cards when offline.
    #[must_use]
    pub fn with_content(mut self, registry: CardRegistry) -> Self {
        self.content = ContentState::with_registry(registry);
        self
    }

    /// The dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// The dispatcher, mutably.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<T> {
        &mut self.dispatcher
    }

    /// Held snapshot.
    pub fn state(&self) -> Option<&SessionState> {
        self.dispatcher.state()
    }

    /// The log book.
    pub fn log(&self) -> &LogBook {
        &self.log
    }

    /// Card catalog.
    pub fn content(&self) -> &ContentState {
        &self.content
    }

    /// Run map.
    pub fn run(&self) -> &RunState {
        &self.run
    }

    /// Session metadata.
    pub fn session(&self) -> &LocalSession {
        &self.session
    }

    /// Rules used for local checks.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a session as `gm` (blank keeps the current GM name) and bind to it.
    pub fn create_session(&mut self, gm: &str) -> Result<String, ApiError> {
        let gm = gm.trim();
        let gm_id = if gm.is_empty() {
            self.session.gm.clone()
        } else {
            PlayerId::new(gm)
        };
        let now = (self.clock)();

        let result = self.dispatcher.create_session(&gm_id);
        let out = match result {
            Ok(response) => {
                self.session = LocalSession::created(response.code.clone(), response.gm_id, now);
                self.log.info("Session created", format!("code {}", response.code), now);
                Ok(response.code)
            }
            Err(error) => {
                self.log.error("Create session failed", error.explain(), now);
                Err(error)
            }
        };
        self.persist(&Slot::ALL);
        out
    }

    /// Join `code` as `player`. Returns true once the session state is held.
    pub fn join(&mut self, code: &str, player: &str) -> bool {
        let now = (self.clock)();
        let me = PlayerId::new(player.trim());
        if code.trim().is_empty() || me.is_blank() {
            self.log.warn("Join", "session code and player id are required", now);
            self.persist(&[Slot::Log]);
            return false;
        }

        self.session.joined(code, me.clone());
        self.dispatcher.bind(SessionBinding::new(self.session.code.clone(), me));
        let joined = self.dispatcher.ensure_joined();
        if joined {
            self.log.info("Joined", format!("session {}", self.session.code), now);
        } else {
            let reason = self.dispatcher.sync_state().last_error.clone().unwrap_or_default();
            self.log.error("Join failed", reason, now);
        }
        self.persist(&Slot::ALL);
        joined
    }

    /// Leave the session and forget its state.
    pub fn leave(&mut self) {
        self.dispatcher.unbind();
        let gm = self.session.gm.clone();
        self.session = LocalSession {
            gm,
            ..LocalSession::default()
        };
        self.persist(&[Slot::Session, Slot::Combat]);
    }

    /// Fetch the authority's current state once.
    pub fn refresh(&mut self) -> Option<Adoption> {
        let adoption = self.dispatcher.refresh();
        self.persist(&[Slot::Combat]);
        adoption
    }

    /// Start polling.
    pub fn start_polling(&mut self, now: Instant) -> bool {
        let started = self.dispatcher.start_polling(now);
        self.persist(&[Slot::Combat]);
        started
    }

    /// Stop polling.
    pub fn stop_polling(&mut self) {
        self.dispatcher.stop_polling();
        self.persist(&[Slot::Combat]);
    }

    /// Drive polling and expire notifications.
    pub fn tick(&mut self, now: Instant) -> Option<Adoption> {
        let expired = self.log.expire((self.clock)());
        let adoption = self.dispatcher.tick(now);
        if adoption.is_some() {
            self.persist(&[Slot::Combat]);
        }
        if expired > 0 {
            self.persist(&[Slot::Log]);
        }
        adoption
    }

    /// Check `command` against the pending decision in the held snapshot.
    pub fn gate_check(&self, command: &Command) -> Result<(), Vec<String>> {
        let Some(state) = self.dispatcher.state() else {
            return Err(vec!["no session state".to_string()]);
        };
        DecisionGate::new(self.content.registry(), &self.rules).check(state, &self.session.me, command)
    }

    /// Submit a command for this client's player and log the outcome.
    pub fn submit(&mut self, command: Command) -> SubmitOutcome {
        let starts_combat = matches!(command, Command::StartCombat);
        let outcome = self.dispatcher.submit(command);
        self.record(&outcome);
        if starts_combat && matches!(outcome, SubmitOutcome::Accepted { .. }) {
            self.session.phase = SessionPhase::Combat;
            self.persist(&[Slot::Session]);
        }
        outcome
    }

    /// Resend a request that failed in transit, keeping its `commandId`.
    pub fn resubmit(&mut self, request: CommandRequest) -> SubmitOutcome {
        let outcome = self.dispatcher.resubmit(request);
        self.record(&outcome);
        outcome
    }

    fn record(&mut self, outcome: &SubmitOutcome) {
        let now = (self.clock)();
        match outcome {
            SubmitOutcome::Accepted { events, .. } => {
                self.log.append_block(translate(events), now);
            }
            SubmitOutcome::Rejected { errors, events, .. } => {
                self.log.append_block(translate(events), now);
                self.log.error("Rejected", errors.join("; "), now);
            }
            SubmitOutcome::TransportFailed { error, .. } | SubmitOutcome::Failed(error) => {
                self.log.error("Request failed", error.explain(), now);
            }
            SubmitOutcome::PreconditionFailed(reason) => {
                self.log.warn("Not sent", reason.clone(), now);
            }
        }
        self.persist(&[Slot::Combat, Slot::Log]);
    }

    /// Load the card catalog from the transport.
    pub fn load_content(&mut self) -> ContentStatus {
        let now = (self.clock)();
        let status = self.content.load(self.dispatcher.transport_mut(), now);
        if let Some(reason) = self.content.last_error() {
            let reason = reason.to_string();
            self.log.error("Card load failed", reason, now);
            self.persist(&[Slot::Log]);
        }
        status
    }

    /// Take run choice `index`.
    pub fn pick_node(&mut self, index: usize) -> Option<RunNode> {
        let node = self.run.pick(index)?;
        self.session.phase = SessionPhase::Node;
        self.log.info(
            format!("Floor {}", node.floor),
            node.title.clone(),
            (self.clock)(),
        );
        self.persist(&[Slot::Run, Slot::Session, Slot::Log]);
        Some(node)
    }

    /// Start a new run with `seed`.
    pub fn reset_run(&mut self, seed: u64) {
        self.run = RunState::new(seed);
        self.persist(&[Slot::Run]);
    }

    fn persist(&mut self, slots: &[Slot]) {
        for &slot in slots {
            let result = match slot {
                Slot::Session => save(&mut self.store, slot, &self.session),
                Slot::Run => save(&mut self.store, slot, &self.run),
                Slot::Combat => save(&mut self.store, slot, self.dispatcher.sync_state()),
                Slot::Log => save(&mut self.store, slot, &self.log.snapshot()),
            };
            if let Err(err) = result {
                log::warn!(target: "duel_tower::persist", "{}: write failed: {err}", slot.key());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalEngine;
    use crate::persist::MemoryStore;

    fn fixed_clock() -> u64 {
        1_000
    }

    fn context() -> AppContext<LocalEngine, MemoryStore> {
        AppContext::with_clock(
            LocalEngine::demo(11),
            MemoryStore::new(),
            &ClientConfig::default(),
            fixed_clock,
        )
        .with_content(CardRegistry::demo_catalog())
    }

    #[test]
    fn test_create_binds_and_persists() {
        let mut ctx = context();
        let code = ctx.create_session("gm").unwrap();

        assert_eq!(ctx.session().code, code);
        assert_eq!(ctx.state().map(|s| s.version), Some(0));
        assert!(ctx.store().get(Slot::Session.key()).unwrap().is_some());
        assert!(ctx.store().get(Slot::Combat.key()).unwrap().is_some());
    }

    #[test]
    fn test_submit_without_session_is_not_sent() {
        let mut ctx = context();
        let outcome = ctx.submit(Command::EndTurn);

        assert!(matches!(outcome, SubmitOutcome::PreconditionFailed(_)));
        assert_eq!(ctx.log().entries().next().map(|e| e.title.as_str()), Some("Not sent"));
    }

    #[test]
    fn test_start_combat_moves_to_combat_phase() {
        let mut ctx = context();
        ctx.create_session("gm").unwrap();
        let code = ctx.session().code.clone();
        assert!(ctx.join(&code, "gm"));

        let outcome = ctx.submit(Command::StartCombat);
        assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
        assert_eq!(ctx.session().phase, SessionPhase::Combat);
        assert!(ctx.gate_check(&Command::EndTurn).is_ok());
    }

    #[test]
    fn test_pick_node_logs_floor() {
        let mut ctx = context();
        ctx.reset_run(5);
        let node = ctx.pick_node(0).unwrap();

        assert_eq!(node.floor, 1);
        assert_eq!(ctx.run().floor, 2);
        assert_eq!(ctx.log().entries().next().map(|e| e.title.as_str()), Some("Floor 1"));
        assert!(ctx.pick_node(7).is_none());
    }
}
