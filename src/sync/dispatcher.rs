//! Command dispatch and snapshot reconciliation.
//!
//! ## Dispatcher
//!
//! Owns the single held `SessionState` and is the only thing that replaces
//! it. Every snapshot, whether from a command response, a join or a poll,
//! passes through the version guard in `apply_snapshot`:
//!
//! - no snapshot held, or a different session: adopt
//! - incoming `version` strictly greater than held: adopt
//! - otherwise: ignore (a late or duplicate response)
//!
//! ## Submit outcomes
//!
//! | Response | Held snapshot | Error state |
//! |---|---|---|
//! | accepted | guarded replace | cleared |
//! | rejected | guarded replace | cleared; reasons returned verbatim |
//! | no response | untouched | `last_error` set, `retryable` set |
//! | error status (403, 404, 5xx) | untouched | `last_error` set, not retryable |
//! | missing code / player | untouched, no call made | `last_error` set |
//!
//! Nothing is retried automatically. A failed request is handed back so the
//! caller can `resubmit` it with the same `commandId`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::poller::PollTimer;
use super::transport::{CreateSessionResponse, EngineResponse, Transport};
use crate::core::{ClientConfig, Command, CommandRequest, PlayerId, SessionState};
use crate::error::ApiError;
use crate::events::EngineEvent;

/// Wall clock in ms since the Unix epoch.
#[must_use]
pub fn system_now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Which session and player commands are issued for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBinding {
    /// Session join code.
    pub code: String,
    /// Acting player.
    pub player_id: PlayerId,
}

impl SessionBinding {
    /// Create a binding, trimming whitespace.
    #[must_use]
    pub fn new(code: impl Into<String>, player_id: impl Into<PlayerId>) -> Self {
        let code: String = code.into();
        let player_id: PlayerId = player_id.into();
        Self {
            code: code.trim().to_string(),
            player_id: PlayerId::new(player_id.as_str().trim()),
        }
    }
}

/// Held snapshot plus sync bookkeeping; persisted in the combat slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    /// Last adopted snapshot.
    #[serde(default)]
    pub state: Option<SessionState>,
    /// When it was adopted, ms since epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_at_ms: Option<u64>,
    /// Last transport or precondition error, rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// The last failure left a request that may be resubmitted.
    #[serde(default)]
    pub retryable: bool,
    /// Polling was active.
    #[serde(default)]
    pub polling: bool,
}

/// Result of offering a snapshot to the version guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adoption {
    /// The snapshot replaced the held one.
    Adopted {
        /// Version now held.
        version: u64,
    },
    /// The snapshot was not newer and was ignored.
    Stale {
        /// Version held.
        held: u64,
        /// Version offered.
        incoming: u64,
    },
}

impl Adoption {
    /// True when the snapshot was adopted.
    #[must_use]
    pub fn is_adopted(&self) -> bool {
        matches!(self, Adoption::Adopted { .. })
    }
}

/// Result of `submit`.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// The authority applied the command.
    Accepted {
        /// Events to translate.
        events: Vec<EngineEvent>,
        /// What the version guard did with the returned snapshot.
        adoption: Adoption,
    },
    /// The authority refused the command.
    Rejected {
        /// Reasons, verbatim.
        errors: Vec<String>,
        /// Events to translate (usually none).
        events: Vec<EngineEvent>,
        /// What the version guard did with the returned snapshot.
        adoption: Adoption,
    },
    /// No response arrived; `request` can be resubmitted as is.
    TransportFailed {
        /// The failure.
        error: ApiError,
        /// The exact request that was sent.
        request: CommandRequest,
    },
    /// The authority answered with an error status; resending will not help.
    Failed(ApiError),
    /// Missing session code or player id; nothing was sent.
    PreconditionFailed(String),
}

/// Submits commands and reconciles snapshots.
pub struct Dispatcher<T> {
    transport: T,
    binding: Option<SessionBinding>,
    sync: SyncState,
    poller: PollTimer,
    clock: fn() -> u64,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher with the default poll interval.
    pub fn new(transport: T) -> Self {
        Self::from_config(transport, &ClientConfig::default())
    }

    /// Create a dispatcher paced by `config`.
    pub fn from_config(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            binding: None,
            sync: SyncState::default(),
            poller: PollTimer::new(config.poll_interval()),
            clock: system_now_ms,
        }
    }

    /// Replace the wall clock (ms since epoch).
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    /// Set the poll interval. Takes effect on the next start.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poller = PollTimer::new(interval);
        self
    }

    /// Restore persisted sync state. Polling is not resumed.
    pub fn restore(&mut self, mut sync: SyncState) {
        sync.polling = false;
        self.sync = sync;
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Current binding.
    pub fn binding(&self) -> Option<&SessionBinding> {
        self.binding.as_ref()
    }

    /// Bind to a session and player.
    pub fn bind(&mut self, binding: SessionBinding) {
        self.binding = Some(binding);
    }

    /// Forget the binding and the held snapshot.
    pub fn unbind(&mut self) {
        self.binding = None;
        self.poller.stop();
        self.sync = SyncState::default();
    }

    /// Sync bookkeeping.
    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    /// Held snapshot.
    pub fn state(&self) -> Option<&SessionState> {
        self.sync.state.as_ref()
    }

    /// Version of the held snapshot.
    pub fn held_version(&self) -> Option<u64> {
        self.sync.state.as_ref().map(|s| s.version)
    }

    fn record_error(&mut self, error: &ApiError) {
        self.sync.last_error = Some(error.explain());
        self.sync.retryable = error.is_transport();
    }

    /// Offer a snapshot to the version guard.
    pub fn apply_snapshot(&mut self, incoming: SessionState) -> Adoption {
        if let Some(held) = &self.sync.state {
            let same_session = held.session_code == incoming.session_code;
            if same_session && incoming.version <= held.version {
                log::debug!(
                    target: "duel_tower::sync",
                    "ignoring stale snapshot v{} (holding v{})",
                    incoming.version,
                    held.version
                );
                return Adoption::Stale {
                    held: held.version,
                    incoming: incoming.version,
                };
            }
        }

        let version = incoming.version;
        self.sync.state = Some(incoming);
        self.sync.last_sync_at_ms = Some((self.clock)());
        Adoption::Adopted { version }
    }

    /// Create a session as game master and bind to it.
    pub fn create_session(&mut self, gm_id: &PlayerId) -> Result<CreateSessionResponse, ApiError> {
        match self.transport.create_session(gm_id) {
            Ok(response) => {
                self.sync = SyncState::default();
                self.bind(SessionBinding::new(response.code.clone(), gm_id.clone()));
                self.apply_snapshot(response.state.clone());
                Ok(response)
            }
            Err(error) => {
                self.record_error(&error);
                Err(error)
            }
        }
    }

    /// Join the bound session (if any) and adopt the resulting state.
    ///
    /// Returns false when unbound or when the call failed; failures are
    /// recorded in `last_error`.
    pub fn ensure_joined(&mut self) -> bool {
        let Some(binding) = self.usable_binding() else {
            return false;
        };
        match self.transport.join_session(&binding.code, &binding.player_id) {
            Ok(response) => {
                self.apply_snapshot(response.state);
                self.sync.last_error = None;
                self.sync.retryable = false;
                true
            }
            Err(error) => {
                log::warn!(target: "duel_tower::sync", "join failed: {}", error.explain());
                self.record_error(&error);
                false
            }
        }
    }

    /// Fetch the current state. Failures are swallowed into `last_error`.
    pub fn refresh(&mut self) -> Option<Adoption> {
        let code = self.binding.as_ref().map(|b| b.code.clone())?;
        if code.is_empty() {
            return None;
        }
        match self.transport.session_state(&code) {
            Ok(state) => {
                let adoption = self.apply_snapshot(state);
                self.sync.last_error = None;
                self.sync.retryable = false;
                Some(adoption)
            }
            Err(error) => {
                log::debug!(target: "duel_tower::sync", "refresh failed: {}", error.explain());
                self.record_error(&error);
                None
            }
        }
    }

    /// Start polling. No-op if already polling.
    pub fn start_polling(&mut self, now: Instant) -> bool {
        let started = self.poller.start(now);
        self.sync.polling = self.poller.is_active();
        started
    }

    /// Stop polling.
    pub fn stop_polling(&mut self) {
        self.poller.stop();
        self.sync.polling = false;
    }

    /// Drive polling: refresh if an interval has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<Adoption> {
        if self.poller.due(now) {
            self.refresh()
        } else {
            None
        }
    }

    fn usable_binding(&self) -> Option<SessionBinding> {
        self.binding
            .clone()
            .filter(|b| !b.code.is_empty() && !b.player_id.is_blank())
    }

    /// Stamp a command for the bound player: fresh `commandId`, held version.
    pub fn prepare(&self, command: Command) -> Result<CommandRequest, String> {
        self.prepare_as(None, command)
    }

    /// Stamp a command for `player` (defaults to the bound player).
    pub fn prepare_as(&self, player: Option<PlayerId>, command: Command) -> Result<CommandRequest, String> {
        let binding = self.binding.as_ref();
        let code = binding.map_or("", |b| b.code.as_str());
        if code.is_empty() {
            return Err("no session code; create or join a session first".to_string());
        }
        let player_id = player
            .filter(|p| !p.is_blank())
            .or_else(|| binding.map(|b| b.player_id.clone()))
            .filter(|p| !p.is_blank())
            .ok_or_else(|| "no player id; join the session first".to_string())?;

        let mut request = CommandRequest::new(player_id, command)
            .with_command_id(Uuid::new_v4().to_string());
        if let Some(version) = self.held_version() {
            request = request.with_expected_version(version);
        }
        Ok(request)
    }

    /// Submit a command for the bound player.
    pub fn submit(&mut self, command: Command) -> SubmitOutcome {
        self.submit_as(None, command)
    }

    /// Submit a command for `player` (defaults to the bound player).
    pub fn submit_as(&mut self, player: Option<PlayerId>, command: Command) -> SubmitOutcome {
        match self.prepare_as(player, command) {
            Ok(request) => self.resubmit(request),
            Err(reason) => self.not_sent(reason),
        }
    }

    fn not_sent(&mut self, reason: String) -> SubmitOutcome {
        log::warn!(target: "duel_tower::sync", "command not sent: {reason}");
        self.sync.last_error = Some(reason.clone());
        self.sync.retryable = false;
        SubmitOutcome::PreconditionFailed(reason)
    }

    /// Send an already stamped request unchanged (same `commandId`).
    pub fn resubmit(&mut self, request: CommandRequest) -> SubmitOutcome {
        let code = match self.usable_binding() {
            Some(binding) => binding.code,
            None => return self.not_sent("no session code; create or join a session first".to_string()),
        };

        match self.transport.send_command(&code, &request) {
            Ok(response) => self.reconcile(&request, response),
            Err(error) => {
                log::warn!(
                    target: "duel_tower::sync",
                    "{} failed in transit: {}",
                    request.command.kind(),
                    error.explain()
                );
                self.record_error(&error);
                if error.is_transport() {
                    SubmitOutcome::TransportFailed { error, request }
                } else {
                    SubmitOutcome::Failed(error)
                }
            }
        }
    }

    fn reconcile(&mut self, request: &CommandRequest, response: EngineResponse) -> SubmitOutcome {
        let EngineResponse {
            accepted,
            errors,
            events,
            state,
        } = response;

        let adoption = self.apply_snapshot(state);
        self.sync.last_error = None;
        self.sync.retryable = false;

        if accepted {
            log::debug!(target: "duel_tower::sync", "{} accepted", request.command.kind());
            SubmitOutcome::Accepted { events, adoption }
        } else {
            log::warn!(
                target: "duel_tower::sync",
                "{} rejected: {}",
                request.command.kind(),
                errors.join("; ")
            );
            SubmitOutcome::Rejected {
                errors,
                events,
                adoption,
            }
        }
    }
}
