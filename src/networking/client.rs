use crate::core::session_store::SessionStore;
use crate::game::board::Destinations;
use crate::game::error::{ClientError, ClientResult};
use crate::game::resources::loading::{LoadingGate, LoadingGuard};
use crate::game::resources::selection::Origin;
use crate::game::session::{GameSession, SessionId};
use crate::game::types::Square;
use crate::networking::service::GameService;
use parking_lot::Mutex;
use shared::Operation;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Callback invoked with every failure reported at the session boundary
pub type ErrorCallback = Box<dyn Fn(&ClientError) + Send + Sync>;

/// Local view of the active game
#[derive(Debug, Default)]
struct SessionState {
    active: Option<SessionId>,
    current: Option<GameSession>,
    /// Version of the request whose result is currently shown
    applied_version: u64,
}

/// Client for one game on the rules collaborator.
///
/// Owns the active identifier and the last fetched [`GameSession`]. Every
/// mutating call is followed by a fresh fetch; the client never predicts a
/// board locally. Results are stamped with the version at which their request
/// was issued and a result older than the one on display is dropped, so the
/// last issued request wins regardless of completion order.
pub struct RemoteGameSession<S> {
    service: S,
    store: Arc<dyn SessionStore>,
    gate: LoadingGate,
    state: Mutex<SessionState>,
    versions: AtomicU64,
    on_error: Option<ErrorCallback>,
}

impl<S: GameService> RemoteGameSession<S> {
    pub fn new(service: S, store: Arc<dyn SessionStore>) -> Self {
        RemoteGameSession {
            service,
            store,
            gate: LoadingGate::new(),
            state: Mutex::new(SessionState::default()),
            versions: AtomicU64::new(0),
            on_error: None,
        }
    }

    /// Install a callback that sees every reported failure
    pub fn with_error_callback(
        mut self,
        callback: impl Fn(&ClientError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn gate(&self) -> &LoadingGate {
        &self.gate
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.state.lock().active.clone()
    }

    /// Snapshot of the last applied game
    pub fn current(&self) -> Option<GameSession> {
        self.state.lock().current.clone()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Make `id` the active game without fetching it.
    ///
    /// A different identifier drops the game on display.
    pub fn open(&self, id: SessionId) {
        let version = self.issue();
        self.activate(version, id);
    }

    /// Install a full game snapshot as the current state
    pub fn replace(&self, game: GameSession) {
        let version = self.issue();
        self.apply(version, game);
    }

    /// Forget the active game locally and in the store
    pub fn close(&self) {
        let version = self.issue();
        let previous = {
            let mut state = self.state.lock();
            state.current = None;
            state.applied_version = version;
            state.active.take()
        };
        if let Err(e) = self.store.clear() {
            warn!("[SESSION] Failed to clear stored session: {}", e);
        }
        if let Some(id) = previous {
            info!("[SESSION] Closed game {}", id);
        }
    }

    // ------------------------------------------------------------------
    // Remote operations
    // ------------------------------------------------------------------

    /// Discard the current game, start a new one and fetch it
    pub async fn create_game(&self) -> ClientResult<SessionId> {
        let guard = self.gate.hold(Operation::CreateGame);
        self.close();
        let version = self.issue();

        let result: ClientResult<SessionId> = async {
            let id = SessionId::from(self.service.create_game().await?);
            info!("[SESSION] Created game {}", id);
            if self.activate(version, id.clone()) {
                self.fetch_inner(&id, version).await?;
            }
            Ok(id)
        }
        .await;

        self.finish(guard, result)
    }

    /// Fetch the game named by the stored identifier, if there is one
    pub async fn resume(&self) -> ClientResult<Option<GameSession>> {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("[SESSION] Failed to load stored session: {}. Starting without one.", e);
                None
            }
        };
        let Some(id) = stored else {
            debug!("[SESSION] No stored game");
            return Ok(None);
        };
        self.fetch_by_id(&id).await.map(Some)
    }

    /// Fetch a game and show it.
    ///
    /// An unknown identifier yields [`ClientError::NotFound`] and leaves the
    /// local state as it was.
    pub async fn fetch_by_id(&self, id: &SessionId) -> ClientResult<GameSession> {
        let version = self.issue();
        let result = self.fetch_inner(id, version).await;
        self.reported(result)
    }

    /// Legal destinations for `origin` in the active game; read-only
    pub async fn query_legal_moves(&self, origin: Origin) -> ClientResult<Destinations> {
        let guard = self.gate.hold(Operation::ReadLegalMoves);
        let result: ClientResult<Destinations> = async {
            let id = self.require_active()?;
            let grid = self
                .service
                .read_legal_moves(id.as_str(), &origin.wire())
                .await?;
            let destinations = Destinations::from_wire(&grid)?;
            debug!(
                "[SESSION] {} has {} legal destinations",
                origin,
                destinations.count()
            );
            Ok(destinations)
        }
        .await;
        self.finish(guard, result)
    }

    /// Play a move, then re-fetch the game whatever the outcome
    pub async fn submit_move(&self, from: Origin, to: Square, promote: bool) -> ClientResult<()> {
        let id = self.reported(self.require_active())?;
        let version = self.issue();
        let guard = self.gate.hold(Operation::MakeMove);
        info!("[SESSION] Move {} -> {}{}", from, to, if promote { " (promote)" } else { "" });
        let submitted = self
            .service
            .make_move(id.as_str(), &from.wire(), &to.to_string(), promote)
            .await;
        let submitted = self.finish(guard, submitted);
        self.refetch_after(&id, version, submitted).await
    }

    /// Ask the collaborator to play, then re-fetch the game whatever the outcome
    pub async fn request_ai_move(&self) -> ClientResult<()> {
        let id = self.reported(self.require_active())?;
        let version = self.issue();
        let guard = self.gate.hold(Operation::AiMove);
        info!("[SESSION] Requesting engine move for {}", id);
        let submitted = self.service.ai_move(id.as_str()).await;
        let submitted = self.finish(guard, submitted);
        self.refetch_after(&id, version, submitted).await
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn issue(&self) -> u64 {
        self.versions.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn require_active(&self) -> ClientResult<SessionId> {
        self.active_id().ok_or(ClientError::NoActiveSession)
    }

    /// Exactly one fetch after a mutating call; the call's own error wins.
    ///
    /// `version` is stamped before the call went out, so anything issued
    /// while it was in flight (a new game, another fetch) outranks it.
    async fn refetch_after(
        &self,
        id: &SessionId,
        version: u64,
        submitted: ClientResult<()>,
    ) -> ClientResult<()> {
        let refetched = self.fetch_inner(id, version).await;
        let refetched = self.reported(refetched).map(|_| ());
        submitted.and(refetched)
    }

    async fn fetch_inner(&self, id: &SessionId, version: u64) -> ClientResult<GameSession> {
        let guard = self.gate.hold(Operation::ReadGame);
        let record = self
            .service
            .fetch_game(id.as_str())
            .await?
            .ok_or_else(|| ClientError::NotFound {
                uid: id.to_string(),
            })?;
        let game = GameSession::from_record(record)?;
        self.apply(version, game.clone());
        guard.succeed();
        Ok(game)
    }

    /// Make `id` active unless a newer request has already been applied
    fn activate(&self, version: u64, id: SessionId) -> bool {
        {
            let mut state = self.state.lock();
            if version < state.applied_version {
                debug!(
                    "[SESSION] Not opening {} (version {} < {})",
                    id, version, state.applied_version
                );
                return false;
            }
            if state.active.as_ref() != Some(&id) {
                state.current = None;
            }
            state.active = Some(id.clone());
            state.applied_version = version;
        }
        self.persist(&id);
        info!("[SESSION] Opened game {}", id);
        true
    }

    /// Show `game` unless a newer request has already been applied
    fn apply(&self, version: u64, game: GameSession) -> bool {
        let mut state = self.state.lock();
        if version < state.applied_version {
            debug!(
                "[SESSION] Dropping stale snapshot of {} (version {} < {})",
                game.id, version, state.applied_version
            );
            return false;
        }
        let id = game.id.clone();
        let changed_game = state.active.as_ref() != Some(&id);
        state.active = Some(id.clone());
        state.current = Some(game);
        state.applied_version = version;
        drop(state);

        if changed_game {
            self.persist(&id);
        }
        true
    }

    fn persist(&self, id: &SessionId) {
        if let Err(e) = self.store.save(id) {
            warn!("[SESSION] Failed to persist session {}: {}", id, e);
        }
    }

    /// Settle the gate for `result` and report any failure
    fn finish<T>(&self, guard: LoadingGuard, result: ClientResult<T>) -> ClientResult<T> {
        match result {
            Ok(value) => {
                guard.succeed();
                Ok(value)
            }
            Err(e) => {
                drop(guard);
                Err(self.report(e))
            }
        }
    }

    fn reported<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        result.map_err(|e| self.report(e))
    }

    fn report(&self, e: ClientError) -> ClientError {
        if e.is_contract_violation() {
            error!("[SESSION] Contract violation: {}", e);
        } else {
            warn!("[SESSION] {}", e);
        }
        if let Some(callback) = &self.on_error {
            callback(&e);
        }
        e
    }
}
