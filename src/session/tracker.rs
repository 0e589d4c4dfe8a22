//! Download session state
//!
//! One `SessionTracker` instance lives inside the dispatcher and holds
//! everything a capture session knows about the host: whether capture is
//! running, which world is current, which container is open, and what the
//! player last interacted with. All mutation happens on the host's logic
//! thread, by the dispatcher and by the external start/stop/defer calls.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::host::{BlockPos, Container, Entity, World};

/// Lifecycle state of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No session; every capture hook is a no-op
    Inactive,
    /// Capturing host lifecycle events
    Active,
    /// A world swap arrived while loading was deferred; capture is paused
    /// until the deferral clears and the swap completes
    Suspended,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Inactive
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Inactive => write!(f, "Inactive"),
            SessionState::Active => write!(f, "Active"),
            SessionState::Suspended => write!(f, "Suspended"),
        }
    }
}

/// What the player last interacted with before a GUI opened
#[derive(Debug, Clone)]
pub enum InteractionTarget {
    /// A right-clicked entity
    Entity(Arc<Entity>),
    /// A clicked block position
    Block(BlockPos),
}

impl fmt::Display for InteractionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionTarget::Entity(entity) => write!(f, "entity {}", entity),
            InteractionTarget::Block(pos) => write!(f, "block {}", pos),
        }
    }
}

/// Tracks one download session's state
#[derive(Debug, Default)]
pub struct SessionTracker {
    state: SessionState,
    session_id: Option<Uuid>,
    started_at: Option<DateTime<Utc>>,
    world: Option<Arc<World>>,
    open_container: Option<Arc<Container>>,
    last_target: Option<InteractionTarget>,
    deferred: bool,
}

impl SessionTracker {
    /// Create an inactive tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if a session is actively capturing
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Start a session, assigning a fresh id and timestamp
    ///
    /// Starting over a live session restarts it: tracked handles are cleared
    /// and a new id is assigned.
    pub fn start(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        tracing::info!("[SessionTracker] Session {} started", id);

        self.state = SessionState::Active;
        self.session_id = Some(id);
        self.started_at = Some(Utc::now());
        self.world = None;
        self.open_container = None;
        self.last_target = None;
        id
    }

    /// Stop the session and reset to the inactive shape
    pub fn stop(&mut self) {
        if let Some(id) = self.session_id {
            tracing::info!("[SessionTracker] Session {} stopped", id);
        }
        *self = Self::default();
    }

    /// Id of the running session, if any
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// When the running session started
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    // === Deferral ===

    /// Set or clear the world-load deferral flag
    pub fn set_deferred(&mut self, deferred: bool) {
        self.deferred = deferred;
    }

    /// Whether world loading is currently deferred
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Pause capture because a world swap arrived while deferred
    pub fn suspend(&mut self) {
        if self.state == SessionState::Active {
            tracing::debug!("[SessionTracker] Session suspended pending world swap");
            self.state = SessionState::Suspended;
        }
    }

    // === World identity ===

    /// The tracked world handle
    pub fn world(&self) -> Option<&Arc<World>> {
        self.world.as_ref()
    }

    /// Check whether a handle is the tracked world (reference identity)
    pub fn world_matches(&self, world: &Arc<World>) -> bool {
        self.world
            .as_ref()
            .map(|tracked| Arc::ptr_eq(tracked, world))
            .unwrap_or(false)
    }

    /// Adopt a world handle as the current identity
    ///
    /// Completes a suspended swap: a `Suspended` session returns to `Active`.
    /// The tracked container and interaction target belong to the old world
    /// and are dropped.
    pub fn adopt_world(&mut self, world: &Arc<World>) {
        tracing::debug!("[SessionTracker] Adopted world '{}'", world.name());
        self.world = Some(Arc::clone(world));
        self.open_container = None;
        self.last_target = None;
        if self.state == SessionState::Suspended {
            self.state = SessionState::Active;
        }
    }

    // === Container tracking ===

    /// The container tracked as open
    pub fn open_container(&self) -> Option<&Arc<Container>> {
        self.open_container.as_ref()
    }

    /// Record the currently open container
    pub fn set_open_container(&mut self, container: Option<Arc<Container>>) {
        self.open_container = container;
    }

    // === Interaction target ===

    /// The last interaction target, if one was recorded
    pub fn last_target(&self) -> Option<&InteractionTarget> {
        self.last_target.as_ref()
    }

    /// Record an entity as the last interaction target
    pub fn set_last_entity(&mut self, entity: Arc<Entity>) {
        self.last_target = Some(InteractionTarget::Entity(entity));
    }

    /// Record a block position as the last interaction target
    pub fn set_last_block(&mut self, pos: BlockPos) {
        self.last_target = Some(InteractionTarget::Block(pos));
    }

    /// Forget the last interaction target
    pub fn clear_last_target(&mut self) {
        self.last_target = None;
    }

    /// Multi-line state summary for diagnostic reports
    pub fn debug_info(&self) -> String {
        let session = match self.session_id {
            Some(id) => id.to_string(),
            None => "-".to_string(),
        };
        let started = match self.started_at {
            Some(at) => at.to_rfc3339(),
            None => "-".to_string(),
        };
        let world = match &self.world {
            Some(world) => world.name().to_string(),
            None => "-".to_string(),
        };
        let container = match &self.open_container {
            Some(container) => container.name().to_string(),
            None => "-".to_string(),
        };
        let target = match &self.last_target {
            Some(target) => target.to_string(),
            None => "-".to_string(),
        };

        format!(
            "state: {}\nsession: {}\nstarted: {}\ndeferred: {}\nworld: {}\nopen container: {}\nlast target: {}",
            self.state, session, started, self.deferred, world, container, target,
        )
    }
}
