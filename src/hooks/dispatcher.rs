//! Hook Dispatcher
//!
//! The host calls one entry point here per lifecycle event. For each event
//! the dispatcher:
//! 1. drops the call when it arrives off the logic thread or outside an
//!    active session,
//! 2. runs the built-in capture logic (the [`CaptureSink`]),
//! 3. walks the listener chain registered for the event's capability,
//! 4. updates the session tracker.
//!
//! Any fault escaping a hook body - a returned error or a panic - is
//! converted into a [`CrashReport`] and handed to the [`FatalSink`]: the
//! session ends rather than continuing with inconsistent state. Everything
//! else (unclaimed GUI closes, unavailable modes) stays a warning.
//!
//! # Example
//!
//! ```ignore
//! let engine = CaptureEngine::new(policy);
//! let mut dispatcher = HookDispatcher::new(engine, Box::new(player));
//!
//! dispatcher.listeners_mut().register_chat("coord-logger", Arc::new(logger))?;
//! dispatcher.session_mut().start();
//!
//! // Wired into the host's event handling:
//! dispatcher.on_tick(&world);
//! dispatcher.on_chat_received("<admin> hello");
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crate::capture::CaptureSink;
use crate::core::CaptureResult;
use crate::diagnostics::{CrashReport, DiagnosticReport, FatalSink, LogFatalSink};
use crate::host::{BlockId, BlockPos, Container, MapData, PlayerView, World};
use crate::session::{InteractionTarget, SessionState, SessionTracker};

use super::registry::ListenerRegistry;
use super::trace::{core_span, hook_span, listener_span};

/// Title of the diagnostic section this add-on contributes
const REPORT_SECTION: &str = "World Capture Add-on";

/// Routes host lifecycle events to built-in capture and extensions
pub struct HookDispatcher<S: CaptureSink> {
    session: SessionTracker,
    listeners: ListenerRegistry,
    sink: S,
    player: Box<dyn PlayerView>,
    fatal: Box<dyn FatalSink>,
    logic_thread: ThreadId,
}

impl<S: CaptureSink> HookDispatcher<S> {
    /// Create a dispatcher on the host's logic thread
    ///
    /// The constructing thread is recorded as the logic thread; capture
    /// hooks invoked from any other thread are dropped, not queued.
    pub fn new(sink: S, player: Box<dyn PlayerView>) -> Self {
        Self {
            session: SessionTracker::new(),
            listeners: ListenerRegistry::new(),
            sink,
            player,
            fatal: Box::new(LogFatalSink),
            logic_thread: thread::current().id(),
        }
    }

    /// Replace the fatal-error path (defaults to logging)
    pub fn with_fatal_sink(mut self, fatal: Box<dyn FatalSink>) -> Self {
        self.fatal = fatal;
        self
    }

    /// The session tracker
    pub fn session(&self) -> &SessionTracker {
        &self.session
    }

    /// Mutable session access for the external start/stop/defer collaborators
    pub fn session_mut(&mut self) -> &mut SessionTracker {
        &mut self.session
    }

    /// The listener registry
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Mutable registry access for extension load time
    pub fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    /// The built-in capture sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable sink access (operator configuration surfaces)
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // === Hook entry points ===

    /// Called once per host logic tick
    ///
    /// Detects world swaps (identity change of `world`) and, while the same
    /// world stays current, container transitions against the player's
    /// currently open container.
    pub fn on_tick(&mut self, world: &Arc<World>) {
        if self.session.state() == SessionState::Inactive {
            return;
        }
        self.guarded("tick", |d| d.tick_body(world));
    }

    /// Called before the host drops or loads a chunk
    pub fn on_pre_chunk_unload(
        &mut self,
        world: &Arc<World>,
        chunk_x: i32,
        chunk_z: i32,
        loading: bool,
    ) {
        if self.dropped_off_thread("chunk_unload") || !self.session.is_active() {
            return;
        }
        if loading {
            return;
        }
        self.guarded("chunk_unload", |d| {
            let _hook = hook_span("chunk_unload").entered();
            let _section = core_span("chunk_no_longer_needed").entered();
            d.sink.on_chunk_no_longer_needed(world, chunk_x, chunk_z)
        });
    }

    /// Called when the host removes an entity from the world
    pub fn on_entity_removed(&mut self, world: &Arc<World>, entity_id: i32) {
        if self.dropped_off_thread("entity_removed") || !self.session.is_active() {
            return;
        }
        self.guarded("entity_removed", |d| {
            let _hook = hook_span("entity_removed").entered();
            let entity = world.entity_by_id(entity_id).cloned();
            let _section = core_span("entity_removed").entered();
            d.sink.on_entity_removed(entity.as_ref())
        });
    }

    /// Called when a chat line is delivered
    pub fn on_chat_received(&mut self, text: &str) {
        if self.dropped_off_thread("chat") || !self.session.is_active() {
            return;
        }
        self.guarded("chat", |d| d.chat_body(text));
    }

    /// Called when map-item data arrives
    pub fn on_map_data_received(&mut self, map_id: i32, data: &MapData) {
        if self.dropped_off_thread("map_data") || !self.session.is_active() {
            return;
        }
        self.guarded("map_data", |d| {
            let _hook = hook_span("map_data").entered();
            let _section = core_span("map_data").entered();
            d.sink.on_map_data(map_id, data)
        });
    }

    /// Called when a side-channel payload arrives
    pub fn on_side_payload_received(&mut self, channel: &str, payload: &[u8]) {
        if self.dropped_off_thread("side_payload") || !self.session.is_active() {
            return;
        }
        self.guarded("side_payload", |d| d.side_payload_body(channel, payload));
    }

    /// Called when a block-state notification arrives
    pub fn on_block_notification(&mut self, pos: BlockPos, block: &BlockId, data1: i32, data2: i32) {
        if self.dropped_off_thread("block_notification") || !self.session.is_active() {
            return;
        }
        self.guarded("block_notification", |d| {
            d.block_notification_body(pos, block, data1, data2)
        });
    }

    /// Called while the host assembles a crash or environment report
    ///
    /// Appends this add-on's section regardless of session state or calling
    /// thread: the crash path must be able to describe an inactive session.
    pub fn on_diagnostic_capture(&self, report: &mut DiagnosticReport) {
        self.append_diagnostics(report);
    }

    // === Hook bodies ===

    fn tick_body(&mut self, world: &Arc<World>) -> CaptureResult<()> {
        let _hook = hook_span("tick").entered();

        if !self.session.world_matches(world) {
            // World swap. While loading is deferred the session stays
            // suspended on the old identity; an external collaborator clears
            // the flag before the next tick to let the swap complete.
            if self.session.is_deferred() {
                tracing::debug!("[HookDispatcher] World swap deferred, capture suspended");
                self.session.suspend();
                return Ok(());
            }
            {
                let _section = core_span("world_load").entered();
                self.sink.on_world_load(world)?;
            }
            self.session.adopt_world(world);
            return Ok(());
        }

        if self.session.is_active() {
            self.container_check(world)?;
        }
        Ok(())
    }

    /// Detect a container transition by comparing the tracked container with
    /// the player's currently open one.
    fn container_check(&mut self, world: &Arc<World>) -> CaptureResult<()> {
        let Some(current) = self.player.open_container() else {
            return Ok(());
        };

        let tracked = self.session.open_container().cloned();
        if let Some(tracked) = &tracked {
            if Arc::ptr_eq(tracked, &current) {
                return Ok(());
            }
        }

        if current.is_inventory() {
            // Back to the plain inventory: whatever was tracked just closed.
            if let Some(closed) = tracked {
                self.gui_closed(world, &closed)?;
            }
        } else {
            let _section = core_span("container_opened").entered();
            self.sink.on_container_opened(&current)?;
        }

        self.session.set_open_container(Some(current));
        Ok(())
    }

    /// Route a closed GUI to built-in capture, then to the first claiming
    /// `GuiCloseHandler`, falling back to an unhandled-event warning.
    fn gui_closed(&mut self, world: &Arc<World>, closed: &Arc<Container>) -> CaptureResult<()> {
        match self.session.last_target().cloned() {
            Some(InteractionTarget::Entity(entity)) => {
                let mut handled = {
                    let _section = core_span("entity_gui_closed").entered();
                    self.sink.on_entity_gui_closed(world, &entity, closed)?
                };
                if !handled {
                    handled = self.listeners.gui_close().dispatch_first_match(|id, handler| {
                        let _span = listener_span(id).entered();
                        handler.on_entity_closed(world, &entity, closed)
                    });
                }
                if !handled {
                    tracing::warn!(
                        "[HookDispatcher] Unrecognised entity could not be captured: {}",
                        entity.type_name()
                    );
                }
            }
            Some(InteractionTarget::Block(pos)) => {
                let mut handled = {
                    let _section = core_span("block_gui_closed").entered();
                    self.sink.on_block_gui_closed(world, pos, closed)?
                };
                if !handled {
                    handled = self.listeners.gui_close().dispatch_first_match(|id, handler| {
                        let _span = listener_span(id).entered();
                        handler.on_position_closed(world, pos, closed)
                    });
                }
                if !handled {
                    tracing::warn!(
                        "[HookDispatcher] Unhandled GUI close at {}: {}",
                        pos,
                        world.block_entity_at(pos).unwrap_or("nothing")
                    );
                }
            }
            None => {
                tracing::warn!("[HookDispatcher] GUI close with no recorded interaction target");
            }
        }
        Ok(())
    }

    fn chat_body(&mut self, text: &str) -> CaptureResult<()> {
        let _hook = hook_span("chat").entered();
        {
            let _section = core_span("chat").entered();
            self.sink.on_chat(text)?;
        }

        let Some(world) = self.session.world().cloned() else {
            return Ok(());
        };
        self.listeners.chat().dispatch_all(|id, handler| {
            let _span = listener_span(id).entered();
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler.on_chat(&world, text))) {
                tracing::warn!(
                    "[HookDispatcher] Chat listener '{}' panicked: {}",
                    id,
                    panic_detail(payload.as_ref())
                );
            }
        });
        Ok(())
    }

    fn side_payload_body(&mut self, channel: &str, payload: &[u8]) -> CaptureResult<()> {
        let _hook = hook_span("side_payload").entered();
        {
            let _section = core_span("plugin_payload").entered();
            self.sink.on_plugin_payload(channel, payload)?;
        }

        let Some(world) = self.session.world().cloned() else {
            return Ok(());
        };
        self.listeners.plugin_channel().dispatch_all(|id, handler| {
            let _span = listener_span(id).entered();
            let call = AssertUnwindSafe(|| handler.on_payload(&world, channel, payload));
            if let Err(detail) = catch_unwind(call) {
                tracing::warn!(
                    "[HookDispatcher] Plugin channel listener '{}' panicked: {}",
                    id,
                    panic_detail(detail.as_ref())
                );
            }
        });
        Ok(())
    }

    fn block_notification_body(
        &mut self,
        pos: BlockPos,
        block: &BlockId,
        data1: i32,
        data2: i32,
    ) -> CaptureResult<()> {
        let _hook = hook_span("block_notification").entered();
        {
            let _section = core_span("block_event").entered();
            self.sink.on_block_event(pos, block, data1, data2)?;
        }

        let Some(world) = self.session.world().cloned() else {
            return Ok(());
        };
        self.listeners.block_event().dispatch_all(|id, handler| {
            let _span = listener_span(id).entered();
            let call = AssertUnwindSafe(|| handler.on_block_event(&world, pos, block, data1, data2));
            if let Err(detail) = catch_unwind(call) {
                tracing::warn!(
                    "[HookDispatcher] Block event listener '{}' panicked: {}",
                    id,
                    panic_detail(detail.as_ref())
                );
            }
        });
        Ok(())
    }

    // === Guarding ===

    /// Check the calling thread; cross-thread calls are dropped, not queued
    fn dropped_off_thread(&self, event: &str) -> bool {
        if thread::current().id() == self.logic_thread {
            return false;
        }
        tracing::trace!("[HookDispatcher] Dropped cross-thread call to hook '{}'", event);
        true
    }

    /// Run a hook body, promoting any escaping fault to the fatal path
    fn guarded<F>(&mut self, event: &str, body: F)
    where
        F: FnOnce(&mut Self) -> CaptureResult<()>,
    {
        match catch_unwind(AssertUnwindSafe(|| body(self))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.escalate(event, anyhow::Error::from(err)),
            Err(payload) => self.escalate(event, anyhow::anyhow!(panic_detail(payload.as_ref()))),
        }
    }

    /// Stop the session and hand a crash report to the host's fatal path
    fn escalate(&mut self, event: &str, cause: anyhow::Error) {
        tracing::error!("[HookDispatcher] Fatal fault in hook '{}': {}", event, cause);

        let mut report = DiagnosticReport::new();
        self.append_diagnostics(&mut report);
        self.session.stop();
        self.fatal.crashed(CrashReport::new(event, cause, report));
    }

    fn append_diagnostics(&self, report: &mut DiagnosticReport) {
        report.add_section(
            REPORT_SECTION,
            format!("{}\n{}", self.session.debug_info(), self.sink.debug_info()),
        );
    }

    #[cfg(test)]
    fn set_logic_thread(&mut self, id: ThreadId) {
        self.logic_thread = id;
    }
}

/// Best-effort rendering of a panic payload
fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
