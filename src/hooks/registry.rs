//! Listener Registry
//!
//! Contains:
//! - `ListenerSet` - ordered extension-id -> handler mapping for one capability
//! - `ListenerRegistry` - the four capability sets the dispatcher walks
//!
//! Dispatch order is registration order, stable for the process lifetime.
//! There is no priority scheme and no removal path; extensions register once
//! at load time.

use std::sync::Arc;

use crate::core::{CaptureError, CaptureResult};

use super::listeners::{
    BlockEventListener, Capability, ChatListener, GuiCloseHandler, PluginChannelListener,
};

/// Ordered id -> handler entries for one capability
///
/// Backed by a `Vec` of pairs rather than a map: insertion order *is* the
/// dispatch order, and the registry is small and read-heavy.
pub struct ListenerSet<T: ?Sized> {
    capability: Capability,
    entries: Vec<(String, Arc<T>)>,
}

impl<T: ?Sized> ListenerSet<T> {
    /// Create an empty set for a capability
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            entries: Vec::new(),
        }
    }

    /// The capability this set serves
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Register a handler under a stable extension id
    ///
    /// Fails with `CaptureError::DuplicateListener` when the id is already
    /// taken for this capability; the first registration stays intact.
    pub fn register(&mut self, id: impl Into<String>, handler: Arc<T>) -> CaptureResult<()> {
        let id = id.into();
        if self.entries.iter().any(|(existing, _)| *existing == id) {
            return Err(CaptureError::DuplicateListener {
                capability: self.capability.to_string(),
                id,
            });
        }

        tracing::info!(
            "[ListenerRegistry] Registered {} listener '{}'",
            self.capability,
            id
        );
        self.entries.push((id, handler));
        Ok(())
    }

    /// Iterate `(id, handler)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .map(|(id, handler)| (id.as_str(), handler.as_ref()))
    }

    /// Invoke handlers in order until one claims the event
    ///
    /// Every handler receives the same call; the walk stops at the first
    /// returning `true`. Returns `false` when the set is empty or nothing
    /// claimed the event.
    pub fn dispatch_first_match(&self, mut call: impl FnMut(&str, &T) -> bool) -> bool {
        for (id, handler) in &self.entries {
            if call(id, handler.as_ref()) {
                return true;
            }
        }
        false
    }

    /// Invoke every handler in order, with no short-circuit
    ///
    /// Fault isolation between handlers is the caller's job; this walk never
    /// skips an entry on its own.
    pub fn dispatch_all(&self, mut call: impl FnMut(&str, &T)) {
        for (id, handler) in &self.entries {
            call(id, handler.as_ref());
        }
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no handlers are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> std::fmt::Debug for ListenerSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("capability", &self.capability)
            .field("ids", &self.entries.iter().map(|(id, _)| id).collect::<Vec<_>>())
            .finish()
    }
}

/// The four capability sets extensions register into
#[derive(Debug)]
pub struct ListenerRegistry {
    gui_close: ListenerSet<dyn GuiCloseHandler>,
    chat: ListenerSet<dyn ChatListener>,
    plugin_channel: ListenerSet<dyn PluginChannelListener>,
    block_event: ListenerSet<dyn BlockEventListener>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            gui_close: ListenerSet::new(Capability::GuiClose),
            chat: ListenerSet::new(Capability::Chat),
            plugin_channel: ListenerSet::new(Capability::PluginChannel),
            block_event: ListenerSet::new(Capability::BlockEvent),
        }
    }

    /// Register a GUI-close handler
    pub fn register_gui_close(
        &mut self,
        id: impl Into<String>,
        handler: Arc<dyn GuiCloseHandler>,
    ) -> CaptureResult<()> {
        self.gui_close.register(id, handler)
    }

    /// Register a chat listener
    pub fn register_chat(
        &mut self,
        id: impl Into<String>,
        handler: Arc<dyn ChatListener>,
    ) -> CaptureResult<()> {
        self.chat.register(id, handler)
    }

    /// Register a side-channel payload listener
    pub fn register_plugin_channel(
        &mut self,
        id: impl Into<String>,
        handler: Arc<dyn PluginChannelListener>,
    ) -> CaptureResult<()> {
        self.plugin_channel.register(id, handler)
    }

    /// Register a block-event listener
    pub fn register_block_event(
        &mut self,
        id: impl Into<String>,
        handler: Arc<dyn BlockEventListener>,
    ) -> CaptureResult<()> {
        self.block_event.register(id, handler)
    }

    /// The GUI-close handler chain
    pub fn gui_close(&self) -> &ListenerSet<dyn GuiCloseHandler> {
        &self.gui_close
    }

    /// The chat listener chain
    pub fn chat(&self) -> &ListenerSet<dyn ChatListener> {
        &self.chat
    }

    /// The side-channel listener chain
    pub fn plugin_channel(&self) -> &ListenerSet<dyn PluginChannelListener> {
        &self.plugin_channel
    }

    /// The block-event listener chain
    pub fn block_event(&self) -> &ListenerSet<dyn BlockEventListener> {
        &self.block_event
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use crate::host::{BlockPos, Container, Entity, World};

    struct RecordingGuiHandler {
        name: &'static str,
        claims: bool,
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl GuiCloseHandler for RecordingGuiHandler {
        fn on_entity_closed(
            &self,
            _world: &Arc<World>,
            _entity: &Arc<Entity>,
            _container: &Arc<Container>,
        ) -> bool {
            self.calls.borrow_mut().push(self.name);
            self.claims
        }

        fn on_position_closed(
            &self,
            _world: &Arc<World>,
            _pos: BlockPos,
            _container: &Arc<Container>,
        ) -> bool {
            self.calls.borrow_mut().push(self.name);
            self.claims
        }
    }

    fn gui_args() -> (Arc<World>, Arc<Entity>, Arc<Container>) {
        (
            Arc::new(World::new("overworld")),
            Arc::new(Entity::new(1, "Trader")),
            Arc::new(Container::custom("trade")),
        )
    }

    #[test]
    fn test_first_match_stops_at_first_claim() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut set: ListenerSet<dyn GuiCloseHandler> = ListenerSet::new(Capability::GuiClose);
        for (name, claims) in [("first", false), ("second", true), ("third", true)] {
            set.register(
                name,
                Arc::new(RecordingGuiHandler {
                    name,
                    claims,
                    calls: Rc::clone(&calls),
                }),
            )
            .unwrap();
        }

        let (world, entity, container) = gui_args();
        let handled =
            set.dispatch_first_match(|_, h| h.on_entity_closed(&world, &entity, &container));

        assert!(handled);
        assert_eq!(*calls.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_first_match_unclaimed_visits_all() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut set: ListenerSet<dyn GuiCloseHandler> = ListenerSet::new(Capability::GuiClose);
        for name in ["a", "b", "c"] {
            set.register(
                name,
                Arc::new(RecordingGuiHandler {
                    name,
                    claims: false,
                    calls: Rc::clone(&calls),
                }),
            )
            .unwrap();
        }

        let (world, entity, container) = gui_args();
        let handled =
            set.dispatch_first_match(|_, h| h.on_entity_closed(&world, &entity, &container));

        assert!(!handled);
        assert_eq!(*calls.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_first_match_empty_set() {
        let set: ListenerSet<dyn GuiCloseHandler> = ListenerSet::new(Capability::GuiClose);
        let (world, entity, container) = gui_args();
        assert!(!set.dispatch_first_match(|_, h| h.on_entity_closed(&world, &entity, &container)));
    }

    #[test]
    fn test_dispatch_all_no_short_circuit() {
        struct CountingChat(Rc<RefCell<Vec<String>>>);
        impl ChatListener for CountingChat {
            fn on_chat(&self, _world: &Arc<World>, text: &str) {
                self.0.borrow_mut().push(text.to_string());
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut set: ListenerSet<dyn ChatListener> = ListenerSet::new(Capability::Chat);
        set.register("one", Arc::new(CountingChat(Rc::clone(&seen))))
            .unwrap();
        set.register("two", Arc::new(CountingChat(Rc::clone(&seen))))
            .unwrap();

        let world = Arc::new(World::new("overworld"));
        set.dispatch_all(|_, h| h.on_chat(&world, "hello"));

        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected_first_intact() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut set: ListenerSet<dyn GuiCloseHandler> = ListenerSet::new(Capability::GuiClose);
        set.register(
            "mapper",
            Arc::new(RecordingGuiHandler {
                name: "original",
                claims: true,
                calls: Rc::clone(&calls),
            }),
        )
        .unwrap();

        let err = set
            .register(
                "mapper",
                Arc::new(RecordingGuiHandler {
                    name: "impostor",
                    claims: true,
                    calls: Rc::clone(&calls),
                }),
            )
            .unwrap_err();

        assert!(matches!(err, CaptureError::DuplicateListener { .. }));
        assert_eq!(set.len(), 1);

        let (world, entity, container) = gui_args();
        set.dispatch_first_match(|_, h| h.on_entity_closed(&world, &entity, &container));
        assert_eq!(*calls.borrow(), vec!["original"]);
    }

    #[test]
    fn test_registry_capabilities_independent() {
        struct Silent;
        impl ChatListener for Silent {
            fn on_chat(&self, _world: &Arc<World>, _text: &str) {}
        }
        impl PluginChannelListener for Silent {
            fn on_payload(&self, _world: &Arc<World>, _channel: &str, _payload: &[u8]) {}
        }

        let mut registry = ListenerRegistry::new();
        registry.register_chat("ext", Arc::new(Silent)).unwrap();
        // Same id under a different capability is fine.
        registry
            .register_plugin_channel("ext", Arc::new(Silent))
            .unwrap();

        assert_eq!(registry.chat().len(), 1);
        assert_eq!(registry.plugin_channel().len(), 1);
        assert!(registry.gui_close().is_empty());
        assert!(registry.register_chat("ext", Arc::new(Silent)).is_err());
    }
}
