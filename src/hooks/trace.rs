//! Instrumentation spans for hook dispatch
//!
//! Profiling is a cross-cutting concern: the dispatcher wraps (a) each hook,
//! (b) the built-in capture section and (c) each listener invocation in a
//! trace span. Span construction lives here so instrumentation can be turned
//! off through subscriber filtering without touching dispatch control flow.

use tracing::{trace_span, Span};

/// Span around one whole hook invocation
pub(crate) fn hook_span(event: &str) -> Span {
    trace_span!("hook", event = event)
}

/// Span around the built-in capture section of a hook
pub(crate) fn core_span(section: &str) -> Span {
    trace_span!("capture", section = section)
}

/// Span around one listener invocation, keyed by its extension id
pub(crate) fn listener_span(id: &str) -> Span {
    trace_span!("listener", id = id)
}
