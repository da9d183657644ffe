//! Diagnostic port for recoverable anomalies.
//!
//! Rendering and importing never fail. When they have to degrade (a container
//! nested too deeply, an image without a usable source, an import budget
//! exhausted) they report a [`Diagnostic`] to a sink supplied by the caller.

use std::cell::RefCell;

use tracing::{debug, warn};

/// What kind of degradation happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A container exceeded the configured nesting depth and was dropped.
    DepthLimit,
    /// The importer visited its maximum number of nodes and stopped.
    NodeBudget,
    /// An image had no usable source; the placeholder was used.
    ImageFallback,
    /// An embed had no content for its kind; fallback text was used.
    EmbedFallback,
}

impl DiagnosticKind {
    /// Whether the anomaly loses content, as opposed to substituting it.
    #[must_use]
    pub const fn is_lossy(self) -> bool {
        matches!(self, Self::DepthLimit | Self::NodeBudget)
    }
}

/// A single reported anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Kind of anomaly.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
    /// Element the anomaly relates to, when there is one.
    pub element_id: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic without an element reference.
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            element_id: None,
        }
    }

    /// Attaches the related element id.
    #[must_use]
    pub fn for_element(mut self, id: impl Into<String>) -> Self {
        self.element_id = Some(id.into());
        self
    }
}

/// Receiver of diagnostics, injected by the caller.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        let element = diagnostic.element_id.as_deref().unwrap_or("-");
        if diagnostic.kind.is_lossy() {
            warn!(kind = ?diagnostic.kind, element, "{}", diagnostic.message);
        } else {
            debug!(kind = ?diagnostic.kind, element, "{}", diagnostic.message);
        }
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    /// Counts diagnostics of one kind.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|d| d.kind == kind)
            .count()
    }

    /// Returns true when nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }
}
