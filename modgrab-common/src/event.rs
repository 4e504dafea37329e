// modgrab-common/src/event.rs
//! Progress reporting surface. The core emits discrete events through an
//! injected sink; the whole pipeline runs unchanged with `NoopSink`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ResolveProjects,
    ResolveVersions,
    ResolveDependencies,
    ResolveFiles,
    Download,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::ResolveProjects => "resolving mods",
            Phase::ResolveVersions => "searching versions",
            Phase::ResolveDependencies => "resolving dependencies",
            Phase::ResolveFiles => "fetching file info",
            Phase::Download => "downloading",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A phase begins. `total` is None for open-ended phases (dependency
    /// expansion discovers its own workload).
    PhaseStarted { phase: Phase, total: Option<usize> },
    /// One unit of the phase finished, successfully or not.
    Advanced { phase: Phase, message: String },
    PhaseFinished { phase: Phase },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn emit(&self, _event: ProgressEvent) {}
}
