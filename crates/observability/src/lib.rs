//! Tracing and logging setup shared by every binary in the workspace.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide tracing with the default `info` filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info");
}
