//! Error types for the rendering pipeline.
//!
//! Almost nothing in this subsystem is allowed to fail outward: malformed
//! markup degrades, unknown triggers are dropped, bad messages are ignored,
//! disallowed navigation targets are scrubbed. The one genuine failure is
//! the resource limit on fragment size.

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Fragment too large: {0} bytes")]
    FragmentTooLarge(usize),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
