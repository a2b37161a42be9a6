//! Hearth's rendering pipeline for untrusted content regions.
//!
//! Page regions arrive as HTML produced by an external generation process
//! (never authored in-house, potentially adversarial or malformed). This
//! crate turns such a fragment into something the CRM front end can mount
//! live: safe against script injection, visually coherent with the host
//! theme, interactive through a declarative attribute contract, and
//! correctly sized when embedded in a separate browsing context.
//!
//! Two strategies implement the same contract:
//!
//! - [`portal::PortalRenderer`] sanitizes to a strict allow-list and
//!   injects into the host DOM, mounting live widgets into placeholder
//!   nodes (the in-DOM strategy).
//! - [`isolated::IsolatedRenderer`] writes a complete document into a
//!   sandboxed browsing context and relays interaction through a typed
//!   message bridge (the iframe strategy).
//!
//! Pipeline order is fixed per render: normalize, patch, sanitize or
//! isolate, bridge-wire, size-sync. Re-rendering always tears the previous
//! wiring down first.

pub mod bridge;
pub mod cleanup;
pub mod compat;
pub mod config;
pub mod dom;
pub mod error;
pub mod isolated;
pub mod metrics;
pub mod normalize;
pub mod patch;
pub mod portal;
pub mod sanitize;
pub mod sizing;

/// Re-export common types
pub use bridge::{ClickElement, ClickPath, ClickResolution, ClickRouter, FrameAction, HostAction, HostSink};
pub use cleanup::RenderCleanup;
pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use isolated::{deliver_message, FrameSession, IsolatedDocument, IsolatedRenderer};
pub use metrics::RenderMetrics;
pub use normalize::normalize_actions;
pub use patch::UTILITY_CSS;
pub use portal::{PortalRenderer, PortalTarget, RenderedRegion};
pub use sizing::{DocumentGeometry, FrameSizer, SizeSignal};
