//! # Livepen Live Preview Engine
//!
//! Recomposes three source buffers (HTML, CSS, JavaScript) into one document and
//! renders it in a sandboxed context, debounced so keystroke-level edits produce
//! one rebuild per quiet period.
//!
//! ## Pipeline
//! edit → [`SourceBuffer`] → [`DebounceScheduler`] → [`synth::build`]
//! → [`SandboxRenderer::replace`]
//!
//! ## Example
//! ```ignore
//! use livepen_preview::{FrameHost, FrameOptions, PreviewConfig, PreviewController, SourceKind};
//!
//! let (host, mut mount) = FrameHost::new(FrameOptions::default());
//! let controller = PreviewController::new(&PreviewConfig::default(), host)?;
//! controller.set_content(SourceKind::Markup, "<h1>hi</h1>");
//! mount.changed().await?;
//! println!("{}", mount.borrow().element());
//! ```

pub mod buffer;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod frame;
pub mod sandbox;
pub mod synth;

pub use buffer::{SourceBuffer, SourceKind, Sources};
pub use config::PreviewConfig;
pub use controller::{Phase, PreviewController};
pub use debounce::{DebounceScheduler, DEFAULT_DEBOUNCE};
pub use error::{PreviewError, PreviewResult};
pub use frame::{Frame, FrameHost, FrameOptions, Mount};
pub use sandbox::{Capabilities, RenderState, SandboxContext, SandboxHost, SandboxRenderer};
pub use synth::{CompositeDocument, DocumentSynthesizer};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the guard if a previous holder panicked.
/// Guarded state is only ever mutated in single statements, so it stays consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
