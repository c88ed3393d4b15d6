//! Sandboxed rendering of composite documents.
//!
//! A [`SandboxHost`] creates isolated execution contexts; the [`SandboxRenderer`]
//! keeps at most one alive and swaps it wholesale on every rebuild. Contexts release
//! everything they own (timers, intervals, frames) when dropped, so the previous
//! document's script state is gone before the next document starts.

use crate::error::{PreviewError, PreviewResult};
use crate::synth::CompositeDocument;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Capability set granted to the framed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub scripts: bool,
    pub same_origin: bool,
    pub top_navigation: bool,
    pub forms: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::scripts_only()
    }
}

impl Capabilities {
    pub const fn scripts_only() -> Self {
        Self {
            scripts: true,
            same_origin: false,
            top_navigation: false,
            forms: false,
        }
    }

    /// Tokens for an iframe `sandbox` attribute.
    pub fn sandbox_tokens(&self) -> Vec<&'static str> {
        let mut tokens = Vec::new();
        if self.scripts {
            tokens.push("allow-scripts");
        }
        if self.same_origin {
            tokens.push("allow-same-origin");
        }
        if self.top_navigation {
            tokens.push("allow-top-navigation");
        }
        if self.forms {
            tokens.push("allow-forms");
        }
        tokens
    }

    pub fn sandbox_attr(&self) -> String {
        self.sandbox_tokens().join(" ")
    }

    /// Scripts plus same-origin lets the framed document remove its own sandbox.
    pub fn is_escapable(&self) -> bool {
        self.scripts && self.same_origin
    }
}

/// One isolated execution context. Dropping it must stop everything it started.
pub trait SandboxContext: Send + 'static {
    fn id(&self) -> Uuid;
}

/// Environment able to create isolated contexts (a frame mount, a file, a test double).
pub trait SandboxHost: Send + 'static {
    type Context: SandboxContext;

    fn create_context(
        &mut self,
        doc: &CompositeDocument,
        caps: &Capabilities,
    ) -> PreviewResult<Self::Context>;

    /// Show a static "preview unavailable" view. Must not run any script.
    fn show_placeholder(&mut self, _reason: &str) {}

    /// Called once when the renderer is disposed.
    fn clear(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing rendered yet.
    Blank,
    Live { generation: u64, context: Uuid },
    /// Non-fatal: the host showed a placeholder instead.
    Unavailable { reason: String },
    Disposed,
}

pub struct SandboxRenderer<H: SandboxHost> {
    host: H,
    capabilities: Capabilities,
    current: Option<H::Context>,
    state: RenderState,
    generation: u64,
}

impl<H: SandboxHost> SandboxRenderer<H> {
    pub fn new(host: H, capabilities: Capabilities) -> Self {
        Self {
            host,
            capabilities,
            current: None,
            state: RenderState::Blank,
            generation: 0,
        }
    }

    /// Discards the current context and renders `doc` in a fresh one.
    /// Failures degrade to [`RenderState::Unavailable`]; nothing is returned to the caller.
    pub fn replace(&mut self, doc: &CompositeDocument) {
        if self.state == RenderState::Disposed {
            return;
        }

        if let Some(old) = self.current.take() {
            debug!("discarding sandbox context {}", old.id());
            drop(old);
        }
        self.generation += 1;

        let created = if self.capabilities.is_escapable() {
            Err(PreviewError::unavailable(
                "scripts with same-origin access cannot be isolated",
            ))
        } else {
            self.host.create_context(doc, &self.capabilities)
        };

        match created {
            Ok(context) => {
                debug!(
                    "sandbox context {} live (generation {}, {} bytes)",
                    context.id(),
                    self.generation,
                    doc.len()
                );
                self.state = RenderState::Live {
                    generation: self.generation,
                    context: context.id(),
                };
                self.current = Some(context);
            }
            Err(err) => {
                let reason = match err {
                    PreviewError::SandboxUnavailable { reason } => reason,
                    other => other.to_string(),
                };
                warn!("preview unavailable: {}", reason);
                self.host.show_placeholder(&reason);
                self.state = RenderState::Unavailable { reason };
            }
        }
    }

    /// Drops the live context and refuses further renders.
    pub fn dispose(&mut self) {
        if self.state == RenderState::Disposed {
            return;
        }
        self.current = None;
        self.host.clear();
        self.state = RenderState::Disposed;
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::build;
    use std::sync::{Arc, Mutex};

    struct TrackedContext {
        id: Uuid,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl SandboxContext for TrackedContext {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    impl Drop for TrackedContext {
        fn drop(&mut self) {
            self.log.lock().unwrap().push(format!("drop {}", self.id));
        }
    }

    #[derive(Default)]
    struct TrackingHost {
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl SandboxHost for TrackingHost {
        type Context = TrackedContext;

        fn create_context(
            &mut self,
            _doc: &CompositeDocument,
            _caps: &Capabilities,
        ) -> PreviewResult<TrackedContext> {
            if self.fail {
                return Err(PreviewError::unavailable("no frame support"));
            }
            let id = Uuid::new_v4();
            self.log.lock().unwrap().push(format!("create {}", id));
            Ok(TrackedContext {
                id,
                log: self.log.clone(),
            })
        }

        fn show_placeholder(&mut self, reason: &str) {
            self.log.lock().unwrap().push(format!("placeholder {}", reason));
        }

        fn clear(&mut self) {
            self.log.lock().unwrap().push("clear".to_string());
        }
    }

    #[test]
    fn test_default_capabilities_allow_scripts_only() {
        let caps = Capabilities::default();
        assert_eq!(caps.sandbox_attr(), "allow-scripts");
        assert!(!caps.is_escapable());
    }

    #[test]
    fn test_replace_drops_old_context_before_creating_new() {
        let host = TrackingHost::default();
        let log = host.log.clone();
        let mut renderer = SandboxRenderer::new(host, Capabilities::default());

        renderer.replace(&build("<p>1</p>", "", ""));
        let first = match renderer.state() {
            RenderState::Live { context, .. } => *context,
            other => panic!("unexpected state {:?}", other),
        };
        renderer.replace(&build("<p>2</p>", "", ""));

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], format!("create {}", first));
        assert_eq!(log[1], format!("drop {}", first));
        assert!(log[2].starts_with("create "));
        assert_eq!(renderer.generation(), 2);
    }

    #[test]
    fn test_failed_creation_degrades_to_placeholder() {
        let host = TrackingHost {
            fail: true,
            ..Default::default()
        };
        let log = host.log.clone();
        let mut renderer = SandboxRenderer::new(host, Capabilities::default());

        renderer.replace(&build("", "", "alert(1)"));

        assert_eq!(
            renderer.state(),
            &RenderState::Unavailable {
                reason: "no frame support".to_string()
            }
        );
        assert_eq!(*log.lock().unwrap(), vec!["placeholder no frame support"]);
    }

    #[test]
    fn test_escapable_capabilities_never_reach_host() {
        let host = TrackingHost::default();
        let log = host.log.clone();
        let caps = Capabilities {
            same_origin: true,
            ..Capabilities::default()
        };
        let mut renderer = SandboxRenderer::new(host, caps);

        renderer.replace(&build("", "", ""));

        assert!(matches!(renderer.state(), RenderState::Unavailable { .. }));
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert!(log[0].starts_with("placeholder"));
    }

    #[test]
    fn test_dispose_releases_context_and_ignores_replace() {
        let host = TrackingHost::default();
        let log = host.log.clone();
        let mut renderer = SandboxRenderer::new(host, Capabilities::default());

        renderer.replace(&build("", "", ""));
        renderer.dispose();
        renderer.dispose();
        renderer.replace(&build("<p>late</p>", "", ""));

        assert_eq!(renderer.state(), &RenderState::Disposed);
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 3);
        assert!(log[1].starts_with("drop "));
        assert_eq!(log[2], "clear");
    }
}
