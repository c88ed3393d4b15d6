//! Preview controller: buffers → debounce → synthesis → sandbox.

use crate::buffer::{BufferSet, SourceBuffer, SourceKind, Sources};
use crate::config::PreviewConfig;
use crate::debounce::DebounceScheduler;
use crate::error::{PreviewError, PreviewResult};
use crate::lock;
use crate::sandbox::{RenderState, SandboxHost, SandboxRenderer};
use crate::synth::{CompositeDocument, DocumentSynthesizer};
use log::{debug, error};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PendingRebuild,
    /// Terminal.
    Disposed,
}

/// Builds the composite document from markup, style and script.
pub(crate) type SynthesizeFn = fn(&str, &str, &str) -> CompositeDocument;

/// State shared between the controller and its debounce callback.
struct Workspace<H: SandboxHost> {
    buffers: BufferSet,
    synthesize: SynthesizeFn,
    renderer: SandboxRenderer<H>,
    disposed: bool,
    rebuilds: u64,
}

impl<H: SandboxHost> Workspace<H> {
    fn rebuild(&mut self) {
        if self.disposed {
            return;
        }
        let synthesize = self.synthesize;
        let buffers = &self.buffers;
        let built = panic::catch_unwind(AssertUnwindSafe(|| {
            synthesize(
                buffers.get(SourceKind::Markup).content(),
                buffers.get(SourceKind::Style).content(),
                buffers.get(SourceKind::Script).content(),
            )
        }));
        match built {
            Ok(doc) => {
                self.renderer.replace(&doc);
                self.rebuilds += 1;
                debug!("preview rebuilt ({} total)", self.rebuilds);
            }
            Err(payload) => {
                let err = PreviewError::Synthesis(panic_message(payload.as_ref()));
                error!("{}; render skipped", err);
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Owns the three buffers and the render target of one open editor.
///
/// Every operation is a silent no-op after [`dispose`](Self::dispose), including
/// timer callbacks that were already scheduled.
pub struct PreviewController<H: SandboxHost> {
    workspace: Arc<Mutex<Workspace<H>>>,
    scheduler: DebounceScheduler,
}

impl<H: SandboxHost> PreviewController<H> {
    /// Empty buffers. Must be called inside a tokio runtime.
    pub fn new(config: &PreviewConfig, host: H) -> PreviewResult<Self> {
        Self::with_sources(config, host, Sources::default())
    }

    /// Pre-populated buffers; nothing is scheduled until an edit or
    /// [`force_rebuild_now`](Self::force_rebuild_now).
    pub fn with_sources(config: &PreviewConfig, host: H, sources: Sources) -> PreviewResult<Self> {
        Self::with_synthesizer(config, host, sources, |markup, style, script| {
            DocumentSynthesizer.build(markup, style, script)
        })
    }

    pub(crate) fn with_synthesizer(
        config: &PreviewConfig,
        host: H,
        sources: Sources,
        synthesize: SynthesizeFn,
    ) -> PreviewResult<Self> {
        config.validate()?;
        let workspace = Arc::new(Mutex::new(Workspace {
            buffers: BufferSet::from_sources(sources),
            synthesize,
            renderer: SandboxRenderer::new(host, config.capabilities),
            disposed: false,
            rebuilds: 0,
        }));

        let weak = Arc::downgrade(&workspace);
        let scheduler = DebounceScheduler::new(config.debounce(), move || {
            if let Some(workspace) = weak.upgrade() {
                lock(&workspace).rebuild();
            }
        })?;

        Ok(Self {
            workspace,
            scheduler,
        })
    }

    /// `None` once disposed.
    pub fn get_buffer(&self, kind: SourceKind) -> Option<SourceBuffer> {
        let workspace = lock(&self.workspace);
        if workspace.disposed {
            return None;
        }
        Some(workspace.buffers.get(kind).clone())
    }

    pub fn sources(&self) -> Option<Sources> {
        let workspace = lock(&self.workspace);
        if workspace.disposed {
            return None;
        }
        Some(workspace.buffers.snapshot())
    }

    /// Writes the buffer and (re)starts the debounce window.
    pub fn set_content(&self, kind: SourceKind, text: impl Into<String>) {
        {
            let mut workspace = lock(&self.workspace);
            if workspace.disposed {
                return;
            }
            workspace.buffers.get_mut(kind).set_content(text);
        }
        self.scheduler.notify();
    }

    /// Rebuilds immediately and drops any pending debounce window.
    pub fn force_rebuild_now(&self) {
        let mut workspace = lock(&self.workspace);
        if workspace.disposed {
            return;
        }
        self.scheduler.cancel();
        workspace.rebuild();
    }

    /// Cancels the pending timer and tears down the sandbox context.
    pub fn dispose(&self) {
        self.scheduler.dispose();
        let mut workspace = lock(&self.workspace);
        if workspace.disposed {
            return;
        }
        workspace.disposed = true;
        workspace.renderer.dispose();
        debug!("preview controller disposed after {} rebuilds", workspace.rebuilds);
    }

    pub fn phase(&self) -> Phase {
        if lock(&self.workspace).disposed {
            Phase::Disposed
        } else if self.scheduler.is_pending() {
            Phase::PendingRebuild
        } else {
            Phase::Idle
        }
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.workspace).disposed
    }

    pub fn render_state(&self) -> RenderState {
        lock(&self.workspace).renderer.state().clone()
    }

    /// Completed synthesize+render cycles.
    pub fn rebuild_count(&self) -> u64 {
        lock(&self.workspace).rebuilds
    }

    pub fn debounce(&self) -> Duration {
        self.scheduler.delay()
    }

    /// Read access to the sandbox host (e.g. to attach another mount).
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(lock(&self.workspace).renderer.host())
    }
}

impl<H: SandboxHost> Drop for PreviewController<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}
