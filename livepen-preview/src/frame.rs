//! Iframe mount point for host pages.
//! Each live document becomes an `<iframe sandbox srcdoc>` element with a fresh key;
//! the embedding page swaps the element, which discards the previous browsing context.

use crate::error::{PreviewError, PreviewResult};
use crate::sandbox::{Capabilities, SandboxContext, SandboxHost};
use crate::synth::CompositeDocument;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

/// Static view shown when no isolated context can be created. Contains no script.
pub const PLACEHOLDER_HTML: &str =
    r#"<div class="preview-unavailable" role="status">Preview unavailable</div>"#;

/// Presentation attributes of the preview frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameOptions {
    pub title: String,
    pub width: String,
    pub height: String,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            title: "Output".to_string(),
            width: "100%".to_string(),
            height: "200px".to_string(),
        }
    }
}

/// What the mount currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Empty,
    Live { key: Uuid, element: String },
    Placeholder { reason: String, element: String },
}

impl Frame {
    /// Markup to embed in the host page (empty string for `Empty`).
    pub fn element(&self) -> &str {
        match self {
            Frame::Empty => "",
            Frame::Live { element, .. } | Frame::Placeholder { element, .. } => element.as_str(),
        }
    }

    pub fn key(&self) -> Option<Uuid> {
        match self {
            Frame::Live { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Receiving side of the mount; the host page renders the latest value.
pub type Mount = watch::Receiver<Frame>;

/// Builds the sandboxed iframe element for `doc`.
pub fn frame_element(
    doc: &CompositeDocument,
    caps: &Capabilities,
    options: &FrameOptions,
    key: Uuid,
) -> String {
    format!(
        r#"<iframe name="preview-{}" title="{}" sandbox="{}" srcdoc="{}" width="{}" height="{}"></iframe>"#,
        key,
        escape_attr(&options.title),
        caps.sandbox_attr(),
        escape_attr(doc.as_str()),
        escape_attr(&options.width),
        escape_attr(&options.height),
    )
}

/// Wraps a frame element in a minimal standalone page.
pub fn host_page(frame: &Frame, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_attr(title),
        frame.element()
    )
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Context handle for one published frame.
pub struct FrameContext {
    key: Uuid,
}

impl SandboxContext for FrameContext {
    fn id(&self) -> Uuid {
        self.key
    }
}

/// Publishes frames on a watch channel.
pub struct FrameHost {
    options: FrameOptions,
    tx: watch::Sender<Frame>,
}

impl FrameHost {
    pub fn new(options: FrameOptions) -> (Self, Mount) {
        let (tx, rx) = watch::channel(Frame::Empty);
        (Self { options, tx }, rx)
    }

    /// Attaches another mount; it immediately sees the current frame.
    pub fn subscribe(&self) -> Mount {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Frame {
        self.tx.borrow().clone()
    }

    pub fn options(&self) -> &FrameOptions {
        &self.options
    }
}

impl SandboxHost for FrameHost {
    type Context = FrameContext;

    fn create_context(
        &mut self,
        doc: &CompositeDocument,
        caps: &Capabilities,
    ) -> PreviewResult<FrameContext> {
        if self.tx.receiver_count() == 0 {
            return Err(PreviewError::unavailable("no mount is attached"));
        }
        let key = Uuid::new_v4();
        let element = frame_element(doc, caps, &self.options, key);
        self.tx.send_replace(Frame::Live { key, element });
        Ok(FrameContext { key })
    }

    fn show_placeholder(&mut self, reason: &str) {
        self.tx.send_replace(Frame::Placeholder {
            reason: reason.to_string(),
            element: PLACEHOLDER_HTML.to_string(),
        });
    }

    fn clear(&mut self) {
        self.tx.send_replace(Frame::Empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::build;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_frame_element_escapes_srcdoc() {
        let key = Uuid::nil();
        let doc = build("<a href=\"x\">it's</a>", "", "");
        let element = frame_element(&doc, &Capabilities::default(), &FrameOptions::default(), key);

        assert_eq!(
            element,
            "<iframe name=\"preview-00000000-0000-0000-0000-000000000000\" title=\"Output\" \
             sandbox=\"allow-scripts\" \
             srcdoc=\"&lt;html&gt;&lt;head&gt;&lt;style&gt;&lt;/style&gt;&lt;/head&gt;&lt;body&gt;\
             &lt;a href=&quot;x&quot;&gt;it&#39;s&lt;/a&gt;&lt;script&gt;&lt;/script&gt;\
             &lt;/body&gt;&lt;/html&gt;\" width=\"100%\" height=\"200px\"></iframe>"
        );
    }

    #[test]
    fn test_create_context_publishes_fresh_key() {
        let (mut host, mount) = FrameHost::new(FrameOptions::default());
        let doc = build("<p>x</p>", "", "");

        let a = host.create_context(&doc, &Capabilities::default()).unwrap();
        let b = host.create_context(&doc, &Capabilities::default()).unwrap();

        assert_ne!(a.id(), b.id());
        assert_eq!(mount.borrow().key(), Some(b.id()));
    }

    #[test]
    fn test_detached_mount_is_unavailable() {
        let (mut host, mount) = FrameHost::new(FrameOptions::default());
        drop(mount);

        let result = host.create_context(&build("", "", ""), &Capabilities::default());
        assert!(matches!(result, Err(PreviewError::SandboxUnavailable { .. })));
    }

    #[test]
    fn test_placeholder_and_clear() {
        let (mut host, mount) = FrameHost::new(FrameOptions::default());

        host.show_placeholder("broken");
        assert_eq!(mount.borrow().element(), PLACEHOLDER_HTML);
        assert!(!mount.borrow().element().contains("<script"));

        host.clear();
        assert_eq!(*mount.borrow(), Frame::Empty);
    }

    #[test]
    fn test_host_page_embeds_element() {
        let frame = Frame::Live {
            key: Uuid::nil(),
            element: "<iframe></iframe>".to_string(),
        };
        let page = host_page(&frame, "Preview");
        assert!(page.contains("<title>Preview</title>"));
        assert!(page.contains("<body>\n<iframe></iframe>\n</body>"));
    }
}
