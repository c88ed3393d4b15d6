//! Sandbox host that writes the framed preview page to disk.

use livepen_preview::frame::{PLACEHOLDER_HTML, frame_element, host_page};
use livepen_preview::{
    Capabilities, CompositeDocument, Frame, FrameOptions, PreviewError, PreviewResult,
    SandboxContext, SandboxHost,
};
use log::warn;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

pub struct FileContext {
    key: Uuid,
}

impl SandboxContext for FileContext {
    fn id(&self) -> Uuid {
        self.key
    }
}

/// Writes `<iframe sandbox srcdoc>` pages atomically (temp file + rename).
pub struct FileHost {
    path: PathBuf,
    options: FrameOptions,
}

impl FileHost {
    pub fn new(path: impl Into<PathBuf>, options: FrameOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_frame(&self, frame: &Frame) -> io::Result<()> {
        let page = host_page(frame, &self.options.title);
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(page.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl SandboxHost for FileHost {
    type Context = FileContext;

    fn create_context(
        &mut self,
        doc: &CompositeDocument,
        caps: &Capabilities,
    ) -> PreviewResult<FileContext> {
        let key = Uuid::new_v4();
        let frame = Frame::Live {
            key,
            element: frame_element(doc, caps, &self.options, key),
        };
        self.write_frame(&frame).map_err(|e| {
            PreviewError::unavailable(format!("cannot write {}: {}", self.path.display(), e))
        })?;
        Ok(FileContext { key })
    }

    fn show_placeholder(&mut self, reason: &str) {
        let frame = Frame::Placeholder {
            reason: reason.to_string(),
            element: PLACEHOLDER_HTML.to_string(),
        };
        if let Err(e) = self.write_frame(&frame) {
            warn!("cannot write placeholder to {}: {}", self.path.display(), e);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.write_frame(&Frame::Empty) {
            warn!("cannot clear {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepen_preview::synth;
    use std::fs;

    #[test]
    fn test_writes_sandboxed_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.html");
        let mut host = FileHost::new(&path, FrameOptions::default());

        let ctx = host
            .create_context(&synth::build("<h1>hi</h1>", "", ""), &Capabilities::default())
            .unwrap();

        let page = fs::read_to_string(&path).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(&format!("name=\"preview-{}\"", ctx.id())));
        assert!(page.contains("sandbox=\"allow-scripts\""));
        assert!(page.contains("&lt;h1&gt;hi&lt;/h1&gt;"));
    }

    #[test]
    fn test_replace_overwrites_previous_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.html");
        let mut host = FileHost::new(&path, FrameOptions::default());

        host.create_context(&synth::build("<p>one</p>", "", ""), &Capabilities::default())
            .unwrap();
        host.create_context(&synth::build("<p>two</p>", "", ""), &Capabilities::default())
            .unwrap();

        let page = fs::read_to_string(&path).unwrap();
        assert!(!page.contains("one"));
        assert!(page.contains("two"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_unwritable_path_is_unavailable() {
        let mut host = FileHost::new("/nonexistent/livepen/preview.html", FrameOptions::default());
        let result = host.create_context(&synth::build("", "", ""), &Capabilities::default());
        assert!(matches!(result, Err(PreviewError::SandboxUnavailable { .. })));
    }

    #[test]
    fn test_placeholder_page_has_no_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.html");
        let mut host = FileHost::new(&path, FrameOptions::default());

        host.show_placeholder("broken");

        let page = fs::read_to_string(&path).unwrap();
        assert!(page.contains(PLACEHOLDER_HTML));
        assert!(!page.contains("<script"));
        assert!(!page.contains("<iframe"));
    }
}
