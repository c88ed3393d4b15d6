//! One open project editor: loaded fields plus its live preview.

use crate::error::{SessionError, SessionResult};
use crate::project::{ProjectFields, ProjectId};
use crate::service::{AuthService, Identity, ProjectService, Token};
use livepen_preview::{PreviewConfig, PreviewController, SandboxHost, SourceKind};
use log::info;

pub struct EditorSession<H: SandboxHost> {
    project_id: ProjectId,
    project_name: String,
    identity: Identity,
    description: String,
    collaborators: Vec<String>,
    preview: PreviewController<H>,
}

impl<H: SandboxHost> EditorSession<H> {
    /// Verifies `token`, loads the project and paints its first preview immediately.
    pub async fn open<A, P>(
        auth: &A,
        projects: &P,
        token: &Token,
        id: &ProjectId,
        config: &PreviewConfig,
        host: H,
    ) -> SessionResult<Self>
    where
        A: AuthService,
        P: ProjectService,
    {
        let identity = auth.verify(token).await?;
        let project = projects.load_project(token, id).await?;

        let preview = PreviewController::with_sources(config, host, project.fields.sources())?;
        preview.force_rebuild_now();
        info!(
            "{} opened project {} ({})",
            identity.email, project.id, project.project_name
        );

        Ok(Self {
            project_id: project.id,
            project_name: project.project_name,
            identity,
            description: project.fields.description,
            collaborators: project.fields.collaborators,
            preview,
        })
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn preview(&self) -> &PreviewController<H> {
        &self.preview
    }

    pub fn is_closed(&self) -> bool {
        self.preview.is_disposed()
    }

    pub fn edit(&self, kind: SourceKind, text: impl Into<String>) {
        self.preview.set_content(kind, text);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        if self.is_closed() {
            return;
        }
        self.description = description.into();
    }

    pub fn set_collaborators(&mut self, collaborators: Vec<String>) {
        if self.is_closed() {
            return;
        }
        self.collaborators = collaborators;
    }

    /// Current editable fields, untrimmed. `None` once closed.
    pub fn fields(&self) -> Option<ProjectFields> {
        let sources = self.preview.sources()?;
        Some(ProjectFields::from_sources(
            sources,
            self.description.clone(),
            self.collaborators.clone(),
        ))
    }

    pub async fn save<P: ProjectService>(&self, projects: &P, token: &Token) -> SessionResult<()> {
        let fields = self.fields().ok_or(SessionError::Closed)?.trimmed();
        projects.save_project(token, &self.project_id, fields).await?;
        info!("{} saved project {}", self.identity.email, self.project_id);
        Ok(())
    }

    /// Tears down the preview. Idempotent.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        self.preview.dispose();
        info!("closed project {}", self.project_id);
    }
}
