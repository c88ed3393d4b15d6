//! Contracts of the external project-data service.
//!
//! Authentication, persistence and collaborator validation live behind these
//! traits. The identity token is always passed explicitly.

use crate::error::{AuthError, LoadError, SaveError};
use crate::project::{Project, ProjectFields, ProjectId};
use std::fmt;
use std::future::Future;

/// Opaque credential issued by [`AuthService::authenticate`].
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Who a token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

pub trait AuthService {
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Token, AuthError>> + Send;

    fn verify(&self, token: &Token) -> impl Future<Output = Result<Identity, AuthError>> + Send;
}

pub trait ProjectService {
    fn load_project(
        &self,
        token: &Token,
        id: &ProjectId,
    ) -> impl Future<Output = Result<Project, LoadError>> + Send;

    fn save_project(
        &self,
        token: &Token,
        id: &ProjectId,
        fields: ProjectFields,
    ) -> impl Future<Output = Result<(), SaveError>> + Send;
}
