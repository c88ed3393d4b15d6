use chrono::{DateTime, Utc};
use livepen_preview::Sources;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque project identifier assigned by the project service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A project as returned by the project service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ProjectId,
    pub owner: String,
    pub project_name: String,
    #[serde(flatten)]
    pub fields: ProjectFields,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Editable part of a project; the body of a save request.
/// Missing or null fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    #[serde(rename = "htmlCode", default, deserialize_with = "null_as_default")]
    pub markup: String,
    #[serde(rename = "cssCode", default, deserialize_with = "null_as_default")]
    pub style: String,
    #[serde(rename = "jsCode", default, deserialize_with = "null_as_default")]
    pub script: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Collaborator emails, forwarded as given.
    #[serde(rename = "collaborator", default, deserialize_with = "null_as_default")]
    pub collaborators: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ProjectFields {
    pub fn sources(&self) -> Sources {
        Sources::new(self.markup.clone(), self.style.clone(), self.script.clone())
    }

    pub fn from_sources(sources: Sources, description: String, collaborators: Vec<String>) -> Self {
        Self {
            markup: sources.markup,
            style: sources.style,
            script: sources.script,
            description,
            collaborators,
        }
    }

    /// Code and description with surrounding whitespace removed, as sent on save.
    pub fn trimmed(self) -> Self {
        Self {
            markup: self.markup.trim().to_string(),
            style: self.style.trim().to_string(),
            script: self.script.trim().to_string(),
            description: self.description.trim().to_string(),
            collaborators: self.collaborators,
        }
    }
}
