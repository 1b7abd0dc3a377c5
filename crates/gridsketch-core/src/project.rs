//! Project records and the store that keeps them.
//!
//! All projects live as one JSON array under the `projects` key, and the
//! drawing library as one array under `library`.

use crate::library::{DrawingLibrary, LibraryEntry};
use crate::storage::{Storage, StorageError};
use crate::stroke::Stroke;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Storage key holding the project list.
pub const PROJECTS_KEY: &str = "projects";
/// Storage key holding the drawing library.
pub const LIBRARY_KEY: &str = "library";

/// Project store errors.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Invalid project data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ProjectResult<T> = Result<T, ProjectError>;

/// A saved drawing project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Numeric ids from older records are read as strings.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_date: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

impl ProjectRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            created_date: now,
            last_modified: now,
            strokes: Vec::new(),
        }
    }
}

/// Project list and drawing library persisted through a [`Storage`] backend.
pub struct ProjectStore<S: Storage> {
    storage: S,
}

impl<S: Storage> ProjectStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// All projects, in stored order. A missing list is empty.
    pub async fn list(&self) -> ProjectResult<Vec<ProjectRecord>> {
        match self.storage.load(PROJECTS_KEY).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(StorageError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, id: &str) -> ProjectResult<ProjectRecord> {
        self.list()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ProjectError::NotFound(id.to_string()))
    }

    /// Create and persist an empty project.
    pub async fn create(&self, title: &str, description: &str) -> ProjectResult<ProjectRecord> {
        let record = ProjectRecord::new(title, description);
        let mut projects = self.list().await?;
        projects.push(record.clone());
        self.write_projects(&projects).await?;
        log::debug!("created project {} ({})", record.id, record.title);
        Ok(record)
    }

    /// Insert or replace a project, stamping `last_modified`.
    pub async fn save(&self, mut record: ProjectRecord) -> ProjectResult<ProjectRecord> {
        record.last_modified = Utc::now();
        let mut projects = self.list().await?;
        match projects.iter_mut().find(|p| p.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => projects.push(record.clone()),
        }
        self.write_projects(&projects).await?;
        Ok(record)
    }

    /// Remove a project. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> ProjectResult<bool> {
        let mut projects = self.list().await?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(false);
        }
        self.write_projects(&projects).await?;
        Ok(true)
    }

    pub async fn load_library(&self) -> ProjectResult<DrawingLibrary> {
        match self.storage.load(LIBRARY_KEY).await {
            Ok(json) => {
                let entries: Vec<LibraryEntry> = serde_json::from_str(&json)?;
                Ok(DrawingLibrary { entries })
            }
            Err(StorageError::NotFound(_)) => Ok(DrawingLibrary::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save_library(&self, library: &DrawingLibrary) -> ProjectResult<()> {
        let json = serde_json::to_string(&library.entries)?;
        self.storage.save(LIBRARY_KEY, &json).await?;
        Ok(())
    }

    async fn write_projects(&self, projects: &[ProjectRecord]) -> ProjectResult<()> {
        let json = serde_json::to_string(projects)?;
        self.storage.save(PROJECTS_KEY, &json).await?;
        Ok(())
    }
}
