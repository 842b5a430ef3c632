use std::sync::Arc;

use rand::{Rng, rng};
use uuid::Uuid;

use crate::{
    dto::NoteResponse,
    models::Note,
    repository::{Repository, StorageError},
};

/// Seam deciding whether an update should fail artificially. The
/// production wiring rolls dice; tests plug in deterministic injectors.
pub trait FaultInjector: Send + Sync {
    fn should_fail(&self) -> bool;
}

/// Fails with the configured probability on every call.
pub struct RandomFaults {
    probability: f64,
}

impl RandomFaults {
    pub const fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl FaultInjector for RandomFaults {
    fn should_fail(&self) -> bool {
        let mut rng = rng();

        rng.random::<f64>() < self.probability
    }
}

/// Never fails.
pub struct NoFaults;

impl FaultInjector for NoFaults {
    fn should_fail(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Injected fault while updating the note")]
    FaultInjected,
}

pub struct NoteService {
    repo: Arc<tokio::sync::Mutex<Repository>>,
    faults: Box<dyn FaultInjector>,
}

impl NoteService {
    pub fn new(repo: Arc<tokio::sync::Mutex<Repository>>, faults: Box<dyn FaultInjector>) -> Self {
        Self { repo, faults }
    }

    pub async fn create_note(
        &self,
        title: String,
        content: Option<String>,
    ) -> Result<NoteResponse, ServiceError> {
        let note = Note::new(Uuid::new_v4().to_string(), title, content);

        self.repo
            .lock()
            .await
            .create(note)
            .map(Into::into)
            .map_err(Into::into)
    }

    pub async fn list_notes(&self) -> Vec<NoteResponse> {
        self.repo
            .lock()
            .await
            .list()
            .into_iter()
            .map(Into::into)
            .collect()
    }

    pub async fn get_note(&self, id: &str) -> Option<NoteResponse> {
        self.repo.lock().await.find_by_id(id).map(Into::into)
    }

    pub async fn search_notes(
        &self,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Vec<NoteResponse> {
        self.repo
            .lock()
            .await
            .find_by_title_or_content(title, content)
            .into_iter()
            .map(Into::into)
            .collect()
    }

    /// Consults the fault injector before touching storage; an injected
    /// fault leaves the repository untouched.
    pub async fn update_note(
        &self,
        id: &str,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Option<NoteResponse>, ServiceError> {
        if self.faults.should_fail() {
            return Err(ServiceError::FaultInjected);
        }

        self.repo
            .lock()
            .await
            .update(id, title, content)
            .map(|note| note.map(Into::into))
            .map_err(Into::into)
    }

    pub async fn delete_note(&self, id: &str) -> Result<Option<NoteResponse>, ServiceError> {
        self.repo
            .lock()
            .await
            .delete(id)
            .map(|note| note.map(Into::into))
            .map_err(Into::into)
    }
}
