use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
};

use chrono::Utc;

use crate::models::Note;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to access the note storage file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode or decode note storage: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// In-memory note map mirrored to a single JSON file. Every mutation
/// rewrites the whole file; the load happens once at construction.
pub struct Repository {
    notes: HashMap<String, Note>,
    path: PathBuf,
}

impl Repository {
    /// Loads the storage file when it exists; starts empty otherwise.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let notes: HashMap<String, Note> = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            HashMap::new()
        };

        tracing::info!("Loaded {} notes from '{}'", notes.len(), path.display());

        Ok(Self { notes, path })
    }

    // Full rewrite of the backing file from the in-memory map
    fn persist(&self) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(&self.notes)?;
        fs::write(&self.path, contents)?;

        Ok(())
    }

    pub fn create(&mut self, note: Note) -> Result<Note, StorageError> {
        self.notes.insert(note.id.clone(), note.clone());
        self.persist()?;

        Ok(note)
    }

    /// All notes, map iteration order.
    pub fn list(&self) -> Vec<Note> {
        self.notes.values().cloned().collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Note> {
        self.notes.get(id).cloned()
    }

    /// Case-insensitive substring match against title OR content.
    /// An absent filter term never matches, and neither does a note
    /// without content when only a content term is given.
    pub fn find_by_title_or_content(
        &self,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Vec<Note> {
        let title = title.map(str::to_lowercase);
        let content = content.map(str::to_lowercase);

        self.notes
            .values()
            .filter(|note| {
                let matches_title = title
                    .as_ref()
                    .is_some_and(|term| note.title.to_lowercase().contains(term));
                let matches_content = content.as_ref().is_some_and(|term| {
                    note.content
                        .as_ref()
                        .is_some_and(|existing| existing.to_lowercase().contains(term))
                });

                matches_title || matches_content
            })
            .cloned()
            .collect()
    }

    /// Replaces only the provided fields and refreshes `updated_at`.
    /// Returns `Ok(None)` when no note has the given id.
    pub fn update(
        &mut self,
        id: &str,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Option<Note>, StorageError> {
        let Some(note) = self.notes.get_mut(id) else {
            return Ok(None);
        };

        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = Some(content);
        }
        note.updated_at = Utc::now().timestamp_millis();

        let updated = note.clone();
        self.persist()?;

        Ok(Some(updated))
    }

    /// Removes and persists when present; `Ok(None)` otherwise.
    pub fn delete(&mut self, id: &str) -> Result<Option<Note>, StorageError> {
        let Some(removed) = self.notes.remove(id) else {
            return Ok(None);
        };

        self.persist()?;

        Ok(Some(removed))
    }
}
