use std::sync::Arc;

use storage::repository::{ProfileRepository, StorageError};
use wellness_core::model::{ProfileEdits, ScoreResult, UserProfile};

use crate::error::ProfileError;

/// How the profile was obtained at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOrigin {
    /// A valid record was found.
    Stored,
    /// Nothing was stored yet.
    Fresh,
    /// The stored record could not be decoded and was replaced by the default.
    Recovered,
}

/// Process-wide handle on the user profile.
///
/// Loaded once at startup, then every mutation is written through to the
/// injected repository. If a write fails the in-memory profile keeps the
/// mutation and [`flush`](Self::flush) can retry.
pub struct ProfileStore {
    repo: Arc<dyn ProfileRepository>,
    profile: UserProfile,
    origin: ProfileOrigin,
    dirty: bool,
}

impl ProfileStore {
    /// Load the stored profile, falling back to an empty one.
    ///
    /// Malformed content is not an error: it is logged and replaced by the
    /// default profile.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` only when the backend itself cannot be read.
    pub async fn load(repo: Arc<dyn ProfileRepository>) -> Result<Self, ProfileError> {
        let (profile, origin) = match repo.load_profile().await {
            Ok(Some(profile)) => (profile, ProfileOrigin::Stored),
            Ok(None) => (UserProfile::default(), ProfileOrigin::Fresh),
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(%reason, "stored profile is unreadable, starting fresh");
                (UserProfile::default(), ProfileOrigin::Recovered)
            }
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(?origin, completed = profile.has_completed_quiz, "profile loaded");

        Ok(Self {
            repo,
            profile,
            origin,
            dirty: false,
        })
    }

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    #[must_use]
    pub fn origin(&self) -> ProfileOrigin {
        self.origin
    }

    /// True when the last write failed and the stored record is behind.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Merge name/age edits and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if the write fails; the merge is kept in memory.
    pub async fn apply_edits(&mut self, edits: ProfileEdits) -> Result<&UserProfile, ProfileError> {
        let current = std::mem::take(&mut self.profile);
        self.profile = current.apply_edits(edits);
        self.persist().await?;
        Ok(&self.profile)
    }

    /// Merge a quiz result, mark the quiz completed, and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if the write fails; the merge is kept in memory.
    pub async fn apply_quiz_result(
        &mut self,
        result: ScoreResult,
    ) -> Result<&UserProfile, ProfileError> {
        let current = std::mem::take(&mut self.profile);
        self.profile = current.apply_quiz_result(result);
        self.persist().await?;
        Ok(&self.profile)
    }

    /// Retry persisting the in-memory profile after a failed write.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Storage` if the write fails again.
    pub async fn flush(&mut self) -> Result<(), ProfileError> {
        if self.dirty {
            self.persist().await?;
        }
        Ok(())
    }

    async fn persist(&mut self) -> Result<(), ProfileError> {
        match self.repo.save_profile(&self.profile).await {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                self.dirty = true;
                tracing::warn!(error = %err, "failed to persist profile");
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("profile", &self.profile)
            .field("origin", &self.origin)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
