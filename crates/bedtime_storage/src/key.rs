//! Run-scoped artifact keys.

use crate::extension_for;
use bedtime_error::{BedtimeResult, StorageError, StorageErrorKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Location of one artifact inside the durable store.
///
/// Renders as `{date}/{run_id}/{name}.{ext}`, so every object a run writes
/// sits under a prefix that contains exactly that run's id.
///
/// # Examples
///
/// ```
/// use bedtime_storage::ArtifactKey;
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let run_id = Uuid::nil();
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let key = ArtifactKey::new(date, run_id, "scene_3", "image/png").unwrap();
///
/// assert_eq!(
///     key.to_string(),
///     "2024-05-01/00000000-0000-0000-0000-000000000000/scene_3.png"
/// );
/// assert_eq!(key.name(), "scene_3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactKey {
    date: NaiveDate,
    run_id: Uuid,
    name: String,
    extension: String,
}

impl ArtifactKey {
    /// Build a key for artifact `name` of the given MIME type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the name is empty or contains anything other
    /// than ASCII alphanumerics, `_` or `-`.
    pub fn new(date: NaiveDate, run_id: Uuid, name: &str, mime: &str) -> BedtimeResult<Self> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::new(StorageErrorKind::InvalidKey(format!(
                "artifact name '{}' must be non-empty and use only [A-Za-z0-9_-]",
                name
            )))
            .into());
        }

        Ok(Self {
            date,
            run_id,
            name: name.to_string(),
            extension: extension_for(mime).to_string(),
        })
    }

    /// The logical artifact name (without extension).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The run that owns this artifact.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The partition date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The `{date}/{run_id}/` prefix shared by every artifact of the run.
    pub fn run_prefix(&self) -> String {
        format!("{}/{}/", self.date.format("%Y-%m-%d"), self.run_id)
    }
}

impl std::fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}.{}", self.run_prefix(), self.name, self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()
    }

    #[test]
    fn test_key_contains_run_id() {
        let run_id = Uuid::new_v4();
        let key = ArtifactKey::new(date(), run_id, "story_audio", "audio/wav").unwrap();
        let rendered = key.to_string();
        assert!(rendered.contains(&run_id.to_string()));
        assert!(rendered.starts_with("2025-01-09/"));
        assert!(rendered.ends_with("/story_audio.wav"));
    }

    #[test]
    fn test_rejects_path_traversal() {
        let result = ArtifactKey::new(date(), Uuid::new_v4(), "../etc/passwd", "image/png");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(ArtifactKey::new(date(), Uuid::new_v4(), "", "image/png").is_err());
    }
}
