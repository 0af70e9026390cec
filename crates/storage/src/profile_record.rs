use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wellness_core::model::{Dosha, ScorePercentages, ScoreResult, ScoreTotals, UserProfile};

use crate::repository::StorageError;

/// Key the profile document is stored under.
pub const PROFILE_KEY: &str = "ayurveda-profile";

/// Current layout version written into every record.
pub const PROFILE_RECORD_VERSION: u32 = 1;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Persisted shape of a `ScoreResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResultRecord {
    pub dominant: Dosha,
    pub totals: ScoreTotals,
    pub percentages: ScorePercentages,
    pub computed_at: DateTime<Utc>,
}

impl ScoreResultRecord {
    #[must_use]
    pub fn from_result(result: &ScoreResult) -> Self {
        Self {
            dominant: result.dominant(),
            totals: *result.totals(),
            percentages: *result.percentages(),
            computed_at: result.computed_at(),
        }
    }

    /// Convert the record back into a domain `ScoreResult`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored values are inconsistent.
    pub fn into_result(self) -> Result<ScoreResult, StorageError> {
        ScoreResult::from_persisted(
            self.dominant,
            self.totals,
            self.percentages,
            self.computed_at,
        )
        .map_err(ser)
    }
}

/// Persisted shape of the user profile.
///
/// Mirrors `UserProfile` so the domain type stays free of storage concerns.
/// Documents written by the earlier web version of the quiz share the key:
/// their `completedQuestionnaire` flag is read as `hasCompletedQuiz`, while
/// their `dominantDosha`/`doshaScores` carry no timestamp and are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_result: Option<ScoreResultRecord>,
    #[serde(default, alias = "completedQuestionnaire")]
    pub has_completed_quiz: bool,
    #[serde(default, skip_serializing)]
    pub dominant_dosha: Option<serde_json::Value>,
    #[serde(default, skip_serializing)]
    pub dosha_scores: Option<serde_json::Value>,
}

fn default_version() -> u32 {
    PROFILE_RECORD_VERSION
}

impl ProfileRecord {
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            version: PROFILE_RECORD_VERSION,
            name: profile.name.clone(),
            age: profile.age,
            latest_result: profile.latest_result.as_ref().map(ScoreResultRecord::from_result),
            has_completed_quiz: profile.has_completed_quiz,
            dominant_dosha: None,
            dosha_scores: None,
        }
    }

    /// True for a document that only holds the earlier web version's scores.
    #[must_use]
    pub fn has_legacy_scores_only(&self) -> bool {
        self.latest_result.is_none()
            && (self.dominant_dosha.is_some() || self.dosha_scores.is_some())
    }

    /// Convert the record back into a domain `UserProfile`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for an unknown version or an invalid result.
    pub fn into_profile(self) -> Result<UserProfile, StorageError> {
        if self.version != PROFILE_RECORD_VERSION {
            return Err(StorageError::Serialization(format!(
                "unsupported profile version: {}",
                self.version
            )));
        }
        if self.has_legacy_scores_only() {
            tracing::warn!(
                completed = self.has_completed_quiz,
                "stored profile holds legacy dosha scores without a result; they are dropped"
            );
        }
        let latest_result = self
            .latest_result
            .map(ScoreResultRecord::into_result)
            .transpose()?;
        Ok(UserProfile {
            name: self.name,
            age: self.age,
            latest_result,
            has_completed_quiz: self.has_completed_quiz,
        })
    }
}

/// Encode a profile as the flat JSON document written to the key-value store.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_profile(profile: &UserProfile) -> Result<String, StorageError> {
    serde_json::to_string(&ProfileRecord::from_profile(profile)).map_err(ser)
}

/// Decode a stored JSON document.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed or inconsistent content.
pub fn decode_profile(raw: &str) -> Result<UserProfile, StorageError> {
    serde_json::from_str::<ProfileRecord>(raw)
        .map_err(ser)?
        .into_profile()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_result_json(percent_vata: u8) -> String {
        format!(
            r#"{{
                "version": 1,
                "name": "Asha",
                "latestResult": {{
                    "dominant": "vata",
                    "totals": {{ "vata": 2, "pitta": 1, "kapha": 0 }},
                    "percentages": {{ "vata": {percent_vata}, "pitta": 33, "kapha": 0 }},
                    "computedAt": "2023-11-14T22:13:20Z"
                }},
                "hasCompletedQuiz": true
            }}"#
        )
    }

    #[test]
    fn decodes_camel_case_document() {
        let profile = decode_profile(&stored_result_json(67)).unwrap();
        assert_eq!(profile.name, "Asha");
        assert_eq!(profile.age, None);
        assert!(profile.has_completed_quiz);
        let result = profile.latest_result.unwrap();
        assert_eq!(result.dominant(), Dosha::Vata);
        assert_eq!(result.percentages().vata, 67);
    }

    #[test]
    fn encoded_document_uses_camel_case_keys() {
        let profile = decode_profile(&stored_result_json(67)).unwrap();
        let encoded = encode_profile(&profile).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["hasCompletedQuiz"], true);
        assert_eq!(value["latestResult"]["dominant"], "vata");
        assert!(value.get("age").is_none());
    }

    #[test]
    fn empty_object_is_default_profile() {
        assert_eq!(decode_profile("{}").unwrap(), UserProfile::default());
    }

    #[test]
    fn rejects_out_of_range_percentage() {
        let err = decode_profile(&stored_result_json(250)).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn legacy_web_document_keeps_completion_flag() {
        let legacy = r#"{
            "name": "Asha",
            "age": 29,
            "dominantDosha": "pitta",
            "doshaScores": { "vata": 2, "pitta": 6, "kapha": 2 },
            "completedQuestionnaire": true
        }"#;

        let record: ProfileRecord = serde_json::from_str(legacy).unwrap();
        assert!(record.has_legacy_scores_only());

        let profile = decode_profile(legacy).unwrap();
        assert_eq!(profile.name, "Asha");
        assert_eq!(profile.age, Some(29));
        assert!(profile.has_completed_quiz);
        assert!(profile.latest_result.is_none());

        let encoded = encode_profile(&profile).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["hasCompletedQuiz"], true);
        assert!(value.get("dominantDosha").is_none());
        assert!(value.get("completedQuestionnaire").is_none());
    }

    #[test]
    fn rejects_unknown_dosha_and_version() {
        let unknown = r#"{"latestResult":{"dominant":"agni","totals":{"vata":0,"pitta":0,"kapha":0},"percentages":{"vata":0,"pitta":0,"kapha":0},"computedAt":"2023-11-14T22:13:20Z"}}"#;
        assert!(decode_profile(unknown).is_err());
        assert!(decode_profile(r#"{"version": 9}"#).is_err());
    }
}
