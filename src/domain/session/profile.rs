//! Client demographic profile.
//!
//! A fixed set of keys filled in over time by model-based extraction.
//! The profile is complete exactly when every key holds a value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Demographic information gathered during intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Full name.
    pub name: Option<String>,
    /// Age, as stated.
    pub age: Option<String>,
    /// Gender, as stated.
    pub gender: Option<String>,
    /// Occupation.
    pub occupation: Option<String>,
    /// Preferred language.
    pub language: Option<String>,
    /// Marital status.
    pub marital_status: Option<String>,
}

impl UserProfile {
    /// The fixed key set, in canonical order.
    pub const KEYS: [&'static str; 6] = [
        "name",
        "age",
        "gender",
        "occupation",
        "language",
        "marital_status",
    ];

    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every field holds a value.
    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_some())
    }

    /// Returns the value of a known field, or `None` for unknown keys.
    pub fn field(&self, key: &str) -> Option<Option<&str>> {
        match key {
            "name" => Some(self.name.as_deref()),
            "age" => Some(self.age.as_deref()),
            "gender" => Some(self.gender.as_deref()),
            "occupation" => Some(self.occupation.as_deref()),
            "language" => Some(self.language.as_deref()),
            "marital_status" => Some(self.marital_status.as_deref()),
            _ => None,
        }
    }

    /// First word of the name, once known.
    pub fn first_name(&self) -> Option<&str> {
        self.name.as_deref().and_then(|n| n.split_whitespace().next())
    }

    /// Parses a model reply into a replacement profile.
    ///
    /// The reply must be a JSON object whose key set exactly matches
    /// [`Self::KEYS`], with string-or-null values. Anything else is
    /// rejected so a confused model cannot corrupt the profile.
    pub fn parse_update(reply: &str) -> Option<Self> {
        let map: BTreeMap<String, Option<String>> = serde_json::from_str(reply).ok()?;

        let mut expected: Vec<&str> = Self::KEYS.to_vec();
        expected.sort_unstable();
        let got: Vec<&str> = map.keys().map(String::as_str).collect();
        if got != expected {
            return None;
        }

        let take = |key: &str| map.get(key).cloned().flatten();
        Some(Self {
            name: take("name"),
            age: take("age"),
            gender: take("gender"),
            occupation: take("occupation"),
            language: take("language"),
            marital_status: take("marital_status"),
        })
    }

    fn fields(&self) -> [(&'static str, &Option<String>); 6] {
        [
            ("name", &self.name),
            ("age", &self.age),
            ("gender", &self.gender),
            ("occupation", &self.occupation),
            ("language", &self.language),
            ("marital_status", &self.marital_status),
        ]
    }
}

/// Renders the profile as a JSON object, in canonical key order.
///
/// Used verbatim inside extraction prompts so the model sees the shape
/// it must answer with.
impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.fields().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Some(v) => write!(f, "\"{key}\": \"{}\"", v.replace('"', "\\\""))?,
                None => write!(f, "\"{key}\": null")?,
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_profile() -> UserProfile {
        UserProfile {
            name: Some("Ada Lovelace".into()),
            age: Some("36".into()),
            gender: Some("female".into()),
            occupation: Some("mathematician".into()),
            language: Some("english".into()),
            marital_status: Some("married".into()),
        }
    }

    mod completeness {
        use super::*;

        #[test]
        fn empty_profile_is_incomplete() {
            assert!(!UserProfile::new().is_complete());
        }

        #[test]
        fn all_fields_set_is_complete() {
            assert!(full_profile().is_complete());
        }

        #[test]
        fn one_missing_field_is_incomplete() {
            let profile = UserProfile {
                language: None,
                ..full_profile()
            };
            assert!(!profile.is_complete());
        }
    }

    mod parse_update {
        use super::*;

        #[test]
        fn accepts_exact_key_set() {
            let reply = r#"{"name": "Ada", "age": null, "gender": null,
                "occupation": "engineer", "language": null, "marital_status": null}"#;
            let profile = UserProfile::parse_update(reply).unwrap();
            assert_eq!(profile.name.as_deref(), Some("Ada"));
            assert_eq!(profile.occupation.as_deref(), Some("engineer"));
            assert!(profile.age.is_none());
        }

        #[test]
        fn rejects_missing_key() {
            let reply = r#"{"name": "Ada", "age": null, "gender": null,
                "occupation": null, "language": null}"#;
            assert!(UserProfile::parse_update(reply).is_none());
        }

        #[test]
        fn rejects_extra_key() {
            let reply = r#"{"name": "Ada", "age": null, "gender": null,
                "occupation": null, "language": null, "marital_status": null,
                "mood": "curious"}"#;
            assert!(UserProfile::parse_update(reply).is_none());
        }

        #[test]
        fn rejects_prose() {
            assert!(UserProfile::parse_update("Sure! The user is named Ada.").is_none());
        }

        #[test]
        fn rejects_non_string_values() {
            let reply = r#"{"name": "Ada", "age": 36, "gender": null,
                "occupation": null, "language": null, "marital_status": null}"#;
            assert!(UserProfile::parse_update(reply).is_none());
        }
    }

    mod first_name {
        use super::*;

        #[test]
        fn takes_first_word() {
            assert_eq!(full_profile().first_name(), Some("Ada"));
        }

        #[test]
        fn none_when_unset() {
            assert_eq!(UserProfile::new().first_name(), None);
        }
    }

    #[test]
    fn display_is_valid_json_with_all_keys() {
        let rendered = UserProfile::new().to_string();
        let parsed: BTreeMap<String, Option<String>> =
            serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.len(), UserProfile::KEYS.len());

        // And round-trips through the strict parser.
        assert!(UserProfile::parse_update(&full_profile().to_string()).is_some());
    }

    #[test]
    fn field_lookup_distinguishes_unknown_from_unset() {
        let profile = full_profile();
        assert_eq!(profile.field("name"), Some(Some("Ada Lovelace")));
        assert_eq!(UserProfile::new().field("name"), Some(None));
        assert_eq!(profile.field("favorite_color"), None);
    }
}
