//! # Profile Module
//!
//! The answers collected by the wizard.
//!
//! A [`HealthProfile`] stores one typed [`Answer`] per filled field. Missing
//! answers are simply absent, so "empty" is a single, unambiguous state.
//! Serialization produces the exact payload the prediction endpoint expects:
//! a flat JSON object keyed by wire key, in schema order, with every value a
//! string.

use crate::SchemaError;
use crate::schema::{Field, FieldKind};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// =============================================================================
// ANSWER VALUES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// Parse user input. Accepts the full word or its initial, any case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Gender> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }

    /// Parse user input. Accepts the full word or its initial, any case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<YesNo> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Some(YesNo::Yes),
            "no" | "n" => Some(YesNo::No),
            _ => None,
        }
    }
}

/// A stored answer. The variant always matches the field's [`FieldKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Answer {
    /// Non-empty run of ASCII digits.
    Digits(String),
    Gender(Gender),
    YesNo(YesNo),
}

impl Answer {
    /// The wire representation of the answer.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Answer::Digits(digits) => digits,
            Answer::Gender(gender) => gender.as_str(),
            Answer::YesNo(answer) => answer.as_str(),
        }
    }

    /// Parse raw input for `field`.
    ///
    /// Returns `Ok(None)` when the input is blank (the field becomes empty).
    /// Digits input is sanitized: every non-digit character is dropped.
    fn parse(field: Field, raw: &str) -> Result<Option<Answer>, SchemaError> {
        let invalid = || SchemaError::InvalidValue {
            field: field.key(),
            value: raw.to_string(),
        };
        match field.kind() {
            FieldKind::Digits => {
                let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
                if digits.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Answer::Digits(digits)))
                }
            }
            FieldKind::Gender if raw.trim().is_empty() => Ok(None),
            FieldKind::Gender => Gender::parse(raw)
                .map(|gender| Some(Answer::Gender(gender)))
                .ok_or_else(invalid),
            FieldKind::YesNo if raw.trim().is_empty() => Ok(None),
            FieldKind::YesNo => YesNo::parse(raw)
                .map(|answer| Some(Answer::YesNo(answer)))
                .ok_or_else(invalid),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// HEALTH PROFILE
// =============================================================================

/// The complete set of questionnaire answers forming the request payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthProfile {
    answers: BTreeMap<Field, Answer>,
}

impl HealthProfile {
    /// Create an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A profile with Gender = Male and every symptom = No; only Age is left
    /// empty.
    #[must_use]
    pub fn baseline() -> Self {
        let mut profile = Self::new();
        for field in Field::all() {
            match field.kind() {
                FieldKind::Digits => {}
                FieldKind::Gender => {
                    profile.answers.insert(field, Answer::Gender(Gender::Male));
                }
                FieldKind::YesNo => {
                    profile.answers.insert(field, Answer::YesNo(YesNo::No));
                }
            }
        }
        profile
    }

    /// Overwrite one field from raw input.
    ///
    /// Blank input (or, for Age, input without any digit) clears the field.
    /// Input that is not a valid value for the field leaves it untouched.
    pub fn set(&mut self, field: Field, raw: &str) -> Result<(), SchemaError> {
        match Answer::parse(field, raw)? {
            Some(answer) => {
                self.answers.insert(field, answer);
            }
            None => {
                self.answers.remove(&field);
            }
        }
        Ok(())
    }

    /// Overwrite one field addressed by its wire key.
    pub fn set_key(&mut self, key: &str, raw: &str) -> Result<Field, SchemaError> {
        let field =
            Field::from_key(key).ok_or_else(|| SchemaError::UnknownField(key.to_string()))?;
        self.set(field, raw)?;
        Ok(field)
    }

    pub fn clear(&mut self, field: Field) {
        self.answers.remove(&field);
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&Answer> {
        self.answers.get(&field)
    }

    /// Wire value of a field, or `""` when it is empty.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        self.get(field).map(Answer::as_str).unwrap_or("")
    }

    #[must_use]
    pub fn is_filled(&self, field: Field) -> bool {
        self.answers.contains_key(&field)
    }

    /// True when no field holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// True when every field holds a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.len() == Field::COUNT
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.answers.len()
    }

    /// Filled fields in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &Answer)> {
        self.answers.iter().map(|(field, answer)| (*field, answer))
    }
}

impl Serialize for HealthProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.answers.len()))?;
        for (field, answer) in &self.answers {
            map.serialize_entry(field.key(), answer.as_str())?;
        }
        map.end()
    }
}

/// Accepted JSON shapes for a single answer.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for HealthProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ProfileVisitor)
    }
}

/// Reads answers key by key so every error names the field it is about.
struct ProfileVisitor;

impl<'de> Visitor<'de> for ProfileVisitor {
    type Value = HealthProfile;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of answers keyed by field name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut profile = HealthProfile::new();
        let mut seen = BTreeSet::new();

        while let Some(key) = map.next_key::<String>()? {
            let field = Field::from_key(&key)
                .ok_or_else(|| de::Error::custom(SchemaError::UnknownField(key.clone())))?;
            if !seen.insert(field) {
                return Err(de::Error::custom(format!("duplicate field {key:?}")));
            }

            let text = match map.next_value::<RawAnswer>() {
                Ok(RawAnswer::Text(text)) => text,
                Ok(RawAnswer::Number(n)) => n.to_string(),
                Err(_) => {
                    return Err(de::Error::custom(format!(
                        "invalid value for {key:?}: expected a string or a whole number"
                    )));
                }
            };
            profile.set(field, &text).map_err(de::Error::custom)?;
        }
        Ok(profile)
    }
}

// =============================================================================
// TESTS
// =============================================================================
