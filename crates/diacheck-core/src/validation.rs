//! # Validation Module
//!
//! Required-field checks, one step at a time.
//!
//! Every field of the questionnaire is required. The validators are pure:
//! they read a [`HealthProfile`] and return the missing fields of a step as
//! [`ValidationErrors`], in schema order. Steps are checked 1 before 2
//! before 3, which makes [`first_invalid_step`] the canonical "where to send
//! the user back to" answer on submit.

use crate::profile::HealthProfile;
use crate::schema::{Field, Step};
use serde::Serialize;
use std::collections::BTreeMap;

/// Field → human-readable message. Iterates in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Drop the error for one field, returning its message if there was one.
    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.errors.remove(&field)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Add every entry of `other`, keeping existing messages.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.errors {
            self.errors.entry(field).or_insert(message);
        }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Entries in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// Fields with an error, in schema order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    /// The earliest step holding one of these errors.
    #[must_use]
    pub fn first_step(&self) -> Option<Step> {
        self.errors.keys().map(|field| field.step()).min()
    }
}

/// Message recorded for a missing field.
#[must_use]
pub fn required_message(field: Field) -> String {
    format!("{} is required", field.label())
}

/// Errors for the required fields of `step` that have no value.
#[must_use]
pub fn errors_for_step(step: Step, profile: &HealthProfile) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for spec in step.fields() {
        if !profile.is_filled(spec.field) {
            errors.insert(spec.field, required_message(spec.field));
        }
    }
    errors
}

/// Union of [`errors_for_step`] over all steps.
#[must_use]
pub fn errors_for_all_steps(profile: &HealthProfile) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for step in Step::ALL {
        errors.merge(errors_for_step(step, profile));
    }
    errors
}

/// The first step, in navigation order, with a missing field.
#[must_use]
pub fn first_invalid_step(profile: &HealthProfile) -> Option<Step> {
    Step::ALL
        .into_iter()
        .find(|step| !errors_for_step(*step, profile).is_empty())
}

// =============================================================================
// TESTS
// =============================================================================
