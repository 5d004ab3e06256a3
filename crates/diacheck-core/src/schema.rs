//! # Schema Module
//!
//! The questionnaire as a static, ordered table.
//!
//! Every field is declared exactly once in [`FIELDS`], together with the
//! exact key the prediction endpoint expects (some contain spaces), the
//! label shown to the user, the kind of answer it takes and the step it
//! belongs to. Table order is the canonical field order: it drives rendering,
//! validation message order and the "earliest invalid step" tie-break.

use serde::{Serialize, Serializer};
use std::fmt;

// =============================================================================
// STEP
// =============================================================================

/// One of the three fixed groupings of fields shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Step {
    /// All steps in navigation order.
    pub const ALL: [Step; 3] = [Step::One, Step::Two, Step::Three];

    /// The step the wizard starts on.
    pub const FIRST: Step = Step::One;

    /// The step holding the submit action.
    pub const LAST: Step = Step::Three;

    /// 1-based step number.
    #[must_use]
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Look up a step by its 1-based number.
    #[must_use]
    pub fn from_number(n: u8) -> Option<Step> {
        match n {
            1 => Some(Step::One),
            2 => Some(Step::Two),
            3 => Some(Step::Three),
            _ => None,
        }
    }

    /// The following step, capped at [`Step::LAST`].
    #[must_use]
    pub fn next(self) -> Step {
        match self {
            Step::One => Step::Two,
            Step::Two | Step::Three => Step::Three,
        }
    }

    /// The preceding step, floored at [`Step::FIRST`].
    #[must_use]
    pub fn prev(self) -> Step {
        match self {
            Step::One | Step::Two => Step::One,
            Step::Three => Step::Two,
        }
    }

    #[must_use]
    pub fn is_last(self) -> bool {
        self == Step::LAST
    }

    /// Heading shown above the step's fields.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Step::One => "Basic Information",
            Step::Two => "Symptoms & Signs",
            Step::Three => "Additional Symptoms",
        }
    }

    /// Fields belonging to this step, in schema order.
    pub fn fields(self) -> impl Iterator<Item = &'static FieldSpec> {
        FIELDS.iter().filter(move |spec| spec.step == self)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

// =============================================================================
// FIELDS
// =============================================================================

/// The kind of answer a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free numeric input, digits only.
    Digits,
    /// Male / Female.
    Gender,
    /// Yes / No.
    YesNo,
}

/// Identifier of a questionnaire field.
///
/// Variant order matches [`FIELDS`]; `Field as usize` indexes the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Age,
    Gender,
    Polyuria,
    Polydipsia,
    SuddenWeightLoss,
    Weakness,
    Polyphagia,
    GenitalThrush,
    VisualBlurring,
    Itching,
    Irritability,
    DelayedHealing,
    PartialParesis,
    MuscleStiffness,
    Alopecia,
    Obesity,
}

/// Static description of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    #[serde(skip)]
    pub field: Field,
    /// Exact JSON key expected by the prediction endpoint.
    pub key: &'static str,
    /// Short human name, used in validation messages.
    pub label: &'static str,
    /// Question shown when asking for the value.
    pub prompt: &'static str,
    pub kind: FieldKind,
    pub step: Step,
}

const fn spec(
    field: Field,
    key: &'static str,
    label: &'static str,
    prompt: &'static str,
    kind: FieldKind,
    step: Step,
) -> FieldSpec {
    FieldSpec {
        field,
        key,
        label,
        prompt,
        kind,
        step,
    }
}

/// The questionnaire, in canonical order. Steps hold 5, 5 and 6 fields.
pub const FIELDS: [FieldSpec; Field::COUNT] = [
    spec(Field::Age, "Age", "Age", "Age", FieldKind::Digits, Step::One),
    spec(Field::Gender, "Gender", "Gender", "Gender", FieldKind::Gender, Step::One),
    spec(
        Field::Polyuria,
        "Polyuria",
        "Polyuria",
        "Polyuria (makes large amounts of urine)",
        FieldKind::YesNo,
        Step::One,
    ),
    spec(
        Field::Polydipsia,
        "Polydipsia",
        "Polydipsia",
        "Polydipsia (excessive thirst)",
        FieldKind::YesNo,
        Step::One,
    ),
    spec(
        Field::SuddenWeightLoss,
        "sudden weight loss",
        "Sudden weight loss",
        "Sudden weight loss",
        FieldKind::YesNo,
        Step::One,
    ),
    spec(Field::Weakness, "weakness", "Weakness", "Weakness", FieldKind::YesNo, Step::Two),
    spec(
        Field::Polyphagia,
        "Polyphagia",
        "Polyphagia",
        "Polyphagia (a feeling of extreme hunger)",
        FieldKind::YesNo,
        Step::Two,
    ),
    spec(
        Field::GenitalThrush,
        "Genital thrush",
        "Genital thrush",
        "Genital thrush (fungal infection)",
        FieldKind::YesNo,
        Step::Two,
    ),
    spec(
        Field::VisualBlurring,
        "visual blurring",
        "Visual blurring",
        "Visual blurring",
        FieldKind::YesNo,
        Step::Two,
    ),
    spec(Field::Itching, "Itching", "Itching", "Itching", FieldKind::YesNo, Step::Two),
    spec(
        Field::Irritability,
        "Irritability",
        "Irritability",
        "Irritability (increased anger)",
        FieldKind::YesNo,
        Step::Three,
    ),
    spec(
        Field::DelayedHealing,
        "delayed healing",
        "Delayed healing",
        "Delayed healing",
        FieldKind::YesNo,
        Step::Three,
    ),
    spec(
        Field::PartialParesis,
        "partial paresis",
        "Partial paresis",
        "Partial paresis",
        FieldKind::YesNo,
        Step::Three,
    ),
    spec(
        Field::MuscleStiffness,
        "muscle stiffness",
        "Muscle stiffness",
        "Muscle stiffness",
        FieldKind::YesNo,
        Step::Three,
    ),
    spec(
        Field::Alopecia,
        "Alopecia",
        "Alopecia",
        "Alopecia (hair loss)",
        FieldKind::YesNo,
        Step::Three,
    ),
    spec(
        Field::Obesity,
        "Obesity",
        "Obesity",
        "Obesity (excessive accumulation of body fat)",
        FieldKind::YesNo,
        Step::Three,
    ),
];

impl Field {
    /// Number of fields in the questionnaire.
    pub const COUNT: usize = 16;

    /// The static descriptor of this field.
    #[must_use]
    pub fn spec(self) -> &'static FieldSpec {
        &FIELDS[self as usize]
    }

    /// Exact JSON key expected by the prediction endpoint.
    #[must_use]
    pub fn key(self) -> &'static str {
        self.spec().key
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        self.spec().kind
    }

    #[must_use]
    pub fn step(self) -> Step {
        self.spec().step
    }

    /// Look up a field by its exact wire key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Field> {
        FIELDS.iter().find(|spec| spec.key == key).map(|spec| spec.field)
    }

    /// All fields in schema order.
    pub fn all() -> impl Iterator<Item = Field> {
        FIELDS.iter().map(|spec| spec.field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

// =============================================================================
// TESTS
// =============================================================================
