use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::Priority;

/// Criticality tier of a checklist field; drives both its weight class and
/// the priority of the recommendation emitted when it is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Critical,
    High,
    Medium,
    Low,
}

impl From<Criticality> for Priority {
    fn from(tier: Criticality) -> Self {
        match tier {
            Criticality::Critical => Priority::Critical,
            Criticality::High => Priority::High,
            Criticality::Medium => Priority::Medium,
            Criticality::Low => Priority::Low,
        }
    }
}

/// One weighted completeness check in the structured-profile audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistField {
    /// Stable identifier matching the observed-field map key.
    pub id: String,
    /// Phrase-pack key prefix for the incomplete-field recommendation.
    pub phrase_key: String,
    /// Positive share of the total score this field carries.
    pub weight: u32,
    pub tier: Criticality,
}

impl ChecklistField {
    pub fn new(
        id: impl Into<String>,
        phrase_key: impl Into<String>,
        weight: u32,
        tier: Criticality,
    ) -> Self {
        Self {
            id: id.into(),
            phrase_key: phrase_key.into(),
            weight,
            tier,
        }
    }
}

/// A field evaluated against an observed profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub field: ChecklistField,
    pub completed: bool,
    pub observed: Value,
}

/// Errors emitted while validating a checklist definition.
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChecklistValidationError {
    #[error("checklist must contain at least one field")]
    Empty,
    #[error("duplicate checklist field id `{id}`")]
    DuplicateId { id: String },
    #[error("checklist field `{id}` weight must be > 0")]
    ZeroWeight { id: String },
}

/// Ordered checklist definition. Order is evaluation order, which in turn
/// fixes recommendation order within a priority tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    fields: Vec<ChecklistField>,
}

impl Checklist {
    pub fn new(fields: Vec<ChecklistField>) -> Result<Self, ChecklistValidationError> {
        if fields.is_empty() {
            return Err(ChecklistValidationError::Empty);
        }
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.id.clone()) {
                return Err(ChecklistValidationError::DuplicateId {
                    id: field.id.clone(),
                });
            }
            if field.weight == 0 {
                return Err(ChecklistValidationError::ZeroWeight {
                    id: field.id.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// The built-in local-business listing checklist: identity fields carry
    /// the highest weights, enrichment fields mid, cosmetic fields lowest.
    pub fn listing() -> Self {
        Self::new(vec![
            ChecklistField::new("name", "checklist.name", 10, Criticality::Critical),
            ChecklistField::new("address", "checklist.address", 10, Criticality::Critical),
            ChecklistField::new("phone", "checklist.phone", 9, Criticality::Critical),
            ChecklistField::new(
                "primary_category",
                "checklist.primary_category",
                8,
                Criticality::High,
            ),
            ChecklistField::new("website", "checklist.website", 7, Criticality::High),
            ChecklistField::new("hours", "checklist.hours", 7, Criticality::High),
            ChecklistField::new(
                "description",
                "checklist.description",
                6,
                Criticality::Medium,
            ),
            ChecklistField::new("photos", "checklist.photos", 5, Criticality::Medium),
            ChecklistField::new("attributes", "checklist.attributes", 3, Criticality::Low),
            ChecklistField::new("logo", "checklist.logo", 2, Criticality::Low),
        ])
        .expect("built-in checklist is valid")
    }

    pub fn fields(&self) -> &[ChecklistField] {
        &self.fields
    }

    pub fn total_weight(&self) -> u64 {
        self.fields.iter().map(|field| u64::from(field.weight)).sum()
    }

    /// Evaluate every field against the observed values, in definition
    /// order. Missing map entries count as incomplete.
    pub fn evaluate(&self, observed: &BTreeMap<String, Value>) -> Vec<ChecklistItem> {
        self.fields
            .iter()
            .map(|field| {
                let value = observed.get(&field.id).cloned().unwrap_or(Value::Null);
                ChecklistItem {
                    completed: is_complete(&value),
                    observed: value,
                    field: field.clone(),
                }
            })
            .collect()
    }
}

/// Observed profile for the completeness-audit variant: the field map plus
/// the engagement metrics the threshold rules look at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingProfile {
    pub fields: BTreeMap<String, Value>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
}

/// A field counts as completed when its observed value carries substance:
/// non-blank text, a non-empty list or object, any number, `true`.
fn is_complete(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(_) => true,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
