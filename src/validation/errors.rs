use std::collections::BTreeSet;

use serde_json::Value;

use crate::{
    draft::values::{DraftValues, is_blank},
    schema::field_model::FieldDescriptor,
};

/// Outcome of one verify pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub ok: bool,
    /// First required field, in display order, that has no value.
    pub first_failing: Option<String>,
}

/// Field ids currently flagged invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    invalid: BTreeSet<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set with the result of a fresh verify pass.
    pub fn recompute(&mut self, visible: &[FieldDescriptor], drafts: &DraftValues) -> Verification {
        let (verification, invalid) = check_required(visible, drafts);
        self.invalid = invalid;
        verification
    }

    /// Drop the flag on `field_id` when an edit gave it a real value.
    /// Returns whether a flag was cleared.
    pub fn clear_if_corrected(&mut self, field_id: &str, value: &Value) -> bool {
        if is_blank(value) {
            return false;
        }
        self.invalid.remove(field_id)
    }

    /// Flagged field ids in the order the form displays them.
    pub fn in_display_order<'a>(&self, visible: &'a [FieldDescriptor]) -> Vec<&'a str> {
        visible
            .iter()
            .filter(|f| self.invalid.contains(&f.id))
            .map(|f| f.id.as_str())
            .collect()
    }

    /// Drop flags for fields that are gone or no longer required.
    pub fn retain_required(&mut self, visible: &[FieldDescriptor]) {
        self.invalid
            .retain(|id| visible.iter().any(|f| f.required && &f.id == id));
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.invalid.contains(field_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.invalid.iter()
    }

    pub fn len(&self) -> usize {
        self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invalid.is_empty()
    }

    pub fn clear(&mut self) {
        self.invalid.clear();
    }
}

/// Check every required visible field has a non-null value.
pub fn verify(visible: &[FieldDescriptor], drafts: &DraftValues) -> Verification {
    check_required(visible, drafts).0
}

fn check_required(
    visible: &[FieldDescriptor],
    drafts: &DraftValues,
) -> (Verification, BTreeSet<String>) {
    let mut invalid = BTreeSet::new();
    let mut first_failing = None;

    for field in visible.iter().filter(|f| f.required) {
        if drafts.is_present(&field.id) {
            continue;
        }
        if first_failing.is_none() {
            first_failing = Some(field.id.clone());
        }
        invalid.insert(field.id.clone());
    }

    let verification = Verification {
        ok: invalid.is_empty(),
        first_failing,
    };
    (verification, invalid)
}
