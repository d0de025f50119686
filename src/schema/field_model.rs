use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::identity::storage_key::FormIdentity;

const DEFAULT_SUBMIT_LABEL: &str = "Submit";

/// A single table field as supplied by the field provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, rename = "isComputed")]
    pub is_computed: bool,

    #[serde(default, rename = "isLookup")]
    pub is_lookup: bool,
}

impl FieldDescriptor {
    pub fn new(id: &str, required: bool) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            required,
            is_computed: false,
            is_lookup: false,
        }
    }

    /// Computed and lookup fields are derived by the table and never shown on a form.
    pub fn is_visible(&self) -> bool {
        !self.is_computed && !self.is_lookup
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewOptions {
    #[serde(default, rename = "coverUrl")]
    pub cover_url: Option<String>,

    #[serde(default, rename = "logoUrl")]
    pub logo_url: Option<String>,

    #[serde(default, rename = "submitLabel")]
    pub submit_label: Option<String>,
}

impl ViewOptions {
    pub fn submit_label_or_default(&self) -> &str {
        self.submit_label
            .as_deref()
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(DEFAULT_SUBMIT_LABEL)
    }
}

/// Read-only view metadata for a form view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewMetadata {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, rename = "columnMeta")]
    pub column_meta: HashMap<String, ColumnMeta>,

    #[serde(default)]
    pub options: ViewOptions,
}

/// Everything the provider hands to a form session: identity, ordered fields
/// and view metadata. Loadable from YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default, rename = "tableId")]
    pub table_id: Option<String>,

    #[serde(default, rename = "viewId")]
    pub view_id: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    #[serde(default)]
    pub view: ViewMetadata,
}

impl FormSchema {
    pub fn identity(&self) -> FormIdentity {
        FormIdentity::new(self.table_id.as_deref(), self.view_id.as_deref())
    }

    /// Visible fields in provider order, with `required` taken from the view's
    /// column metadata when the view lists the field.
    pub fn resolved_fields(&self) -> Vec<FieldDescriptor> {
        visible_fields(&self.fields)
            .into_iter()
            .map(|mut field| {
                if let Some(meta) = self.view.column_meta.get(&field.id) {
                    field.required = meta.required;
                }
                field
            })
            .collect()
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// Fields eligible for display and validation, order preserved.
pub fn visible_fields(fields: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
    fields.iter().filter(|f| f.is_visible()).cloned().collect()
}
