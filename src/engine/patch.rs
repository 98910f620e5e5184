//! Field patches for nested entities.
//!
//! A patch is a JSON object. It is screened and decoded as a whole before any
//! field is assigned, so a rejected patch leaves the entity untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::board::{Board, Column, ColumnType, Group, Label, Task};
use crate::shared::error::{BoardError, BoardResult};

/// Fields that can never be changed through a patch: identity, provenance,
/// parent linkage, ordering and nested collections.
const IMMUTABLE_FIELDS: &[&str] = &[
    "createdAt",
    "createdBy",
    "modifiedBy",
    "account",
    "version",
    "boardId",
    "groupId",
    "columnId",
    "taskId",
    "position",
    "groups",
    "columns",
    "tasks",
    "labels",
    "updates",
    "activities",
    "columnValues",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Accept any JSON value that is an object.
    pub fn from_value(value: Value) -> BoardResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(BoardError::validation("patch", "expected a JSON object")),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// How a patchable field decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Non-blank string, trimmed.
    Title,
    /// Any string.
    Text,
    /// String or null.
    OptionalText,
    Flag,
    ColumnType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    OptionalText(Option<String>),
    Flag(bool),
    ColumnType(ColumnType),
}

/// An entity that accepts field patches.
pub trait Patchable {
    /// Mutable fields and their decoding.
    const FIELDS: &'static [(&'static str, FieldType)];

    fn patch_id(&self) -> &str;

    /// Assign one decoded field. Only called with names from `FIELDS`.
    fn assign(&mut self, field: &str, value: FieldValue);
}

/// Screen, decode and apply a patch.
pub fn apply_patch<T: Patchable>(target: &mut T, patch: &Patch) -> BoardResult<()> {
    if patch.is_empty() {
        return Err(BoardError::validation("patch", "patch has no fields"));
    }

    let mut decoded = Vec::with_capacity(patch.0.len());
    for (field, value) in patch.fields() {
        if field == "id" {
            if value.as_str() != Some(target.patch_id()) {
                return Err(BoardError::immutable("id"));
            }
            continue;
        }
        if IMMUTABLE_FIELDS.contains(&field.as_str()) {
            return Err(BoardError::immutable(field.clone()));
        }
        let (name, field_type) = T::FIELDS
            .iter()
            .find(|(name, _)| *name == field.as_str())
            .ok_or_else(|| BoardError::validation(field.clone(), "unknown field"))?;
        decoded.push((*name, decode(name, *field_type, value)?));
    }

    for (name, value) in decoded {
        target.assign(name, value);
    }
    Ok(())
}

fn decode(field: &str, field_type: FieldType, value: &Value) -> BoardResult<FieldValue> {
    let mismatch = |expected: &str| BoardError::validation(field, format!("expected {expected}"));
    match field_type {
        FieldType::Title => {
            let text = value.as_str().ok_or_else(|| mismatch("a string"))?;
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(BoardError::validation(field, "must not be blank"));
            }
            Ok(FieldValue::Text(trimmed.to_string()))
        }
        FieldType::Text => value
            .as_str()
            .map(|text| FieldValue::Text(text.to_string()))
            .ok_or_else(|| mismatch("a string")),
        FieldType::OptionalText => match value {
            Value::Null => Ok(FieldValue::OptionalText(None)),
            Value::String(text) => Ok(FieldValue::OptionalText(Some(text.clone()))),
            _ => Err(mismatch("a string or null")),
        },
        FieldType::Flag => value
            .as_bool()
            .map(FieldValue::Flag)
            .ok_or_else(|| mismatch("a boolean")),
        FieldType::ColumnType => serde_json::from_value(value.clone())
            .map(FieldValue::ColumnType)
            .map_err(|_| mismatch("a known column type")),
    }
}

/// Extract the new value from a column-value patch.
///
/// The only mutable field of a column value is `value`.
pub fn value_patch(patch: &Patch) -> BoardResult<Value> {
    let mut next = None;
    for (field, value) in patch.fields() {
        match field.as_str() {
            "value" => next = Some(value.clone()),
            other if other == "id" || IMMUTABLE_FIELDS.contains(&other) => {
                return Err(BoardError::immutable(other))
            }
            other => return Err(BoardError::validation(other, "unknown field")),
        }
    }
    next.ok_or_else(|| BoardError::validation("value", "missing field"))
}

/// Normalise a display title; blank titles fall back to `default`.
pub fn title_or(value: Option<String>, default: &str) -> String {
    value
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Patchable for Board {
    const FIELDS: &'static [(&'static str, FieldType)] = &[
        ("title", FieldType::Title),
        ("description", FieldType::OptionalText),
        ("isStarred", FieldType::Flag),
    ];

    fn patch_id(&self) -> &str {
        &self.id
    }

    fn assign(&mut self, field: &str, value: FieldValue) {
        match (field, value) {
            ("title", FieldValue::Text(title)) => self.title = title,
            ("description", FieldValue::OptionalText(text)) => self.description = text,
            ("isStarred", FieldValue::Flag(flag)) => self.is_starred = flag,
            _ => {}
        }
    }
}

impl Patchable for Group {
    const FIELDS: &'static [(&'static str, FieldType)] = &[
        ("title", FieldType::Title),
        ("color", FieldType::OptionalText),
    ];

    fn patch_id(&self) -> &str {
        &self.id
    }

    fn assign(&mut self, field: &str, value: FieldValue) {
        match (field, value) {
            ("title", FieldValue::Text(title)) => self.title = title,
            ("color", FieldValue::OptionalText(color)) => self.color = color,
            _ => {}
        }
    }
}

impl Patchable for Column {
    const FIELDS: &'static [(&'static str, FieldType)] = &[
        ("title", FieldType::Title),
        ("type", FieldType::ColumnType),
    ];

    fn patch_id(&self) -> &str {
        &self.id
    }

    fn assign(&mut self, field: &str, value: FieldValue) {
        match (field, value) {
            ("title", FieldValue::Text(title)) => self.title = title,
            ("type", FieldValue::ColumnType(column_type)) => self.column_type = column_type,
            _ => {}
        }
    }
}

impl Patchable for Label {
    const FIELDS: &'static [(&'static str, FieldType)] = &[
        ("name", FieldType::Text),
        ("color", FieldType::OptionalText),
    ];

    fn patch_id(&self) -> &str {
        &self.id
    }

    fn assign(&mut self, field: &str, value: FieldValue) {
        match (field, value) {
            ("name", FieldValue::Text(name)) => self.name = name,
            ("color", FieldValue::OptionalText(color)) => self.color = color,
            _ => {}
        }
    }
}

impl Patchable for Task {
    const FIELDS: &'static [(&'static str, FieldType)] = &[("title", FieldType::Title)];

    fn patch_id(&self) -> &str {
        &self.id
    }

    fn assign(&mut self, field: &str, value: FieldValue) {
        if let ("title", FieldValue::Text(title)) = (field, value) {
            self.title = title;
        }
    }
}
