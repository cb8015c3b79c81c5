//! Filesystem diffs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, VmError};

const CREATE_NOT_OBJECT: &str = "Invalid diff object: expected diff.create to be an object.";
const DESTROY_NOT_ARRAY: &str = "Invalid diff object: expected diff.destroy to be an array.";

/// Files to create or overwrite, then paths to delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsDiff {
    pub create: BTreeMap<String, String>,
    pub destroy: Vec<String>,
}

impl FsDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite `path`.
    pub fn create(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.create.insert(path.into(), contents.into());
        self
    }

    /// Delete `path`.
    pub fn destroy(mut self, path: impl Into<String>) -> Self {
        self.destroy.push(path.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.destroy.is_empty()
    }

    /// Validate an untyped diff. `create` must be an object of strings and
    /// `destroy` an array of strings.
    pub fn from_value(value: &Value) -> Result<Self> {
        let create = value
            .get("create")
            .and_then(Value::as_object)
            .ok_or_else(|| VmError::Validation(CREATE_NOT_OBJECT.into()))?;
        let destroy = value
            .get("destroy")
            .and_then(Value::as_array)
            .ok_or_else(|| VmError::Validation(DESTROY_NOT_ARRAY.into()))?;

        let create = create
            .iter()
            .map(|(path, contents)| {
                contents
                    .as_str()
                    .map(|c| (path.clone(), c.to_string()))
                    .ok_or_else(|| VmError::Validation(CREATE_NOT_OBJECT.into()))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        let destroy = destroy
            .iter()
            .map(|path| {
                path.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| VmError::Validation(DESTROY_NOT_ARRAY.into()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { create, destroy })
    }
}

impl TryFrom<Value> for FsDiff {
    type Error = VmError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}
