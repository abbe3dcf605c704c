//! JSON encoding shared by the file store, and shareable definition codes.
//!
//! A definition code is the hex encoding of a cat definition's JSON. Decoding
//! validates the personality before handing the definition back.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use whiskers_core::personality::PersonalityLogic;
use whiskers_data::CatDefinition;

pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {}", e)))
}

/// Encodes a definition as a hex code that can be pasted elsewhere.
pub fn to_definition_code(definition: &CatDefinition) -> Result<String> {
    let json = to_json(definition)?;
    Ok(hex::encode(json.as_bytes()))
}

pub fn from_definition_code(code: &str) -> Result<CatDefinition> {
    let code = code.trim();
    if code.is_empty() {
        return Err(IoError::validation("Empty definition code"));
    }

    let bytes = hex::decode(code)
        .map_err(|e| IoError::validation(format!("Invalid hex encoding: {}", e)))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| IoError::validation(format!("Invalid UTF-8 in code: {}", e)))?;

    let definition: CatDefinition = from_json(&json)?;
    definition.personality.validate()?;
    Ok(definition)
}
