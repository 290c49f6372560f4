//! Load block trees, render data and engine settings from text or disk.

use std::{ffi::OsStr, fs, path::Path};

use serde::de::DeserializeOwned;

use crate::{Block, EngineSettings, Error, Map, Value};

fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })
}

fn parse_json<T: DeserializeOwned>(text: &str, path: Option<&Path>) -> Result<T, Error> {
    serde_json::from_str(text).map_err(|e| Error::from_json(&e, text, path))
}

/// Parse a single block tree from JSON.
pub fn load_block_from_str(text: &str) -> Result<Block, Error> {
    parse_json(text, None)
}

/// Parse a list of root blocks from JSON.
///
/// A single object is accepted as a one-element list.
pub fn load_blocks_from_str(text: &str) -> Result<Vec<Block>, Error> {
    blocks_at(text, None)
}

fn blocks_at(text: &str, path: Option<&Path>) -> Result<Vec<Block>, Error> {
    let value: Value = parse_json(text, path)?;
    let result = match value {
        Value::Array(_) => serde_json::from_value(value),
        _ => serde_json::from_value(value).map(|b: Block| vec![b]),
    };
    result.map_err(|e| Error::Invalid {
        path: path.map(Path::to_path_buf),
        message: e.to_string(),
    })
}

/// Load a block tree (or list of root blocks) from a JSON file.
pub fn load_blocks_from_path(path: &Path) -> Result<Vec<Block>, Error> {
    let text = read(path)?;
    blocks_at(&text, Some(path))
}

/// Parse a render data object from JSON. The root must be an object.
pub fn load_data_from_str(text: &str) -> Result<Map, Error> {
    data_at(text, None)
}

fn data_at(text: &str, path: Option<&Path>) -> Result<Map, Error> {
    match parse_json::<Value>(text, path)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Invalid {
            path: path.map(Path::to_path_buf),
            message: format!("render data must be a JSON object, found {}", kind_of(&other)),
        }),
    }
}

/// Load a render data object from a JSON file.
pub fn load_data_from_path(path: &Path) -> Result<Map, Error> {
    let text = read(path)?;
    data_at(&text, Some(path))
}

/// Load engine settings from a `.ron` or `.json` file.
pub fn load_settings_from_path(path: &Path) -> Result<EngineSettings, Error> {
    let text = read(path)?;
    match path.extension().and_then(OsStr::to_str) {
        Some("ron") => EngineSettings::from_ron_at(&text, Some(path)),
        Some("json") => parse_json(&text, Some(path)),
        _ => Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported settings format (expected a .ron or .json file)".to_string(),
        }),
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
