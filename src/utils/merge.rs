use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    #[error("Index {index} out of range for list of length {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Applies a shallow form patch. `null` clears a field, anything else
/// replaces it wholesale (nested objects are not merged).
pub fn merge_fields(base: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        if value.is_null() {
            base.remove(&key);
        } else {
            base.insert(key, value);
        }
    }
}

pub fn replace_at<T>(list: &mut [T], index: usize, value: T) -> Result<T, MergeError> {
    let len = list.len();
    let slot = list
        .get_mut(index)
        .ok_or(MergeError::OutOfRange { index, len })?;
    Ok(std::mem::replace(slot, value))
}

pub fn remove_at<T>(list: &mut Vec<T>, index: usize) -> Result<T, MergeError> {
    if index >= list.len() {
        return Err(MergeError::OutOfRange {
            index,
            len: list.len(),
        });
    }
    Ok(list.remove(index))
}

/// Returns whether the value was appended.
pub fn append_unique<T: PartialEq>(list: &mut Vec<T>, value: T) -> bool {
    if list.contains(&value) {
        return false;
    }
    list.push(value);
    true
}
