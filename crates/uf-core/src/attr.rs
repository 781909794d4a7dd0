//! Typed model of the host's hierarchical per-entity attribute storage.
//!
//! The host persists behavior state in a generic tree of named scalar values.
//! This module gives that tree a typed shape so the poison and knowledge
//! codecs can read and write records without stringly-typed guesswork.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single attribute value: a scalar or a nested tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Str(String),
    Tree(AttrTree),
}

/// Errors raised while decoding a single persisted record.
///
/// Decoding a whole queue or ledger never fails; callers drop the offending
/// record and keep going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttrError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' has the wrong type")]
    WrongType(&'static str),

    #[error("field '{0}' holds a rejected value")]
    RejectedValue(&'static str),
}

/// Ordered tree of named attribute values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrTree {
    entries: BTreeMap<String, AttrValue>,
}

impl AttrTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: AttrValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.set(key, AttrValue::Int(value));
    }

    pub fn set_long(&mut self, key: impl Into<String>, value: i64) {
        self.set(key, AttrValue::Long(value));
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f32) {
        self.set(key, AttrValue::Float(value));
    }

    pub fn set_double(&mut self, key: impl Into<String>, value: f64) {
        self.set(key, AttrValue::Double(value));
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, AttrValue::Bool(value));
    }

    pub fn set_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, AttrValue::Str(value.into()));
    }

    pub fn set_tree(&mut self, key: impl Into<String>, value: AttrTree) {
        self.set(key, AttrValue::Tree(value));
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.entries.get(key) {
            Some(AttrValue::Int(v)) => Some(*v),
            Some(AttrValue::Long(v)) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.entries.get(key) {
            Some(AttrValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(AttrValue::Str(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.entries.get(key) {
            Some(AttrValue::Float(v)) => Some(*v),
            Some(AttrValue::Double(v)) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn get_tree(&self, key: &str) -> Option<&AttrTree> {
        match self.entries.get(key) {
            Some(AttrValue::Tree(v)) => Some(v),
            _ => None,
        }
    }

    /// Numeric accessor lenient about the stored width.
    ///
    /// Legacy records wrote some double fields as floats or ints; any numeric
    /// scalar is accepted here.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.entries.get(key) {
            Some(AttrValue::Double(v)) => Some(*v),
            Some(AttrValue::Float(v)) => Some(f64::from(*v)),
            Some(AttrValue::Int(v)) => Some(f64::from(*v)),
            Some(AttrValue::Long(v)) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
