//! The configuration value tree.
//!
//! [`ConfigValue`] is a tagged variant so every algorithm in this crate
//! pattern-matches on the node kind instead of probing runtime identity.
//! Two variants carry identity rather than structure:
//!
//! - [`OpaqueNode`]: a live handle (project, component, ...) that must be
//!   copied as a unit. Nothing in this crate looks inside it.
//! - [`SharedNode`]: an aliased, interior-mutable value. It is how callers
//!   build graphs where one value is reachable from several places,
//!   cycles included.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

use super::error::DomainError;
use super::keys::KeyPath;

/// Ordered mapping from string keys to values. Iteration follows insertion
/// order so generated output is deterministic.
pub type Mapping = IndexMap<String, ConfigValue>;

/// A node in a configuration tree.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    /// Explicitly absent. Only meaningful inside merge layers.
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<ConfigValue>),
    Mapping(Mapping),
    Opaque(OpaqueNode),
    Shared(SharedNode),
}

impl ConfigValue {
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Short name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Opaque(_) => "opaque",
            Self::Shared(_) => "shared",
        }
    }

    /// Convert to JSON, failing on opaque nodes and on shared cycles.
    ///
    /// Undefined mapping entries are skipped and undefined sequence elements
    /// become `null`.
    pub fn to_json(&self) -> Result<Value, DomainError> {
        JsonWriter { strict: true }.write(self, &KeyPath::root(), &mut Vec::new())
    }

    /// Convert to JSON without failing.
    ///
    /// Opaque nodes become their label and a shared node that closes a cycle
    /// becomes `null`.
    pub fn to_json_lossy(&self) -> Value {
        JsonWriter { strict: false }
            .write(self, &KeyPath::root(), &mut Vec::new())
            .unwrap_or(Value::Null)
    }
}

/// Structural equality for data, identity for handles.
impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a.ptr_eq(b),
            (Self::Shared(a), Self::Shared(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

struct JsonWriter {
    strict: bool,
}

impl JsonWriter {
    fn write(
        &self,
        value: &ConfigValue,
        path: &KeyPath,
        ancestors: &mut Vec<usize>,
    ) -> Result<Value, DomainError> {
        match value {
            ConfigValue::Undefined | ConfigValue::Null => Ok(Value::Null),
            ConfigValue::Bool(b) => Ok(Value::Bool(*b)),
            ConfigValue::Number(n) => Ok(Value::Number(n.clone())),
            ConfigValue::String(s) => Ok(Value::String(s.clone())),
            ConfigValue::Sequence(items) => items
                .iter()
                .map(|item| self.write(item, path, ancestors))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            ConfigValue::Mapping(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, child) in map {
                    if child.is_undefined() {
                        continue;
                    }
                    out.insert(key.clone(), self.write(child, &path.child(key), ancestors)?);
                }
                Ok(Value::Object(out))
            }
            ConfigValue::Opaque(node) if self.strict => Err(DomainError::OpaqueValue {
                label: node.label().to_string(),
                path: path.to_string(),
            }),
            ConfigValue::Opaque(node) => Ok(Value::String(node.label().to_string())),
            ConfigValue::Shared(node) => {
                if ancestors.contains(&node.id()) {
                    return if self.strict {
                        Err(DomainError::CircularReference {
                            path: path.to_string(),
                        })
                    } else {
                        Ok(Value::Null)
                    };
                }
                ancestors.push(node.id());
                let result = self.write(&node.read(), path, ancestors);
                ancestors.pop();
                result
            }
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for ConfigValue {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<f64> for ConfigValue {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Self::Null, Self::Number)
    }
}

impl From<Mapping> for ConfigValue {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        Self::Sequence(items)
    }
}

impl From<OpaqueNode> for ConfigValue {
    fn from(node: OpaqueNode) -> Self {
        Self::Opaque(node)
    }
}

impl From<SharedNode> for ConfigValue {
    fn from(node: SharedNode) -> Self {
        Self::Shared(node)
    }
}

// ============================================================================
// OpaqueNode
// ============================================================================

/// A value understood only by its identity.
///
/// The payload is never inspected by merge or transform; two nodes are equal
/// only when they point at the same allocation.
#[derive(Clone)]
pub struct OpaqueNode {
    label: Arc<str>,
    handle: Arc<dyn Any + Send + Sync>,
}

impl OpaqueNode {
    pub fn new<T: Any + Send + Sync>(label: impl AsRef<str>, value: T) -> Self {
        Self::from_arc(label, Arc::new(value))
    }

    pub fn from_arc(label: impl AsRef<str>, handle: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            label: Arc::from(label.as_ref()),
            handle,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Borrow the payload if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.handle), Arc::as_ptr(&other.handle))
    }
}

impl fmt::Debug for OpaqueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.label)
    }
}

// ============================================================================
// SharedNode
// ============================================================================

/// An aliased value with interior mutability.
///
/// Cloning a `SharedNode` clones the reference, not the value. A node that
/// contains itself (directly or through children) forms a cycle; such graphs
/// leak unless the caller breaks the cycle with [`SharedNode::replace`].
#[derive(Clone)]
pub struct SharedNode(Arc<RwLock<ConfigValue>>);

impl SharedNode {
    pub fn new(value: impl Into<ConfigValue>) -> Self {
        Self(Arc::new(RwLock::new(value.into())))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ConfigValue> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ConfigValue> {
        self.0.write()
    }

    /// Swap in a new value, returning the old one.
    pub fn replace(&self, value: impl Into<ConfigValue>) -> ConfigValue {
        std::mem::replace(&mut *self.0.write(), value.into())
    }

    /// Insert into the wrapped mapping. No-op when the node holds anything
    /// other than a mapping.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        if let Some(map) = self.0.write().as_mapping_mut() {
            map.insert(key.into(), value.into());
        }
    }

    /// Identity of the underlying allocation.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SharedNode {
    // The payload may reach back to this node; print identity only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.id())
    }
}
