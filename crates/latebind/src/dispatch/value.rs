// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value type exchanged with the host.

use crate::dispatch::Dispatch;
use std::fmt;
use std::sync::Arc;

/// Shared reference to a late-bound object held by a [`Variant`].
pub type DispatchRef = Arc<dyn Dispatch>;

/// A dynamically-typed value passed across the late-bound boundary.
#[derive(Clone, Default)]
pub enum Variant {
    /// No value (also stands in for the host's null)
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Reference to another late-bound object (callbacks, returned objects)
    Object(DispatchRef),
}

impl Variant {
    /// Check if value is empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as object reference.
    pub fn as_object(&self) -> Option<&DispatchRef> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Name of the variant, used in coercion error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Object(_) => "object",
        }
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Bool(v) => write!(f, "Bool({})", v),
            Self::Int(v) => write!(f, "Int({})", v),
            Self::Float(v) => write!(f, "Float({})", v),
            Self::Text(v) => write!(f, "Text({:?})", v),
            Self::Object(v) => write!(f, "Object({:p})", Arc::as_ptr(v).cast::<()>()),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
            Self::Object(_) => f.write_str("[object]"),
        }
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => {
                std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
            }
            _ => false,
        }
    }
}

// Conversion traits
impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Variant {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<DispatchRef> for Variant {
    fn from(v: DispatchRef) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_values() {
        let v = Variant::from(42i32);
        assert_eq!(v.as_i64(), Some(42));
        assert_eq!(v.as_bool(), None);

        let v = Variant::from(std::f64::consts::PI);
        assert_eq!(v.as_f64(), Some(std::f64::consts::PI));

        let v = Variant::from("hello");
        assert_eq!(v.as_str(), Some("hello"));
        assert_eq!(v.to_string(), "hello");
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Variant::default().is_empty());
        assert_eq!(Variant::from(None::<i64>), Variant::Empty);
        assert_eq!(Variant::Empty.to_string(), "");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Variant::Int(1).type_name(), "int");
        assert_eq!(Variant::Text(String::new()).type_name(), "text");
        assert_ne!(Variant::Int(1), Variant::Float(1.0));
    }
}
