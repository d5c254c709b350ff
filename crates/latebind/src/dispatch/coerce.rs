// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Argument coercion between [`Variant`] values and native parameter types.
//!
//! Precedence, source value to requested type:
//!
//! 1. identity when the variant already has the requested type;
//! 2. `Out<T>` parameters get a shared slot seeded from the argument and
//!    written back to the caller after the call;
//! 3. text is parsed (locale independent) into the requested type, failing
//!    with [`DispatchError::InvalidArgument`];
//! 4. otherwise numeric/boolean widening or narrowing, with `Empty` standing
//!    in for the requested type's default.

use crate::dispatch::{DispatchError, DispatchRef, DispatchResult, Variant};
use parking_lot::Mutex;
use std::sync::Arc;

/// Native type requested by a handler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Int,
    /// Unsigned 32-bit integer (stored as `Variant::Int`)
    UInt,
    Float,
    Text,
    Object,
    /// Raw variant, passed through untouched
    Any,
}

impl TypeTag {
    /// Default value of the type, substituted for `Empty` and missing arguments.
    pub fn default_value(self) -> Variant {
        match self {
            Self::Bool => Variant::Bool(false),
            Self::Int | Self::UInt => Variant::Int(0),
            Self::Float => Variant::Float(0.0),
            Self::Text => Variant::Text(String::new()),
            Self::Object | Self::Any => Variant::Empty,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Text => "text",
            Self::Object => "object",
            Self::Any => "any",
        }
    }
}

/// Declared type of one handler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamType {
    pub tag: TypeTag,
    /// Output parameter (written back to the caller's slot)
    pub by_ref: bool,
}

impl ParamType {
    pub const fn value(tag: TypeTag) -> Self {
        Self { tag, by_ref: false }
    }

    pub const fn out(tag: TypeTag) -> Self {
        Self { tag, by_ref: true }
    }
}

fn mismatch(value: &Variant, target: TypeTag) -> DispatchError {
    DispatchError::invalid_argument(format!(
        "cannot convert {} '{}' to {}",
        value.type_name(),
        value,
        target.name()
    ))
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    text.parse::<i64>().ok().map(|v| v != 0)
}

fn uint_in_range(value: &Variant, n: i64) -> DispatchResult<Variant> {
    if (0..=i64::from(u32::MAX)).contains(&n) {
        Ok(Variant::Int(n))
    } else {
        Err(mismatch(value, TypeTag::UInt))
    }
}

/// Convert `value` to the representation of `target`.
///
/// The result always has the variant matching `target` (`Int` for `UInt`),
/// except for `Object` and `Any`, where `Empty` stays `Empty`.
pub fn coerce(value: &Variant, target: TypeTag) -> DispatchResult<Variant> {
    use Variant as V;

    match (value, target) {
        (_, TypeTag::Any) => Ok(value.clone()),
        (V::Empty, _) => Ok(target.default_value()),

        // Identity
        (V::Bool(_), TypeTag::Bool)
        | (V::Int(_), TypeTag::Int)
        | (V::Float(_), TypeTag::Float)
        | (V::Text(_), TypeTag::Text)
        | (V::Object(_), TypeTag::Object) => Ok(value.clone()),
        (V::Int(n), TypeTag::UInt) => uint_in_range(value, *n),

        // Text parsing
        (V::Text(s), TypeTag::Bool) => parse_bool(s)
            .map(V::Bool)
            .ok_or_else(|| mismatch(value, target)),
        (V::Text(s), TypeTag::Int) => s
            .trim()
            .parse::<i64>()
            .map(V::Int)
            .map_err(|_| mismatch(value, target)),
        (V::Text(s), TypeTag::UInt) => s
            .trim()
            .parse::<u32>()
            .map(V::from)
            .map_err(|_| mismatch(value, target)),
        (V::Text(s), TypeTag::Float) => s
            .trim()
            .parse::<f64>()
            .map(V::Float)
            .map_err(|_| mismatch(value, target)),

        // Numeric / boolean conversion
        (V::Bool(b), TypeTag::Int | TypeTag::UInt) => Ok(V::Int(i64::from(*b))),
        (V::Bool(b), TypeTag::Float) => Ok(V::Float(if *b { 1.0 } else { 0.0 })),
        (V::Int(n), TypeTag::Bool) => Ok(V::Bool(*n != 0)),
        (V::Int(n), TypeTag::Float) => Ok(V::Float(*n as f64)),
        (V::Float(f), TypeTag::Bool) => Ok(V::Bool(*f != 0.0)),
        (V::Float(f), TypeTag::Int) => Ok(V::Int(f.trunc() as i64)),
        (V::Float(f), TypeTag::UInt) => uint_in_range(value, f.trunc() as i64),
        (V::Bool(_) | V::Int(_) | V::Float(_), TypeTag::Text) => Ok(V::Text(value.to_string())),

        // Objects never convert to scalars and vice versa
        _ => Err(mismatch(value, target)),
    }
}

/// Native types that can be produced from a [`Variant`] argument.
pub trait FromVariant: Sized {
    /// Coercion target for this type
    const TAG: TypeTag;

    fn from_variant(value: &Variant) -> DispatchResult<Self>;
}

/// Native types that can be returned to the host.
pub trait IntoVariant {
    fn into_variant(self) -> Variant;
}

impl<T: Into<Variant>> IntoVariant for T {
    fn into_variant(self) -> Variant {
        self.into()
    }
}

macro_rules! impl_from_variant {
    ($ty:ty, $tag:ident, $accessor:ident) => {
        impl FromVariant for $ty {
            const TAG: TypeTag = TypeTag::$tag;

            fn from_variant(value: &Variant) -> DispatchResult<Self> {
                coerce(value, Self::TAG)?
                    .$accessor()
                    .ok_or_else(|| mismatch(value, Self::TAG))
            }
        }
    };
    ($ty:ty, $tag:ident, $accessor:ident, try_from) => {
        impl FromVariant for $ty {
            const TAG: TypeTag = TypeTag::$tag;

            fn from_variant(value: &Variant) -> DispatchResult<Self> {
                coerce(value, Self::TAG)?
                    .$accessor()
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| mismatch(value, Self::TAG))
            }
        }
    };
}

impl_from_variant!(bool, Bool, as_bool);
impl_from_variant!(i64, Int, as_i64);
impl_from_variant!(f64, Float, as_f64);
impl_from_variant!(i32, Int, as_i64, try_from);
impl_from_variant!(u32, UInt, as_i64, try_from);

impl FromVariant for String {
    const TAG: TypeTag = TypeTag::Text;

    fn from_variant(value: &Variant) -> DispatchResult<Self> {
        match coerce(value, Self::TAG)? {
            Variant::Text(s) => Ok(s),
            _ => Err(mismatch(value, Self::TAG)),
        }
    }
}

impl FromVariant for Variant {
    const TAG: TypeTag = TypeTag::Any;

    fn from_variant(value: &Variant) -> DispatchResult<Self> {
        Ok(value.clone())
    }
}

impl FromVariant for Option<DispatchRef> {
    const TAG: TypeTag = TypeTag::Object;

    fn from_variant(value: &Variant) -> DispatchResult<Self> {
        match coerce(value, Self::TAG)? {
            Variant::Object(obj) => Ok(Some(obj)),
            _ => Ok(None),
        }
    }
}

impl From<()> for Variant {
    fn from(_: ()) -> Self {
        Variant::Empty
    }
}

/// Positional reader over the host's argument slots.
///
/// Parameters past the end of the supplied arguments receive their type's
/// default; surplus arguments are ignored.
pub struct ArgCursor<'a> {
    args: &'a mut [Variant],
    pos: usize,
    write_backs: Vec<(usize, Box<dyn FnOnce() -> Variant>)>,
}

impl<'a> ArgCursor<'a> {
    pub fn new(args: &'a mut [Variant]) -> Self {
        Self {
            args,
            pos: 0,
            write_backs: Vec::new(),
        }
    }

    /// Number of arguments supplied by the host.
    pub fn supplied(&self) -> usize {
        self.args.len()
    }

    fn next_index(&mut self) -> Option<usize> {
        let idx = self.pos;
        self.pos += 1;
        (idx < self.args.len()).then_some(idx)
    }

    /// Take the next argument, or `Empty` when the host supplied fewer.
    pub fn next_value(&mut self) -> Variant {
        match self.next_index() {
            Some(idx) => self.args[idx].clone(),
            None => Variant::Empty,
        }
    }

    /// Copy output-parameter values back into the caller's slots.
    pub(crate) fn finish(self) {
        for (idx, read) in self.write_backs {
            self.args[idx] = read();
        }
    }
}

/// A handler parameter that can be pulled from an [`ArgCursor`].
pub trait Param: Sized {
    fn param_type() -> ParamType;

    fn take(cursor: &mut ArgCursor<'_>) -> DispatchResult<Self>;
}

macro_rules! impl_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Param for $ty {
                fn param_type() -> ParamType {
                    ParamType::value(<$ty as FromVariant>::TAG)
                }

                fn take(cursor: &mut ArgCursor<'_>) -> DispatchResult<Self> {
                    <$ty as FromVariant>::from_variant(&cursor.next_value())
                }
            }
        )*
    };
}

impl_param!(bool, i32, i64, u32, f64, String, Variant, Option<DispatchRef>);

/// Output parameter: the handler writes, the caller's slot receives the value.
pub struct Out<T> {
    slot: Option<Arc<Mutex<T>>>,
}

impl<T> Out<T> {
    /// An output parameter the host did not supply.
    pub fn unbound() -> Self {
        Self { slot: None }
    }

    pub fn is_bound(&self) -> bool {
        self.slot.is_some()
    }

    /// Write the output value.
    ///
    /// # Errors
    ///
    /// [`DispatchError::PointerRequired`] when the host supplied no slot.
    pub fn set(&self, value: T) -> DispatchResult<()> {
        let slot = self.slot.as_ref().ok_or(DispatchError::PointerRequired)?;
        *slot.lock() = value;
        Ok(())
    }

    /// Current value (the coerced input until the handler writes).
    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.slot.as_ref().map(|slot| slot.lock().clone())
    }
}

impl<T> Param for Out<T>
where
    T: FromVariant + Into<Variant> + Clone + Send + 'static,
{
    fn param_type() -> ParamType {
        ParamType::out(T::TAG)
    }

    fn take(cursor: &mut ArgCursor<'_>) -> DispatchResult<Self> {
        let Some(idx) = cursor.next_index() else {
            return Ok(Self::unbound());
        };
        // Empty slots coerce to the type's default.
        let initial = T::from_variant(&cursor.args[idx])?;
        let cell = Arc::new(Mutex::new(initial));
        let shared = Arc::clone(&cell);
        cursor
            .write_backs
            .push((idx, Box::new(move || shared.lock().clone().into())));
        Ok(Self { slot: Some(cell) })
    }
}
