// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Late-bound dispatch: member ids, dynamic values, coercion and invocation.
//!
//! # Overview
//!
//! A host that only knows "invoke member N with these untyped values" talks
//! to native code through the [`Dispatch`] trait:
//!
//! - [`Dispatch::resolve`] maps a member name to its [`MemberId`]
//! - [`Dispatch::invoke`] calls a member with [`Variant`] arguments, as a
//!   method, a property read or a property write (see [`DispatchFlags`])
//!
//! Typed native handlers live in a [`MemberRegistry`]; the coercion layer
//! ([`coerce()`]) converts each dynamic argument to the handler's declared
//! parameter type.

mod class_registry;
pub mod coerce;
mod error;
mod member_id;
mod registry;
mod value;

pub use class_registry::{find_class, list_classes, ClassInfo};
pub use coerce::{coerce, FromVariant, IntoVariant, Out, Param, ParamType, TypeTag};
pub use error::{
    DispatchError, DispatchResult, ExceptionInfo, INVALID_STATE_ERR, UNHANDLED_EXCEPTION,
};
pub use member_id::{member_id, MemberId};
pub use registry::{Function, HandlerEntry, MemberRegistry, Method};
pub use value::{DispatchRef, Variant};

use std::ops::BitOr;

/// Kind of a late-bound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct DispatchFlags(pub u16);

impl DispatchFlags {
    /// Call the member as a method
    pub const METHOD: Self = Self(0x0001);

    /// Read a property
    pub const PROPERTY_GET: Self = Self(0x0002);

    /// Write a property by value
    pub const PROPERTY_PUT: Self = Self(0x0004);

    /// Write a property by reference (treated as `PROPERTY_PUT`)
    pub const PROPERTY_PUT_REF: Self = Self(0x0008);

    /// Construct: the host calls the object itself
    pub const CONSTRUCT: Self = Self(0x4000);

    /// Empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Check if flag is set
    pub const fn contains(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    /// True for `PROPERTY_PUT` or `PROPERTY_PUT_REF`.
    pub const fn is_put(self) -> bool {
        self.contains(Self::PROPERTY_PUT) || self.contains(Self::PROPERTY_PUT_REF)
    }
}

impl BitOr for DispatchFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// An object the host can drive through the late-bound calling convention.
pub trait Dispatch: Send + Sync {
    /// Resolve a member name.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UnknownName`] if the object has no such member.
    fn resolve(&self, name: &str) -> DispatchResult<MemberId>;

    /// Invoke member `id`.
    ///
    /// `MemberId::NONE` addresses the object itself. Output parameters are
    /// written back into `args`.
    fn invoke(
        &self,
        id: MemberId,
        flags: DispatchFlags,
        args: &mut [Variant],
    ) -> DispatchResult<Variant>;

    /// Resolve several names at once; unknown names map to `MemberId::NONE`.
    fn resolve_names(&self, names: &[&str]) -> Vec<MemberId> {
        names
            .iter()
            .map(|name| self.resolve(name).unwrap_or(MemberId::NONE))
            .collect()
    }

    /// Read property `name`.
    fn get(&self, name: &str) -> DispatchResult<Variant> {
        let id = self.resolve(name)?;
        self.invoke(id, DispatchFlags::PROPERTY_GET, &mut [])
    }

    /// Write property `name`.
    fn set(&self, name: &str, value: Variant) -> DispatchResult<()> {
        let id = self.resolve(name)?;
        self.invoke(id, DispatchFlags::PROPERTY_PUT, &mut [value])
            .map(|_| ())
    }

    /// Call method `name`.
    fn call(&self, name: &str, args: &mut [Variant]) -> DispatchResult<Variant> {
        let id = self.resolve(name)?;
        self.invoke(id, DispatchFlags::METHOD, args)
    }

    /// Call the object itself.
    fn construct(&self, args: &mut [Variant]) -> DispatchResult<Variant> {
        self.invoke(MemberId::NONE, DispatchFlags::CONSTRUCT, args)
    }
}
