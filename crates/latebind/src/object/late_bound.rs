// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Late-bound object core: call-kind routing over a member registry and an
//! attribute store.

use crate::dispatch::{
    DispatchError, DispatchFlags, DispatchResult, MemberId, MemberRegistry, Variant,
};
use crate::object::attributes::{AttributeStore, SlotRead, SlotWrite};
use parking_lot::Mutex;
use std::sync::Arc;

/// Result of routing one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    Value(Variant),
    /// Construct without a default member: the object itself
    This,
}

/// Dispatch state of one object, invoked against the owning handle `R`.
///
/// The attribute lock is never held while a handler runs, so handlers may
/// read and write slots of their own object.
pub struct LateBound<R: 'static> {
    registry: Arc<MemberRegistry<R>>,
    attributes: Mutex<AttributeStore>,
}

impl<R: 'static> LateBound<R> {
    pub fn new(registry: Arc<MemberRegistry<R>>, attributes: AttributeStore) -> Self {
        Self {
            registry,
            attributes: Mutex::new(attributes),
        }
    }

    pub fn class_name(&self) -> &str {
        self.registry.class()
    }

    pub fn registry(&self) -> &MemberRegistry<R> {
        &self.registry
    }

    pub fn default_member(&self) -> MemberId {
        self.attributes.lock().default_member()
    }

    /// Id of `name`; with `verify`, `MemberId::NONE` unless it names a
    /// handler or an attribute.
    pub fn id_of(&self, name: &str, verify: bool) -> MemberId {
        let id = MemberId::of(name);
        if verify && !self.registry.contains(id) && !self.attributes.lock().contains(id) {
            return MemberId::NONE;
        }
        id
    }

    /// Resolve `name` to a known member.
    pub fn resolve(&self, name: &str) -> DispatchResult<MemberId> {
        let id = self.id_of(name, true);
        if id.is_none() {
            log::debug!("{}: unknown name '{}'", self.class_name(), name);
            return Err(DispatchError::UnknownName(name.to_string()));
        }
        Ok(id)
    }

    /// Route one host call.
    ///
    /// Handler failures leave as [`DispatchError::Exception`] records with
    /// this class as their source; lookup failures pass through unchanged.
    pub fn dispatch(
        &self,
        this: &R,
        id: MemberId,
        flags: DispatchFlags,
        args: &mut [Variant],
    ) -> DispatchResult<Dispatched> {
        self.route(this, id, flags, args)
            .map_err(|e| e.into_exception(self.class_name()))
    }

    fn route(
        &self,
        this: &R,
        id: MemberId,
        flags: DispatchFlags,
        args: &mut [Variant],
    ) -> DispatchResult<Dispatched> {
        let construct = flags.contains(DispatchFlags::CONSTRUCT)
            || (id.is_none() && flags.contains(DispatchFlags::METHOD) && args.is_empty());
        if construct {
            let default = self.default_member();
            if default.is_none() {
                return Ok(Dispatched::This);
            }
            return self.registry.invoke(this, default, args).map(Dispatched::Value);
        }

        let is_slot = self.attributes.lock().contains(id);
        if is_slot && flags.contains(DispatchFlags::PROPERTY_GET) {
            return self.get(this, id).map(Dispatched::Value);
        }
        if is_slot && flags.is_put() {
            let value = args.first().cloned().ok_or_else(|| {
                DispatchError::invalid_argument("property write without a value")
            })?;
            return self
                .set(this, id, value)
                .map(|()| Dispatched::Value(Variant::Empty));
        }

        if !is_slot && !self.registry.contains(id) {
            return Err(DispatchError::UnknownMember(id));
        }
        self.registry.invoke(this, id, args).map(Dispatched::Value)
    }

    /// Read attribute `id`, through its reader if one is bound.
    pub fn get(&self, this: &R, id: MemberId) -> DispatchResult<Variant> {
        let read = self.attributes.lock().get(id);
        match read {
            Some(SlotRead::Value(value)) => Ok(value),
            Some(SlotRead::Reader(reader)) => self.registry.invoke(this, reader, &mut []),
            None => Err(DispatchError::UnknownMember(id)),
        }
    }

    /// Write attribute `id`, through its writer if one is bound.
    pub fn set(&self, this: &R, id: MemberId, value: Variant) -> DispatchResult<()> {
        let write = self.attributes.lock().set(id, value);
        match write {
            Some(SlotWrite::Stored) => Ok(()),
            Some(SlotWrite::Writer(writer, value)) => self
                .registry
                .invoke(this, writer, &mut [value])
                .map(|_| ()),
            None => Err(DispatchError::UnknownMember(id)),
        }
    }

    /// Raw slot value of `name` (`Empty` when undeclared).
    pub fn value(&self, name: &str) -> Variant {
        self.attributes
            .lock()
            .value(MemberId::of(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Store into the raw slot of `name`. Returns false if undeclared.
    pub fn store(&self, name: &str, value: impl Into<Variant>) -> bool {
        self.attributes.lock().store(MemberId::of(name), value.into())
    }

    /// Run `f` over the attribute store.
    pub fn with_attributes<T>(&self, f: impl FnOnce(&mut AttributeStore) -> T) -> T {
        f(&mut self.attributes.lock())
    }

    /// Reset every slot to `Empty`.
    pub fn clear(&self) {
        self.attributes.lock().clear();
    }

    /// Reset every slot to `Empty` on an exclusively owned object.
    pub fn reset(&mut self) {
        self.attributes.get_mut().clear();
    }
}
