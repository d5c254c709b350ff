// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Attribute store: named property slots keyed by member id.
//!
//! A slot either holds its value directly or delegates reads/writes to a
//! registered member (reader / writer id). The store itself never invokes
//! anything; [`AttributeStore::get`] and [`AttributeStore::set`] tell the
//! caller which path to take so the delegated call can run without the store
//! being borrowed.

use crate::dispatch::{MemberId, Variant};
use std::collections::HashMap;

/// One property slot.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSlot {
    pub name: String,
    pub value: Variant,
    /// Member invoked on read (`MemberId::NONE` = direct)
    pub reader: MemberId,
    /// Member invoked on write (`MemberId::NONE` = direct)
    pub writer: MemberId,
}

impl AttributeSlot {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Empty,
            reader: MemberId::NONE,
            writer: MemberId::NONE,
        }
    }
}

/// Outcome of a slot read.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotRead {
    /// Direct slot value
    Value(Variant),
    /// Invoke this reader with no arguments
    Reader(MemberId),
}

/// Outcome of a slot write.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotWrite {
    /// Value stored in the slot
    Stored,
    /// Invoke this writer with the value as sole argument
    Writer(MemberId, Variant),
}

/// Property slots of one object.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    slots: HashMap<MemberId, AttributeSlot>,
    default_member: MemberId,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a direct-access slot. Redeclaring keeps the existing slot.
    pub fn declare(&mut self, name: &str) -> MemberId {
        let id = MemberId::of(name);
        self.slots
            .entry(id)
            .or_insert_with(|| AttributeSlot::new(name));
        id
    }

    /// Declare a slot and make it the object's default member.
    pub fn declare_default(&mut self, name: &str) -> MemberId {
        let id = self.declare(name);
        self.default_member = id;
        id
    }

    /// Route reads of `name` through `reader`.
    pub fn bind_reader(&mut self, name: &str, reader: MemberId) -> MemberId {
        let id = self.declare(name);
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.reader = reader;
        }
        id
    }

    /// Route writes of `name` through `writer`.
    pub fn bind_writer(&mut self, name: &str, writer: MemberId) -> MemberId {
        let id = self.declare(name);
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.writer = writer;
        }
        id
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn slot(&self, id: MemberId) -> Option<&AttributeSlot> {
        self.slots.get(&id)
    }

    /// Read slot `id`; `None` if no such slot.
    pub fn get(&self, id: MemberId) -> Option<SlotRead> {
        self.slots.get(&id).map(|slot| {
            if slot.reader.is_none() {
                SlotRead::Value(slot.value.clone())
            } else {
                SlotRead::Reader(slot.reader)
            }
        })
    }

    /// Write slot `id`; `None` if no such slot.
    pub fn set(&mut self, id: MemberId, value: Variant) -> Option<SlotWrite> {
        let slot = self.slots.get_mut(&id)?;
        if slot.writer.is_none() {
            slot.value = value;
            Some(SlotWrite::Stored)
        } else {
            Some(SlotWrite::Writer(slot.writer, value))
        }
    }

    /// Raw slot value, bypassing any reader.
    pub fn value(&self, id: MemberId) -> Option<&Variant> {
        self.slots.get(&id).map(|slot| &slot.value)
    }

    /// Store into the raw slot, bypassing any writer. Returns false if no slot.
    pub fn store(&mut self, id: MemberId, value: Variant) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.value = value;
                true
            }
            None => false,
        }
    }

    /// Reset every slot value to `Empty`. Bindings are kept.
    pub fn clear(&mut self) {
        for slot in self.slots.values_mut() {
            slot.value = Variant::Empty;
        }
    }

    /// Default member id (`MemberId::NONE` if unset).
    pub fn default_member(&self) -> MemberId {
        self.default_member
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True when every slot holds `Empty`.
    pub fn all_empty(&self) -> bool {
        self.slots.values().all(|slot| slot.value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_slot_round_trip() {
        let mut store = AttributeStore::new();
        let id = store.declare("timeout");
        assert_eq!(store.get(id), Some(SlotRead::Value(Variant::Empty)));
        assert_eq!(store.set(id, Variant::Int(30)), Some(SlotWrite::Stored));
        assert_eq!(store.get(id), Some(SlotRead::Value(Variant::Int(30))));
    }

    #[test]
    fn delegated_slots_report_member() {
        let mut store = AttributeStore::new();
        let reader = MemberId::of("status");
        let writer = MemberId::of("onreadystatechange_W");
        let status = store.bind_reader("status", reader);
        let event = store.bind_writer("onreadystatechange", writer);

        assert_eq!(store.get(status), Some(SlotRead::Reader(reader)));
        assert_eq!(
            store.set(event, Variant::Bool(true)),
            Some(SlotWrite::Writer(writer, Variant::Bool(true)))
        );
        // Write-delegated slots still read directly
        assert_eq!(store.get(event), Some(SlotRead::Value(Variant::Empty)));
        assert!(store.store(event, Variant::Int(1)));
        assert_eq!(store.value(event), Some(&Variant::Int(1)));
    }

    #[test]
    fn unknown_slot() {
        let mut store = AttributeStore::new();
        let id = MemberId::of("missing");
        assert_eq!(store.get(id), None);
        assert_eq!(store.set(id, Variant::Empty), None);
        assert!(!store.store(id, Variant::Empty));
    }

    #[test]
    fn clear_keeps_bindings() {
        let mut store = AttributeStore::new();
        let a = store.declare("a");
        let b = store.bind_reader("b", MemberId::of("b"));
        store.store(a, Variant::from("x"));
        store.store(b, Variant::from("y"));
        store.clear();
        assert!(store.all_empty());
        assert_eq!(store.slot(b).map(|s| s.reader), Some(MemberId::of("b")));
    }

    #[test]
    fn default_member() {
        let mut store = AttributeStore::new();
        assert!(store.default_member().is_none());
        let id = store.declare_default("create");
        assert_eq!(store.default_member(), id);
        assert!(store.contains(id));
    }
}
