// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide registry of dispatchable classes.
//!
//! Every class built through [`crate::object::ClassBuilder`] records its name
//! and member list here, so hosts and tools can enumerate what is callable.

use std::sync::RwLock;

/// Metadata about a dispatchable class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// Class name (e.g., "XMLHttpRequest")
    pub name: String,
    /// Registered member names, sorted
    pub members: Vec<String>,
}

static CLASS_REGISTRY: RwLock<Vec<ClassInfo>> = RwLock::new(Vec::new());

/// Register a class, replacing an earlier entry with the same name.
pub(crate) fn register_class(info: ClassInfo) {
    if let Ok(mut registry) = CLASS_REGISTRY.write() {
        match registry.iter_mut().find(|c| c.name == info.name) {
            Some(existing) => *existing = info,
            None => {
                log::debug!("class registry: registered '{}'", info.name);
                registry.push(info);
            }
        }
    }
}

/// List all registered classes.
pub fn list_classes() -> Vec<ClassInfo> {
    CLASS_REGISTRY
        .read()
        .map(|r| r.clone())
        .unwrap_or_default()
}

/// Look up one class by name.
pub fn find_class(name: &str) -> Option<ClassInfo> {
    CLASS_REGISTRY
        .read()
        .ok()
        .and_then(|r| r.iter().find(|c| c.name == name).cloned())
}
