// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-class member tables, built once and shared by every instance.

use crate::dispatch::{Function, MemberRegistry, Method};
use crate::object::attributes::AttributeStore;
use crate::object::late_bound::LateBound;
use std::sync::Arc;

/// Suffix of the member that handles writes to a delegated property.
pub const WRITER_SUFFIX: &str = "_W";

/// Member name of the writer of property `name`.
pub fn writer_name(name: &str) -> String {
    format!("{}{}", name, WRITER_SUFFIX)
}

/// Builder for a [`Class`].
///
/// ```
/// use latebind::object::ClassBuilder;
///
/// struct Lamp;
///
/// let class = ClassBuilder::<Lamp>::new("Lamp")
///     .method("toggle", |_: &Lamp| Ok(true))
///     .property("color")
///     .build();
/// assert_eq!(class.name(), "Lamp");
/// ```
pub struct ClassBuilder<R: 'static> {
    registry: MemberRegistry<R>,
    attributes: AttributeStore,
}

impl<R: 'static> ClassBuilder<R> {
    pub fn new(name: &str) -> Self {
        Self {
            registry: MemberRegistry::new(name),
            attributes: AttributeStore::new(),
        }
    }

    /// Register a method.
    pub fn method<Args: 'static, M: Method<R, Args>>(mut self, name: &str, method: M) -> Self {
        self.registry.register(name, method);
        self
    }

    /// Register a free function as a member.
    pub fn function<Args: 'static, F: Function<Args>>(mut self, name: &str, function: F) -> Self {
        self.registry.register_fn(name, function);
        self
    }

    /// Register the method called when the host calls the object itself.
    pub fn default_method<Args: 'static, M: Method<R, Args>>(
        mut self,
        name: &str,
        method: M,
    ) -> Self {
        let id = self.registry.register(name, method);
        self.attributes.declare_default(name);
        self.attributes.bind_reader(name, id);
        self
    }

    /// Declare a read/write property stored directly in its slot.
    pub fn property(mut self, name: &str) -> Self {
        self.attributes.declare(name);
        self
    }

    /// Declare a property whose reads go through `reader`.
    ///
    /// The reader is registered under the property's own name.
    pub fn reader<Args: 'static, M: Method<R, Args>>(mut self, name: &str, reader: M) -> Self {
        let id = self.registry.register(name, reader);
        self.attributes.bind_reader(name, id);
        self
    }

    /// Declare a property whose writes go through `writer`.
    ///
    /// The writer is registered as `<name>_W`; reads stay direct.
    pub fn writer<Args: 'static, M: Method<R, Args>>(mut self, name: &str, writer: M) -> Self {
        let id = self.registry.register(&writer_name(name), writer);
        self.attributes.bind_writer(name, id);
        self
    }

    /// Finish the class and record it in the class registry.
    pub fn build(self) -> Class<R> {
        self.registry.publish();
        log::debug!(
            "class '{}' built: {} members, {} attributes",
            self.registry.class(),
            self.registry.len(),
            self.attributes.len()
        );
        Class {
            registry: Arc::new(self.registry),
            template: self.attributes,
        }
    }
}

/// Shared member registry plus the attribute layout of new instances.
pub struct Class<R: 'static> {
    registry: Arc<MemberRegistry<R>>,
    template: AttributeStore,
}

impl<R: 'static> Class<R> {
    pub fn name(&self) -> &str {
        self.registry.class()
    }

    pub fn registry(&self) -> &MemberRegistry<R> {
        &self.registry
    }

    /// Attribute layout every instance starts from.
    pub fn attributes(&self) -> &AttributeStore {
        &self.template
    }

    /// Create the late-bound core of a new instance.
    pub fn instantiate(&self) -> LateBound<R> {
        LateBound::new(Arc::clone(&self.registry), self.template.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{list_classes, MemberId};

    struct Probe;

    #[test]
    fn reader_and_writer_naming() {
        let class = ClassBuilder::<Probe>::new("test_cls_probe")
            .reader("level", |_: &Probe| Ok(3))
            .writer("onchange", |_: &Probe, _v: crate::dispatch::Variant| Ok(()))
            .build();

        let level = class.attributes().slot(MemberId::of("level")).unwrap();
        assert_eq!(level.reader, MemberId::of("level"));
        assert!(level.writer.is_none());

        let onchange = class.attributes().slot(MemberId::of("onchange")).unwrap();
        assert_eq!(onchange.writer, MemberId::of("onchange_W"));
        assert!(onchange.reader.is_none());
        assert!(class.registry().contains(MemberId::of("onchange_W")));

        let info = list_classes()
            .into_iter()
            .find(|c| c.name == "test_cls_probe")
            .unwrap();
        assert_eq!(info.members, vec!["level", "onchange_W"]);
    }

    #[test]
    fn default_method_marks_default_member() {
        let class = ClassBuilder::<Probe>::new("test_cls_default")
            .default_method("create", |_: &Probe| Ok(1))
            .build();
        let instance = class.instantiate();
        assert_eq!(instance.default_member(), MemberId::of("create"));
    }
}
