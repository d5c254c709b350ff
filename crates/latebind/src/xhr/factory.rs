// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request factory: the object hosts construct to get a request.
//!
//! Calling the factory itself (its default member `create`) returns a request
//! from the factory's pool, or a new one when the pool is empty. Released
//! requests return to the pool until it holds `pool_capacity` of them.

use crate::config::RuntimeConfig;
use crate::object::{
    Class, ClassBuilder, Invocable, LateBound, ObjectPool, ObjectRef, PoolStats, Recyclable,
};
use crate::xhr::request::{Request, XmlHttpRequest};
use crate::xhr::transport::{NullTransport, Transport};
use std::sync::{Arc, OnceLock};

/// Class name reported by factories.
pub const FACTORY_CLASS_NAME: &str = "XMLHttpRequestFactory";

/// Counted handle to a factory.
pub type Factory = ObjectRef<RequestFactory>;

/// Creates pooled requests sharing one transport and configuration.
pub struct RequestFactory {
    core: LateBound<Factory>,
    pool: Arc<ObjectPool<XmlHttpRequest>>,
    transport: Arc<dyn Transport>,
    config: RuntimeConfig,
}

fn factory_class() -> &'static Class<Factory> {
    static CLASS: OnceLock<Class<Factory>> = OnceLock::new();
    CLASS.get_or_init(|| {
        ClassBuilder::<Factory>::new(FACTORY_CLASS_NAME)
            .default_method("create", |this: &Factory| Ok(this.create()))
            .build()
    })
}

impl RequestFactory {
    /// Factory whose requests run on `transport`.
    pub fn new(transport: Arc<dyn Transport>, config: RuntimeConfig) -> Factory {
        ObjectRef::new(Self {
            core: factory_class().instantiate(),
            pool: ObjectPool::new(config.pool_capacity),
            transport,
            config,
        })
    }

    /// Factory with the null transport and default configuration.
    pub fn with_defaults() -> Factory {
        Self::new(Arc::new(NullTransport), RuntimeConfig::default())
    }

    /// A fresh or recycled request with a reference count of 1.
    pub fn create(&self) -> Request {
        self.pool
            .acquire(|| XmlHttpRequest::new(Arc::clone(&self.transport), &self.config))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }
}

/// Factories are never pooled, so `reset` is never reached.
impl Recyclable for RequestFactory {
    fn reset(&mut self) {}
}

impl Invocable for RequestFactory {
    fn late_bound(&self) -> &LateBound<Factory> {
        &self.core
    }
}
