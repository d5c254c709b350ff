// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reference-counted object handles with a cache-or-destroy release path.
//!
//! [`ObjectRef`] is the counted reference a host holds. Cloning adds a
//! reference, dropping releases one. When the last reference goes away the
//! object is offered to the pool it came from; only if the pool declines (or
//! is gone) is the object destroyed. Exactly one of the two happens.

use crate::dispatch::{Dispatch, DispatchFlags, DispatchRef, DispatchResult, MemberId, Variant};
use crate::object::late_bound::{Dispatched, LateBound};
use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::sync::{Arc, Weak};

/// Objects that can be reset for reuse.
pub trait Recyclable: Send + Sync + 'static {
    /// Return the object to its freshly-created state.
    fn reset(&mut self);
}

/// Objects exposed to the host through their late-bound core.
pub trait Invocable: Recyclable + Sized {
    fn late_bound(&self) -> &LateBound<ObjectRef<Self>>;
}

/// Destination of objects whose last reference was released.
pub(crate) trait Reclaim<T>: Send + Sync {
    /// Keep `object` for reuse, or hand it back to be destroyed.
    fn try_cache(&self, object: T) -> Result<(), T>;
}

pub(crate) struct Detached<T> {
    value: T,
    pool: Option<Weak<dyn Reclaim<T>>>,
}

impl<T> Detached<T> {
    fn release(self) {
        let Some(pool) = self.pool.as_ref().and_then(Weak::upgrade) else {
            log::debug!("release: no pool, destroying object");
            return;
        };
        match pool.try_cache(self.value) {
            Ok(()) => log::debug!("release: object cached"),
            Err(value) => {
                log::debug!("release: pool declined, destroying object");
                drop(value);
            }
        }
    }
}

/// Counted reference to a `T`.
pub struct ObjectRef<T: Recyclable> {
    inner: ManuallyDrop<Arc<Detached<T>>>,
}

impl<T: Recyclable> ObjectRef<T> {
    /// Wrap a new object with a reference count of 1 and no pool.
    pub fn new(value: T) -> Self {
        Self::with_pool(value, None)
    }

    pub(crate) fn with_pool(value: T, pool: Option<Weak<dyn Reclaim<T>>>) -> Self {
        Self {
            inner: ManuallyDrop::new(Arc::new(Detached { value, pool })),
        }
    }

    /// Current number of references.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// True when both handles reference the same object.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// True when the object returns to a live pool on release.
    pub fn is_pooled(&self) -> bool {
        self.inner
            .pool
            .as_ref()
            .is_some_and(|pool| pool.strong_count() > 0)
    }
}

impl<T: Invocable> ObjectRef<T> {
    /// Hand this reference to the host as a dynamic object.
    pub fn into_dispatch(self) -> DispatchRef {
        Arc::new(self)
    }
}

impl<T: Recyclable> Clone for ObjectRef<T> {
    fn clone(&self) -> Self {
        let inner = Arc::clone(&self.inner);
        log::debug!("add_ref: count={}", Arc::strong_count(&inner));
        Self {
            inner: ManuallyDrop::new(inner),
        }
    }
}

impl<T: Recyclable> Drop for ObjectRef<T> {
    fn drop(&mut self) {
        // SAFETY: `inner` is taken exactly once, here, and `self` is not
        // used afterwards.
        let inner = unsafe { ManuallyDrop::take(&mut self.inner) };
        log::debug!("release: count={}", Arc::strong_count(&inner) - 1);
        if let Some(detached) = Arc::into_inner(inner) {
            detached.release();
        }
    }
}

impl<T: Recyclable> Deref for ObjectRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner.value
    }
}

impl<T: Recyclable + fmt::Debug> fmt::Debug for ObjectRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("refs", &self.ref_count())
            .field("value", &self.inner.value)
            .finish()
    }
}

impl<T: Invocable> Dispatch for ObjectRef<T> {
    fn resolve(&self, name: &str) -> DispatchResult<MemberId> {
        self.late_bound().resolve(name)
    }

    fn invoke(
        &self,
        id: MemberId,
        flags: DispatchFlags,
        args: &mut [Variant],
    ) -> DispatchResult<Variant> {
        match self.late_bound().dispatch(self, id, flags, args)? {
            Dispatched::Value(value) => Ok(value),
            Dispatched::This => Ok(Variant::Object(self.clone().into_dispatch())),
        }
    }
}

impl<T: Invocable> From<ObjectRef<T>> for Variant {
    fn from(object: ObjectRef<T>) -> Self {
        Variant::Object(object.into_dispatch())
    }
}
