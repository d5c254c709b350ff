// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounded pool of released objects.
//!
//! Objects handed out by [`ObjectPool::acquire`] come back here when their
//! last [`ObjectRef`] is dropped. The pool resets them and keeps up to
//! `capacity` on a LIFO free list; beyond that, released objects are
//! destroyed.

use crate::object::handle::{ObjectRef, Reclaim, Recyclable};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Pool counters snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Objects constructed because the free list was empty
    pub created: u64,
    /// Acquisitions served from the free list
    pub reused: u64,
    /// Released objects kept for reuse
    pub cached: u64,
    /// Released objects destroyed because the pool was full
    pub destroyed: u64,
    /// Objects currently on the free list
    pub idle: usize,
}

struct FreeNode<T> {
    value: T,
    next: Option<Box<FreeNode<T>>>,
}

/// Singly linked LIFO list.
struct FreeList<T> {
    head: Option<Box<FreeNode<T>>>,
    len: usize,
}

impl<T> FreeList<T> {
    const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    fn push(&mut self, value: T) {
        let next = self.head.take();
        self.head = Some(Box::new(FreeNode { value, next }));
        self.len += 1;
    }

    fn pop(&mut self) -> Option<T> {
        let node = self.head.take()?;
        let FreeNode { value, next } = *node;
        self.head = next;
        self.len -= 1;
        Some(value)
    }
}

impl<T> Drop for FreeList<T> {
    // Iterative, so long lists cannot overflow the stack.
    fn drop(&mut self) {
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

/// Object pool shared by every object of one type.
pub struct ObjectPool<T: Recyclable> {
    capacity: usize,
    free: Mutex<FreeList<T>>,
    me: Weak<ObjectPool<T>>,
    created: AtomicU64,
    reused: AtomicU64,
    cached: AtomicU64,
    destroyed: AtomicU64,
}

impl<T: Recyclable> ObjectPool<T> {
    /// Create a pool keeping at most `capacity` idle objects (0 disables reuse).
    pub fn new(capacity: usize) -> Arc<Self> {
        log::info!("object pool created (capacity={})", capacity);
        Arc::new_cyclic(|me| Self {
            capacity,
            free: Mutex::new(FreeList::new()),
            me: me.clone(),
            created: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            cached: AtomicU64::new(0),
            destroyed: AtomicU64::new(0),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Take an idle object, or build one with `make`.
    ///
    /// The returned reference has a count of 1 and releases back into this
    /// pool.
    pub fn acquire(&self, make: impl FnOnce() -> T) -> ObjectRef<T> {
        let idle = self.free.lock().pop();
        let value = match idle {
            Some(value) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                log::debug!("pool: reusing idle object");
                value
            }
            None => {
                self.created.fetch_add(1, Ordering::Relaxed);
                make()
            }
        };
        let me: Weak<dyn Reclaim<T>> = self.me.clone();
        ObjectRef::with_pool(value, Some(me))
    }

    /// Number of idle objects.
    pub fn idle(&self) -> usize {
        self.free.lock().len
    }

    /// Destroy all idle objects.
    pub fn clear(&self) {
        let list = std::mem::replace(&mut *self.free.lock(), FreeList::new());
        log::debug!("pool: clearing {} idle objects", list.len);
        drop(list);
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            cached: self.cached.load(Ordering::Relaxed),
            destroyed: self.destroyed.load(Ordering::Relaxed),
            idle: self.idle(),
        }
    }
}

impl<T: Recyclable> Reclaim<T> for ObjectPool<T> {
    fn try_cache(&self, mut object: T) -> Result<(), T> {
        if self.capacity == 0 || self.free.lock().len >= self.capacity {
            self.destroyed.fetch_add(1, Ordering::Relaxed);
            return Err(object);
        }
        // reset runs unlocked; the bound is checked again below
        object.reset();

        let mut free = self.free.lock();
        if free.len >= self.capacity {
            drop(free);
            self.destroyed.fetch_add(1, Ordering::Relaxed);
            return Err(object);
        }
        free.push(object);
        drop(free);
        self.cached.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl<T: Recyclable> Drop for ObjectPool<T> {
    fn drop(&mut self) {
        let stats = self.stats();
        log::info!(
            "object pool dropped: created={} reused={} cached={} destroyed={} idle={}",
            stats.created,
            stats.reused,
            stats.cached,
            stats.destroyed,
            stats.idle
        );
    }
}
