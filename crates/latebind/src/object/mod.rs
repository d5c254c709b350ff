// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Late-bound objects: attribute slots, per-class member tables, counted
//! handles and the object pool.
//!
//! A dispatchable type `T` keeps a [`LateBound<ObjectRef<T>>`] built from a
//! shared [`Class`], implements [`Invocable`], and is handed to the host as an
//! [`ObjectRef<T>`]. Releasing the last reference offers the object back to
//! its [`ObjectPool`].

mod attributes;
mod callback;
mod class;
mod handle;
mod late_bound;
mod pool;

pub use attributes::{AttributeSlot, AttributeStore, SlotRead, SlotWrite};
pub use callback::{callback, Callback};
pub use class::{writer_name, Class, ClassBuilder, WRITER_SUFFIX};
pub use handle::{Invocable, ObjectRef, Recyclable};
pub use late_bound::{Dispatched, LateBound};
pub use pool::{ObjectPool, PoolStats};
