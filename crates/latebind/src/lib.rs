// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # latebind - late-bound dispatch for native Rust objects
//!
//! Lets a host that only speaks "invoke member N with these untyped values"
//! drive strongly-typed native handlers.
//!
//! ## Quick Start
//!
//! ```rust
//! use latebind::{Dispatch, RequestFactory, Variant};
//!
//! let factory = RequestFactory::with_defaults();
//!
//! // The host constructs the factory to get a request.
//! let Variant::Object(request) = factory.construct(&mut []).unwrap() else {
//!     unreachable!()
//! };
//!
//! // Arguments arrive as text and are coerced to each handler's types.
//! let mut args = [
//!     Variant::from("GET"),
//!     Variant::from("http://host/"),
//!     Variant::from("false"),
//! ];
//! request.call("open", &mut args).unwrap();
//! request.call("send", &mut []).unwrap();
//! assert_eq!(request.get("readyState").unwrap(), Variant::Int(4));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |  host: resolve(name) -> MemberId, invoke(id, flags, args)    |
//! +--------------------------------------------------------------+
//! |  object:   LateBound (attribute slots + member registry)     |
//! |            ObjectRef (counted handle) / ObjectPool (reuse)   |
//! +--------------------------------------------------------------+
//! |  dispatch: MemberRegistry -> coercion -> typed handler       |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`dispatch`] - member ids, [`Variant`], coercion, invocation
//! - [`object`] - attribute store, late-bound objects, handles, pooling
//! - [`xhr`] - the request object and its factory
//! - [`script`] - line-oriented command interpreter
//! - [`config`] - defaults and YAML runtime configuration

pub mod config;
pub mod dispatch;
pub mod object;
pub mod script;
pub mod xhr;

pub use config::{ConfigError, RuntimeConfig};
pub use dispatch::{
    Dispatch, DispatchError, DispatchFlags, DispatchRef, DispatchResult, ExceptionInfo,
    MemberId, MemberRegistry, Out, Variant,
};
pub use object::{ClassBuilder, LateBound, ObjectPool, ObjectRef};
pub use script::Interpreter;
pub use xhr::{ReadyState, Request, RequestFactory, Transport, XmlHttpRequest};
