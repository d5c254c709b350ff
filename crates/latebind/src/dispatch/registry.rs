// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Member registry and invocation engine.
//!
//! A [`MemberRegistry`] maps [`MemberId`]s to typed native handlers. Handlers
//! are ordinary closures (or fn items); their parameter list is read from the
//! closure signature, so each registration records the declared parameter
//! types and an invoker that coerces the host's arguments in positional order.
//!
//! ```
//! use latebind::dispatch::{MemberRegistry, MemberId, Variant};
//!
//! struct Counter;
//!
//! let mut registry = MemberRegistry::<Counter>::new("Counter");
//! let add = registry.register("add", |_: &Counter, a: i64, b: i64| Ok(a + b));
//!
//! let mut args = [Variant::from("40"), Variant::from(2)];
//! let sum = registry.invoke(&Counter, add, &mut args).unwrap();
//! assert_eq!(sum, Variant::Int(42));
//! assert_eq!(add, MemberId::of("add"));
//! ```

use crate::dispatch::class_registry::{self, ClassInfo};
use crate::dispatch::coerce::{ArgCursor, IntoVariant, Param, ParamType};
use crate::dispatch::{DispatchError, DispatchResult, MemberId, Variant};
use std::collections::HashMap;
use std::fmt;

type Invoker<R> =
    Box<dyn Fn(&R, &mut ArgCursor<'_>) -> DispatchResult<Variant> + Send + Sync + 'static>;

/// A handler bound to an instance of `R` at invocation time.
///
/// Implemented for every `Fn(&R, A1, .., An) -> DispatchResult<Ret>` with up
/// to six [`Param`] arguments.
pub trait Method<R, Args>: Send + Sync + 'static {
    fn params() -> Vec<ParamType>;

    fn call(&self, this: &R, cursor: &mut ArgCursor<'_>) -> DispatchResult<Variant>;
}

/// A free handler that needs no instance.
pub trait Function<Args>: Send + Sync + 'static {
    fn params() -> Vec<ParamType>;

    fn call(&self, cursor: &mut ArgCursor<'_>) -> DispatchResult<Variant>;
}

macro_rules! impl_handler_arity {
    ($($ty:ident $var:ident),*) => {
        impl<R, F, Ret, $($ty,)*> Method<R, ($($ty,)*)> for F
        where
            F: Fn(&R, $($ty),*) -> DispatchResult<Ret> + Send + Sync + 'static,
            Ret: IntoVariant,
            $($ty: Param,)*
        {
            fn params() -> Vec<ParamType> {
                vec![$($ty::param_type()),*]
            }

            #[allow(unused_variables)]
            fn call(&self, this: &R, cursor: &mut ArgCursor<'_>) -> DispatchResult<Variant> {
                $(let $var = $ty::take(cursor)?;)*
                (self)(this, $($var),*).map(IntoVariant::into_variant)
            }
        }

        impl<F, Ret, $($ty,)*> Function<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> DispatchResult<Ret> + Send + Sync + 'static,
            Ret: IntoVariant,
            $($ty: Param,)*
        {
            fn params() -> Vec<ParamType> {
                vec![$($ty::param_type()),*]
            }

            #[allow(unused_variables)]
            fn call(&self, cursor: &mut ArgCursor<'_>) -> DispatchResult<Variant> {
                $(let $var = $ty::take(cursor)?;)*
                (self)($($var),*).map(IntoVariant::into_variant)
            }
        }
    };
}

impl_handler_arity!();
impl_handler_arity!(A1 a1);
impl_handler_arity!(A1 a1, A2 a2);
impl_handler_arity!(A1 a1, A2 a2, A3 a3);
impl_handler_arity!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_handler_arity!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_handler_arity!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);

/// One registered handler.
pub struct HandlerEntry<R> {
    name: String,
    params: Vec<ParamType>,
    invoker: Invoker<R>,
}

impl<R> HandlerEntry<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types, in positional order.
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }
}

impl<R> fmt::Debug for HandlerEntry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Maps member ids to handlers invoked against an `R`.
pub struct MemberRegistry<R> {
    class: String,
    entries: HashMap<MemberId, HandlerEntry<R>>,
}

impl<R: 'static> MemberRegistry<R> {
    /// Create an empty registry for the class `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            entries: HashMap::new(),
        }
    }

    /// Class name, used as the source of exception records.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Register an instance handler under `name`.
    ///
    /// Re-registering a name (or a colliding one) replaces the previous entry.
    pub fn register<Args, M>(&mut self, name: &str, method: M) -> MemberId
    where
        M: Method<R, Args>,
        Args: 'static,
    {
        self.insert(
            name,
            M::params(),
            Box::new(move |this: &R, cursor: &mut ArgCursor<'_>| {
                method.call(this, cursor)
            }),
        )
    }

    /// Register a free handler under `name`.
    ///
    /// Closures may capture their own bound instance.
    pub fn register_fn<Args, F>(&mut self, name: &str, function: F) -> MemberId
    where
        F: Function<Args>,
        Args: 'static,
    {
        self.insert(
            name,
            F::params(),
            Box::new(move |_: &R, cursor: &mut ArgCursor<'_>| function.call(cursor)),
        )
    }

    fn insert(&mut self, name: &str, params: Vec<ParamType>, invoker: Invoker<R>) -> MemberId {
        let id = MemberId::of(name);
        let entry = HandlerEntry {
            name: name.to_string(),
            params,
            invoker,
        };
        if let Some(prev) = self.entries.insert(id, entry) {
            log::debug!(
                "{}: member '{}' ({}) replaced by '{}'",
                self.class,
                prev.name,
                id,
                name
            );
        }
        id
    }

    /// Id of `name`; with `verify`, [`MemberId::NONE`] unless a handler exists.
    pub fn id_of(&self, name: &str, verify: bool) -> MemberId {
        let id = MemberId::of(name);
        if verify && !self.entries.contains_key(&id) {
            MemberId::NONE
        } else {
            id
        }
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Registered name of `id`.
    pub fn name_of(&self, id: MemberId) -> Option<&str> {
        self.entries.get(&id).map(HandlerEntry::name)
    }

    /// Declared parameter types of `id`.
    pub fn params(&self, id: MemberId) -> Option<&[ParamType]> {
        self.entries.get(&id).map(HandlerEntry::params)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered member names, sorted.
    pub fn members(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.values().map(|e| e.name.clone()).collect();
        names.sort();
        names
    }

    /// Invoke the handler at `id` with the host's arguments.
    ///
    /// Arguments are coerced in order; missing trailing arguments take the
    /// parameter type's default. Output parameters are written back into
    /// `args` when the handler succeeds.
    pub fn invoke(&self, this: &R, id: MemberId, args: &mut [Variant]) -> DispatchResult<Variant> {
        let entry = self
            .entries
            .get(&id)
            .ok_or(DispatchError::UnknownMember(id))?;

        let mut cursor = ArgCursor::new(args);
        let result = (entry.invoker)(this, &mut cursor);
        match &result {
            Ok(value) => {
                cursor.finish();
                log::debug!("{}.{}() -> {:?}", self.class, entry.name, value);
            }
            Err(e) => log::debug!("{}.{}() failed: {}", self.class, entry.name, e),
        }
        result
    }

    /// Record this class and its members in the process-wide class registry.
    pub fn publish(&self) {
        class_registry::register_class(ClassInfo {
            name: self.class.clone(),
            members: self.members(),
        });
    }
}

impl<R: 'static> fmt::Debug for MemberRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberRegistry")
            .field("class", &self.class)
            .field("members", &self.members())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::coerce::{Out, TypeTag};
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Default)]
    struct Account {
        balance: AtomicI64,
    }

    fn account_registry() -> MemberRegistry<Account> {
        let mut registry = MemberRegistry::new("Account");
        registry.register("deposit", |this: &Account, amount: i64| {
            Ok(this.balance.fetch_add(amount, Ordering::SeqCst) + amount)
        });
        registry.register("balance", |this: &Account| {
            Ok(this.balance.load(Ordering::SeqCst))
        });
        registry.register("describe", |this: &Account, label: String, out: Out<String>| {
            out.set(format!("{}={}", label, this.balance.load(Ordering::SeqCst)))
        });
        registry
    }

    #[test]
    fn invoke_coerces_text_arguments() {
        let registry = account_registry();
        let account = Account::default();
        let id = registry.id_of("deposit", true);
        let result = registry
            .invoke(&account, id, &mut [Variant::from("15")])
            .unwrap();
        assert_eq!(result, Variant::Int(15));
    }

    #[test]
    fn missing_arguments_take_defaults() {
        let registry = account_registry();
        let account = Account::default();
        let result = registry
            .invoke(&account, MemberId::of("deposit"), &mut [])
            .unwrap();
        assert_eq!(result, Variant::Int(0));
    }

    #[test]
    fn unknown_member_fails() {
        let registry = account_registry();
        let err = registry
            .invoke(&Account::default(), MemberId::of("withdraw"), &mut [])
            .unwrap_err();
        assert_eq!(err, DispatchError::UnknownMember(MemberId::of("withdraw")));
        assert_eq!(registry.id_of("withdraw", true), MemberId::NONE);
        assert_eq!(registry.id_of("withdraw", false), MemberId::of("withdraw"));
    }

    #[test]
    fn out_parameter_reaches_caller() {
        let registry = account_registry();
        let account = Account::default();
        account.balance.store(3, Ordering::SeqCst);
        let mut args = [Variant::from("acct"), Variant::Empty];
        let result = registry
            .invoke(&account, MemberId::of("describe"), &mut args)
            .unwrap();
        assert_eq!(result, Variant::Empty);
        assert_eq!(args[1], Variant::from("acct=3"));

        let err = registry
            .invoke(&account, MemberId::of("describe"), &mut [Variant::from("x")])
            .unwrap_err();
        assert_eq!(err, DispatchError::PointerRequired);
    }

    #[test]
    fn reregistration_overwrites() {
        let mut registry = account_registry();
        registry.register("balance", |_: &Account| Ok("replaced"));
        let value = registry
            .invoke(&Account::default(), MemberId::of("balance"), &mut [])
            .unwrap();
        assert_eq!(value, Variant::from("replaced"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn free_functions_and_introspection() {
        let mut registry = MemberRegistry::<()>::new("Math");
        let id = registry.register_fn("scale", |x: f64, factor: f64| Ok(x * factor));
        assert_eq!(registry.name_of(id), Some("scale"));
        assert_eq!(
            registry.params(id).unwrap(),
            &[ParamType::value(TypeTag::Float), ParamType::value(TypeTag::Float)]
        );
        let v = registry
            .invoke(&(), id, &mut [Variant::Int(3), Variant::from("0.5")])
            .unwrap();
        assert_eq!(v, Variant::Float(1.5));
    }
}
