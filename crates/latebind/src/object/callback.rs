// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native closures exposed as callable host objects.

use crate::dispatch::{
    Dispatch, DispatchError, DispatchFlags, DispatchRef, DispatchResult, MemberId, Variant,
};
use std::sync::Arc;

/// A callable object: calling it (member `NONE`) runs the closure.
///
/// Used wherever the host would pass a script function, e.g. as a
/// state-change notification target.
pub struct Callback<F> {
    f: F,
}

impl<F> Callback<F>
where
    F: Fn(&mut [Variant]) -> DispatchResult<Variant> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Wrap into a dynamic object reference.
    pub fn into_dispatch(self) -> DispatchRef {
        Arc::new(self)
    }
}

impl<F> Dispatch for Callback<F>
where
    F: Fn(&mut [Variant]) -> DispatchResult<Variant> + Send + Sync + 'static,
{
    fn resolve(&self, name: &str) -> DispatchResult<MemberId> {
        Err(DispatchError::UnknownName(name.to_string()))
    }

    fn invoke(
        &self,
        id: MemberId,
        flags: DispatchFlags,
        args: &mut [Variant],
    ) -> DispatchResult<Variant> {
        let callable =
            flags.contains(DispatchFlags::METHOD) || flags.contains(DispatchFlags::CONSTRUCT);
        if !id.is_none() || !callable {
            return Err(DispatchError::UnknownMember(id));
        }
        (self.f)(args)
    }
}

/// Shorthand for `Callback::new(f).into_dispatch()`.
pub fn callback<F>(f: F) -> DispatchRef
where
    F: Fn(&mut [Variant]) -> DispatchResult<Variant> + Send + Sync + 'static,
{
    Callback::new(f).into_dispatch()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_self_invocation_runs_closure() {
        let cb = callback(|args| Ok(Variant::Int(args.len() as i64)));
        let r = cb
            .invoke(MemberId::NONE, DispatchFlags::METHOD, &mut [Variant::Empty])
            .unwrap();
        assert_eq!(r, Variant::Int(1));
        assert!(cb
            .invoke(MemberId::of("x"), DispatchFlags::METHOD, &mut [])
            .is_err());
        assert!(cb.resolve("anything").is_err());
    }
}
