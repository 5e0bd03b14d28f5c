//! Name-projection views over a multi-valued property store.
//!
//! A resource stores its properties keyed by full predicate IRI. The views here
//! let callers address those properties differently:
//!
//! - [`ShortcutProperties`] resolves short names (`ex:name`, `name`) through a
//!   [`Context`] before touching the IRI-keyed store.
//! - [`SingularProperties`] exposes the first value of each sequence instead of
//!   the whole sequence.
//!
//! Both are thin wrappers around anything implementing [`PropertyRead`] and
//! [`PropertyWrite`], so they compose: `SingularProperties<ShortcutProperties<_>>`
//! is the singular view by short name.

use crate::context::Context;
use crate::errors::{Access, ShortcutError};
use anyhow::{Error, Result};
use indexmap::IndexMap;

/// Read access to a multi-valued property store.
pub trait PropertyRead {
    type Value;

    /// The sequence stored under `key`; empty if there is none.
    fn get_all(&self, key: &str) -> Result<&[Self::Value]>;

    /// Names this view reports.
    fn names(&self) -> Vec<String>;

    /// Whether the sequence under `key` is non-empty. Fails where
    /// [`PropertyRead::get_all`] fails.
    fn has(&self, key: &str) -> Result<bool> {
        Ok(!self.get_all(key)?.is_empty())
    }
}

/// Write access to a multi-valued property store.
pub trait PropertyWrite: PropertyRead {
    /// The sequence stored under `key`, created empty if absent.
    fn get_all_mut(&mut self, key: &str) -> Result<&mut Vec<Self::Value>>;

    /// Replaces the sequence stored under `key`.
    fn set_all(&mut self, key: &str, values: Vec<Self::Value>) -> Result<()>;
}

impl<T> PropertyRead for IndexMap<String, Vec<T>> {
    type Value = T;

    fn get_all(&self, key: &str) -> Result<&[T]> {
        Ok(self.get(key).map(Vec::as_slice).unwrap_or(&[]))
    }

    fn names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

impl<T> PropertyWrite for IndexMap<String, Vec<T>> {
    fn get_all_mut(&mut self, key: &str) -> Result<&mut Vec<T>> {
        Ok(self.entry(key.to_string()).or_default())
    }

    fn set_all(&mut self, key: &str, values: Vec<T>) -> Result<()> {
        self.insert(key.to_string(), values);
        Ok(())
    }
}

impl<M: PropertyRead + ?Sized> PropertyRead for &M {
    type Value = M::Value;

    fn get_all(&self, key: &str) -> Result<&[M::Value]> {
        (**self).get_all(key)
    }

    fn names(&self) -> Vec<String> {
        (**self).names()
    }
}

impl<M: PropertyRead + ?Sized> PropertyRead for &mut M {
    type Value = M::Value;

    fn get_all(&self, key: &str) -> Result<&[M::Value]> {
        (**self).get_all(key)
    }

    fn names(&self) -> Vec<String> {
        (**self).names()
    }
}

impl<M: PropertyWrite + ?Sized> PropertyWrite for &mut M {
    fn get_all_mut(&mut self, key: &str) -> Result<&mut Vec<M::Value>> {
        (**self).get_all_mut(key)
    }

    fn set_all(&mut self, key: &str, values: Vec<M::Value>) -> Result<()> {
        (**self).set_all(key, values)
    }
}

/// Exposes an IRI-keyed store under context-resolved short names.
///
/// Reading or writing a name the context disables fails with a
/// [`ShortcutError`]; [`PropertyRead::names`] silently leaves such names out.
pub struct ShortcutProperties<'c, M> {
    target: M,
    context: &'c Context,
}

impl<'c, M> ShortcutProperties<'c, M> {
    pub fn new(target: M, context: &'c Context) -> Self {
        ShortcutProperties { target, context }
    }

    pub fn into_inner(self) -> M {
        self.target
    }

    fn resolve(&self, key: &str, access: Access) -> Result<String> {
        self.context.expand_term(key, true).ok_or_else(|| {
            Error::new(ShortcutError {
                key: key.to_string(),
                access,
            })
        })
    }
}

impl<'c, M: PropertyRead> PropertyRead for ShortcutProperties<'c, M> {
    type Value = M::Value;

    fn get_all(&self, key: &str) -> Result<&[M::Value]> {
        let iri = self.resolve(key, Access::Get)?;
        self.target.get_all(&iri)
    }

    /// Every stored key holding a non-empty sequence, in expanded form.
    fn names(&self) -> Vec<String> {
        self.target
            .names()
            .into_iter()
            .filter_map(|key| self.context.expand_term(&key, true))
            .filter(|key| matches!(self.has(key), Ok(true)))
            .collect()
    }
}

impl<'c, M: PropertyWrite> PropertyWrite for ShortcutProperties<'c, M> {
    fn get_all_mut(&mut self, key: &str) -> Result<&mut Vec<M::Value>> {
        let iri = self.resolve(key, Access::Get)?;
        self.target.get_all_mut(&iri)
    }

    fn set_all(&mut self, key: &str, values: Vec<M::Value>) -> Result<()> {
        let iri = self.resolve(key, Access::Set)?;
        self.target.set_all(&iri, values)
    }
}

/// Exposes a multi-valued store as single values: the first element of each
/// sequence.
pub struct SingularProperties<M> {
    target: M,
}

impl<M> SingularProperties<M> {
    pub fn new(target: M) -> Self {
        SingularProperties { target }
    }

    pub fn into_inner(self) -> M {
        self.target
    }
}

impl<M: PropertyRead> SingularProperties<M> {
    /// The first value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<&M::Value>> {
        Ok(self.target.get_all(key)?.first())
    }

    pub fn has(&self, key: &str) -> Result<bool> {
        self.target.has(key)
    }

    /// Keys whose sequence is non-empty.
    pub fn names(&self) -> Vec<String> {
        self.target
            .names()
            .into_iter()
            .filter(|key| matches!(self.target.has(key), Ok(true)))
            .collect()
    }
}

impl<M: PropertyWrite> SingularProperties<M> {
    /// Replaces the sequence under `key` with `[value]`.
    pub fn set(&mut self, key: &str, value: M::Value) -> Result<()> {
        self.target.set_all(key, vec![value])
    }

    /// Empties the sequence under `key`; the key itself stays.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        self.target.set_all(key, Vec::new())
    }
}
