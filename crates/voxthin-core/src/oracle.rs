//! Neighborhood oracles consumed by the thinning schemes.
//!
//! An oracle is a pure function of a [`Configuration`]: it must not depend on
//! call order or global state. Errors mean the oracle cannot decide (for
//! example a table queried outside its domain) and abort the current run.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::configuration::Configuration;
use crate::error::Result;

/// Decides whether removing the center of a configuration preserves topology.
pub trait SimplePointOracle {
    fn is_simple(&self, configuration: Configuration) -> Result<bool>;
}

/// Decides whether the center of a configuration is an isthmus that must be
/// protected from removal.
pub trait IsthmusOracle {
    fn is_isthmus(&self, configuration: Configuration) -> Result<bool>;
}

impl<T: SimplePointOracle + ?Sized> SimplePointOracle for &T {
    fn is_simple(&self, configuration: Configuration) -> Result<bool> {
        (**self).is_simple(configuration)
    }
}

impl<T: IsthmusOracle + ?Sized> IsthmusOracle for &T {
    fn is_isthmus(&self, configuration: Configuration) -> Result<bool> {
        (**self).is_isthmus(configuration)
    }
}

impl<T: SimplePointOracle + ?Sized> SimplePointOracle for Box<T> {
    fn is_simple(&self, configuration: Configuration) -> Result<bool> {
        (**self).is_simple(configuration)
    }
}

impl<T: IsthmusOracle + ?Sized> IsthmusOracle for Box<T> {
    fn is_isthmus(&self, configuration: Configuration) -> Result<bool> {
        (**self).is_isthmus(configuration)
    }
}

/// Memoizes the answers of an expensive oracle per configuration.
///
/// Only successful answers are cached.
#[derive(Debug, Default)]
pub struct Cached<O> {
    inner: O,
    memo: RefCell<HashMap<Configuration, bool>>,
}

impl<O> Cached<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            memo: RefCell::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Number of distinct configurations answered so far.
    pub fn cached_len(&self) -> usize {
        self.memo.borrow().len()
    }

    fn lookup(
        &self,
        configuration: Configuration,
        eval: impl FnOnce(&O) -> Result<bool>,
    ) -> Result<bool> {
        if let Some(&answer) = self.memo.borrow().get(&configuration) {
            return Ok(answer);
        }
        let answer = eval(&self.inner)?;
        self.memo.borrow_mut().insert(configuration, answer);
        Ok(answer)
    }
}

impl<O: SimplePointOracle> SimplePointOracle for Cached<O> {
    fn is_simple(&self, configuration: Configuration) -> Result<bool> {
        self.lookup(configuration, |o| o.is_simple(configuration))
    }
}

impl<O: IsthmusOracle> IsthmusOracle for Cached<O> {
    fn is_isthmus(&self, configuration: Configuration) -> Result<bool> {
        self.lookup(configuration, |o| o.is_isthmus(configuration))
    }
}

/// Isthmus oracle that never protects anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoIsthmus;

impl IsthmusOracle for NoIsthmus {
    fn is_isthmus(&self, _configuration: Configuration) -> Result<bool> {
        Ok(false)
    }
}
