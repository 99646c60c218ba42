//! Memory cell - a single mutable slot

use crate::agent::Agent;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Holds exactly one value. No history is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryCell<T> {
    value: T,
}

impl<T> MemoryCell<T> {
    pub fn new(initial: T) -> Self {
        Self { value: initial }
    }

    /// Current value, without side effects.
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Store `value` and return the previous one.
    pub fn replace(&mut self, value: T) -> T {
        std::mem::replace(&mut self.value, value)
    }

    /// Replace the value with `f(current)`.
    pub fn update<F: FnOnce(&T) -> T>(&mut self, f: F) {
        self.value = f(&self.value);
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    /// View the cell as an agent taking update functions.
    ///
    /// Every `process(f)` applies `f` to the cell and returns the new value.
    /// Invocation order matters: each call sees the previous call's result.
    pub fn as_agent(&mut self) -> CellAgent<'_, T> {
        CellAgent { cell: self }
    }
}

/// Agent over a borrowed [`MemoryCell`]. See [`MemoryCell::as_agent`].
#[derive(Debug)]
pub struct CellAgent<'a, T> {
    cell: &'a mut MemoryCell<T>,
}

impl<'a, T, F> Agent<F> for CellAgent<'a, T>
where
    T: Clone,
    F: FnOnce(&T) -> T,
{
    type Output = T;

    fn process(&mut self, f: F) -> T {
        self.cell.update(f);
        self.cell.get().clone()
    }
}
