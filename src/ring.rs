//! Ring buffer - fixed-capacity FIFO that overwrites its oldest entry

use crate::config::CircuitConfig;
use crate::error::ConfigError;
use crate::observer::{CircuitEvent, CircuitObserver, Observers};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Circular FIFO over `capacity` optional slots.
///
/// Writing into a full buffer discards the oldest entry; reading from an
/// empty buffer yields `None`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RingState<T>", bound(deserialize = "T: Deserialize<'de>"))
)]
pub struct RingBuffer<T> {
    /// Backing slots, `capacity` long.
    slots: Vec<Option<T>>,

    /// Position of the oldest entry.
    read_index: usize,

    /// Position the next write lands on.
    write_index: usize,

    /// Entries currently held, in `[0, capacity]`.
    size: usize,

    #[cfg_attr(feature = "serde", serde(skip))]
    observers: Observers,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be > 0");
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            read_index: 0,
            write_index: 0,
            size: 0,
            observers: Observers::default(),
        }
    }

    /// Create a buffer sized by `config.buffer_capacity`.
    pub fn from_config(config: &CircuitConfig) -> Result<Self, ConfigError> {
        if config.buffer_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self::new(config.buffer_capacity))
    }

    // =========================================================================
    // WRITING / READING
    // =========================================================================

    /// Append `value`, overwriting the oldest entry when full.
    pub fn write(&mut self, value: T) {
        let capacity = self.capacity();
        self.slots[self.write_index] = Some(value);
        self.write_index = (self.write_index + 1) % capacity;

        if self.size < capacity {
            self.size += 1;
        } else {
            self.read_index = (self.read_index + 1) % capacity;
            self.observers.notify(CircuitEvent::Overwritten { capacity });
        }
    }

    /// Remove and return the oldest entry.
    pub fn read(&mut self) -> Option<T> {
        if self.size == 0 {
            return None;
        }
        let value = self.slots[self.read_index].take();
        self.read_index = (self.read_index + 1) % self.capacity();
        self.size -= 1;
        value
    }

    /// Oldest entry, without removing it.
    pub fn peek(&self) -> Option<&T> {
        if self.size == 0 {
            return None;
        }
        self.slots[self.read_index].as_ref()
    }

    /// Entries oldest first, without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.capacity();
        (0..self.size).filter_map(move |i| self.slots[(self.read_index + i) % capacity].as_ref())
    }

    /// Drop every entry and rewind both indices.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.read_index = 0;
        self.write_index = 0;
        self.size = 0;
    }

    // =========================================================================
    // METRICS
    // =========================================================================

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn current_size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    pub fn subscribe(&mut self, observer: Arc<dyn CircuitObserver>) {
        self.observers.subscribe(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn unsubscribe_all(&mut self) {
        self.observers.clear();
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RingState<T> {
    slots: Vec<Option<T>>,
    read_index: usize,
    write_index: usize,
    size: usize,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<RingState<T>> for RingBuffer<T> {
    type Error = ConfigError;

    /// Accept only states `write`/`read` can produce: the `size` slots from
    /// `read_index` onward are occupied, every other slot is empty.
    fn try_from(state: RingState<T>) -> Result<Self, Self::Error> {
        let capacity = state.slots.len();
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        for index in [state.read_index, state.write_index] {
            if index >= capacity {
                return Err(ConfigError::IndexOutOfRange { index, capacity });
            }
        }

        let inconsistent = ConfigError::InconsistentSize {
            size: state.size,
            capacity,
        };
        if state.size > capacity || (state.read_index + state.size) % capacity != state.write_index {
            return Err(inconsistent);
        }
        let occupied = state.slots.iter().enumerate().all(|(i, slot)| {
            let age = (i + capacity - state.read_index) % capacity;
            slot.is_some() == (age < state.size)
        });
        if !occupied {
            return Err(inconsistent);
        }

        Ok(Self {
            slots: state.slots,
            read_index: state.read_index,
            write_index: state.write_index,
            size: state.size,
            observers: Observers::default(),
        })
    }
}
