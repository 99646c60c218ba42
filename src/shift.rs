//! Shift register - fixed-depth delay line of optional values

use crate::agent::Agent;
use crate::config::CircuitConfig;
use crate::error::ConfigError;
use crate::observer::{CircuitEvent, CircuitObserver, Observers};
use std::collections::VecDeque;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `stages` slots, head at index 0. Each push shifts every slot one toward
/// the tail and returns what fell off the end.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "ShiftState<T>", bound(deserialize = "T: Deserialize<'de>"))
)]
pub struct ShiftRegister<T> {
    /// Always exactly `stages` long.
    slots: VecDeque<Option<T>>,

    #[cfg_attr(feature = "serde", serde(skip))]
    observers: Observers,
}

impl<T> ShiftRegister<T> {
    /// Create an empty register.
    ///
    /// # Panics
    /// Panics if `stages` is zero.
    pub fn new(stages: usize) -> Self {
        assert!(stages > 0, "register stages must be > 0");
        Self {
            slots: std::iter::repeat_with(|| None).take(stages).collect(),
            observers: Observers::default(),
        }
    }

    /// Create a register sized by `config.register_stages`.
    pub fn from_config(config: &CircuitConfig) -> Result<Self, ConfigError> {
        if config.register_stages == 0 {
            return Err(ConfigError::ZeroStages);
        }
        Ok(Self::new(config.register_stages))
    }

    /// Insert at the head; return the tail slot's previous content.
    pub fn push(&mut self, value: T) -> Option<T> {
        self.slots.push_front(Some(value));
        let evicted = self.slots.pop_back().flatten();
        if evicted.is_some() {
            self.observers.notify(CircuitEvent::Evicted {
                stages: self.slots.len(),
            });
        }
        evicted
    }

    /// Content of `stage`, or `None` when empty or out of range.
    pub fn get(&self, stage: usize) -> Option<&T> {
        self.slots.get(stage).and_then(Option::as_ref)
    }

    /// All slots, most recent first.
    pub fn get_all(&self) -> Vec<Option<&T>> {
        self.slots.iter().map(Option::as_ref).collect()
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    pub fn stages(&self) -> usize {
        self.slots.len()
    }

    /// True when every slot holds a value.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
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

    /// View the register as a delay line: `process(v)` pushes `v` and
    /// returns the value pushed `stages` calls earlier.
    pub fn as_agent(&mut self) -> DelayLine<'_, T> {
        DelayLine { register: self }
    }
}

impl<T: Clone> ShiftRegister<T> {
    /// Owned copy of all slots, most recent first.
    pub fn snapshot(&self) -> Vec<Option<T>> {
        self.slots.iter().cloned().collect()
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct ShiftState<T> {
    slots: VecDeque<Option<T>>,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<ShiftState<T>> for ShiftRegister<T> {
    type Error = ConfigError;

    fn try_from(state: ShiftState<T>) -> Result<Self, Self::Error> {
        if state.slots.is_empty() {
            return Err(ConfigError::ZeroStages);
        }
        Ok(Self {
            slots: state.slots,
            observers: Observers::default(),
        })
    }
}

/// Agent over a borrowed [`ShiftRegister`]. See [`ShiftRegister::as_agent`].
#[derive(Debug)]
pub struct DelayLine<'a, T> {
    register: &'a mut ShiftRegister<T>,
}

impl<'a, T> Agent<T> for DelayLine<'a, T> {
    type Output = Option<T>;

    fn process(&mut self, input: T) -> Option<T> {
        self.register.push(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::FnObserver;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_new_is_empty() {
        let reg: ShiftRegister<u8> = ShiftRegister::new(3);
        assert_eq!(reg.stages(), 3);
        assert_eq!(reg.get_all(), vec![None, None, None]);
        assert!(!reg.is_full());
    }

    #[test]
    fn test_push_shifts_toward_tail() {
        let mut reg = ShiftRegister::new(3);
        assert_eq!(reg.push(1), None);
        assert_eq!(reg.push(2), None);
        assert_eq!(reg.get_all(), vec![Some(&2), Some(&1), None]);
        assert_eq!(reg.get(1), Some(&1));
        assert_eq!(reg.get(2), None);
    }

    #[test]
    fn test_overflow_evicts_first() {
        let mut reg = ShiftRegister::new(4);
        for v in 1..=4 {
            assert_eq!(reg.push(v), None);
        }
        assert!(reg.is_full());

        assert_eq!(reg.push(5), Some(1));
        assert_eq!(reg.get_all(), vec![Some(&5), Some(&4), Some(&3), Some(&2)]);
    }

    #[test]
    fn test_get_out_of_range() {
        let mut reg = ShiftRegister::new(2);
        reg.push('x');
        assert_eq!(reg.get(0), Some(&'x'));
        assert_eq!(reg.get(2), None);
        assert_eq!(reg.get(usize::MAX), None);
    }

    #[test]
    fn test_clear() {
        let mut reg = ShiftRegister::new(2);
        reg.push(1);
        reg.push(2);
        reg.clear();
        assert_eq!(reg.snapshot(), vec![None, None]);
        assert_eq!(reg.stages(), 2);
        assert_eq!(reg.push(3), None);
    }

    #[test]
    fn test_eviction_event() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let mut reg = ShiftRegister::new(2);
        reg.subscribe(Arc::new(FnObserver(move |e| {
            assert_eq!(e, CircuitEvent::Evicted { stages: 2 });
            c.fetch_add(1, Ordering::SeqCst);
        })));

        for v in 0..5 {
            reg.push(v);
        }
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_delay_line() {
        let mut reg = ShiftRegister::new(2);
        let mut delay = reg.as_agent();
        let out: Vec<_> = (1..=5).map(|v| delay.process(v)).collect();
        assert_eq!(out, vec![None, None, Some(1), Some(2), Some(3)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let mut reg = ShiftRegister::new(3);
        reg.push(7u32);
        let json = serde_json::to_string(&reg).unwrap();
        let back: ShiftRegister<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.snapshot(), reg.snapshot());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_zero_stages() {
        let err = serde_json::from_str::<ShiftRegister<u32>>(r#"{"slots":[]}"#).unwrap_err();
        assert!(err.to_string().contains("register stages must be > 0"));
    }

    #[test]
    fn test_from_config_ignores_other_fields() {
        let reg: ShiftRegister<u8> = ShiftRegister::from_config(&CircuitConfig::new(0, 2, 0)).unwrap();
        assert_eq!(reg.stages(), 2);
        assert_eq!(
            ShiftRegister::<u8>::from_config(&CircuitConfig::new(1, 0, 1)).unwrap_err(),
            ConfigError::ZeroStages
        );
    }

    #[test]
    fn test_unsubscribe_all() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let mut reg = ShiftRegister::new(1);
        reg.subscribe(Arc::new(FnObserver(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        })));
        assert_eq!(reg.observer_count(), 1);
        reg.push(1);
        reg.push(2);

        reg.unsubscribe_all();
        assert_eq!(reg.observer_count(), 0);
        reg.push(3);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
