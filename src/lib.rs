//! bitcircuit - bit-field packing and circuit primitives
//!
//! Small building blocks with exact numeric contracts.
//!
//! # Core Types
//!
//! - **Codec**: narrow integer fields packed into 32/64-bit words
//! - **BitLayout**: a named, validated field schema over the codec
//! - **MemoryCell**, **Clock**, **ShiftRegister**, **RingBuffer**: stateful,
//!   synchronous primitives
//! - **Agent**: single-input single-output transformation, composed with
//!   `transform`, `filter`, `pipeline`, `parallel`, `shift_register` and
//!   `feedback`
//!
//! # Bit Layout
//!
//! Fields are laid out least-significant-first. The first field occupies the
//! lowest bits; values wider than their field are masked, never rejected.
//! Only the total width is checked against the word.
//!
//! # Concurrency
//!
//! Everything here is synchronous and single-threaded. Primitives carry no
//! locks; share one by wrapping it (e.g. `Arc<Mutex<RingBuffer<T>>>`).
//!
//! # Example: Sampling a Packed Header
//!
//! ```rust
//! use bitcircuit::agent::{pipeline, Agent};
//! use bitcircuit::{codec, BitLayout, CircuitConfig, Clock, RingBuffer};
//!
//! // 1. Describe the header once
//! let header = BitLayout::from_pairs([("version", 2), ("kind", 3), ("flags", 4), ("length", 5)])
//!     .unwrap();
//! let word = header.pack(&[3, 5, 9, 15]).unwrap();
//! assert_eq!(word, codec::pack_ints(&[3, 5, 9, 15], &[2, 3, 4, 5]).unwrap());
//! assert_eq!(header.get(word, "flags").unwrap(), 9);
//!
//! // 2. Size the primitives from one config
//! let config = CircuitConfig::new(4, 2, 3);
//! let mut clock = Clock::from_config(&config).unwrap();
//! let mut history = RingBuffer::from_config(&config).unwrap();
//!
//! // 3. Keep the length field of every fourth word
//! let mut sample = pipeline(
//!     |w: u64| header.get(w, "length").unwrap_or(0),
//!     |len: u64| clock.tick().then_some(len),
//! );
//! for length in 0..12u64 {
//!     let w = header.set(word, "length", length).unwrap();
//!     if let Some(len) = sample.process(w) {
//!         history.write(len);
//!     }
//! }
//!
//! assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![3, 7, 11]);
//! ```

pub mod agent;
mod cell;
mod clock;
pub mod codec;
mod config;
mod error;
mod layout;
mod observer;
mod ring;
mod shift;

pub use agent::Agent;
pub use cell::{CellAgent, MemoryCell};
pub use clock::{Clock, ClockAgent};
pub use codec::{BitField, PackResult, WordWidth};
pub use config::CircuitConfig;
pub use error::{CodecError, ConfigError};
pub use layout::{BitLayout, FieldSpec};
pub use observer::{ChannelObserver, CircuitEvent, CircuitObserver, FnObserver};
pub use ring::RingBuffer;
pub use shift::{DelayLine, ShiftRegister};
