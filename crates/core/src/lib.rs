#![forbid(unsafe_code)]

pub mod model;
pub mod random;
pub mod time;
pub mod timer;

pub use random::{NumberGenerator, RandomSource, SequenceSource};
pub use time::Clock;
pub use timer::{RoundTimer, TimerEvent, TimerToken};
