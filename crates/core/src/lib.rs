#![forbid(unsafe_code)]

pub mod engine;
pub mod model;
pub mod navigation;
pub mod time;
pub mod verdict;

pub use engine::{InvalidQuery, QueryEngine};
pub use time::Clock;
