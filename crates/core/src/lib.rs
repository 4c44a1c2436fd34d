#![forbid(unsafe_code)]

pub mod emergency;
pub mod lessons;
pub mod model;
pub mod time;

pub use time::Clock;
