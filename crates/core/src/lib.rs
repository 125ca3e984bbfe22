#![forbid(unsafe_code)]

pub mod config;
pub mod interaction;
pub mod model;
pub mod reward;
pub mod time;

pub use reward::RewardPolicy;
pub use time::Clock;
