mod commands;

pub use commands::{inspect, Cli};
