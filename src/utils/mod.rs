// Utility functions

pub mod logger;
pub mod timeout;

pub use logger::*;
pub use timeout::*;
