//! Core wire types for Agentry.

pub mod agent;
pub mod message;
pub mod run;

pub use agent::*;
pub use message::*;
pub use run::*;
