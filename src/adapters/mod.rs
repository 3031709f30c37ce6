//! Adapter implementations of the port traits.
//!
//! - `live`: real processes and disk.
//! - `memory`: an in-process task store.

pub mod live;
pub mod memory;
pub mod payload;
