//! # memotable
//!
//! In-process, identity-keyed caching engine: given a key (compared by
//! identity, never by contained value) and a compute function bound at
//! construction, repeat lookups return the stored result and first lookups
//! compute-and-store it.
//!
//! ## Architecture
//! - **Identity hash**: integer-avalanche mix over the key's address
//! - **Probe sequence**: perturbation-based open addressing, shared by
//!   lookup, insert, and growth rehash
//! - **Slot table**: one contiguous array, doubling growth at a 2/3 load
//!   threshold, never shrinks
//! - **Engine**: get-or-compute plus mapping-style operations and an
//!   explicit liveness-driven eviction pass

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod ident;
mod map;
mod table;

pub use cache::{Cache, ComputeFn};
pub use config::CacheConfig;
pub use error::{BoxError, Error, Result};
pub use ident::Ident;
pub use map::IdentMap;
