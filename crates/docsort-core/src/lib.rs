#![forbid(unsafe_code)]
//! docsort-core: document values, cross-type ordering, path lookup and ids.
//!
//! These are the collaborators the sorter leans on:
//! - `lookup` resolves dotted paths into branches, expanding arrays;
//! - `order` is the total cross-type value order of the reference database;
//! - `id` turns `_id` values into hashable keys.
//!
//! Pure and synchronous. No I/O lives here.

pub mod config;
pub mod error;
pub mod id;
pub mod lookup;
pub mod order;
pub mod prelude;
pub mod value;

pub use error::{Error, Result};
