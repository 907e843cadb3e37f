//! pooja-core - Core library for Pooja List
//!
//! This crate contains the list/item models, the persistence gateway, the
//! local fallback store, the auth client, and the view-state controller used
//! by the Pooja List front ends.

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod gateway;
pub mod local;
pub mod models;
pub mod share;
pub mod util;

pub use error::{Error, Result};
pub use models::{ItemId, ListId, PoojaItem, PoojaList};
