//! Data models for Pooja List

mod item;
mod list;

pub use item::{ItemId, PoojaItem};
pub use list::{
    completed_count, ListId, ListUpdate, NewList, PoojaList, DEFAULT_LIST_TITLE, NEW_LIST_TITLE,
};
