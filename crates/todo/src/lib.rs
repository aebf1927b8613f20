//! Todo domain module.
//!
//! This crate defines the todo item record and its JSON shape (no IO, no HTTP,
//! no storage).

pub mod item;

pub use item::TodoItem;
