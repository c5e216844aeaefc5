//! # packsmith
//!
//! An editor for the JSON files of a data pack.  Every kind of document (loot tables,
//! predicates, ...) has its own model with its own undo history, and a [`Session`] keeps every
//! view of the active document in step as the user switches kinds or languages.
//!
//! [`Session`]: session::Session

#![deny(missing_docs)]

pub mod config;
pub mod core;
pub mod editor;
pub mod locale;
pub mod model;
pub mod prefs;
pub mod registry;
pub mod routing;
pub mod schema;
pub mod session;
pub mod view;
