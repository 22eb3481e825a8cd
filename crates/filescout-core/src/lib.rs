/// FileScout Core — lazy filesystem indexing, caching, and search.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (GUI, CLI, TUI).
///
/// # Modules
///
/// - [`model`] — Index records and the lazy arena directory tree.
/// - [`fs`] — Filesystem gateway boundary (the only place the OS is touched).
/// - [`cache`] — The shared index and the eager subtree walk that fills it.
/// - [`store`] — JSON persistence of the index across sessions.
/// - [`search`] — Substring queries over the cached records.
/// - [`platform`] — Filesystem root enumeration.
pub mod cache;
pub mod error;
pub mod fs;
pub mod model;
pub mod platform;
pub mod search;
pub mod store;
