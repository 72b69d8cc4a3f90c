// Library interface for tabkeeper
// The bulk tab management core consumed by host-editor glue: filter-pattern
// engine, closed-tab history cache, and undo stack.

pub mod config;
pub mod filter;
pub mod history;
pub mod store;
pub mod tab;
pub mod undo;
pub mod workspace;
