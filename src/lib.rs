//! IvyFocus core: the task store behind the `ivy` terminal app.
//!
//! Tasks live in three disjoint lists (Today, Backlog, Archive). At most
//! `max_focus_tasks` active Today tasks can be starred, and starred tasks are
//! always kept ahead of the others.

pub mod day;
pub mod export;
pub mod models;
pub mod storage;
pub mod store;
pub mod undo;
