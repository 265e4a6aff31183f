// src/watch/mod.rs

//! File watching, debounced rebuilds and the live-reload channel.
//!
//! - [`watcher`] bridges `notify` events into the async debounce loop and
//!   maps changed paths to the minimal affected task set.
//! - [`reload`] broadcasts rebuild notifications to connected browser
//!   clients over a local websocket.
//!
//! This module does not know how tasks execute; it only decides *which*
//! tasks to hand to the executor and *when*.

pub mod reload;
pub mod watcher;

pub use reload::ReloadServer;
pub use watcher::{RebuildComplete, WatchOptions, WatcherHandle, spawn_watcher, watch_loop};
