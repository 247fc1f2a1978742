//! Wetterblock: a real-time temperature/humidity relay
//!
//! Clients push readings over a persistent WebSocket; every valid reading is
//! fanned out to all connected clients and accumulated into a rolling window
//! whose averages are committed to append-only CSV files, partitioned into
//! day-scoped blocks that survive restarts.

pub mod block;
pub mod buffer;
pub mod config;
pub mod hub;
pub mod persistence;
pub mod scheduler;
pub mod server;
pub mod state;
pub mod writer;
