//! Task board client: filtered task pages cached per query, with state
//! changes applied optimistically and reconciled against the task API.

pub mod board;
pub mod cache;
pub mod client;
pub mod config;
pub mod controller;
pub mod log;
pub mod model;
pub mod service;

#[cfg(test)]
mod testing;

#[cfg(test)]
mod e2e_tests;
