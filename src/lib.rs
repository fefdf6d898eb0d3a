pub mod ai;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod storage;
pub mod store;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;
