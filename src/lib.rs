//! HTTP service that resizes and compresses uploaded videos with an external
//! transcoder and hands the result back as a download.

pub mod app;
pub mod common;
pub mod config;
pub mod docs;
pub mod infrastructure;
pub mod modules;
pub mod routes;
pub mod state;
