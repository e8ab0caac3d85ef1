//! Integration test common infrastructure.
//!
//! Provides an in-process test server and a line-oriented test client
//! for asserting on wire-level message flows.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::{TestServer, scenario_config};
