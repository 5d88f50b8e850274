//! Review Economy - Token-Based Peer Review Simulation

pub mod core;
pub mod economy;
