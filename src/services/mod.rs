// src/services/mod.rs
pub mod session_manager;
