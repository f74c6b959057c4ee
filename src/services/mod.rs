// src/services/mod.rs
pub mod render;
pub mod transport;
pub mod widget;
