//! HTTP request handlers

pub mod health;
pub mod info;
pub mod speech;
pub mod willow;
