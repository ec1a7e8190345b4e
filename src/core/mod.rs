//! Core functionality for document loading, persistence, and configuration

pub mod config;
pub mod document;
pub mod service;
pub mod source;
pub mod store;
