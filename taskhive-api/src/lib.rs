//! # TaskHive API Server Library
//!
//! This library provides the HTTP shell for the TaskHive collaboration
//! backend: routing, authentication middleware, configuration, and the
//! mapping from core errors to HTTP responses.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
