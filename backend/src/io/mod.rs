//! # IO Layer
//!
//! Interface layer exposing the domain services to clients over HTTP.

pub mod rest;
