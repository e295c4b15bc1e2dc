//! # Anchorage Web
//!
//! Thin request-handling layer for services built on `anchorage-core`.
//!
//! The [`WebController`] trait is the dispatch seam for HTTP-triggered
//! handlers: each concrete controller names its API, validates the incoming
//! request, and handles it; the provided `invoke` flow wires those pieces
//! together with request-scoped tracing and response header defaults.
//! Routing, transport, and serialization frameworks stay outside this crate.

pub mod web_controller;

pub use web_controller::{
    ControllerError, ControllerResponse, RequestContext, WebController, JSON_CONTENT_TYPE,
};
