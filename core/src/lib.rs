//! Blocking client core for the Crunchbase REST API.
//!
//! # Overview
//! Issues permalink lookups, paginated searches, category lists and batch
//! searches; follows redirects under one overall deadline; unwraps the
//! `{data, error}` envelope; and resolves each JSON node into a typed
//! [`Entity`], including the relationships embedded in it.
//!
//! # Design
//! - `transport` owns redirects, status classification and the deadline.
//!   The actual round-trip sits behind the [`HttpSend`] trait so tests can
//!   script responses; [`UreqSender`] does the real I/O.
//! - `envelope` turns raw bytes into the `data` payload or a [`ClientError::Api`].
//! - `registry` maps kind tags to constructors and recurses through
//!   relationships with a depth guard. Hosts can add kinds without touching
//!   the resolver.
//! - `result_set` materializes list payloads, either single-kind or
//!   heterogeneous (batch search).
//! - Configuration is an explicit [`ClientConfig`] moved into the [`Client`].

pub mod client;
pub mod config;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod http;
pub mod model;
pub mod query;
pub mod registry;
pub mod result_set;
pub mod transport;

pub use client::{BatchRequest, Client};
pub use config::ClientConfig;
pub use entity::{CustomEntity, Entity, EntityShape, Model, Reference, Relationship};
pub use error::{ClientError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpSend, UreqSender};
pub use query::Query;
pub use registry::{Registry, Resolver};
pub use result_set::{Paging, ResultSet};
pub use transport::Transport;
