//! Synchronous client for the Ulule crowdfunding API.
//!
//! # Overview
//! Typed accessors for projects, rewards, supporters, orders and users. Each
//! accessor builds a GET request, attaches the configured credential, runs it
//! through a blocking transport and decodes the JSON body.
//!
//! # Design
//! - `UluleClient` is stateless; concurrent callers can share it.
//! - Each resource is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), so the I/O boundary is explicit
//!   and both halves are testable without a network.
//! - `Transport` is the seam between the two; `UreqTransport` verifies TLS
//!   certificates unless explicitly told otherwise.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod pagination;
pub mod types;

pub use auth::Credentials;
pub use client::UluleClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_BODY_SIZE};
pub use error::{ApiError, Result};
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use pagination::PageIter;
pub use types::{
    Address, Metadata, Order, OrderItem, OrderStatus, Page, Project, ProjectFilter, Reward, Supporter, User,
};
