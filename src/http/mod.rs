//! HTTP plumbing shared by the Canvas and Panopto clients: the transport
//! abstraction, the typed error returned at that seam, and `Link`-header
//! pagination.

pub mod error;
pub mod pagination;
pub mod transport;

pub use error::ApiError;
pub use pagination::{get_paginated, parse_next_link};
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
