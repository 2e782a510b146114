//! Domain logic for the todo service.
//!
//! Everything here is free of HTTP and database dependencies: the data
//! model, field validation, read-query composition, pagination, the
//! persistence contract, and the lifecycle service that ties them together.

pub mod error;
pub mod pagination;
pub mod query;
pub mod service;
pub mod store;
pub mod todo;
pub mod types;
pub mod validation;
