//! Shared domain types for the product catalog.
//!
//! Nothing in here touches the database or HTTP; both `catalog-db` and
//! `catalog-api` build on these primitives.

pub mod category;
pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;
