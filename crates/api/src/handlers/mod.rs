//! HTTP request handlers. Thin wrappers over the repositories and the
//! booking service; all domain decisions live below this layer.

pub mod availability;
pub mod booking;
pub mod rental_item;
