//! # Core Module
//!
//! Fundamental concurrency primitives used throughout the streaming system.
//!
//! ## Key Components
//! - `MtResource`: thread-safe reference-counted resource with read-write locking
//! - `StopToken`: cancellable stop flag observed by the background streaming loop

pub mod mt_resource;
pub mod stop_token;

pub use mt_resource::MtResource;
pub use stop_token::StopToken;
