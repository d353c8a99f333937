//! Directory tree primitives
//!
//! Listings of a single directory level, classification of a source/replica
//! listing pair, and content digests used to decide file equality.

pub mod classify;
pub mod digest;
pub mod listing;
