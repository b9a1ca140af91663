//! GraphQL guards for Rookery API
//!
//! Guards run before resolvers. The depth guard rejects over-nested
//! documents at validation time so none of their fields execute.

mod depth;

pub use depth::{check_depth, DepthLimit, DEFAULT_MAX_DEPTH};
