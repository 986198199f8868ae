// HTTP utility module entry
// Content-type detection and plain status response builders

pub mod mime;
pub mod response;

pub use response::{build_404_response, build_405_response, build_413_response};
