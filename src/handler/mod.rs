// Handler module entry
// Top-level request routing and static file serving

pub mod router;
pub mod static_files;

pub use router::handle_request;
