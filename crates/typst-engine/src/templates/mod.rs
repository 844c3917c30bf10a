//! Report templates compiled into the binary

pub mod embedded;
pub mod registry;

pub use registry::get_template_source;
