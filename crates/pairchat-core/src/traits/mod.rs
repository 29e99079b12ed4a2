//! Traits at the boundary between the engine and the transport

mod registry;

pub use registry::ConnectionRegistry;
