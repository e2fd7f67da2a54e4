//! Server transport. Only stdio is supported.

pub mod stdio;

pub use stdio::StdioTransport;
