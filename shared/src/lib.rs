pub mod genes;
pub mod protocol;

pub use genes::*;
pub use protocol::*;

/// The snapshot format version - readers must match this exactly
/// Version 1: row-major board snapshots with per-cell reports
pub const PROTOCOL_VERSION: u32 = 1;
