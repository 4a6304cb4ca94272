#[allow(clippy::module_inception)]
pub mod zone;

pub use zone::Zone;

/// Zone constants
pub mod constants {
    /// Default TTL if not specified (1 hour)
    pub const DEFAULT_TTL: u32 = 3600;
}
