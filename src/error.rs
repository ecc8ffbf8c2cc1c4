//! Error types

use thiserror::Error;

/// Failure to read a resource's descriptor at map time.
///
/// The resolver never propagates this; it resolves the map to an empty
/// region instead.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("descriptor query failed with HRESULT 0x{0:08X}")]
    Hresult(u32),

    #[error("descriptor query failed: {0}")]
    Other(String),
}
