//! Invariant checks that run in debug builds or with the invariant features.

use crate::mesh_error::MeshError;
use crate::topology::mesh::Mesh;
use crate::topology::validation::{ValidationOptions, validate_mesh};

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshError>;
}

/// Run a fallible check and panic on error when invariant checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

impl DebugInvariants for Mesh {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "mesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        validate_mesh(self, ValidationOptions::default())
    }
}
