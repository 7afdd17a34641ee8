use tagsmith_store::{ObjectStore, StoreError};
use tagsmith_types::{ObjectId, ObjectType};
use tracing::debug;

use crate::error::{GateResult, ReferenceError};

/// Confirms that a tag's target exists, has the declared type, and that its
/// stored bytes still hash to the ID they are stored under.
///
/// The target is first resolved through the store's replacement mapping.
/// The replacement (if any) is read and hashed in place of the original; the
/// caller's record keeps naming the original ID.
pub struct ReferenceVerifier<'s> {
    store: &'s dyn ObjectStore,
}

impl<'s> ReferenceVerifier<'s> {
    pub fn new(store: &'s dyn ObjectStore) -> Self {
        Self { store }
    }

    pub fn verify(&self, target: &ObjectId, declared: ObjectType) -> GateResult<()> {
        let resolved = self.store.replacement(target)?;
        if resolved != *target {
            debug!(object = %target, %resolved, "verifying through replacement");
        }

        let object = match self.store.read(&resolved) {
            Ok(Some(object)) => object,
            Ok(None) => return Err(ReferenceError::NotFound { id: *target }.into()),
            Err(StoreError::CorruptObject { id, reason }) => {
                return Err(ReferenceError::Unreadable { id, reason }.into())
            }
            Err(e) => return Err(e.into()),
        };

        if object.kind != declared {
            return Err(ReferenceError::TypeMismatch {
                id: *target,
                declared,
                actual: object.kind,
            }
            .into());
        }

        let computed = object.compute_id();
        if computed != resolved {
            return Err(ReferenceError::ContentCorruption {
                id: *target,
                expected: resolved,
                computed,
            }
            .into());
        }

        debug!(object = %target, kind = %declared, size = object.size, "tag target verified");
        Ok(())
    }
}
