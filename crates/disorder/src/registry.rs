//! Shared cache of record metadata.
//!
//! One [`TypeRegistry`] is owned by a [`Codec`](crate::Codec) and shared by
//! every encoder and decoder it creates. Lookups take a read lock. The first
//! request for a type builds its metadata behind a gate private to that
//! type, then takes the write lock only to insert the result.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::MetadataError;
use crate::model::{Record, RecordInfo};

type Entry = Arc<dyn Any + Send + Sync>;

/// Memoized [`RecordInfo`] per record type.
#[derive(Default)]
pub struct TypeRegistry {
    entries: RwLock<FxHashMap<TypeId, Entry>>,
    gates: Mutex<FxHashMap<TypeId, Arc<Mutex<()>>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns metadata for `T`, building it on first use.
    ///
    /// A failed build is not cached; the next call retries and fails the
    /// same way.
    pub fn describe<T: Record>(&self) -> Result<Arc<RecordInfo<T>>, MetadataError> {
        let id = TypeId::of::<T>();

        if let Some(info) = self.entries.read().get(&id).and_then(downcast::<T>) {
            return Ok(info);
        }

        // Builds of the same type queue here; other types are unaffected
        let gate = Arc::clone(self.gates.lock().entry(id).or_default());
        let _building = gate.lock();

        // Another thread may have built it while we waited at the gate
        if let Some(info) = self.entries.read().get(&id).and_then(downcast::<T>) {
            return Ok(info);
        }

        let info = Arc::new(RecordInfo::<T>::build()?);
        debug!(
            type_name = info.type_name(),
            fields = info.fields().len(),
            "built record metadata"
        );
        self.entries.write().insert(id, info.clone() as Entry);
        Ok(info)
    }

    /// Whether metadata for `T` has been built.
    pub fn contains<T: Record>(&self) -> bool {
        self.entries.read().contains_key(&TypeId::of::<T>())
    }

    /// Number of record types described so far.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn downcast<T: Record>(entry: &Entry) -> Option<Arc<RecordInfo<T>>> {
    entry.clone().downcast::<RecordInfo<T>>().ok()
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.len())
            .finish()
    }
}
