//! Record (struct) metadata.
//!
//! A record declares its fields once, in source order, each with an
//! annotation of the form `"wire_name[,omitempty]"`. [`RecordInfo::build`]
//! turns the declarations into the ordered descriptor list the encoder walks
//! and the name index the decoder looks fields up in. Building is done once
//! per type by the [`TypeRegistry`](crate::TypeRegistry).

use std::fmt;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;

use crate::codec::{Decode, Decoder, Encode, Encoder};
use crate::error::{DecodeError, EncodeError, MetadataError};
use crate::limits::MAX_NAME_LEN;

/// A fixed-shape aggregate of named fields.
///
/// Usually implemented through the [`record!`](crate::record) macro.
pub trait Record: Default + Send + Sync + 'static {
    /// Lists the fields in declaration order.
    fn declare(fields: &mut FieldSet<Self>);
}

/// Type-erased read/write access to one field of `T`.
trait FieldAccess<T>: Send + Sync {
    fn encode(&self, record: &T, encoder: &mut Encoder<'_>) -> Result<(), EncodeError>;
    fn is_zero(&self, record: &T) -> bool;
    fn is_elided(&self, record: &T) -> bool;
    fn decode(&self, record: &mut T, decoder: &mut Decoder<'_>) -> Result<(), DecodeError>;
}

struct Accessor<G, M, F> {
    get: G,
    get_mut: M,
    _field: PhantomData<fn() -> F>,
}

impl<T, F, G, M> FieldAccess<T> for Accessor<G, M, F>
where
    F: Encode + Decode,
    G: Fn(&T) -> &F + Send + Sync,
    M: Fn(&mut T) -> &mut F + Send + Sync,
{
    fn encode(&self, record: &T, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        (self.get)(record).encode(encoder)
    }

    fn is_zero(&self, record: &T) -> bool {
        (self.get)(record).is_zero()
    }

    fn is_elided(&self, record: &T) -> bool {
        (self.get)(record).is_elided()
    }

    fn decode(&self, record: &mut T, decoder: &mut Decoder<'_>) -> Result<(), DecodeError> {
        *(self.get_mut)(record) = F::decode(decoder)?;
        Ok(())
    }
}

struct Declaration<T> {
    rust_name: &'static str,
    annotation: &'static str,
    access: Box<dyn FieldAccess<T>>,
}

/// Collects field declarations for a [`Record`].
pub struct FieldSet<T> {
    declared: Vec<Declaration<T>>,
}

impl<T: 'static> FieldSet<T> {
    fn new() -> Self {
        Self {
            declared: Vec::new(),
        }
    }

    /// Declares a field.
    ///
    /// `annotation` is `"wire_name"` or `"wire_name,omitempty"`. An empty
    /// annotation or `"-"` keeps the field off the wire; `",omitempty"` uses
    /// `rust_name` as the wire name.
    pub fn field<F, G, M>(
        &mut self,
        rust_name: &'static str,
        annotation: &'static str,
        get: G,
        get_mut: M,
    ) -> &mut Self
    where
        F: Encode + Decode + 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        self.declared.push(Declaration {
            rust_name,
            annotation,
            access: Box::new(Accessor {
                get,
                get_mut,
                _field: PhantomData,
            }),
        });
        self
    }

    /// Number of declared fields, including ones kept off the wire.
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

/// Parsed annotation: wire name and omit flag, or `None` when excluded.
fn parse_annotation(rust_name: &'static str, annotation: &'static str) -> Option<(&'static str, bool)> {
    let annotation = annotation.trim();
    if annotation.is_empty() || annotation == "-" {
        return None;
    }
    let mut parts = annotation.split(',');
    let name = parts.next().map(str::trim).unwrap_or_default();
    let omit_empty = parts.any(|opt| opt.trim() == "omitempty");
    let name = if name.is_empty() { rust_name } else { name };
    Some((name, omit_empty))
}

/// Wire-level description of one record field.
pub struct FieldDescriptor<T> {
    name: &'static str,
    rust_name: &'static str,
    omit_empty: bool,
    access: Box<dyn FieldAccess<T>>,
}

impl<T> FieldDescriptor<T> {
    /// Wire name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the Rust field.
    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    /// True when the field writes nothing for `record`: its value is
    /// elided (empty collection), or zero and marked omitempty.
    pub fn should_skip(&self, record: &T) -> bool {
        self.access.is_elided(record) || (self.omit_empty && self.access.is_zero(record))
    }

    pub fn encode(&self, record: &T, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        self.access.encode(record, encoder)
    }

    pub fn decode(&self, record: &mut T, decoder: &mut Decoder<'_>) -> Result<(), DecodeError> {
        self.access.decode(record, decoder)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("rust_name", &self.rust_name)
            .field("omit_empty", &self.omit_empty)
            .finish()
    }
}

/// Type metadata for a record: ordered wire fields plus a name index.
pub struct RecordInfo<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    index: FxHashMap<&'static str, usize>,
}

impl<T: Record> RecordInfo<T> {
    /// Builds metadata from `T`'s declarations.
    ///
    /// Fails if two fields share a wire name or a wire name is too long.
    pub fn build() -> Result<Self, MetadataError> {
        let type_name = std::any::type_name::<T>();
        let mut set = FieldSet::new();
        T::declare(&mut set);

        let mut fields: Vec<FieldDescriptor<T>> = Vec::with_capacity(set.declared.len());
        let mut index = FxHashMap::with_capacity_and_hasher(set.declared.len(), Default::default());

        for decl in set.declared {
            let Some((name, omit_empty)) = parse_annotation(decl.rust_name, decl.annotation) else {
                continue;
            };
            if name.len() > MAX_NAME_LEN {
                return Err(MetadataError::NameTooLong {
                    type_name,
                    field: decl.rust_name,
                    len: name.len(),
                });
            }
            if let Some(&existing) = index.get(name) {
                let first: &FieldDescriptor<T> = &fields[existing];
                return Err(MetadataError::DuplicateFieldName {
                    type_name,
                    name,
                    first: first.rust_name,
                    second: decl.rust_name,
                });
            }
            index.insert(name, fields.len());
            fields.push(FieldDescriptor {
                name,
                rust_name: decl.rust_name,
                omit_empty,
                access: decl.access,
            });
        }

        Ok(Self {
            type_name,
            fields,
            index,
        })
    }
}

impl<T> RecordInfo<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Wire fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Finds a field by wire name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.index.get(name).map(|&i| &self.fields[i])
    }
}

impl<T> fmt::Debug for RecordInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordInfo")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}
