//! PDF object model and reference resolution.
//!
//! Fonts are built from already-parsed objects. Indirect references are
//! followed through an [`ObjectResolver`], the only window this crate has
//! onto the surrounding document.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Maximum number of reference hops followed by [`ObjectResolver::resolve`].
const MAX_REFERENCE_HOPS: u32 = 32;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (without the leading /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(HashMap<String, Object>),
    /// Stream (dictionary + raw, still-filtered data)
    Stream {
        /// Stream dictionary
        dict: HashMap<String, Object>,
        /// Stream data
        data: bytes::Bytes,
    },
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream { .. } => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to a number. Integers and reals are both accepted.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream objects.
    pub fn as_dict(&self) -> Option<&HashMap<String, Object>> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to string (bytes).
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    /// Decode stream data using the filters named in the stream dictionary.
    ///
    /// # Errors
    ///
    /// `InvalidObjectType` if this is not a stream, `UnsupportedFilter` for a
    /// filter this crate does not implement, `Decode` if the data is corrupt.
    pub fn decode_stream_data(&self) -> Result<Vec<u8>> {
        self.decode_stream_data_limited(0)
    }

    /// Like [`decode_stream_data`](Self::decode_stream_data), rejecting output
    /// larger than `max_size` bytes (0 disables the check).
    pub fn decode_stream_data_limited(&self, max_size: usize) -> Result<Vec<u8>> {
        match self {
            Object::Stream { dict, data } => {
                let filters = dict
                    .get("Filter")
                    .map(extract_filter_names)
                    .unwrap_or_default();
                crate::decoders::decode_stream_limited(data, &filters, max_size)
            },
            _ => Err(Error::invalid_type("Stream", self.type_name())),
        }
    }
}

/// Extract filter names from a Filter object (a single Name or an Array of Names).
fn extract_filter_names(filter_obj: &Object) -> Vec<String> {
    match filter_obj {
        Object::Name(name) => vec![name.clone()],
        Object::Array(arr) => arr
            .iter()
            .filter_map(|obj| obj.as_name().map(|s| s.to_string()))
            .collect(),
        _ => vec![],
    }
}

/// Lookup of indirect objects.
///
/// Implementors provide [`object`](Self::object); everything else is derived.
pub trait ObjectResolver {
    /// Load the object a reference points to.
    fn object(&self, obj_ref: ObjectRef) -> Result<Object>;

    /// Follow `obj` through any chain of references to a direct object.
    fn resolve(&self, obj: &Object) -> Result<Object> {
        let mut current = obj.clone();
        let mut hops = 0;
        while let Object::Reference(obj_ref) = current {
            if hops == MAX_REFERENCE_HOPS {
                return Err(Error::RecursionLimitExceeded(MAX_REFERENCE_HOPS));
            }
            log::trace!("Resolving {}", obj_ref);
            current = self.object(obj_ref)?;
            hops += 1;
        }
        Ok(current)
    }
}

impl ObjectResolver for HashMap<ObjectRef, Object> {
    fn object(&self, obj_ref: ObjectRef) -> Result<Object> {
        self.get(&obj_ref)
            .cloned()
            .ok_or(Error::ObjectNotFound(obj_ref.id, obj_ref.gen))
    }
}

impl<R: ObjectResolver + ?Sized> ObjectResolver for &R {
    fn object(&self, obj_ref: ObjectRef) -> Result<Object> {
        (**self).object(obj_ref)
    }
}
