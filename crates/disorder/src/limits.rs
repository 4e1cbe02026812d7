//! Wire constants and decode limits.
//!
//! The decoder is expected to read untrusted bytes off a network stream, so
//! allocations and recursion are bounded by [`DecodeLimits`].

/// Maximum byte length of a Name (object key, map key, enum value).
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// Maximum byte length of a string value (4-byte length prefix).
pub const MAX_WIRE_STRING_LEN: usize = u32::MAX as usize;

/// Default maximum nesting of arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default maximum decoded string length (64 MiB).
pub const DEFAULT_MAX_STRING_LEN: usize = 64 * 1024 * 1024;

/// Default maximum number of elements or entries in one container.
pub const DEFAULT_MAX_ELEMENTS: usize = 16 * 1024 * 1024;

/// Bounds applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum nesting of arrays and objects.
    pub max_depth: usize,
    /// Maximum byte length of a decoded string value.
    pub max_string_len: usize,
    /// Maximum number of elements (arrays) or entries (objects).
    pub max_elements: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_elements: DEFAULT_MAX_ELEMENTS,
        }
    }
}

impl DecodeLimits {
    /// Limits that never trigger.
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_string_len: MAX_WIRE_STRING_LEN,
            max_elements: usize::MAX,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_string_len(mut self, max_string_len: usize) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }
}
