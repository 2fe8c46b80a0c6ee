use crate::{string_hash, DescError};
use std::fmt;

/// A validated field type descriptor: a primitive letter, an array type,
/// or a reference type in `L<internal name>;` form.
///
/// The descriptor string is immutable after construction and its base-31
/// hash is cached, so repeated pool lookups never rescan it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassDesc {
    descriptor: Box<str>,
    hash: u32,
}

impl ClassDesc {
    /// Parse a field type descriptor (`I`, `[[J`, `Ljava/lang/String;`, ...).
    ///
    /// `V` is accepted bare (the void pseudo-type) but not under an array.
    pub fn of_descriptor(descriptor: &str) -> Result<ClassDesc, DescError> {
        let bytes = descriptor.as_bytes();
        match skip_field_descriptor(bytes, 0) {
            Some(end) if end == bytes.len() && end > 0 => Ok(ClassDesc {
                descriptor: descriptor.into(),
                hash: string_hash(descriptor),
            }),
            _ => Err(DescError::InvalidFieldDescriptor {
                descriptor: descriptor.to_owned(),
            }),
        }
    }

    /// Build the `L<name>;` descriptor for an internal class name
    /// (slash-separated, e.g. `java/lang/String`).
    pub fn of_internal_name(name: &str) -> Result<ClassDesc, DescError> {
        if name.is_empty()
            || name.split('/').any(str::is_empty)
            || name.bytes().any(|b| matches!(b, b'.' | b';' | b'['))
        {
            return Err(DescError::InvalidInternalName {
                name: name.to_owned(),
            });
        }
        let descriptor = format!("L{name};");
        let hash = string_hash(&descriptor);
        Ok(ClassDesc {
            descriptor: descriptor.into_boxed_str(),
            hash,
        })
    }

    /// The descriptor string.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Cached base-31 hash of the descriptor string.
    pub fn descriptor_hash(&self) -> u32 {
        self.hash
    }

    /// One-letter primitive (or void) descriptor?
    pub fn is_primitive(&self) -> bool {
        self.descriptor.len() == 1
    }

    /// Array type?
    pub fn is_array(&self) -> bool {
        self.descriptor.starts_with('[')
    }

    /// Non-array reference type (`L...;` form)?
    pub fn is_class_or_interface(&self) -> bool {
        self.descriptor.starts_with('L')
    }

    /// The internal name for a class-or-interface descriptor
    /// (`Ljava/lang/String;` → `java/lang/String`), `None` otherwise.
    pub fn internal_name(&self) -> Option<&str> {
        if self.is_class_or_interface() {
            Some(&self.descriptor[1..self.descriptor.len() - 1])
        } else {
            None
        }
    }
}

impl fmt::Display for ClassDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor)
    }
}

/// Skip one field descriptor starting at `i`, returning the index just
/// past it, or `None` if no valid descriptor starts there.
///
/// Also used by the method descriptor parser, where `V` in parameter
/// position must be rejected by the caller.
pub(crate) fn skip_field_descriptor(bytes: &[u8], mut i: usize) -> Option<usize> {
    let mut depth = 0usize;
    while bytes.get(i) == Some(&b'[') {
        depth += 1;
        i += 1;
    }
    // JVMS 4.3.2: at most 255 array dimensions.
    if depth > 255 {
        return None;
    }
    match bytes.get(i)? {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' => Some(i + 1),
        // Bare void only; `[V` is never a type.
        b'V' if depth == 0 => Some(i + 1),
        b'L' => {
            let body_start = i + 1;
            let rel = bytes[body_start..].iter().position(|&b| b == b';')?;
            if rel == 0 || bytes[body_start..body_start + rel].contains(&b'.') {
                return None;
            }
            Some(body_start + rel + 1)
        }
        _ => None,
    }
}
