use crate::class_desc::skip_field_descriptor;
use crate::{string_hash, ClassDesc, DescError};
use smallvec::SmallVec;
use std::fmt;

/// A validated method descriptor: `(<parameters>)<return>`.
///
/// Parameter types may not be `void`; the return type may be any field
/// descriptor including `V`. The composed descriptor string and its hash
/// are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTypeDesc {
    descriptor: Box<str>,
    params: SmallVec<[ClassDesc; 4]>,
    ret: ClassDesc,
    hash: u32,
}

impl MethodTypeDesc {
    /// Parse a method descriptor such as `(ILjava/lang/String;)V`.
    pub fn of_descriptor(descriptor: &str) -> Result<MethodTypeDesc, DescError> {
        let invalid = || DescError::InvalidMethodDescriptor {
            descriptor: descriptor.to_owned(),
        };
        let bytes = descriptor.as_bytes();
        if bytes.first() != Some(&b'(') {
            return Err(invalid());
        }
        let mut params = SmallVec::new();
        let mut i = 1;
        while bytes.get(i) != Some(&b')') {
            let end = skip_field_descriptor(bytes, i).ok_or_else(invalid)?;
            let param = ClassDesc::of_descriptor(&descriptor[i..end]).map_err(|_| invalid())?;
            if param.descriptor() == "V" {
                return Err(invalid());
            }
            params.push(param);
            i = end;
        }
        let ret_start = i + 1;
        match skip_field_descriptor(bytes, ret_start) {
            Some(end) if end == bytes.len() => {
                let ret = ClassDesc::of_descriptor(&descriptor[ret_start..])
                    .map_err(|_| invalid())?;
                Ok(MethodTypeDesc {
                    descriptor: descriptor.into(),
                    params,
                    ret,
                    hash: string_hash(descriptor),
                })
            }
            _ => Err(invalid()),
        }
    }

    /// Compose a method type from parameter and return descriptors.
    pub fn of(
        params: impl IntoIterator<Item = ClassDesc>,
        ret: ClassDesc,
    ) -> Result<MethodTypeDesc, DescError> {
        let params: SmallVec<[ClassDesc; 4]> = params.into_iter().collect();
        if params.iter().any(|p| p.descriptor() == "V") {
            return Err(DescError::InvalidMethodDescriptor {
                descriptor: "void parameter".to_owned(),
            });
        }
        let mut descriptor = String::with_capacity(2 + params.len() * 2 + ret.descriptor().len());
        descriptor.push('(');
        for p in &params {
            descriptor.push_str(p.descriptor());
        }
        descriptor.push(')');
        descriptor.push_str(ret.descriptor());
        let hash = string_hash(&descriptor);
        Ok(MethodTypeDesc {
            descriptor: descriptor.into_boxed_str(),
            params,
            ret,
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

    pub fn parameter_count(&self) -> usize {
        self.params.len()
    }

    pub fn parameter(&self, i: usize) -> Option<&ClassDesc> {
        self.params.get(i)
    }

    pub fn parameters(&self) -> &[ClassDesc] {
        &self.params
    }

    pub fn return_type(&self) -> &ClassDesc {
        &self.ret
    }

    /// A copy with `p` prepended to the parameter list (receiver insertion
    /// for virtual method-handle kinds).
    pub fn with_leading_parameter(&self, p: ClassDesc) -> Result<MethodTypeDesc, DescError> {
        MethodTypeDesc::of(
            std::iter::once(p).chain(self.params.iter().cloned()),
            self.ret.clone(),
        )
    }

    /// A copy without the leading parameter (the receiver), for computing
    /// method-handle lookup descriptors.
    pub fn drop_first_parameter(&self) -> Result<MethodTypeDesc, DescError> {
        if self.params.is_empty() {
            return Err(DescError::NoLeadingParameter {
                descriptor: self.descriptor.clone().into_string(),
            });
        }
        MethodTypeDesc::of(self.params[1..].iter().cloned(), self.ret.clone())
    }

    /// A copy with the return type replaced.
    pub fn with_return_type(&self, ret: ClassDesc) -> Result<MethodTypeDesc, DescError> {
        MethodTypeDesc::of(self.params.iter().cloned(), ret)
    }
}

impl fmt::Display for MethodTypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor)
    }
}
