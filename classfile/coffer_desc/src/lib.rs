//! Type descriptor symbols for the coffer class-file toolkit.
//!
//! Descriptors are the JVM's textual type notation: `I` for `int`,
//! `Ljava/lang/String;` for a reference type, `(II)V` for a method taking
//! two ints and returning void. The constant pool interns descriptor text;
//! this crate owns the validated symbol objects the pool's symbolic
//! entries are keyed on:
//!
//! - [`ClassDesc`] — one field descriptor (primitive, array, or reference)
//! - [`MethodTypeDesc`] — one method descriptor
//! - [`DirectMethodHandleDesc`] — a method-handle target, validated at
//!   construction (wrong getter/setter arity or a non-void constructor is
//!   rejected here, never deferred to serialization)
//! - [`slots`] — local-variable slot arithmetic derived from descriptors
//!
//! Every symbol caches the base-31 polynomial hash of its descriptor
//! string at construction ([`string_hash`]); the pool's hash-correlation
//! shortcuts are built on top of that cache.

mod class_desc;
mod error;
mod hash31;
mod method_desc;
mod method_handle;
pub mod slots;

pub use class_desc::ClassDesc;
pub use error::DescError;
pub use hash31::string_hash;
pub use method_desc::MethodTypeDesc;
pub use method_handle::{DirectMethodHandleDesc, MethodHandleKind};
