//! Class-file constant pools with structural-hash interning.
//!
//! The pool keeps every constant exactly once. Lookups key on a
//! structural hash derived from an entry's tag and sub-entry hashes, so
//! a composite entry can be located without touching its text, and a
//! descriptor object can find its `Class` entry without ever building
//! the descriptor string. Pools parsed from an existing class file keep
//! the original bytes and re-emit them verbatim on write.
//!
//! ```
//! use coffer_pool::ConstantPool;
//!
//! # fn main() -> Result<(), coffer_pool::PoolError> {
//! let mut pool = ConstantPool::new();
//! let hello = pool.intern_utf8("hello")?;
//! assert_eq!(pool.intern_utf8("hello")?, hello);
//! let class = pool.intern_class_by_name("hello")?;
//! assert_eq!(pool.utf8_text(hello), Some("hello"));
//! assert_eq!(class.raw(), 3);
//! # Ok(())
//! # }
//! ```

mod entry;
mod error;
pub mod hash;
mod index;
mod map;
mod pool;
mod reader;
mod tag;
mod writer;

pub use entry::{Entry, EntryKind, TypeSym, Utf8Data};
pub use error::PoolError;
pub use index::{ClassIdx, EntryIdx, MemberIdx, NatIdx, Utf8Idx};
pub use map::{EntryMap, Token};
pub use pool::ConstantPool;
pub use reader::{parse_pool, ParsedPool, ReadError};
pub use tag::Tag;
pub use writer::BufWriter;
