// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests over interning, parsing, and serialization.

use std::sync::Arc;

use coffer_desc::{ClassDesc, DirectMethodHandleDesc, MethodHandleKind, MethodTypeDesc};
use coffer_pool::{parse_pool, BufWriter, ConstantPool, EntryKind, PoolError, ReadError, TypeSym};
use pretty_assertions::assert_eq;

fn class(descriptor: &str) -> Arc<ClassDesc> {
    Arc::new(ClassDesc::of_descriptor(descriptor).unwrap())
}

#[test]
fn test_utf8_then_class_assigns_expected_indices() {
    let mut pool = ConstantPool::new();
    let hello = pool.intern_utf8("hello").unwrap();
    assert_eq!(hello.raw(), 1);
    assert_eq!(pool.intern_utf8("hello").unwrap(), hello);

    let class_idx = pool.intern_class(&class("Lhello;")).unwrap();
    assert_eq!(class_idx.raw(), 3);
    assert_eq!(pool.size(), 4);

    // The class entry's name sits at 2 and spells the descriptor.
    match pool.entry(3).unwrap().kind() {
        EntryKind::Class { name } => {
            assert_eq!(name.raw(), 2);
            assert_eq!(pool.utf8_text(*name), Some("Lhello;"));
        }
        other => panic!("expected class entry, got {other:?}"),
    }
}

#[test]
fn test_scenario_serializes_byte_exact() {
    let mut pool = ConstantPool::new();
    pool.intern_utf8("hello").unwrap();
    pool.intern_class(&class("Lhello;")).unwrap();

    let mut expected = vec![0u8, 4];
    expected.extend_from_slice(&[1, 0, 5]);
    expected.extend_from_slice(b"hello");
    expected.extend_from_slice(&[1, 0, 7]);
    expected.extend_from_slice(b"Lhello;");
    expected.extend_from_slice(&[7, 0, 2]);
    assert_eq!(pool.serialize().unwrap(), expected);
}

#[test]
fn test_every_operation_is_idempotent() {
    let mut pool = ConstantPool::new();
    let string = pool.intern_string("s").unwrap();
    let int = pool.intern_int(-7).unwrap();
    let long = pool.intern_long(1 << 40).unwrap();
    let float = pool.intern_float(2.5).unwrap();
    let double = pool.intern_double(-0.0).unwrap();
    let owner = pool.intern_class_by_name("p/Owner").unwrap();
    let nat = pool.intern_name_and_type("f", "I").unwrap();
    let field = pool.intern_field_ref(owner, nat).unwrap();
    let method = pool.intern_method_ref(owner, nat).unwrap();
    let module = pool.intern_module("m").unwrap();
    let package = pool.intern_package("p").unwrap();
    let indy = pool.intern_invoke_dynamic(0, nat).unwrap();
    let size = pool.size();

    assert_eq!(pool.intern_string("s").unwrap(), string);
    assert_eq!(pool.intern_int(-7).unwrap(), int);
    assert_eq!(pool.intern_long(1 << 40).unwrap(), long);
    assert_eq!(pool.intern_float(2.5).unwrap(), float);
    assert_eq!(pool.intern_double(-0.0).unwrap(), double);
    assert_eq!(pool.intern_class_by_name("p/Owner").unwrap(), owner);
    assert_eq!(pool.intern_name_and_type("f", "I").unwrap(), nat);
    assert_eq!(pool.intern_field_ref(owner, nat).unwrap(), field);
    assert_eq!(pool.intern_method_ref(owner, nat).unwrap(), method);
    assert_eq!(pool.intern_module("m").unwrap(), module);
    assert_eq!(pool.intern_package("p").unwrap(), package);
    assert_eq!(pool.intern_invoke_dynamic(0, nat).unwrap(), indy);
    assert_eq!(pool.size(), size);
}

#[test]
fn test_distinct_dynamic_bootstrap_indices_do_not_pool() {
    let mut pool = ConstantPool::new();
    let nat = pool.intern_name_and_type("get", "()I").unwrap();
    let first = pool.intern_dynamic(0, nat).unwrap();
    let second = pool.intern_dynamic(1, nat).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_wide_literals_leave_a_gap() {
    let mut pool = ConstantPool::new();
    let long = pool.intern_long(5).unwrap();
    assert_eq!(long.raw(), 1);
    assert!(pool.entry(2).is_none());
    let next = pool.intern_utf8("after").unwrap();
    assert_eq!(next.raw(), 3);
    assert_eq!(pool.size(), 4);
}

#[test]
fn test_nan_floats_pool_together() {
    let mut pool = ConstantPool::new();
    let canonical = pool.intern_float(f32::NAN).unwrap();
    let payload = pool.intern_float(f32::from_bits(0x7fc0_1234)).unwrap();
    assert_eq!(canonical, payload);
    let d = pool.intern_double(f64::NAN).unwrap();
    assert_eq!(
        pool.intern_double(f64::from_bits(0x7ff8_0000_0000_cafe)).unwrap(),
        d
    );
}

#[test]
fn test_symbolic_interning_keys_on_identity() {
    let mut pool = ConstantPool::new();
    let first = class("LA;");
    let second = class("LA;");
    let a = pool.intern_symbol_utf8(&TypeSym::Class(Arc::clone(&first)), false).unwrap();
    let b = pool.intern_symbol_utf8(&TypeSym::Class(Arc::clone(&first)), false).unwrap();
    let c = pool.intern_symbol_utf8(&TypeSym::Class(second), false).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c, "value-equal descriptors behind distinct objects");
    assert_eq!(pool.utf8_text(a), Some("LA;"));
}

#[test]
fn test_same_descriptor_object_reuses_class_entry() {
    let mut pool = ConstantPool::new();
    let desc = class("Lp/C;");
    let first = pool.intern_class(&desc).unwrap();
    assert_eq!(pool.intern_class(&desc).unwrap(), first);
    // The by-name path lands on the same entry through the hash
    // correlation even though the text was never compared eagerly.
    let size = pool.size();
    assert_eq!(pool.intern_class_by_name("p/C").unwrap(), first);
    assert_eq!(pool.size(), size, "by-name intern must not duplicate entries");
    // Plain content interning converges on the symbolic Utf8 too.
    let utf8 = pool.intern_utf8("Lp/C;").unwrap();
    assert_eq!(pool.utf8_text(utf8), Some("Lp/C;"));
    assert_eq!(pool.size(), size);
}

#[test]
fn test_primitive_class_entry_rejected() {
    let mut pool = ConstantPool::new();
    let err = pool.intern_class(&class("I")).unwrap_err();
    assert!(matches!(err, PoolError::PrimitiveClassEntry { .. }));
}

#[test]
fn test_oversized_descriptor_rejected_at_intern_time() {
    let mut pool = ConstantPool::new();
    let name = "a".repeat(70_000);
    let err = pool.intern_class_by_name(&name).unwrap_err();
    assert!(matches!(err, PoolError::Utf8TooLong { len } if len > 65_535));

    let desc = class(&format!("L{name};"));
    let err = pool
        .intern_symbol_utf8(&TypeSym::Class(desc), false)
        .unwrap_err();
    assert!(matches!(err, PoolError::Utf8TooLong { .. }));
    // Neither failed path may leave a partial entry behind.
    assert_eq!(pool.size(), 1);
}

#[test]
fn test_method_handle_chain_interns_every_link() {
    let mut pool = ConstantPool::new();
    let owner = ClassDesc::of_internal_name("p/C").unwrap();
    let invocation = MethodTypeDesc::of_descriptor("(I)J").unwrap();
    let handle =
        DirectMethodHandleDesc::of(MethodHandleKind::Virtual, owner, "m", invocation).unwrap();

    let index = pool.intern_method_handle_of(&handle).unwrap();
    let again = pool.intern_method_handle_of(&handle).unwrap();
    assert_eq!(index, again);

    match pool.entry(index.raw()).unwrap().kind() {
        EntryKind::MethodHandle { ref_kind, member } => {
            assert_eq!(*ref_kind, 5);
            match pool.entry(member.raw()).unwrap().kind() {
                EntryKind::MethodRef { owner, name_and_type } => {
                    match pool.entry(name_and_type.raw()).unwrap().kind() {
                        EntryKind::NameAndType { name, descriptor } => {
                            assert_eq!(pool.utf8_text(*name), Some("m"));
                            // Receiver stays out of the lookup descriptor.
                            assert_eq!(pool.utf8_text(*descriptor), Some("(I)J"));
                        }
                        other => panic!("expected name-and-type, got {other:?}"),
                    }
                    match pool.entry(owner.raw()).unwrap().kind() {
                        EntryKind::Class { name } => {
                            assert_eq!(pool.utf8_text(*name), Some("Lp/C;"));
                        }
                        other => panic!("expected class, got {other:?}"),
                    }
                }
                other => panic!("expected method ref, got {other:?}"),
            }
        }
        other => panic!("expected method handle, got {other:?}"),
    }
}

#[test]
fn test_static_getter_handle_uses_field_ref() {
    let mut pool = ConstantPool::new();
    let owner = ClassDesc::of_internal_name("p/C").unwrap();
    let invocation = MethodTypeDesc::of_descriptor("()I").unwrap();
    let handle =
        DirectMethodHandleDesc::of(MethodHandleKind::StaticGetter, owner, "f", invocation)
            .unwrap();
    let index = pool.intern_method_handle_of(&handle).unwrap();
    match pool.entry(index.raw()).unwrap().kind() {
        EntryKind::MethodHandle { ref_kind, member } => {
            assert_eq!(*ref_kind, 2);
            assert!(matches!(
                pool.entry(member.raw()).unwrap().kind(),
                EntryKind::FieldRef { .. }
            ));
        }
        other => panic!("expected method handle, got {other:?}"),
    }
}

#[test]
fn test_method_type_interning() {
    let mut pool = ConstantPool::new();
    let desc = Arc::new(MethodTypeDesc::of_descriptor("(Ljava/lang/String;)V").unwrap());
    let first = pool.intern_method_type(&desc).unwrap();
    assert_eq!(pool.intern_method_type(&desc).unwrap(), first);
}

// ---- parsing and derived pools ------------------------------------------

fn sample_pool_bytes() -> Vec<u8> {
    let mut pool = ConstantPool::new();
    pool.intern_utf8("hello").unwrap();
    pool.intern_class(&class("Lhello;")).unwrap();
    pool.intern_string("greeting").unwrap();
    pool.intern_long(99).unwrap();
    pool.serialize().unwrap()
}

#[test]
fn test_parse_round_trips_byte_exact() {
    let bytes = sample_pool_bytes();
    let parsed = parse_pool(&bytes).unwrap();
    assert_eq!(parsed.byte_len(), bytes.len());
    let derived = ConstantPool::derived(parsed);
    assert!(derived.is_derived());
    assert_eq!(derived.serialize().unwrap(), bytes);
}

#[test]
fn test_derived_pool_reuses_parent_entries() {
    let bytes = sample_pool_bytes();
    let mut pool = ConstantPool::derived(parse_pool(&bytes).unwrap());
    let size = pool.size();

    assert_eq!(pool.intern_utf8("hello").unwrap().raw(), 1);
    // A fresh descriptor object still matches the parent's text through
    // the content hash, so no patch entry appears.
    assert_eq!(pool.intern_class(&class("Lhello;")).unwrap().raw(), 3);
    assert_eq!(pool.intern_class_by_name("hello").unwrap().raw(), 3);
    assert_eq!(pool.intern_long(99).unwrap().raw(), 6);
    assert_eq!(pool.size(), size);
}

#[test]
fn test_derived_pool_appends_after_parent() {
    let bytes = sample_pool_bytes();
    let mut pool = ConstantPool::derived(parse_pool(&bytes).unwrap());
    let size = pool.size();

    let fresh = pool.intern_utf8("other").unwrap();
    assert_eq!(fresh.raw(), size);
    assert_eq!(pool.size(), size + 1);

    let reserialized = pool.serialize().unwrap();
    // Parent bytes stay verbatim; only the count and the tail change.
    assert_eq!(&reserialized[2..bytes.len()], &bytes[2..]);
}

#[test]
fn test_internal_name_spelling_matches_parent_by_correlation() {
    let mut out = BufWriter::new();
    out.write_u2(3);
    out.write_u1(1);
    out.write_utf("java/lang/Object").unwrap();
    out.write_u1(7);
    out.write_u2(1);
    let bytes = out.into_bytes();

    let mut pool = ConstantPool::derived(parse_pool(&bytes).unwrap());
    let sym = TypeSym::Class(class("Ljava/lang/Object;"));
    let index = pool.intern_symbol_utf8(&sym, true).unwrap();
    assert_eq!(index.raw(), 1);
    assert_eq!(pool.size(), 3);
}

#[test]
fn test_parse_rejects_truncated_input() {
    let mut bytes = sample_pool_bytes();
    bytes.truncate(bytes.len() - 1);
    assert!(matches!(
        parse_pool(&bytes).unwrap_err(),
        ReadError::Truncated { .. }
    ));
}

#[test]
fn test_parse_rejects_retired_tag() {
    let bytes = vec![0, 2, 2, 0, 0];
    assert!(matches!(
        parse_pool(&bytes).unwrap_err(),
        ReadError::BadTag { tag: 2, offset: 2 }
    ));
}

#[test]
fn test_parse_rejects_zero_count() {
    assert_eq!(parse_pool(&[0, 0]).unwrap_err(), ReadError::BadCount);
}

#[test]
fn test_parse_rejects_wide_entry_overrunning_count() {
    // Count 2 leaves one slot, but a long needs two.
    let mut out = BufWriter::new();
    out.write_u2(2);
    out.write_u1(5);
    out.write_u8(1);
    assert_eq!(parse_pool(&out.into_bytes()).unwrap_err(), ReadError::BadCount);
}

#[test]
fn test_parse_rejects_incompatible_reference() {
    // A class entry whose name points at an integer.
    let mut out = BufWriter::new();
    out.write_u2(3);
    out.write_u1(3);
    out.write_u4(0);
    out.write_u1(7);
    out.write_u2(1);
    assert_eq!(
        parse_pool(&out.into_bytes()).unwrap_err(),
        ReadError::BadIndex { index: 1 }
    );
}

#[test]
fn test_parse_rejects_out_of_range_reference() {
    let mut out = BufWriter::new();
    out.write_u2(2);
    out.write_u1(7);
    out.write_u2(9);
    assert_eq!(
        parse_pool(&out.into_bytes()).unwrap_err(),
        ReadError::BadIndex { index: 9 }
    );
}

#[test]
fn test_parse_rejects_bad_method_handle_kind() {
    let mut out = BufWriter::new();
    out.write_u2(2);
    out.write_u1(15);
    out.write_u1(12);
    out.write_u2(1);
    assert!(matches!(
        parse_pool(&out.into_bytes()).unwrap_err(),
        ReadError::BadRefKind { kind: 12, .. }
    ));
}

#[test]
fn test_parse_reports_malformed_utf8_at_absolute_offset() {
    let mut out = BufWriter::new();
    out.write_u2(2);
    out.write_u1(1);
    out.write_u2(2);
    out.write_bytes(&[0xE4, 0x41]);
    let err = parse_pool(&out.into_bytes()).unwrap_err();
    assert!(matches!(err, ReadError::Utf(_)), "got {err:?}");
}

#[test]
fn test_pool_overflow_reported() {
    let mut pool = ConstantPool::new();
    for i in 0..u32::from(u16::MAX) - 1 {
        pool.intern_int(i32::try_from(i).unwrap()).unwrap();
    }
    assert!(matches!(
        pool.intern_utf8("one too many").unwrap_err(),
        PoolError::PoolOverflow { .. }
    ));
}
