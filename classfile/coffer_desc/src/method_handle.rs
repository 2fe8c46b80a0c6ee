use crate::{ClassDesc, DescError, MethodTypeDesc};
use std::fmt;

/// The nine JVMS 4.4.8 method-handle reference kinds, with the interface
/// variants kept distinct so the pool can pick the member-reference tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodHandleKind {
    /// `REF_getField` — virtual field read, shape `(R)T`.
    Getter,
    /// `REF_getStatic` — static field read, shape `()T`.
    StaticGetter,
    /// `REF_putField` — virtual field write, shape `(R T)V`.
    Setter,
    /// `REF_putStatic` — static field write, shape `(T)V`.
    StaticSetter,
    /// `REF_invokeVirtual`.
    Virtual,
    /// `REF_invokeStatic`.
    Static,
    /// `REF_invokeStatic` on an interface owner.
    InterfaceStatic,
    /// `REF_invokeSpecial`.
    Special,
    /// `REF_invokeSpecial` on an interface owner.
    InterfaceSpecial,
    /// `REF_newInvokeSpecial` — constructor, shape `(T*)V`.
    Constructor,
    /// `REF_invokeInterface`.
    InterfaceVirtual,
}

impl MethodHandleKind {
    /// The `reference_kind` byte serialized in a MethodHandle entry.
    pub fn ref_kind(self) -> u8 {
        match self {
            MethodHandleKind::Getter => 1,
            MethodHandleKind::StaticGetter => 2,
            MethodHandleKind::Setter => 3,
            MethodHandleKind::StaticSetter => 4,
            MethodHandleKind::Virtual => 5,
            MethodHandleKind::Static | MethodHandleKind::InterfaceStatic => 6,
            MethodHandleKind::Special | MethodHandleKind::InterfaceSpecial => 7,
            MethodHandleKind::Constructor => 8,
            MethodHandleKind::InterfaceVirtual => 9,
        }
    }

    /// Field accessor kinds reference a `Fieldref` entry.
    pub fn is_field_accessor(self) -> bool {
        matches!(
            self,
            MethodHandleKind::Getter
                | MethodHandleKind::StaticGetter
                | MethodHandleKind::Setter
                | MethodHandleKind::StaticSetter
        )
    }

    /// Interface kinds reference an `InterfaceMethodref` entry.
    pub fn is_interface(self) -> bool {
        matches!(
            self,
            MethodHandleKind::InterfaceStatic
                | MethodHandleKind::InterfaceSpecial
                | MethodHandleKind::InterfaceVirtual
        )
    }

    /// Kinds whose invocation type gains the receiver as parameter 0.
    fn is_virtual_method(self) -> bool {
        matches!(
            self,
            MethodHandleKind::Virtual
                | MethodHandleKind::Special
                | MethodHandleKind::InterfaceSpecial
                | MethodHandleKind::InterfaceVirtual
        )
    }
}

/// A validated direct method-handle target: kind, owner, member name, and
/// invocation type.
///
/// Shape rules are enforced at construction, following JVMS
/// `MethodHandle` resolution: field accessors must have exact getter/setter arity and
/// void-ness, constructors must return `void`, owners must be
/// class-or-interface types, member names must be unqualified. Virtual
/// method kinds store the invocation type with the receiver inserted as
/// parameter 0; constructors store it with the owner as return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMethodHandleDesc {
    kind: MethodHandleKind,
    owner: ClassDesc,
    name: Box<str>,
    invocation_type: MethodTypeDesc,
}

impl DirectMethodHandleDesc {
    pub fn of(
        kind: MethodHandleKind,
        owner: ClassDesc,
        name: &str,
        invocation_type: MethodTypeDesc,
    ) -> Result<DirectMethodHandleDesc, DescError> {
        let name = if kind == MethodHandleKind::Constructor {
            "<init>"
        } else {
            name
        };
        if !owner.is_class_or_interface() {
            return Err(DescError::NotClassOrInterface {
                descriptor: owner.descriptor().to_owned(),
            });
        }
        validate_member_name(name)?;

        match kind {
            MethodHandleKind::Constructor => validate_constructor(&invocation_type)?,
            MethodHandleKind::Getter => validate_field_type(&invocation_type, false, true)?,
            MethodHandleKind::Setter => validate_field_type(&invocation_type, true, true)?,
            MethodHandleKind::StaticGetter => validate_field_type(&invocation_type, false, false)?,
            MethodHandleKind::StaticSetter => validate_field_type(&invocation_type, true, false)?,
            _ => {}
        }

        let invocation_type = if kind.is_virtual_method() {
            invocation_type.with_leading_parameter(owner.clone())?
        } else if kind == MethodHandleKind::Constructor {
            invocation_type.with_return_type(owner.clone())?
        } else {
            invocation_type
        };

        Ok(DirectMethodHandleDesc {
            kind,
            owner,
            name: name.into(),
            invocation_type,
        })
    }

    pub fn kind(&self) -> MethodHandleKind {
        self.kind
    }

    pub fn owner(&self) -> &ClassDesc {
        &self.owner
    }

    pub fn member_name(&self) -> &str {
        &self.name
    }

    /// The invocation type as normalized at construction.
    pub fn invocation_type(&self) -> &MethodTypeDesc {
        &self.invocation_type
    }

    /// The descriptor string the member reference's NameAndType carries:
    /// a field descriptor for accessor kinds, a method descriptor (without
    /// the receiver, with `V` restored for constructors) otherwise.
    pub fn lookup_descriptor(&self) -> Result<String, DescError> {
        let void = ClassDesc::of_descriptor("V")?;
        Ok(match self.kind {
            MethodHandleKind::Virtual
            | MethodHandleKind::Special
            | MethodHandleKind::InterfaceSpecial
            | MethodHandleKind::InterfaceVirtual => {
                self.invocation_type.drop_first_parameter()?.descriptor().to_owned()
            }
            MethodHandleKind::Static | MethodHandleKind::InterfaceStatic => {
                self.invocation_type.descriptor().to_owned()
            }
            MethodHandleKind::Constructor => {
                self.invocation_type.with_return_type(void)?.descriptor().to_owned()
            }
            MethodHandleKind::Getter | MethodHandleKind::StaticGetter => {
                self.invocation_type.return_type().descriptor().to_owned()
            }
            MethodHandleKind::Setter => match self.invocation_type.parameter(1) {
                Some(t) => t.descriptor().to_owned(),
                None => unreachable_shape(&self.invocation_type)?,
            },
            MethodHandleKind::StaticSetter => match self.invocation_type.parameter(0) {
                Some(t) => t.descriptor().to_owned(),
                None => unreachable_shape(&self.invocation_type)?,
            },
        })
    }
}

impl fmt::Display for DirectMethodHandleDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MethodHandleDesc[{:?}/{}::{}{}]",
            self.kind, self.owner, self.name, self.invocation_type
        )
    }
}

// Setter shapes were validated at construction; a missing parameter here
// would mean the validation above has a hole.
fn unreachable_shape(ty: &MethodTypeDesc) -> Result<String, DescError> {
    Err(DescError::BadFieldAccessor {
        expected: "(R T)V".to_owned(),
        found: ty.descriptor().to_owned(),
    })
}

/// JVMS 4.2.2 unqualified names: non-empty, no `.` `;` `[` `/`; angle
/// brackets only in `<init>` and `<clinit>`.
fn validate_member_name(name: &str) -> Result<(), DescError> {
    let special = name == "<init>" || name == "<clinit>";
    if name.is_empty()
        || name
            .bytes()
            .any(|b| matches!(b, b'.' | b';' | b'[' | b'/'))
        || (!special && name.bytes().any(|b| matches!(b, b'<' | b'>')))
    {
        return Err(DescError::InvalidMemberName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

fn validate_constructor(ty: &MethodTypeDesc) -> Result<(), DescError> {
    if ty.return_type().descriptor() != "V" {
        return Err(DescError::NonVoidConstructor {
            descriptor: ty.descriptor().to_owned(),
        });
    }
    Ok(())
}

/// Field accessor shapes: getters are `()T` / `(R)T`, setters are `(T)V` /
/// `(R T)V`, and a virtual receiver must not be primitive.
fn validate_field_type(
    ty: &MethodTypeDesc,
    is_setter: bool,
    is_virtual: bool,
) -> Result<(), DescError> {
    let is_void = ty.return_type().descriptor() == "V";
    let expected_params = usize::from(is_setter) + usize::from(is_virtual);
    let bad_receiver = is_virtual && ty.parameter(0).is_some_and(ClassDesc::is_primitive);
    if is_void != is_setter || ty.parameter_count() != expected_params || bad_receiver {
        let expected = format!(
            "({}{}){}",
            if is_virtual { "R" } else { "" },
            if is_setter { "T" } else { "" },
            if is_setter { "V" } else { "T" },
        );
        return Err(DescError::BadFieldAccessor {
            expected,
            found: ty.descriptor().to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cd(d: &str) -> ClassDesc {
        ClassDesc::of_descriptor(d).unwrap_or_else(|e| panic!("{e}"))
    }

    fn mt(d: &str) -> MethodTypeDesc {
        MethodTypeDesc::of_descriptor(d).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_ref_kind_bytes() {
        assert_eq!(MethodHandleKind::Getter.ref_kind(), 1);
        assert_eq!(MethodHandleKind::StaticSetter.ref_kind(), 4);
        assert_eq!(MethodHandleKind::Virtual.ref_kind(), 5);
        assert_eq!(MethodHandleKind::InterfaceStatic.ref_kind(), 6);
        assert_eq!(MethodHandleKind::Constructor.ref_kind(), 8);
        assert_eq!(MethodHandleKind::InterfaceVirtual.ref_kind(), 9);
    }

    #[test]
    fn test_virtual_method_gains_receiver() {
        let mh = DirectMethodHandleDesc::of(
            MethodHandleKind::Virtual,
            cd("LFoo;"),
            "bar",
            mt("(I)J"),
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(mh.invocation_type().descriptor(), "(LFoo;I)J");
        assert_eq!(
            mh.lookup_descriptor().unwrap_or_else(|e| panic!("{e}")),
            "(I)J"
        );
    }

    #[test]
    fn test_constructor_forces_init_name_and_owner_return() {
        let mh = DirectMethodHandleDesc::of(
            MethodHandleKind::Constructor,
            cd("LFoo;"),
            "ignored",
            mt("(I)V"),
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(mh.member_name(), "<init>");
        assert_eq!(mh.invocation_type().descriptor(), "(I)LFoo;");
        assert_eq!(
            mh.lookup_descriptor().unwrap_or_else(|e| panic!("{e}")),
            "(I)V"
        );
    }

    #[test]
    fn test_constructor_rejects_non_void_return() {
        let err = DirectMethodHandleDesc::of(
            MethodHandleKind::Constructor,
            cd("LFoo;"),
            "x",
            mt("(I)I"),
        );
        assert!(matches!(err, Err(DescError::NonVoidConstructor { .. })));
    }

    #[test]
    fn test_getter_setter_shapes() {
        // Static getter: ()T.
        let mh = DirectMethodHandleDesc::of(
            MethodHandleKind::StaticGetter,
            cd("LFoo;"),
            "f",
            mt("()I"),
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            mh.lookup_descriptor().unwrap_or_else(|e| panic!("{e}")),
            "I"
        );

        // Virtual setter: (R T)V.
        let mh = DirectMethodHandleDesc::of(
            MethodHandleKind::Setter,
            cd("LFoo;"),
            "f",
            mt("(LFoo;I)V"),
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            mh.lookup_descriptor().unwrap_or_else(|e| panic!("{e}")),
            "I"
        );
    }

    #[test]
    fn test_accessor_shape_rejections() {
        // Getter must not return void.
        assert!(matches!(
            DirectMethodHandleDesc::of(MethodHandleKind::StaticGetter, cd("LFoo;"), "f", mt("()V")),
            Err(DescError::BadFieldAccessor { .. })
        ));
        // Setter arity wrong.
        assert!(matches!(
            DirectMethodHandleDesc::of(MethodHandleKind::StaticSetter, cd("LFoo;"), "f", mt("()V")),
            Err(DescError::BadFieldAccessor { .. })
        ));
        // Virtual getter with primitive receiver.
        assert!(matches!(
            DirectMethodHandleDesc::of(MethodHandleKind::Getter, cd("LFoo;"), "f", mt("(I)I")),
            Err(DescError::BadFieldAccessor { .. })
        ));
    }

    #[test]
    fn test_owner_and_name_rejections() {
        assert!(matches!(
            DirectMethodHandleDesc::of(MethodHandleKind::Static, cd("I"), "f", mt("()I")),
            Err(DescError::NotClassOrInterface { .. })
        ));
        assert!(matches!(
            DirectMethodHandleDesc::of(MethodHandleKind::Static, cd("LFoo;"), "a.b", mt("()I")),
            Err(DescError::InvalidMemberName { .. })
        ));
        assert!(matches!(
            DirectMethodHandleDesc::of(MethodHandleKind::Static, cd("LFoo;"), "<i>", mt("()I")),
            Err(DescError::InvalidMemberName { .. })
        ));
    }
}
