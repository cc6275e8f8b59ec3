//! Typed handles into the entity collections of a [`crate::model::ModuleDefinition`].
//!
//! Entities refer to each other by position instead of by token: tokens are only known once
//! a build has run, while handles stay valid for the lifetime of the module.

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(usize);

        impl $name {
            /// Creates a handle for the entity at `index`.
            #[must_use]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Position of the entity in its collection.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0
            }
        }
    };
}

define_handle!(
    /// Handle of a [`crate::model::TypeDefinition`]
    TypeDefId
);
define_handle!(
    /// Handle of a [`crate::model::FieldDefinition`]
    FieldId
);
define_handle!(
    /// Handle of a [`crate::model::MethodDefinition`]
    MethodId
);
define_handle!(
    /// Handle of a [`crate::model::TypeReference`]
    TypeRefId
);
define_handle!(
    /// Handle of a [`crate::model::MemberReference`]
    MemberRefId
);
define_handle!(
    /// Handle of a [`crate::model::TypeSpecification`]
    TypeSpecId
);
define_handle!(
    /// Handle of a [`crate::model::MethodSpecification`]
    MethodSpecId
);
define_handle!(
    /// Handle of a [`crate::model::AssemblyReference`]
    AssemblyRefId
);
define_handle!(
    /// Handle of a [`crate::model::ModuleReference`]
    ModuleRefId
);

/// A type as it can appear in a signature or an `extends` clause (`TypeDefOrRef`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeHandle {
    /// A type defined in this module
    Def(TypeDefId),
    /// A type defined elsewhere
    Ref(TypeRefId),
    /// A constructed type
    Spec(TypeSpecId),
}

/// The method instantiated by a `MethodSpec` (`MethodDefOrRef`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodHandle {
    /// A method defined in this module
    Def(MethodId),
    /// A method reference
    Ref(MemberRefId),
}

/// Where a referenced type lives (`ResolutionScope`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionScope {
    /// The current module
    Module,
    /// Another module of the same assembly
    ModuleRef(ModuleRefId),
    /// Another assembly
    AssemblyRef(AssemblyRefId),
    /// The enclosing type of a nested type reference
    TypeRef(TypeRefId),
}

/// The owner of a member reference (`MemberRefParent`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberRefParent {
    /// A type defined in this module
    TypeDef(TypeDefId),
    /// A referenced type
    TypeRef(TypeRefId),
    /// A global member of another module
    ModuleRef(ModuleRefId),
    /// A vararg call site of a method defined in this module
    MethodDef(MethodId),
    /// A member of a constructed type
    TypeSpec(TypeSpecId),
}

/// The entity declaring a generic parameter (`TypeOrMethodDef`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenericParamOwner {
    /// A generic type
    Type(TypeDefId),
    /// A generic method
    Method(MethodId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_roundtrip() {
        let id = TypeRefId::new(7);
        assert_eq!(id.index(), 7);
        assert!(TypeRefId::new(1) < TypeRefId::new(2));
        assert_ne!(TypeHandle::Ref(id), TypeHandle::Ref(TypeRefId::new(8)));
    }
}
