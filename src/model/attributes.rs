//! Attribute flag values stored in the `Flags` columns of definition rows.
//!
//! The builder copies flag values into rows unchanged; these constants exist so callers can
//! compose them without magic numbers.

use bitflags::bitflags;

#[allow(non_snake_case)]
/// Common `TypeAttributes` values (II.23.1.15)
pub mod TypeAttributes {
    /// Visibility mask
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Class has no public scope
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    /// Class has public scope
    pub const PUBLIC: u32 = 0x0000_0001;
    /// Nested class with public visibility
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;
    /// Nested class with private visibility
    pub const NESTED_PRIVATE: u32 = 0x0000_0003;
    /// Type is an interface
    pub const INTERFACE: u32 = 0x0000_0020;
    /// Class is abstract
    pub const ABSTRACT: u32 = 0x0000_0080;
    /// Class cannot be extended
    pub const SEALED: u32 = 0x0000_0100;
    /// Initialize the class before first static field access
    pub const BEFORE_FIELD_INIT: u32 = 0x0010_0000;
}

#[allow(non_snake_case)]
/// Common `FieldAttributes` values (II.23.1.5)
pub mod FieldAttributes {
    /// Accessible only by the parent type
    pub const PRIVATE: u16 = 0x0001;
    /// Accessible by anyone who has visibility to this scope
    pub const PUBLIC: u16 = 0x0006;
    /// Defined on type, else per instance
    pub const STATIC: u16 = 0x0010;
    /// Field can only be initialized, not written to after init
    pub const INIT_ONLY: u16 = 0x0020;
    /// Value is compile time constant
    pub const LITERAL: u16 = 0x0040;
}

#[allow(non_snake_case)]
/// Common `MethodAttributes` values (II.23.1.10)
pub mod MethodAttributes {
    /// Accessible only by the parent type
    pub const PRIVATE: u16 = 0x0001;
    /// Accessible by anyone who has visibility to this scope
    pub const PUBLIC: u16 = 0x0006;
    /// Defined on type, else per instance
    pub const STATIC: u16 = 0x0010;
    /// Method is virtual
    pub const VIRTUAL: u16 = 0x0040;
    /// Method hides by name and signature
    pub const HIDE_BY_SIG: u16 = 0x0080;
    /// Method is special
    pub const SPECIAL_NAME: u16 = 0x0800;
    /// CLI provides special behavior, depending upon the name of the method
    pub const RT_SPECIAL_NAME: u16 = 0x1000;
}

#[allow(non_snake_case)]
/// Common `ParamAttributes` values (II.23.1.13)
pub mod ParamAttributes {
    /// Param is \[In\]
    pub const IN: u16 = 0x0001;
    /// Param is \[out\]
    pub const OUT: u16 = 0x0002;
    /// Param is optional
    pub const OPTIONAL: u16 = 0x0010;
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
    /// `GenericParamAttributes` (II.23.1.7)
    pub struct GenericParamAttributes : u16 {
        /// The generic parameter is covariant
        const COVARIANT = 0x0001;
        /// The generic parameter is contravariant
        const CONTRAVARIANT = 0x0002;
        /// The generic parameter has a reference type constraint
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        /// The generic parameter has a value type constraint
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        /// The generic parameter has a constructor constraint
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
        /// Variance bits
        const VARIANCE_MASK = 0x0003;
        /// Special constraint bits
        const SPECIAL_CONSTRAINT_MASK = 0x001C;
    }
}
