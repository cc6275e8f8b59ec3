use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::{Error, Result};

/// Identifiers for the different metadata tables defined in the ECMA-335 specification.
///
/// The numeric values are the table numbers of II.22; they form the high byte of every
/// [`crate::metadata::token::Token`] that points into the table and select the bit in the
/// `Valid` mask of the `#~` stream header.
///
/// The builder populates the tables a module needs to describe its types, members,
/// references and generic instantiations. The remaining tables are listed so that coded
/// index widths and token decoding cover the full numbering space.
///
/// ## Tables populated by the builder
///
/// - **`Module`**, **`ModuleRef`**, **`AssemblyRef`**: module identity and resolution scopes
/// - **`TypeRef`**, **`TypeDef`**, **`TypeSpec`**, **`NestedClass`**: types
/// - **`Field`**, **`MethodDef`**, **`Param`**, **`MemberRef`**: members
/// - **`StandAloneSig`**: standalone signatures (locals, `calli` sites)
/// - **`GenericParam`**, **`GenericParamConstraint`**, **`MethodSpec`**: generics
///
/// ## Reference
/// * [ECMA-335 Partition II, Section 22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Metadata Tables
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, EnumIter, EnumCount, IntoStaticStr,
)]
pub enum TableId {
    /// `Module` table (0x00) - Exactly one row describing the current module.
    Module = 0x00,
    /// `TypeRef` table (0x01) - References to types defined in other scopes.
    TypeRef = 0x01,
    /// `TypeDef` table (0x02) - Types defined in this module.
    TypeDef = 0x02,
    /// `FieldPtr` table (0x03) - Indirection table of uncompressed metadata.
    FieldPtr = 0x03,
    /// `Field` table (0x04) - Field definitions, owned in runs by `TypeDef` rows.
    Field = 0x04,
    /// `MethodPtr` table (0x05) - Indirection table of uncompressed metadata.
    MethodPtr = 0x05,
    /// `MethodDef` table (0x06) - Method definitions, owned in runs by `TypeDef` rows.
    MethodDef = 0x06,
    /// `ParamPtr` table (0x07) - Indirection table of uncompressed metadata.
    ParamPtr = 0x07,
    /// `Param` table (0x08) - Parameter definitions, owned in runs by `MethodDef` rows.
    Param = 0x08,
    /// `InterfaceImpl` table (0x09) - Interfaces implemented by types.
    InterfaceImpl = 0x09,
    /// `MemberRef` table (0x0A) - References to fields and methods of other types.
    MemberRef = 0x0A,
    /// `Constant` table (0x0B) - Compile-time constant values.
    Constant = 0x0B,
    /// `CustomAttribute` table (0x0C) - Custom attribute applications.
    CustomAttribute = 0x0C,
    /// `FieldMarshal` table (0x0D) - Interop marshalling descriptors.
    FieldMarshal = 0x0D,
    /// `DeclSecurity` table (0x0E) - Declarative security permission sets.
    DeclSecurity = 0x0E,
    /// `ClassLayout` table (0x0F) - Explicit packing and size of types.
    ClassLayout = 0x0F,
    /// `FieldLayout` table (0x10) - Explicit field offsets.
    FieldLayout = 0x10,
    /// `StandAloneSig` table (0x11) - Signatures not attached to any member.
    StandAloneSig = 0x11,
    /// `EventMap` table (0x12) - Type to event run mapping.
    EventMap = 0x12,
    /// `EventPtr` table (0x13) - Indirection table of uncompressed metadata.
    EventPtr = 0x13,
    /// `Event` table (0x14) - Event definitions.
    Event = 0x14,
    /// `PropertyMap` table (0x15) - Type to property run mapping.
    PropertyMap = 0x15,
    /// `PropertyPtr` table (0x16) - Indirection table of uncompressed metadata.
    PropertyPtr = 0x16,
    /// `Property` table (0x17) - Property definitions.
    Property = 0x17,
    /// `MethodSemantics` table (0x18) - Accessor methods of properties and events.
    MethodSemantics = 0x18,
    /// `MethodImpl` table (0x19) - Explicit method overrides.
    MethodImpl = 0x19,
    /// `ModuleRef` table (0x1A) - References to other modules.
    ModuleRef = 0x1A,
    /// `TypeSpec` table (0x1B) - Constructed types described by a signature blob.
    TypeSpec = 0x1B,
    /// `ImplMap` table (0x1C) - P/Invoke mappings.
    ImplMap = 0x1C,
    /// `FieldRVA` table (0x1D) - Initial data of static fields.
    FieldRVA = 0x1D,
    /// `EncLog` table (0x1E) - Edit-and-continue log.
    EncLog = 0x1E,
    /// `EncMap` table (0x1F) - Edit-and-continue token map.
    EncMap = 0x1F,
    /// `Assembly` table (0x20) - The assembly manifest.
    Assembly = 0x20,
    /// `AssemblyProcessor` table (0x21) - Unused processor information.
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` table (0x22) - Unused operating system information.
    AssemblyOS = 0x22,
    /// `AssemblyRef` table (0x23) - References to other assemblies.
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` table (0x24) - Unused processor information.
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` table (0x25) - Unused operating system information.
    AssemblyRefOS = 0x25,
    /// `File` table (0x26) - Files of a multi-file assembly.
    File = 0x26,
    /// `ExportedType` table (0x27) - Types exported or forwarded by the assembly.
    ExportedType = 0x27,
    /// `ManifestResource` table (0x28) - Embedded or linked resources.
    ManifestResource = 0x28,
    /// `NestedClass` table (0x29) - Nested type to enclosing type relations.
    NestedClass = 0x29,
    /// `GenericParam` table (0x2A) - Generic parameters of types and methods.
    GenericParam = 0x2A,
    /// `MethodSpec` table (0x2B) - Instantiations of generic methods.
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` table (0x2C) - Constraints on generic parameters.
    GenericParamConstraint = 0x2C,
}

impl TableId {
    /// Returns the token prefix of this table (the table number shifted into the high byte).
    #[must_use]
    pub fn token_type(self) -> u32 {
        (self as u32) << 24
    }

    /// Returns the table name as used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl TryFrom<u8> for TableId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        TableId::iter()
            .find(|table| *table as u8 == value)
            .ok_or_else(|| malformed_error!("Unknown metadata table number 0x{:02X}", value))
    }
}

/// Number of table slots in the numbering space, `0x00..=0x2C`.
pub const TABLE_COUNT: usize = TableId::COUNT;
