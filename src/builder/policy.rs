//! Token assignment policies.
//!
//! A [`TokenPolicy`] decides, once per build, in which order entities are inserted into their
//! tables and therefore which RID every entity ends up with:
//!
//! - [`RebuildTokens`] assigns fresh tokens in discovery order. Definition tokens and member
//!   ranges follow a traversal of the module's types; every other table is filled in the
//!   order its collection exposes (or a caller supplied sort key).
//! - [`PreserveTokens`] reproduces the tokens recorded on the entities. Each table's recorded
//!   RIDs must be exactly `1..=N`; the policy checks this up front, so sequential insertion
//!   in RID order hands every entity back its original RID.

use crate::{
    builder::TokenMode,
    metadata::{tables::TableId, token::Token},
    model::{MemberRange, ModuleDefinition},
    utils::to_u32,
    Error, Result,
};

/// Position of one entity in an ordered table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    /// The token recorded on the entity
    pub token: Token,
    /// Rebuild ordering key; entities with equal keys keep their collection order
    pub sort: u64,
}

impl OrderKey {
    /// Creates a key.
    #[must_use]
    pub fn new(token: Token, sort: u64) -> Self {
        OrderKey { token, sort }
    }
}

/// Strategy that orders entities before insertion and attaches definition tokens.
pub trait TokenPolicy {
    /// The mode this policy implements.
    fn mode(&self) -> TokenMode;

    /// Assigns or verifies the tokens of types, fields, methods and parameters and computes
    /// every type's `fields_range` / `methods_range`.
    ///
    /// # Errors
    /// Returns an error if members are not owned by exactly one type, or (preserve) if the
    /// recorded tokens are not dense or a type's members are not contiguous.
    fn attach_tokens(&self, module: &mut ModuleDefinition) -> Result<()>;

    /// Returns the insertion order of a table's entities as indices into `keys`.
    ///
    /// # Errors
    /// Returns [`Error::NonDenseTokens`] (preserve) if the recorded RIDs are not `1..=N`.
    fn order(&self, table: TableId, keys: &[OrderKey]) -> Result<Vec<usize>>;

    /// Returns the insertion order of heap entries given their recorded offsets.
    fn order_heap(&self, offsets: &[u32]) -> Vec<usize>;
}

/// Fresh tokens in discovery order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RebuildTokens;

/// Tokens reproduced from the entities' recorded values.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreserveTokens;

impl TokenPolicy for RebuildTokens {
    fn mode(&self) -> TokenMode {
        TokenMode::Rebuild
    }

    fn attach_tokens(&self, module: &mut ModuleDefinition) -> Result<()> {
        check_ownership(module)?;

        let ModuleDefinition {
            types,
            fields,
            methods,
            ..
        } = module;

        let mut field_rid = 1u32;
        let mut method_rid = 1u32;
        let mut param_rid = 1u32;

        for (index, ty) in types.iter_mut().enumerate() {
            ty.token = Token::from_parts(TableId::TypeDef, to_u32(index + 1)?);

            ty.fields_range = MemberRange::new(field_rid, to_u32(ty.fields.len())?);
            for id in &ty.fields {
                fields[id.index()].token = Token::from_parts(TableId::Field, field_rid);
                field_rid += 1;
            }

            ty.methods_range = MemberRange::new(method_rid, to_u32(ty.methods.len())?);
            for id in &ty.methods {
                let method = &mut methods[id.index()];
                method.token = Token::from_parts(TableId::MethodDef, method_rid);
                method_rid += 1;

                for param in &mut method.parameters {
                    param.token = Token::from_parts(TableId::Param, param_rid);
                    param_rid += 1;
                }
            }
        }

        log::debug!(
            "Attached rebuild tokens: {} types, {} fields, {} methods, {} params",
            types.len(),
            field_rid - 1,
            method_rid - 1,
            param_rid - 1
        );
        Ok(())
    }

    fn order(&self, _table: TableId, keys: &[OrderKey]) -> Result<Vec<usize>> {
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by_key(|index| keys[*index].sort);
        Ok(order)
    }

    fn order_heap(&self, offsets: &[u32]) -> Vec<usize> {
        (0..offsets.len()).collect()
    }
}

impl TokenPolicy for PreserveTokens {
    fn mode(&self) -> TokenMode {
        TokenMode::Preserve
    }

    fn attach_tokens(&self, module: &mut ModuleDefinition) -> Result<()> {
        check_ownership(module)?;

        let type_order = dense_order(TableId::TypeDef, module.types.iter().map(|t| t.token))?;
        dense_order(TableId::Field, module.fields.iter().map(|f| f.token))?;
        let method_order =
            dense_order(TableId::MethodDef, module.methods.iter().map(|m| m.token))?;
        dense_order(
            TableId::Param,
            module
                .methods
                .iter()
                .flat_map(|m| m.parameters.iter().map(|p| p.token)),
        )?;

        let mut ranges = Vec::with_capacity(type_order.len());
        let mut field_cursor = 1u32;
        let mut method_cursor = 1u32;
        for &index in &type_order {
            let ty = &module.types[index];
            let field_rids = ty.fields.iter().map(|id| module.fields[id.index()].token.row());
            let method_rids = ty
                .methods
                .iter()
                .map(|id| module.methods[id.index()].token.row());

            let fields = member_run(ty.token, "fields", field_rids, &mut field_cursor)?;
            let methods = member_run(ty.token, "methods", method_rids, &mut method_cursor)?;
            ranges.push((index, fields, methods));
        }

        let mut param_cursor = 1u32;
        for &index in &method_order {
            let method = &module.methods[index];
            member_run(
                method.token,
                "parameters",
                method.parameters.iter().map(|p| p.token.row()),
                &mut param_cursor,
            )?;
        }

        for (index, fields, methods) in ranges {
            let ty = &mut module.types[index];
            ty.fields_range = fields;
            ty.methods_range = methods;
        }

        log::debug!(
            "Verified recorded tokens: {} types, {} fields, {} methods",
            module.types.len(),
            module.fields.len(),
            module.methods.len()
        );
        Ok(())
    }

    fn order(&self, table: TableId, keys: &[OrderKey]) -> Result<Vec<usize>> {
        dense_order(table, keys.iter().map(|key| key.token))
    }

    fn order_heap(&self, offsets: &[u32]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..offsets.len()).collect();
        order.sort_by_key(|index| offsets[*index]);
        order
    }
}

/// Definition tokens and member ranges of a module before [`TokenPolicy::attach_tokens`] ran.
///
/// Restored when a build fails, so the module ends up exactly as it was handed in.
pub(crate) struct DefinitionSnapshot {
    types: Vec<(Token, MemberRange, MemberRange)>,
    fields: Vec<Token>,
    methods: Vec<(Token, Vec<Token>)>,
}

impl DefinitionSnapshot {
    pub(crate) fn capture(module: &ModuleDefinition) -> Self {
        DefinitionSnapshot {
            types: module
                .types
                .iter()
                .map(|ty| (ty.token, ty.fields_range, ty.methods_range))
                .collect(),
            fields: module.fields.iter().map(|field| field.token).collect(),
            methods: module
                .methods
                .iter()
                .map(|method| {
                    let params = method.parameters.iter().map(|p| p.token).collect();
                    (method.token, params)
                })
                .collect(),
        }
    }

    pub(crate) fn restore(self, module: &mut ModuleDefinition) {
        for (ty, (token, fields_range, methods_range)) in module.types.iter_mut().zip(self.types) {
            ty.token = token;
            ty.fields_range = fields_range;
            ty.methods_range = methods_range;
        }
        for (field, token) in module.fields.iter_mut().zip(self.fields) {
            field.token = token;
        }
        for (method, (token, params)) in module.methods.iter_mut().zip(self.methods) {
            method.token = token;
            for (param, token) in method.parameters.iter_mut().zip(params) {
                param.token = token;
            }
        }
    }
}

/// Sorts `tokens` by RID and checks that the RIDs are exactly `1..=N` of `table`.
///
/// Returns the positions of the tokens in RID order.
fn dense_order(table: TableId, tokens: impl Iterator<Item = Token>) -> Result<Vec<usize>> {
    let mut entries: Vec<(u32, usize)> = Vec::new();
    for (index, token) in tokens.enumerate() {
        if !token.is_null() && !token.is_table(table) {
            return Err(Error::TokenMismatch {
                expected: Token::from_parts(table, token.row()),
                actual: token,
            });
        }
        entries.push((token.row(), index));
    }

    entries.sort_unstable();
    for (position, (rid, _)) in entries.iter().enumerate() {
        let expected = to_u32(position + 1)?;
        if *rid != expected {
            return Err(Error::NonDenseTokens {
                table,
                expected,
                found: *rid,
            });
        }
    }

    Ok(entries.into_iter().map(|(_, index)| index).collect())
}

/// Checks that the recorded `rids` of one owner form the run starting at `cursor`.
fn member_run(
    owner: Token,
    what: &str,
    rids: impl Iterator<Item = u32>,
    cursor: &mut u32,
) -> Result<MemberRange> {
    let mut rids: Vec<u32> = rids.collect();
    rids.sort_unstable();

    let start = *cursor;
    for (offset, rid) in rids.iter().enumerate() {
        let expected = start + to_u32(offset)?;
        if *rid != expected {
            return Err(Error::MemberRangeMismatch {
                owner,
                message: format!("{what} are not contiguous: expected RID {expected}, found {rid}"),
            });
        }
    }

    let range = MemberRange::new(start, to_u32(rids.len())?);
    *cursor = range.end();
    Ok(range)
}

/// Every field and method must be declared by exactly one type, and every nested type must
/// have exactly one enclosing type without forming a cycle.
fn check_ownership(module: &ModuleDefinition) -> Result<()> {
    let mut field_owner = vec![None; module.fields.len()];
    let mut method_owner = vec![None; module.methods.len()];
    let mut enclosing = vec![None; module.types.len()];

    for (index, ty) in module.types.iter().enumerate() {
        for id in &ty.fields {
            claim(&mut field_owner, id.index(), index, "Field")?;
        }
        for id in &ty.methods {
            claim(&mut method_owner, id.index(), index, "MethodDef")?;
        }
        for nested in &ty.nested_types {
            if nested.index() == index {
                return Err(malformed_error!("Type {} is nested in itself", index));
            }
            claim(&mut enclosing, nested.index(), index, "nested TypeDef")?;
        }
    }

    for start in 0..enclosing.len() {
        let mut current = start;
        let mut depth = 0;
        while let Some(outer) = enclosing[current] {
            depth += 1;
            if outer == start || depth > enclosing.len() {
                return Err(malformed_error!("Type {} encloses itself through nesting", start));
            }
            current = outer;
        }
    }

    if let Some(index) = field_owner.iter().position(Option::is_none) {
        return Err(malformed_error!("Field {} is not declared by any type", index));
    }
    if let Some(index) = method_owner.iter().position(Option::is_none) {
        return Err(malformed_error!("Method {} is not declared by any type", index));
    }

    Ok(())
}

fn claim(owners: &mut [Option<usize>], member: usize, owner: usize, what: &str) -> Result<()> {
    match owners.get_mut(member) {
        None => Err(malformed_error!(
            "Type {} declares dangling {} handle {}",
            owner,
            what,
            member
        )),
        Some(Some(previous)) => Err(malformed_error!(
            "{} {} is declared by types {} and {}",
            what,
            member,
            previous,
            owner
        )),
        Some(slot) => {
            *slot = Some(owner);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::signatures::{SignatureField, SignatureMethod, TypeSignature},
        model::{
            FieldDefinition, MethodDefinition, ParameterDefinition, TypeDefId, TypeDefinition,
        },
    };

    fn field(name: &str) -> FieldDefinition {
        FieldDefinition::new(
            name,
            0,
            SignatureField {
                modifiers: Vec::new(),
                base: TypeSignature::I4,
            },
        )
    }

    fn two_types() -> ModuleDefinition {
        let mut module = ModuleDefinition::new("Test.dll");
        let a = module.add_type(TypeDefinition::new("", "<Module>", 0));
        let b = module.add_type(TypeDefinition::new("N", "B", 0));
        module.add_field(b, field("x")).unwrap();
        module.add_field(b, field("y")).unwrap();
        module
            .add_method(
                a,
                MethodDefinition::new("m", 0, SignatureMethod::default())
                    .with_parameter(ParameterDefinition::new("p", 1, 0)),
            )
            .unwrap();
        module
    }

    #[test]
    fn test_rebuild_attaches_traversal_tokens() {
        let mut module = two_types();
        RebuildTokens.attach_tokens(&mut module).unwrap();

        assert_eq!(module.types[0].token.value(), 0x0200_0001);
        assert_eq!(module.types[1].token.value(), 0x0200_0002);
        assert_eq!(module.types[0].fields_range, MemberRange::new(1, 0));
        assert_eq!(module.types[1].fields_range, MemberRange::new(1, 2));
        assert_eq!(module.types[0].methods_range, MemberRange::new(1, 1));
        assert_eq!(module.types[1].methods_range, MemberRange::new(2, 0));
        assert_eq!(module.fields[1].token.value(), 0x0400_0002);
        assert_eq!(module.methods[0].parameters[0].token.value(), 0x0800_0001);
    }

    #[test]
    fn test_orphan_field_rejected() {
        let mut module = two_types();
        module.fields.push(field("orphan"));
        assert!(matches!(
            RebuildTokens.attach_tokens(&mut module),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_self_nesting_rejected() {
        let mut module = two_types();
        module.types[1].nested_types.push(TypeDefId::new(1));
        assert!(matches!(
            RebuildTokens.attach_tokens(&mut module),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_second_enclosing_type_rejected() {
        let mut module = two_types();
        let inner = module.add_type(TypeDefinition::new("", "Inner", 0));
        module.add_nested_type(TypeDefId::new(0), inner).unwrap();
        module.add_nested_type(TypeDefId::new(1), inner).unwrap();
        assert!(matches!(
            RebuildTokens.attach_tokens(&mut module),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_nesting_cycle_rejected() {
        let mut module = two_types();
        module.types[0].nested_types.push(TypeDefId::new(1));
        module.types[1].nested_types.push(TypeDefId::new(0));
        assert!(matches!(
            PreserveTokens.attach_tokens(&mut module),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_preserve_recomputes_ranges() {
        let mut module = two_types();
        module.types[0].token = Token::new(0x0200_0002);
        module.types[1].token = Token::new(0x0200_0001);
        module.fields[0].token = Token::new(0x0400_0002);
        module.fields[1].token = Token::new(0x0400_0001);
        module.methods[0].token = Token::new(0x0600_0001);
        module.methods[0].parameters[0].token = Token::new(0x0800_0001);

        PreserveTokens.attach_tokens(&mut module).unwrap();
        assert_eq!(module.types[1].fields_range, MemberRange::new(1, 2));
        assert_eq!(module.types[1].methods_range, MemberRange::new(1, 0));
        assert_eq!(module.types[0].fields_range, MemberRange::new(3, 0));
        assert_eq!(module.types[0].methods_range, MemberRange::new(1, 1));
    }

    #[test]
    fn test_preserve_rejects_interleaved_members() {
        let mut module = ModuleDefinition::new("Test.dll");
        let a = module.add_type(TypeDefinition::new("", "A", 0).with_token(Token::new(0x0200_0001)));
        let b = module.add_type(TypeDefinition::new("", "B", 0).with_token(Token::new(0x0200_0002)));
        module
            .add_field(a, field("a1").with_token(Token::new(0x0400_0001)))
            .unwrap();
        module
            .add_field(b, field("b1").with_token(Token::new(0x0400_0002)))
            .unwrap();
        module
            .add_field(a, field("a2").with_token(Token::new(0x0400_0003)))
            .unwrap();

        assert!(matches!(
            PreserveTokens.attach_tokens(&mut module),
            Err(Error::MemberRangeMismatch { .. })
        ));
    }

    #[test]
    fn test_dense_order() {
        let keys = [
            OrderKey::new(Token::new(0x0100_0002), 0),
            OrderKey::new(Token::new(0x0100_0001), 0),
            OrderKey::new(Token::new(0x0100_0003), 0),
        ];
        assert_eq!(PreserveTokens.order(TableId::TypeRef, &keys).unwrap(), vec![1, 0, 2]);
    }

    #[test]
    fn test_gap_and_duplicate_rejected() {
        let gap = [
            OrderKey::new(Token::new(0x0400_0001), 0),
            OrderKey::new(Token::new(0x0400_0003), 0),
        ];
        assert!(matches!(
            PreserveTokens.order(TableId::Field, &gap),
            Err(Error::NonDenseTokens {
                table: TableId::Field,
                expected: 2,
                found: 3
            })
        ));

        let duplicate = [
            OrderKey::new(Token::new(0x0400_0001), 0),
            OrderKey::new(Token::new(0x0400_0001), 0),
        ];
        assert!(matches!(
            PreserveTokens.order(TableId::Field, &duplicate),
            Err(Error::NonDenseTokens { .. })
        ));
    }

    #[test]
    fn test_wrong_table_rejected() {
        let keys = [OrderKey::new(Token::new(0x0200_0001), 0)];
        assert!(matches!(
            PreserveTokens.order(TableId::TypeRef, &keys),
            Err(Error::TokenMismatch { .. })
        ));
    }

    #[test]
    fn test_rebuild_order_is_stable() {
        let keys = [
            OrderKey::new(Token::default(), 5),
            OrderKey::new(Token::default(), 1),
            OrderKey::new(Token::default(), 5),
        ];
        assert_eq!(RebuildTokens.order(TableId::GenericParam, &keys).unwrap(), vec![1, 0, 2]);
        assert_eq!(PreserveTokens.order_heap(&[9, 1, 4]), vec![1, 2, 0]);
        assert_eq!(RebuildTokens.order_heap(&[9, 1, 4]), vec![0, 1, 2]);
    }
}
