//! Definition rows: generic parameters, fields, methods with their parameters, types and
//! nesting relations.
//!
//! Type, field, method and parameter tokens are attached by the token policy before the
//! build starts, so every row here is inserted in token order and `claim_rid` always checks
//! the attached token.

use crate::{
    builder::{context::BuildContext, policy::OrderKey},
    metadata::{
        tables::{
            CodedIndexType, FieldRaw, GenericParamConstraintRaw, GenericParamRaw, MethodDefRaw,
            NestedClassRaw, ParamRaw, TableId, TypeDefRaw,
        },
        token::Token,
    },
    model::GenericParamOwner,
    Error, Result,
};

/// Order keys of a definition table, sorted by attached RID.
fn policy_keys(tokens: impl Iterator<Item = Token>) -> Vec<OrderKey> {
    tokens
        .map(|token| OrderKey::new(token, u64::from(token.row())))
        .collect()
}

impl BuildContext<'_> {
    fn owner_token(&self, owner: GenericParamOwner) -> Result<Token> {
        match owner {
            GenericParamOwner::Type(id) => {
                self.allocated(self.module.type_def(id)?.token, TableId::TypeDef)
            }
            GenericParamOwner::Method(id) => {
                self.allocated(self.module.method(id)?.token, TableId::MethodDef)
            }
        }
    }

    pub(crate) fn populate_generic_params(&mut self) -> Result<()> {
        let module = self.module;

        let mut owners = Vec::with_capacity(module.generic_params.len());
        let mut keys = Vec::with_capacity(module.generic_params.len());
        for (index, param) in module.generic_params.iter().enumerate() {
            let owner = self.owner_token(param.owner)?;
            let sort = if self.config.sort_rebuilt_tables {
                let coded = CodedIndexType::TypeOrMethodDef.encode(owner)?;
                (u64::from(coded) << 16) | u64::from(param.number)
            } else {
                index as u64
            };
            owners.push(owner);
            keys.push(OrderKey::new(param.token, sort));
        }

        for index in self.policy.order(TableId::GenericParam, &keys)? {
            let param = &module.generic_params[index];
            let owner = self.coded(owners[index], CodedIndexType::TypeOrMethodDef)?;
            let name = self.strings.add(&param.name)?;

            let token = Self::claim_rid(
                &self.tables.generic_params,
                param.token,
                self.verify_recorded(),
            )?;
            self.tables.generic_params.push(GenericParamRaw {
                rid: token.row(),
                token,
                number: param.number,
                flags: param.flags.bits(),
                owner,
                name,
            })?;

            if !param.token.is_null()
                && self
                    .assigned
                    .generic_param_keys
                    .insert(param.token, token)
                    .is_some()
            {
                return Err(malformed_error!(
                    "Generic parameter key {} is used more than once",
                    param.token
                ));
            }
            self.assigned.generic_params[index] = Some(token);
        }

        Ok(())
    }

    pub(crate) fn populate_generic_param_constraints(&mut self) -> Result<()> {
        let module = self.module;

        let mut owners = Vec::with_capacity(module.generic_param_constraints.len());
        let mut keys = Vec::with_capacity(module.generic_param_constraints.len());
        for (index, constraint) in module.generic_param_constraints.iter().enumerate() {
            let owner = self
                .assigned
                .generic_param_keys
                .get(&constraint.owner)
                .copied()
                .ok_or(Error::GenericParamNotFound {
                    constraint: constraint.token,
                    owner: constraint.owner,
                })?;
            let sort = if self.config.sort_rebuilt_tables {
                u64::from(owner.row())
            } else {
                index as u64
            };
            owners.push(owner);
            keys.push(OrderKey::new(constraint.token, sort));
        }

        for index in self.policy.order(TableId::GenericParamConstraint, &keys)? {
            let constraint = &module.generic_param_constraints[index];
            let target = self.type_token(constraint.constraint)?;
            let coded = self.coded(target, CodedIndexType::TypeDefOrRef)?;

            let token = Self::claim_rid(
                &self.tables.generic_param_constraints,
                constraint.token,
                self.verify_recorded(),
            )?;
            self.tables
                .generic_param_constraints
                .push(GenericParamConstraintRaw {
                    rid: token.row(),
                    token,
                    owner: owners[index].row(),
                    constraint: coded,
                })?;
            self.assigned.constraints[index] = Some(token);
        }

        Ok(())
    }

    pub(crate) fn populate_fields(&mut self) -> Result<()> {
        let module = self.module;
        let strategy = self.signatures;
        let keys = policy_keys(module.fields.iter().map(|f| f.token));

        for index in self.policy.order(TableId::Field, &keys)? {
            let field = &module.fields[index];
            let name = self.strings.add(&field.name)?;
            let bytes = strategy.field_signature(
                field.token,
                &field.signature,
                field.raw_signature.as_deref(),
                self,
            )?;
            let signature = self.blobs.add(&bytes)?;

            let token = Self::claim_rid(&self.tables.fields, field.token, true)?;
            self.tables.fields.push(FieldRaw {
                rid: token.row(),
                token,
                flags: field.flags,
                name,
                signature,
            })?;
        }

        Ok(())
    }

    pub(crate) fn populate_methods(&mut self) -> Result<()> {
        let module = self.module;
        let strategy = self.signatures;
        let keys = policy_keys(module.methods.iter().map(|m| m.token));

        for index in self.policy.order(TableId::MethodDef, &keys)? {
            let method = &module.methods[index];
            let name = self.strings.add(&method.name)?;
            let bytes = strategy.method_signature(
                method.token,
                &method.signature,
                method.raw_signature.as_deref(),
                self,
            )?;
            let signature = self.blobs.add(&bytes)?;
            let param_list = self.tables.params.next_rid()?;

            let token = Self::claim_rid(&self.tables.methods, method.token, true)?;
            self.tables.methods.push(MethodDefRaw {
                rid: token.row(),
                token,
                rva: method.rva,
                impl_flags: method.impl_flags,
                flags: method.flags,
                name,
                signature,
                param_list,
            })?;

            let mut parameters: Vec<_> = method.parameters.iter().collect();
            parameters.sort_by_key(|p| p.token.row());
            for param in parameters {
                let name = self.strings.add(&param.name)?;
                let token = Self::claim_rid(&self.tables.params, param.token, true)?;
                self.tables.params.push(ParamRaw {
                    rid: token.row(),
                    token,
                    flags: param.flags,
                    sequence: param.sequence,
                    name,
                })?;
            }
        }

        Ok(())
    }

    pub(crate) fn populate_type_defs(&mut self) -> Result<()> {
        let module = self.module;
        let keys = policy_keys(module.types.iter().map(|t| t.token));

        for index in self.policy.order(TableId::TypeDef, &keys)? {
            let ty = &module.types[index];
            let type_name = self.strings.add(&ty.name)?;
            let type_namespace = self.strings.add(&ty.namespace)?;
            let base = match ty.extends {
                Some(handle) => self.type_token(handle)?,
                None => Token::default(),
            };
            let extends = self.coded(base, CodedIndexType::TypeDefOrRef)?;

            let token = Self::claim_rid(&self.tables.type_defs, ty.token, true)?;
            self.tables.type_defs.push(TypeDefRaw {
                rid: token.row(),
                token,
                flags: ty.flags,
                type_name,
                type_namespace,
                extends,
                field_list: ty.fields_range.start,
                method_list: ty.methods_range.start,
            })?;
        }

        Ok(())
    }

    /// One row per nesting relation, enclosing types in token order.
    pub(crate) fn populate_nested_classes(&mut self) -> Result<()> {
        let module = self.module;
        let keys = policy_keys(module.types.iter().map(|t| t.token));

        for index in self.policy.order(TableId::TypeDef, &keys)? {
            let enclosing = &module.types[index];
            for id in &enclosing.nested_types {
                let nested = self.allocated(module.type_def(*id)?.token, TableId::TypeDef)?;

                let token = self.tables.nested_classes.next_token()?;
                self.tables.nested_classes.push(NestedClassRaw {
                    rid: token.row(),
                    token,
                    nested_class: nested.row(),
                    enclosing_class: enclosing.token.row(),
                })?;
            }
        }

        Ok(())
    }
}
