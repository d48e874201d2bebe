//! Parsing utilities for the derive.

use syn::{
    Attribute, Data, DeriveInput, Error, Fields, Generics, Ident, Index, Member, Result, Type,
    Visibility,
};

/// Reported name of a field excluded with `#[binary(skip)]`.
const PLACEHOLDER: &str = "_";

/// Parsed struct definition.
#[derive(Debug)]
pub struct AggregateDefinition {
    pub name: Ident,
    pub generics: Generics,
    /// Fields in declaration order.
    pub fields: Vec<FieldDefinition>,
    /// Encodes through `MarshalBinary` / `UnmarshalBinary`.
    pub custom: bool,
}

/// A struct field.
#[derive(Debug)]
pub struct FieldDefinition {
    /// How to reach the field from `self`.
    pub member: Member,
    /// Name reported to the engine.
    pub name: String,
    pub exported: bool,
    pub ty: Type,
}

impl FieldDefinition {
    pub fn participates(&self) -> bool {
        self.exported && self.name != PLACEHOLDER
    }
}

impl AggregateDefinition {
    /// Parse a derive input into an aggregate definition.
    pub fn parse(input: DeriveInput) -> Result<Self> {
        let data = match input.data {
            Data::Struct(data) => data,
            Data::Enum(data) => {
                return Err(Error::new(
                    data.enum_token.span,
                    "Value can only be derived for structs",
                ));
            }
            Data::Union(data) => {
                return Err(Error::new(
                    data.union_token.span,
                    "Value can only be derived for structs",
                ));
            }
        };

        let custom = Self::parse_struct_attrs(&input.attrs)?;

        let mut fields = Vec::new();
        match data.fields {
            Fields::Named(named) => {
                for field in named.named {
                    let Some(ident) = field.ident else {
                        continue;
                    };
                    let skip = parse_field_attrs(&field.attrs)?;
                    let name = if skip {
                        PLACEHOLDER.to_string()
                    } else {
                        ident.to_string().trim_start_matches("r#").to_string()
                    };
                    fields.push(FieldDefinition {
                        member: Member::Named(ident),
                        name,
                        exported: is_exported(&field.vis),
                        ty: field.ty,
                    });
                }
            }
            Fields::Unnamed(unnamed) => {
                for (i, field) in unnamed.unnamed.into_iter().enumerate() {
                    let skip = parse_field_attrs(&field.attrs)?;
                    let name = if skip {
                        PLACEHOLDER.to_string()
                    } else {
                        i.to_string()
                    };
                    fields.push(FieldDefinition {
                        member: Member::Unnamed(Index::from(i)),
                        name,
                        exported: is_exported(&field.vis),
                        ty: field.ty,
                    });
                }
            }
            Fields::Unit => {}
        }

        Ok(Self {
            name: input.ident,
            generics: input.generics,
            fields,
            custom,
        })
    }

    fn parse_struct_attrs(attrs: &[Attribute]) -> Result<bool> {
        let mut custom = false;
        for attr in attrs.iter().filter(|a| a.path().is_ident("binary")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("custom") {
                    custom = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `custom`"))
                }
            })?;
        }
        Ok(custom)
    }
}

/// Returns whether `#[binary(skip)]` is present.
fn parse_field_attrs(attrs: &[Attribute]) -> Result<bool> {
    let mut skip = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("binary")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

/// Only plain `pub` counts; restricted visibility stays private.
fn is_exported(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}
