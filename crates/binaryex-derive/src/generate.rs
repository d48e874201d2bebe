//! Code generation for the derive.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, DeriveInput, Generics, Result};

use crate::parse::AggregateDefinition;

/// Generate the `Aggregate` and `Value` impls for a struct.
pub fn generate_value(input: DeriveInput) -> Result<TokenStream> {
    let def = AggregateDefinition::parse(input)?;

    let name = &def.name;
    let generics = add_value_bounds(&def);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let infos = def.fields.iter().map(|f| {
        let field_name = &f.name;
        let exported = f.exported;
        quote! { ::binaryex::FieldInfo::new(#field_name, #exported) }
    });

    // Only participating fields are handed out, so private members need not
    // implement `Value`.
    let (indices, members): (Vec<_>, Vec<_>) = def
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.participates())
        .map(|(i, f)| (i, &f.member))
        .unzip();

    let capability = if def.custom {
        quote! {
            fn marshaler(&self) -> ::core::option::Option<&dyn ::binaryex::MarshalBinary> {
                ::core::option::Option::Some(self)
            }

            fn unmarshaler(&mut self) -> ::core::option::Option<&mut dyn ::binaryex::UnmarshalBinary> {
                ::core::option::Option::Some(self)
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics ::binaryex::Aggregate for #name #ty_generics #where_clause {
            fn fields(&self) -> &'static [::binaryex::FieldInfo] {
                const FIELDS: &[::binaryex::FieldInfo] = &[#(#infos),*];
                FIELDS
            }

            fn field(&self, index: usize) -> ::core::option::Option<&dyn ::binaryex::Value> {
                match index {
                    #(#indices => ::core::option::Option::Some(&self.#members as &dyn ::binaryex::Value),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn ::binaryex::Value> {
                match index {
                    #(#indices => ::core::option::Option::Some(&mut self.#members as &mut dyn ::binaryex::Value),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::binaryex::Value for #name #ty_generics #where_clause {
            fn view(&self) -> ::binaryex::ValueRef<'_> {
                ::binaryex::ValueRef::Aggregate(self)
            }

            fn view_mut(&mut self) -> ::binaryex::ValueMut<'_> {
                ::binaryex::ValueMut::Aggregate(self)
            }

            #capability
        }
    })
}

/// Bounds every participating field type on `Value`, so a field such as
/// `Vec<T>` carries whatever `T` needs (`Value + Default`) without the user
/// spelling it out. Structs without type parameters are left unbounded.
fn add_value_bounds(def: &AggregateDefinition) -> Generics {
    let mut generics = def.generics.clone();
    if generics.type_params().next().is_none() {
        return generics;
    }
    let where_clause = generics.make_where_clause();
    for field in def.fields.iter().filter(|f| f.participates()) {
        let ty = &field.ty;
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::binaryex::Value));
    }
    generics
}
