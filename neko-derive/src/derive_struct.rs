use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields};

use crate::attrs::{parse_field_attrs, parse_type_attrs, FieldAttrs};

struct FieldPlan {
    ident: syn::Ident,
    ty: syn::Type,
    wire_name: String,
    attrs: FieldAttrs,
}

fn is_option_type(ty: &syn::Type) -> bool {
    if let syn::Type::Path(p) = ty {
        if let Some(seg) = p.path.segments.last() {
            return seg.ident == "Option";
        }
    }
    false
}

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "derive_struct called on a non-struct",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Reflect)] only supports structs with named fields",
        ));
    };

    let type_attrs = parse_type_attrs(&input.attrs);
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut plans = Vec::new();
    for field in &named.named {
        let field_ident = field.ident.clone().expect("named field");
        let attrs = parse_field_attrs(&field.attrs);
        if attrs.skippable && !is_option_type(&field.ty) && !attrs.flatten {
            return Err(syn::Error::new_spanned(
                field,
                "`skippable` is only supported on Option<T> fields (or sum types with an \
                 empty variant, which this derive macro cannot see through a generic field \
                 type) — wrap the field in Option<T> or remove `skippable`",
            ));
        }
        if type_attrs.array_shape && is_option_type(&field.ty) {
            return Err(syn::Error::new_spanned(
                field,
                "array-shape records (#[neko(array_shape)]) may not contain optional fields",
            ));
        }
        let wire_name = attrs
            .rename
            .clone()
            .unwrap_or_else(|| field_ident.to_string());
        plans.push(FieldPlan {
            ident: field_ident,
            ty: field.ty.clone(),
            wire_name,
            attrs,
        });
    }

    let field_count = plans.len();
    let wire_type_name = type_attrs
        .name
        .clone()
        .unwrap_or_else(|| ident.to_string());

    let reflect_impl = reflect_impl(ident, &impl_generics, &ty_generics, where_clause, &plans, &wire_type_name);

    let codec_impl = if type_attrs.array_shape {
        array_shape_codec(ident, &impl_generics, &ty_generics, where_clause, &plans, field_count)
    } else {
        object_shape_codec(ident, &impl_generics, &ty_generics, where_clause, &plans, field_count)
    };

    Ok(quote! {
        #reflect_impl
        #codec_impl
    })
}

fn tagset_expr(attrs: &FieldAttrs) -> TokenStream {
    let mut tags = Vec::new();
    if attrs.skippable {
        tags.push(quote!(neko_core::FieldTag::Skippable));
    }
    if attrs.flatten {
        tags.push(quote!(neko_core::FieldTag::Flatten));
    }
    if attrs.fixed_length {
        tags.push(quote!(neko_core::FieldTag::FixedLength));
    }
    if attrs.raw_string {
        tags.push(quote!(neko_core::FieldTag::RawString));
    }
    quote! { neko_core::TagSet::new(&[ #(#tags),* ]) }
}

fn reflect_impl(
    ident: &syn::Ident,
    impl_generics: &syn::ImplGenerics,
    ty_generics: &syn::TypeGenerics,
    where_clause: Option<&syn::WhereClause>,
    plans: &[FieldPlan],
    wire_type_name: &str,
) -> TokenStream {
    let field_count = plans.len();
    let names = plans.iter().map(|p| p.wire_name.as_str());
    let for_each = plans.iter().map(|p| {
        let field_ident = &p.ident;
        let name = &p.wire_name;
        let tagset = tagset_expr(&p.attrs);
        quote! {
            f(neko_core::FieldRef {
                name: #name,
                tags: #tagset,
                value: &self.#field_ident,
            });
        }
    });
    let for_each_mut = plans.iter().map(|p| {
        let field_ident = &p.ident;
        let name = &p.wire_name;
        let tagset = tagset_expr(&p.attrs);
        quote! {
            f(neko_core::FieldRefMut {
                name: #name,
                tags: #tagset,
                value: &mut self.#field_ident,
            });
        }
    });

    quote! {
        impl #impl_generics neko_core::Reflect for #ident #ty_generics #where_clause {
            const FIELD_COUNT: usize = #field_count;
            const FIELD_NAMES: &'static [&'static str] = &[ #(#names),* ];

            fn for_each_field<'a>(&'a self, f: &mut dyn FnMut(neko_core::FieldRef<'a>)) {
                #(#for_each)*
            }

            fn for_each_field_mut<'a>(&'a mut self, f: &mut dyn FnMut(neko_core::FieldRefMut<'a>)) {
                #(#for_each_mut)*
            }

            fn type_name() -> &'static str {
                #wire_type_name
            }
        }
    }
}

fn array_len(ty: &syn::Type) -> Option<&syn::Expr> {
    match ty {
        syn::Type::Array(a) => Some(&a.len),
        _ => None,
    }
}

fn field_encode_stmt(p: &FieldPlan) -> TokenStream {
    let field_ident = &p.ident;
    let name = &p.wire_name;
    let skippable = p.attrs.skippable;
    if p.attrs.flatten {
        quote! {
            <_ as neko_core::FlattenFields>::encode_fields(&self.#field_ident, out)?;
        }
    } else if p.attrs.raw_string {
        quote! {
            neko_core::encode_raw_field(out, #name, &self.#field_ident)?;
        }
    } else if p.attrs.fixed_length && array_len(&p.ty).is_some() {
        quote! {
            neko_core::encode_fixed_field(out, #name, &self.#field_ident)?;
        }
    } else if is_option_type(&p.ty) {
        quote! {
            neko_core::encode_optional_field(out, #name, &self.#field_ident, #skippable)?;
        }
    } else {
        quote! {
            neko_core::encode_field(out, #name, &self.#field_ident)?;
        }
    }
}

fn field_decode_stmt(p: &FieldPlan) -> TokenStream {
    let field_ident = &p.ident;
    let name = &p.wire_name;
    let skippable = p.attrs.skippable;
    let ty = &p.ty;
    if p.attrs.flatten {
        quote! {
            #field_ident: <#ty as neko_core::FlattenFields>::decode_fields(inp)?,
        }
    } else if p.attrs.raw_string {
        quote! {
            #field_ident: neko_core::decode_raw_field(inp, #name)?,
        }
    } else if p.attrs.fixed_length && array_len(&p.ty).is_some() {
        quote! {
            #field_ident: neko_core::decode_fixed_field(inp, #name)?,
        }
    } else if is_option_type(&p.ty) {
        quote! {
            #field_ident: neko_core::decode_optional_field(inp, #name, #skippable)?,
        }
    } else {
        quote! {
            #field_ident: neko_core::decode_field(inp, #name)?,
        }
    }
}

fn object_shape_codec(
    ident: &syn::Ident,
    impl_generics: &syn::ImplGenerics,
    ty_generics: &syn::TypeGenerics,
    where_clause: Option<&syn::WhereClause>,
    plans: &[FieldPlan],
    field_count: usize,
) -> TokenStream {
    let encode_stmts = plans.iter().map(field_encode_stmt);
    let decode_stmts = plans.iter().map(field_decode_stmt);

    quote! {
        impl #impl_generics neko_core::FlattenFields for #ident #ty_generics #where_clause {
            fn encode_fields<O: neko_core::Output>(&self, out: &mut O) -> Result<(), O::Error> {
                #(#encode_stmts)*
                Ok(())
            }

            fn decode_fields<I: neko_core::Input>(inp: &mut I) -> Result<Self, I::Error> {
                Ok(Self {
                    #(#decode_stmts)*
                })
            }
        }

        impl #impl_generics neko_core::Encode for #ident #ty_generics #where_clause {
            fn encode<O: neko_core::Output>(&self, out: &mut O) -> Result<(), O::Error> {
                neko_core::encode_object_shape(out, #field_count, |out| {
                    <Self as neko_core::FlattenFields>::encode_fields(self, out)
                })
            }
        }

        impl #impl_generics neko_core::Decode for #ident #ty_generics #where_clause {
            fn decode<I: neko_core::Input>(inp: &mut I) -> Result<Self, I::Error> {
                let mut result = None;
                neko_core::decode_object_shape(inp, |inp| {
                    result = Some(<Self as neko_core::FlattenFields>::decode_fields(inp)?);
                    Ok(())
                })?;
                Ok(result.expect("decode_object_shape always sets result on success"))
            }
        }
    }
}

fn array_shape_codec(
    ident: &syn::Ident,
    impl_generics: &syn::ImplGenerics,
    ty_generics: &syn::TypeGenerics,
    where_clause: Option<&syn::WhereClause>,
    plans: &[FieldPlan],
    field_count: usize,
) -> TokenStream {
    let encode_stmts = plans.iter().map(|p| {
        let field_ident = &p.ident;
        quote! { self.#field_ident.encode(out)?; }
    });
    let decode_stmts = plans.iter().map(|p| {
        let field_ident = &p.ident;
        quote! { #field_ident: neko_core::Decode::decode(inp)?, }
    });
    let _ = format_ident!("_unused");

    quote! {
        impl #impl_generics neko_core::Encode for #ident #ty_generics #where_clause {
            fn encode<O: neko_core::Output>(&self, out: &mut O) -> Result<(), O::Error> {
                neko_core::encode_array_shape(out, #field_count, |out| {
                    #(#encode_stmts)*
                    Ok(())
                })
            }
        }

        impl #impl_generics neko_core::Decode for #ident #ty_generics #where_clause {
            fn decode<I: neko_core::Input>(inp: &mut I) -> Result<Self, I::Error> {
                let mut result = None;
                neko_core::decode_array_shape(inp, #field_count, |inp| {
                    result = Some(Self {
                        #(#decode_stmts)*
                    });
                    Ok(())
                })?;
                Ok(result.expect("decode_array_shape always sets result on success"))
            }
        }
    }
}
