use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

/// Enums get one of two codecs depending on shape (§4.3 table):
///
/// - every variant is a unit variant ⇒ "enum" row: a textual mnemonic on
///   save, accepting either the mnemonic or the declaration-order integer
///   discriminant on load;
/// - at least one variant carries data ⇒ "sum type" row: each arm is tried
///   in declared order on decode, first that parses wins. Only unit
///   variants and single-field ("newtype") variants are supported — a
///   multi-field variant would need its own nested Reflect description,
///   which this derive macro doesn't attempt to synthesize.
pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "derive_enum called on a non-enum",
        ));
    };
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let all_unit = data
        .variants
        .iter()
        .all(|v| matches!(v.fields, Fields::Unit));

    if all_unit {
        return Ok(plain_enum_codec(ident, &impl_generics, &ty_generics, where_clause, input));
    }

    for variant in &data.variants {
        match &variant.fields {
            Fields::Unit => {}
            Fields::Unnamed(u) if u.unnamed.len() == 1 => {}
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "#[derive(Reflect)] on an enum only supports unit variants and \
                     single-field tuple variants",
                ))
            }
        }
    }

    sum_type_codec(ident, &impl_generics, &ty_generics, where_clause, input)
}

fn plain_enum_codec(
    ident: &syn::Ident,
    impl_generics: &syn::ImplGenerics,
    ty_generics: &syn::TypeGenerics,
    where_clause: Option<&syn::WhereClause>,
    input: &DeriveInput,
) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        unreachable!()
    };
    let variant_idents: Vec<_> = data.variants.iter().map(|v| &v.ident).collect();
    let variant_names: Vec<_> = variant_idents.iter().map(|v| v.to_string()).collect();
    let discriminants: Vec<u64> = (0..variant_idents.len() as u64).collect();

    quote! {
        impl #impl_generics neko_core::Encode for #ident #ty_generics #where_clause {
            fn encode<O: neko_core::Output>(&self, out: &mut O) -> Result<(), O::Error> {
                let name = match self {
                    #( #ident::#variant_idents => #variant_names, )*
                };
                out.save_str(name)
            }
        }

        impl #impl_generics neko_core::Decode for #ident #ty_generics #where_clause {
            fn decode<I: neko_core::Input>(inp: &mut I) -> Result<Self, I::Error> {
                match inp.load_string() {
                    Ok(s) => match s.as_str() {
                        #( #variant_names => Ok(#ident::#variant_idents), )*
                        other => Err(neko_core::CodecError::schema(
                            format!("unknown enum mnemonic `{other}`")
                        ).into()),
                    },
                    Err(_) => {
                        inp.rollback_item();
                        let discriminant = inp.load_u64()?;
                        match discriminant {
                            #( #discriminants => Ok(#ident::#variant_idents), )*
                            other => Err(neko_core::CodecError::schema(
                                format!("unknown enum discriminant {other}")
                            ).into()),
                        }
                    }
                }
            }
        }
    }
}

fn sum_type_codec(
    ident: &syn::Ident,
    impl_generics: &syn::ImplGenerics,
    ty_generics: &syn::TypeGenerics,
    where_clause: Option<&syn::WhereClause>,
    input: &DeriveInput,
) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        unreachable!()
    };

    let encode_arms = data.variants.iter().map(|v| {
        let variant_ident = &v.ident;
        match &v.fields {
            Fields::Unit => quote! {
                #ident::#variant_ident => neko_core::encode_variant(out, |out| out.save_null()),
            },
            Fields::Unnamed(_) => quote! {
                #ident::#variant_ident(inner) => neko_core::encode_variant(out, |out| inner.encode(out)),
            },
            Fields::Named(_) => unreachable!("validated in expand()"),
        }
    });

    let decode_arms = data.variants.iter().map(|v| {
        let variant_ident = &v.ident;
        match &v.fields {
            Fields::Unit => quote! {
                (|inp| inp.load_null().map(|_| #ident::#variant_ident)) as neko_core::VariantArm<I, Self>,
            },
            Fields::Unnamed(u) => {
                let ty = &u.unnamed.first().expect("checked len == 1").ty;
                quote! {
                    (|inp| <#ty as neko_core::Decode>::decode(inp).map(#ident::#variant_ident))
                        as neko_core::VariantArm<I, Self>,
                }
            }
            Fields::Named(_) => unreachable!("validated in expand()"),
        }
    });

    quote! {
        impl #impl_generics neko_core::Encode for #ident #ty_generics #where_clause {
            fn encode<O: neko_core::Output>(&self, out: &mut O) -> Result<(), O::Error> {
                match self {
                    #(#encode_arms)*
                }
            }
        }

        impl #impl_generics neko_core::Decode for #ident #ty_generics #where_clause {
            fn decode<I: neko_core::Input>(inp: &mut I) -> Result<Self, I::Error> {
                neko_core::decode_variant(inp, &[
                    #(#decode_arms)*
                ])
            }
        }
    }
}
