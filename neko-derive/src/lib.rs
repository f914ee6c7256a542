//! `#[derive(Reflect)]`: the proc-macro realization of §4.1's macro form of
//! Field Description, per Design Notes §9 ("Macro-based field enumeration
//! → proc-macro or derive"). Generates a [`neko_core::Reflect`] impl (for
//! structs) plus [`neko_core::Encode`]/[`neko_core::Decode`] (and, for
//! object-shape structs, [`neko_core::FlattenFields`]) for both structs and
//! enums.

mod attrs;
mod derive_enum;
mod derive_struct;

use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput};

#[proc_macro_derive(Reflect, attributes(neko))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = match &input.data {
        Data::Struct(_) => derive_struct::expand(&input),
        Data::Enum(_) => derive_enum::expand(&input),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input,
            "#[derive(Reflect)] does not support unions",
        )),
    };

    match expanded {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
