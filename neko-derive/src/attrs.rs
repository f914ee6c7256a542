//! Parsing for the `#[neko(...)]` attribute: the adjacent-metadata form of
//! §4.1's Field Description plus the Tag System of §3/§4.2.

use syn::{Attribute, Lit, Meta};

#[derive(Default, Clone)]
pub struct FieldAttrs {
    pub rename: Option<String>,
    pub skippable: bool,
    pub flatten: bool,
    pub fixed_length: bool,
    pub raw_string: bool,
}

#[derive(Default, Clone)]
pub struct TypeAttrs {
    pub name: Option<String>,
    /// Encode/decode this record as an array-shape record (§4.3: "reflected
    /// record (array shape, no names)") instead of the default object
    /// shape. Array-shape records may not contain optional fields.
    pub array_shape: bool,
}

pub fn parse_field_attrs(attrs: &[Attribute]) -> FieldAttrs {
    let mut out = FieldAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("neko") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skippable") {
                out.skippable = true;
            } else if meta.path.is_ident("flatten") {
                out.flatten = true;
            } else if meta.path.is_ident("fixed_length") {
                out.fixed_length = true;
            } else if meta.path.is_ident("raw_string") {
                out.raw_string = true;
            } else if meta.path.is_ident("rename") {
                let value = meta.value()?;
                let lit: syn::LitStr = value.parse()?;
                out.rename = Some(lit.value());
            }
            Ok(())
        });
    }
    out
}

pub fn parse_type_attrs(attrs: &[Attribute]) -> TypeAttrs {
    let mut out = TypeAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("neko") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("array_shape") {
                out.array_shape = true;
            } else if meta.path.is_ident("name") {
                let value = meta.value()?;
                let lit: syn::LitStr = value.parse()?;
                out.name = Some(lit.value());
            }
            Ok(())
        });
    }
    out
}

/// Best-effort: does this attribute list contain a bare `#[doc = "..."]`
/// we should leave untouched? (kept separate so callers never need to
/// special-case doc comments when walking `#[neko(...)]` attributes.)
pub fn is_neko_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("neko")
}

#[allow(dead_code)]
pub fn lit_str(meta: &Meta) -> Option<String> {
    if let Meta::NameValue(nv) = meta {
        if let syn::Expr::Lit(expr_lit) = &nv.value {
            if let Lit::Str(s) = &expr_lit.lit {
                return Some(s.value());
            }
        }
    }
    None
}
