use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::token::Comma;
use syn::{Attribute, Expr, ExprLit, Lit, Meta};

/// The options a `#[canon(...)]` attribute may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonAttribute {
    pub rename: Option<String>,
}

impl CanonAttribute {
    /// Merge all `#[canon(...)]` attributes of an item, ignoring foreign ones.
    pub fn parse(attrs: &[Attribute]) -> Result<Self, syn::Error> {
        let mut rename = None;
        for attribute in attrs.iter().filter(|attr| attr.path().is_ident("canon")) {
            parse_meta_list_attr(attribute, &mut [("rename", &mut |meta| parse_literal_str_meta(&mut rename, meta))])?;
        }
        Ok(Self { rename })
    }
}

pub fn parse_literal_str_meta(value: &mut Option<String>, meta: &Meta) -> Result<(), syn::Error> {
    if value.is_some() {
        let path = meta.path().to_token_stream();
        return Err(syn::Error::new(meta.span(), format!("the parameter `{path}` has already been defined")));
    }
    let meta_nvp = meta.require_name_value()?;
    let Expr::Lit(ExprLit { attrs: _, lit: Lit::Str(lit_str) }) = &meta_nvp.value else {
        return Err(syn::Error::new(meta_nvp.value.span(), "expected a string literal"));
    };
    *value = Some(lit_str.value());
    Ok(())
}

pub fn parse_meta_list_attr(
    attr: &Attribute,
    parameters: &mut [(&str, &mut dyn FnMut(&Meta) -> Result<(), syn::Error>)],
) -> Result<(), syn::Error> {
    let meta_list = attr.meta.require_list()?;
    let metas = meta_list.parse_args_with(|parse_buffer: &syn::parse::ParseBuffer<'_>| {
        Punctuated::<Meta, Comma>::parse_terminated(parse_buffer)
    })?;

    for meta in metas {
        let Some((_, parser)) = parameters.iter_mut().find(|(ident, _)| meta.path().is_ident(ident)) else {
            let path = meta.path().to_token_stream();
            return Err(syn::Error::new(meta.span(), format!("the parameter `{path}` is not accepted here")));
        };
        parser(&meta)?;
    }

    Ok(())
}
