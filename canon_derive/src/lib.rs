use canon_derive_impl::DeriveObject;
use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

#[proc_macro_derive(Serialize, attributes(canon))]
pub fn derive_serialize(tokens: TokenStream) -> TokenStream {
    let input = parse_macro_input!(tokens as DeriveInput);
    DeriveObject::parse(input)
        .and_then(|object| object.derive_serialize())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[proc_macro_derive(Deserialize, attributes(canon))]
pub fn derive_deserialize(tokens: TokenStream) -> TokenStream {
    let input = parse_macro_input!(tokens as DeriveInput);
    DeriveObject::parse(input)
        .and_then(|object| object.derive_deserialize())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[proc_macro_derive(Variant, attributes(canon))]
pub fn derive_variant(tokens: TokenStream) -> TokenStream {
    let input = parse_macro_input!(tokens as DeriveInput);
    DeriveObject::parse(input)
        .and_then(|object| object.derive_variant())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
