mod attribute;
mod derive_enum;
mod derive_struct;
mod shared;

use proc_macro2::TokenStream;
use syn::DeriveInput;
use syn::spanned::Spanned;

use derive_enum::Enum;
use derive_struct::Struct;

pub enum DeriveObject {
    Struct(Struct),
    Enum(Enum),
}

impl DeriveObject {
    pub fn parse(input: DeriveInput) -> Result<Self, syn::Error> {
        match &input.data {
            syn::Data::Struct(_) => Ok(Self::Struct(Struct::try_from(input)?)),
            syn::Data::Enum(_) => Ok(Self::Enum(Enum::try_from(input)?)),
            syn::Data::Union(_) => Err(syn::Error::new(input.span(), "unions are not supported")),
        }
    }

    pub fn derive_serialize(&self) -> Result<TokenStream, syn::Error> {
        match self {
            DeriveObject::Struct(item) => Ok(item.derive_serialize()),
            DeriveObject::Enum(item) => Ok(item.derive_serialize()),
        }
    }

    pub fn derive_deserialize(&self) -> Result<TokenStream, syn::Error> {
        match self {
            DeriveObject::Struct(item) => item.derive_deserialize(),
            DeriveObject::Enum(item) => Ok(item.derive_deserialize()),
        }
    }

    pub fn derive_variant(&self) -> Result<TokenStream, syn::Error> {
        match self {
            DeriveObject::Struct(item) => Err(syn::Error::new(item.ident.span(), "only enums can derive `Variant`")),
            DeriveObject::Enum(item) => Ok(item.derive_variant()),
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn union_rejected() {
        let input: DeriveInput = parse_quote!(
            union Bits {
                int: u32,
                float: f32,
            }
        );
        assert!(DeriveObject::parse(input).is_err());
    }

    #[test]
    fn variant_of_struct_rejected() {
        let input: DeriveInput = parse_quote!(
            struct Point {
                x: i32,
            }
        );
        assert!(DeriveObject::parse(input).unwrap().derive_variant().is_err());
    }
}
