use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{DeriveInput, Ident};

use crate::attribute::CanonAttribute;

/// A fieldless enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub ident: Ident,
    pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    pub ident: Ident,
    pub name: String,
}

impl TryFrom<DeriveInput> for Enum {
    type Error = syn::Error;

    fn try_from(value: DeriveInput) -> Result<Self, Self::Error> {
        let syn::Data::Enum(data_enum) = value.data else {
            return Err(syn::Error::new(value.span(), "expected an enum"));
        };
        if !value.generics.params.is_empty() {
            return Err(syn::Error::new(value.generics.span(), "generic enums are not supported"));
        }
        let attribute = CanonAttribute::parse(&value.attrs)?;
        if attribute.rename.is_some() {
            return Err(syn::Error::new(value.ident.span(), "enums cannot be renamed, rename their variants"));
        }
        let variants = data_enum
            .variants
            .into_iter()
            .map(|variant| {
                if !matches!(variant.fields, syn::Fields::Unit) {
                    return Err(syn::Error::new(variant.fields.span(), "only fieldless variants are supported"));
                }
                let attribute = CanonAttribute::parse(&variant.attrs)?;
                let name = attribute.rename.unwrap_or_else(|| variant.ident.to_string());
                Ok(EnumVariant { ident: variant.ident, name })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { ident: value.ident, variants })
    }
}

impl Enum {
    pub fn derive_variant(&self) -> TokenStream {
        let ident = &self.ident;
        let idents: Vec<_> = self.variants.iter().map(|variant| &variant.ident).collect();
        let names = self.variants.iter().map(|variant| &variant.name);
        let ordinals: Vec<_> = (0..self.variants.len()).collect();

        quote! {
            impl ::canon::variant::Variant for #ident {
                const VARIANTS: &'static [&'static str] = &[#(#names),*];

                fn ordinal(self) -> usize {
                    match self {
                        #(Self::#idents => #ordinals,)*
                    }
                }

                fn from_ordinal(ordinal: usize) -> ::core::option::Option<Self> {
                    match ordinal {
                        #(#ordinals => ::core::option::Option::Some(Self::#idents),)*
                        _ => ::core::option::Option::None,
                    }
                }
            }
        }
    }

    pub fn derive_serialize(&self) -> TokenStream {
        let ident = &self.ident;
        quote! {
            impl ::canon::ser::Serialize for #ident {
                fn serialize<__S: ::canon::ser::Serializer>(
                    &self,
                    serializer: &mut __S,
                ) -> ::core::result::Result<__S::Success, __S::Error> {
                    ::canon::ser::Serializer::serialize_variant(serializer, *self)
                }
            }
        }
    }

    pub fn derive_deserialize(&self) -> TokenStream {
        let ident = &self.ident;
        quote! {
            impl ::canon::de::Deserialize for #ident {
                fn deserialize<__A: ::canon::allocator::Allocator, __D: ::canon::de::Deserializer>(
                    _allocator: &__A,
                    deserializer: &mut __D,
                ) -> ::core::result::Result<Self, __D::Error> {
                    deserializer.deserialize(::canon::de::decode::EnumVisitor::<Self>::new())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use syn::parse_quote;

    use super::*;

    #[test]
    fn fieldless() {
        let input: DeriveInput = parse_quote!(
            enum Color {
                Red,
                #[canon(rename = "green")]
                Green,
                Blue = 7,
            }
        );
        let actual = Enum::try_from(input).unwrap();
        let expected = Enum {
            ident: parse_quote!(Color),
            variants: vec![
                EnumVariant { ident: parse_quote!(Red), name: "Red".into() },
                EnumVariant { ident: parse_quote!(Green), name: "green".into() },
                EnumVariant { ident: parse_quote!(Blue), name: "Blue".into() },
            ],
        };
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case(parse_quote!(enum Shape { Circle(f32) }))]
    #[case(parse_quote!(enum Shape { Square { side: f32 } }))]
    #[case(parse_quote!(enum Tagged<T> { Only }))]
    #[case(parse_quote!(#[canon(rename = "Other")] enum Renamed { Only }))]
    #[case(parse_quote!(struct NotAnEnum;))]
    fn rejected(#[case] input: DeriveInput) {
        assert!(Enum::try_from(input).is_err());
    }

    #[test]
    fn variant_ordinals() {
        let input: DeriveInput = parse_quote!(
            enum Switch {
                Off,
                On,
            }
        );
        let tokens = Enum::try_from(input).unwrap().derive_variant().to_string();
        assert!(tokens.contains("\"Off\" , \"On\""));
        assert!(tokens.contains("Self :: On => 1usize"));
    }
}
