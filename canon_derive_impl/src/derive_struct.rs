use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{DeriveInput, Generics, Ident, Member, Type, parse_quote};

use crate::attribute::CanonAttribute;
use crate::shared::{field_vars, release_options, visitor_generics, with_bound};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    pub ident: Ident,
    pub generics: Generics,
    pub name: String,
    pub kind: Kind,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Named,
    Tuple,
    Unit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub member: Member,
    pub ty: Type,
    pub name: String,
}

impl TryFrom<DeriveInput> for Struct {
    type Error = syn::Error;

    fn try_from(value: DeriveInput) -> Result<Self, Self::Error> {
        let syn::Data::Struct(data_struct) = value.data else {
            return Err(syn::Error::new(value.span(), "expected a struct"));
        };
        let attribute = CanonAttribute::parse(&value.attrs)?;
        let kind = match &data_struct.fields {
            syn::Fields::Named(_) => Kind::Named,
            syn::Fields::Unnamed(_) => Kind::Tuple,
            syn::Fields::Unit => Kind::Unit,
        };
        let fields = data_struct
            .fields
            .into_iter()
            .enumerate()
            .map(|(index, field)| Field::parse(index, field))
            .collect::<Result<Vec<_>, _>>()?;
        let name = attribute.rename.unwrap_or_else(|| value.ident.to_string());
        Ok(Self { ident: value.ident, generics: value.generics, name, kind, fields })
    }
}

impl Field {
    fn parse(index: usize, field: syn::Field) -> Result<Self, syn::Error> {
        let attribute = CanonAttribute::parse(&field.attrs)?;
        match field.ident {
            Some(ident) => {
                let name = attribute.rename.unwrap_or_else(|| ident.to_string());
                Ok(Self { member: Member::Named(ident), ty: field.ty, name })
            }
            None if attribute.rename.is_some() => {
                Err(syn::Error::new(field.span(), "fields of tuple structs cannot be renamed"))
            }
            None => Ok(Self { member: Member::Unnamed(index.into()), ty: field.ty, name: index.to_string() }),
        }
    }
}

//------------------------------------------------------------------------------
// Serialize
//------------------------------------------------------------------------------

impl Struct {
    pub fn derive_serialize(&self) -> TokenStream {
        let ident = &self.ident;
        let generics = with_bound(&self.generics, &parse_quote!(::canon::ser::Serialize));
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let members: Vec<_> = self.fields.iter().map(|field| &field.member).collect();
        let names: Vec<_> = self.fields.iter().map(|field| &field.name).collect();
        let count = self.fields.len();
        let name = &self.name;

        let body = match self.kind {
            Kind::Named => quote! {
                let mut builder = ::canon::ser::Serializer::serialize_struct(serializer, #name, #count)?;
                #(
                    ::canon::ser::SerializeStruct::serialize_field(&mut builder, #names, &self.#members)
                        .map_err(|error| ::canon::error::TraceError::enclose(error, #names))?;
                )*
                ::canon::ser::SerializeStruct::finish(builder)
            },
            Kind::Tuple => quote! {
                let mut builder = ::canon::ser::Serializer::serialize_tuple(serializer, ::core::option::Option::Some(#count))?;
                #(
                    ::canon::ser::SerializeTuple::serialize_element(&mut builder, &self.#members)
                        .map_err(|error| ::canon::error::TraceError::enclose(error, #names))?;
                )*
                ::canon::ser::SerializeTuple::finish(builder)
            },
            Kind::Unit => quote! {
                ::canon::ser::Serializer::serialize_void(serializer)
            },
        };

        quote! {
            impl #impl_generics ::canon::ser::Serialize for #ident #ty_generics #where_clause {
                fn serialize<__S: ::canon::ser::Serializer>(
                    &self,
                    serializer: &mut __S,
                ) -> ::core::result::Result<__S::Success, __S::Error> {
                    #body
                }
            }
        }
    }
}

//------------------------------------------------------------------------------
// Deserialize
//------------------------------------------------------------------------------

impl Struct {
    pub fn derive_deserialize(&self) -> Result<TokenStream, syn::Error> {
        if let Some(lifetime) = self.generics.lifetimes().next() {
            return Err(syn::Error::new(lifetime.span(), "types that borrow cannot be deserialized"));
        }

        let ident = &self.ident;
        let generics = with_bound(&self.generics, &parse_quote!(::canon::de::Deserialize));
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let visitor_generics = visitor_generics(&generics);
        let (visitor_impl_generics, visitor_ty_generics, _) = visitor_generics.split_for_impl();

        let field_keys = match self.kind {
            Kind::Named => self.field_keys(),
            _ => TokenStream::new(),
        };
        let (expecting, visits) = match self.kind {
            Kind::Named => {
                let visit_map = self.visit_map();
                let visit_seq = self.visit_seq();
                let expecting = quote! {
                    ::canon::Shapes::MAP | ::canon::Shapes::STRUCT | ::canon::Shapes::SEQUENCE | ::canon::Shapes::TUPLE
                };
                (expecting, quote! { #visit_map #visit_seq })
            }
            Kind::Tuple => (quote! { ::canon::Shapes::SEQUENCE | ::canon::Shapes::TUPLE }, self.visit_seq()),
            Kind::Unit => {
                let visit_void = quote! {
                    fn visit_void<__E: ::canon::error::DeserializeError>(self) -> ::core::result::Result<Self::Value, __E> {
                        ::core::result::Result::Ok(#ident)
                    }
                };
                (quote! { ::canon::Shapes::VOID }, visit_void)
            }
        };
        let release = self.release();

        Ok(quote! {
            const _: () = {
                #field_keys

                struct __Visitor #visitor_impl_generics #where_clause {
                    allocator: &'__a __A,
                    marker: ::core::marker::PhantomData<fn() -> #ident #ty_generics>,
                }

                impl #visitor_impl_generics ::canon::de::Visitor for __Visitor #visitor_ty_generics #where_clause {
                    type Value = #ident #ty_generics;

                    fn expecting(&self) -> ::canon::Shapes {
                        #expecting
                    }

                    #visits
                }

                impl #impl_generics ::canon::de::Deserialize for #ident #ty_generics #where_clause {
                    fn deserialize<__A: ::canon::allocator::Allocator, __D: ::canon::de::Deserializer>(
                        allocator: &__A,
                        deserializer: &mut __D,
                    ) -> ::core::result::Result<Self, __D::Error> {
                        deserializer.deserialize(__Visitor { allocator, marker: ::core::marker::PhantomData })
                    }

                    #release
                }
            };
        })
    }

    fn field_variants(&self) -> Vec<Ident> {
        (0..self.fields.len()).map(|index| format_ident!("__Field{}", index)).collect()
    }

    /// The key type of named structs, which resolves field names.
    fn field_keys(&self) -> TokenStream {
        let variants = self.field_variants();
        let names: Vec<_> = self.fields.iter().map(|field| &field.name).collect();
        let patterns = names.iter().map(|name| Literal::byte_string(name.as_bytes()));

        quote! {
            const __FIELDS: &[&str] = &[#(#names),*];

            #[allow(non_camel_case_types)]
            enum __Field {
                #(#variants,)*
            }

            struct __FieldVisitor;

            impl ::canon::de::Visitor for __FieldVisitor {
                type Value = __Field;

                fn expecting(&self) -> ::canon::Shapes {
                    ::canon::Shapes::STRING
                }

                fn visit_string<__E: ::canon::error::DeserializeError>(
                    self,
                    value: &[u8],
                ) -> ::core::result::Result<__Field, __E> {
                    match value {
                        #(#patterns => ::core::result::Result::Ok(__Field::#variants),)*
                        _ => ::core::result::Result::Err(__E::unknown_field(value, __FIELDS)),
                    }
                }
            }

            impl ::canon::de::Deserialize for __Field {
                fn deserialize<__A: ::canon::allocator::Allocator, __D: ::canon::de::Deserializer>(
                    _allocator: &__A,
                    deserializer: &mut __D,
                ) -> ::core::result::Result<Self, __D::Error> {
                    deserializer.deserialize(__FieldVisitor)
                }
            }
        }
    }

    fn visit_map(&self) -> TokenStream {
        let variants = self.field_variants();
        let vars = field_vars(self.fields.len());
        let types: Vec<_> = self.fields.iter().map(|field| &field.ty).collect();
        let names: Vec<_> = self.fields.iter().map(|field| &field.name).collect();
        let error = quote! { <__M::Error as ::canon::error::DeserializeError> };
        let finish = self.finish(&error);

        quote! {
            fn visit_map<__M: ::canon::de::MapAccess>(self, map: &mut __M) -> ::core::result::Result<Self::Value, __M::Error> {
                #(let mut #vars: ::core::option::Option<#types> = ::core::option::Option::None;)*
                let result = (|| -> ::core::result::Result<(), __M::Error> {
                    while let ::core::option::Option::Some(key) = map.next_key::<__Field, __A>(self.allocator)? {
                        match key {
                            #(
                                __Field::#variants => {
                                    if #vars.is_some() {
                                        return ::core::result::Result::Err(#error::duplicate_field(#names));
                                    }
                                    let value = map
                                        .next_value::<#types, __A>(self.allocator)
                                        .map_err(|error| ::canon::error::TraceError::enclose(error, #names))?;
                                    #vars = ::core::option::Option::Some(value);
                                }
                            )*
                        }
                    }
                    ::core::result::Result::Ok(())
                })();
                #finish
            }
        }
    }

    fn visit_seq(&self) -> TokenStream {
        let vars = field_vars(self.fields.len());
        let types: Vec<_> = self.fields.iter().map(|field| &field.ty).collect();
        let names: Vec<_> = self.fields.iter().map(|field| &field.name).collect();
        let indices = 0..self.fields.len();
        let count = self.fields.len();
        let too_many = count + 1;
        let error = quote! { <__S::Error as ::canon::error::DeserializeError> };
        let finish = self.finish(&error);

        quote! {
            fn visit_seq<__S: ::canon::de::SeqAccess>(self, seq: &mut __S) -> ::core::result::Result<Self::Value, __S::Error> {
                #(let mut #vars: ::core::option::Option<#types> = ::core::option::Option::None;)*
                let result = (|| -> ::core::result::Result<(), __S::Error> {
                    #(
                        let element = seq
                            .next_element::<#types, __A>(self.allocator)
                            .map_err(|error| ::canon::error::TraceError::enclose(error, #names))?;
                        match element {
                            ::core::option::Option::Some(value) => #vars = ::core::option::Option::Some(value),
                            ::core::option::Option::None => {
                                return ::core::result::Result::Err(#error::invalid_length(#indices, #count));
                            }
                        }
                    )*
                    if seq.next_element::<::canon::de::Ignored, __A>(self.allocator)?.is_some() {
                        return ::core::result::Result::Err(#error::invalid_length(#too_many, #count));
                    }
                    ::core::result::Result::Ok(())
                })();
                #finish
            }
        }
    }

    /// Assemble the value from the decoded fields, or release them when
    /// decoding failed or a field is missing.
    fn finish(&self, error: &TokenStream) -> TokenStream {
        let ident = &self.ident;
        let vars = field_vars(self.fields.len());
        let release = release_options(&vars);
        let construct = match self.kind {
            Kind::Named => {
                let members = self.fields.iter().map(|field| &field.member);
                quote! { #ident { #(#members: #vars),* } }
            }
            _ => quote! { #ident(#(#vars),*) },
        };
        let incomplete = match self.fields.split_last() {
            None => TokenStream::new(),
            Some((last, leading)) => {
                let last_name = &last.name;
                let missing = match leading.is_empty() {
                    true => quote! { #last_name },
                    false => leading.iter().zip(&vars[..leading.len()]).rev().fold(quote! { { #last_name } }, |tail, (field, var)| {
                        let name = &field.name;
                        quote! { if #var.is_none() { #name } else #tail }
                    }),
                };
                quote! {
                    (#(#vars,)*) => {
                        let missing = #missing;
                        #release
                        ::core::result::Result::Err(#error::missing_field(missing))
                    }
                }
            }
        };

        quote! {
            if let ::core::result::Result::Err(error) = result {
                #release
                return ::core::result::Result::Err(error);
            }
            match (#(#vars,)*) {
                (#(::core::option::Option::Some(#vars),)*) => ::core::result::Result::Ok(#construct),
                #incomplete
            }
        }
    }

    fn release(&self) -> TokenStream {
        let ident = &self.ident;
        let vars = field_vars(self.fields.len());
        let pattern = match self.kind {
            Kind::Named => {
                let members = self.fields.iter().map(|field| &field.member);
                quote! { #ident { #(#members: #vars),* } }
            }
            Kind::Tuple => quote! { #ident(#(#vars),*) },
            Kind::Unit => return TokenStream::new(),
        };
        quote! {
            fn release<__A: ::canon::allocator::Allocator>(self, allocator: &__A) {
                let #pattern = self;
                #(::canon::de::Deserialize::release(#vars, allocator);)*
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
    fn named_fields() {
        let input: DeriveInput = parse_quote!(
            struct Point {
                x: i32,
                #[canon(rename = "why")]
                y: i32,
            }
        );
        let actual = Struct::try_from(input).unwrap();
        let expected = Struct {
            ident: parse_quote!(Point),
            generics: Generics::default(),
            name: "Point".into(),
            kind: Kind::Named,
            fields: vec![
                Field { member: parse_quote!(x), ty: parse_quote!(i32), name: "x".into() },
                Field { member: parse_quote!(y), ty: parse_quote!(i32), name: "why".into() },
            ],
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn tuple_fields() {
        let input: DeriveInput = parse_quote!(
            #[canon(rename = "Pair")]
            struct Tuple(u8, String);
        );
        let actual = Struct::try_from(input).unwrap();
        assert_eq!(actual.name, "Pair");
        assert_eq!(actual.kind, Kind::Tuple);
        assert_eq!(actual.fields[1].member, parse_quote!(1));
        assert_eq!(actual.fields[1].name, "1");
    }

    #[test]
    fn unit() {
        let input: DeriveInput = parse_quote!(
            struct Marker;
        );
        let actual = Struct::try_from(input).unwrap();
        assert_eq!(actual.kind, Kind::Unit);
        assert!(actual.fields.is_empty());
    }

    #[rstest]
    #[case(parse_quote!(struct Tuple(#[canon(rename = "a")] u8);))]
    #[case(parse_quote!(struct Named { #[canon(align = 4)] a: u8 }))]
    #[case(parse_quote!(enum NotAStruct { A }))]
    fn rejected(#[case] input: DeriveInput) {
        assert!(Struct::try_from(input).is_err());
    }

    #[test]
    fn borrowed_not_deserializable() {
        let input: DeriveInput = parse_quote!(
            struct View<'a> {
                bytes: &'a [u8],
            }
        );
        let parsed = Struct::try_from(input).unwrap();
        assert!(parsed.derive_deserialize().is_err());
        assert!(!parsed.derive_serialize().is_empty());
    }

    #[test]
    fn serialize_named_uses_struct_builder() {
        let input: DeriveInput = parse_quote!(
            struct Point {
                x: i32,
            }
        );
        let tokens = Struct::try_from(input).unwrap().derive_serialize().to_string();
        assert!(tokens.contains("serialize_struct"));
        assert!(tokens.contains("enclose"));
    }

    #[test]
    fn deserialize_generic() {
        let input: DeriveInput = parse_quote!(
            struct Wrapper<T> {
                inner: T,
            }
        );
        let tokens = Struct::try_from(input).unwrap().derive_deserialize().unwrap().to_string();
        assert!(tokens.contains("__Visitor"));
        assert!(tokens.contains("missing_field"));
        assert!(tokens.contains("duplicate_field"));
    }
}
