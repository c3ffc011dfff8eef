use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{GenericParam, Generics, Ident, Path, parse_quote};

/// Require `bound` of every type parameter.
pub fn with_bound(generics: &Generics, bound: &Path) -> Generics {
    let mut generics = generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(type_param) = param {
            type_param.bounds.push(parse_quote!(#bound));
        }
    }
    generics
}

/// The generics of the visitor of a type with the given generics: a lifetime
/// and an allocator in front of the type's own parameters.
pub fn visitor_generics(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    generics.params.insert(0, parse_quote!('__a));
    generics.params.insert(1, parse_quote!(__A: ::canon::allocator::Allocator));
    generics
}

/// Local variables holding the decoded fields.
pub fn field_vars(count: usize) -> Vec<Ident> {
    (0..count).map(|index| format_ident!("__field{}", index, span = Span::call_site())).collect()
}

/// Release every decoded field in `vars`, which are all `Option`s.
pub fn release_options(vars: &[Ident]) -> TokenStream {
    quote! {
        #(
            if let ::core::option::Option::Some(value) = #vars {
                ::canon::de::Deserialize::release(value, self.allocator);
            }
        )*
    }
}

#[cfg(test)]
mod tests {
    use syn::DeriveInput;

    use super::*;

    #[test]
    fn bound_added_to_type_params_only() {
        let input: DeriveInput = parse_quote!(
            struct Wrapper<T: Clone, const N: usize> {}
        );
        let bounded = with_bound(&input.generics, &parse_quote!(::canon::ser::Serialize));
        let expected: Generics = parse_quote!(<T: Clone + ::canon::ser::Serialize, const N: usize>);
        assert_eq!(bounded, expected);
    }

    #[test]
    fn visitor_generics_prepend() {
        let input: DeriveInput = parse_quote!(
            struct Wrapper<T> {}
        );
        let expected: Generics = parse_quote!(<'__a, __A: ::canon::allocator::Allocator, T>);
        assert_eq!(visitor_generics(&input.generics), expected);
    }
}
