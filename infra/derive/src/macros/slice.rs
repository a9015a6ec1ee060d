use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{ItemStruct, LitStr, Meta};

pub fn expand_slice(args: TokenStream, input: ItemStruct) -> TokenStream {
    let slice_name = match parse_name(args, &input) {
        Ok(name) => name,
        Err(err) => return err,
    };

    let ItemStruct { attrs, vis, ident: wrapper_ident, fields, .. } = &input;
    let inner_ident = format_ident!("{wrapper_ident}Inner");
    let fields = match fields {
        syn::Fields::Unit => quote! { {} },
        other => quote! { #other },
    };

    quote! {
        #(#attrs)*
        #[derive(Debug, Clone)]
        #vis struct #inner_ident #fields

        #[derive(Debug, Clone)]
        #vis struct #wrapper_ident {
            inner: std::sync::Arc<#inner_ident>,
        }

        impl #wrapper_ident {
            pub const NAME: &'static str = #slice_name;

            pub fn new(inner: #inner_ident) -> Self {
                Self { inner: std::sync::Arc::new(inner) }
            }
        }

        impl std::ops::Deref for #wrapper_ident {
            type Target = #inner_ident;
            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::autoims_kernel::domain::registry::FeatureSlice for #wrapper_ident {
            fn name(&self) -> &'static str {
                Self::NAME
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    }
}

/// Reads `name = "..."`; falls back to the lowercased struct name.
fn parse_name(args: TokenStream, input: &ItemStruct) -> Result<LitStr, TokenStream> {
    if args.is_empty() {
        let fallback = input.ident.to_string().to_lowercase();
        return Ok(LitStr::new(&fallback, input.ident.span()));
    }

    let meta: Meta = syn::parse2(args).map_err(|err| err.to_compile_error())?;
    let Meta::NameValue(name_value) = &meta else {
        return Err(syn::Error::new_spanned(meta, "Expected `name = \"...\"`").to_compile_error());
    };
    if !name_value.path.is_ident("name") {
        return Err(syn::Error::new_spanned(&name_value.path, "Expected `name = \"...\"`")
            .to_compile_error());
    }
    match &name_value.value {
        syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(lit), .. }) => Ok(lit.clone()),
        other => Err(syn::Error::new_spanned(other, "Slice name must be a string literal")
            .to_compile_error()),
    }
}
