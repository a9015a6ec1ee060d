use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, Ident, Type, Variant};

struct VariantMeta<'a> {
    ident: &'a Ident,
    source_ty: Option<&'a Type>,
    source_field: Option<&'a Ident>,
    has_context: bool,
    cfg_attrs: Vec<Attribute>,
}

/// Expands `#[autoims_error]` and `#[autoims_error(api)]`.
///
/// In `api` mode every variant may carry `#[status(..)]`, and the enum gains a
/// `From` conversion into `autoims_kernel::server::ApiError`.
pub fn expand_derive(args: TokenStream, mut input: DeriveInput) -> TokenStream {
    let api_bridge = match parse_args(args) {
        Ok(api) => api,
        Err(err) => return err,
    };
    let statuses = match take_status_attrs(&mut input) {
        Ok(statuses) => statuses,
        Err(err) => return err,
    };
    if !api_bridge && statuses.iter().any(Option::is_some) {
        return syn::Error::new_spanned(
            &input.ident,
            "#[status(..)] on variants requires #[autoims_error(api)]",
        )
        .to_compile_error();
    }

    let name = &input.ident;
    let trait_name = format_ident!("{}Ext", name);

    let Data::Enum(data) = &input.data else {
        return quote! { compile_error!("autoims_error can only be applied to enums"); };
    };

    let variants: Vec<VariantMeta<'_>> = match data.variants.iter().map(parse_variant).collect() {
        Ok(v) => v,
        Err(err) => return err,
    };
    if let Some(err) = variants_error(&variants) {
        return err;
    }

    let derived_traits = derived_trait_names(&input);
    let mut derive_tokens = Vec::new();
    if !derived_traits.contains("Debug") {
        derive_tokens.push(quote! { Debug });
    }
    if !derived_traits.contains("Error") {
        derive_tokens.push(quote! { ::thiserror::Error });
    }
    let extra_derives = if derive_tokens.is_empty() {
        quote! {}
    } else {
        quote! { #[derive(#(#derive_tokens),*)] }
    };

    let context_impl = generate_context_trait(name, &trait_name, &variants);
    let from_impls = variants.iter().filter_map(|v| generate_from_impl(name, &trait_name, v));
    let internal_impls = generate_internal_impls(name, &variants);
    let api_impl = if api_bridge { generate_api_impl(name, &variants, &statuses) } else { quote!() };

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #extra_derives
        #input

        #context_impl
        #(#from_impls)*
        #internal_impls
        #api_impl

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

fn parse_args(args: TokenStream) -> Result<bool, TokenStream> {
    if args.is_empty() {
        return Ok(false);
    }
    let ident: Ident = syn::parse2(args).map_err(|err| err.to_compile_error())?;
    if ident == "api" {
        Ok(true)
    } else {
        Err(syn::Error::new_spanned(ident, "Unsupported argument; expected `api`")
            .to_compile_error())
    }
}

/// Removes `#[status(..)]` helper attributes from the variants and returns the
/// matching `ErrorKind` variant for each of them, in declaration order.
fn take_status_attrs(input: &mut DeriveInput) -> Result<Vec<Option<Ident>>, TokenStream> {
    let Data::Enum(data) = &mut input.data else {
        return Ok(Vec::new());
    };

    data.variants
        .iter_mut()
        .map(|variant| {
            let mut status = None;
            let mut kept = Vec::with_capacity(variant.attrs.len());
            for attr in variant.attrs.drain(..) {
                if !attr.path().is_ident("status") {
                    kept.push(attr);
                    continue;
                }
                if status.is_some() {
                    return Err(syn::Error::new_spanned(attr, "Duplicate #[status(..)] attribute")
                        .to_compile_error());
                }
                let kind: Ident = attr.parse_args().map_err(|err| err.to_compile_error())?;
                status = Some(status_kind(&kind)?);
            }
            variant.attrs = kept;
            Ok(status)
        })
        .collect()
}

fn status_kind(kind: &Ident) -> Result<Ident, TokenStream> {
    let variant = match kind.to_string().as_str() {
        "bad_request" => "BadRequest",
        "unauthorized" => "Unauthorized",
        "not_found" => "NotFound",
        "conflict" => "Conflict",
        "internal" => "Internal",
        _ => {
            return Err(syn::Error::new_spanned(
                kind,
                "Unknown status. Use: bad_request, unauthorized, not_found, conflict, or internal",
            )
            .to_compile_error());
        },
    };
    Ok(format_ident!("{variant}", span = kind.span()))
}

fn parse_variant(v: &Variant) -> Result<VariantMeta<'_>, TokenStream> {
    let cfg_attrs = v.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).cloned().collect();

    let fields = match &v.fields {
        Fields::Named(fields) => fields,
        Fields::Unit => {
            return Ok(VariantMeta {
                ident: &v.ident,
                source_ty: None,
                source_field: None,
                has_context: false,
                cfg_attrs,
            });
        },
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                v,
                "autoims_error requires named fields for source/context handling",
            )
            .to_compile_error());
        },
    };

    let context_field = find_context_field(fields)?;
    let source_field = find_source_field(fields);

    Ok(VariantMeta {
        ident: &v.ident,
        source_ty: source_field.map(|field| &field.ty),
        source_field: source_field.and_then(|field| field.ident.as_ref()),
        has_context: context_field.is_some(),
        cfg_attrs,
    })
}

fn find_context_field(fields: &syn::FieldsNamed) -> Result<Option<&syn::Field>, TokenStream> {
    let Some(field) =
        fields.named.iter().find(|field| field.ident.as_ref().is_some_and(|i| i == "context"))
    else {
        return Ok(None);
    };
    if is_context_type(&field.ty) {
        Ok(Some(field))
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context field must be Option<Cow<'static, str>>")
            .to_compile_error())
    }
}

fn find_source_field(fields: &syn::FieldsNamed) -> Option<&syn::Field> {
    fields.named.iter().find(|field| {
        let is_source_name = field.ident.as_ref().is_some_and(|ident| ident == "source");
        is_source_name || field_has_attr(field, "source") || field_has_attr(field, "from")
    })
}

fn generate_context_trait(
    name: &Ident,
    trait_name: &Ident,
    variants: &[VariantMeta<'_>],
) -> TokenStream {
    let context_variants = variants.iter().filter(|v| v.has_context).map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = v.ident;
        quote! { #(#cfg_attrs)* #name::#ident { context: c, .. } => *c = Some(context.into()), }
    });

    quote! {
        pub trait #trait_name<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #trait_name<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut e| {
                    #[allow(clippy::single_match, clippy::match_single_binding)]
                    match &mut e {
                        #( #context_variants )*
                        _ => {}
                    }
                    e
                })
            }
        }
    }
}

fn generate_from_impl(
    name: &Ident,
    trait_name: &Ident,
    v: &VariantMeta<'_>,
) -> Option<TokenStream> {
    if v.ident == "Internal" {
        return None;
    }
    let source_ty = v.source_ty?;
    let source_field = v.source_field?;
    let v_ident = v.ident;
    let cfg_attrs = &v.cfg_attrs;

    Some(quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#source_ty> for #name {
            #[inline]
            fn from(#source_field: #source_ty) -> Self { Self::#v_ident { #source_field, context: None } }
        }

        #(#cfg_attrs)*
        impl<T> #trait_name<T> for std::result::Result<T, #source_ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#source_field| #name::#v_ident { #source_field, context: Some(context.into()) })
            }
        }
    })
}

fn generate_internal_impls(name: &Ident, variants: &[VariantMeta<'_>]) -> TokenStream {
    let Some(internal) = variants.iter().find(|v| v.ident == "Internal") else {
        return quote!();
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn generate_api_impl(
    name: &Ident,
    variants: &[VariantMeta<'_>],
    statuses: &[Option<Ident>],
) -> TokenStream {
    let arms = variants.iter().zip(statuses).filter_map(|(v, status)| {
        let status = status.as_ref()?;
        let cfg_attrs = &v.cfg_attrs;
        let ident = v.ident;
        Some(quote! { #(#cfg_attrs)* #name::#ident { .. } => ::autoims_kernel::server::ErrorKind::#status, })
    });

    quote! {
        #[automatically_derived]
        impl From<#name> for ::autoims_kernel::server::ApiError {
            fn from(err: #name) -> Self {
                #[allow(unreachable_patterns)]
                let kind = match &err {
                    #( #arms )*
                    _ => ::autoims_kernel::server::ErrorKind::Internal,
                };
                Self::new(kind, err.to_string())
            }
        }
    }
}

fn field_has_attr(field: &syn::Field, name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn derived_trait_names(input: &DeriveInput) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("derive") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.segments.last().map(|seg| seg.ident.to_string()) {
                traits.insert(ident);
            }
            Ok(())
        });
    }

    traits
}

fn variants_error(variants: &[VariantMeta<'_>]) -> Option<TokenStream> {
    let v = variants.iter().find(|v| v.source_ty.is_some() && !v.has_context)?;
    Some(
        syn::Error::new_spanned(
            v.ident,
            "autoims_error requires `context: Option<Cow<'static, str>>` for variants with a source",
        )
        .to_compile_error(),
    )
}

fn is_context_type(ty: &Type) -> bool {
    let Some(inner) = single_generic(ty, "Option") else {
        return false;
    };
    let Type::Path(inner_path) = inner else {
        return false;
    };
    let Some(cow) = inner_path.path.segments.last() else {
        return false;
    };
    if cow.ident != "Cow" {
        return false;
    }
    let syn::PathArguments::AngleBracketed(cow_args) = &cow.arguments else {
        return false;
    };
    let mut args = cow_args.args.iter();
    let Some(syn::GenericArgument::Lifetime(lt)) = args.next() else {
        return false;
    };
    let Some(syn::GenericArgument::Type(Type::Path(str_path))) = args.next() else {
        return false;
    };
    lt.ident == "static" && str_path.path.segments.last().is_some_and(|seg| seg.ident == "str")
}

fn single_generic<'a>(ty: &'a Type, outer: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != outer {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(args: TokenStream, item: TokenStream) -> String {
        let input: DeriveInput = syn::parse2(item).expect("valid enum");
        expand_derive(args, input).to_string()
    }

    #[test]
    fn api_mode_maps_statuses_and_strips_helper_attrs() {
        let out = expand(
            quote!(api),
            quote! {
                pub enum CustomerError {
                    #[error("Customer not found")]
                    #[status(not_found)]
                    NotFound,
                    #[error("{message}")]
                    #[status(bad_request)]
                    Validation { message: std::borrow::Cow<'static, str> },
                }
            },
        );

        assert!(out.contains(":: autoims_kernel :: server :: ErrorKind :: NotFound"));
        assert!(out.contains(":: autoims_kernel :: server :: ErrorKind :: BadRequest"));
        assert!(!out.contains("# [status"));
        assert!(!out.contains("compile_error"));
    }

    #[test]
    fn status_without_api_mode_is_rejected() {
        let out = expand(
            TokenStream::new(),
            quote! {
                pub enum DemoError {
                    #[error("gone")]
                    #[status(not_found)]
                    Gone,
                }
            },
        );
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let out = expand(
            quote!(api),
            quote! {
                pub enum DemoError {
                    #[error("teapot")]
                    #[status(teapot)]
                    Teapot,
                }
            },
        );
        assert!(out.contains("Unknown status"));
    }

    #[test]
    fn tuple_variants_are_rejected() {
        let out = expand(
            TokenStream::new(),
            quote! {
                pub enum DemoError {
                    #[error("io: {0}")]
                    Io(std::io::Error),
                }
            },
        );
        assert!(out.contains("requires named fields"));
    }

    #[test]
    fn source_without_context_is_rejected() {
        let out = expand(
            TokenStream::new(),
            quote! {
                pub enum DemoError {
                    #[error("io: {source}")]
                    Io { source: std::io::Error },
                }
            },
        );
        assert!(out.contains("requires `context"));
    }

    #[test]
    fn plain_mode_emits_no_api_bridge() {
        let out = expand(
            TokenStream::new(),
            quote! {
                pub enum DemoError {
                    #[error("internal: {message}")]
                    Internal {
                        message: std::borrow::Cow<'static, str>,
                        context: Option<std::borrow::Cow<'static, str>>,
                    },
                }
            },
        );
        assert!(!out.contains("ApiError"));
        assert!(out.contains("impl From < String > for DemoError"));
    }
}
