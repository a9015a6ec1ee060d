use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::{Attribute, ItemFn, ItemStruct, Lit, LitStr, Meta, MetaNameValue};

/// Which serde directions a model takes part in.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Both,
    Request,
    Response,
}

impl Direction {
    const fn serializes(self) -> bool {
        matches!(self, Self::Both | Self::Response)
    }

    const fn deserializes(self) -> bool {
        matches!(self, Self::Both | Self::Request)
    }
}

struct ApiModelArgs {
    direction: Direction,
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
}

struct SerdeMetaInfo {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

/// Expands the `#[api_model]` attribute macro.
///
/// Adds the serde derives the model needs, `ToSchema` behind the `server`
/// feature, and the snake_case wire policy.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    let args = match parse_api_model_args(args) {
        Ok(args) => args,
        Err(err) => return err,
    };
    let derives = derived_trait_names(&input.attrs);
    let serde_meta = match serde_meta_info(&input.attrs) {
        Ok(info) => info,
        Err(err) => return err,
    };

    let derive_attr = derive_attr(&derives, args.direction);
    let to_schema_attr = if derives.contains("ToSchema") {
        quote! {}
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    };
    let rename_attr = match rename_attr(args.rename_all.clone(), &serde_meta) {
        Ok(attr) => attr,
        Err(err) => return err,
    };
    let deny_attr = match deny_unknown_attr(&args, &serde_meta, &input) {
        Ok(attr) => attr,
        Err(err) => return err,
    };

    quote! {
        #derive_attr
        #to_schema_attr
        #rename_attr
        #deny_attr
        #input
    }
}

/// Expands the `#[api_handler]` attribute macro.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

fn parse_api_model_args(args: TokenStream) -> Result<ApiModelArgs, TokenStream> {
    let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
    let metas = parser.parse2(args).map_err(|err| err.to_compile_error())?;

    let mut direction = None;
    let mut rename_all = None;
    let mut deny_unknown_fields = None;

    for meta in metas {
        match meta {
            Meta::Path(path) => {
                let value = if path.is_ident("request") {
                    Direction::Request
                } else if path.is_ident("response") {
                    Direction::Response
                } else {
                    return Err(unsupported(&path));
                };
                if direction.replace(value).is_some() {
                    return Err(syn::Error::new_spanned(path, "Duplicate direction argument")
                        .to_compile_error());
                }
            },
            Meta::NameValue(name_value) if name_value.path.is_ident("rename_all") => {
                let value = parse_lit(&name_value, "rename_all", |lit| match lit {
                    Lit::Str(s) => Some(s.clone()),
                    _ => None,
                })?;
                rename_all = Some(set_once(rename_all, &name_value, value)?);
            },
            Meta::NameValue(name_value) if name_value.path.is_ident("deny_unknown_fields") => {
                let value = parse_lit(&name_value, "deny_unknown_fields", |lit| match lit {
                    Lit::Bool(b) => Some(b.value),
                    _ => None,
                })?;
                deny_unknown_fields = Some(set_once(deny_unknown_fields, &name_value, value)?);
            },
            other => return Err(unsupported(&other)),
        }
    }

    Ok(ApiModelArgs { direction: direction.unwrap_or(Direction::Both), rename_all, deny_unknown_fields })
}

fn unsupported(tokens: &impl quote::ToTokens) -> TokenStream {
    syn::Error::new_spanned(
        tokens,
        "Unsupported argument; expected request, response, rename_all or deny_unknown_fields",
    )
    .to_compile_error()
}

fn parse_lit<T>(
    name_value: &MetaNameValue,
    label: &str,
    extract: impl FnOnce(&Lit) -> Option<T>,
) -> Result<T, TokenStream> {
    let value = match &name_value.value {
        syn::Expr::Lit(expr_lit) => extract(&expr_lit.lit),
        _ => None,
    };
    value.ok_or_else(|| {
        syn::Error::new_spanned(&name_value.value, format!("{label} has the wrong literal type"))
            .to_compile_error()
    })
}

fn set_once<T>(current: Option<T>, token: &MetaNameValue, value: T) -> Result<T, TokenStream> {
    if current.is_some() {
        return Err(syn::Error::new_spanned(token, "Duplicate argument").to_compile_error());
    }
    Ok(value)
}

fn derive_attr(derives: &FxHashSet<String>, direction: Direction) -> TokenStream {
    let mut tokens = Vec::new();
    if !derives.contains("Debug") {
        tokens.push(quote! { Debug });
    }
    if direction.serializes() && !derives.contains("Serialize") {
        tokens.push(quote! { ::serde::Serialize });
    }
    if direction.deserializes() && !derives.contains("Deserialize") {
        tokens.push(quote! { ::serde::Deserialize });
    }

    if tokens.is_empty() { quote! {} } else { quote! { #[derive(#(#tokens),*)] } }
}

fn rename_attr(
    rename_all: Option<LitStr>,
    serde_meta: &SerdeMetaInfo,
) -> Result<TokenStream, TokenStream> {
    let rename_all_value = rename_all.unwrap_or_else(|| LitStr::new("snake_case", Span::call_site()));

    match &serde_meta.rename_all {
        Some(existing) if existing.value() != rename_all_value.value() => Err(
            syn::Error::new_spanned(
                existing,
                "Conflicting serde rename_all; remove it or set api_model(rename_all = \"...\") to match",
            )
            .to_compile_error(),
        ),
        Some(_) => Ok(quote! {}),
        None => Ok(quote! { #[serde(rename_all = #rename_all_value)] }),
    }
}

fn deny_unknown_attr(
    args: &ApiModelArgs,
    serde_meta: &SerdeMetaInfo,
    input: &ItemStruct,
) -> Result<TokenStream, TokenStream> {
    let deny_unknown = args.deny_unknown_fields.unwrap_or(false);
    if deny_unknown && !args.direction.deserializes() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "deny_unknown_fields only applies to models that deserialize",
        )
        .to_compile_error());
    }
    if serde_meta.deny_unknown_fields || !deny_unknown {
        return Ok(quote! {});
    }
    Ok(quote! { #[serde(deny_unknown_fields)] })
}

fn serde_meta_info(attrs: &[Attribute]) -> Result<SerdeMetaInfo, TokenStream> {
    let mut info = SerdeMetaInfo { rename_all: None, deny_unknown_fields: false };

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                info.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                info.deny_unknown_fields = true;
            }
            Ok(())
        })
        .map_err(|err| err.to_compile_error())?;
    }

    Ok(info)
}

fn derived_trait_names(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(seg) = meta.path.segments.last() {
                traits.insert(seg.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}
