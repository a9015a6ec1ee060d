use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, ItemFn, ReturnType, Type};

/// Expands `#[autoims_runtime::main(profile)]`.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            &input.sig.ident,
            "#[autoims_runtime::main] can only be used on async functions",
        )
        .to_compile_error();
    }
    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "#[autoims_runtime::main] requires a Result return type",
        )
        .to_compile_error();
    }

    let profile = match parse_profile(args) {
        Ok(profile) => profile,
        Err(err) => return err,
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = ::autoims_runtime::RuntimeConfig::for_profile(#profile);
            let rt = ::autoims_runtime::build_runtime_with_config(&config)?;
            rt.block_on(async #block)
        }
    }
}

fn parse_profile(args: TokenStream) -> Result<TokenStream, TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::autoims_runtime::RuntimeProfile::Default });
    }

    let ident: syn::Ident = syn::parse2(args).map_err(|err| err.to_compile_error())?;
    let variant = match ident.to_string().as_str() {
        "high_performance" => quote! { HighPerformance },
        "memory_efficient" => quote! { MemoryEfficient },
        "default" => quote! { Default },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "Unknown runtime profile. Use: high_performance, memory_efficient, or default",
            )
            .to_compile_error());
        },
    };
    Ok(quote! { ::autoims_runtime::RuntimeProfile::#variant })
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(args: TokenStream, item: TokenStream) -> String {
        let input: ItemFn = syn::parse2(item).expect("fn");
        expand_main(args, input).to_string()
    }

    #[test]
    fn profile_ident_selects_runtime_profile() {
        let out = expand(
            quote!(high_performance),
            quote! { async fn main() -> anyhow::Result<()> { Ok(()) } },
        );
        assert!(out.contains("RuntimeProfile :: HighPerformance"));
        assert!(out.contains("block_on"));
    }

    #[test]
    fn sync_main_is_rejected() {
        let out = expand(TokenStream::new(), quote! { fn main() -> anyhow::Result<()> { Ok(()) } });
        assert!(out.contains("only be used on async functions"));
    }

    #[test]
    fn unit_return_is_rejected() {
        let out = expand(TokenStream::new(), quote! { async fn main() {} });
        assert!(out.contains("requires a Result"));
    }
}
