#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Attribute macros shared by the AutoIMS crates: error enums, API models and
//! handlers, feature slice handles, and the runtime entry point.
//!
//! Examples are `ignore`d here because they need the consuming crates in scope.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Turns an `async fn main` into a sync `main` running on a profiled Tokio runtime.
///
/// Profiles: `high_performance`, `memory_efficient`, `default` (when omitted).
///
/// ```rust,ignore
/// #[autoims_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares a request or response body of the REST API.
///
/// Adds `Debug` plus the serde derives the model needs, `utoipa::ToSchema`
/// behind the `server` feature, and `rename_all = "snake_case"`.
///
/// # Arguments
///
/// * `request` / `response` - derive only `Deserialize` / only `Serialize`.
/// * `rename_all = "..."` - overrides the serde rename policy.
/// * `deny_unknown_fields = true` - rejects unexpected keys (request bodies only).
///
/// ```rust,ignore
/// #[api_model(request)]
/// pub struct CreateCustomer {
///     pub name: Option<String>,
///     pub phone: Option<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Registers an axum handler with `utoipa::path` when the `server` feature is on.
///
/// ```rust,ignore
/// #[api_handler(get, path = "/api/customers", responses((status = OK)), tag = CUSTOMERS_TAG)]
/// pub async fn list(State(db): State<Database>) -> Result<Json<CustomerList>, ApiError> {
///     todo!()
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Defines an error enum with context support.
///
/// * Derives `Debug` and `thiserror::Error`.
/// * Generates `<Name>Ext` with `.context(..)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant carrying a `source`.
/// * Generates `From<Source>` for those variants, and `From<&'static str>` /
///   `From<String>` when an `Internal { message, context }` variant exists.
///
/// Variants are unit or named-field; a variant with a `source` must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// With `#[autoims_error(api)]`, variants may be tagged with
/// `#[status(bad_request | unauthorized | not_found | conflict | internal)]`
/// and the enum converts into `autoims_kernel::server::ApiError`. Untagged
/// variants map to `internal`.
///
/// ```rust,ignore
/// #[autoims_error(api)]
/// pub enum CustomerError {
///     #[error("Customer not found")]
///     #[status(not_found)]
///     NotFound,
///
///     #[error("Database error{}: {source}", format_context(.context))]
///     Database { source: DatabaseError, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn autoims_error(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(args.into(), input).into()
}

/// Turns a struct into a feature slice handle.
///
/// Generates `<Name>Inner` with the fields, an `Arc` wrapper named `<Name>`
/// that derefs to it, and the kernel `FeatureSlice` impl. The slice name
/// defaults to the lowercased struct name; override with `name = "..."`.
///
/// ```rust,ignore
/// #[autoims_slice(name = "customers")]
/// pub struct Customers {
///     pub search_limit: usize,
/// }
///
/// let slice = Customers::new(CustomersInner { search_limit: 100 });
/// ```
#[proc_macro_attribute]
pub fn autoims_slice(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(args.into(), input).into()
}
