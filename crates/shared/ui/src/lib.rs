//! Views rendered to HTML on the server with Dioxus SSR.
//!
//! Components stay plain Dioxus so they can move to a client renderer later;
//! for now every page is a single synchronous render into a string.
mod components;
mod page;
mod signup;

pub use components::{LabeledInput, LabeledInputProps};
pub use page::PageShell;
pub use signup::{SIGNUP_TITLE, Signup, render_signup, render_signup_page};
