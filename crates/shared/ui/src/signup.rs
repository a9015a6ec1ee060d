use crate::components::LabeledInput;
use crate::page::PageShell;
use dioxus::prelude::*;

pub const SIGNUP_TITLE: &str = "AutoIMS | Sign up";

const BUTTON_CLASS: &str = "w-full mt-2 rounded-xl bg-indigo-700 py-3 text-sm font-semibold cursor-pointer tracking-wide text-white shadow-lg transition hover:-translate-y-0.5";

/// The signup card: logo, tagline, four fields and an unwired button.
///
/// The button is `type="button"` and has no handler, so the form never
/// submits; registration goes through `POST /api/signup`.
#[component]
pub fn Signup() -> Element {
    rsx! {
        div { class: "min-h-[90vh] w-full bg-stone-200 flex items-center justify-center p-6 caret-transparent",
            div { class: "w-full max-w-md bg-stone-300 rounded-2xl shadow-xl p-8 md:p-10",
                div { class: "flex items-center mb-6",
                    img { src: "/autoims.png", alt: "AutoIMS Logo", class: "w-16 h-16" }
                    span { class: "text-2xl font-bold text-gray-900", "AutoIMS" }
                }
                p { class: "mt-1 text-sm text-gray-700 font-semibold", "Manage your Services." }
                form { class: "mt-6 space-y-4",
                    div { class: "grid grid-cols-1 sm:grid-cols-2 gap-4",
                        LabeledInput { label: "Full name", placeholder: "John Cena" }
                        LabeledInput { label: "Username", placeholder: "John" }
                    }
                    LabeledInput { label: "Email Address", input_type: "email", placeholder: "john@example.com" }
                    LabeledInput { label: "Password", input_type: "password", placeholder: "••••••••" }
                    button { r#type: "button", class: BUTTON_CLASS, "CREATE AN ACCOUNT" }
                }
                p { class: "mt-6 text-xs text-slate-500 text-center",
                    "Already have an account? "
                    a { href: "/login", class: "text-blue-600 font-semibold cursor-pointer hover:underline", "Login" }
                }
            }
        }
    }
}

/// Markup of [`Signup`] alone.
#[must_use]
pub fn render_signup() -> String {
    dioxus::ssr::render_element(rsx! { Signup {} })
}

/// [`render_signup`] wrapped in a complete HTML document.
#[must_use]
pub fn render_signup_page() -> String {
    PageShell::new(SIGNUP_TITLE)
        .with_head(r#"<link rel="icon" type="image/png" href="/autoims.png">"#)
        .render(&render_signup())
}
