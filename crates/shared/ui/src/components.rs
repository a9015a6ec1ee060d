use dioxus::prelude::*;

const LABEL_CLASS: &str = "block mb-1.5 text-xs font-semibold text-slate-500";
const INPUT_CLASS: &str = "w-full h-11 rounded-xl border border-indigo-100 bg-indigo-50/60 px-4 text-sm text-slate-800 outline-none transition focus:border-indigo-300 focus:shadow-md";

/// A label stacked over an input. Purely presentational.
#[component]
pub fn LabeledInput(
    #[props(into, default)] label: String,
    #[props(into, default = String::from("text"))] input_type: String,
    #[props(into, default)] placeholder: String,
) -> Element {
    rsx! {
        div {
            label { class: LABEL_CLASS, "{label}" }
            input { r#type: "{input_type}", placeholder: "{placeholder}", class: INPUT_CLASS }
        }
    }
}
