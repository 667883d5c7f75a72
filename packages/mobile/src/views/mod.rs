use dioxus::prelude::*;

mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod dashboard;
pub use dashboard::Dashboard;

mod session_layout;
pub use session_layout::SessionLayout;

const INPUT_CLASS: &str = "w-full px-3 py-2.5 border border-neutral-300 rounded text-[0.9375rem]";
const PRIMARY_BUTTON_CLASS: &str =
    "w-full px-5 py-2.5 rounded bg-primary-500 text-white text-[0.9375rem] font-medium disabled:opacity-50";

/// Blocking error banner shown above a form.
#[component]
fn Alert(message: String) -> Element {
    rsx! {
        div {
            role: "alert",
            class: "px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]",
            "{message}"
        }
    }
}
