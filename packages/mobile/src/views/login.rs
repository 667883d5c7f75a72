//! Login screen with email/password and Google sign-in.

use dioxus::prelude::*;
use ui::{use_auth_client, use_identity_provider};

use super::{Alert, INPUT_CLASS, PRIMARY_BUTTON_CLASS};
use crate::Route;

#[component]
pub fn Login() -> Element {
    let client = use_auth_client();
    let identity = use_identity_provider();
    // Without a platform sign-in SDK the Google button is not offered
    let google_available = use_context::<ui::SessionServices>().google_sign_in_available();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Success only writes storage; the session layout moves to the dashboard
    let handle_login = {
        let client = client.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let client = client.clone();
            spawn(async move {
                error.set(None);
                loading.set(true);
                if let Err(e) = client.login(email().trim(), &password()).await {
                    tracing::error!("Login error: {e}");
                    error.set(Some(e.alert_message("Invalid credentials")));
                }
                loading.set(false);
            });
        }
    };

    let handle_google = move |_| {
        let client = client.clone();
        let identity = identity.clone();
        spawn(async move {
            error.set(None);
            let Some(provider) = identity else {
                return;
            };
            loading.set(true);
            if let Err(e) = client.sign_in_with(provider.as_ref()).await {
                tracing::error!("Google sign-in error: {e}");
                error.set(Some(e.alert_message("Google Sign-In failed")));
            }
            loading.set(false);
        });
    };

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8 bg-white",

            h1 {
                class: "mb-8 text-neutral-800 font-bold text-[1.75rem]",
                "Login"
            }

            form {
                onsubmit: handle_login,
                class: "flex flex-col gap-3 w-full max-w-[320px]",

                if let Some(err) = error() {
                    Alert { message: err }
                }

                input {
                    class: INPUT_CLASS,
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                input {
                    class: INPUT_CLASS,
                    r#type: "password",
                    placeholder: "Password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }

                button {
                    class: PRIMARY_BUTTON_CLASS,
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Login" }
                }
            }

            if google_available {
                div {
                    class: "flex items-center gap-4 w-full max-w-[320px] my-6",
                    div { class: "flex-1 h-px bg-neutral-300" }
                    span { class: "text-neutral-600 text-[0.8125rem]", "or" }
                    div { class: "flex-1 h-px bg-neutral-300" }
                }

                button {
                    class: "w-full max-w-[320px] px-5 py-2.5 rounded text-[0.9375rem] font-medium bg-[#4285f4] text-white disabled:opacity-50",
                    disabled: loading(),
                    onclick: handle_google,
                    "Sign in with Google"
                }
            }

            p {
                class: "mt-6 text-sm text-neutral-600",
                "Don't have an account? "
                Link {
                    class: "text-primary-500 no-underline",
                    to: Route::Register {},
                    "Register"
                }
            }
        }
    }
}
