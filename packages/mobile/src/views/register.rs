use dioxus::prelude::*;
use ui::use_auth_client;

use super::{Alert, INPUT_CLASS, PRIMARY_BUTTON_CLASS};
use crate::Route;

/// Registration screen. A successful registration signs the user in.
#[component]
pub fn Register() -> Element {
    let client = use_auth_client();
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let client = client.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            let result = client
                .register(username().trim(), email().trim(), &password())
                .await;
            if let Err(e) = result {
                tracing::error!("Registration error: {e}");
                error.set(Some(e.alert_message("Registration failed")));
            }
            loading.set(false);
        });
    };

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8 bg-white",

            h1 {
                class: "mb-8 text-neutral-800 font-bold text-[1.75rem]",
                "Register"
            }

            form {
                onsubmit: handle_register,
                class: "flex flex-col gap-3 w-full max-w-[320px]",

                if let Some(err) = error() {
                    Alert { message: err }
                }

                input {
                    class: INPUT_CLASS,
                    placeholder: "Username",
                    value: username(),
                    oninput: move |evt: FormEvent| username.set(evt.value()),
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
                    if loading() { "Creating account..." } else { "Register" }
                }
            }

            p {
                class: "mt-6 text-sm text-neutral-600",
                "Already have an account? "
                Link {
                    class: "text-primary-500 no-underline",
                    to: Route::Login {},
                    "Login"
                }
            }
        }
    }
}
