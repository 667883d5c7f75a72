use dioxus::prelude::*;
use ui::{use_auth_client, use_session, LogoutButton};

use super::PRIMARY_BUTTON_CLASS;

/// Signed-in home: the stored profile and a logout action.
#[component]
pub fn Dashboard() -> Element {
    let client = use_auth_client();
    let session = use_session();

    // Re-read the stored profile whenever the session changes
    let profile = use_resource(move || {
        let client = client.clone();
        let _ = session();
        async move { client.profile().await }
    });

    let body = match &*profile.read() {
        None => rsx! { p { class: "text-neutral-600", "Loading..." } },
        Some(Ok(Some(user))) => rsx! {
            p { class: "text-neutral-800 text-lg", "Welcome, {user.display_name()}!" }
            p { class: "text-neutral-600 text-sm", "{user.email}" }
        },
        Some(Ok(None)) => rsx! {},
        Some(Err(e)) => {
            tracing::error!("Failed to read stored profile: {e}");
            rsx! { p { class: "text-red-600 text-sm", "Could not load your profile" } }
        }
    };

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen gap-4 p-8 bg-white",
            h1 {
                class: "text-neutral-800 font-bold text-[1.75rem]",
                "Dashboard"
            }
            {body}
            LogoutButton {
                class: PRIMARY_BUTTON_CLASS.to_string(),
            }
        }
    }
}
