//! Session context and hooks for the UI.

use std::sync::Arc;

use dioxus::prelude::*;
use store::{ClientConfig, SessionStorage};

use crate::client::{AuthClient, IdentityProvider};
use crate::session::{AppLifecycle, SessionGate, SessionState};

/// Shared handles injected at the navigation root.
#[derive(Clone)]
pub struct SessionServices {
    pub gate: Arc<SessionGate>,
    pub client: Arc<AuthClient>,
    /// Platform federated sign-in, when the shell provides one.
    pub identity: Option<Arc<dyn IdentityProvider>>,
}

impl SessionServices {
    pub fn new(config: &ClientConfig, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            gate: Arc::new(SessionGate::new(storage.clone(), config.poll_interval())),
            client: Arc::new(AuthClient::new(config.server_url.clone(), storage)),
            identity: None,
        }
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(provider);
        self
    }

    /// Whether the sign-in screen should offer Google Sign-In.
    pub fn google_sign_in_available(&self) -> bool {
        self.identity.is_some()
    }

    /// Services backed by the platform data directory and its `client.toml`.
    pub fn for_platform() -> Self {
        let config = crate::load_client_config();
        Self::new(&config, crate::make_session_store())
    }
}

/// Current session state. Updates whenever the gate publishes a new state.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

pub fn use_auth_client() -> Arc<AuthClient> {
    use_context::<SessionServices>().client
}

pub fn use_identity_provider() -> Option<Arc<dyn IdentityProvider>> {
    use_context::<SessionServices>().identity
}

/// Forward a platform visibility change to the gate.
pub fn use_lifecycle() -> impl Fn(AppLifecycle) + Clone {
    let gate = use_context::<SessionServices>().gate;
    move |event| gate.on_lifecycle(event)
}

/// Provider component that runs the session gate.
/// Wrap your router with this component. Uses [`SessionServices`] from an ancestor
/// context when one is provided, otherwise [`SessionServices::for_platform`].
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let services = use_hook(|| {
        try_consume_context::<SessionServices>().unwrap_or_else(SessionServices::for_platform)
    });
    let mut state = use_signal(|| SessionState::Pending);

    // Bootstrap, then mirror every published state into the signal while the gate runs
    use_hook({
        let gate = services.gate.clone();
        move || {
            spawn(async move {
                let mut rx = gate.subscribe();
                gate.bootstrap().await;
                state.set(rx.borrow_and_update().clone());

                let forward = async move {
                    while rx.changed().await.is_ok() {
                        let next = rx.borrow_and_update().clone();
                        if *state.peek() != next {
                            state.set(next);
                        }
                    }
                };
                tokio::join!(gate.run(), forward);
            });
        }
    });

    use_context_provider(|| services);
    use_context_provider(|| state);

    rsx! {
        {children}
    }
}

/// Button that clears the persisted session. The gate routes back to sign-in.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let client = use_auth_client();
    let mut error = use_signal(|| None::<String>);

    let onclick = move |_| {
        let client = client.clone();
        async move {
            if let Err(e) = client.logout().await {
                tracing::error!("Logout error: {e}");
                error.set(Some(e.alert_message("Something went wrong")));
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
        if let Some(message) = error() {
            p { class: "text-sm text-red-600", "{message}" }
        }
    }
}
