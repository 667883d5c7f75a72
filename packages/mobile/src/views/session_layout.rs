use dioxus::prelude::*;
use ui::{use_session, SessionState};

use crate::Route;

/// Shows the Login/Register stack or the Dashboard depending on the session state.
/// Renders nothing until persisted storage has been read.
#[component]
pub fn SessionLayout() -> Element {
    let session = use_session();
    let route = use_route::<Route>();
    let nav = use_navigator();

    let state = session();
    if state.is_pending() {
        return rsx! {};
    }

    let redirect = match (&state, &route) {
        (SessionState::Authenticated { .. }, Route::Dashboard {}) => None,
        (SessionState::Authenticated { .. }, _) => Some(Route::Dashboard {}),
        (_, Route::Login {} | Route::Register {}) => None,
        _ => Some(Route::Login {}),
    };
    if let Some(target) = redirect {
        tracing::debug!(?target, "redirecting for session state");
        nav.replace(target);
        return rsx! {};
    }

    rsx! {
        Outlet::<Route> {}
    }
}
