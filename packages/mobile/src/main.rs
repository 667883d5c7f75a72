use dioxus::prelude::*;
use views::{Dashboard, Login, Register, SessionLayout};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(SessionLayout)]
        #[route("/")]
        Root {},
        #[route("/login")]
        Login {},
        #[route("/register")]
        Register {},
        #[route("/dashboard")]
        Dashboard {},
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: ui::TAILWIND_CSS }
        ui::SessionProvider {
            LifecycleBridge {}
            Router::<Route> {}
        }
    }
}

/// Forwards platform resume/suspend events to the session gate.
#[component]
fn LifecycleBridge() -> Element {
    #[cfg(feature = "mobile")]
    {
        use dioxus::mobile::tao::event::Event;
        use ui::AppLifecycle;

        let report = ui::use_lifecycle();
        dioxus::mobile::use_wry_event_handler(move |event, _| match event {
            Event::Resumed => report(AppLifecycle::Foreground),
            Event::Suspended => report(AppLifecycle::Background),
            _ => {}
        });
    }
    rsx! {}
}

/// Placeholder for `/`; the session layout redirects before it renders.
#[component]
fn Root() -> Element {
    rsx! {}
}
