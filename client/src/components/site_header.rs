//! Top navigation bar with the signed-in identity and sign-out.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered above every guarded page. Content links (nutrition, lifestyle,
//! about) point at home-page anchors only.

use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::state::auth::AuthState;
use crate::state::session::AppSession;

#[component]
pub fn SiteHeader() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();
    let pathname = use_location().pathname;

    let email = move || auth.get().user.and_then(|user| user.email).unwrap_or_default();
    let is_active = move |prefix: &'static str| {
        let path = pathname.get();
        if prefix == "/" { path == "/" } else { path.starts_with(prefix) }
    };

    let on_sign_out = move |_| {
        let session = session.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match session.sign_out().await {
                Ok(()) => {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href(crate::util::auth::LOGIN_PATH);
                    }
                }
                Err(e) => log::warn!("sign out failed: {e}"),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = session;
    };

    view! {
        <header class="site-header">
            <a href="/" class="site-header__brand">"Pick Up Plants"</a>
            <nav class="site-header__nav">
                <a href="/" class:site-header__link--active=move || is_active("/")>"Home"</a>
                <a href="/recipes" class:site-header__link--active=move || is_active("/recipes")>
                    "Recipes"
                </a>
                <a href="/recipe/new" class:site-header__link--active=move || is_active("/recipe/new")>
                    "Add Recipe"
                </a>
                <a href="/#nutrition">"Nutrition"</a>
                <a href="/#lifestyle">"Lifestyle"</a>
                <a href="/#about">"About"</a>
            </nav>
            <span class="site-header__spacer"></span>
            <span class="site-header__user">{email}</span>
            <button
                class="btn site-header__sign-out"
                on:click=on_sign_out
                disabled=move || auth.get().loading()
            >
                "Sign out"
            </button>
            <Show when=move || auth.get().error.is_some()>
                <span class="site-header__error">{move || auth.get().error.unwrap_or_default()}</span>
            </Show>
        </header>
    }
}
