//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `shell` is rendered by the server for SSR; `App` is both server-rendered
//! and hydrated. `App` owns the one `SessionManager` and starts the session
//! watch on the client.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::require_auth::RequireAuth;
use crate::pages::{
    add_recipe::AddRecipePage, home::HomePage, login::LoginPage, recipe_detail::RecipeDetailPage,
    recipe_list::RecipeListPage,
};
use crate::state::auth::AuthState;
use crate::state::session::{AppSession, HttpAuthBackend};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides auth state and the session manager, then sets up routing. Every
/// route except `/login` sits behind `RequireAuth`.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let session: AppSession = AppSession::new(HttpAuthBackend, auth);
    provide_context(auth);
    provide_context(session.clone());

    #[cfg(feature = "hydrate")]
    crate::state::session::start_session_watch(session);
    #[cfg(not(feature = "hydrate"))]
    let _ = session;

    view! {
        <Stylesheet id="leptos" href="/pkg/recipe-site.css"/>
        <Title text="Pick Up Plants"/>

        <Router>
            <Routes fallback=|| view! { <p class="page-status">"Page not found."</p> }>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route
                    path=StaticSegment("")
                    view=|| view! { <RequireAuth><HomePage/></RequireAuth> }
                />
                <Route
                    path=StaticSegment("recipes")
                    view=|| view! { <RequireAuth><RecipeListPage/></RequireAuth> }
                />
                <Route
                    path=(StaticSegment("recipe"), StaticSegment("new"))
                    view=|| view! { <RequireAuth><AddRecipePage/></RequireAuth> }
                />
                <Route
                    path=(StaticSegment("recipe"), ParamSegment("id"))
                    view=|| view! { <RequireAuth><RecipeDetailPage/></RequireAuth> }
                />
            </Routes>
        </Router>
    }
}
