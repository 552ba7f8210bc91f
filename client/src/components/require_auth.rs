//! Route guard for pages that need a signed-in user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps every route except `/login`. While the session restore is pending it
//! shows a loading indicator; once resolved it either renders the page or
//! redirects to `/login?next=<requested path>`.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::auth::AuthState;
use crate::util::auth::{GuardView, guard_view, install_unauth_redirect};

#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let location = use_location();
    let requested = Signal::derive(move || location.pathname.get());
    install_unauth_redirect(auth, requested, use_navigate());

    let view_state = Memo::new(move |_| guard_view(&auth.get()));

    view! {
        <Show
            when=move || view_state.get() == GuardView::Render
            fallback=move || {
                view! {
                    <div class="page-status">
                        <p>
                            {move || {
                                if view_state.get() == GuardView::Loading {
                                    "Loading..."
                                } else {
                                    "Redirecting to login..."
                                }
                            }}
                        </p>
                    </div>
                }
            }
        >
            {children()}
        </Show>
    }
}
