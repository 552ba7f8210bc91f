//! Login page: sign in, create an account, or request a password reset.
//!
//! SYSTEM CONTEXT
//! ==============
//! The only route outside the auth guard. Guarded routes send users here as
//! `/login?next=<path>`; a successful sign-in navigates back to `next` when it
//! is a same-origin path. A visitor who is already signed in sees an account
//! panel with a change-password form instead.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};
use recipes::auth::{check_password, normalize_email};

use crate::state::auth::AuthState;
use crate::state::session::AppSession;
use crate::util::auth::safe_next_path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    SignUp,
    Reset,
}

impl LoginMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Welcome back",
            Self::SignUp => "Create your account",
            Self::Reset => "Reset your password",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
            Self::Reset => "Send Reset Link",
        }
    }

    fn needs_password(self) -> bool {
        !matches!(self, Self::Reset)
    }
}

/// Check the form before any request. Returns the normalized email and the
/// password to send.
fn validate_login_input(mode: LoginMode, email: &str, password: &str) -> Result<(String, String), String> {
    let email = normalize_email(email).ok_or_else(|| "Enter a valid email address".to_owned())?;
    match mode {
        LoginMode::SignIn if password.is_empty() => return Err("Password is required".to_owned()),
        LoginMode::SignUp => check_password(password)?,
        _ => {}
    }
    Ok((email, password.to_owned()))
}

fn validate_new_password(password: &str, confirm: &str) -> Result<String, String> {
    check_password(password)?;
    if password != confirm {
        return Err("Passwords do not match".to_owned());
    }
    Ok(password.to_owned())
}

fn confirmation_message(email: &str) -> String {
    format!("Check {email} for a confirmation link, then sign in.")
}

fn reset_sent_message(email: &str) -> String {
    format!("If an account exists for {email}, a reset link is on its way.")
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();
    let query = use_query_map();
    let navigate = use_navigate();

    let mode = RwSignal::new(LoginMode::SignIn);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let local_error = RwSignal::new(String::new());

    let next_path = move || safe_next_path(query.with(|q| q.get("next")).as_deref());

    let switch_mode = Callback::new({
        let session = session.clone();
        move |next: LoginMode| {
            mode.set(next);
            info.set(String::new());
            local_error.set(String::new());
            session.clear_error();
        }
    });

    let on_submit = {
        let session = session.clone();
        let navigate = navigate.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if auth.get_untracked().loading() {
                return;
            }
            let current = mode.get_untracked();
            info.set(String::new());
            let (email_value, password_value) =
                match validate_login_input(current, &email.get_untracked(), &password.get_untracked()) {
                    Ok(values) => values,
                    Err(message) => {
                        local_error.set(message);
                        return;
                    }
                };
            local_error.set(String::new());

            let session = session.clone();
            let navigate = navigate.clone();
            let next = next_path();
            #[cfg(feature = "hydrate")]
            leptos::task::spawn_local(async move {
                match current {
                    LoginMode::SignIn => {
                        if session.sign_in(&email_value, &password_value).await.is_ok() {
                            navigate(&next, leptos_router::NavigateOptions::default());
                        }
                    }
                    LoginMode::SignUp => match session.sign_up(&email_value, &password_value).await {
                        Ok(recipes::SignUpOutcome::SignedIn(_)) => {
                            navigate(&next, leptos_router::NavigateOptions::default());
                        }
                        Ok(recipes::SignUpOutcome::ConfirmationRequired { email }) => {
                            mode.set(LoginMode::SignIn);
                            password.set(String::new());
                            info.set(confirmation_message(&email));
                        }
                        Err(e) => log::info!("sign up rejected: {e}"),
                    },
                    LoginMode::Reset => {
                        if session.reset_password(&email_value).await.is_ok() {
                            info.set(reset_sent_message(&email_value));
                        }
                    }
                }
            });
            #[cfg(not(feature = "hydrate"))]
            let _ = (session, navigate, next, email_value, password_value);
        }
    };

    let error_text = move || {
        let local = local_error.get();
        if local.is_empty() { auth.get().error.unwrap_or_default() } else { local }
    };
    let show_form = move || !auth.get().is_authenticated();

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Pick Up Plants"</h1>
                <Show when=show_form fallback=move || view! { <AccountPanel next=next_path()/> }>
                    <p class="login-card__subtitle">{move || mode.get().title()}</p>
                    <form class="login-form" on:submit=on_submit.clone()>
                        <input
                            class="login-input"
                            type="email"
                            placeholder="you@example.com"
                            autocomplete="email"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <Show when=move || mode.get().needs_password()>
                            <input
                                class="login-input"
                                type="password"
                                placeholder="Password"
                                prop:value=move || password.get()
                                on:input=move |ev| password.set(event_target_value(&ev))
                            />
                        </Show>
                        <button class="login-button" type="submit" disabled=move || auth.get().loading()>
                            {move || if auth.get().loading() { "Please wait..." } else { mode.get().submit_label() }}
                        </button>
                    </form>
                    <Show when=move || !error_text().is_empty()>
                        <p class="login-message login-message--error">{error_text}</p>
                    </Show>
                    <Show when=move || !info.get().is_empty()>
                        <p class="login-message">{move || info.get()}</p>
                    </Show>
                    <div class="login-divider"></div>
                    <div class="login-links">
                        <Show when=move || mode.get() != LoginMode::SignIn>
                            <button class="login-link" on:click=move |_| switch_mode.run(LoginMode::SignIn)>"Back to sign in"</button>
                        </Show>
                        <Show when=move || mode.get() == LoginMode::SignIn>
                            <button class="login-link" on:click=move |_| switch_mode.run(LoginMode::SignUp)>"Create an account"</button>
                            <button class="login-link" on:click=move |_| switch_mode.run(LoginMode::Reset)>"Forgot password?"</button>
                        </Show>
                    </div>
                </Show>
            </div>
        </div>
    }
}

/// Shown on `/login` to a visitor who is already signed in.
#[component]
fn AccountPanel(next: String) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let message = RwSignal::new(String::new());

    let email = move || auth.get().user.and_then(|u| u.email).unwrap_or_default();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().loading() {
            return;
        }
        let password = match validate_new_password(&new_password.get_untracked(), &confirm.get_untracked()) {
            Ok(password) => password,
            Err(e) => {
                message.set(e);
                return;
            }
        };
        message.set(String::new());
        let session = session.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match session.update_password(&password).await {
                Ok(()) => {
                    new_password.set(String::new());
                    confirm.set(String::new());
                    message.set("Password updated.".to_owned());
                }
                Err(e) => message.set(e),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (session, password);
    };

    view! {
        <p class="login-card__subtitle">"Signed in as " {email}</p>
        <a class="login-button" href=next>"Continue"</a>
        <div class="login-divider"></div>
        <form class="login-form" on:submit=on_submit>
            <input
                class="login-input"
                type="password"
                placeholder="New password"
                prop:value=move || new_password.get()
                on:input=move |ev| new_password.set(event_target_value(&ev))
            />
            <input
                class="login-input"
                type="password"
                placeholder="Confirm new password"
                prop:value=move || confirm.get()
                on:input=move |ev| confirm.set(event_target_value(&ev))
            />
            <button class="login-button" type="submit" disabled=move || auth.get().loading()>
                "Change Password"
            </button>
        </form>
        <Show when=move || !message.get().is_empty()>
            <p class="login-message">{move || message.get()}</p>
        </Show>
    }
}
