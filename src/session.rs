use crate::backend::RecipeBackend;
use crate::forms::SignupForm;
use crate::model::User;
use crate::notice::Notice;
use log::{debug, info, warn};

/// Result of an action that needs a signed-in viewer
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome<T> {
    /// The viewer is signed in and the action ran
    Performed(T),
    /// Nothing happened; the login prompt was requested instead
    LoginRequired,
}

impl<T> GateOutcome<T> {
    pub fn is_performed(&self) -> bool {
        matches!(self, GateOutcome::Performed(_))
    }
}

/// Tracks whether the viewer is signed in and keeps write actions behind a login prompt
#[derive(Debug, Default)]
pub struct SessionGate {
    user: Option<User>,
    login_prompt: bool,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the session service who is signed in. Any failure means "not signed in".
    pub async fn check(&mut self, backend: &dyn RecipeBackend) {
        match backend.current_session().await {
            Ok(user) => {
                debug!("Active session for {}", user.email);
                self.user = Some(user);
            }
            Err(e) => {
                debug!("No active session: {}", e);
                self.user = None;
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Whether write affordances (rate, save, create) should be offered
    pub fn can_write(&self) -> bool {
        self.is_authenticated()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn login_prompt_requested(&self) -> bool {
        self.login_prompt
    }

    pub fn request_login(&mut self) {
        self.login_prompt = true;
    }

    pub fn dismiss_login_prompt(&mut self) {
        self.login_prompt = false;
    }

    /// Run `action` only for a signed-in viewer; otherwise request the login prompt
    pub fn guard<T, F>(&mut self, action: F) -> GateOutcome<T>
    where
        F: FnOnce(&User) -> T,
    {
        match &self.user {
            Some(user) => GateOutcome::Performed(action(user)),
            None => {
                debug!("Action needs a signed-in viewer, requesting login");
                self.login_prompt = true;
                GateOutcome::LoginRequired
            }
        }
    }

    pub async fn login(
        &mut self,
        backend: &dyn RecipeBackend,
        email: &str,
        password: &str,
    ) -> Notice {
        match backend.login(email, password).await {
            Ok(user) => {
                info!("Signed in as {}", user.email);
                let notice = Notice::info("Login successful", "Welcome back to SavoryStories!");
                self.user = Some(user);
                self.login_prompt = false;
                notice
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                Notice::error("Login failed", e.to_string())
            }
        }
    }

    pub async fn logout(&mut self, backend: &dyn RecipeBackend) -> Notice {
        match backend.logout().await {
            Ok(()) => {
                info!("Signed out");
                self.user = None;
                self.login_prompt = false;
                Notice::info("Logged out", "You have been successfully logged out.")
            }
            Err(e) => {
                warn!("Logout failed: {}", e);
                Notice::error("Logout failed", "There was a problem logging out.")
            }
        }
    }

    /// Create an account, then ask the viewer to sign in with it
    pub async fn signup(&mut self, backend: &dyn RecipeBackend, form: &SignupForm) -> Notice {
        if !form.passwords_match() {
            return Notice::error(
                "Passwords don't match",
                "Please make sure your passwords match.",
            );
        }
        let account = match form.validate() {
            Ok(account) => account,
            Err(e) => return Notice::error("Signup failed", e.to_string()),
        };

        match backend.signup(&account).await {
            Ok(user) => {
                info!("Created account {}", user.email);
                self.login_prompt = true;
                Notice::info(
                    "Account created!",
                    "Welcome to SavoryStories. Please sign in to continue.",
                )
            }
            Err(e) => {
                warn!("Signup failed: {}", e);
                Notice::error("Signup failed", e.to_string())
            }
        }
    }
}
