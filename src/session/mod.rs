//! Local session
//!
//! Tracks the signed-in user as a single record in persistent key-value
//! storage, mirroring the remote auth decision. The remote service is
//! the source of truth; after any successful authentication exactly one
//! current-user record exists locally.

pub mod auth;
pub mod storage;

pub use auth::{AuthAccount, AuthClient, HttpAuthClient};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{ADMIN_EMAILS, CURRENT_USER_KEY, USERS_COLLECTION};
use crate::error::Result;
use crate::store::DocumentStore;

/// The signed-in user as cached locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

/// Pages a guard can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Home,
    Admin,
}

/// Navigation side effect, implemented by the UI shell.
pub trait Navigate {
    fn go_to(&self, page: Page);
}

/// Whether an email belongs to the fixed staff allow-list.
fn is_admin_email(email: &str) -> bool {
    let email = email.to_lowercase();
    ADMIN_EMAILS.iter().any(|admin| *admin == email)
}

/// Session context: storage for the local record, the auth service, and
/// the document store holding user profiles.
pub struct Session {
    storage: Arc<dyn KeyValueStorage>,
    auth: Arc<dyn AuthClient>,
    store: Arc<dyn DocumentStore>,
}

impl Session {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        auth: Arc<dyn AuthClient>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            storage,
            auth,
            store,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// The locally cached user, or `None` when signed out. A corrupt or
    /// unreadable record reads as signed out rather than failing.
    pub fn current_user(&self) -> Option<User> {
        let raw = match self.storage.get(CURRENT_USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not read session storage: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Discarding unreadable current-user record: {}", e);
                None
            }
        }
    }

    /// Sign in against the remote service and mirror the result into the
    /// local current-user record.
    ///
    /// Admin standing comes from the stored profile flag or membership
    /// in the fixed admin email allow-list.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let account = self.auth.sign_in(email, password).await?;

        // Profile document may be missing for older accounts; fall back
        // to the email itself as the display name.
        let profile = self.store.get(USERS_COLLECTION, &account.uid).await?;

        let (name, stored_admin) = match &profile {
            Some(doc) => (doc.str_or("name", email), doc.bool_or_default("isAdmin")),
            None => (email.to_string(), false),
        };

        let user = User {
            id: account.uid,
            name,
            email: email.to_string(),
            is_admin: stored_admin || is_admin_email(email),
        };

        self.persist(&user)?;
        tracing::info!("User logged in: {} (admin: {})", user.email, user.is_admin);
        Ok(user)
    }

    /// Create a remote account, write its profile document, and sign the
    /// new user in locally.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        contact: &str,
    ) -> Result<User> {
        let account = self.auth.sign_up(email, password).await?;
        let is_admin = is_admin_email(email);

        let profile = json!({
            "name": name,
            "email": email,
            "contact": contact,
            "isAdmin": is_admin,
        });
        let serde_json::Value::Object(fields) = profile else {
            unreachable!()
        };
        self.store.put(USERS_COLLECTION, &account.uid, fields).await?;

        let user = User {
            id: account.uid,
            name: name.to_string(),
            email: email.to_string(),
            is_admin,
        };

        self.persist(&user)?;
        tracing::info!("Account created: {} (admin: {})", user.email, user.is_admin);
        Ok(user)
    }

    /// Clear the local record. The caller decides where to navigate.
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(CURRENT_USER_KEY)?;
        tracing::info!("User logged out");
        Ok(())
    }

    /// Guard: redirect to the login page and return false when no user
    /// is signed in.
    pub fn require_auth(&self, nav: &dyn Navigate) -> bool {
        if self.is_logged_in() {
            true
        } else {
            nav.go_to(Page::Login);
            false
        }
    }

    /// Guard: redirect to the home page and return false unless the
    /// signed-in user is staff.
    pub fn require_admin(&self, nav: &dyn Navigate) -> bool {
        match self.current_user() {
            Some(user) if user.is_admin => true,
            _ => {
                nav.go_to(Page::Home);
                false
            }
        }
    }

    fn persist(&self, user: &User) -> Result<()> {
        self.storage
            .set(CURRENT_USER_KEY, &serde_json::to_string(user)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Auth fake: accepts one fixed credential pair.
    struct FakeAuth {
        email: String,
        password: String,
        uid: String,
    }

    #[async_trait]
    impl AuthClient for FakeAuth {
        async fn sign_in(&self, email: &str, password: &str) -> Result<AuthAccount> {
            if email == self.email && password == self.password {
                Ok(AuthAccount {
                    uid: self.uid.clone(),
                })
            } else {
                Err(AppError::InvalidCredentials(
                    "Invalid email or password".into(),
                ))
            }
        }

        async fn sign_up(&self, _email: &str, _password: &str) -> Result<AuthAccount> {
            Ok(AuthAccount {
                uid: self.uid.clone(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNav {
        visited: Mutex<Vec<Page>>,
    }

    impl Navigate for RecordingNav {
        fn go_to(&self, page: Page) {
            self.visited.lock().unwrap().push(page);
        }
    }

    fn session_with(email: &str, password: &str) -> (Session, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(FakeAuth {
                email: email.to_string(),
                password: password.to_string(),
                uid: "uid-1".to_string(),
            }),
            store.clone(),
        );
        (session, store)
    }

    #[tokio::test]
    async fn test_login_mirrors_single_local_record() {
        let (session, store) = session_with("pat@x.com", "secret");

        let mut profile = crate::store::Fields::new();
        profile.insert("name".into(), "Pat".into());
        profile.insert("isAdmin".into(), false.into());
        store.put("users", "uid-1", profile).await.unwrap();

        assert!(!session.is_logged_in());

        let user = session.login("pat@x.com", "secret").await.unwrap();
        assert_eq!(user.name, "Pat");
        assert!(!user.is_admin);

        let cached = session.current_user().unwrap();
        assert_eq!(cached.id, "uid-1");
        assert_eq!(cached.email, "pat@x.com");
    }

    #[tokio::test]
    async fn test_login_missing_profile_defaults_name_to_email() {
        let (session, _) = session_with("pat@x.com", "secret");

        let user = session.login("pat@x.com", "secret").await.unwrap();
        assert_eq!(user.name, "pat@x.com");
    }

    #[tokio::test]
    async fn test_login_bad_credentials_is_a_rejection() {
        let (session, _) = session_with("pat@x.com", "secret");

        let err = session.login("pat@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials(_)));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_allow_list_grants_admin() {
        let (session, _) = session_with("Admin@Rescue.com", "secret");

        let user = session.login("Admin@Rescue.com", "secret").await.unwrap();
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn test_stored_flag_grants_admin() {
        let (session, store) = session_with("staff@x.com", "secret");

        let mut profile = crate::store::Fields::new();
        profile.insert("name".into(), "Staff".into());
        profile.insert("isAdmin".into(), true.into());
        store.put("users", "uid-1", profile).await.unwrap();

        let user = session.login("staff@x.com", "secret").await.unwrap();
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn test_signup_writes_profile_and_logs_in() {
        let (session, store) = session_with("new@x.com", "secret");

        let user = session
            .signup("New Person", "new@x.com", "secret", "555")
            .await
            .unwrap();
        assert!(!user.is_admin);
        assert!(session.is_logged_in());

        let profile = store.get("users", "uid-1").await.unwrap().unwrap();
        assert_eq!(profile.str_or_default("name"), "New Person");
        assert_eq!(profile.str_or_default("contact"), "555");
    }

    #[tokio::test]
    async fn test_guards_redirect_and_return_false() {
        let (session, _) = session_with("pat@x.com", "secret");
        let nav = RecordingNav::default();

        assert!(!session.require_auth(&nav));
        assert!(!session.require_admin(&nav));
        assert_eq!(
            *nav.visited.lock().unwrap(),
            vec![Page::Login, Page::Home]
        );

        session.login("pat@x.com", "secret").await.unwrap();

        let nav = RecordingNav::default();
        assert!(session.require_auth(&nav));
        assert!(!session.require_admin(&nav));
        assert_eq!(*nav.visited.lock().unwrap(), vec![Page::Home]);
    }

    #[tokio::test]
    async fn test_logout_clears_record() {
        let (session, _) = session_with("pat@x.com", "secret");

        session.login("pat@x.com", "secret").await.unwrap();
        assert!(session.is_logged_in());

        session.logout().unwrap();
        assert!(!session.is_logged_in());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_corrupt_record_reads_as_signed_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(CURRENT_USER_KEY, "not json").unwrap();

        let session = Session::new(
            storage,
            Arc::new(FakeAuth {
                email: String::new(),
                password: String::new(),
                uid: String::new(),
            }),
            Arc::new(MemoryStore::new()),
        );

        assert!(session.current_user().is_none());
        assert!(!session.is_logged_in());
    }
}
