use crate::storage::{Storage, PROJECTS_KEY, TOKEN_KEY, USER_KEY};
use crate::types::{LoginResponse, Session, UserInfo};

/// Single source of truth for "who is signed in". Owns the in-memory
/// session and keeps it in lockstep with durable storage; nothing else
/// writes the `token`/`user` keys.
pub struct SessionStore<S: Storage> {
    storage: S,
    session: Option<Session>,
}

impl<S: Storage> SessionStore<S> {
    /// Rehydrates from storage at startup. A session is all-or-nothing:
    /// a token without a parseable identity record (or the reverse) is
    /// dropped and the stale keys are cleared.
    pub fn load(storage: S) -> Self {
        let session = match (storage.get(TOKEN_KEY), storage.get(USER_KEY)) {
            (Some(token), Some(user_json)) => serde_json::from_str::<UserInfo>(&user_json)
                .ok()
                .map(|user| Session { user, token }),
            _ => None,
        };
        if session.is_none() {
            storage.remove(TOKEN_KEY);
            storage.remove(USER_KEY);
        }
        Self { storage, session }
    }

    /// Persists the credential and identity, then swaps the in-memory
    /// session, so no partially-authenticated state is observable.
    pub fn establish(&mut self, response: LoginResponse) -> Session {
        let session = Session {
            user: UserInfo {
                id: response.id,
                email: response.email,
                roles: response.roles,
            },
            token: response.token,
        };
        self.storage.set(TOKEN_KEY, &session.token);
        if let Ok(json) = serde_json::to_string(&session.user) {
            self.storage.set(USER_KEY, &json);
        }
        self.session = Some(session.clone());
        session
    }

    /// Clears the session and any locally cached domain data, so nothing
    /// leaks between accounts on a shared device.
    pub fn sign_out(&mut self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        self.storage.remove(PROJECTS_KEY);
        self.session = None;
    }

    /// Forced sign-out after an authorization rejection on a non-auth
    /// request. Sign-in and sign-up failures must never route here.
    pub fn expire(&mut self) {
        self.sign_out();
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AuthApi;
    use crate::error::ApiError;
    use crate::storage::MemoryStorage;
    use crate::types::{LoginRequest, RegisterRequest, RegisterResponse};
    use async_trait::async_trait;

    /// Stub auth endpoint: one known account, everything else rejected
    /// the way the real server rejects it.
    struct StubAuth;

    #[async_trait(?Send)]
    impl AuthApi for StubAuth {
        async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
            if request.email == "a@x.com" && request.password == "secret1" {
                Ok(LoginResponse {
                    token: "t1".into(),
                    id: 7,
                    email: "a@x.com".into(),
                    roles: vec!["user".into()],
                })
            } else {
                Err(ApiError::from_login_response(
                    401,
                    r#"{"message":"Invalid email or password"}"#,
                ))
            }
        }

        async fn register(&self, _request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
            Ok(RegisterResponse {
                message: "Account created successfully".into(),
            })
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn successful_sign_in_establishes_full_session() {
        let mut store = SessionStore::load(MemoryStorage::new());
        assert!(!store.is_authenticated());

        let response = StubAuth.login(&login_request("a@x.com", "secret1")).await.unwrap();
        let session = store.establish(response);

        assert_eq!(session.user.id, 7);
        assert_eq!(session.user.email, "a@x.com");
        assert_eq!(session.user.roles, vec!["user".to_string()]);
        assert_eq!(store.token().as_deref(), Some("t1"));
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn failed_sign_in_leaves_prior_session_untouched() {
        let storage = MemoryStorage::new();
        let mut store = SessionStore::load(storage.clone());
        let response = StubAuth.login(&login_request("a@x.com", "secret1")).await.unwrap();
        store.establish(response);

        let err = StubAuth
            .login(&login_request("a@x.com", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::InvalidCredentials("Invalid email or password".into())
        );

        // invalid credentials never clear what was already established
        assert!(store.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("t1"));
    }

    #[test]
    fn rejected_domain_request_expires_the_session() {
        let storage = MemoryStorage::new();
        storage.set(PROJECTS_KEY, "[]");
        let mut store = SessionStore::load(storage.clone());
        store.establish(LoginResponse {
            token: "t1".into(),
            id: 7,
            email: "a@x.com".into(),
            roles: vec![],
        });

        // GET /projects answered 401: the credential itself is dead
        let err = ApiError::from_response(401, r#"{"message":"Invalid or expired token"}"#, "f");
        if matches!(err, ApiError::Unauthorized(_)) {
            store.expire();
        }

        assert!(!store.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY), None);
        assert_eq!(storage.get(USER_KEY), None);
        assert_eq!(storage.get(PROJECTS_KEY), None);
    }

    #[test]
    fn login_401_is_not_an_expiry_signal() {
        let mut store = SessionStore::load(MemoryStorage::new());
        store.establish(LoginResponse {
            token: "t1".into(),
            id: 7,
            email: "a@x.com".into(),
            roles: vec![],
        });

        let err = ApiError::from_login_response(401, "");
        assert!(!matches!(err, ApiError::Unauthorized(_)));
        assert!(store.is_authenticated());
    }

    #[test]
    fn rehydration_is_all_or_nothing() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "t1");
        // identity record missing: the stray token must not authenticate
        let store = SessionStore::load(storage.clone());
        assert!(!store.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY), None);

        storage.set(TOKEN_KEY, "t1");
        storage.set(USER_KEY, "not json");
        let store = SessionStore::load(storage.clone());
        assert!(!store.is_authenticated());

        storage.set(TOKEN_KEY, "t1");
        storage.set(USER_KEY, r#"{"id":7,"email":"a@x.com","roles":["user"]}"#);
        let store = SessionStore::load(storage);
        assert!(store.is_authenticated());
        let session = store.current().unwrap();
        assert_eq!(session.user.id, 7);
    }

    #[test]
    fn sign_out_clears_cached_domain_data() {
        let storage = MemoryStorage::new();
        storage.set(PROJECTS_KEY, r#"[{"id":"00000000-0000-0000-0000-000000000000","title":"p","description":"","tasks":[]}]"#);
        let mut store = SessionStore::load(storage.clone());
        store.establish(LoginResponse {
            token: "t1".into(),
            id: 1,
            email: "a@x.com".into(),
            roles: vec![],
        });

        store.sign_out();
        assert_eq!(storage.get(PROJECTS_KEY), None);
        assert!(!store.is_authenticated());
    }
}
