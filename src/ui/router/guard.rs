//! Navigation guard
//!
//! Every navigation is checked against the target route's metadata and the
//! current session. The decision itself is a pure function; [`RouteGuard`]
//! wires it to a live [`SessionStore`] and the document title.

use std::sync::Arc;

use super::routes::{HOME_PATH, LOGIN_PATH, RouteMeta, RouteTable};
use crate::ui::auth::{SessionSnapshot, SessionStore};
use crate::ui::http::HttpTransport;
use crate::ui::navigation::DocumentTitle;

/// Query parameter carrying the originally requested path
pub const REDIRECT_PARAM: &str = "redirect";

/// Session facts the guard needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub admin: bool,
}

impl From<&SessionSnapshot> for AuthStatus {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            authenticated: snapshot.is_authenticated(),
            admin: snapshot.is_admin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Redirect(String),
}

/// Decide what happens when navigating to `route` at `full_path`.
///
/// Rules apply in order: unauthenticated access to a protected view goes to
/// login, non-admin access to an admin view goes to not-found, and an
/// authenticated visit to login goes home.
pub fn evaluate(
    route: &RouteMeta,
    full_path: &str,
    status: AuthStatus,
    table: &RouteTable,
) -> NavigationDecision {
    if route.requires_auth && !status.authenticated {
        return NavigationDecision::Redirect(login_redirect(full_path));
    }

    if route.requires_admin && !status.admin {
        // Do not reveal that the view exists
        return NavigationDecision::Redirect(table.not_found().path.to_string());
    }

    if route.path == LOGIN_PATH && status.authenticated {
        return NavigationDecision::Redirect(HOME_PATH.to_string());
    }

    NavigationDecision::Proceed
}

/// Login path that returns to `full_path` afterwards
pub fn login_redirect(full_path: &str) -> String {
    format!(
        "{}?{}={}",
        LOGIN_PATH,
        REDIRECT_PARAM,
        urlencoding::encode(full_path)
    )
}

/// Post-login target carried in `full_path`'s query, if it is safe to follow
pub fn redirect_target(full_path: &str) -> Option<String> {
    let query = full_path.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);

    let raw = query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == REDIRECT_PARAM).then_some(value)
    })?;

    let decoded = urlencoding::decode(raw).ok()?;
    safe_redirect(&decoded).map(str::to_string)
}

/// `target` if it is a same-origin path
pub fn safe_redirect(target: &str) -> Option<&str> {
    let is_local = target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\");
    is_local.then_some(target)
}

/// Guard bound to a live session
pub struct RouteGuard<T> {
    session: SessionStore<T>,
    table: RouteTable,
    title: Arc<dyn DocumentTitle>,
}

impl<T> RouteGuard<T> {
    pub fn new(session: SessionStore<T>, table: RouteTable, title: Arc<dyn DocumentTitle>) -> Self {
        Self {
            session,
            table,
            title,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }
}

impl<T: HttpTransport> RouteGuard<T> {
    /// Run before each navigation; sets the document title when allowed
    pub fn before_each(&self, full_path: &str) -> NavigationDecision {
        let route = self.table.resolve(full_path);
        let status = AuthStatus::from(&self.session.snapshot());

        let decision = evaluate(route, full_path, status, &self.table);
        if decision == NavigationDecision::Proceed {
            self.title.set_title(&route.document_title());
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Credentials;
    use crate::ui::auth_utils::MemoryTokenStore;
    use crate::ui::config::ClientConfig;
    use crate::ui::http::testing::{MockTransport, Recorder, TEST_BASE_URL};
    use crate::ui::http::{ApiError, ApiResponse, RequestOptions};
    use crate::ui::router::routes::{ADMIN, HOME, LOGIN, NOT_FOUND_PATH, PROFILE, REGISTER};
    use std::sync::Mutex;

    const GUEST: AuthStatus = AuthStatus {
        authenticated: false,
        admin: false,
    };
    const MEMBER: AuthStatus = AuthStatus {
        authenticated: true,
        admin: false,
    };
    const ADMINISTRATOR: AuthStatus = AuthStatus {
        authenticated: true,
        admin: true,
    };

    fn redirect(path: &str) -> NavigationDecision {
        NavigationDecision::Redirect(path.to_string())
    }

    #[test]
    fn test_guest_is_sent_to_login_with_original_path() {
        let table = RouteTable::default();

        assert_eq!(
            evaluate(&PROFILE, "/profile", GUEST, &table),
            redirect("/login?redirect=%2Fprofile")
        );
        assert_eq!(
            evaluate(&ADMIN, "/admin?tab=users", GUEST, &table),
            redirect("/login?redirect=%2Fadmin%3Ftab%3Dusers")
        );
    }

    #[test]
    fn test_non_admin_gets_not_found() {
        let table = RouteTable::default();
        assert_eq!(
            evaluate(&ADMIN, "/admin", MEMBER, &table),
            redirect(NOT_FOUND_PATH)
        );
    }

    #[test]
    fn test_authenticated_login_visit_goes_home() {
        let table = RouteTable::default();
        assert_eq!(evaluate(&LOGIN, "/login", MEMBER, &table), redirect(HOME_PATH));
    }

    #[test]
    fn test_allowed_navigation() {
        let table = RouteTable::default();

        assert_eq!(evaluate(&LOGIN, "/login", GUEST, &table), NavigationDecision::Proceed);
        assert_eq!(evaluate(&REGISTER, "/register", GUEST, &table), NavigationDecision::Proceed);
        assert_eq!(evaluate(&HOME, "/", MEMBER, &table), NavigationDecision::Proceed);
        assert_eq!(evaluate(&ADMIN, "/admin", ADMINISTRATOR, &table), NavigationDecision::Proceed);
        assert_eq!(
            evaluate(table.not_found(), "/nowhere", GUEST, &table),
            NavigationDecision::Proceed
        );
    }

    #[test]
    fn test_authenticated_without_user_is_not_admin() {
        let snapshot = SessionSnapshot {
            token: Some("tok".to_string()),
            ..Default::default()
        };
        assert_eq!(AuthStatus::from(&snapshot), MEMBER);
    }

    #[test]
    fn test_redirect_target() {
        assert_eq!(
            redirect_target("/login?redirect=%2Fadmin%3Ftab%3Dusers").as_deref(),
            Some("/admin?tab=users")
        );
        assert_eq!(
            redirect_target("/login?x=1&redirect=%2Fprofile#top").as_deref(),
            Some("/profile")
        );
        assert_eq!(redirect_target("/login"), None);
        assert_eq!(redirect_target("/login?redirect=https%3A%2F%2Fevil.test"), None);
        assert_eq!(redirect_target("/login?redirect=%2F%2Fevil.test"), None);
    }

    #[test]
    fn test_safe_redirect() {
        assert_eq!(safe_redirect("/profile"), Some("/profile"));
        assert_eq!(safe_redirect("//evil.test"), None);
        assert_eq!(safe_redirect("/\\evil.test"), None);
        assert_eq!(safe_redirect("http://evil.test"), None);
        assert_eq!(safe_redirect(""), None);
    }

    struct GuardHarness {
        guard: RouteGuard<MockTransport>,
        session: SessionStore<MockTransport>,
        transport: MockTransport,
        titles: Arc<Mutex<Vec<String>>>,
    }

    fn guard_harness() -> GuardHarness {
        let transport = MockTransport::default();
        let recorder = Recorder::default();
        let session = SessionStore::new(
            ClientConfig::new(TEST_BASE_URL),
            transport.clone(),
            Arc::new(MemoryTokenStore::new()),
            Arc::new(recorder.clone()),
            recorder.navigator(),
        );

        let titles = Arc::new(Mutex::new(Vec::new()));
        let sink = titles.clone();
        let guard = RouteGuard::new(
            session.clone(),
            RouteTable::default(),
            Arc::new(move |title: &str| sink.lock().unwrap().push(title.to_string())),
        );

        GuardHarness {
            guard,
            session,
            transport,
            titles,
        }
    }

    #[test]
    fn test_before_each_sets_title_only_when_proceeding() {
        let h = guard_harness();

        assert_eq!(h.guard.before_each("/login"), NavigationDecision::Proceed);
        assert_eq!(
            h.guard.before_each("/profile"),
            redirect("/login?redirect=%2Fprofile")
        );

        assert_eq!(*h.titles.lock().unwrap(), vec!["Login - DevDeck".to_string()]);
    }

    #[tokio::test]
    async fn test_expired_session_redirects_next_protected_navigation() {
        let h = guard_harness();
        h.transport.push(Ok(ApiResponse::json(
            200,
            r#"{"user": {"id": 1, "username": "admin", "email": "admin@example.com", "roles": ["USER", "ADMIN"]}, "token": "tok"}"#,
        )));
        h.transport.push(Ok(ApiResponse::json(
            401,
            r#"{"message": "Token has expired"}"#,
        )));

        h.session
            .login(&Credentials::new("admin", "password123"))
            .await
            .unwrap();
        assert_eq!(h.guard.before_each("/admin"), NavigationDecision::Proceed);

        let result: Result<serde_json::Value, ApiError> = h
            .session
            .gateway()
            .get("/api/protected", RequestOptions::default())
            .await;
        assert!(result.unwrap_err().is_unauthorized());

        assert_eq!(
            h.guard.before_each("/admin"),
            redirect("/login?redirect=%2Fadmin")
        );
    }
}
