//! Static route table

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const NOT_FOUND_PATH: &str = "/404";

/// Application name appended to every document title
pub const APP_TITLE: &str = "DevDeck";

/// Per-view navigation metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub name: &'static str,
    pub path: &'static str,
    pub title: &'static str,
    pub requires_auth: bool,
    pub requires_admin: bool,
}

impl RouteMeta {
    /// Title shown in the browser tab
    pub fn document_title(&self) -> String {
        if self.title.is_empty() {
            APP_TITLE.to_string()
        } else {
            format!("{} - {}", self.title, APP_TITLE)
        }
    }
}

pub const HOME: RouteMeta = RouteMeta {
    name: "home",
    path: HOME_PATH,
    title: "Home",
    requires_auth: true,
    requires_admin: false,
};

pub const LOGIN: RouteMeta = RouteMeta {
    name: "login",
    path: LOGIN_PATH,
    title: "Login",
    requires_auth: false,
    requires_admin: false,
};

pub const REGISTER: RouteMeta = RouteMeta {
    name: "register",
    path: "/register",
    title: "Register",
    requires_auth: false,
    requires_admin: false,
};

pub const PROFILE: RouteMeta = RouteMeta {
    name: "profile",
    path: "/profile",
    title: "Profile",
    requires_auth: true,
    requires_admin: false,
};

pub const ADMIN: RouteMeta = RouteMeta {
    name: "admin",
    path: "/admin",
    title: "Administration",
    requires_auth: true,
    requires_admin: true,
};

pub const NOT_FOUND: RouteMeta = RouteMeta {
    name: "not-found",
    path: NOT_FOUND_PATH,
    title: "Page Not Found",
    requires_auth: false,
    requires_admin: false,
};

/// Lookup of route metadata by path
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteMeta>,
    not_found: RouteMeta,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteMeta>, not_found: RouteMeta) -> Self {
        Self { routes, not_found }
    }

    /// Route for a full path (query and fragment ignored); unknown paths
    /// resolve to the not-found view
    pub fn resolve(&self, full_path: &str) -> &RouteMeta {
        let path = path_only(full_path);
        let path = match path.trim_end_matches('/') {
            "" => HOME_PATH,
            trimmed => trimmed,
        };

        self.routes
            .iter()
            .find(|route| route.path == path)
            .unwrap_or(&self.not_found)
    }

    /// Route by name
    pub fn by_name(&self, name: &str) -> Option<&RouteMeta> {
        self.routes
            .iter()
            .chain(std::iter::once(&self.not_found))
            .find(|route| route.name == name)
    }

    pub fn not_found(&self) -> &RouteMeta {
        &self.not_found
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(vec![HOME, LOGIN, REGISTER, PROFILE, ADMIN, NOT_FOUND], NOT_FOUND)
    }
}

/// Strip query string and fragment
pub fn path_only(full_path: &str) -> &str {
    full_path
        .split(['?', '#'])
        .next()
        .unwrap_or(full_path)
}
