// Shell navigation: the landing page and the dashboard.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Dashboard => "/dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Home),
            "/dashboard" => Some(Route::Dashboard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Route,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: Route::Home,
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn navigate(&mut self, route: Route) -> &'static str {
        self.current = route;
        route.path()
    }

    pub fn go_home(&mut self) -> &'static str {
        self.navigate(Route::Home)
    }

    pub fn open_dashboard(&mut self) -> &'static str {
        self.navigate(Route::Dashboard)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
