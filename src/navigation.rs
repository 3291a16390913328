//! Navigation Module
//!
//! Screen routing is owned by the host; the core only asks for a route
//! to replace the current screen.

use std::fmt;

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Sign-in screen
    SignIn,
    /// Primary tab
    Home,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::SignIn => "/(auth)/sign-in",
            Route::Home => "/(tabs)",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace-style navigation: no back-stack entry is kept
pub trait Navigator: Send + Sync {
    fn replace(&self, route: Route);
}

/// Navigator for headless hosts that only records the request
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn replace(&self, route: Route) {
        info!("Navigate (replace) to {}", route);
    }
}
