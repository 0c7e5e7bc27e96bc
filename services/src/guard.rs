//! Route table and the protected-navigation guard.

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    ForgotPassword,
    AdminLogin,
    Dashboard,
    RedeemTicket,
    VisaApplication,
    Hotels,
    WorldCup,
    Admin,
    PaymentVerify,
    NotFound,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::ForgotPassword => "/forgot-password",
            Route::AdminLogin => "/admin/login",
            Route::Dashboard => "/dashboard",
            Route::RedeemTicket => "/dashboard/redeem",
            Route::VisaApplication => "/dashboard/visa",
            Route::Hotels => "/dashboard/hotels",
            Route::WorldCup => "/dashboard/world-cup",
            Route::Admin => "/admin",
            Route::PaymentVerify => "/payment/verify",
            Route::NotFound => "*",
        }
    }

    /// Resolves a location path. Query string, fragment and a trailing slash
    /// are ignored; anything unknown is `NotFound`.
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match path {
            "/" => Route::Home,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/forgot-password" => Route::ForgotPassword,
            "/admin/login" => Route::AdminLogin,
            "/dashboard" => Route::Dashboard,
            "/dashboard/redeem" => Route::RedeemTicket,
            "/dashboard/visa" => Route::VisaApplication,
            "/dashboard/hotels" => Route::Hotels,
            "/dashboard/world-cup" => Route::WorldCup,
            "/admin" => Route::Admin,
            "/payment/verify" => Route::PaymentVerify,
            _ => Route::NotFound,
        }
    }

    /// Requires a logged-in user.
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            Route::Dashboard
                | Route::RedeemTicket
                | Route::VisaApplication
                | Route::Hotels
                | Route::WorldCup
                | Route::Admin
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// Decides whether `route` renders for the given session.
pub fn guard(route: Route, session: Option<&Session>) -> Navigation {
    match (route, session) {
        (Route::Admin, Some(s)) if !s.is_admin() => Navigation::Redirect(Route::AdminLogin),
        (Route::AdminLogin, Some(s)) if s.is_admin() => Navigation::Redirect(Route::Admin),
        (r, None) if r.is_protected() => Navigation::Redirect(Route::Login),
        (r, _) => Navigation::Render(r),
    }
}
