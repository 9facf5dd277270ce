//! Page handlers served by the site.

mod home;

pub use home::HomePage;
