//! Portal Pages
//!
//! One component per route.

mod admin_login;
mod admin_orders;
mod admin_restaurants;
mod login;
mod menu;
mod orders;
mod register;
mod settings;

pub use admin_login::AdminLoginPage;
pub use admin_orders::AdminOrdersPage;
pub use admin_restaurants::AdminRestaurantsPage;
pub use login::LoginPage;
pub use menu::MenuPage;
pub use orders::OrdersPage;
pub use register::RegisterPage;
pub use settings::SettingsPage;
