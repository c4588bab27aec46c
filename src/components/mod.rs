//! UI Components
//!
//! Reusable Leptos components.

mod admin_header;
mod delete_confirm_button;
mod field;
mod flash;
mod nav;
mod order_card;

pub use admin_header::AdminHeader;
pub use delete_confirm_button::DeleteConfirmButton;
pub use field::{text_area, text_field};
pub use flash::{Flash, FlashBanner};
pub use nav::Nav;
pub use order_card::OrderCard;
