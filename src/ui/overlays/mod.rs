pub mod permission;
pub mod toast;
