pub mod ensure_admin;
pub mod get_user;
pub mod list_users;
pub mod register_waiter;
