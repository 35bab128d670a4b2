pub mod user;

pub use user::{NewUser, Role, UnknownRole, User};
