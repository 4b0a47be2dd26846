mod load;
mod user;

pub use load::cmd_load;
pub use user::cmd_user_add;
