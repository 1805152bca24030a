pub mod admin;

#[pre_authorize("isAuthenticated()")]
pub fn home() {}
