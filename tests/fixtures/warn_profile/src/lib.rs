#[pre_authorize("hasRole('A'")]
pub fn broken() {}
