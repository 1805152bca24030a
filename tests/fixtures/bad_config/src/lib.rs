#[pre_authorize("hasRole('A')")]
pub fn fine() {}
