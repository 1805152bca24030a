#[secured(expr = "hasRole('AUDITOR') or isAdmin()")]
pub fn export() {}

#[secured(expr = "hasRole('AUDITOR')")]
pub fn list() {}

#[secured(role = "ADMIN")]
pub fn legacy() {}
