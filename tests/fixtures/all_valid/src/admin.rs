pub struct AdminController;

#[pre_authorize("hasRole('ADMIN')")]
impl AdminController {
    #[post_authorize("hasRole('ADMIN') and @authz.canRead(#id)")]
    pub fn read(&self, id: u64) {
        let _ = id;
    }

    pub fn unguarded(&self) {}
}
