pub struct Testklasse;

impl Testklasse {
    #[pre_authorize("hasRole('B')")]
    pub fn correct(&self) {}

    #[pre_authorize("hasRole('C'))")]
    pub fn invalid_closed_brackets(&self) {}

    #[pre_authorize("hasRole('D') && @unknownBean.someMethod()")]
    pub fn unknown_bean(&self) {}
}
