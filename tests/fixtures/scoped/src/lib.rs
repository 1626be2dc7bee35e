pub struct Session {
    user: String,
    active: bool,
}

impl Session {
    pub fn start(user: &str) -> Self {
        Self { user: user.to_string(), active: true }
    }

    pub fn close(&mut self) {
        self.active = false;
    }
}
