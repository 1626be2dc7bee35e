pub struct Palette {
    accent: String,
}

pub enum Theme {
    Light,
    Dark,
    Custom(String),
}

pub trait Paint {
    fn apply(&self, theme: &Theme);
    fn reset(&self) {}
}
