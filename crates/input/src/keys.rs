/// Directional keys held during one tick.
///
/// The host polls its keyboard state into this once per tick; the camera never
/// sees individual key events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    pub const NONE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
    };

    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::NONE
        }
    }
}
