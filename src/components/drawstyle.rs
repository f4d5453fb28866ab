//! Presentation tag for wireframe models.
//!
//! The [`DrawStyle`] is chosen when the entity is spawned and decides which
//! color the model is drawn with. Rendering never looks at the entity name.

use bevy_ecs::prelude::Component;
use raylib::prelude::Color;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawStyle {
    /// Movable scene props.
    #[default]
    Prop,
    /// Ground and other static geometry.
    Ground,
}

impl DrawStyle {
    pub fn color(&self) -> Color {
        match self {
            DrawStyle::Prop => Color::RED,
            DrawStyle::Ground => Color::GRAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_prop() {
        assert_eq!(DrawStyle::default(), DrawStyle::Prop);
    }

    #[test]
    fn test_colors() {
        let prop = DrawStyle::Prop.color();
        let ground = DrawStyle::Ground.color();
        assert_eq!((prop.r, prop.g, prop.b), (230, 41, 55));
        assert_eq!((ground.r, ground.g, ground.b), (130, 130, 130));
    }
}
