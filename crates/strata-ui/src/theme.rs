//! Per-kind component themes.
//!
//! A [`ThemeManager`] maps each [`ComponentKind`] to a [`Theme`]. Lookup tries
//! the exact kind, then follows [`ComponentKind::fallback`] until a theme is
//! found, and finally falls back to a theme that leaves the style untouched.
//! Themes are applied once, when a widget builder creates a component.
//!
//! # Example
//!
//! ```
//! use strata_ui::component::{Component, ComponentKind};
//! use strata_ui::style::Color;
//! use strata_ui::theme::ThemeManager;
//!
//! let mut themes = ThemeManager::flat_dark();
//! themes.set(ComponentKind::Button, |c: &mut Component| {
//!     c.style.background_color = Some(Color::rgb(0.8, 0.2, 0.2));
//! });
//!
//! let mut check_box = Component::new(ComponentKind::CheckBox);
//! themes.apply(&mut check_box);
//! assert_eq!(check_box.style.background_color, Some(Color::rgb(0.8, 0.2, 0.2)));
//! ```

use std::sync::Arc;

use strata_core::alloc::HashMap;

use crate::component::{Component, ComponentKind};
use crate::style::{Color, Style};

/// Applies visual defaults to a freshly created component.
pub trait Theme: Send + Sync {
    fn apply(&self, component: &mut Component);
}

impl<F> Theme for F
where
    F: Fn(&mut Component) + Send + Sync,
{
    fn apply(&self, component: &mut Component) {
        self(component)
    }
}

/// Leaves components untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTheme;

impl Theme for NoopTheme {
    fn apply(&self, _component: &mut Component) {}
}

/// Replaces the component's style with a fixed one.
#[derive(Debug, Clone)]
pub struct StyleTheme(pub Style);

impl Theme for StyleTheme {
    fn apply(&self, component: &mut Component) {
        component.style = self.0.clone();
    }
}

/// Transparent background, no border. Used for layer containers so that
/// content underneath shows through.
#[derive(Debug, Clone)]
pub struct BorderlessTransparentTheme {
    pub text_color: Color,
}

impl Theme for BorderlessTransparentTheme {
    fn apply(&self, component: &mut Component) {
        component.style.clear_decoration();
        component.style.background_color = Some(Color::TRANSPARENT);
        component.style.text_color = self.text_color;
    }
}

/// Colors shared by the flat themes.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    /// Accent for buttons and active parts
    pub primary: Color,
    /// Window and frame background
    pub background: Color,
    /// Panels and other raised surfaces
    pub surface: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub border: Color,
}

impl ColorPalette {
    pub fn dark() -> Self {
        Self {
            primary: Color::from_rgb_u8(60, 120, 200),
            background: Color::from_rgb_u8(18, 18, 18),
            surface: Color::from_rgb_u8(30, 30, 30),
            text_primary: Color::from_rgb_u8(255, 255, 255),
            text_secondary: Color::from_rgb_u8(180, 180, 180),
            border: Color::from_rgb_u8(60, 60, 60),
        }
    }

    pub fn light() -> Self {
        Self {
            primary: Color::from_rgb_u8(50, 100, 200),
            background: Color::from_rgb_u8(250, 250, 250),
            surface: Color::from_rgb_u8(255, 255, 255),
            text_primary: Color::from_rgb_u8(0, 0, 0),
            text_secondary: Color::from_rgb_u8(100, 100, 100),
            border: Color::from_rgb_u8(200, 200, 200),
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::dark()
    }
}

/// Kind-keyed theme registry.
#[derive(Clone)]
pub struct ThemeManager {
    themes: HashMap<ComponentKind, Arc<dyn Theme>>,
    default_theme: Arc<dyn Theme>,
}

impl ThemeManager {
    /// Manager with no registered themes.
    pub fn new() -> Self {
        Self {
            themes: HashMap::default(),
            default_theme: Arc::new(NoopTheme),
        }
    }

    pub fn flat_dark() -> Self {
        Self::flat(&ColorPalette::dark())
    }

    pub fn flat_light() -> Self {
        Self::flat(&ColorPalette::light())
    }

    /// Flat themes for every built-in kind, derived from `palette`.
    pub fn flat(palette: &ColorPalette) -> Self {
        let mut manager = Self::new();
        manager.set(
            ComponentKind::Panel,
            StyleTheme(
                Style::new()
                    .background_color(palette.surface)
                    .border(palette.border, 1.0)
                    .border_radius(2.0)
                    .text_color(palette.text_primary),
            ),
        );
        manager.set(
            ComponentKind::LayerContainer,
            BorderlessTransparentTheme {
                text_color: palette.text_primary,
            },
        );
        manager.set(
            ComponentKind::Label,
            BorderlessTransparentTheme {
                text_color: palette.text_primary,
            },
        );
        manager.set(
            ComponentKind::Button,
            StyleTheme(
                Style::new()
                    .background_color(palette.primary)
                    .border(palette.border, 1.0)
                    .border_radius(2.0)
                    .text_color(palette.text_primary),
            ),
        );
        manager.set(
            ComponentKind::ScrollBar,
            StyleTheme(
                Style::new()
                    .background_color(palette.background)
                    .border(palette.border, 1.0)
                    .text_color(palette.text_secondary),
            ),
        );
        manager.set(
            ComponentKind::Widget,
            StyleTheme(
                Style::new()
                    .background_color(palette.background)
                    .border(palette.border, 1.0)
                    .border_radius(4.0)
                    .text_color(palette.text_primary),
            ),
        );
        manager
    }

    /// Register a theme for exactly `kind`.
    pub fn set(&mut self, kind: ComponentKind, theme: impl Theme + 'static) {
        self.themes.insert(kind, Arc::new(theme));
    }

    pub fn remove(&mut self, kind: ComponentKind) {
        self.themes.remove(&kind);
    }

    /// Theme registered for `kind` or its nearest fallback kind.
    pub fn get(&self, kind: ComponentKind) -> Arc<dyn Theme> {
        let mut current = Some(kind);
        while let Some(k) = current {
            if let Some(theme) = self.themes.get(&k) {
                return theme.clone();
            }
            current = k.fallback();
        }
        self.default_theme.clone()
    }

    pub fn apply(&self, component: &mut Component) {
        self.get(component.kind()).apply(component);
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::flat_dark()
    }
}
