//! Viewport breakpoints and responsive values.
//!
//! The active breakpoint lives in a [`Viewport`] context. It is always
//! [`Breakpoint::Base`] during server rendering and until the browser has
//! measured the window, so hydration starts from the same markup the server
//! produced.

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Breakpoint {
    #[default]
    Base,
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 6] = [
        Breakpoint::Base,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    /// Minimum viewport width in CSS pixels.
    pub fn min_width(self) -> f64 {
        match self {
            Breakpoint::Base => 0.0,
            Breakpoint::Sm => 480.0,
            Breakpoint::Md => 768.0,
            Breakpoint::Lg => 992.0,
            Breakpoint::Xl => 1280.0,
            Breakpoint::Xxl => 1536.0,
        }
    }

    pub fn from_width(width: f64) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|bp| width >= bp.min_width())
            .unwrap_or_default()
    }
}

/// A value that varies with the viewport, mobile first.
///
/// Only `base` is required; a breakpoint without its own value inherits the
/// nearest narrower one.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsiveValue<T> {
    pub base: T,
    pub sm: Option<T>,
    pub md: Option<T>,
    pub lg: Option<T>,
    pub xl: Option<T>,
    pub xxl: Option<T>,
}

impl<T> ResponsiveValue<T> {
    pub fn new(base: T) -> Self {
        Self {
            base,
            sm: None,
            md: None,
            lg: None,
            xl: None,
            xxl: None,
        }
    }

    #[must_use]
    pub fn md(mut self, value: T) -> Self {
        self.md = Some(value);
        self
    }

    fn get(&self, breakpoint: Breakpoint) -> Option<&T> {
        match breakpoint {
            Breakpoint::Base => Some(&self.base),
            Breakpoint::Sm => self.sm.as_ref(),
            Breakpoint::Md => self.md.as_ref(),
            Breakpoint::Lg => self.lg.as_ref(),
            Breakpoint::Xl => self.xl.as_ref(),
            Breakpoint::Xxl => self.xxl.as_ref(),
        }
    }

    pub fn resolve(&self, active: Breakpoint) -> &T {
        Breakpoint::ALL
            .iter()
            .rev()
            .filter(|bp| **bp <= active)
            .find_map(|bp| self.get(*bp))
            .unwrap_or(&self.base)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    breakpoint: RwSignal<Breakpoint>,
}

impl Viewport {
    pub fn new(initial: Breakpoint) -> Self {
        Self {
            breakpoint: RwSignal::new(initial),
        }
    }

    pub fn breakpoint(&self) -> Signal<Breakpoint> {
        self.breakpoint.into()
    }

    pub fn set_breakpoint(&self, breakpoint: Breakpoint) {
        if self.breakpoint.get_untracked() != breakpoint {
            self.breakpoint.set(breakpoint);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn track_window(self) {
        let measure = move || {
            if let Some(width) = window().inner_width().ok().and_then(|w| w.as_f64()) {
                self.set_breakpoint(Breakpoint::from_width(width));
            }
        };

        measure();
        // Lives as long as the page.
        let _ = window_event_listener(leptos::ev::resize, move |_| measure());
    }
}

/// Provide the viewport context. In the browser it starts following the
/// window width once the app has hydrated.
pub fn provide_viewport() -> Viewport {
    let viewport = Viewport::new(Breakpoint::Base);
    provide_context(viewport);

    #[cfg(target_arch = "wasm32")]
    Effect::new(move |_| viewport.track_window());

    viewport
}

pub fn use_viewport() -> Viewport {
    use_context::<Viewport>().unwrap_or_else(|| Viewport::new(Breakpoint::Base))
}

/// Resolve a responsive value against the viewport in context.
pub fn use_breakpoint_value<T>(value: ResponsiveValue<T>) -> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    let breakpoint = use_viewport().breakpoint();
    Signal::derive(move || value.resolve(breakpoint.get()).clone())
}
