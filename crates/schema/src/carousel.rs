//! Carousel configuration as authored in block JSON, and its effective form.
//!
//! Authors may write either snake_case (`slides_per_view`) or camelCase
//! (`slidesPerView`) option names. [`CarouselConfig::resolve`] applies the
//! defaults and produces [`CarouselOptions`], the values the carousel
//! controller actually runs with.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Default autoplay delay when `autoplay: true` carries no explicit delay.
pub const DEFAULT_AUTOPLAY_DELAY_MS: u64 = 3000;

/// Author-facing carousel options (`config` on a `swiper` block).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Slides visible at once.
    #[serde(alias = "slidesPerView")]
    pub slides_per_view: Option<f64>,
    /// Gap between slides in pixels.
    #[serde(alias = "spaceBetween")]
    pub space_between: Option<f64>,
    /// Center the active slide.
    #[serde(alias = "centeredSlides")]
    pub centered_slides: Option<bool>,
    /// Wrap around at either end.
    #[serde(rename = "loop")]
    pub looped: Option<bool>,
    /// Transition effect.
    pub effect: Option<Effect>,
    /// Options for the fade effect.
    #[serde(alias = "fadeEffect")]
    pub fade_effect: Option<FadeConfig>,
    /// Options for the coverflow effect.
    #[serde(alias = "coverflowEffect")]
    pub coverflow_effect: Option<CoverflowConfig>,
    /// `true` or an options object.
    pub autoplay: Option<AutoplayConfig>,
    /// Viewport min-width (px, as a string key) to per-breakpoint overrides.
    pub breakpoints: BTreeMap<String, BreakpointConfig>,
    /// Show previous/next arrows.
    pub navigation: Option<bool>,
    /// `true` or an options object.
    pub pagination: Option<PaginationConfig>,
}

/// Slide transition effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Plain horizontal slide.
    #[default]
    Slide,
    /// Cross-fade between slides.
    Fade,
    /// 3D cube.
    Cube,
    /// Coverflow.
    Coverflow,
    /// Card flip.
    Flip,
}

impl Effect {
    /// Lowercase effect name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::Fade => "fade",
            Self::Cube => "cube",
            Self::Coverflow => "coverflow",
            Self::Flip => "flip",
        }
    }
}

/// Fade effect sub-options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// Fade the outgoing slide out while the next fades in.
    #[serde(alias = "crossFade")]
    pub cross_fade: Option<bool>,
}

/// Coverflow effect sub-options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoverflowConfig {
    /// Slide rotation in degrees.
    pub rotate: Option<f64>,
    /// Space between slides.
    pub stretch: Option<f64>,
    /// Depth offset.
    pub depth: Option<f64>,
    /// Effect multiplier.
    pub modifier: Option<f64>,
    /// Render slide shadows.
    #[serde(alias = "slideShadows")]
    pub slide_shadows: Option<bool>,
}

/// `autoplay: true` or `autoplay: {delay, ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AutoplayConfig {
    /// Enabled (`true`) or disabled (`false`) with defaults.
    Enabled(bool),
    /// Explicit options.
    Options(AutoplayOptions),
}

/// Explicit autoplay options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutoplayOptions {
    /// Milliseconds between automatic advances.
    pub delay: Option<u64>,
    /// Stop autoplay for good after a manual interaction.
    #[serde(alias = "disableOnInteraction")]
    pub disable_on_interaction: Option<bool>,
    /// Pause while the pointer hovers the carousel.
    #[serde(alias = "pauseOnMouseEnter")]
    pub pause_on_mouse_enter: Option<bool>,
}

/// Per-breakpoint overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BreakpointConfig {
    /// Slides visible at once from this width up.
    #[serde(alias = "slidesPerView")]
    pub slides_per_view: Option<f64>,
    /// Gap between slides from this width up.
    #[serde(alias = "spaceBetween")]
    pub space_between: Option<f64>,
}

/// `pagination: true` or `pagination: {type, clickable}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PaginationConfig {
    /// Enabled with clickable bullets, or disabled.
    Enabled(bool),
    /// Explicit options.
    Options(PaginationOptions),
}

/// Explicit pagination options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaginationOptions {
    /// Pagination style.
    #[serde(rename = "type")]
    pub kind: Option<PaginationKind>,
    /// Bullets jump to their slide when clicked.
    pub clickable: Option<bool>,
}

/// Pagination style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationKind {
    /// One dot per slide.
    #[default]
    Bullets,
    /// `current / total` text.
    Fraction,
    /// A proportional fill bar.
    ProgressBar,
}

/// Effective carousel behavior after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselOptions {
    /// Slides visible at once.
    pub slides_per_view: f64,
    /// Gap between slides in pixels.
    pub space_between: f64,
    /// Center the active slide.
    pub centered: bool,
    /// Wrap around at either end.
    pub looped: bool,
    /// Transition effect.
    pub effect: Effect,
    /// Fade options, only for the fade effect with explicit fade config.
    pub fade: Option<Fade>,
    /// Coverflow options, only for the coverflow effect.
    pub coverflow: Option<Coverflow>,
    /// Autoplay, when enabled.
    pub autoplay: Option<Autoplay>,
    /// Breakpoints sorted by ascending min-width.
    pub breakpoints: Vec<Breakpoint>,
    /// Show previous/next arrows.
    pub navigation: bool,
    /// Pagination, when enabled.
    pub pagination: Option<Pagination>,
}

/// Effective fade options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    /// Cross-fade slides.
    pub cross_fade: bool,
}

/// Effective coverflow options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverflow {
    /// Slide rotation in degrees.
    pub rotate: f64,
    /// Space between slides.
    pub stretch: f64,
    /// Depth offset.
    pub depth: f64,
    /// Effect multiplier.
    pub modifier: f64,
    /// Render slide shadows.
    pub slide_shadows: bool,
}

/// Effective autoplay options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autoplay {
    /// Milliseconds between automatic advances.
    pub delay_ms: u64,
    /// Pause while hovered.
    pub pause_on_hover: bool,
    /// Stop for good after a manual interaction.
    pub disable_on_interaction: bool,
}

/// One responsive breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Viewport min-width in pixels.
    pub min_width: u32,
    /// Slides per view override.
    pub slides_per_view: Option<f64>,
    /// Spacing override.
    pub space_between: Option<f64>,
}

/// Effective pagination options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Pagination style.
    pub kind: PaginationKind,
    /// Bullets are clickable.
    pub clickable: bool,
}

impl CarouselConfig {
    /// Apply defaults, producing the effective options.
    ///
    /// `default_delay_ms` is used for `autoplay: true` and for option objects without a delay.
    pub fn resolve(&self, default_delay_ms: u64) -> CarouselOptions {
        let effect = self.effect.unwrap_or_default();

        let fade = match (effect, &self.fade_effect) {
            (Effect::Fade, Some(f)) => Some(Fade {
                cross_fade: f.cross_fade.unwrap_or(true),
            }),
            _ => None,
        };

        let coverflow = (effect == Effect::Coverflow).then(|| {
            let c = self.coverflow_effect.clone().unwrap_or_default();
            Coverflow {
                rotate: c.rotate.unwrap_or(0.0),
                stretch: c.stretch.unwrap_or(0.0),
                depth: c.depth.unwrap_or(100.0),
                modifier: c.modifier.unwrap_or(2.5),
                slide_shadows: c.slide_shadows.unwrap_or(false),
            }
        });

        let autoplay = match &self.autoplay {
            None | Some(AutoplayConfig::Enabled(false)) => None,
            Some(AutoplayConfig::Enabled(true)) => Some(Autoplay {
                delay_ms: default_delay_ms,
                pause_on_hover: true,
                disable_on_interaction: false,
            }),
            Some(AutoplayConfig::Options(o)) => Some(Autoplay {
                delay_ms: o.delay.filter(|d| *d > 0).unwrap_or(default_delay_ms),
                pause_on_hover: o.pause_on_mouse_enter.unwrap_or(true),
                disable_on_interaction: o.disable_on_interaction.unwrap_or(false),
            }),
        };

        let mut breakpoints: Vec<Breakpoint> = self
            .breakpoints
            .iter()
            .filter_map(|(key, bp)| {
                let min_width = key.trim().parse::<u32>().ok()?;
                Some(Breakpoint {
                    min_width,
                    slides_per_view: bp.slides_per_view,
                    space_between: bp.space_between,
                })
            })
            .collect();
        breakpoints.sort_by_key(|b| b.min_width);

        let pagination = match &self.pagination {
            None | Some(PaginationConfig::Enabled(false)) => None,
            Some(PaginationConfig::Enabled(true)) => Some(Pagination {
                kind: PaginationKind::Bullets,
                clickable: true,
            }),
            Some(PaginationConfig::Options(o)) => Some(Pagination {
                kind: o.kind.unwrap_or_default(),
                clickable: o.clickable.unwrap_or(true),
            }),
        };

        CarouselOptions {
            slides_per_view: self.slides_per_view.unwrap_or(1.0),
            space_between: self.space_between.unwrap_or(0.0),
            centered: self.centered_slides.unwrap_or(false),
            looped: self.looped.unwrap_or(false),
            effect,
            fade,
            coverflow,
            autoplay,
            breakpoints,
            navigation: self.navigation.unwrap_or(false),
            pagination,
        }
    }
}

impl Default for CarouselOptions {
    fn default() -> Self {
        CarouselConfig::default().resolve(DEFAULT_AUTOPLAY_DELAY_MS)
    }
}

impl CarouselOptions {
    /// Slides per view and spacing in effect at `viewport_width` pixels.
    ///
    /// Breakpoints apply cumulatively from the smallest up to the largest
    /// min-width not exceeding the viewport.
    pub fn at_width(&self, viewport_width: u32) -> (f64, f64) {
        let mut slides = self.slides_per_view;
        let mut space = self.space_between;
        for bp in self
            .breakpoints
            .iter()
            .take_while(|b| b.min_width <= viewport_width)
        {
            if let Some(s) = bp.slides_per_view {
                slides = s;
            }
            if let Some(s) = bp.space_between {
                space = s;
            }
        }
        (slides, space)
    }
}
