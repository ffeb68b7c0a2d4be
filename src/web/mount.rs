//! JavaScript-facing mount functions.
//!
//! ```js
//! import init, { mountBackground, mountRotator } from "./glyphfx.js";
//! await init();
//! const bg = mountBackground(highlightDiv, gridDiv);
//! const words = mountRotator(span, ["Robots.", "Build."], 2000);
//! // later
//! words.dispose();
//! bg.dispose();
//! ```

use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;
use web_time::Duration;

use crate::animation::{CrossFadeRotator, CursorGradientField, ScrambleReveal};
use crate::error::GlyphError;
use crate::input::Subscription;
use crate::options::Options;
use crate::render::backdrop::{gradient_css, grid_css};
use crate::scheduler::Scheduler;
use crate::util::rng::ThreadRandom;
use crate::web::{listen, web_error, window, DomPointerSource, RafScheduler};

fn options_from(toml: Option<String>) -> Result<Options, GlyphError> {
    let Some(toml) = toml else {
        return Ok(Options::default());
    };
    let options = Options::from_toml(&toml)?;
    options.validate()?;
    Ok(options)
}

fn scheduler() -> Result<Rc<dyn Scheduler>, GlyphError> {
    Ok(Rc::new(RafScheduler::new()?))
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::error!("{}", web_error(property, &e));
    }
}

fn viewport() -> Result<Vec2, GlyphError> {
    let window = window()?;
    let read = |value: Result<JsValue, JsValue>| {
        value
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
            .ok_or_else(|| GlyphError::Web("viewport size unavailable".into()))
    };
    Ok(Vec2::new(read(window.inner_width())?, read(window.inner_height())?))
}

/// Live pointer backdrop. Dropping or disposing it stops the frame loop
/// and removes its listeners.
#[wasm_bindgen]
pub struct BackgroundHandle {
    field: Rc<CursorGradientField>,
    resize: Subscription,
}

#[wasm_bindgen]
impl BackgroundHandle {
    /// Stop the frame loop and remove all listeners.
    pub fn dispose(&mut self) {
        self.resize.unsubscribe();
        self.field.stop();
    }
}

/// Drive `highlight`'s background with the pointer gradient and style
/// `grid` (when given) as the line grid. `options` is an optional TOML
/// preset.
#[wasm_bindgen(js_name = mountBackground)]
pub fn mount_background(
    highlight: HtmlElement,
    grid: Option<HtmlElement>,
    options: Option<String>,
) -> Result<BackgroundHandle, JsValue> {
    let options = options_from(options)?;
    let style = options.backdrop.clone();

    if let Some(grid) = grid {
        let (image, size) = grid_css(&style);
        set_style(&grid, "background-image", &image);
        set_style(&grid, "background-size", &size);
        set_style(&grid, "opacity", &style.grid_opacity.to_string());
    }
    set_style(&highlight, "mix-blend-mode", "screen");

    let field = Rc::new(
        CursorGradientField::new(scheduler()?, viewport()?, &options.backdrop)
            .with_sink(move |frame| {
                let css = gradient_css(frame, &style);
                set_style(&highlight, "background", &css);
            }),
    );
    field.start(&DomPointerSource::window()?);

    let weak = Rc::downgrade(&field);
    let resize = listen(&window()?.into(), "resize", move |_| {
        if let (Some(field), Ok(size)) = (weak.upgrade(), viewport()) {
            field.set_viewport(size);
        }
    })?;
    log::debug!("background mounted");
    Ok(BackgroundHandle { field, resize })
}

/// Headline scramble bound to an element's text.
#[wasm_bindgen]
pub struct ScrambleHandle {
    reveal: ScrambleReveal,
}

#[wasm_bindgen]
impl ScrambleHandle {
    /// Scramble from the current text into `text`.
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&self, text: String) {
        self.reveal.set_text(text);
    }

    /// Change how many reveal frames advance per animation frame. Takes
    /// effect on the reveal in flight.
    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&self, speed: f32) {
        self.reveal.set_speed(speed);
    }

    /// Cancel the reveal in flight. The element keeps its current text.
    pub fn dispose(&self) {
        self.reveal.stop();
    }
}

/// Reveal `text` into `element` with the scramble effect.
#[wasm_bindgen(js_name = mountScramble)]
pub fn mount_scramble(
    element: HtmlElement,
    text: String,
    options: Option<String>,
) -> Result<ScrambleHandle, JsValue> {
    let options = options_from(options)?;
    let reveal = ScrambleReveal::new(
        scheduler()?,
        text,
        &options.scramble,
        Box::new(ThreadRandom::new()),
    )
    .with_sink(move |text| element.set_text_content(Some(text)));
    reveal.start();
    Ok(ScrambleHandle { reveal })
}

/// Cycling text bound to an element.
#[wasm_bindgen]
pub struct RotatorHandle {
    rotator: CrossFadeRotator,
}

#[wasm_bindgen]
impl RotatorHandle {
    /// Replace the entries and restart the cycle.
    #[wasm_bindgen(js_name = setTexts)]
    pub fn set_texts(&self, texts: Vec<String>) {
        self.rotator.set_texts(texts);
    }

    /// Change the pause on each entry and restart the cycle.
    #[wasm_bindgen(js_name = setInterval)]
    pub fn set_interval(&self, interval_ms: u32) {
        self.rotator
            .set_interval(Duration::from_millis(u64::from(interval_ms)));
    }

    /// Stop cycling and show the current entry.
    pub fn dispose(&self) {
        self.rotator.stop();
    }
}

/// Cycle `texts` in `element`. Falls back to the preset's texts and
/// interval when they are not given.
#[wasm_bindgen(js_name = mountRotator)]
pub fn mount_rotator(
    element: HtmlElement,
    texts: Option<Vec<String>>,
    interval_ms: Option<u32>,
    options: Option<String>,
) -> Result<RotatorHandle, JsValue> {
    let mut options = options_from(options)?;
    if let Some(texts) = texts {
        options.rotator.texts = texts;
    }
    if let Some(interval_ms) = interval_ms {
        options.rotator.interval_ms = u64::from(interval_ms);
    }
    let rotator = CrossFadeRotator::from_options(
        scheduler()?,
        &options.rotator,
        Box::new(ThreadRandom::new()),
    )
    .with_sink(move |text| element.set_text_content(Some(text)));
    rotator.start();
    Ok(RotatorHandle { rotator })
}
