//! Terminal demo: the pointer backdrop with the headline scramble and the
//! cycling text drawn on top.
//!
//! Move the mouse over the terminal to steer the highlight. Default keys:
//! `q` quits, `p` pauses, `d` toggles the debug line, `r` re-runs the
//! headline reveal.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
};
use glam::Vec2;
use glyphfx::animation::{
    CrossFadeRotator, CursorGradientField, ScrambleReveal,
};
use glyphfx::input::{InputEvent, KeyAction, PointerHub};
use glyphfx::options::{KeybindingOptions, Options};
use glyphfx::render::terminal::{Overlay, TerminalCanvas, TerminalSession};
use glyphfx::util::frame_timing::FrameTiming;
use glyphfx::util::rng::{BoxedRandom, SeededRandom, ThreadRandom};
use glyphfx::{FrameScheduler, GlyphError};
use web_time::{Duration, Instant};

/// Command line for the terminal demo.
#[derive(Parser, Debug)]
#[command(name = "glyphfx", version, about)]
struct Args {
    /// TOML options preset to load.
    #[arg(long)]
    options: Option<PathBuf>,
    /// Seed for reproducible reveals.
    #[arg(long)]
    seed: Option<u64>,
    /// Target frames per second.
    #[arg(long)]
    fps: Option<u32>,
    /// Headline text to reveal.
    #[arg(long)]
    headline: Option<String>,
    /// Rotator entry (repeat for several). Replaces the preset's list.
    #[arg(long = "text")]
    texts: Vec<String>,
    /// Pause on each rotator entry, in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Exit after this many frames.
    #[arg(long)]
    frames: Option<u64>,
}

impl Args {
    fn options(&self) -> Result<Options, GlyphError> {
        let mut options = match &self.options {
            Some(path) => Options::load(path)?,
            None => Options::default(),
        };
        if let Some(fps) = self.fps {
            options.terminal.fps = fps;
        }
        if let Some(headline) = &self.headline {
            options.terminal.headline.clone_from(headline);
        }
        if !self.texts.is_empty() {
            options.rotator.texts.clone_from(&self.texts);
        }
        if let Some(interval_ms) = self.interval_ms {
            options.rotator.interval_ms = interval_ms;
        }
        options.validate()?;
        Ok(options)
    }

    fn rng(&self, stream: u64) -> BoxedRandom {
        match self.seed {
            Some(seed) => {
                Box::new(SeededRandom::new(seed.wrapping_add(stream)))
            }
            None => Box::new(ThreadRandom::new()),
        }
    }
}

/// Terminal event translated for the demo loop.
fn translate(
    event: &Event,
    canvas: &mut TerminalCanvas,
) -> Option<InputEvent> {
    match event {
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let p = canvas.cell_center(mouse.column, mouse.row);
                Some(InputEvent::CursorMoved { x: p.x, y: p.y })
            }
            _ => None,
        },
        Event::Resize(cols, rows) => {
            canvas.resize(*cols, *rows);
            let size = canvas.viewport();
            Some(InputEvent::Resized {
                width: size.x,
                height: size.y,
            })
        }
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                && key.code == KeyCode::Char('c')
            {
                return Some(InputEvent::Key("ctrl+c".to_owned()));
            }
            match key.code {
                KeyCode::Char(c) => Some(InputEvent::Key(c.to_string())),
                KeyCode::Esc => Some(InputEvent::Key("Esc".to_owned())),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Demo toggles driven by key actions.
struct ViewState {
    paused: bool,
    debug: bool,
}

impl ViewState {
    /// Apply one input event. Returns `false` when the demo should exit.
    fn apply(
        &mut self,
        input: &InputEvent,
        keys: &KeybindingOptions,
        hub: &PointerHub,
        field: &CursorGradientField,
        scramble: &ScrambleReveal,
    ) -> bool {
        match input {
            InputEvent::CursorMoved { x, y } => {
                hub.dispatch(Vec2::new(*x, *y));
            }
            InputEvent::Resized { width, height } => {
                field.set_viewport(Vec2::new(*width, *height));
            }
            InputEvent::Key(key) if key == "ctrl+c" => return false,
            InputEvent::Key(key) => match keys.lookup(key) {
                Some(KeyAction::Quit) => return false,
                Some(KeyAction::TogglePause) => self.paused = !self.paused,
                Some(KeyAction::ToggleDebug) => self.debug = !self.debug,
                Some(KeyAction::Rescramble) => {
                    scramble.set_text(scramble.text());
                }
                None => {}
            },
        }
        true
    }
}

/// Text most recently emitted by a component.
fn text_slot() -> (Rc<RefCell<String>>, impl FnMut(&str) + 'static) {
    let slot = Rc::new(RefCell::new(String::new()));
    let writer = slot.clone();
    (slot, move |text: &str| text.clone_into(&mut writer.borrow_mut()))
}

fn run(args: &Args) -> Result<(), GlyphError> {
    let options = args.options()?;
    let scheduler = Rc::new(FrameScheduler::new());
    let hub = PointerHub::new();
    let (cols, rows) = TerminalSession::size()?;
    let mut canvas = TerminalCanvas::new(cols, rows, &options.terminal);

    let field = CursorGradientField::new(
        scheduler.clone(),
        canvas.viewport(),
        &options.backdrop,
    );
    let (headline, headline_sink) = text_slot();
    let scramble = ScrambleReveal::new(
        scheduler.clone(),
        options.terminal.headline.clone(),
        &options.scramble,
        args.rng(1),
    )
    .with_sink(headline_sink);
    let (rotating, rotating_sink) = text_slot();
    let rotator = CrossFadeRotator::from_options(
        scheduler.clone(),
        &options.rotator,
        args.rng(2),
    )
    .with_sink(rotating_sink);

    let session = TerminalSession::enter()?;
    field.start(&hub);
    scramble.start();
    rotator.start();
    log::info!(
        "demo running at {} fps on {cols}x{rows}",
        options.terminal.fps
    );

    let mut timing = FrameTiming::new(options.terminal.fps);
    let mut stdout = io::stdout();
    let mut view = ViewState {
        paused: false,
        debug: options.terminal.show_debug,
    };
    let mut frames = 0u64;

    'frames: loop {
        if event::poll(timing.time_until_next_frame())? {
            loop {
                let event = event::read()?;
                if let Some(input) = translate(&event, &mut canvas) {
                    let keep_running = view.apply(
                        &input,
                        &options.keybindings,
                        &hub,
                        &field,
                        &scramble,
                    );
                    if !keep_running {
                        break 'frames;
                    }
                }
                // A due frame renders even while motion keeps arriving.
                if timing.should_render() || !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
        if !timing.should_render() {
            continue;
        }
        let paused = view.paused;
        if !paused {
            scheduler.run_frame_at(Instant::now());
        }
        timing.end_frame();

        let frame = field.latest_frame();
        let overlay = Overlay {
            headline: headline.borrow().clone(),
            rotator: rotating.borrow().clone(),
            debug: view.debug.then(|| {
                format!(
                    "frame {} | {:.0} fps | cursor {:.0},{:.0} -> {:.0},{:.0}",
                    scheduler.frame(),
                    timing.fps(),
                    frame.center.x,
                    frame.center.y,
                    frame.target.x,
                    frame.target.y,
                )
            }),
            paused,
        };
        let cells = canvas.compose(&frame, &options.backdrop, &overlay);
        canvas.draw(&mut stdout, &cells)?;

        frames += 1;
        if args.frames.is_some_and(|limit| frames >= limit) {
            break;
        }
    }

    rotator.stop();
    scramble.stop();
    field.stop();
    drop(session);
    log::info!("demo exited after {frames} frames");
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use glyphfx::options::{BackdropOptions, ScrambleOptions};
    use glyphfx::util::rng::FixedRandom;

    use super::*;

    struct Demo {
        scheduler: Rc<FrameScheduler>,
        hub: PointerHub,
        field: CursorGradientField,
        scramble: ScrambleReveal,
        keys: KeybindingOptions,
    }

    fn demo() -> Demo {
        let scheduler = Rc::new(FrameScheduler::new());
        let field = CursorGradientField::new(
            scheduler.clone(),
            Vec2::new(800.0, 480.0),
            &BackdropOptions::default(),
        );
        let scramble = ScrambleReveal::new(
            scheduler.clone(),
            "Dynamic Background",
            &ScrambleOptions::default(),
            Box::new(FixedRandom::constant(0.5)),
        );
        Demo {
            scheduler,
            hub: PointerHub::new(),
            field,
            scramble,
            keys: KeybindingOptions::default(),
        }
    }

    fn apply(view: &mut ViewState, demo: &Demo, input: &InputEvent) -> bool {
        view.apply(input, &demo.keys, &demo.hub, &demo.field, &demo.scramble)
    }

    #[test]
    fn keys_toggle_view_and_quit() {
        let demo = demo();
        let mut view = ViewState {
            paused: false,
            debug: false,
        };
        let key = |k: &str| InputEvent::Key(k.to_owned());

        assert!(apply(&mut view, &demo, &key("p")));
        assert!(apply(&mut view, &demo, &key("d")));
        assert!(view.paused && view.debug);
        assert!(apply(&mut view, &demo, &key("z")));
        assert!(!apply(&mut view, &demo, &key("q")));
        assert!(!apply(&mut view, &demo, &key("ctrl+c")));
    }

    #[test]
    fn motion_reaches_the_field_through_the_hub() {
        let demo = demo();
        demo.field.start(&demo.hub);
        let mut view = ViewState {
            paused: false,
            debug: false,
        };
        let moved = InputEvent::CursorMoved { x: 10.0, y: 20.0 };
        assert!(apply(&mut view, &demo, &moved));
        assert_eq!(demo.field.target(), Vec2::new(10.0, 20.0));

        let resized = InputEvent::Resized {
            width: 100.0,
            height: 50.0,
        };
        assert!(apply(&mut view, &demo, &resized));
        demo.scheduler.advance(Duration::from_millis(16));
        assert_eq!(demo.field.latest_frame().viewport, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn rescramble_restarts_the_headline() {
        let demo = demo();
        demo.scramble.start();
        demo.scheduler.advance_frames(200, Duration::from_millis(16));
        assert!(!demo.scramble.is_revealing());

        let mut view = ViewState {
            paused: false,
            debug: false,
        };
        assert!(apply(&mut view, &demo, &InputEvent::Key("r".to_owned())));
        assert!(demo.scramble.is_revealing());
        assert_eq!(demo.scramble.reveals(), 2);
    }
}
