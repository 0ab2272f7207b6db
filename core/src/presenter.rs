use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::*;

pub const WIN_TEXT: &str = "You win!!!";
pub const LOSS_TEXT: &str = "Boom";

/// The visual surface a session draws on.
pub trait Presenter {
    /// Redraws the listed cells, all others keep their look.
    fn render(&mut self, cells: &[CellUpdate]);

    fn set_info_text(&mut self, text: &str);
}

/// Summary line shown next to the grid.
pub fn info_text(engine: &GameEngine) -> String {
    match engine.outcome() {
        Outcome::InProgress => format!("{}: {}", FLAG_GLYPH, engine.flags_remaining()),
        Outcome::Won => WIN_TEXT.into(),
        Outcome::Lost => LOSS_TEXT.into(),
    }
}

/// Owns one session and one presenter, routing interaction events between them.
///
/// Rejected moves are logged and otherwise ignored.
#[derive(Debug)]
pub struct Controller<P> {
    engine: GameEngine,
    presenter: P,
}

impl<P: Presenter> Controller<P> {
    pub fn new(size: GridSize, seed: u64, presenter: P) -> Self {
        Self::with_engine(GameEngine::new(size, seed), presenter)
    }

    pub fn with_engine(engine: GameEngine, presenter: P) -> Self {
        let mut controller = Self { engine, presenter };
        controller.redraw();
        controller
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Replaces the session wholesale and redraws the whole grid.
    pub fn restart(&mut self, size: GridSize, seed: u64) {
        self.engine.initialize(size, seed);
        self.redraw();
    }

    /// Reveal request; returns whether anything changed.
    pub fn on_primary_activate(&mut self, index: CellIndex) -> bool {
        match self.engine.activate(index) {
            Ok(activation) if activation.effect.has_update() => {
                self.presenter.render(&activation.updates);
                self.refresh_info();
                true
            }
            Ok(_) => false,
            Err(err) => {
                log::debug!("activate {} ignored: {}", index, err);
                false
            }
        }
    }

    /// Flag toggle request; returns whether anything changed.
    pub fn on_secondary_activate(&mut self, index: CellIndex) -> bool {
        match self.engine.mark(index) {
            Ok(Mark {
                update: Some(update),
                ..
            }) => {
                self.presenter.render(&[update]);
                self.refresh_info();
                true
            }
            Ok(_) => false,
            Err(err) => {
                log::debug!("mark {} ignored: {}", index, err);
                false
            }
        }
    }

    fn redraw(&mut self) {
        let cells: Vec<_> = self.engine.cell_views().collect();
        self.presenter.render(&cells);
        self.refresh_info();
    }

    fn refresh_info(&mut self) {
        let text = info_text(&self.engine);
        self.presenter.set_info_text(&text);
    }
}
