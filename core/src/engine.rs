use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::InProgress
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealEffect {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealEffect {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkEffect {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkEffect {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Result of a primary interaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub effect: RevealEffect,
    pub outcome: Outcome,
    pub updates: Vec<CellUpdate>,
    pub flags_remaining: CellCount,
}

/// Result of a secondary interaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub effect: MarkEffect,
    pub update: Option<CellUpdate>,
    pub flags_remaining: CellCount,
}

/// One minesweeper session on a square grid.
///
/// Mines are placed lazily on the first [`GameEngine::activate`] so that the first revealed cell is never a mine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEngine {
    grid: Grid,
    seed: u64,
    layout: Option<MineLayout>,
    cells: Array2<CellState>,
    opened: BTreeSet<CellIndex>,
    flags_remaining: CellCount,
    outcome: Outcome,
    triggered_mine: Option<CellIndex>,
}

impl GameEngine {
    pub fn new(size: GridSize, seed: u64) -> Self {
        let grid = Grid::new(size);
        log::debug!("new session, side: {}, seed: {}", grid.side(), seed);
        Self {
            grid,
            seed,
            layout: None,
            cells: Array2::default(grid.dim()),
            opened: BTreeSet::new(),
            flags_remaining: 0,
            outcome: Outcome::InProgress,
            triggered_mine: None,
        }
    }

    /// Starts a session on a prearranged layout, as if the first activation already placed the mines.
    pub fn with_layout(layout: MineLayout) -> Self {
        let grid = layout.grid();
        let mut engine = Self::new(GridSize::clamped(grid.side().into()), 0);
        engine.install_layout(layout);
        engine
    }

    /// Drops the whole session and starts over with empty state.
    pub fn initialize(&mut self, size: GridSize, seed: u64) {
        *self = Self::new(size, seed);
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn mines_placed(&self) -> bool {
        self.layout.is_some()
    }

    pub fn layout(&self) -> Option<&MineLayout> {
        self.layout.as_ref()
    }

    /// Mine count of the session, 0 until mines are placed.
    pub fn mine_count(&self) -> CellCount {
        self.layout.as_ref().map_or(0, MineLayout::mine_count)
    }

    pub fn flags_remaining(&self) -> CellCount {
        self.flags_remaining
    }

    pub fn opened_count(&self) -> CellCount {
        self.opened.len() as CellCount
    }

    pub fn is_opened(&self, index: CellIndex) -> bool {
        self.opened.contains(&index)
    }

    pub fn triggered_mine(&self) -> Option<CellIndex> {
        self.triggered_mine
    }

    pub fn cell_state(&self, index: CellIndex) -> Result<CellState> {
        let index = self.grid.validate_index(index)?;
        Ok(self.state_at(index))
    }

    /// The value a cell holds, 0 everywhere before mines are placed.
    pub fn cell_value(&self, index: CellIndex) -> Result<CellValue> {
        let index = self.grid.validate_index(index)?;
        Ok(self.value_at(index))
    }

    /// What the presenter should currently show for a cell.
    pub fn cell_view(&self, index: CellIndex) -> Result<CellUpdate> {
        let index = self.grid.validate_index(index)?;
        Ok(self.view_at(index))
    }

    pub fn cell_views(&self) -> impl Iterator<Item = CellUpdate> + '_ {
        self.grid.indices().map(|index| self.view_at(index))
    }

    pub fn activate(&mut self, index: CellIndex) -> Result<Activation> {
        let index = self.grid.validate_index(index)?;
        self.check_in_progress()?;

        if self.layout.is_none() {
            let layout = RandomLayoutGenerator::new(self.seed).generate(self.grid, index);
            self.install_layout(layout);
        }

        let mut updates = Vec::new();
        let effect = match (self.state_at(index), self.value_at(index)) {
            (CellState::Flagged | CellState::Opened, _) => RevealEffect::NoChange,
            (CellState::Hidden, CellValue::Mine) => {
                self.explode(index, &mut updates);
                RevealEffect::HitMine
            }
            (CellState::Hidden, CellValue::Count(0)) => {
                self.flood_reveal(index, &mut updates);
                self.check_win()
            }
            (CellState::Hidden, CellValue::Count(_)) => {
                self.open_cell(index, &mut updates);
                self.check_win()
            }
        };

        Ok(Activation {
            effect,
            outcome: self.outcome,
            updates,
            flags_remaining: self.flags_remaining,
        })
    }

    pub fn mark(&mut self, index: CellIndex) -> Result<Mark> {
        let index = self.grid.validate_index(index)?;
        self.check_in_progress()?;
        if self.layout.is_none() {
            return Err(GameError::NotStarted);
        }

        let effect = match self.state_at(index) {
            CellState::Opened => MarkEffect::NoChange,
            CellState::Hidden => {
                if self.flags_remaining == 0 {
                    return Err(GameError::NoFlagsLeft);
                }
                self.flags_remaining -= 1;
                self.set_state(index, CellState::Flagged);
                MarkEffect::Flagged
            }
            CellState::Flagged => {
                self.flags_remaining += 1;
                self.set_state(index, CellState::Hidden);
                MarkEffect::Unflagged
            }
        };

        Ok(Mark {
            effect,
            update: effect.has_update().then(|| self.view_at(index)),
            flags_remaining: self.flags_remaining,
        })
    }

    fn install_layout(&mut self, layout: MineLayout) {
        self.flags_remaining = layout.mine_count();
        self.layout = Some(layout);
    }

    /// Opens the zero region connected to `start` along with its numbered border.
    ///
    /// The visited set lives only for this call, later activations start from a clean slate.
    fn flood_reveal(&mut self, start: CellIndex, updates: &mut Vec<CellUpdate>) {
        let mut visited = BTreeSet::from([start]);
        let mut to_visit = VecDeque::from([start]);

        while let Some(index) = to_visit.pop_front() {
            if self.state_at(index) != CellState::Hidden {
                log::trace!("flood skips {} ({:?})", index, self.state_at(index));
                continue;
            }

            let value = self.value_at(index);
            self.open_cell(index, updates);

            if value.is_zero() {
                for neighbor in self.grid.adjacent_indices(index) {
                    if self.value_at(neighbor).is_mine() {
                        continue;
                    }
                    if visited.insert(neighbor) {
                        to_visit.push_back(neighbor);
                    }
                }
            }
        }
        log::trace!("flood from {} visited {} cells", start, visited.len());
    }

    fn open_cell(&mut self, index: CellIndex, updates: &mut Vec<CellUpdate>) {
        self.set_state(index, CellState::Opened);
        self.opened.insert(index);
        updates.push(self.view_at(index));
    }

    fn explode(&mut self, index: CellIndex, updates: &mut Vec<CellUpdate>) {
        log::debug!("mine hit at {}", index);
        self.triggered_mine = Some(index);
        self.outcome = Outcome::Lost;
        updates.extend(self.cell_views());
    }

    fn check_win(&mut self) -> RevealEffect {
        let remaining = self.grid.cell_count() - self.opened_count();
        if self.outcome == Outcome::InProgress && remaining == self.mine_count() {
            log::debug!("won with {} cells opened", self.opened_count());
            self.outcome = Outcome::Won;
            RevealEffect::Won
        } else {
            RevealEffect::Revealed
        }
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.outcome.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn state_at(&self, index: CellIndex) -> CellState {
        self.cells[self.grid.coords_of(index).to_nd_index()]
    }

    fn set_state(&mut self, index: CellIndex, state: CellState) {
        self.cells[self.grid.coords_of(index).to_nd_index()] = state;
    }

    fn value_at(&self, index: CellIndex) -> CellValue {
        self.layout
            .as_ref()
            .map_or_else(CellValue::default, |layout| layout.value_at(index))
    }

    fn view_at(&self, index: CellIndex) -> CellUpdate {
        let value = self.value_at(index);
        let state = self.state_at(index);
        let (display, appearance) = match (self.outcome, state) {
            (Outcome::Lost, _) if self.triggered_mine == Some(index) => {
                (DisplayValue::Mine, Appearance::Triggered)
            }
            (_, CellState::Opened) => (DisplayValue::of_value(value), Appearance::Opened),
            (Outcome::Lost, _) => (DisplayValue::of_value(value), Appearance::Exposed),
            (_, CellState::Flagged) => (DisplayValue::Flag, Appearance::Flagged),
            (_, CellState::Hidden) => (DisplayValue::Blank, Appearance::Hidden),
        };
        CellUpdate {
            index,
            display,
            appearance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(side: u32, mines: &[CellIndex]) -> GameEngine {
        let grid = Grid::new(GridSize::new(side).unwrap());
        GameEngine::with_layout(MineLayout::from_mine_indices(grid, mines.iter().copied()).unwrap())
    }

    #[test]
    fn first_activation_places_mines_and_sets_flags() {
        let mut engine = GameEngine::new(GridSize::clamped(8), 11);
        assert!(!engine.mines_placed());
        assert_eq!(engine.flags_remaining(), 0);

        let activation = engine.activate(0).unwrap();

        assert!(engine.mines_placed());
        assert_eq!(engine.mine_count(), 6);
        assert!(!engine.layout().unwrap().contains_mine(0));
        assert_eq!(activation.flags_remaining, 6);
        assert!(engine.is_opened(0));
        assert_ne!(activation.effect, RevealEffect::HitMine);
    }

    #[test]
    fn mark_before_first_activation_is_rejected() {
        let mut engine = GameEngine::new(GridSize::clamped(8), 11);
        assert_eq!(engine.mark(3), Err(GameError::NotStarted));
        assert_eq!(engine.cell_state(3), Ok(CellState::Hidden));
    }

    #[test]
    fn numbered_cell_opens_alone() {
        let mut engine = engine(6, &[0, 35]);

        let activation = engine.activate(1).unwrap();

        assert_eq!(activation.effect, RevealEffect::Revealed);
        assert_eq!(
            activation.updates,
            [CellUpdate {
                index: 1,
                display: DisplayValue::Count(1),
                appearance: Appearance::Opened,
            }]
        );
        assert_eq!(engine.opened_count(), 1);
    }

    #[test]
    fn flood_reveal_opens_zero_region_and_border() {
        // a wall of mines down column 2 splits the board
        let mut engine = engine(6, &[2, 8, 14, 20, 26, 32]);

        let activation = engine.activate(0).unwrap();

        assert_eq!(activation.effect, RevealEffect::Revealed);
        for row in 0..6u16 {
            assert_eq!(engine.cell_value(row * 6), Ok(CellValue::Count(0)));
            assert!(engine.is_opened(row * 6), "zero cell in row {}", row);
            assert!(engine.is_opened(row * 6 + 1), "border cell in row {}", row);
            assert!(!engine.is_opened(row * 6 + 3));
        }
        assert_eq!(engine.opened_count(), 12);
        assert_eq!(activation.updates.len(), 12);
    }

    #[test]
    fn flood_reveal_never_opens_flagged_cells() {
        let mut engine = engine(6, &[35]);
        engine.activate(28).unwrap();
        assert_eq!(engine.mark(0).unwrap().effect, MarkEffect::Flagged);

        engine.activate(14).unwrap();

        assert_eq!(engine.cell_state(0), Ok(CellState::Flagged));
        assert_eq!(engine.flags_remaining(), 0);
        assert_eq!(engine.outcome(), Outcome::InProgress);
    }

    #[test]
    fn later_activation_still_floods() {
        // two zero regions separated by mines in column 2 and a column of numbers
        let mut engine = engine(7, &[2, 9, 16, 23, 30, 37, 44]);

        engine.activate(0).unwrap();
        let opened_left = engine.opened_count();
        let activation = engine.activate(6).unwrap();

        assert_eq!(opened_left, 14);
        assert!(activation.updates.len() > 1);
        assert!(engine.is_opened(48));
    }

    #[test]
    fn activating_flagged_cell_is_no_op() {
        let mut engine = engine(6, &[0, 35]);
        engine.activate(1).unwrap();
        engine.mark(35).unwrap();

        let activation = engine.activate(35).unwrap();

        assert_eq!(activation.effect, RevealEffect::NoChange);
        assert!(activation.updates.is_empty());
        assert_eq!(engine.outcome(), Outcome::InProgress);
    }

    #[test]
    fn mine_hit_loses_and_exposes_board() {
        let mut engine = engine(6, &[0, 35]);
        engine.activate(1).unwrap();
        engine.mark(14).unwrap();

        let activation = engine.activate(0).unwrap();

        assert_eq!(activation.effect, RevealEffect::HitMine);
        assert_eq!(activation.outcome, Outcome::Lost);
        assert_eq!(activation.updates.len(), 36);
        assert_eq!(engine.triggered_mine(), Some(0));

        let view = |index| engine.cell_view(index).unwrap();
        assert_eq!(view(0).appearance, Appearance::Triggered);
        assert_eq!(view(35).display, DisplayValue::Mine);
        assert_eq!(view(35).appearance, Appearance::Exposed);
        assert_eq!(view(1).appearance, Appearance::Opened);
        assert_eq!(view(14).display, DisplayValue::Blank);
        assert_eq!(view(14).appearance, Appearance::Exposed);
        assert_eq!(view(34).display, DisplayValue::Count(1));
    }

    #[test]
    fn finished_game_rejects_moves() {
        let mut engine = engine(6, &[0, 35]);
        engine.activate(0).unwrap();

        assert_eq!(engine.activate(14), Err(GameError::AlreadyEnded));
        assert_eq!(engine.mark(14), Err(GameError::AlreadyEnded));
        assert_eq!(engine.opened_count(), 0);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut engine = engine(6, &[0]);
        assert_eq!(engine.activate(36), Err(GameError::InvalidIndex));
        assert_eq!(engine.mark(400), Err(GameError::InvalidIndex));
        assert_eq!(engine.cell_view(36), Err(GameError::InvalidIndex));
    }

    #[test]
    fn win_when_only_mines_remain() {
        let mut engine = engine(6, &[0, 1, 2, 35]);

        let activation = engine.activate(20).unwrap();

        assert_eq!(activation.effect, RevealEffect::Won);
        assert_eq!(engine.outcome(), Outcome::Won);
        assert_eq!(engine.opened_count(), 32);
        assert_eq!(engine.cell_view(0).unwrap().appearance, Appearance::Hidden);
    }

    #[test]
    fn flag_counter_tracks_toggles() {
        let mut engine = engine(6, &[0, 35]);
        engine.activate(1).unwrap();
        assert_eq!(engine.flags_remaining(), 2);

        assert_eq!(engine.mark(10).unwrap().flags_remaining, 1);
        assert_eq!(engine.mark(11).unwrap().flags_remaining, 0);
        assert_eq!(engine.mark(12), Err(GameError::NoFlagsLeft));
        assert_eq!(engine.cell_state(12), Ok(CellState::Hidden));

        let unflag = engine.mark(10).unwrap();
        assert_eq!(unflag.effect, MarkEffect::Unflagged);
        assert_eq!(unflag.update, Some(CellUpdate::hidden(10)));
        assert_eq!(unflag.flags_remaining, 1);
    }

    #[test]
    fn marking_opened_cell_changes_nothing() {
        let mut engine = engine(6, &[0, 35]);
        engine.activate(1).unwrap();

        let mark = engine.mark(1).unwrap();

        assert_eq!(mark.effect, MarkEffect::NoChange);
        assert_eq!(mark.update, None);
        assert_eq!(mark.flags_remaining, 2);
    }

    #[test]
    fn mark_twice_restores_cell() {
        let mut engine = engine(6, &[0, 35]);
        engine.activate(1).unwrap();
        let before = (engine.cell_view(20).unwrap(), engine.flags_remaining());

        engine.mark(20).unwrap();
        engine.mark(20).unwrap();

        assert_eq!((engine.cell_view(20).unwrap(), engine.flags_remaining()), before);
    }

    #[test]
    fn initialize_replaces_session() {
        let mut engine = engine(6, &[0, 35]);
        engine.activate(0).unwrap();

        engine.initialize(GridSize::clamped(9), 5);

        assert_eq!(engine.outcome(), Outcome::InProgress);
        assert_eq!(engine.grid().cell_count(), 81);
        assert!(!engine.mines_placed());
        assert_eq!(engine.opened_count(), 0);
        assert_eq!(engine.flags_remaining(), 0);
        assert_eq!(engine.triggered_mine(), None);
    }
}
