use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No primary click yet, so no mines either.
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
enum LayoutSource {
    Random { seed: u64 },
    Preset(MineLayout),
}

/// One round of play, from the empty board to a win or a loss.
///
/// Mines are placed lazily by the first primary click so that the clicked cell and its neighbors are never mined.
/// Once the session is finished every gameplay operation is a no-op; start over with [`Session::restart`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    config: GameConfig,
    difficulty: Option<Difficulty>,
    source: LayoutSource,
    board: Array2<Cell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: SessionState,
    first_click_done: bool,
    triggered_mine: Option<Coord2>,
    stopwatch: Stopwatch,
}

impl Session {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let mut session = Self::blank(difficulty.config(), LayoutSource::Random { seed });
        session.difficulty = Some(difficulty);
        session
    }

    /// Session for a config outside the difficulty table.
    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self> {
        let config = GameConfig::new(config.size, config.mines)?;
        Ok(Self::blank(config, LayoutSource::Random { seed }))
    }

    /// Session over a known layout, applied as given on the first click.
    ///
    /// The layout is not moved away from the first click, so unlike random sessions
    /// the opening reveal may hit a mine. Meant for replays and fixed scenarios.
    pub fn with_layout(layout: MineLayout) -> Self {
        Self::blank(layout.game_config(), LayoutSource::Preset(layout))
    }

    /// Discards this session, whatever state it was in, and starts an empty one.
    pub fn restart(&mut self, difficulty: Difficulty, seed: u64) {
        *self = Self::new(difficulty, seed);
    }

    fn blank(config: GameConfig, source: LayoutSource) -> Self {
        log::debug!(
            "new session: {0}x{0} with {1} mines",
            config.size,
            config.mines
        );
        Self {
            config,
            difficulty: None,
            source,
            board: Array2::default((config.size, config.size).to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            state: SessionState::Ready,
            first_click_done: false,
            triggered_mine: None,
            stopwatch: Stopwatch::new(),
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn size(&self) -> Coord {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn mines_left(&self) -> i32 {
        i32::from(self.config.mines) - i32::from(self.flagged_count)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_finished()
    }

    pub fn first_click_done(&self) -> bool {
        self.first_click_done
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.stopwatch.elapsed_secs()
    }

    /// Whether the presentation layer should keep a one-second tick scheduled.
    pub fn timer_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn outcome(&self) -> Outcome {
        match self.state {
            SessionState::Ready | SessionState::Active => Outcome::None,
            SessionState::Won => Outcome::Win {
                elapsed_secs: self.elapsed_secs(),
            },
            SessionState::Lost => Outcome::Loss,
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.to_nd_index()]
    }

    pub fn cell_view(&self, coords: Coord2) -> CellView {
        self.cell_at(coords).view()
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_mine
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.size(),
            cells: self.board.map(|cell| cell.view()),
            mines_left: self.mines_left(),
            elapsed_secs: self.elapsed_secs(),
            outcome: self.outcome(),
            triggered_mine: self.triggered_mine,
        }
    }

    /// Advances the elapsed-time counter, returns whether it moved.
    pub fn tick(&mut self) -> bool {
        self.stopwatch.tick()
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(coords) = self.checked(coords) else {
            return RevealOutcome::NoChange;
        };

        let cell = self.cell_at(coords);
        if self.is_game_over() || cell.flagged || cell.revealed {
            return RevealOutcome::NoChange;
        }

        if !self.first_click_done {
            self.first_click_done = true;
            self.place_mines(coords);
            self.state = SessionState::Active;
            self.stopwatch.start();
        }

        if self.has_mine_at(coords) {
            self.detonate(coords);
            return RevealOutcome::HitMine;
        }

        self.flood_reveal(coords);

        if self.revealed_count == self.config.safe_cells() {
            self.stopwatch.stop();
            self.state = SessionState::Won;
            log::info!("cleared the board in {} seconds", self.elapsed_secs());
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        let Some(coords) = self.checked(coords) else {
            return MarkOutcome::NoChange;
        };

        if self.is_game_over() {
            return MarkOutcome::NoChange;
        }

        let cell = &mut self.board[coords.to_nd_index()];
        if cell.revealed {
            return MarkOutcome::NoChange;
        }

        cell.flagged = !cell.flagged;
        if cell.flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        MarkOutcome::Changed
    }

    fn checked(&self, coords: Coord2) -> Option<Coord2> {
        if in_bounds(coords, self.size()) {
            Some(coords)
        } else {
            log::warn!(
                "ignoring {:?}, outside the {1}x{1} board",
                coords,
                self.size()
            );
            None
        }
    }

    fn place_mines(&mut self, first_click: Coord2) {
        let layout = match &self.source {
            LayoutSource::Random { seed } => {
                RandomLayoutGenerator::new(*seed, first_click).generate(self.config)
            }
            LayoutSource::Preset(layout) => layout.clone(),
        };

        for pos in iter_coords(self.size()) {
            let cell = &mut self.board[pos.to_nd_index()];
            cell.is_mine = layout.contains_mine(pos);
            if !cell.is_mine {
                cell.adjacent_mines = layout.adjacent_mine_count(pos);
            }
        }

        debug_assert_eq!(layout.mine_count(), self.config.mines);
        log::debug!("placed {} mines around {:?}", layout.mine_count(), first_click);
    }

    /// Reveals `start` and, through zero cells, its whole zero region plus the numbered ring around it.
    fn flood_reveal(&mut self, start: Coord2) {
        let size = self.size();
        let mut to_visit = VecDeque::from([start]);
        let mut opened: CellCount = 0;

        while let Some(pos) = to_visit.pop_front() {
            let cell = &mut self.board[pos.to_nd_index()];
            if cell.revealed || cell.flagged || cell.is_mine {
                continue;
            }

            cell.revealed = true;
            let adjacent_mines = cell.adjacent_mines;
            self.revealed_count += 1;
            opened += 1;

            if adjacent_mines == 0 {
                to_visit.extend(neighbors(pos, size).filter(|&next| {
                    let next = self.board[next.to_nd_index()];
                    !next.revealed && !next.flagged
                }));
            }
        }

        log::trace!("opened {} cells from {:?}", opened, start);
    }

    /// Loss: every mine is shown, flags on mines are lifted.
    fn detonate(&mut self, coords: Coord2) {
        self.triggered_mine = Some(coords);

        for cell in self.board.iter_mut() {
            if !cell.is_mine || cell.revealed {
                continue;
            }
            if cell.flagged {
                cell.flagged = false;
                self.flagged_count -= 1;
            }
            cell.revealed = true;
            self.revealed_count += 1;
        }

        self.stopwatch.stop();
        self.state = SessionState::Lost;
        log::info!("hit a mine at {:?}", coords);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn preset(size: Coord, mines: &[Coord2]) -> Session {
        Session::with_layout(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    /// 8x8 with 10 scattered mines, (7, 7) can only be opened directly.
    fn small_preset() -> Session {
        preset(
            8,
            &[
                (0, 7),
                (1, 5),
                (2, 2),
                (3, 6),
                (4, 0),
                (4, 4),
                (5, 2),
                (6, 6),
                (7, 1),
                (7, 4),
            ],
        )
    }

    fn brute_adjacent(session: &Session, (row, col): Coord2) -> u8 {
        let size = i16::from(session.size());
        let mut count = 0;
        for dr in -1i16..=1 {
            for dc in -1i16..=1 {
                let (r, c) = (i16::from(row) + dr, i16::from(col) + dc);
                if (dr, dc) == (0, 0) || !(0..size).contains(&r) || !(0..size).contains(&c) {
                    continue;
                }
                if session.has_mine_at((r as Coord, c as Coord)) {
                    count += 1;
                }
            }
        }
        count
    }

    fn assert_invariants(session: &Session) {
        let cells: Vec<Cell> = iter_coords(session.size())
            .map(|pos| session.cell_at(pos))
            .collect();

        let revealed = cells.iter().filter(|cell| cell.is_revealed()).count();
        let flagged = cells.iter().filter(|cell| cell.is_flagged()).count();
        assert_eq!(revealed, usize::from(session.revealed_count()));
        assert_eq!(flagged, usize::from(session.flagged_count()));
        assert!(cells.iter().all(|cell| !(cell.is_flagged() && cell.is_revealed())));

        if session.first_click_done() {
            let mines = cells.iter().filter(|cell| cell.is_mine()).count();
            assert_eq!(mines, usize::from(session.total_mines()));
            for pos in iter_coords(session.size()) {
                if !session.has_mine_at(pos) {
                    assert_eq!(session.cell_at(pos).adjacent_mines(), brute_adjacent(session, pos));
                }
            }
        }

        if session.state() == SessionState::Won {
            assert!(cells.iter().all(|cell| !(cell.is_mine() && cell.is_revealed())));
        }
    }

    #[test]
    fn new_session_is_empty() {
        let session = Session::new(Difficulty::Large, 1);

        assert_eq!(session.size(), 12);
        assert_eq!(session.total_mines(), 22);
        assert_eq!(session.mines_left(), 22);
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.outcome(), Outcome::None);
        assert!(!session.timer_running());
        assert!(iter_coords(12).all(|pos| session.cell_at(pos) == Cell::default()));
    }

    #[test]
    fn first_click_zone_is_never_mined() {
        for difficulty in Difficulty::ALL {
            let last = difficulty.config().size - 1;
            for first_click in [(0, 0), (last, 0), (last, last), (4, 5)] {
                for seed in 0..24 {
                    let mut session = Session::new(difficulty, seed);
                    let outcome = session.reveal(first_click);

                    assert_ne!(outcome, RevealOutcome::HitMine);
                    assert_eq!(session.cell_view(first_click), CellView::Revealed(0));
                    assert!(
                        block(first_click, session.size()).all(|pos| !session.has_mine_at(pos))
                    );
                    assert_invariants(&session);
                }
            }
        }
    }

    #[test]
    fn adjacency_matches_hand_built_layout() {
        // * . . . .
        // . . . * .
        // . . . . .
        // * . . . .
        // . * . . *
        let mut session = preset(5, &[(0, 0), (1, 3), (3, 0), (4, 1), (4, 4)]);
        session.reveal((2, 2));

        let expected = [
            [9, 1, 1, 1, 1],
            [1, 1, 1, 9, 1],
            [1, 1, 1, 1, 1],
            [9, 2, 1, 1, 1],
            [2, 9, 1, 1, 9],
        ];
        for (row, line) in expected.iter().enumerate() {
            for (col, &count) in line.iter().enumerate() {
                let pos = (row as Coord, col as Coord);
                let cell = session.cell_at(pos);
                if count == 9 {
                    assert!(cell.is_mine(), "{pos:?} should be a mine");
                } else {
                    assert_eq!(cell.adjacent_mines(), count, "at {pos:?}");
                }
            }
        }
    }

    #[test]
    fn flood_fill_stops_at_numbered_ring() {
        // a wall of mines in column 3 splits the board
        let wall: Vec<Coord2> = (0..6).map(|row| (row, 3)).collect();
        let mut session = preset(6, &wall);

        assert_eq!(session.reveal((0, 0)), RevealOutcome::Revealed);

        for row in 0..6 {
            assert_eq!(session.cell_view((row, 0)), CellView::Revealed(0));
            assert_eq!(session.cell_view((row, 1)), CellView::Revealed(0));
            let edge = if row == 0 || row == 5 { 2 } else { 3 };
            assert_eq!(session.cell_view((row, 2)), CellView::Revealed(edge));
            for col in 3..6 {
                assert_eq!(session.cell_view((row, col)), CellView::Hidden);
            }
        }
        assert_eq!(session.revealed_count(), 18);
        assert_invariants(&session);
    }

    #[test]
    fn flood_fill_leaves_flags_alone() {
        let mut session = preset(5, &[(4, 4)]);
        session.toggle_flag((0, 2));

        session.reveal((0, 0));

        assert_eq!(session.cell_view((0, 2)), CellView::Flagged);
        assert_eq!(session.cell_view((0, 4)), CellView::Revealed(0));
        assert_eq!(session.revealed_count(), 23);
        assert_eq!(session.state(), SessionState::Active);
        assert_invariants(&session);
    }

    #[test]
    fn second_reveal_of_same_cell_changes_nothing() {
        let mut session = small_preset();
        session.reveal((0, 0));
        assert_eq!(session.reveal((7, 7)), RevealOutcome::Revealed);

        let before = session.clone();
        assert_eq!(session.reveal((7, 7)), RevealOutcome::NoChange);
        assert_eq!(session, before);
    }

    #[test]
    fn flags_and_reveals_exclude_each_other() {
        let mut session = small_preset();
        session.reveal((0, 0));

        assert_eq!(session.toggle_flag((0, 0)), MarkOutcome::NoChange);

        assert_eq!(session.toggle_flag((7, 7)), MarkOutcome::Changed);
        assert_eq!(session.reveal((7, 7)), RevealOutcome::NoChange);
        assert_eq!(session.cell_view((7, 7)), CellView::Flagged);
        assert_eq!(session.mines_left(), 9);

        assert_eq!(session.toggle_flag((7, 7)), MarkOutcome::Changed);
        assert_eq!(session.mines_left(), 10);
        assert_eq!(session.reveal((7, 7)), RevealOutcome::Revealed);
    }

    #[test]
    fn mines_left_can_go_negative() {
        let mut session = preset(4, &[(3, 3)]);
        for col in 0..3 {
            session.toggle_flag((0, col));
        }
        assert_eq!(session.mines_left(), -2);
        assert_eq!(session.snapshot().mines_left, -2);
    }

    #[test]
    fn flagging_before_first_click_is_allowed() {
        let mut session = Session::new(Difficulty::Small, 5);
        assert_eq!(session.toggle_flag((7, 7)), MarkOutcome::Changed);
        assert!(!session.first_click_done());

        session.reveal((0, 0));
        assert_invariants(&session);
    }

    #[test]
    fn revealing_every_safe_cell_wins() {
        let mut session = small_preset();
        assert_eq!(session.reveal((0, 0)), RevealOutcome::Revealed);
        assert!(session.timer_running());
        assert!(session.tick());
        assert!(session.tick());

        let safe: Vec<Coord2> = iter_coords(8).filter(|&pos| !session.has_mine_at(pos)).collect();
        assert_eq!(safe.len(), 54);

        let mut wins = 0;
        for &pos in &safe {
            match session.reveal(pos) {
                RevealOutcome::Won => wins += 1,
                RevealOutcome::HitMine => panic!("{pos:?} is not a mine"),
                RevealOutcome::Revealed | RevealOutcome::NoChange if wins == 0 => {
                    assert_eq!(session.outcome(), Outcome::None)
                }
                _ => {}
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(session.revealed_count(), 54);
        assert_eq!(session.outcome(), Outcome::Win { elapsed_secs: 2 });
        assert!(!session.timer_running());
        assert!(!session.tick());
        assert_invariants(&session);
    }

    #[test]
    fn single_click_can_win() {
        let mut session = preset(4, &[(3, 3)]);
        assert_eq!(session.reveal((0, 0)), RevealOutcome::Won);
        assert_eq!(session.outcome(), Outcome::Win { elapsed_secs: 0 });
    }

    #[test]
    fn hitting_a_mine_loses_and_shows_all_mines() {
        let mut session = small_preset();
        session.reveal((0, 0));
        session.toggle_flag((0, 7));
        session.toggle_flag((7, 7));
        session.tick();

        assert_eq!(session.reveal((4, 4)), RevealOutcome::HitMine);

        assert_eq!(session.state(), SessionState::Lost);
        assert_eq!(session.outcome(), Outcome::Loss);
        assert_eq!(session.triggered_mine(), Some((4, 4)));
        assert!(!session.timer_running());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.count(CellView::Mine), 10);
        assert_eq!(snapshot.cell((0, 7)), CellView::Mine);
        assert_eq!(snapshot.cell((7, 7)), CellView::Flagged);
        assert!(snapshot.is_triggered((4, 4)));
        assert_eq!(snapshot.elapsed_secs, 1);
        assert_invariants(&session);
    }

    #[test]
    fn finished_session_ignores_everything() {
        let mut lost = small_preset();
        lost.reveal((0, 0));
        lost.reveal((2, 2));

        let mut won = preset(4, &[(3, 3)]);
        won.reveal((0, 0));

        for session in [&mut lost, &mut won] {
            assert!(session.is_game_over());
            let before = session.clone();
            for pos in iter_coords(session.size()) {
                assert_eq!(session.reveal(pos), RevealOutcome::NoChange);
                assert_eq!(session.toggle_flag(pos), MarkOutcome::NoChange);
            }
            assert!(!session.tick());
            assert_eq!(*session, before);
        }
    }

    #[test]
    fn restart_resets_everything() {
        let mut session = small_preset();
        session.reveal((0, 0));
        session.toggle_flag((7, 7));
        session.reveal((4, 4));
        assert!(session.is_game_over());

        session.restart(Difficulty::Medium, 9);

        assert_eq!(session.size(), 10);
        assert_eq!(session.difficulty(), Some(Difficulty::Medium));
        assert_eq!(session.revealed_count(), 0);
        assert_eq!(session.flagged_count(), 0);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.outcome(), Outcome::None);
        assert_eq!(session.triggered_mine(), None);
        assert!(!session.first_click_done());
        assert!(!session.tick());
        assert!(iter_coords(10).all(|pos| session.cell_at(pos) == Cell::default()));
    }

    #[test]
    fn preset_layout_is_not_moved_from_first_click() {
        let mut session = preset(3, &[(1, 1)]);

        assert_eq!(session.reveal((1, 1)), RevealOutcome::HitMine);
        assert_eq!(session.state(), SessionState::Lost);
        assert_eq!(session.triggered_mine(), Some((1, 1)));
        assert_eq!(session.total_mines(), 1);
        assert_invariants(&session);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut session = Session::new(Difficulty::Small, 0);
        let before = session.clone();

        assert_eq!(session.reveal((8, 0)), RevealOutcome::NoChange);
        assert_eq!(session.toggle_flag((0, 200)), MarkOutcome::NoChange);
        assert_eq!(session, before);
    }

    #[test]
    fn custom_config_is_validated() {
        let config = GameConfig::new_unchecked(5, 20);
        assert_eq!(
            Session::with_config(config, 0),
            Err(GameError::TooManyMines { max: 16 })
        );
        assert_eq!(
            Session::with_config(GameConfig::new_unchecked(5, 0), 0),
            Err(GameError::NoMines)
        );

        let mut dense = Session::with_config(GameConfig::new_unchecked(5, 16), 0).unwrap();
        assert_eq!(dense.difficulty(), None);
        assert_eq!(dense.reveal((2, 2)), RevealOutcome::Won);
    }

    #[test]
    fn random_play_keeps_invariants() {
        for seed in 0..40 {
            let difficulty = Difficulty::ALL[seed as usize % 3];
            let mut session = Session::new(difficulty, seed);
            let mut rng = SmallRng::seed_from_u64(seed);
            let size = session.size();

            while !session.is_game_over() {
                let pos = (rng.random_range(0..size), rng.random_range(0..size));
                if rng.random_bool(0.2) {
                    session.toggle_flag(pos);
                } else {
                    session.reveal(pos);
                }
                session.tick();
                assert_invariants(&session);
            }

            let frozen = session.clone();
            session.reveal((0, 0));
            session.toggle_flag((0, 0));
            assert_eq!(session, frozen);
        }
    }
}
