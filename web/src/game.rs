use crate::result::ResultView;
use crate::settings::DifficultyPicker;
use crate::utils::*;
use bitflags::bitflags;
use clap::Args;
use gloo::timers::callback::Interval;
use saolei_core as game;
use yew::prelude::*;

const TICK_MILLIS: u32 = 1_000;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct CellPointerState {
    pos: game::Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    Update(CellPointerState),
    Leave,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    Tick,
    NewGame,
    SelectDifficulty(game::Difficulty),
    CloseResult,
}

fn cell_label(cell: game::CellView) -> String {
    use game::CellView::*;
    match cell {
        Hidden | Revealed(0) => String::new(),
        Flagged => "🚩".to_string(),
        Revealed(count) => count.to_string(),
        Mine => "💣".to_string(),
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    pos: game::Coord2,
    cell: game::CellView,
    #[prop_or_default]
    triggered: bool,
    #[prop_or_default]
    pressed: bool,
    #[prop_or_default]
    locked: bool,
    callback: Callback<CellMsg>,
}

#[function_component(Tile)]
fn cell_component(props: &CellProps) -> Html {
    use game::CellView::*;

    let CellProps {
        pos,
        cell,
        triggered,
        pressed,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell {
            Hidden => classes!(),
            Flagged => classes!("flag"),
            Revealed(count) => classes!("open", format!("num-{}", count)),
            Mine => classes!("open", "mine"),
        }
    );
    if triggered {
        class.push("oops");
    }
    if pressed {
        class.push("open");
    }
    if locked {
        class.push("locked");
    }

    let pointer_callback = |what: &'static str| {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(CellMsg::Update(CellPointerState { pos, buttons }));
            log::trace!("{:?} mouse {} ({:?})", pos, what, buttons);
        })
    };
    let onmousedown = pointer_callback("down");
    let onmouseup = pointer_callback("up");
    let onmouseenter = pointer_callback("enter");

    let onmouseleave = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            callback.emit(CellMsg::Leave);
            log::trace!("{:?} mouse leave", pos);
        })
    };

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseenter} {onmouseleave}>{cell_label(cell)}</td>
    }
}

#[derive(Args, Properties, Debug, Clone, Default, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random, every new game reuses it
    #[arg(short, long)]
    #[prop_or_default]
    pub seed: Option<u64>,

    /// Board to start with: small, medium or large
    #[arg(short, long)]
    #[prop_or_default]
    pub difficulty: Option<game::Difficulty>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    session: game::Session,
    difficulty: game::Difficulty,
    forced_seed: Option<u64>,
    current_cell_state: Option<CellPointerState>,
    result_open: bool,
    timer: Option<Interval>,
}

impl GameView {
    fn next_seed(&self) -> u64 {
        self.forced_seed.unwrap_or_else(js_random_seed)
    }

    fn new_game(&mut self) {
        // dropping the interval cancels it
        self.timer = None;
        self.result_open = false;
        self.current_cell_state = None;
        let seed = self.next_seed();
        log::debug!("new {} game, seed: {}", self.difficulty, seed);
        self.session.restart(self.difficulty, seed);
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(TICK_MILLIS, move || link.send_message(Msg::Tick))
    }

    /// Keeps exactly one interval alive while the session's stopwatch runs.
    fn sync_timer(&mut self, ctx: &Context<Self>) {
        match (self.session.timer_running(), self.timer.is_some()) {
            (true, false) => {
                log::debug!("timer started");
                self.timer = Some(Self::create_timer(ctx));
            }
            (false, true) => {
                log::debug!("timer stopped at {}s", self.session.elapsed_secs());
                self.timer = None;
            }
            _ => {}
        }
    }

    fn reveal_cell(&mut self, pos: game::Coord2) {
        use game::RevealOutcome::*;

        let outcome = self.session.reveal(pos);
        if outcome.has_update() {
            log::debug!("reveal {:?}: {:?}", pos, outcome);
        }
        if matches!(outcome, HitMine | Won) {
            self.result_open = true;
        }
    }

    fn mark_cell(&mut self, pos: game::Coord2) {
        if self.session.toggle_flag(pos).has_update() {
            log::debug!("flag toggled at {:?}, {} mines left", pos, self.session.mines_left());
        }
    }

    fn on_cell_event(&mut self, msg: CellMsg) -> bool {
        match msg {
            CellMsg::Leave => self.current_cell_state.take().is_some(),
            CellMsg::Update(cell_state) if cell_state.buttons.is_empty() => {
                // all buttons released over cell_state.pos, act on what was held before
                match self.current_cell_state.take() {
                    None => false,
                    Some(CellPointerState { pos, buttons }) => {
                        match buttons {
                            MouseButtons::LEFT => self.reveal_cell(pos),
                            MouseButtons::RIGHT => self.mark_cell(pos),
                            // several buttons released together cancel the click
                            _ => {}
                        }
                        // the pressed look goes away either way
                        true
                    }
                }
            }
            CellMsg::Update(cell_state) => match self.current_cell_state.replace(cell_state) {
                None => true,
                Some(CellPointerState { pos, buttons }) => {
                    pos != cell_state.pos
                        || (buttons & MouseButtons::LEFT) != (cell_state.buttons & MouseButtons::LEFT)
                }
            },
        }
    }

    fn is_mid_open(&self) -> bool {
        matches!(
            self.current_cell_state,
            Some(CellPointerState {
                buttons: MouseButtons::LEFT,
                ..
            })
        )
    }

    fn is_pressed(&self, pos: game::Coord2, cell: game::CellView) -> bool {
        !self.session.is_game_over()
            && cell == game::CellView::Hidden
            && matches!(
                self.current_cell_state,
                Some(CellPointerState {
                    pos: held,
                    buttons: MouseButtons::LEFT,
                }) if held == pos
            )
    }

    fn face_class(&self) -> Classes {
        use game::SessionState::*;

        classes!(match self.session.state() {
            Ready | Active if self.is_mid_open() => "mid-open",
            Ready => "not-started",
            Active => "in-progress",
            Won => "win",
            Lost => "lose",
        })
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let GameProps { seed, difficulty } = ctx.props().clone();
        let difficulty = difficulty.unwrap_or_default();
        let session = game::Session::new(difficulty, seed.unwrap_or_else(js_random_seed));

        Self {
            session,
            difficulty,
            forced_seed: seed,
            current_cell_state: None,
            result_open: false,
            timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            CellEvent(cell_msg) => self.on_cell_event(cell_msg),
            Tick => self.session.tick(),
            NewGame => {
                self.new_game();
                true
            }
            SelectDifficulty(difficulty) => {
                self.difficulty = difficulty;
                self.new_game();
                true
            }
            CloseResult => std::mem::take(&mut self.result_open),
        };

        self.sync_timer(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let snapshot = self.session.snapshot();
        let size = snapshot.size;
        let playable = !self.session.is_game_over();
        let mines_left = format_for_counter(snapshot.mines_left);
        let elapsed_time = format_for_counter(i32::try_from(snapshot.elapsed_secs).unwrap_or(i32::MAX));

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_select = ctx.link().callback(SelectDifficulty);
        let cb_play_again = ctx.link().callback(|_| NewGame);
        let cb_close = ctx.link().callback(|_| CloseResult);

        html! {
            <div class="saolei" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <header>
                    <DifficultyPicker selected={self.difficulty} on_select={cb_select}/>
                </header>
                <nav>
                    <aside title="Mines left">{mines_left}</aside>
                    <span><button class={self.face_class()} onclick={cb_new_game}/></span>
                    <aside title="Seconds">{elapsed_time}</aside>
                </nav>
                <table class={playable.then_some("playable")}>
                    {
                        for (0..size).map(|row| html! {
                            <tr>
                                {
                                    for (0..size).map(|col| {
                                        let pos = (row, col);
                                        let cell = snapshot.cell(pos);
                                        let triggered = snapshot.is_triggered(pos);
                                        let locked = !playable || !cell.is_unrevealed();
                                        let pressed = self.is_pressed(pos, cell);
                                        let callback = ctx.link().callback(CellEvent);
                                        html! {
                                            <Tile {pos} {cell} {triggered} {pressed} {locked} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <Modal>
                    <ResultView
                        outcome={snapshot.outcome}
                        open={self.result_open}
                        on_play_again={cb_play_again}
                        on_close={cb_close}
                    />
                </Modal>
            </div>
        }
    }
}
