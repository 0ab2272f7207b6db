use clap::Args;
use gridsweep_core as game;
use game::{Appearance, CellIndex, CellUpdate, Controller, GridSize, Presenter};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Seed from two `Math.random` draws, 32 bits each.
fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    let half = || (random() * 4_294_967_296.) as u64;
    (half() << 32) | half()
}

/// Reads the grid-size input, anything unparsable falls back to the default side.
fn parse_grid_size(input: &str) -> GridSize {
    input
        .trim()
        .parse::<i64>()
        .map(GridSize::clamped)
        .unwrap_or_default()
}

/// Everything the page shows, kept in sync by the controller.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct BoardModel {
    cells: Vec<CellUpdate>,
    info: String,
}

impl BoardModel {
    fn clear(&mut self) {
        self.cells.clear();
        self.info.clear();
    }
}

impl Presenter for BoardModel {
    fn render(&mut self, cells: &[CellUpdate]) {
        for &cell in cells {
            let index = usize::from(cell.index);
            if index >= self.cells.len() {
                let start = self.cells.len();
                self.cells.extend((start..=index).map(|i| CellUpdate::hidden(i as CellIndex)));
            }
            self.cells[index] = cell;
        }
    }

    fn set_info_text(&mut self, text: &str) {
        text.clone_into(&mut self.info);
    }
}

fn cell_classes(cell: &CellUpdate) -> Classes {
    use Appearance::*;

    classes!(
        "minesweeper__field-cell",
        match cell.appearance {
            Hidden => classes!(),
            Flagged => classes!("flagged"),
            Opened => classes!("opened"),
            Exposed => classes!("exposed"),
            Triggered => classes!("exposed", "triggered"),
        }
    )
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Activate(CellIndex),
    Mark(CellIndex),
    SizeInput(String),
    Start,
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    #[prop_or_default]
    seed: Option<u64>,

    /// Initial grid side, pulled into 6..=25
    #[arg(long)]
    #[prop_or_default]
    size: Option<i64>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    controller: Controller<BoardModel>,
    size_input: String,
    fixed_seed: Option<u64>,
}

impl GameView {
    fn start(&mut self) {
        let size = parse_grid_size(&self.size_input);
        let seed = self.fixed_seed.unwrap_or_else(js_random_seed);
        log::debug!("start side: {}, seed: {}", size.side(), seed);

        self.size_input = size.side().to_string();
        self.controller.presenter_mut().clear();
        self.controller.restart(size, seed);
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let size = props.size.map(GridSize::clamped).unwrap_or_default();
        let seed = props.seed.unwrap_or_else(js_random_seed);

        Self {
            controller: Controller::new(size, seed, BoardModel::default()),
            size_input: size.side().to_string(),
            fixed_seed: props.seed,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Activate(index) => {
                log::debug!("activate cell: {}", index);
                self.controller.on_primary_activate(index)
            }
            Mark(index) => {
                log::debug!("mark cell: {}", index);
                self.controller.on_secondary_activate(index)
            }
            SizeInput(value) => {
                self.size_input = value;
                true
            }
            Start => {
                self.start();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let side = self.controller.engine().grid().side();
        let model = self.controller.presenter();

        let oninput = link.callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::SizeInput(input.value())
        });
        let onstart = link.callback(|_: MouseEvent| Msg::Start);

        html! {
            <div class="minesweeper" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <nav class="minesweeper__controls">
                    <input id="grid-size" type="number" min="6" max="25" value={self.size_input.clone()} {oninput}/>
                    <button id="start" onclick={onstart}>{"Start"}</button>
                </nav>
                <div class="minesweeper__field" style={format!("--rowNum: {}; --colNum: {};", side, side)}>
                    {
                        for model.cells.iter().map(|cell| {
                            let index = cell.index;
                            let onclick = link.callback(move |_: MouseEvent| Msg::Activate(index));
                            let oncontextmenu = link.callback(move |e: MouseEvent| {
                                e.prevent_default();
                                Msg::Mark(index)
                            });
                            html! {
                                <span class={cell_classes(cell)} data-index={index.to_string()} {onclick} {oncontextmenu}>
                                    {cell.display.to_string()}
                                </span>
                            }
                        })
                    }
                </div>
                <div class="minesweeper__info">{model.info.clone()}</div>
            </div>
        }
    }
}
