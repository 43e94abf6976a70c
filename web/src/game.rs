use crate::audio::DomAudio;
use crate::settings::{self, AudioControls, SettingsView};
use crate::utils::*;
use chrono::prelude::*;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use memory_quest_core as game;
use game::AudioSink;
use yew::prelude::*;

fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewGameState {
    Ready,
    Active,
    Resolving,
    Won,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GameSession {
    pub engine: game::RoundEngine,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    fn new(deck: game::Deck) -> Self {
        Self {
            engine: game::RoundEngine::new(deck),
            started_at: None,
            ended_at: None,
        }
    }

    fn restart(&mut self, deck: game::Deck) {
        self.engine.restart(deck);
        self.started_at = None;
        self.ended_at = None;
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    fn view_state(&self) -> ViewGameState {
        use game::EngineState::*;
        match self.engine.state() {
            Ready => ViewGameState::Ready,
            Active if self.engine.is_locked() => ViewGameState::Resolving,
            Active => ViewGameState::Active,
            Won => ViewGameState::Won,
        }
    }

    fn flip(&mut self, id: game::CardId, now: DateTime<Utc>) -> game::FlipOutcome {
        let outcome = self.engine.flip(id);
        if outcome.has_update() {
            self.on_successful_move(now);
        }
        outcome
    }

    fn on_successful_move(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if self.engine.is_finished() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Flip(game::CardId),
    Resolve(game::ResolveToken),
    UpdateTime,
    NewGame,
    SetBoardSize(game::CardCount),
    ToggleMute,
    SetVolume(f32),
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    id: game::CardId,
    face: game::CardFace,
    #[prop_or_default]
    locked: bool,
    callback: Callback<game::CardId>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    use game::CardFace::*;

    let CardProps {
        id,
        face,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "card",
        match face {
            Hidden => classes!(),
            Flipped(_) => classes!("flipped"),
            Matched(_) => classes!("flipped", "matched"),
        }
    );
    if locked {
        class.push("locked");
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", id);
        callback.emit(id);
    });

    html! {
        <div {class} {onclick}>
            if let Some(face) = face.face() {
                <img src={face.asset()} alt="card"/>
            } else {
                <div class="card-back"/>
            }
        </div>
    }
}

#[derive(Args, Properties, Debug, Clone, Default, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed for the first deal instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// How many cards to deal at startup
    #[arg(short, long)]
    pub cards: Option<game::CardCount>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    settings: settings::Settings,
    game: GameSession,
    prev_time: u32,
    audio: DomAudio,
    pending_resolution: Option<Timeout>,
    _timer_interval: Interval,
}

impl GameView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }

    fn schedule_resolution(&mut self, ctx: &Context<Self>, token: game::ResolveToken) {
        let link = ctx.link().clone();
        let delay = game::RESOLUTION_DELAY.as_millis() as u32;
        self.pending_resolution = Some(Timeout::new(delay, move || {
            link.send_message(Msg::Resolve(token))
        }));
    }

    fn new_game(&mut self) {
        // dropping the handle cancels the browser timer, the generation bump covers anything already queued
        self.pending_resolution = None;
        let deck = game::deal(self.settings.board, js_random_seed());
        self.game.restart(deck);
        log::debug!(
            "new game: {} cards, round {}",
            self.settings.board.cards(),
            self.game.engine.generation()
        );
    }

    fn get_time(&self) -> u32 {
        self.game.elapsed_secs(utc_now())
    }

    fn get_game_state_class(&self) -> Classes {
        classes!(match self.game.view_state() {
            ViewGameState::Ready => "not-started",
            ViewGameState::Active => "in-progress",
            ViewGameState::Resolving => "resolving",
            ViewGameState::Won => "win",
        })
    }

    fn view_board(&self, ctx: &Context<Self>) -> Html {
        let engine = &self.game.engine;
        let callback = ctx.link().callback(Msg::Flip);

        html! {
            <div class={classes!("game-board", self.get_game_state_class())}>
                {
                    for engine.deck().cards().iter().map(|card| {
                        let id = card.id;
                        let face = engine.card_at(id);
                        let locked = !engine.can_flip(id);
                        let callback = callback.clone();
                        html! {
                            <CardView key={id} {id} {face} {locked} {callback}/>
                        }
                    })
                }
            </div>
        }
    }

    fn view_victory(&self, ctx: &Context<Self>) -> Html {
        let engine = &self.game.engine;
        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });

        html! {
            <Modal>
                <dialog class="victory" open={true}>
                    <h1>{"You won your freedom!"}</h1>
                    <p>{format!("Score: {}", engine.matched_count())}</p>
                    <p>{format!("Moves: {}", engine.move_count())}</p>
                    <p>{format!("Time: {}", format_for_counter(self.get_time()))}</p>
                    <button onclick={cb_new_game}>{"Play Again ?"}</button>
                </dialog>
            </Modal>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let mut settings = settings::Settings::default();
        if let Some(cards) = props.cards {
            settings.board = game::BoardConfig::new(cards);
        }
        let seed = props.seed.unwrap_or_else(js_random_seed);
        log::debug!("first deal: {} cards, seed {}", settings.board.cards(), seed);

        Self {
            settings,
            game: GameSession::new(game::deal(settings.board, seed)),
            prev_time: 0,
            audio: DomAudio::new(settings.music),
            pending_resolution: None,
            _timer_interval: GameView::create_timer(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Flip(id) => {
                let outcome = self.game.flip(id, utc_now());
                self.audio.play_outcome(outcome);
                if let Some(token) = outcome.pending_resolution() {
                    self.schedule_resolution(ctx, token);
                }
                outcome.has_update()
            }
            Resolve(token) => {
                let outcome = self.game.engine.resolve(token);
                if outcome.has_update() {
                    self.pending_resolution = None;
                }
                outcome.has_update()
            }
            UpdateTime => {
                let time = self.get_time();
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            NewGame => {
                self.new_game();
                true
            }
            SetBoardSize(cards) => {
                self.settings.board = game::BoardConfig::new(cards);
                self.new_game();
                true
            }
            ToggleMute => {
                self.settings.music.toggle_mute();
                self.audio.apply_music(self.settings.music);
                true
            }
            SetVolume(volume) => {
                self.settings.music.set_volume(volume);
                self.audio.apply_music(self.settings.music);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let engine = &self.game.engine;
        let moves = format_for_counter(engine.move_count().into());
        let elapsed_time = format_for_counter(self.get_time());

        let on_board_size = ctx.link().callback(SetBoardSize);
        let on_restart = ctx.link().callback(|_: ()| NewGame);
        let on_toggle_mute = ctx.link().callback(|_: ()| ToggleMute);
        let on_volume = ctx.link().callback(SetVolume);

        html! {
            <div class="memory-quest">
                <header>
                    <h1>{"Dungeon Memory Quest"}</h1>
                </header>
                <SettingsView board={self.settings.board} {on_board_size} {on_restart}/>
                <nav>
                    <aside>{moves}</aside>
                    <span>{format!("{} / {}", engine.matched_count(), engine.total_pairs())}</span>
                    <aside>{elapsed_time}</aside>
                </nav>
                { self.view_board(ctx) }
                <AudioControls music={self.settings.music} {on_toggle_mute} {on_volume}/>
                if engine.is_finished() {
                    { self.view_victory(ctx) }
                }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(secs * 1000).unwrap()
    }

    fn session() -> GameSession {
        let face = |i| game::Face::from_catalog(i).unwrap();
        let deck = game::Deck::from_faces([face(0), face(1), face(1), face(0)]).unwrap();
        GameSession::new(deck)
    }

    #[test]
    fn clock_starts_on_first_flip_and_stops_at_win() {
        let mut session = session();
        assert_eq!(session.elapsed_secs(t(5)), 0);
        assert_eq!(session.view_state(), ViewGameState::Ready);

        assert_eq!(session.flip(0, t(10)), game::FlipOutcome::Flipped);
        assert_eq!(session.flip(3, t(12)), game::FlipOutcome::Matched);
        assert_eq!(session.elapsed_secs(t(15)), 5);

        session.flip(1, t(20));
        assert_eq!(session.flip(2, t(21)), game::FlipOutcome::Won);

        assert_eq!(session.view_state(), ViewGameState::Won);
        assert_eq!(session.elapsed_secs(t(100)), 11);
    }

    #[test]
    fn ignored_clicks_do_not_start_the_clock() {
        let mut session = session();

        assert_eq!(session.flip(200, t(1)), game::FlipOutcome::NoChange);
        assert_eq!(session.started_at, None);
        assert_eq!(session.elapsed_secs(t(4)), 0);
        assert_eq!(session.view_state(), ViewGameState::Ready);

        assert_eq!(session.flip(0, t(2)), game::FlipOutcome::Flipped);
        assert_eq!(session.flip(0, t(3)), game::FlipOutcome::NoChange);
        assert_eq!(session.started_at, Some(t(2)));
        assert_eq!(session.elapsed_secs(t(7)), 5);
    }

    #[test]
    fn clicks_during_resolution_are_absorbed() {
        let mut session = session();
        session.flip(0, t(1));
        session.flip(1, t(2));

        assert_eq!(session.view_state(), ViewGameState::Resolving);
        assert_eq!(session.flip(2, t(3)), game::FlipOutcome::NoChange);
        assert_eq!(session.engine.flipped(), [0, 1]);
    }

    #[test]
    fn restart_clears_the_clock_and_invalidates_pending_resolution() {
        let mut session = session();
        session.flip(0, t(1));
        let token = session.flip(1, t(2)).pending_resolution().unwrap();

        session.restart(game::deal(game::BoardConfig::new(8), 9));

        assert_eq!(session.elapsed_secs(t(50)), 0);
        assert_eq!(session.view_state(), ViewGameState::Ready);
        assert_eq!(
            session.engine.resolve(token),
            game::ResolveOutcome::Stale
        );
        assert_eq!(session.engine.total_cards(), 8);
    }
}
