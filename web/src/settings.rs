use memory_quest_core::{BoardConfig, CardCount, MusicSettings};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Settings {
    pub board: BoardConfig,
    pub music: MusicSettings,
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    pub board: BoardConfig,
    pub on_board_size: Callback<CardCount>,
    pub on_restart: Callback<()>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let buttons = BoardConfig::PRESETS.iter().map(|&cards| {
        let on_board_size = props.on_board_size.clone();
        let onclick = Callback::from(move |_: MouseEvent| on_board_size.emit(cards));
        let class = classes!(
            "menu-button",
            (props.board.cards() == cards).then_some("selected")
        );
        html! {
            <button {class} {onclick}>{format!("{} Cards", cards)}</button>
        }
    });

    let on_restart = props.on_restart.reform(|_: MouseEvent| ());

    html! {
        <aside class="menu-container">
            <h2 class="menu-title">{"Settings"}</h2>
            <menu>
                { for buttons }
                <button class="restart" onclick={on_restart}>{"Restart"}</button>
            </menu>
        </aside>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct AudioControlsProps {
    pub music: MusicSettings,
    pub on_toggle_mute: Callback<()>,
    pub on_volume: Callback<f32>,
}

#[function_component]
pub(crate) fn AudioControls(props: &AudioControlsProps) -> Html {
    let muted = props.music.is_muted();
    let on_toggle_mute = props.on_toggle_mute.reform(|_: MouseEvent| ());

    let on_volume = props.on_volume.clone();
    let oninput = Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        match input.value().parse::<f32>() {
            Ok(volume) => on_volume.emit(volume),
            Err(err) => log::warn!("bad volume {:?}: {}", input.value(), err),
        }
    });

    html! {
        <div class="audio-controls">
            <button onclick={on_toggle_mute}>
                { if muted { "🔊 Unmute" } else { "🔇 Mute" } }
            </button>
            if !muted {
                <label>
                    <span>{"🎵"}</span>
                    <input
                        type="range"
                        min="0"
                        max="1"
                        step="0.1"
                        value={props.music.volume().to_string()}
                        {oninput}
                    />
                </label>
            }
        </div>
    }
}
