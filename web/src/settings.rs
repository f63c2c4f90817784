use saolei_core::Difficulty;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

pub(crate) fn describe(difficulty: Difficulty) -> String {
    let config = difficulty.config();
    format!("{difficulty} {0}×{0}, {1} mines", config.size, config.mines)
}

#[derive(Properties, PartialEq)]
pub(crate) struct DifficultyPickerProps {
    pub selected: Difficulty,
    pub on_select: Callback<Difficulty>,
}

/// Board size selector, picking an entry starts a new game.
#[function_component]
pub(crate) fn DifficultyPicker(props: &DifficultyPickerProps) -> Html {
    let on_select = props.on_select.clone();
    let onchange = Callback::from(move |e: Event| {
        let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
            return;
        };
        match select.value().parse::<Difficulty>() {
            Ok(difficulty) => on_select.emit(difficulty),
            Err(err) => log::warn!("difficulty select: {}", err),
        }
    });

    html! {
        <select aria-label="Difficulty" {onchange}>
            {
                for Difficulty::ALL.into_iter().map(|difficulty| html! {
                    <option value={difficulty.name()} selected={difficulty == props.selected}>
                        {describe(difficulty)}
                    </option>
                })
            }
        </select>
    }
}
