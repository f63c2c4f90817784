use saolei_core::Outcome;
use yew::prelude::*;

/// Title and body of the end-of-game dialog, `None` while the game goes on.
pub(crate) fn result_message(outcome: Outcome) -> Option<(&'static str, String)> {
    match outcome {
        Outcome::None => None,
        Outcome::Win { elapsed_secs: 1 } => {
            Some(("You win!", "Cleared the board in 1 second.".to_string()))
        }
        Outcome::Win { elapsed_secs } => Some((
            "You win!",
            format!("Cleared the board in {elapsed_secs} seconds."),
        )),
        Outcome::Loss => Some(("Boom!", "You stepped on a mine.".to_string())),
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ResultProps {
    pub outcome: Outcome,
    #[prop_or_default]
    pub open: bool,
    pub on_play_again: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component]
pub(crate) fn ResultView(props: &ResultProps) -> Html {
    let Some((title, message)) = result_message(props.outcome) else {
        return html! {};
    };
    let on_play_again = props.on_play_again.clone();
    let on_close = props.on_close.clone();

    html! {
        <dialog id="result" open={props.open}>
            <article>
                <h2>{title}</h2>
                <p>{message}</p>
                <footer>
                    <button onclick={move |_| on_close.emit(())} type="reset">{"Close"}</button>
                    <button onclick={move |_| on_play_again.emit(())}>{"Play again"}</button>
                </footer>
            </article>
        </dialog>
    }
}
