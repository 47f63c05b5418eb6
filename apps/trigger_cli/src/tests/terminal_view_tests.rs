use super::*;
use shared::domain::ButtonState;

#[test]
fn draws_one_line_per_visible_change() {
    let view = TerminalView::new(Vec::new());
    for state in [
        ButtonState::Idle,
        ButtonState::Pending,
        ButtonState::Success,
        ButtonState::Success,
        ButtonState::Idle,
        ButtonState::Failure,
    ] {
        view.render(&state.appearance());
    }

    let drawn = String::from_utf8(view.into_inner()).expect("utf8");
    assert_eq!(
        drawn,
        "[Run Scraper]\n[Scraper started!] (success)\n[Run Scraper]\n[Scraper run failed.] (fail)\n"
    );
}
