use shiftplan::multiselect::MultiSelect;

const UNIVERSE: [&str; 5] = ["Anna", "Ben", "Carla", "Dario", "Emil"];

/// Every subset of the universe, as a bitmask-selected list in universe order.
fn subsets() -> Vec<Vec<String>> {
    (0u32..1 << UNIVERSE.len())
        .map(|mask| {
            UNIVERSE
                .iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << index) != 0)
                .map(|(_, name)| name.to_string())
                .collect()
        })
        .collect()
}

#[test]
fn new_candidates_keep_only_offered_selections() {
    let all = UNIVERSE.iter().map(|name| name.to_string()).collect::<Vec<_>>();
    for prior in subsets() {
        for offered in subsets() {
            let mut control = MultiSelect::with_candidates("Select...", &all);
            control.set_selection(&prior);
            control.set_candidates(&offered);

            let expected = offered
                .iter()
                .filter(|name| prior.contains(name))
                .cloned()
                .collect::<Vec<_>>();
            assert_eq!(
                control.selection(),
                expected,
                "prior {prior:?}, offered {offered:?}"
            );
        }
    }
}

#[test]
fn selection_follows_candidate_order() {
    let offered = ["Carla", "Anna", "Ben"].map(String::from);
    let mut control = MultiSelect::with_candidates("Select...", &offered);
    control.toggle("Ben");
    control.toggle("Carla");
    assert_eq!(control.selection(), ["Carla", "Ben"]);
    assert_eq!(control.summary(), "2 items selected");
}

#[test]
fn unknown_values_are_never_selected() {
    let offered = ["Anna", "Ben"].map(String::from);
    let mut control = MultiSelect::with_candidates("Select...", &offered);
    control.set_selection(&["Anna", "Zoe"]);
    control.toggle("Zoe");
    assert_eq!(control.selection(), ["Anna"]);
    assert!(!control.is_selected("Zoe"));
}

#[test]
fn duplicate_candidates_collapse() {
    let offered = ["Anna", "Ben", "Anna"].map(String::from);
    let mut control = MultiSelect::with_candidates("Select...", &offered);
    control.select_all();
    assert_eq!(control.candidates(), ["Anna", "Ben"]);
    assert_eq!(control.selection(), ["Anna", "Ben"]);
}

#[test]
fn expand_state_and_cursor() {
    let offered = ["Anna", "Ben", "Carla"].map(String::from);
    let mut control = MultiSelect::with_candidates("Select...", &offered);
    assert!(!control.is_expanded());

    control.expand();
    control.cursor_up();
    assert_eq!(control.cursor(), 2);
    control.toggle_cursor();
    control.cursor_down();
    control.toggle_cursor();
    assert_eq!(control.selection(), ["Anna", "Carla"]);

    control.done();
    assert!(!control.is_expanded());
    control.expand();
    control.focus_lost();
    assert!(!control.is_expanded());

    control.set_candidates(&["Anna".to_string()]);
    assert_eq!(control.cursor(), 0);
    assert_eq!(control.summary(), "Anna");

    control.select_none();
    assert_eq!(control.summary(), "Select...");
}
