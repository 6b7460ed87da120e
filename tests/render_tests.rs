//! Whole-screen render checks through the app shell

use pokebrowse::{
    artwork::Artwork,
    components::AppShell,
    state::{AbilitySlot, AppState, BaseStat, CatalogEntryDetail, CatalogEntrySummary},
};
use tui_dispatch::{testing::*, DataResource};

fn render(state: &AppState) -> String {
    let mut render = RenderHarness::new(110, 44);
    let mut shell = AppShell::new();
    render.render_to_string_plain(|frame| {
        let area = frame.area();
        shell.draw(frame, area, state, true);
    })
}

fn browsing() -> AppState {
    let mut state = AppState::default();
    state.gate.configured = true;
    state.summaries = vec![
        CatalogEntrySummary {
            id: 1,
            name: "bulbasaur".into(),
            source_url: "https://pokeapi.co/api/v2/pokemon/1/".into(),
        },
        CatalogEntrySummary {
            id: 2,
            name: "ivysaur".into(),
            source_url: "https://pokeapi.co/api/v2/pokemon/2/".into(),
        },
    ];
    state
}

fn bulbasaur() -> CatalogEntryDetail {
    CatalogEntryDetail {
        id: 1,
        name: "bulbasaur".into(),
        height: 7,
        weight: 69,
        types: vec!["grass".into(), "poison".into()],
        abilities: vec![
            AbilitySlot {
                name: "overgrow".into(),
                is_hidden: false,
            },
            AbilitySlot {
                name: "chlorophyll".into(),
                is_hidden: true,
            },
        ],
        stats: vec![
            BaseStat {
                name: "hp".into(),
                base_value: 45,
            },
            BaseStat {
                name: "special-defense".into(),
                base_value: 65,
            },
        ],
        artwork_url: Some(
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/1.png"
                .into(),
        ),
    }
}

#[test]
fn key_screen_first() {
    let output = render(&AppState::default());
    assert!(output.contains("Pokemon Explorer"), "{output}");
    assert!(output.contains("API Key (optional for PokeAPI)"), "{output}");
    assert!(!output.contains("Go to page:"), "{output}");
}

#[test]
fn grid_with_pager() {
    let output = render(&browsing());
    assert!(output.contains("Explore over 10,000 Pokemon"), "{output}");
    assert!(output.contains("#0001"), "{output}");
    assert!(output.contains("Ivysaur"), "{output}");
    assert!(output.contains("Page 1 of 500"), "{output}");
    assert!(output.contains("Previous"), "{output}");
    assert!(output.contains("Next"), "{output}");
}

#[test]
fn grid_cards_show_fetched_previews() {
    let mut state = browsing();
    state.thumbnails.insert(
        1,
        Artwork {
            width: 6,
            height: 2,
            pixels: vec![Some([34, 197, 94]); 12],
        },
    );
    let output = render(&state);
    assert!(output.contains("\u{2580}\u{2580}\u{2580}\u{2580}\u{2580}\u{2580}"), "{output}");
    assert!(!output.contains("1.png"), "{output}");
    // Ivysaur's preview has not arrived yet
    assert!(output.contains("2.png"), "{output}");
}

#[test]
fn detail_overlay_loaded() {
    let mut state = browsing();
    state.selected_id = Some(1);
    state.detail = DataResource::Loaded(bulbasaur());
    let output = render(&state);

    for needle in [
        "0.7 m",
        "6.9 kg",
        "Grass",
        "Poison",
        "Special Defense",
        "Chlorophyll (Hidden)",
        "Overgrow",
        "1.png",
    ] {
        assert!(output.contains(needle), "missing {needle}:\n{output}");
    }
}

#[test]
fn detail_overlay_with_decoded_artwork() {
    let mut state = browsing();
    state.selected_id = Some(1);
    state.detail = DataResource::Loaded(bulbasaur());
    state.artwork = DataResource::Loaded(Artwork {
        width: 2,
        height: 2,
        pixels: vec![Some([10, 200, 10]), None, None, Some([10, 200, 10])],
    });
    let output = render(&state);

    assert!(output.contains('\u{2580}'), "{output}");
    assert!(output.contains('\u{2584}'), "{output}");
}

#[test]
fn detail_overlay_failed() {
    let mut state = browsing();
    state.selected_id = Some(1);
    state.detail = DataResource::Failed("HTTP 500".into());
    let output = render(&state);
    assert!(output.contains("Failed to load Pokemon details"), "{output}");
    assert!(!output.contains("Loading..."), "{output}");
}

#[test]
fn detail_overlay_loading() {
    let mut state = browsing();
    state.selected_id = Some(1);
    state.detail = DataResource::Loading;
    let output = render(&state);
    assert!(output.contains("Loading..."), "{output}");
}
