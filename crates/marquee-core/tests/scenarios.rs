//! # Behavior Scenarios
//!
//! End-to-end checks of the engine through its public API.
//!
//! ## Scenarios
//! - S1: ASCII prefix filter
//! - S2: Non-ASCII prefix filter
//! - S3: Favorite toggle involution
//! - S4: Failed remote search keeps the last catalog
//! - S5: Out-of-order responses, last request wins

use marquee_core::{
    Catalog, Command, Completion, Controller, FetchError, FetchKind, Movie, MovieId, NoticeLevel,
    ReleaseYear, query,
};

fn movie(id: u64, title: &str) -> Movie {
    Movie::new(MovieId(id), title, ReleaseYear::unknown())
}

fn ids(catalog: &Catalog) -> Vec<u64> {
    catalog.ids().map(MovieId::value).collect()
}

// =============================================================================
// S1-S2: FILTERING
// =============================================================================

mod filtering {
    use super::*;

    /// S1: "the" matches "The Dark Knight" but not "Joes".
    #[test]
    fn ascii_prefix() {
        let catalog =
            Catalog::new(vec![movie(1, "The Dark Knight"), movie(2, "Joes")]).expect("catalog");

        assert_eq!(ids(&query::filter(&catalog, "the")), vec![1]);
    }

    /// S2: Non-ASCII prefix.
    #[test]
    fn non_ascii_prefix() {
        let catalog =
            Catalog::new(vec![movie(3, "バタフライ・エフェクト"), movie(4, "白夜行")])
                .expect("catalog");

        assert_eq!(ids(&query::filter(&catalog, "白夜")), vec![4]);
    }

    /// Filtering through the controller uses the typed input.
    #[test]
    fn input_drives_displayed_list() {
        let mut controller = Controller::seeded();
        controller.dispatch(Command::Input("jo".into()));

        assert_eq!(ids(&controller.view().movies), vec![2]);
    }
}

// =============================================================================
// S3: FAVORITES
// =============================================================================

mod favorites {
    use super::*;

    /// S3: toggle(3) twice on an empty set leaves it empty.
    #[test]
    fn toggle_twice_leaves_set_empty() {
        let mut controller = Controller::seeded();

        controller.dispatch(Command::ToggleFavorite(MovieId(3)));
        controller.dispatch(Command::ToggleFavorite(MovieId(3)));

        assert!(controller.view().favorites.is_empty());
        assert!(controller.favorite_movies().is_empty());
    }
}

// =============================================================================
// S4-S5: REMOTE FETCHES
// =============================================================================

mod fetches {
    use super::*;

    /// S4: a failed search leaves the last good catalog on display.
    #[test]
    fn failed_search_keeps_last_catalog() {
        let mut controller = Controller::seeded();

        let refresh = controller.dispatch(Command::Refresh).expect("request");
        let loaded = Catalog::new(vec![movie(10, "Batman"), movie(11, "Heat")]).expect("catalog");
        controller.complete(refresh.ticket, Ok(loaded.clone()));

        let search = controller
            .dispatch(Command::Search("bat".into()))
            .expect("request");
        let outcome = controller.complete(search.ticket, Err(FetchError::Status(500, "boom".into())));

        assert_eq!(outcome, Completion::Failed);
        let view = controller.view();
        assert_eq!(view.movies, loaded);
        assert_eq!(view.notice.map(|n| n.level), Some(NoticeLevel::Error));
    }

    /// S5: "b" then "ba"; the "b" response arrives last and is discarded.
    #[test]
    fn last_request_wins() {
        let mut controller = Controller::seeded();

        let b = controller
            .dispatch(Command::Search("b".into()))
            .expect("request");
        let ba = controller
            .dispatch(Command::Search("ba".into()))
            .expect("request");
        assert_eq!(ba.kind, FetchKind::Search("ba".into()));
        assert!(b.ticket < ba.ticket);

        let ba_result = Catalog::new(vec![movie(20, "Batman")]).expect("catalog");
        let b_result =
            Catalog::new(vec![movie(21, "Bambi"), movie(20, "Batman")]).expect("catalog");

        assert_eq!(
            controller.complete(ba.ticket, Ok(ba_result.clone())),
            Completion::Applied { count: 1 }
        );
        assert_eq!(controller.complete(b.ticket, Ok(b_result)), Completion::Stale);

        assert_eq!(controller.view().movies, ba_result);
        assert!(!controller.view().loading);
    }
}
