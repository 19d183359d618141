pub mod completion;
pub mod config;
pub mod inspect;
pub mod version;

use crate::cli::SessionArgs;
use crate::config::{Config, StartMode};
use crate::deck::Deck;
use crate::l10n::L10n;
use crate::navigation::NavigationLine;
use crate::presentation::{Presentation, SessionOptions};
use crate::session::{Capabilities, Host, Session};

/// Apply config defaults and session flags to a deck.
pub fn build_presentation(mut deck: Deck, config: &Config, args: &SessionArgs) -> Presentation {
    deck.print |= config.print();
    let l10n = match &config.l10n {
        Some(overrides) => L10n::default().merged(overrides),
        None => L10n::default(),
    };
    Presentation::new(
        &deck,
        l10n,
        SessionOptions {
            editor: args.editor,
            solution: args.solution,
        },
    )
}

/// Open a deck the way both the player and `inspect` do: apply config, pick the start slide,
/// build the navigation line and re-check every slide's answers.
pub fn open_presentation(
    deck: Deck,
    config: &Config,
    args: &SessionArgs,
) -> (Presentation, NavigationLine) {
    let mut presentation = build_presentation(deck, config, args);

    let start = match args.slide {
        Some(n) => n.saturating_sub(1),
        None => match config.start_mode() {
            StartMode::First => 0,
            StartMode::Resume => presentation.current_index(),
            StartMode::Slide(n) => n - 1,
        },
    };
    if start >= presentation.slide_count() {
        tracing::warn!(
            slide = start + 1,
            slides = presentation.slide_count(),
            "start slide out of range, starting at the first slide"
        );
        presentation.jump_to_slide(0);
    } else {
        presentation.jump_to_slide(start);
    }

    let capabilities = Capabilities {
        hover: config.hover() && !args.no_hover,
        ..Capabilities::default()
    };
    let mut nav = NavigationLine::new(&presentation, capabilities);
    nav.slide_changed(&presentation, None);
    for i in 0..presentation.slide_count() {
        nav.mark_answered(&presentation, i);
    }
    (presentation, nav)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECK: &str = r#"
slides:
  - keywords: [Intro]
  - elements:
      - title: Quiz
        kind: task
        answered: true
  - elements:
      - title: Quiz
        kind: task
previous_state:
  progress: 2
"#;

    #[test]
    fn test_open_rechecks_answers() {
        let deck = Deck::parse(DECK).unwrap();
        let (p, nav) = open_presentation(deck, &Config::default(), &SessionArgs::default());
        assert_eq!(p.current_index(), 0);
        let segments = nav.progress().segments();
        assert!(segments[1].answered());
        assert!(!segments[2].answered());
        assert!(segments[3].summary);
    }

    #[test]
    fn test_open_resumes_from_config() {
        let deck = Deck::parse(DECK).unwrap();
        let mut config = Config::default();
        config.set("defaults.start_mode", "resume").unwrap();
        let (p, nav) = open_presentation(deck, &config, &SessionArgs::default());
        assert_eq!(p.current_index(), 2);
        assert_eq!(nav.progress().selected(), Some(2));
        assert_eq!(nav.footer().current(), 3);
    }

    #[test]
    fn test_open_slide_argument_wins() {
        let deck = Deck::parse(DECK).unwrap();
        let args = SessionArgs {
            slide: Some(2),
            no_hover: true,
            ..SessionArgs::default()
        };
        let (p, nav) = open_presentation(deck, &Config::default(), &args);
        assert_eq!(p.current_index(), 1);
        assert!(!nav.capabilities().hover);
    }

    #[test]
    fn test_open_out_of_range_falls_back() {
        let deck = Deck::parse(DECK).unwrap();
        let args = SessionArgs {
            slide: Some(40),
            ..SessionArgs::default()
        };
        let (p, _) = open_presentation(deck, &Config::default(), &args);
        assert_eq!(p.current_index(), 0);
    }
}
