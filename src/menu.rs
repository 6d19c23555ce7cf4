//! Detail menu for a single record.
//!
//! Each numeric choice maps to a [`MenuAction`]; a static table pairs every
//! action with its label and a render function producing a heading and a
//! body. Rendering is plain text, so the whole menu is testable without a
//! terminal.

use crate::models::{MovieRecord, NOT_AVAILABLE};
use crate::prompt::{MessageKind, Prompter};

/// Number of cast members listed as "Stars" in the full view.
const FULL_VIEW_STARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Back,
    TitleYear,
    RatingCertificate,
    Genres,
    Directors,
    Writers,
    Cast,
    Plot,
    Full,
}

/// Rendered view: (heading, body).
pub type Rendered = (&'static str, String);

struct MenuEntry {
    choice: u32,
    action: MenuAction,
    label: &'static str,
    render: fn(&MovieRecord) -> Rendered,
}

const MENU: &[MenuEntry] = &[
    MenuEntry {
        choice: 1,
        action: MenuAction::TitleYear,
        label: "Title & Year",
        render: render_title_year,
    },
    MenuEntry {
        choice: 2,
        action: MenuAction::RatingCertificate,
        label: "IMDb Rating & Certificate",
        render: render_rating_certificate,
    },
    MenuEntry {
        choice: 3,
        action: MenuAction::Genres,
        label: "Genres",
        render: render_genres,
    },
    MenuEntry {
        choice: 4,
        action: MenuAction::Directors,
        label: "Directors",
        render: render_directors,
    },
    MenuEntry {
        choice: 5,
        action: MenuAction::Writers,
        label: "Writers",
        render: render_writers,
    },
    MenuEntry {
        choice: 6,
        action: MenuAction::Cast,
        label: "Cast",
        render: render_cast,
    },
    MenuEntry {
        choice: 7,
        action: MenuAction::Plot,
        label: "Plot/Description",
        render: render_plot,
    },
    MenuEntry {
        choice: 8,
        action: MenuAction::Full,
        label: "Full Information (All)",
        render: render_full,
    },
];

impl MenuAction {
    /// Action for a numeric menu choice; `0` is [`MenuAction::Back`].
    pub fn from_choice(choice: u32) -> Option<Self> {
        if choice == 0 {
            return Some(MenuAction::Back);
        }
        MENU.iter().find(|e| e.choice == choice).map(|e| e.action)
    }

    /// Render `record` for this action. `Back` renders nothing.
    pub fn render(self, record: &MovieRecord) -> Option<Rendered> {
        MENU.iter()
            .find(|e| e.action == self)
            .map(|e| (e.render)(record))
    }
}

/// `(choice, label)` pairs in display order, ending with "Back to Search".
pub fn entries() -> Vec<(u32, &'static str)> {
    MENU.iter()
        .map(|e| (e.choice, e.label))
        .chain(std::iter::once((0, "Back to Search")))
        .collect()
}

/// Show the menu for `record` until the user goes back or cancels.
pub fn run_menu(prompter: &dyn Prompter, key: &str, record: &MovieRecord) {
    let entries = entries();
    while let Some(choice) = prompter.prompt_menu_choice(key, &entries) {
        let Some(action) = MenuAction::from_choice(choice) else {
            continue;
        };
        match action.render(record) {
            Some((heading, body)) => {
                prompter.show_message(MessageKind::Info, &format!("\n{}\n{}", heading, body))
            }
            None => break,
        }
    }
}

fn join_or_na(values: &[String]) -> String {
    if values.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        values.join(", ")
    }
}

fn render_title_year(r: &MovieRecord) -> Rendered {
    ("Title & Year", format!("Title: {}\nYear: {}", r.title, r.year))
}

fn render_rating_certificate(r: &MovieRecord) -> Rendered {
    (
        "Rating & Certificate",
        format!("IMDb Rating: {}\nCertificate: {}", r.rating, r.certificate),
    )
}

fn render_genres(r: &MovieRecord) -> Rendered {
    ("Genres", format!("Genres: {}", join_or_na(&r.genres)))
}

fn render_directors(r: &MovieRecord) -> Rendered {
    ("Directors", format!("Directors:\n{}", join_or_na(&r.directors)))
}

fn render_writers(r: &MovieRecord) -> Rendered {
    ("Writers", format!("Writers:\n{}", join_or_na(&r.writers)))
}

fn render_cast(r: &MovieRecord) -> Rendered {
    ("Cast", format!("Cast (Top 10):\n{}", join_or_na(&r.cast)))
}

fn render_plot(r: &MovieRecord) -> Rendered {
    ("Plot/Description", format!("Plot:\n{}", r.description))
}

fn render_full(r: &MovieRecord) -> Rendered {
    let stars: Vec<String> = r.cast.iter().take(FULL_VIEW_STARS).cloned().collect();
    (
        "Full Movie Information",
        format!(
            "Title: {} ({})\nIMDb Rating: {}\nGenres: {}\nDirectors: {}\nWriters: {}\nStars: {}\nCertificate: {}\n\nPlot: {}",
            r.title,
            r.year,
            r.rating,
            join_or_na(&r.genres),
            join_or_na(&r.directors),
            join_or_na(&r.writers),
            join_or_na(&stars),
            r.certificate,
            r.description,
        ),
    )
}

/// The full summary as a single block of text.
pub fn full_summary(record: &MovieRecord) -> String {
    render_full(record).1
}
