//! Interactive single-page dashboard: type a city and press Enter.

use inquire::{InquireError, Text};
use skywatch_core::Dashboard;

use crate::{cli::find_favorite, render};

const HELP: &str = ":f star/unstar · :u °C/°F · :t theme · :<n> open favorite · :about · :q quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Search(String),
    ToggleFavorite,
    ToggleUnit,
    ToggleTheme,
    OpenFavorite(String),
    About,
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return Input::Search(line.to_string());
    };

    match command.trim() {
        "f" | "fav" => Input::ToggleFavorite,
        "u" | "unit" => Input::ToggleUnit,
        "t" | "theme" => Input::ToggleTheme,
        "about" => Input::About,
        "q" | "quit" => Input::Quit,
        other if other.chars().all(|c| c.is_ascii_digit()) && !other.is_empty() => {
            Input::OpenFavorite(other.to_string())
        }
        other => Input::Unknown(other.to_string()),
    }
}

/// What the loop should do after handling one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Render,
    Message(String),
    About,
    Quit,
}

pub async fn handle(dash: &Dashboard, input: Input) -> Step {
    match input {
        Input::Quit => Step::Quit,
        Input::About => Step::About,
        Input::Unknown(command) => Step::Message(format!("Unknown command ':{command}'. {HELP}")),
        // Failures are already on the page as the error banner.
        Input::Search(query) => {
            let _ = dash.search(&query).await;
            Step::Render
        }
        Input::OpenFavorite(target) => {
            let favorites = dash.favorites();
            match find_favorite(&favorites, &target) {
                Some(favorite) => {
                    let _ = dash.select_favorite(favorite).await;
                    Step::Render
                }
                None => Step::Message(format!("No favorite #{target}")),
            }
        }
        Input::ToggleFavorite => match dash.toggle_favorite() {
            Ok(Some(_)) => Step::Render,
            Ok(None) => Step::Message("Search for a city first.".to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "could not save favorites");
                Step::Message(format!("⚠ Could not save favorites: {e}"))
            }
        },
        Input::ToggleUnit => {
            dash.set_unit(dash.state().unit.toggled());
            Step::Render
        }
        Input::ToggleTheme => match dash.toggle_theme() {
            Ok(_) => Step::Render,
            Err(e) => {
                tracing::warn!(error = %e, "could not save theme");
                Step::Message(format!("⚠ Could not save theme: {e}"))
            }
        },
    }
}

pub async fn run(dash: &Dashboard, color: bool) -> anyhow::Result<()> {
    print!("{}", render::page(&dash.state(), color));

    loop {
        let line = match Text::new("Enter city name").with_help_message(HELP).prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        match handle(dash, parse_input(&line)).await {
            Step::Quit => break,
            Step::About => print!("{}", render::about()),
            Step::Message(text) => println!("{text}"),
            Step::Render => print!("{}", render::page(&dash.state(), color)),
        }
    }

    Ok(())
}
