use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{CustomType, Select};
use skywatch_core::{
    Config, Dashboard, FavoriteLocation, FileStore, TemperatureUnit, Theme, preferences,
};

use crate::{render, repl};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skywatch", version, about = "SkyWatch weather dashboard")]
pub struct Cli {
    /// Temperature unit; overrides the configured default.
    #[arg(long, short, global = true, value_enum)]
    pub unit: Option<UnitArg>,

    /// Without a subcommand the interactive dashboard is opened.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    #[value(alias = "c")]
    Celsius,
    #[value(alias = "f")]
    Fahrenheit,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Celsius => TemperatureUnit::Celsius,
            UnitArg::Fahrenheit => TemperatureUnit::Fahrenheit,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions, air quality and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "Paris" or "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// List, star/unstar or open favorite locations.
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommand>,
    },

    /// Show the current theme, or switch between light and dark.
    Theme {
        #[arg(long)]
        toggle: bool,
    },

    /// Interactively set the default unit, theme and request timeout.
    Configure,

    /// About SkyWatch.
    About,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List starred locations.
    List,

    /// Look a city up and star it, or unstar it if already starred.
    Toggle {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Show weather for a favorite, by position in the list or by name.
    Open { target: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        tracing::debug!(?config, "loaded configuration");
        let color = render::color_enabled();
        let unit = self.unit;
        let open = || -> anyhow::Result<Dashboard> {
            let dash = Dashboard::from_config(&config)?;
            if let Some(unit) = unit {
                dash.set_unit(unit.into());
            }
            Ok(dash)
        };

        match self.command {
            None => repl::run(&open()?, color).await?,
            Some(Command::Show { city }) => {
                let query = city_query(&city)?;
                let dash = open()?;
                dash.search(&query).await.map_err(into_report)?;
                print!("{}", render::page(&dash.state(), color));
            }
            Some(Command::Favorites { action }) => {
                favorites(&open()?, action.unwrap_or(FavoritesCommand::List), color).await?
            }
            Some(Command::Theme { toggle }) => {
                let dash = open()?;
                let theme = if toggle { dash.toggle_theme()? } else { dash.state().theme };
                println!("Theme: {theme}");
            }
            Some(Command::Configure) => configure(config.clone())?,
            Some(Command::About) => print!("{}", render::about()),
        }

        Ok(())
    }
}

async fn favorites(dash: &Dashboard, action: FavoritesCommand, color: bool) -> anyhow::Result<()> {
    match action {
        FavoritesCommand::List => {
            let favorites = dash.favorites();
            if favorites.is_empty() {
                println!("No favorite locations yet.");
                println!("Hint: star one with `skywatch favorites toggle <city>`.");
            }
            for (i, fav) in favorites.iter().enumerate() {
                println!("{:>2}. ★ {}", i + 1, fav.display_name());
            }
        }
        FavoritesCommand::Toggle { city } => {
            let city = dash.locate(&city_query(&city)?).await.map_err(into_report)?;
            let starred = dash.toggle_location(&city)?;
            if starred {
                println!("★ Added {} to favorites", city.display_name());
            } else {
                println!("☆ Removed {} from favorites", city.display_name());
            }
        }
        FavoritesCommand::Open { target } => {
            let favorites = dash.favorites();
            let favorite = find_favorite(&favorites, &target)
                .ok_or_else(|| anyhow!("No favorite matches '{target}'"))?;
            dash.select_favorite(favorite).await.map_err(into_report)?;
            print!("{}", render::page(&dash.state(), color));
        }
    }
    Ok(())
}

/// Joins the words of a city argument, rejecting a blank name.
fn city_query(words: &[String]) -> anyhow::Result<String> {
    let query = words.join(" ");
    let query = query.trim();
    if query.is_empty() {
        bail!("City name must not be empty");
    }
    Ok(query.to_string())
}

/// Match a 1-based index, a name, or "name, country" (case-insensitive).
pub fn find_favorite<'a>(
    favorites: &'a [FavoriteLocation],
    target: &str,
) -> Option<&'a FavoriteLocation> {
    let target = target.trim();
    if let Ok(index) = target.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| favorites.get(i));
    }

    favorites.iter().find(|fav| {
        fav.name.eq_ignore_ascii_case(target) || fav.display_name().eq_ignore_ascii_case(target)
    })
}

fn into_report(e: skywatch_core::Error) -> anyhow::Error {
    let message = e.user_message();
    anyhow::Error::new(e).context(message)
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(if config.unit == TemperatureUnit::Fahrenheit { 1 } else { 0 })
        .prompt()
        .context("Unit selection cancelled")?;

    let theme = Select::new("Theme:", vec![Theme::Light, Theme::Dark])
        .with_starting_cursor(if config.theme == Theme::Dark { 1 } else { 0 })
        .prompt()
        .context("Theme selection cancelled")?;

    let timeout = CustomType::<u64>::new("Request timeout in seconds (0 for none):")
        .with_default(config.request_timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Timeout entry cancelled")?;

    config.unit = unit;
    config.theme = theme;
    config.request_timeout_secs = timeout;
    config.save()?;

    let store = FileStore::new(config.state_dir()?);
    preferences::save_theme(&store, theme)?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favs() -> Vec<FavoriteLocation> {
        vec![
            FavoriteLocation {
                name: "Paris".into(),
                country: "France".into(),
                latitude: 48.8566,
                longitude: 2.3522,
            },
            FavoriteLocation {
                name: "Paris".into(),
                country: "United States".into(),
                latitude: 33.6609,
                longitude: -95.5555,
            },
        ]
    }

    #[test]
    fn find_by_index_is_one_based() {
        let favs = favs();
        assert_eq!(find_favorite(&favs, "2").map(|f| f.country.as_str()), Some("United States"));
        assert!(find_favorite(&favs, "0").is_none());
        assert!(find_favorite(&favs, "3").is_none());
    }

    #[test]
    fn find_by_full_name_disambiguates() {
        let favs = favs();
        let found = find_favorite(&favs, "paris, united states").unwrap();
        assert_eq!(found.latitude, 33.6609);
        assert_eq!(find_favorite(&favs, "PARIS").unwrap().country, "France");
    }

    #[test]
    fn parses_show_with_multiword_city() {
        let cli = Cli::try_parse_from(["skywatch", "show", "New", "York", "--unit", "f"]).unwrap();
        assert!(matches!(cli.unit, Some(UnitArg::Fahrenheit)));
        match cli.command {
            Some(Command::Show { city }) => assert_eq!(city.join(" "), "New York"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn blank_city_is_rejected() {
        let err = city_query(&["   ".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "City name must not be empty");
        assert!(city_query(&[]).is_err());
        assert!(city_query(&[" ".to_string(), "".to_string()]).is_err());
    }

    #[test]
    fn city_words_are_joined_and_trimmed() {
        let words = vec![" New".to_string(), "York ".to_string()];
        assert_eq!(city_query(&words).unwrap(), "New York");
    }

    #[test]
    fn no_subcommand_opens_dashboard() {
        let cli = Cli::try_parse_from(["skywatch"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn favorites_defaults_to_list() {
        let cli = Cli::try_parse_from(["skywatch", "favorites"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Favorites { action: None })));
    }
}
