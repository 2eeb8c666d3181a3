//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scriptwright_schema::EventCategory;

/// Edit interactive story scripts held by a remote document store.
#[derive(Parser, Debug)]
#[command(name = "scriptwright", version, about)]
pub struct Cli {
    /// API base URL; overrides `SCRIPTWRIGHT_API_URL`.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the registered event kinds
    Kinds {
        /// Only kinds of this category
        #[arg(short, long)]
        category: Option<CategoryArg>,
    },
    /// Show the fields of an event kind
    Describe {
        /// Event kind, e.g. `dialogue`
        kind: String,
    },
    /// Print a new event of a kind, pre-filled with field defaults
    Blank {
        /// Event kind, e.g. `music`
        kind: String,
    },
    /// Check a chapter YAML file against the event kinds
    Validate {
        /// Chapter file
        file: PathBuf,
    },
    /// List the scripts in the store
    Scripts,
    /// Open a script and show its chapters and assets
    Open {
        /// Script id
        script_id: String,
    },
    /// Print a chapter as YAML
    Chapter {
        /// Script id
        script_id: String,
        /// Chapter path, e.g. `act1/shore.yaml`
        path: String,
    },
    /// Validate a chapter file and save it to the store
    Save {
        /// Script id
        script_id: String,
        /// Chapter path to save under
        path: String,
        /// Chapter file
        file: PathBuf,
        /// Save even if some events are invalid
        #[arg(long)]
        force: bool,
    },
    /// Delete a chapter from the store
    Delete {
        /// Script id
        script_id: String,
        /// Chapter path
        path: String,
    },
    /// Create a script
    Create {
        /// Script name, also used as its id
        name: String,
        /// Short description
        #[arg(long, default_value = "")]
        description: String,
        /// Player name shown in the game
        #[arg(long, default_value = "")]
        user_name: String,
        /// Player subtitle shown in the game
        #[arg(long, default_value = "")]
        user_subtitle: String,
        /// Path of the first chapter
        #[arg(long, default_value = "intro.yaml")]
        intro_chapter: String,
    },
}

/// `--category` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryArg {
    Narrative,
    Character,
    Asset,
    Logic,
}

impl From<CategoryArg> for EventCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Narrative => Self::Narrative,
            CategoryArg::Character => Self::Character,
            CategoryArg::Asset => Self::Asset,
            CategoryArg::Logic => Self::Logic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_save_with_force() {
        let cli = Cli::try_parse_from([
            "scriptwright",
            "save",
            "tides",
            "act1/shore.yaml",
            "shore.yaml",
            "--force",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Save {
                script_id: "tides".to_owned(),
                path: "act1/shore.yaml".to_owned(),
                file: PathBuf::from("shore.yaml"),
                force: true,
            }
        );
    }

    #[test]
    fn test_parse_kinds_by_category() {
        let cli =
            Cli::try_parse_from(["scriptwright", "kinds", "--category", "asset"]).unwrap();

        assert_eq!(
            cli.command,
            Command::Kinds {
                category: Some(CategoryArg::Asset)
            }
        );
    }

    #[test]
    fn test_parse_global_api_url() {
        let cli = Cli::try_parse_from([
            "scriptwright",
            "scripts",
            "--api-url",
            "http://127.0.0.1:9000/api",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:9000/api"));
    }

    #[test]
    fn test_create_defaults() {
        let cli = Cli::try_parse_from(["scriptwright", "create", "harbor"]).unwrap();

        let Command::Create { intro_chapter, description, .. } = cli.command else {
            panic!("expected create");
        };
        assert_eq!(intro_chapter, "intro.yaml");
        assert!(description.is_empty());
    }
}
