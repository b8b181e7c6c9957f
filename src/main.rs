use app_directory::config::{self, DirectoryConfig};
use app_directory::links::Links;
use app_directory::loader::{CollectionLoader, FileTransport};
use app_directory::query::{QueryEngine, SearchFilters};
use app_directory::render::{self, BackLink, RenderOptions, TitleLink};
use app_directory::{generate, location, output};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Called once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "app-directory")]
#[command(about = "Query and render a static directory of catalogued apps")]
#[command(long_about = "\
Query and render a static directory of catalogued apps

The directory root holds the collection and an optional config.toml:

  site/
  ├── config.toml                  # Optional (base_path, data_path, detail_style)
  └── data/
      └── collection.json          # JSON array of apps

Each app gets a slug derived from its name (\"OWASP Juice Shop\" →
owasp-juice-shop). Duplicates get -2, -3, … in collection order.

Run 'app-directory gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory root (holds config.toml and the collection)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Collection location relative to the root (overrides config data_path)
    #[arg(long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackLinkArg {
    None,
    Home,
    Slug,
}

#[derive(Clone, Copy, ValueEnum)]
enum TitleLinkArg {
    None,
    Slug,
}

#[derive(Subcommand)]
enum Command {
    /// List every app with its slug
    List,
    /// Search by text and facets
    Search {
        /// Free-text query (substring of name, author, notes and tags)
        #[arg(default_value = "")]
        query: String,
        /// Collection tag to require (repeatable, any-of, case-sensitive)
        #[arg(long = "collection")]
        collections: Vec<String>,
        /// Technology tag to require (repeatable, any-of, case-insensitive)
        #[arg(long = "technology")]
        technologies: Vec<String>,
    },
    /// Print the detail markup for one app
    Show {
        slug: String,
        #[arg(long, value_enum, default_value = "none")]
        back_link: BackLinkArg,
        #[arg(long, value_enum, default_value = "none")]
        title_link: TitleLinkArg,
    },
    /// Print the slug a path and fragment resolve to
    Resolve {
        path: String,
        #[arg(default_value = "")]
        fragment: String,
    },
    /// Export a static site: index, one page per app, 404
    Generate {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            let (_, engine) = open(&cli.root, cli.data.as_deref())?;
            let collection = engine.loader().load().await?;
            output::print_entry_list(collection.entries());
        }
        Command::Search {
            query,
            collections,
            technologies,
        } => {
            let (_, engine) = open(&cli.root, cli.data.as_deref())?;
            let filters = SearchFilters {
                collection: collections.into_iter().collect(),
                technology: technologies.into_iter().collect(),
            };
            let results = engine.search(&query, &filters).await?;
            let total = engine.loader().load().await?.len();
            output::print_search_output(&query, &filters, &results, total);
        }
        Command::Show {
            slug,
            back_link,
            title_link,
        } => {
            let (config, engine) = open(&cli.root, cli.data.as_deref())?;
            let Some(entry) = engine.app_by_slug(&slug).await? else {
                return Err(format!("No app with slug '{slug}'").into());
            };
            let options = RenderOptions {
                back_link: match back_link {
                    BackLinkArg::None => BackLink::None,
                    BackLinkArg::Home => BackLink::Home,
                    BackLinkArg::Slug => BackLink::Slug,
                },
                title_link: match title_link {
                    TitleLinkArg::None => TitleLink::None,
                    TitleLinkArg::Slug => TitleLink::Slug,
                },
            };
            let markup = render::render_entry(Some(&entry), &options, &Links::from_config(&config));
            println!("{}", markup.into_string());
        }
        Command::Resolve { path, fragment } => {
            if let Some(slug) = location::resolve_slug(&path, &fragment) {
                println!("{slug}");
            }
        }
        Command::Generate { output: out_dir } => {
            let (config, engine) = open(&cli.root, cli.data.as_deref())?;
            output::print_config_summary(&config);

            println!("==> Loading {}", engine.loader().location());
            let collection = engine.loader().load().await?;

            println!("==> Generating HTML → {}", out_dir.display());
            let report = generate::generate(&collection, &config, &out_dir)?;
            output::print_generate_output(&report);

            println!("==> Export complete: {}", out_dir.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config from the root and wire a file-backed query engine.
fn open(
    root: &Path,
    data_override: Option<&str>,
) -> Result<(DirectoryConfig, QueryEngine), config::ConfigError> {
    let mut config = config::load_config(root)?;
    if let Some(data) = data_override {
        config.data_path = data.to_string();
        config.validate()?;
    }
    let loader = CollectionLoader::new(
        Arc::new(FileTransport::new(root)),
        config.data_path.clone(),
    );
    Ok((config, QueryEngine::new(Arc::new(loader))))
}
