use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use imagetales_client::{
    config::{load_env_files, ServiceConfig},
    download::download,
    error::AppResult,
    models::{Category, CategoryFilter, GenerationMode, SelectedResult},
    notify::{Notification, NotificationSink},
    profile::ProfileView,
    prompt::DEFAULT_STORY_SCENES,
    remote::{HttpImageService, RemoteImageService},
    AppState,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "imagetales", about = "Generate, refine and collect AI images")]
struct Cli {
    /// Overrides IMAGETALES_DOWNLOAD_DIR.
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an image, then apply each --modify in order.
    Generate {
        prompt: String,
        #[arg(long = "modify")]
        modifications: Vec<String>,
        /// Save the final image to the gallery under this title.
        #[arg(long)]
        save: Option<String>,
        #[arg(long, default_value = "nature")]
        category: Category,
        #[arg(long)]
        download: bool,
    },
    /// Create an illustrated story.
    Story {
        prompt: String,
        #[arg(long, default_value_t = DEFAULT_STORY_SCENES)]
        scenes: u32,
        /// 1-based scene to save to the gallery.
        #[arg(long, requires = "title")]
        save_scene: Option<usize>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "nature")]
        category: Category,
        #[arg(long)]
        download: bool,
    },
    /// List gallery images.
    Gallery {
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        /// Only the signed-in user's images.
        #[arg(long)]
        mine: bool,
    },
    /// Toggle likes on gallery images.
    Like { ids: Vec<String> },
    /// Show the signed-in account.
    Profile,
}

struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        if notification.is_failure() {
            eprintln!("✗ {}: {}", notification.title, notification.description);
        } else {
            println!("✓ {}: {}", notification.title, notification.description);
        }
    }
}

const DEFAULT_LOG_FILTER: &str = "info";

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env_files();
    init_tracing();

    let cli = Cli::parse();
    let mut config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("imagetales: {error}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = cli.download_dir {
        config = config.with_download_dir(dir);
    }
    let download_dir = config.download_dir.clone();
    let mut app = match AppState::from_config(config, Arc::new(ConsoleSink)) {
        Ok(app) => app,
        Err(error) => {
            eprintln!("imagetales: {error}");
            return ExitCode::FAILURE;
        }
    };

    // Operation failures have already been reported through the sink.
    match run(&mut app, cli.command, &download_dir).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(%error, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    app: &mut AppState<HttpImageService>,
    command: Command,
    download_dir: &Path,
) -> AppResult<()> {
    match command {
        Command::Generate {
            prompt,
            modifications,
            save,
            category,
            download: wants_download,
        } => {
            let mut result = app.session.generate(&prompt).await?;
            if !modifications.is_empty() {
                app.session.select_mode(GenerationMode::Modify)?;
            }
            for modification in &modifications {
                result = app.session.modify(modification).await?;
            }
            println!("{}\n  prompt: {}", result.image_url, result.prompt);

            if let Some(title) = save {
                save_selection(app, SelectedResult::from(&result), title, category).await?;
            }
            if wants_download {
                download(&*app.service, &*app.notifier, &result.image_url, download_dir).await?;
            }
        }
        Command::Story {
            prompt,
            scenes,
            save_scene,
            title,
            category,
            download: wants_download,
        } => {
            app.session.select_mode(GenerationMode::Story)?;
            let story = app.session.generate_story(&prompt, scenes).await?;
            println!("{}", story.introduction);
            for (index, scene) in story.scenes.iter().enumerate() {
                println!("\n[{}] {}\n  {}", index + 1, scene.text, scene.image_url);
            }

            if let (Some(number), Some(title)) = (save_scene, title) {
                let selection = number
                    .checked_sub(1)
                    .and_then(|index| app.session.selection_for_scene(index));
                match selection {
                    Some(selection) => save_selection(app, selection, title, category).await?,
                    None => eprintln!("no scene {number} in this story"),
                }
            }
            if wants_download {
                for scene in &story.scenes {
                    download(&*app.service, &*app.notifier, &scene.image_url, download_dir).await?;
                }
            }
        }
        Command::Gallery { category, mine } => {
            if mine {
                app.gallery.load_user().await?;
            } else {
                app.gallery.load().await?;
            }
            for item in app.gallery.filter_by_category(category) {
                println!(
                    "{}  {:<8} ♥ {:<4} {}  {}",
                    item.id,
                    item.category.as_str(),
                    item.like_count,
                    item.title,
                    item.url
                );
            }
        }
        Command::Like { ids } => {
            app.gallery.load().await?;
            for id in &ids {
                app.gallery.toggle_like(id).await?;
                if let Some(item) = app.gallery.item(id) {
                    println!("{id}: ♥ {}", item.like_count);
                }
            }
        }
        Command::Profile => {
            let profile = ProfileView::load(&*app.service).await?;
            println!(
                "{} <{}>\n  plan: {}  credits: {}\n  images: {}  likes: {}",
                profile.user.username,
                profile.user.email,
                profile.user.plan_label(),
                profile.user.credits_or_zero(),
                profile.images.len(),
                profile.total_likes()
            );
        }
    }

    Ok(())
}

async fn save_selection<S: RemoteImageService>(
    app: &mut AppState<S>,
    selection: SelectedResult,
    title: String,
    category: Category,
) -> AppResult<()> {
    app.save_dialog.open(selection);
    app.save_dialog.set_title(title);
    app.save_dialog.set_category(category);
    app.save_dialog.confirm().await
}
