use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use course_catalog::config::Config;
use course_catalog::errors::AppError;
use course_catalog::handlers::admin_handler::AdminHandler;
use course_catalog::handlers::catalog_handler::{CatalogHandler, CatalogView};
use course_catalog::models::course_model::{Course, CourseDraft};
use course_catalog::models::upload_model::SelectedFile;
use course_catalog::services::upload_service::UploadCoordinator;
use course_catalog::{AppState, AppStateInner};
use dotenvy::dotenv;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "course-catalog", about = "Browse and manage the course catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Public catalog
    #[command(subcommand)]
    Courses(CoursesCommand),
    /// Course management (admin session required)
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Upload an image and print its public URL
    Upload { image: PathBuf },
    /// Show the signed-in user
    Whoami,
    Logout,
}

#[derive(Subcommand, Debug)]
enum CoursesCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Published courses picked for the home page
    Featured,
    Show { id: String },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        instructor: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Stats,
    Create(DraftArgs),
    Update {
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },
    Delete { id: String },
}

#[derive(Args, Debug)]
struct DraftArgs {
    /// JSON file with the course fields
    #[arg(long)]
    file: Option<PathBuf>,
    /// Image to upload as the course thumbnail
    #[arg(long)]
    thumbnail: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load env")?;
    let state: AppState = Arc::new(AppStateInner::new(config)?);

    if let Err(e) = run(&state, cli.command).await {
        match e.downcast_ref::<AppError>() {
            Some(app) if app.is_client_side() => eprintln!("{}", app.user_message()),
            Some(app) => {
                tracing::error!(error = %app, "Command failed");
                eprintln!("{}", app.user_message());
            }
            None => eprintln!("{:#}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Courses(command) => run_courses(state, command).await,
        Command::Admin(command) => {
            state.session.refresh().await?;
            let admin = state.session.require_admin().await?;
            tracing::debug!(user = %admin.display_name(), "Admin session");
            run_admin(state, command).await
        }
        Command::Upload { image } => {
            let uploads = UploadCoordinator::new(state.images.clone());
            let url = uploads.upload(SelectedFile::from_path(&image).await?).await?;
            println!("{}", url);
            Ok(())
        }
        Command::Whoami => {
            match state.session.refresh().await? {
                Some(user) => println!("{} <{}> ({:?})", user.display_name(), user.email, user.role),
                None => println!("Not signed in"),
            }
            Ok(())
        }
        Command::Logout => {
            state.session.clear().await?;
            println!("Logged out");
            Ok(())
        }
    }
}

async fn run_courses(state: &AppState, command: CoursesCommand) -> Result<()> {
    let mut catalog = CatalogHandler::from_state(state);

    match command {
        CoursesCommand::List {
            search,
            category,
            level,
            sort,
            page,
        } => {
            catalog.load().await?;
            if let Some(search) = search {
                catalog.set_search(search);
            }
            catalog.set_category(category);
            catalog.set_level(level);
            if let Some(sort) = sort {
                catalog.set_sort_str(&sort)?;
            }
            catalog.set_page(page)?;
            print_view(catalog.view())
        }
        CoursesCommand::Featured => {
            catalog.load().await?;
            for course in catalog.featured() {
                println!("{}  {}  by {}  ${:.2}", course.id, course.title, course.instructor, course.price);
            }
            Ok(())
        }
        CoursesCommand::Show { id } => {
            let details = catalog.course_details(&id).await?;
            print_json(&details)
        }
    }
}

async fn run_admin(state: &AppState, command: AdminCommand) -> Result<()> {
    let mut admin = AdminHandler::from_state(state);
    admin.load().await?;

    match command {
        AdminCommand::List {
            search,
            category,
            instructor,
            page,
        } => {
            if let Some(search) = search {
                admin.set_search(search);
            }
            admin.set_category(category);
            admin.set_instructor(instructor);
            admin.set_page(page)?;
            print_view(admin.view())
        }
        AdminCommand::Stats => print_json(&admin.stats()),
        AdminCommand::Create(args) => {
            admin.open_create();
            match fill_and_submit(&mut admin, args).await? {
                Some(course) => println!("created course id={}", course.id),
                None => println!("created course"),
            }
            Ok(())
        }
        AdminCommand::Update { id, draft } => {
            admin.open_edit(&id)?;
            fill_and_submit(&mut admin, draft).await?;
            println!("updated course id={}", id);
            Ok(())
        }
        AdminCommand::Delete { id } => {
            admin.open_delete(&id)?;
            admin.confirm_delete().await?;
            println!("deleted course id={}", id);
            Ok(())
        }
    }
}

async fn fill_and_submit(admin: &mut AdminHandler, args: DraftArgs) -> Result<Option<Course>> {
    if let Some(path) = &args.file {
        let draft = read_draft(path).await?;
        admin.form_mut().replace_draft(draft);
    }
    if let Some(path) = &args.thumbnail {
        admin.select_thumbnail(SelectedFile::from_path(path).await?).await?;
    }

    let errors = admin.form().validation_errors();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("- {}", error);
        }
        anyhow::bail!("Course form is incomplete");
    }

    Ok(admin.submit().await?)
}

async fn read_draft(path: &Path) -> Result<CourseDraft> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid course JSON in {}", path.display()))
}

fn print_view(view: CatalogView) -> Result<()> {
    match view {
        CatalogView::Loading => println!("Loading..."),
        CatalogView::NoResults => println!("No courses found"),
        CatalogView::Results(page) => {
            for course in &page.items {
                println!(
                    "{}  {}  [{}] {}  by {}  ${:.2}",
                    course.id, course.title, course.level, course.category, course.instructor, course.price
                );
            }
            println!(
                "page {}/{} ({} courses)",
                page.pagination.current_page,
                page.total_pages(),
                page.total_count()
            );
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
