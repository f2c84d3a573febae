use clap::{Parser, Subcommand};
use log::debug;
use std::error::Error;
use std::path::PathBuf;

use savory_stories::{
    submit_recipe, AppConfig, AppwriteBackend, DetailState, FilterState, GateOutcome, ListOptions,
    LoadState, Notice, RecipeBackend, RecipeDetailView, RecipeDraft, RecipeListView, Route,
    SessionGate, SignupForm, CATEGORIES,
};

#[derive(Parser)]
#[command(name = "savory-stories")]
#[command(about = "Browse, rate and share recipes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Credentials {
    /// Sign in with this email before running the command
    #[arg(long, requires = "password")]
    email: Option<String>,
    #[arg(long, requires = "email")]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a page by path, e.g. "/", "/recipes?category=Soup", "/recipe/<id>"
    Browse {
        path: String,
        /// Search text for the recipes page
        #[arg(long, default_value = "")]
        query: String,
    },
    /// List recipes, optionally filtered
    Recipes {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one recipe
    Show { id: String },
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Rate a recipe from 1 to 5 stars
    Rate {
        id: String,
        stars: u8,
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Save a recipe to your collection
    Save {
        id: String,
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Publish a recipe from a JSON draft file
    Create {
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        credentials: Credentials,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let backend = AppwriteBackend::new(&config)?;
    let mut gate = SessionGate::new();
    gate.check(&backend).await;

    match cli.command {
        Commands::Browse { path, query } => {
            browse(&backend, &config, &Route::parse(&path), &query).await;
        }
        Commands::Recipes { query, category } => {
            let route = Route::Recipes { category };
            browse(&backend, &config, &route, &query).await;
        }
        Commands::Show { id } => {
            browse(&backend, &config, &Route::RecipeDetail { id }, "").await;
        }
        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let form = SignupForm {
                name,
                email,
                password,
                confirm_password,
            };
            print_notice(&gate.signup(&backend, &form).await);
        }
        Commands::Rate {
            id,
            stars,
            credentials,
        } => {
            sign_in(&mut gate, &backend, &credentials).await;
            let mut view = RecipeDetailView::new(id);
            view.activate(&backend).await;
            if render_detail(&view) {
                report(view.rate(&mut gate, stars)?, &gate);
            }
        }
        Commands::Save { id, credentials } => {
            sign_in(&mut gate, &backend, &credentials).await;
            let mut view = RecipeDetailView::new(id);
            view.activate(&backend).await;
            if render_detail(&view) {
                report(view.save(&mut gate)?, &gate);
            }
        }
        Commands::Create { file, credentials } => {
            sign_in(&mut gate, &backend, &credentials).await;
            let contents = tokio::fs::read_to_string(&file).await?;
            let draft: RecipeDraft = serde_json::from_str(&contents)?;
            match submit_recipe(&mut gate, &backend, &draft).await? {
                GateOutcome::Performed((recipe, notice)) => {
                    print_notice(&notice);
                    println!("{}", Route::RecipeDetail { id: recipe.id });
                }
                GateOutcome::LoginRequired => print_login_prompt(&gate),
            }
        }
    }

    Ok(())
}

async fn sign_in(gate: &mut SessionGate, backend: &dyn RecipeBackend, credentials: &Credentials) {
    if let (Some(email), Some(password)) = (&credentials.email, &credentials.password) {
        print_notice(&gate.login(backend, email, password).await);
    }
}

async fn browse(backend: &dyn RecipeBackend, config: &AppConfig, route: &Route, query: &str) {
    debug!("Opening {}", route);
    match route {
        Route::Home => {
            let mut view = RecipeListView::new(
                ListOptions::newest(config.featured_limit),
                FilterState::default(),
            );
            view.activate(backend).await;
            println!("Featured recipes\n");
            render_list(&view);
        }
        Route::Recipes { category } => {
            let mut view = RecipeListView::new(
                ListOptions::newest(config.list_limit),
                FilterState::with_category(category.as_deref()),
            );
            view.set_query(query);
            view.activate(backend).await;
            println!("Categories: {}\n", CATEGORIES.join(", "));
            render_list(&view);
        }
        Route::RecipeDetail { id } => {
            let mut view = RecipeDetailView::new(id.clone());
            view.activate(backend).await;
            render_detail(&view);
        }
        Route::Create => {
            println!("Share a recipe with `savory-stories create --file draft.json --email ... --password ...`");
        }
        Route::Signup => {
            println!("Create an account with `savory-stories signup --name ... --email ... --password ... --confirm-password ...`");
        }
        Route::About => {
            println!("SavoryStories: recipes shared by home cooks from around the world.");
        }
        Route::NotFound => {
            println!("404: this page does not exist.");
        }
    }
}

fn render_list(view: &RecipeListView) {
    match view.state() {
        LoadState::Loading => println!("Loading..."),
        LoadState::Error(message) => println!("{}", message),
        LoadState::Ready(_) => {
            let visible = view.visible();
            if visible.is_empty() {
                println!("No recipes found. Try a different search or category.");
            }
            for recipe in visible {
                println!(
                    "{:<24} {} [{}] {:.1}",
                    recipe.id, recipe.title, recipe.category, recipe.rating
                );
            }
        }
    }
}

/// Print the detail page; returns whether a recipe is shown
fn render_detail(view: &RecipeDetailView) -> bool {
    match view.state() {
        DetailState::Loading => println!("Loading..."),
        DetailState::NotFound => println!("Recipe not found"),
        DetailState::Error(message) => println!("{}", message),
        DetailState::Ready(recipe) => {
            println!("{}", recipe.to_text());
            return true;
        }
    }
    false
}

fn report(outcome: GateOutcome<Notice>, gate: &SessionGate) {
    match outcome {
        GateOutcome::Performed(notice) => print_notice(&notice),
        GateOutcome::LoginRequired => print_login_prompt(gate),
    }
}

fn print_login_prompt(gate: &SessionGate) {
    if gate.login_prompt_requested() {
        println!("Sign in to continue: pass --email and --password");
    }
}

fn print_notice(notice: &Notice) {
    if notice.is_error() {
        eprintln!("{}", notice);
    } else {
        println!("{}", notice);
    }
}
