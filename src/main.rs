//! Place Navigator command-line host.
//!
//! Exercises the navigation engine outside a UI toolkit:
//!
//! ```text
//! place-navigator parse "orders&page=2&filter='a&b'"
//! place-navigator check --config navigator.toml
//! place-navigator run --config navigator.toml --user-role admin home admin&tab=users
//! ```
//!
//! `run` wires console collaborators into the engine: views and containers
//! print what they show, interceptors print the transition and let it proceed.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use place_navigator::config::{load_config, NavigatorConfig};
use place_navigator::interception::{Interceptor, InterceptorCallback};
use place_navigator::navigation::{EngineSettings, History, MemoryHistory, NavigationEngine};
use place_navigator::observability::logging::init_logging;
use place_navigator::presenter::{HasViews, Presenter, RootPanel, View, ViewHandle};
use place_navigator::routing::{InterceptorBinding, RouteTable};
use place_navigator::security::AuthorizationProvider;
use place_navigator::{BoxError, Token};

#[derive(Parser)]
#[command(name = "place-navigator")]
#[command(about = "Parse history tokens and run navigation scenarios", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a raw history token and print it as JSON
    Parse {
        raw: String,
    },
    /// Validate a configuration file and print the route table
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Dispatch tokens through an engine built from a configuration file
    Run {
        #[arg(short, long)]
        config: PathBuf,

        /// Roles held by the simulated user
        #[arg(long = "user-role")]
        user_roles: Vec<String>,

        /// Simulate a user that is not logged in
        #[arg(long)]
        anonymous: bool,

        /// Tokens to navigate to, in order
        tokens: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { raw } => {
            let token = Token::parse(&raw);
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
        Commands::Check { config } => {
            let config = load_config(&config)?;
            init_logging(&config.observability);
            let table = RouteTable::from_config(&config)?;
            print_table(&table);
        }
        Commands::Run {
            config,
            user_roles,
            anonymous,
            tokens,
        } => {
            let config = load_config(&config)?;
            init_logging(&config.observability);
            run(&config, user_roles, anonymous, tokens).await?;
        }
    }

    Ok(())
}

fn print_table(table: &RouteTable) {
    println!("{} route(s)", table.len());
    for route in table.routes() {
        let mut flags = Vec::new();
        if route.is_default() {
            flags.push("default");
        }
        if route.is_not_found() {
            flags.push("not-found");
        }
        if route.is_public() {
            flags.push("public");
        }
        let container = table
            .container_for(route)
            .map(|c| c.id().to_string())
            .unwrap_or_else(|| "<root>".to_string());
        println!(
            "  {:<16} cache={:<8} container={:<10} roles={:?} {}",
            route.id(),
            route.cache_policy().to_string(),
            container,
            route.allowed_roles(),
            flags.join(",")
        );
    }
}

async fn run(
    config: &NavigatorConfig,
    user_roles: Vec<String>,
    anonymous: bool,
    tokens: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = RouteTable::from_config(config)?;
    let history = Arc::new(MemoryHistory::new());

    let mut builder = NavigationEngine::builder(table.clone())
        .history(history.clone())
        .settings(EngineSettings::from(&config.navigation))
        .access_gate(Arc::new(ConsoleUser {
            roles: user_roles,
            logged_in: !anonymous,
        }));

    for route in table.routes() {
        builder = builder.presenter(route.id(), Arc::new(ConsolePresenter::new(route.id(), false)));
        if let Some(InterceptorBinding::Named { id }) = route.interceptor() {
            let name = id.clone();
            builder = builder.interceptor(id.clone(), move || {
                Arc::new(ConsoleInterceptor { name: name.clone() }) as Arc<dyn Interceptor>
            });
        }
    }
    for container in table.containers() {
        builder = builder.container_presenter(
            container.id(),
            Arc::new(ConsolePresenter::new(container.id(), true)),
        );
    }

    let engine = builder.build()?;
    engine.start(Arc::new(ConsoleRoot::default())).await?;

    for raw in tokens {
        println!("navigate {raw}");
        engine.navigate_to(Token::parse(&raw)).await;
        println!("  current = {}", engine.current_token());
    }

    println!("history = {:?}", history.entries());
    println!("current = {}", history.current());
    Ok(())
}

/// Simulated user answering authorization checks.
struct ConsoleUser {
    roles: Vec<String>,
    logged_in: bool,
}

#[async_trait]
impl AuthorizationProvider for ConsoleUser {
    async fn is_user_in_any_role(&self, _token: &Token, roles: &[String]) -> Result<bool, BoxError> {
        Ok(self.logged_in && roles.iter().any(|r| self.roles.contains(r)))
    }

    async fn is_user_logged_in(&self, _token: &Token) -> Result<bool, BoxError> {
        Ok(self.logged_in)
    }
}

struct ConsolePresenter {
    name: String,
    container: bool,
}

impl ConsolePresenter {
    fn new(name: &str, container: bool) -> Self {
        Self {
            name: name.to_string(),
            container,
        }
    }
}

impl Presenter for ConsolePresenter {
    fn create_view(&self, token: &Token) -> Result<ViewHandle, BoxError> {
        println!("  create view {} for {token}", self.name);
        if self.container {
            Ok(Arc::new(ConsoleContainer {
                name: self.name.clone(),
            }))
        } else {
            Ok(Arc::new(ConsoleView {
                name: self.name.clone(),
            }))
        }
    }

    fn as_interceptor(self: Arc<Self>) -> Option<Arc<dyn Interceptor>> {
        Some(Arc::new(ConsoleInterceptor {
            name: format!("presenter {}", self.name),
        }))
    }
}

#[derive(Debug)]
struct ConsoleView {
    name: String,
}

impl View for ConsoleView {
    fn as_interceptor(self: Arc<Self>) -> Option<Arc<dyn Interceptor>> {
        Some(Arc::new(ConsoleInterceptor {
            name: format!("view {}", self.name),
        }))
    }
}

#[derive(Debug)]
struct ConsoleContainer {
    name: String,
}

impl View for ConsoleContainer {
    fn as_container(&self) -> Option<&dyn HasViews> {
        Some(self)
    }
}

impl HasViews for ConsoleContainer {
    fn show_view(&self, token: &Token, view: ViewHandle) -> Result<(), BoxError> {
        println!("  container {} shows {view:?} for {token}", self.name);
        Ok(())
    }
}

#[derive(Default)]
struct ConsoleRoot {
    attached: Mutex<Vec<ViewHandle>>,
}

impl ConsoleRoot {
    fn attached(&self) -> std::sync::MutexGuard<'_, Vec<ViewHandle>> {
        self.attached.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RootPanel for ConsoleRoot {
    fn clear(&self) {
        self.attached().clear();
    }

    fn add(&self, view: ViewHandle) {
        println!("  root shows {view:?}");
        self.attached().push(view);
    }

    fn is_attached(&self, view: &ViewHandle) -> bool {
        self.attached().iter().any(|v| Arc::ptr_eq(v, view))
    }
}

/// Prints the transition and lets it proceed.
struct ConsoleInterceptor {
    name: String,
}

#[async_trait]
impl Interceptor for ConsoleInterceptor {
    async fn on_url_changed(&self, current: &Token, destination: &Token, callback: InterceptorCallback) {
        println!("  {} intercepts {current} -> {destination}, proceeding", self.name);
        callback.proceed_to(destination.clone()).await;
    }
}
