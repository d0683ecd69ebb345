//! shipdeck - Entry Point
//!
//! Terminal dashboard for deploying git repositories and monitoring the
//! running containers.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error};

use shipdeck::app::options::AppOptions;
use shipdeck::app::run::{await_shutdown_signal, watch};
use shipdeck::app::state::AppState;
use shipdeck::authn::session_mngr::SessionManagerExt;
use shipdeck::logs::{init_logging, LogOptions};
use shipdeck::pages::dashboard::DashboardPage;
use shipdeck::pages::deployment::DeploymentPage;
use shipdeck::pages::login::{home, logout, LoginForm, RegisterForm};
use shipdeck::pages::Navigation;
use shipdeck::render::{
    render_deployment_list, render_deployment_page, render_env, render_logs, render_stats,
};
use shipdeck::storage::layout::{StorageLayout, HOME_ENV};
use shipdeck::storage::settings::Settings;
use shipdeck::utils::{parse_env_pair, version_info};

#[derive(Parser)]
#[command(name = "shipdeck")]
#[command(version, about = "Deploy git repositories and monitor their containers")]
struct Cli {
    /// Directory holding settings.json and the stored session
    #[arg(long, global = true, env = HOME_ENV)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "SHIPDECK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "SHIPDECK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show where the stored session leads
    Home,
    /// List your deployments
    List,
    /// Deploy a git repository
    Deploy {
        /// Git clone URL
        #[arg(long)]
        clone_url: String,
        /// Repository name, e.g. owner/repo
        #[arg(long)]
        repo_name: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        subdomain: String,
        #[arg(long)]
        port: u16,
        /// Environment variable as KEY=VALUE, repeatable
        #[arg(short, long = "env", value_parser = parse_env_pair)]
        envs: Vec<(String, String)>,
    },
    /// Show one deployment
    Show { id: String },
    /// Print container stats once
    Stats { id: String },
    /// Print container logs once
    Logs { id: String },
    /// Follow a deployment until interrupted
    Watch {
        id: String,
        /// Also follow the container logs
        #[arg(long)]
        logs: bool,
    },
    /// Rebuild and restart a deployment
    Restart { id: String },
    /// Manage environment variables of a deployment
    Env {
        #[command(subcommand)]
        command: EnvCommands,
    },
    /// Print version information
    Version,
}

#[derive(Subcommand)]
enum EnvCommands {
    /// Add a variable
    Add {
        id: String,
        #[arg(value_parser = parse_env_pair)]
        pair: (String, String),
    },
    /// Change the value of a variable
    Set {
        id: String,
        #[arg(value_parser = parse_env_pair)]
        pair: (String, String),
    },
    /// Remove a variable
    Rm { id: String, key: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(info) => println!("{}", info),
            Err(e) => eprintln!("Failed to print version: {e}"),
        }
        return;
    }

    let layout = match &cli.config_dir {
        Some(dir) => StorageLayout::new(dir),
        None => StorageLayout::from_env(),
    };

    let settings = match load_settings(&layout).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(2);
        }
    };

    // Held until exit so the file writer flushes
    let _log_guard = match init_logging(LogOptions {
        log_level: settings.log_level.clone(),
        json_format: settings.json_logs,
        log_dir: settings.file_logging.then(|| layout.logs_dir()),
        ..Default::default()
    }) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let options = AppOptions::from(&settings);
    debug!("Running shipdeck with options: {:?}", options);

    let result = match AppState::init(layout, options) {
        Ok(state) => execute(&state, cli.command).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn load_settings(layout: &StorageLayout) -> Result<Settings> {
    let mut settings = Settings::load(&layout.settings_file()).await?;
    settings
        .apply_env()
        .context("Invalid environment override")?;
    settings.validate()?;
    Ok(settings)
}

async fn execute(state: &AppState, command: Commands) -> Result<()> {
    let client = &state.http_client;

    match command {
        Commands::Login { username, password } => {
            let mut form = LoginForm::new(username, password);
            match form.submit(client, state.sessions.as_ref()).await {
                Some(next) => print_navigation(&next),
                None => bail!(form_error(form.error())),
            }
        }
        Commands::Register { username, password } => {
            let mut form = RegisterForm::new(username, password);
            match form.submit(client, state.sessions.as_ref()).await {
                Some(_) => println!("Registered. Log in with `shipdeck login`."),
                None => bail!(form_error(form.error())),
            }
        }
        Commands::Logout => {
            logout(state.sessions.as_ref()).await?;
            println!("Logged out");
        }
        Commands::Home => print_navigation(&home(state.sessions.as_ref()).await),
        Commands::List => {
            let page = state.dashboard().await.context("Failed to load deployments")?;
            print!("{}", render_deployment_list(page.user_id(), page.deployments()));
        }
        Commands::Deploy {
            clone_url,
            repo_name,
            branch,
            subdomain,
            port,
            envs,
        } => {
            let session = state.sessions.get_session().await?;
            let user_id = state.sessions.get_user_id().await?;
            let mut page = DashboardPage::new(user_id);

            page.form.clone_url = clone_url;
            page.form.repo_name = repo_name;
            page.form.branch = branch;
            page.form.subdomain = subdomain;
            page.form.port = port;
            for (key, value) in envs {
                page.form.new_env_key = key;
                page.form.new_env_value = value;
                page.add_env();
                if let Some(e) = page.error() {
                    bail!(e.to_string());
                }
            }

            if !page.submit_deploy(client, &session).await {
                bail!(form_error(page.error()));
            }
            print!("{}", render_deployment_list(page.user_id(), page.deployments()));
        }
        Commands::Show { id } => {
            let page = open(state, &id).await?;
            print!(
                "{}",
                render_deployment_page(&page.view().await, &state.options.domain)
            );
            page.close().await;
        }
        Commands::Stats { id } => {
            let page = open(state, &id).await?;
            page.refresh_stats()
                .await
                .context("Failed to fetch container stats")?;
            if let Some(stats) = page.stats().await {
                print!("{}", render_stats(&stats));
            }
            page.close().await;
        }
        Commands::Logs { id } => {
            let page = open(state, &id).await?;
            page.refresh_logs().await.context("Failed to fetch logs")?;
            print!("{}", render_logs(&page.logs().await));
            page.close().await;
        }
        Commands::Watch { id, logs } => {
            let page = open(state, &id).await?;
            watch(page, &state.options.domain, logs, await_shutdown_signal()).await;
        }
        Commands::Restart { id } => {
            let mut page = open(state, &id).await?;
            let result = page.restart().await;
            page.close().await;
            match result {
                Ok(()) => println!("{}", shipdeck::pages::deployment::RESTART_OK),
                Err(message) => bail!(message),
            }
        }
        Commands::Env { command } => env_command(state, command).await?,
        Commands::Version => {}
    }

    Ok(())
}

async fn env_command(state: &AppState, command: EnvCommands) -> Result<()> {
    let (page, applied) = match command {
        EnvCommands::Add { id, pair: (key, value) } => {
            let mut page = open(state, &id).await?;
            let applied = page.add_env(&key, &value).await;
            (page, applied)
        }
        EnvCommands::Set { id, pair: (key, value) } => {
            let mut page = open(state, &id).await?;
            let applied = page.update_env(&key, &value).await;
            (page, applied)
        }
        EnvCommands::Rm { id, key } => {
            let mut page = open(state, &id).await?;
            let applied = page.delete_env(&key).await;
            (page, applied)
        }
    };

    let error = page.env_error().map(str::to_string);
    print!("{}", render_env(page.env().as_slice()));
    page.close().await;

    if !applied {
        bail!(form_error(error.as_deref()));
    }
    Ok(())
}

/// Open a deployment page, failing when the deployment cannot be fetched
async fn open(state: &AppState, id: &str) -> Result<DeploymentPage> {
    let page = state.deployment(id).await?;
    if let Some(e) = page.error() {
        let message = e.to_string();
        page.close().await;
        return Err(anyhow!(message)).with_context(|| format!("Deployment {}", id));
    }
    Ok(page)
}

fn print_navigation(next: &Navigation) {
    match next {
        Navigation::Login => println!("Not logged in. Run `shipdeck login`."),
        Navigation::Dashboard(user_id) => println!("Logged in as {}", user_id),
    }
}

fn form_error(error: Option<&str>) -> String {
    error.unwrap_or("Request failed").to_string()
}
