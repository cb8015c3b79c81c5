use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;
use vmlink::channel::bridge_stream;
use vmlink::domain::{FsDiff, Project, ProjectOptions, ProjectTemplate, UiTheme, UiView};
use vmlink::{EmbeddedEndpoint, RootDispatcher, Transfer, Vm, connect, message_channel};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vmlink")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("vmlink.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn demo_project() -> Project {
    Project::new("vmlink demo", ProjectTemplate::Javascript)
        .with_description("Demo project served by the simulated VM")
        .with_file("index.js", "import cowsay from 'cowsay';\nconsole.log(cowsay.say({ text: 'Hello world!' }));\n")
        .with_file("index.html", "<h1>Hello world!</h1>\n<script src=\"index.js\"></script>\n")
        .with_file("package.json", "{\n  \"dependencies\": {\n    \"cowsay\": \"1.5.0\"\n  }\n}\n")
        .with_dependency("cowsay", "1.5.0")
}

fn load_project(path: Option<&PathBuf>) -> Result<Project> {
    let Some(path) = path else {
        return Ok(demo_project());
    };
    let content = fs::read_to_string(path).context(format!("Failed to read project {}", path.display()))?;
    let project: Project =
        serde_json::from_str(&content).context(format!("Failed to parse project {}", path.display()))?;
    info!("Loaded project '{}' ({}) from {}", project.title, project.template, path.display());
    Ok(project)
}

fn build_diff(create: &[String], destroy: &[String]) -> Result<FsDiff> {
    let mut diff = FsDiff::new();
    for entry in create {
        let Some((path, contents)) = entry.split_once('=') else {
            bail!("Invalid --create '{}': expected PATH=CONTENTS", entry);
        };
        diff = diff.create(path, contents);
    }
    for path in destroy {
        diff = diff.destroy(path.as_str());
    }
    Ok(diff)
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");
    let project = load_project(cli.project.as_ref())?;

    if let Some(Commands::Serve { stdio }) = &cli.command {
        return serve(project, *stdio, cli, config).await;
    }

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let dispatcher = RootDispatcher::new(project, &ProjectOptions::default(), &config.endpoint.preview_origin);
    let (mut control, remote) = message_channel::<Transfer>();
    let endpoint = EmbeddedEndpoint::spawn(remote, dispatcher, &config.endpoint);
    for command in &cli.fail {
        endpoint.fail_command(command.as_str())?;
    }

    let vm = connect(&mut control, &config.connect, config.rdc.clone())
        .await
        .context("Failed to connect to the embedded project")?;
    if cli.is_verbose() {
        println!(
            "{} {}",
            "Connected, preview origin:".cyan(),
            vm.preview().origin().unwrap_or("none")
        );
    }

    let result = run_command(&vm, cli.command.as_ref()).await;

    vm.close();
    endpoint.shutdown().await;
    result
}

async fn run_command(vm: &Vm, command: Option<&Commands>) -> Result<()> {
    info!("Running command: {:?}", command);
    match command {
        None | Some(Commands::Snapshot) => print_snapshot(vm).await,
        Some(Commands::Deps) => {
            match vm.get_dependencies().await? {
                Some(deps) => {
                    for (name, version) in deps {
                        println!("{} {}", name.green(), version);
                    }
                }
                None => println!("{}", "No dependencies".yellow()),
            }
            Ok(())
        }
        Some(Commands::Apply { create, destroy, diff }) => {
            match diff {
                Some(path) => {
                    let content =
                        fs::read_to_string(path).context(format!("Failed to read diff {}", path.display()))?;
                    let value: serde_json::Value = serde_json::from_str(&content).context("Failed to parse diff")?;
                    vm.apply_fs_diff_value(&value).await?;
                }
                None => vm.apply_fs_diff(&build_diff(create, destroy)?).await?,
            }
            println!("{}", "Diff applied".green());
            print_snapshot(vm).await
        }
        Some(Commands::Open { paths }) => {
            vm.editor().open_file(paths.clone()).await?;
            println!("{} {}", "Opened:".green(), paths.join(" | "));
            Ok(())
        }
        Some(Commands::Current { path }) => {
            vm.editor().set_current_file(path).await?;
            println!("{} {}", "Current file:".green(), path);
            Ok(())
        }
        Some(Commands::Theme { theme }) => {
            let theme: UiTheme = theme.parse()?;
            vm.editor().set_theme(theme).await?;
            println!("{} {}", "Theme:".green(), theme);
            Ok(())
        }
        Some(Commands::View { view }) => {
            let view: UiView = view.parse()?;
            vm.editor().set_view(view).await?;
            println!("{} {}", "View:".green(), view);
            Ok(())
        }
        Some(Commands::Sidebar { hide }) => {
            vm.editor().show_sidebar(!hide).await?;
            let state = if *hide { "hidden" } else { "visible" };
            println!("{} {}", "Sidebar:".green(), state);
            Ok(())
        }
        Some(Commands::PreviewUrl) => {
            println!("{}", vm.preview().get_url().await?);
            Ok(())
        }
        Some(Commands::SetPreview { path }) => {
            vm.preview().set_url(path).await?;
            println!("{} {}", "Preview:".green(), vm.preview().get_url().await?);
            Ok(())
        }
        Some(Commands::Serve { .. }) => bail!("serve cannot run inside a session"),
    }
}

async fn print_snapshot(vm: &Vm) -> Result<()> {
    match vm.get_fs_snapshot().await? {
        Some(files) => {
            for (path, contents) in files {
                println!("{}", format!("== {} ==", path).cyan().bold());
                println!("{}", contents);
            }
        }
        None => println!("{}", "No files".yellow()),
    }
    Ok(())
}

async fn serve(project: Project, stdio: bool, cli: &Cli, config: &Config) -> Result<()> {
    if !stdio {
        bail!("No transport selected; pass --stdio");
    }
    info!("Serving '{}' over stdio", project.title);

    let dispatcher = RootDispatcher::new(project, &ProjectOptions::default(), &config.endpoint.preview_origin);
    let port = bridge_stream(tokio::io::stdin(), tokio::io::stdout());
    let endpoint = EmbeddedEndpoint::spawn_direct(port, dispatcher, &config.endpoint);
    for command in &cli.fail {
        endpoint.fail_command(command.as_str())?;
    }

    endpoint.join().await;
    info!("Stdio session ended");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
