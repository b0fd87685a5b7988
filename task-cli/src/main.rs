use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use task_cli::client::DEFAULT_SERVER;
use task_cli::session::SESSION_FILE;
use task_cli::view::format_task;
use task_cli::{
    Filter, NewTask, SessionLoad, SessionStore, TaskBoard, TaskClient, TaskUpdate, UserProfile,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "task-cli", about = "Manage tasks on a task server")]
struct Cli {
    /// Base URL of the task server.
    #[arg(long, global = true, default_value = DEFAULT_SERVER)]
    server: String,
    /// Where the login session is kept.
    #[arg(long, global = true, default_value = SESSION_FILE)]
    session_file: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Log in and store the session.
    Login { username: String, password: String },
    /// Forget the stored session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// List tasks, incomplete first.
    List {
        #[arg(long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Show task counts and completion rate.
    Stats {
        #[arg(long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Show a single task.
    Show { id: String },
    /// Create a task owned by the logged-in user.
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Mark a task as completed.
    Complete { id: String },
    /// Mark a task as not completed.
    Reopen { id: String },
    /// Change the title and/or description of a task.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a task.
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Cli::parse();
    let sessions = SessionStore::new(args.session_file.clone());
    let client = TaskClient::new(args.server.as_str());

    run(args.command, &sessions, &client).await
}

async fn run(
    command: Commands,
    sessions: &SessionStore,
    client: &TaskClient,
) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => {
            let profile = client.login(&username, &password).await?;
            sessions.save(&profile).context("cannot store session")?;
            println!("Logged in as {} ({})", profile.name, profile.username);
        }
        Commands::Logout => {
            if sessions.clear()? {
                println!("Logged out");
            } else {
                println!("Not logged in");
            }
        }
        Commands::Whoami => {
            let profile = require_session(sessions)?;
            println!("{} ({})", profile.name, profile.username);
        }
        Commands::List { filter } => {
            require_session(sessions)?;
            let board = TaskBoard::new(client.list().await?);
            print_board(&board, filter);
        }
        Commands::Stats { filter } => {
            require_session(sessions)?;
            let board = TaskBoard::new(client.list().await?);
            println!("{}", board.stats(filter));
        }
        Commands::Show { id } => {
            require_session(sessions)?;
            let task = client.get(&id).await?;
            println!("{}", format_task(&task));
        }
        Commands::Add { title, description } => {
            let profile = require_session(sessions)?;
            let mut board = TaskBoard::new(client.list().await?);
            let new_task = NewTask {
                title,
                description,
                user_id: Some(profile.id),
            };
            let task = client.create(&new_task).await?;
            println!("Created task {}", task.id);
            board.add_created(task);
            print_board(&board, Filter::All);
        }
        Commands::Complete { id } => set_completed(sessions, client, &id, true).await?,
        Commands::Reopen { id } => set_completed(sessions, client, &id, false).await?,
        Commands::Edit {
            id,
            title,
            description,
        } => {
            require_session(sessions)?;
            if title.is_none() && description.is_none() {
                bail!("Nothing to change: pass --title and/or --description");
            }
            let update = TaskUpdate {
                title,
                description,
                completed: None,
            };
            let task = client.update(&id, &update).await?;
            println!("{}", format_task(&task));
        }
        Commands::Delete { id } => {
            require_session(sessions)?;
            let mut board = TaskBoard::new(client.list().await?);
            let task = client.delete(&id).await?;
            println!("Deleted task {} ({})", task.title, task.id);
            board.apply_deleted(&task.id);
            print_board(&board, Filter::All);
        }
    };

    Ok(())
}

async fn set_completed(
    sessions: &SessionStore,
    client: &TaskClient,
    id: &str,
    completed: bool,
) -> anyhow::Result<()> {
    require_session(sessions)?;
    let mut board = TaskBoard::new(client.list().await?);
    let update = TaskUpdate {
        completed: Some(completed),
        ..Default::default()
    };
    let task = client.update(id, &update).await?;
    board.apply_updated(task);
    print_board(&board, Filter::All);
    Ok(())
}

fn require_session(sessions: &SessionStore) -> anyhow::Result<UserProfile> {
    match sessions.load()? {
        SessionLoad::Restored(profile) => Ok(profile),
        SessionLoad::Missing => {
            bail!("Not logged in. Run `task-cli login <username> <password>` first")
        }
        SessionLoad::Discarded => {
            bail!("Failed to restore your session. Run `task-cli login <username> <password>` again")
        }
    }
}

fn print_board(board: &TaskBoard, filter: Filter) {
    let tasks = board.visible(filter);
    if tasks.is_empty() {
        println!("No tasks");
    }
    for task in &tasks {
        println!("{}", format_task(task));
    }
    println!("{}", board.stats(filter));
}
