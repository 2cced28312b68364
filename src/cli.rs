//! CLI interface for notesmith

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use std::time::Duration;

use crate::app::AppController;
use crate::config::{self, Config};
use crate::content::{LlmClient, LlmContentGenerator, ProviderConfig};
use crate::security;
use crate::store::CourseStore;
use crate::types::TopicStatus;
use crate::ui;

#[derive(Parser)]
#[command(name = "notesmith")]
#[command(about = "AI study-notes generator with syllabus planning and local persistence", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a course by generating a syllabus for a subject
    New {
        /// Subject to study, e.g. "Python" or "History of Jazz"
        subject: Vec<String>,
    },
    /// List all courses
    List,
    /// Show a course's syllabus
    Topics {
        /// Course number from `list` (default: most recent)
        #[arg(short, long)]
        course: Option<usize>,
    },
    /// Open a topic: show its notes, generating them first if needed
    Read {
        /// Topic number from `topics`
        topic: usize,
        /// Course number from `list` (default: most recent)
        #[arg(short, long)]
        course: Option<usize>,
    },
    /// Delete a course
    Delete {
        /// Course number from `list`
        course: usize,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show storage status
    Status,
    /// Configure notesmith
    Config {
        /// Set the provider API key
        #[arg(long)]
        set_api_key: Option<String>,
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set model for a role (usage: --set-model role model_id)
        #[arg(long, value_names = &["role", "model"], num_args = 2)]
        set_model: Option<Vec<String>>,
        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
    /// Start the interactive shell (default when no command given)
    Interactive,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config {
            set_api_key,
            show,
            set_model,
            reset,
        }) => run_config(set_api_key, show, set_model, reset),
        Some(Commands::New { subject }) => {
            let mut controller = build_controller()?;
            create_course(&mut controller, &subject.join(" ")).await
        }
        Some(Commands::List) => {
            let controller = build_controller()?;
            ui::print_course_list(controller.state(), controller.estimate_size());
            Ok(())
        }
        Some(Commands::Topics { course }) => {
            let mut controller = build_controller()?;
            pick_course(&mut controller, course)?;
            show_topics(&controller)
        }
        Some(Commands::Read { topic, course }) => {
            let mut controller = build_controller()?;
            pick_course(&mut controller, course)?;
            open_topic(&mut controller, topic).await
        }
        Some(Commands::Delete { course, yes }) => {
            let mut controller = build_controller()?;
            delete_course(&mut controller, course, yes)
        }
        Some(Commands::Status) => {
            let controller = build_controller()?;
            show_status(&controller);
            Ok(())
        }
        Some(Commands::Interactive) | None => interactive().await,
    }
}

type Controller = AppController<LlmContentGenerator>;

/// Build the controller from config and stored credentials. A missing API
/// key is tolerated here so read-only commands work; generation commands
/// check for it before calling out.
fn build_controller() -> Result<Controller> {
    let config = Config::load()?;
    let api_key = security::keyring::get_api_key().unwrap_or_default();
    let client = LlmClient::with_provider(ProviderConfig::resolve(api_key, &config.api.base_url));
    let generator = LlmContentGenerator::new(client, &config);
    let store = CourseStore::open(
        config.resolved_data_dir()?,
        config.storage.capacity_bytes,
    )
    .context("Failed to open course store")?;
    Ok(AppController::new(generator, store))
}

fn require_api_key() -> Result<()> {
    if !security::keyring::has_api_key() {
        bail!("No API key configured. Run 'notesmith config --set-api-key YOUR_KEY' first.");
    }
    Ok(())
}

fn run_config(
    set_api_key: Option<String>,
    show: bool,
    set_model: Option<Vec<String>>,
    reset: bool,
) -> Result<()> {
    let mut acted = false;

    if let Some(key) = set_api_key {
        config::set_api_key(&key)?;
        acted = true;
    }
    if let Some(pair) = set_model {
        // clap enforces exactly two values
        config::set_model(&pair[0], &pair[1])?;
        acted = true;
    }
    if reset {
        config::reset_config()?;
        acted = true;
    }
    if show || !acted {
        config::show_config()?;
    }
    Ok(())
}

/// Make the Nth listed course current; with no index the most recent
/// course (already current after load) stays selected
fn pick_course(controller: &mut Controller, index: Option<usize>) -> Result<()> {
    let Some(index) = index else { return Ok(()) };
    let course_id = course_id_at(controller, index)?;
    controller.select_course(&course_id);
    Ok(())
}

fn course_id_at(controller: &Controller, index: usize) -> Result<String> {
    controller
        .state()
        .courses
        .get(index.wrapping_sub(1))
        .map(|c| c.id.clone())
        .with_context(|| format!("No course number {} (see 'list')", index))
}

/// Topic id for a 1-based number in display order
fn topic_id_at(controller: &Controller, number: usize) -> Result<String> {
    let course = controller
        .state()
        .current_course()
        .context("No course selected. Create one with 'new <subject>'.")?;
    ui::ordered_topics(course)
        .get(number.wrapping_sub(1))
        .map(|t| t.id.clone())
        .with_context(|| format!("No topic number {} (see 'topics')", number))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn create_course(controller: &mut Controller, subject: &str) -> Result<()> {
    if subject.trim().is_empty() {
        println!("Nothing to do: subject is empty.");
        return Ok(());
    }
    require_api_key()?;

    let pb = spinner(&format!("Generating syllabus for \"{}\"...", subject.trim()));
    let result = controller.create_course(subject).await;
    pb.finish_and_clear();

    match result {
        Ok(Some(_)) => {
            show_topics(controller)?;
            println!("\nOpen a topic with 'read <n>' to generate its notes.");
            Ok(())
        }
        Ok(None) => {
            println!("Nothing to do: subject is empty.");
            Ok(())
        }
        Err(e) => {
            tracing::error!("syllabus generation failed: {}", e);
            println!("Failed to generate syllabus. Please try again.");
            Ok(())
        }
    }
}

fn show_topics(controller: &Controller) -> Result<()> {
    let state = controller.state();
    let course = state
        .current_course()
        .context("No course selected. Create one with 'new <subject>'.")?;
    ui::print_topics(course, state.selected_topic_id.as_deref());
    Ok(())
}

async fn open_topic(controller: &mut Controller, number: usize) -> Result<()> {
    let topic_id = topic_id_at(controller, number)?;

    let needs_generation = controller
        .state()
        .current_course()
        .and_then(|c| c.topic(&topic_id))
        .map(|t| t.status != TopicStatus::Completed)
        .unwrap_or(false);

    if needs_generation {
        require_api_key()?;
        let pb = spinner("Generating study notes...");
        let status = controller.open_topic(&topic_id).await;
        pb.finish_and_clear();
        if status == Some(TopicStatus::Error) {
            println!("Failed to generate notes for this topic. Open it again to retry.\n");
        }
    } else {
        let _ = controller.open_topic(&topic_id).await;
    }

    let state = controller.state();
    let course = state.current_course().context("Course disappeared")?;
    let topic = course.topic(&topic_id).context("Topic disappeared")?;
    ui::print_topic(course, topic);
    Ok(())
}

fn delete_course(controller: &mut Controller, number: usize, yes: bool) -> Result<()> {
    let course_id = course_id_at(controller, number)?;
    let subject = controller
        .state()
        .courses
        .iter()
        .find(|c| c.id == course_id)
        .map(|c| c.subject.clone())
        .unwrap_or_default();

    if !yes && !confirm(&format!("Delete course '{}'?", subject))? {
        println!("Cancelled.");
        return Ok(());
    }

    controller.delete_course(&course_id);
    println!("Deleted '{}'.", subject);
    Ok(())
}

/// Read a y/N answer from stdin; deletion runs only on an explicit yes
fn confirm(question: &str) -> Result<bool> {
    use std::io::Write;
    print!("{} [y/N]: ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn show_status(controller: &Controller) {
    let state = controller.state();
    let topics: usize = state.courses.iter().map(|c| c.topics.len()).sum();
    let completed: usize = state
        .courses
        .iter()
        .flat_map(|c| c.topics.iter())
        .filter(|t| t.status == TopicStatus::Completed)
        .count();

    println!("Courses:      {}", state.courses.len());
    println!("Topics:       {} ({} with notes)", topics, completed);
    println!("Storage mode: {}", state.storage_mode);
    println!("Stored size:  ~{} bytes", controller.estimate_size());
    if state.storage_mode == crate::types::StorageMode::Cloud {
        println!("Note: cloud mode is a simulation; the last save was NOT persisted.");
    }
}

// ============ Interactive shell ============

const SHELL_HELP: &str = "Commands:
  new <subject>    generate a syllabus and create a course
  courses          list courses
  use <n>          switch to course n
  topics           show the current course's syllabus
  read <n>         open topic n (generates notes when needed)
  del <n>          delete course n
  status           storage status
  help             this help
  quit             exit";

async fn interactive() -> Result<()> {
    let mut controller = build_controller()?;

    println!("notesmith {} (type 'help' for commands)", crate::VERSION);
    if !controller.state().courses.is_empty() {
        ui::print_course_list(controller.state(), controller.estimate_size());
    }

    let mut rl = rustyline::DefaultEditor::new()?;
    loop {
        let line = match rl.readline("notesmith> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line);

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        let result = match command {
            "new" => create_course(&mut controller, rest).await,
            "courses" | "list" => {
                ui::print_course_list(controller.state(), controller.estimate_size());
                Ok(())
            }
            "use" => match rest.parse::<usize>() {
                Ok(n) => pick_course(&mut controller, Some(n)).map(|_| {
                    let _ = show_topics(&controller);
                }),
                Err(_) => {
                    println!("Usage: use <course-number>");
                    Ok(())
                }
            },
            "topics" => show_topics(&controller),
            "read" | "open" => match rest.parse::<usize>() {
                Ok(n) => open_topic(&mut controller, n).await,
                Err(_) => {
                    println!("Usage: read <topic-number>");
                    Ok(())
                }
            },
            "del" | "delete" => match rest.parse::<usize>() {
                Ok(n) => delete_course(&mut controller, n, false),
                Err(_) => {
                    println!("Usage: del <course-number>");
                    Ok(())
                }
            },
            "status" => {
                show_status(&controller);
                Ok(())
            }
            "help" => {
                println!("{}", SHELL_HELP);
                Ok(())
            }
            "quit" | "exit" => break,
            _ => {
                println!("Unknown command '{}'. Type 'help'.", command);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{}", e);
        }
    }

    Ok(())
}
