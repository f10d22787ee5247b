use gymdeck_core::*;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;

#[derive(Parser)]
#[command(name = "gymdeck")]
#[command(about = "Workout deck tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List decks, optionally filtered by a search query
    Decks {
        /// Case-insensitive substring match on title or description
        #[arg(long)]
        search: Option<String>,
    },

    /// Create a new deck from library exercise ids
    Create {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Comma-separated library exercise ids (e.g. "1,3,7")
        #[arg(long, value_delimiter = ',')]
        exercises: Vec<String>,
    },

    /// Delete a deck by id
    Delete { id: String },

    /// Run a workout session over a deck
    Start {
        deck_id: String,

        /// Auto-complete every card (for testing) - no prompts, no countdown waits
        #[arg(long, conflicts_with = "auto_skip")]
        auto_complete: bool,

        /// Auto-skip this many cards then complete the rest (for testing)
        #[arg(long)]
        auto_skip: Option<u32>,

        /// Difficulty rating (1-5); omitting it prompts, or defaults when non-interactive
        #[arg(long)]
        rating: Option<u8>,
    },

    /// Show profile statistics and recent sessions
    Profile,

    /// Rename the profile
    Rename { username: String },

    /// Sign out of the external identity provider
    Signout,

    /// Show the XP leaderboard
    Leaderboard,

    /// Export session history to CSV
    Export {
        /// Output path (defaults to sessions.csv in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Clear the local store, restoring starter decks and a fresh profile
    Reset,
}

fn main() -> Result<()> {
    gymdeck_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store_path = data_dir.join("gymdeck.json");

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    // First run: seed the store with defaults and the configured username
    if !store_path.exists() {
        let mut fresh = AppState::default();
        fresh.user.username = config.profile.username.clone();
        fresh.save(&store_path)?;
    }

    match cli.command {
        Commands::Decks { search } => cmd_decks(&store_path, search),
        Commands::Create {
            title,
            description,
            exercises,
        } => cmd_create(&store_path, title, description, exercises),
        Commands::Delete { id } => cmd_delete(&store_path, &id),
        Commands::Start {
            deck_id,
            auto_complete,
            auto_skip,
            rating,
        } => cmd_start(&store_path, &deck_id, auto_complete, auto_skip, rating),
        Commands::Profile => cmd_profile(&store_path),
        Commands::Rename { username } => cmd_rename(&store_path, &username),
        Commands::Signout => cmd_signout(),
        Commands::Leaderboard => cmd_leaderboard(&store_path),
        Commands::Export { output } => cmd_export(&store_path, output, &data_dir),
        Commands::Reset => cmd_reset(&store_path),
    }
}

fn cmd_decks(store_path: &std::path::Path, search: Option<String>) -> Result<()> {
    let state = AppState::load(store_path)?;
    let query = search.unwrap_or_default();
    let hits = search_decks(&state.decks, &query);

    if hits.is_empty() {
        if query.is_empty() {
            println!("No decks yet. Create your first workout!");
        } else {
            println!("No decks match \"{}\"", query);
        }
        return Ok(());
    }

    for deck in hits {
        println!(
            "{}  {} - {} ({} exercises, {} XP, ~{}s)",
            deck.id,
            deck.title,
            deck.description,
            deck.exercises.len(),
            deck.xp_value,
            deck.total_duration,
        );
    }
    Ok(())
}

fn cmd_create(
    store_path: &std::path::Path,
    title: String,
    description: String,
    exercise_ids: Vec<String>,
) -> Result<()> {
    let catalog = get_default_catalog();

    let mut cards = Vec::new();
    for id in &exercise_ids {
        match catalog.exercise(id.trim()) {
            Some(card) => cards.push(card.clone()),
            None => {
                eprintln!("Unknown exercise id: {}", id);
                return Err(Error::Validation(format!("Unknown exercise id: {}", id)));
            }
        }
    }

    let now = chrono::Utc::now();
    let deck = Deck::build_user_deck(
        next_deck_id(now),
        title.trim(),
        description.trim(),
        cards,
        now,
    );
    let deck_id = deck.id.clone();

    AppState::update(store_path, |state| add_deck(&mut state.decks, deck))?;

    println!("✓ Deck created! ({})", deck_id);
    Ok(())
}

fn cmd_delete(store_path: &std::path::Path, id: &str) -> Result<()> {
    AppState::update(store_path, |state| {
        delete_deck(&mut state.decks, id);
        Ok(())
    })?;
    println!("✓ Deck deleted ({})", id);
    Ok(())
}

/// What the user did with the current card
enum CardAction {
    Complete,
    Skip,
    /// End the session now, keeping the counts accrued so far
    Quit,
}

fn cmd_start(
    store_path: &std::path::Path,
    deck_id: &str,
    auto_complete: bool,
    auto_skip: Option<u32>,
    rating: Option<u8>,
) -> Result<()> {
    let mut state = AppState::load(store_path)?;

    let Some(deck) = state.decks.iter().find(|d| d.id == deck_id).cloned() else {
        eprintln!("No deck with id {}", deck_id);
        return Err(Error::Validation(format!("No deck with id {}", deck_id)));
    };

    let non_interactive = auto_complete || auto_skip.is_some();
    let mut skips_left = auto_skip.unwrap_or(0);
    let input = (!non_interactive).then(spawn_stdin_reader);

    let mut engine = SessionEngine::new();
    engine.start(deck.clone(), chrono::Utc::now());

    println!("Starting \"{}\" ({} exercises)", deck.title, deck.len());

    let mut quit_early = false;
    while !engine.is_complete() {
        let card = engine
            .current_exercise()
            .expect("incomplete session has a current card")
            .clone();
        let position = engine.active().map(|s| s.cursor + 1).unwrap_or(0);

        println!();
        println!("[{}/{}] {}", position, deck.len(), card.name);
        println!("  {}", card.description);

        let action = if non_interactive {
            if skips_left > 0 {
                skips_left -= 1;
                println!("  (auto-skip)");
                CardAction::Skip
            } else {
                println!("  (auto-complete)");
                CardAction::Complete
            }
        } else {
            let input = input.as_ref().expect("interactive mode has a stdin reader");
            match card.kind {
                ExerciseKind::Timed => run_countdown(&card, input),
                ExerciseKind::RepBased => {
                    println!("  {} REPS", card.duration);
                    prompt_card_action(input)
                }
            }
        };

        match action {
            CardAction::Complete => {
                engine.advance(false);
            }
            CardAction::Skip => {
                engine.advance(true);
            }
            CardAction::Quit => {
                quit_early = true;
                break;
            }
        }
    }

    let rating = rating.unwrap_or_else(|| match &input {
        Some(input) => prompt_rating(input),
        None => DEFAULT_RATING,
    });

    let outcome = engine.finalize(rating, chrono::Utc::now(), &mut state);
    let Finalize::Completed { record, xp_earned } = outcome else {
        return Ok(());
    };

    state.save(store_path)?;

    println!();
    if quit_early {
        println!("✓ Session ended");
    } else {
        println!("✓ Workout complete!");
    }
    println!(
        "  {} completed, {} skipped, {} XP earned",
        record.completed, record.skipped, xp_earned
    );
    println!("  Total XP: {}", state.user.total_xp);
    Ok(())
}

/// Forward stdin lines (trimmed) over a channel so the countdown loop can
/// poll for input between ticks without blocking on a read
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line.trim().to_string()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run the countdown for a timed card, ticking once per second.
///
/// Expiry credits the card as completed; the user can also complete early
/// (Enter), skip, quit, or toggle pause while the countdown runs.
fn run_countdown(card: &ExerciseCard, input: &mpsc::Receiver<String>) -> CardAction {
    let mut countdown = Countdown::new(card.duration);
    print!(
        "  {}s  [Enter done / s skip / p pause / q quit]  ",
        countdown.remaining()
    );
    let _ = io::stdout().flush();

    loop {
        std::thread::sleep(std::time::Duration::from_secs(1));

        while let Ok(line) = input.try_recv() {
            match line.to_lowercase().as_str() {
                "" => {
                    println!(" done");
                    return CardAction::Complete;
                }
                "s" => return CardAction::Skip,
                "q" => return CardAction::Quit,
                "p" => {
                    if countdown.is_paused() {
                        countdown.resume();
                        println!(" resumed");
                    } else {
                        countdown.pause();
                        println!(" paused ({}s left)", countdown.remaining());
                    }
                }
                _ => {}
            }
        }

        match countdown.tick() {
            Tick::Running(left) => {
                print!("{}s ", left);
                let _ = io::stdout().flush();
            }
            Tick::Expired => {
                println!(" done");
                return CardAction::Complete;
            }
            Tick::Paused => {}
        }
    }
}

fn prompt_card_action(input: &mpsc::Receiver<String>) -> CardAction {
    println!("Press Enter when done, 's' to skip, 'q' to quit");
    print!("> ");
    let _ = io::stdout().flush();

    match input.recv() {
        Ok(line) => match line.to_lowercase().as_str() {
            "s" => CardAction::Skip,
            "q" => CardAction::Quit,
            _ => CardAction::Complete,
        },
        // Stdin closed; treat as done
        Err(_) => CardAction::Complete,
    }
}

fn prompt_rating(input: &mpsc::Receiver<String>) -> u8 {
    println!();
    println!("How was the difficulty? (1-5, Enter to skip)");
    print!("> ");
    let _ = io::stdout().flush();

    match input.recv() {
        Ok(line) => line.parse::<u8>().unwrap_or(DEFAULT_RATING),
        Err(_) => DEFAULT_RATING,
    }
}

fn cmd_profile(store_path: &std::path::Path) -> Result<()> {
    let state = AppState::load(store_path)?;
    let stats = profile_stats(&state.sessions);
    let streak = current_streak(&state.sessions, chrono::Utc::now().date_naive());

    println!("{}", state.user.username);
    if let Some(session) = StubAuth.current_session() {
        println!("  Signed in as {}", session.email);
    }
    println!("  Total XP:    {}", state.user.total_xp);
    println!("  Workouts:    {}", state.user.total_workouts);
    println!("  Minutes:     {}", stats.total_minutes);
    println!("  Avg Rating:  {}", stats.average_rating);
    println!("  Day Streak:  {}", streak);

    let recent = recent_sessions(&state.sessions, 5);
    if recent.is_empty() {
        println!();
        println!("No workout sessions yet");
    } else {
        println!();
        println!("Recent sessions:");
        for session in recent {
            println!(
                "  {}  {} completed / {} skipped, {}m, rated {}",
                session.timestamp.format("%Y-%m-%d"),
                session.completed,
                session.skipped,
                session.total_duration / 60,
                session.rating,
            );
        }
    }
    Ok(())
}

fn cmd_rename(store_path: &std::path::Path, username: &str) -> Result<()> {
    AppState::update(store_path, |state| state.rename_user(username))?;
    println!("✓ Profile updated!");
    Ok(())
}

fn cmd_signout() -> Result<()> {
    // Sign-out failures are non-fatal; local state stays usable
    if let Err(e) = StubAuth.sign_out() {
        eprintln!("Failed to sign out: {}", e);
    } else {
        println!("✓ Signed out");
    }
    Ok(())
}

fn cmd_leaderboard(store_path: &std::path::Path) -> Result<()> {
    let state = AppState::load(store_path)?;
    let catalog = get_default_catalog();
    let ranked = rank_profiles(&state.user, &catalog.rivals);

    println!("Leaderboard");
    for (i, entry) in ranked.iter().enumerate() {
        let marker = if entry.is_local { " (You)" } else { "" };
        println!(
            "  {}. {}{} - {} XP, {} workouts",
            i + 1,
            entry.username,
            marker,
            entry.total_xp,
            entry.total_workouts,
        );
    }
    Ok(())
}

fn cmd_export(
    store_path: &std::path::Path,
    output: Option<PathBuf>,
    data_dir: &std::path::Path,
) -> Result<()> {
    let state = AppState::load(store_path)?;
    let csv_path = output.unwrap_or_else(|| data_dir.join("sessions.csv"));

    let count = export_sessions(&state.sessions, &csv_path)?;
    println!("✓ Exported {} sessions to {}", count, csv_path.display());
    Ok(())
}

fn cmd_reset(store_path: &std::path::Path) -> Result<()> {
    let fresh = AppState::clear(store_path)?;
    fresh.save(store_path)?;
    println!("✓ Local data cleared");
    Ok(())
}
