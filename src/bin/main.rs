use anyhow::Context;
use chrono::Utc;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use sigma_core::config::AppConfig;
use sigma_core::core::types::Achievement;
use sigma_core::persistence::FileStorage;
use sigma_core::share::{NoNativeShare, Osc52Clipboard, ShareOutcome};
use sigma_core::{Direction, Session, Translator};
use std::io::{stdin, stdout, Write};
use std::thread;
use std::time::Duration;

const LOG_FILE: &str = "sigma_translator.log";
const NOTIFICATION_DELAY: Duration = Duration::from_millis(700);

fn main() -> anyhow::Result<()> {
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let config = AppConfig::load();
    let dictionary = config.load_dictionary().context("Could not load dictionary")?;
    let translator = Translator::with_marker(dictionary, config.marker.clone());
    let storage = FileStorage::open_or_empty(&config.storage_path);
    let mut session = Session::restore(Box::new(storage), translator, config.session_options());
    tracing::info!(storage = ?config.storage_path, "Sigma translator started");

    let mut direction = Direction::ToSigma;
    let mut status = String::new();

    loop {
        print_ui(&session, direction, &status)?;
        status.clear();

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();

        match cmd {
            "exit" => break,
            ":dir" => direction = direction.flipped(),
            ":theme" => {
                let dark = session.toggle_theme();
                status = format!("Theme: {}", if dark { "dark" } else { "light" });
            }
            ":clear" => {
                session.clear_history();
                status = "History cleared.".to_string();
            }
            ":history" => print_history(&session)?,
            ":achievements" => print_achievements(&session)?,
            text if text == ":dict" || text.starts_with(":dict ") => {
                print_dictionary(&session, text.trim_start_matches(":dict"))?
            }
            ":share" => {
                let mut clipboard = Osc52Clipboard::new(stdout());
                let (outcome, unlocked) = session.share(Some(&mut NoNativeShare), &mut clipboard);
                status = match outcome {
                    ShareOutcome::Shared => "Shared!".to_string(),
                    ShareOutcome::Copied => "Copied to clipboard.".to_string(),
                    ShareOutcome::Failed => "Could not share.".to_string(),
                };
                announce(&unlocked)?;
            }
            text => {
                if let Some(outcome) = session.submit(text, direction, Utc::now()) {
                    status = format!("{} {}", "=>".yellow(), outcome.record.output.bold());
                    announce(&outcome.unlocked)?;
                }
            }
        }

        session.flush_if_due(Utc::now());
    }

    println!("\nSaving progress...");
    session.flush(Utc::now());
    tracing::info!(score = session.score(), "Sigma translator stopped");
    Ok(())
}

fn print_ui(session: &Session, direction: Direction, status: &str) -> anyhow::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    let title = "מתרגם סקיבידי";
    if session.dark_mode() {
        println!("{}", title.yellow().bold().on_black());
    } else {
        println!("{}", title.dark_yellow().bold());
    }
    println!("---------------------------------------------------------------");
    println!(
        "Score: {}   Streak: {}   Achievements: {}",
        session.score().to_string().green(),
        session.streak().to_string().red(),
        session.unlocked().len().to_string().cyan()
    );
    let arrow = match direction {
        Direction::ToSigma => "עברית -> סיגמה",
        Direction::FromSigma => "סיגמה -> עברית",
    };
    println!("Direction: {}", arrow.bold());
    println!("Commands: :dir :dict [term] :history :clear :achievements :share :theme exit\n");

    if !status.is_empty() {
        println!("{status}\n");
    }
    print!("> ");
    out.flush()?;
    Ok(())
}

/// Shows unlocks one at a time, in the order they were earned.
fn announce(unlocked: &[&'static Achievement]) -> anyhow::Result<()> {
    let mut out = stdout();
    for achievement in unlocked {
        writeln!(
            out,
            "\n{} {} {} (+{})",
            achievement.icon,
            "Achievement unlocked:".magenta().bold(),
            achievement.title,
            achievement.points
        )?;
        out.flush()?;
        thread::sleep(NOTIFICATION_DELAY);
    }
    Ok(())
}

fn print_history(session: &Session) -> anyhow::Result<()> {
    let mut out = stdout();
    if session.history().is_empty() {
        writeln!(out, "\nNo translations yet.")?;
    }
    for record in session.history().iter() {
        writeln!(
            out,
            "{}  {} {} {}",
            record.timestamp.format("%Y-%m-%d %H:%M").to_string().dark_grey(),
            record.input,
            "=>".yellow(),
            record.output
        )?;
    }
    pause(&mut out)
}

fn print_achievements(session: &Session) -> anyhow::Result<()> {
    let mut out = stdout();
    for achievement in session.unlocked().iter() {
        writeln!(
            out,
            "{} {} - {} ({} pts, {:?})",
            achievement.icon,
            achievement.title.green(),
            achievement.description,
            achievement.points,
            achievement.rarity
        )?;
    }
    for achievement in session.locked() {
        if achievement.hidden {
            writeln!(out, "🔒 {}", "???".dark_grey())?;
        } else {
            writeln!(out, "🔒 {} - {}", achievement.title.dark_grey(), achievement.description)?;
        }
    }
    pause(&mut out)
}

fn print_dictionary(session: &Session, term: &str) -> anyhow::Result<()> {
    let mut out = stdout();
    let mut found = 0;
    for entry in session.translator().dictionary().search(term) {
        writeln!(out, "{} {} {}", entry.source, "=>".yellow(), entry.target.as_str().bold())?;
        found += 1;
    }
    if found == 0 {
        writeln!(out, "\nNo dictionary entries match \"{}\".", term.trim())?;
    }
    pause(&mut out)
}

fn pause(out: &mut impl Write) -> anyhow::Result<()> {
    write!(out, "\nPress Enter to continue...")?;
    out.flush()?;
    let mut discard = String::new();
    stdin().read_line(&mut discard)?;
    Ok(())
}
