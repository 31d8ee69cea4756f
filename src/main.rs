//! # Webpad - An Editor Core for the Web Trio
//!
//! Highlighting, completion, search and browser previews for HTML,
//! CSS and JavaScript files.
//!
//! ## Quick Start
//!
//! ```bash
//! # Highlight a file in the terminal
//! cargo run -- page.html
//!
//! # Search from the top of a stylesheet
//! cargo run -- style.css --find color
//!
//! # Rewrite a script, then preview it in the browser
//! cargo run -- app.js --replace var let --run
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webpad_core::{Config, EditorSession, FindOutcome};
use webpad_syntax::Language;

/// Webpad - an editor core for HTML, CSS and JavaScript
#[derive(Parser, Debug)]
#[command(name = "webpad")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Language override (html, css, javascript); unknown names fall
    /// back to html
    #[arg(short, long, value_name = "LANG")]
    language: Option<String>,

    /// Encoding for reading the file, e.g. utf-8 or cp1251
    #[arg(short, long, value_name = "LABEL")]
    encoding: Option<String>,

    /// Find the first match at or after the start of the document
    #[arg(short, long, value_name = "TEXT")]
    find: Option<String>,

    /// Replace every occurrence of FROM with TO
    #[arg(short, long, num_args = 2, value_names = ["FROM", "TO"])]
    replace: Option<Vec<String>>,

    /// Write the document to a temp page and open it in the browser
    #[arg(long)]
    run: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Webpad v{}", env!("CARGO_PKG_VERSION"));

    let mut session = EditorSession::new(Config::load());

    // Each step below logs its failure and moves on, so one bad
    // operation never takes down the rest of the invocation
    if let Some(file) = &args.file {
        let outcome = match &args.encoding {
            Some(label) => session.open_with_encoding(file, label),
            None => session.open(file),
        };
        if let Err(e) = outcome {
            tracing::error!(file = %file.display(), "open failed: {e}");
        }
    }

    if let Some(name) = &args.language {
        session.set_language(Language::from_name(name));
    }

    if let Some(pair) = &args.replace {
        // clap guarantees exactly two values
        let count = session.replace_all(&pair[0], &pair[1]);
        println!("Replaced {count} occurrence(s) of {:?}", pair[0]);
    }

    if let Some(needle) = &args.find {
        match session.find(needle) {
            Ok(FindOutcome::Found { at, .. }) => println!("Found {needle:?} at {at}"),
            Ok(FindOutcome::NotFound) => println!("No match for {needle:?}"),
            Err(e) => tracing::error!("find failed: {e}"),
        }
    }

    if args.run {
        let launched = match session.language() {
            Language::Html => session.run_html().map(Some),
            Language::JavaScript => session.run_javascript().map(Some),
            Language::Css => {
                tracing::warn!("stylesheets have no run action");
                Ok(None)
            }
        };
        match launched {
            Ok(Some(path)) => println!("Preview: {}", path.display()),
            Ok(None) => {}
            Err(e) => tracing::error!("preview failed: {e}"),
        }
    }

    print!("{}", render_ansi(&session));

    Ok(())
}

/// Paints the buffer for the terminal, one color per style range.
fn render_ansi(session: &EditorSession) -> String {
    let text = session.text();
    let theme = session.theme();
    let plain = theme.foreground.ansi_fg();
    let mut out = String::new();
    let mut cursor = 0;
    for range in session.styles().ranges() {
        // Match highlights appended by --find can overlap syntax
        // ranges; the first style wins on a terminal
        if range.span.start < cursor {
            continue;
        }
        if range.span.start > cursor {
            out.push_str(&plain);
            out.push_str(&text[cursor..range.span.start]);
        }
        out.push_str(&theme.style_color(range.style).ansi_fg());
        out.push_str(&text[range.span.clone()]);
        cursor = range.span.end;
    }
    if cursor < text.len() {
        out.push_str(&plain);
        out.push_str(&text[cursor..]);
    }
    out.push_str("\x1b[0m");
    out
}
