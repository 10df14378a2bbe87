use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shogi_client::core::config::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use shogi_client::core::{ClientConfig, FileSessionStore};
use shogi_client::game::resources::Origin;
use shogi_client::game::{BoardView, ClickOutcome, GameController, PieceCode, PieceKind, Side, Square};
use shogi_client::networking::{HttpGameService, RemoteGameSession};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shogi-client", about = "Play shogi against a remote rules service")]
struct Cli {
    /// Base URL of the rules service
    #[arg(long, env = "SHOGI_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "SHOGI_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Directory holding session.json
    #[arg(long, env = "SHOGI_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Ask for promotion on every move
    #[arg(long)]
    promote: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new game and remember it
    New,
    /// Print the remembered game
    Show,
    /// List legal destinations from a square (`7g`) or for a drop (`P*`)
    Moves { origin: String },
    /// Play a move
    Play {
        from: String,
        to: String,
        #[arg(long)]
        promote: bool,
    },
    /// Let the engine play
    Ai,
    /// Click-driven session on stdin (default)
    Interactive,
}

type Controller = GameController<HttpGameService>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::new(
        &cli.endpoint,
        Duration::from_secs(cli.timeout_secs),
        cli.state_dir.clone(),
    )?;
    tracing::info!("Using rules service at {}", config.endpoint);

    let store = Arc::new(FileSessionStore::in_dir(config.state_dir.as_deref()));
    tracing::debug!("Session file: {}", store.path().display());
    let service = HttpGameService::new(config)?;
    let controller = GameController::new(RemoteGameSession::new(service, store))
        .with_auto_promote(cli.promote);

    match cli.command.unwrap_or(Command::Interactive) {
        Command::New => {
            let id = controller.new_game().await?;
            println!("Started game {id}");
            print_view(&controller.view());
        }
        Command::Show => {
            require_game(&controller).await?;
            print_view(&controller.view());
        }
        Command::Moves { origin } => {
            require_game(&controller).await?;
            let origin: Origin = origin.parse()?;
            let destinations = controller.session().query_legal_moves(origin).await?;
            if destinations.is_empty() {
                println!("No legal moves from {origin}");
            } else {
                let labels: Vec<String> = destinations.iter().map(|s| s.to_string()).collect();
                println!("{origin}: {}", labels.join(" "));
            }
        }
        Command::Play { from, to, promote } => {
            require_game(&controller).await?;
            let from: Origin = from.parse()?;
            let to: Square = to.parse()?;
            controller
                .session()
                .submit_move(from, to, promote || cli.promote)
                .await?;
            print_view(&controller.view());
        }
        Command::Ai => {
            require_game(&controller).await?;
            controller.use_ai().await?;
            print_view(&controller.view());
        }
        Command::Interactive => interactive(&controller).await?,
    }
    Ok(())
}

async fn require_game(controller: &Controller) -> Result<()> {
    if controller.resume().await?.is_none() {
        bail!("No game in progress; run `shogi-client new` first");
    }
    Ok(())
}

async fn interactive(controller: &Controller) -> Result<()> {
    match controller.resume().await {
        Ok(Some(game)) => println!("Resumed game {}", game.id),
        Ok(None) => println!("Started game {}", controller.new_game().await?),
        Err(e) => {
            println!("Could not resume ({e}); starting a new game");
            println!("Started game {}", controller.new_game().await?);
        }
    }
    print_view(&controller.view());
    println!("Commands: click <square>, hand <piece letter>, ai, new, show, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let words: Vec<&str> = line.split_whitespace().collect();
        let result = match words.as_slice() {
            [] => continue,
            ["quit" | "exit" | "q"] => break,
            ["show"] => Ok(()),
            ["new"] => controller.new_game().await.map(|id| println!("Started game {id}")),
            ["ai"] => controller.use_ai().await,
            ["click", label] => match label.parse::<Square>() {
                Ok(square) => controller.click(square).await.map(report_click),
                Err(e) => Err(e),
            },
            ["hand", letter] => match hand_kind(letter) {
                Some(kind) => controller.select_hand(kind).await.map(report_click),
                None => {
                    println!("Unknown piece {letter:?}");
                    continue;
                }
            },
            _ => {
                println!("Unrecognised command: {line}");
                continue;
            }
        };
        if let Err(e) = result {
            println!("Error: {e}");
        }
        print_view(&controller.view());
    }
    Ok(())
}

fn hand_kind(letter: &str) -> Option<PieceKind> {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PieceKind::from_letter(c),
        _ => None,
    }
}

fn report_click(outcome: ClickOutcome) {
    match outcome {
        ClickOutcome::Selected {
            origin,
            destinations,
        } => println!("{origin} selected, {} destinations", destinations.count()),
        ClickOutcome::Superseded => {}
        ClickOutcome::Moved { from, to } => println!("Moved {from} -> {to}"),
    }
}

fn print_view(view: &BoardView) {
    println!();
    println!("{}", hand_line(Side::Lower, &view.lower_hand));
    println!("  9  8  7  6  5  4  3  2  1");
    for (row, cells) in view.board.rows().iter().enumerate() {
        let mut line = String::from(" ");
        for (col, cell) in cells.iter().enumerate() {
            let square = Square::from_grid(row, col);
            let marker = if view.selected == Some(Origin::Board(square)) {
                '['
            } else if view.destinations.contains(square) {
                '*'
            } else {
                ' '
            };
            line.push(marker);
            match cell {
                Some(piece) => line.push_str(&glyph(*piece)),
                None => line.push_str(" ・"),
            }
        }
        line.push(' ');
        line.push(square_rank(row));
        println!("{line}");
    }
    println!("{}", hand_line(Side::Upper, &view.upper_hand));
    if view.move_count > 0 {
        println!("{} moves played", view.move_count);
    }
}

fn square_rank(row: usize) -> char {
    Square::from_grid(row, 0).rank()
}

/// Pieces of the side drawn on top are marked with `v`, as in KIF diagrams
fn glyph(piece: PieceCode) -> String {
    match piece.side {
        Side::Lower => format!("v{}", piece.symbol()),
        Side::Upper => format!(" {}", piece.symbol()),
    }
}

/// `歩×3 角` style; a single piece shows no count
fn hand_line(side: Side, counts: &[(PieceKind, usize)]) -> String {
    let pieces: Vec<String> = counts
        .iter()
        .map(|&(kind, count)| {
            let symbol = PieceCode::new(kind, side).symbol();
            if count > 1 {
                format!("{symbol}×{count}")
            } else {
                symbol.to_string()
            }
        })
        .collect();
    let pieces = if pieces.is_empty() {
        "なし".to_string()
    } else {
        pieces.join(" ")
    };
    format!("{} hand: {}", side.label(), pieces)
}
