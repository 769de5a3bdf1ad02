//! Gem Duel - command line driver
//!
//! Offline demo playouts and remote store health checks.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gem_duel::board::spiral_order;
use gem_duel::core::{Seat, TokenKind, ALL_LEVELS};
use gem_duel::game::{
    CardSource, Game, Interaction, OutputMode, Progress, ReserveSource, VerbosityLevel,
};
use gem_duel::sync::{HttpStore, SessionStore};

/// Verbosity level (names or numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "gemduel")]
#[command(about = "Gem Duel - rules engine and session sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an offline demo game with a first-legal-action policy
    Demo {
        /// RNG seed for the deck shuffles and board fill
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Stop after this many completed turns
        #[arg(long, default_value = "40")]
        turns: u32,

        /// Output verbosity
        #[arg(long, default_value = "normal")]
        verbosity: VerbosityArg,
    },

    /// Check that a remote session store is reachable
    Status {
        /// Base URL of the store endpoint
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Demo {
            seed,
            turns,
            verbosity,
        } => run_demo(seed, turns, verbosity.0),
        Commands::Status { url } => check_status(&url).await,
    }
}

async fn check_status(url: &str) -> anyhow::Result<()> {
    let store = HttpStore::new(url);
    let status = store
        .status()
        .await
        .with_context(|| format!("store at {} unreachable", url))?;
    if status.is_operational() {
        println!("store operational");
        Ok(())
    } else {
        bail!("store reports status '{}'", status.status);
    }
}

fn run_demo(seed: u64, max_turns: u32, verbosity: VerbosityLevel) -> anyhow::Result<()> {
    let mut game = Game::new(seed);
    game.logger.set_verbosity(verbosity);
    game.logger.set_output_mode(OutputMode::Stdout);

    let mut completed_turns = 0u32;
    // Generous step bound; every turn takes a handful of steps at most
    for _ in 0..max_turns.saturating_mul(50) {
        if completed_turns >= max_turns {
            break;
        }
        match demo_step(&mut game)? {
            Some(Progress::TurnEnded) => completed_turns += 1,
            Some(_) => {}
            None => {
                println!("no legal action available; stopping");
                break;
            }
        }
    }

    println!("\n=== demo finished after {} turn(s) ===", completed_turns);
    for seat in [Seat::One, Seat::Two] {
        let player = game.state.player(seat);
        println!(
            "{}: {} points, {} crowns, {} cards, {} reserve(s), {} scroll(s), tokens {}",
            seat,
            game.points(seat),
            game.crowns(seat),
            player.cards.len(),
            player.reserves.len(),
            player.privileges,
            player.tokens,
        );
    }
    println!("{} logged turn(s) in the history", game.history.turns.len());
    Ok(())
}

/// One policy step: resolve any pending interaction, otherwise play the
/// first legal main action. Returns None when nothing is possible.
fn demo_step(game: &mut Game) -> anyhow::Result<Option<Progress>> {
    let seat = game.state.current;

    match game.interaction().clone() {
        Interaction::AwaitingDiscard { excess } => {
            let held = game.state.player(seat).tokens.expand();
            let kinds: Vec<TokenKind> = held.into_iter().take(excess as usize).collect();
            return Ok(Some(game.discard_tokens(&kinds)?));
        }
        Interaction::AwaitingBonusToken { color } => {
            let pos = gem_duel::game::ability::board_positions_of(&game.state, color)
                .into_iter()
                .next()
                .context("bonus token pending but color missing from board")?;
            return Ok(Some(game.resolve_bonus_token(pos)?));
        }
        Interaction::AwaitingSteal => {
            let opponent = game.state.player(seat.opponent());
            let kind = opponent
                .tokens
                .iter_nonzero()
                .map(|(kind, _)| kind)
                .find(|kind| !kind.is_gold())
                .context("steal pending but opponent holds nothing")?;
            return Ok(Some(game.resolve_steal(kind)?));
        }
        Interaction::AwaitingScrollToken => {
            let pos = first_gem_position(game).context("scroll pickup with empty board")?;
            return Ok(Some(game.pick_scroll_token(pos)?));
        }
        Interaction::AwaitingWildPlacement { .. } => {
            let stack = game
                .eligible_wild_stacks()
                .into_iter()
                .next()
                .context("wild placement with no eligible stack")?;
            return Ok(Some(game.place_wild(stack)?));
        }
        Interaction::AwaitingRoyal => {
            let royal = game.state.untaken_royals()[0];
            return Ok(Some(game.choose_royal(royal)?));
        }
        Interaction::Idle => {}
    }

    // First affordable card wins
    for level in ALL_LEVELS {
        for slot in 0..level.row_width() {
            let source = CardSource::Pyramid { level, slot };
            if game.card_at_source(source).is_err() {
                continue;
            }
            if game.is_affordable_at(source).unwrap_or(false) {
                match game.purchase(source, None) {
                    Ok(progress) => return Ok(Some(progress)),
                    // Wild card without an eligible stack: try something else
                    Err(_) => continue,
                }
            }
        }
    }

    // Otherwise take one token
    if let Some(pos) = first_gem_position(game) {
        return Ok(Some(game.take_tokens(&[pos])?));
    }

    // Otherwise reserve a card for the gold
    let gold = game.state.board.gold_positions();
    if let (Some(&gold_pos), true) = (gold.first(), game.state.player(seat).can_reserve()) {
        for level in ALL_LEVELS {
            for slot in 0..level.row_width() {
                let source = ReserveSource::Pyramid { level, slot };
                if game
                    .card_at_source(CardSource::Pyramid { level, slot })
                    .is_ok()
                {
                    return Ok(Some(game.reserve(source, gold_pos)?));
                }
            }
        }
    }

    // Last resort: refill the board from the bag
    if !game.state.bag.is_empty() {
        return Ok(Some(game.refill_board()?));
    }

    Ok(None)
}

fn first_gem_position(game: &Game) -> Option<gem_duel::board::Pos> {
    spiral_order().into_iter().find(|&pos| {
        game.state
            .board
            .token_at(pos)
            .map(|kind| !kind.is_gold())
            .unwrap_or(false)
    })
}
