//! Practice Battle Example
//!
//! Plays a battle in the terminal against a synthetic opponent, or against a
//! friend's plant with `--friend`, then prints the stored results.
//!
//! ```text
//! RUST_LOG=arena_battle=debug cargo run -p arena-client --example practice_battle -- --friend
//! ```

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use arena_client::{
    ArenaSession, BattleSnapshot, BattleStore, Category, Combatant, EntityStore, Entity,
    MemoryBattleStore, MemoryEntityStore, SessionConfig,
};

fn render(snapshot: &BattleSnapshot) {
    let bar = |c: &Combatant| {
        let filled = (c.health_percent() / 10) as usize;
        format!(
            "{} {:<14} [{}{}] {:>3}/{:<3} energy {:>3}",
            c.icon,
            c.name,
            "#".repeat(filled),
            "-".repeat(10 - filled.min(10)),
            c.health,
            c.max_health,
            c.energy
        )
    };

    println!();
    if let Some(opponent) = &snapshot.opponent {
        println!("  {}", bar(opponent));
    }
    if let Some(player) = &snapshot.player {
        println!("  {}", bar(player));
    }
    println!("  > {}", snapshot.log);
}

fn prompt_move(player: &Combatant) -> Result<Option<usize>> {
    for (i, mv) in player.moves.iter().enumerate() {
        let marker = if player.can_afford(mv) { ' ' } else { '!' };
        println!(
            "  {}{}) {:<16} {:<8} power {:<5} cost {}",
            marker,
            i + 1,
            mv.name,
            mv.kind(),
            mv.power(),
            mv.cost()
        );
    }
    print!("Choose a move (q to run away): ");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return Ok(None);
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=player.moves.len()).contains(&n) => Ok(Some(n - 1)),
        _ => {
            println!("Pick a number between 1 and {}", player.moves.len());
            prompt_move(player)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let friend_battle = std::env::args().any(|a| a == "--friend");

    let mut basil = Entity::new("basil-1", "Basil", Category::Herbs).with_owner("alice");
    basil.age_days = 120;
    basil.robustness = Some(1.2);
    let mut aloe = Entity::new("aloe-1", "Aloe", Category::Succulents).with_owner("bob");
    aloe.age_days = 300;
    aloe.victories = 8;
    aloe.defeats = 3;

    let entities = MemoryEntityStore::with_entities([basil, aloe]);
    let battles = MemoryBattleStore::new();
    battles.register_user("alice", "Alice").await;
    battles.register_user("bob", "Bob").await;

    let config = SessionConfig {
        opponent_delay_ms: 600,
        ..SessionConfig::default()
    };
    let session = ArenaSession::new(config)
        .with_entity_store(Arc::new(entities.clone()))
        .with_battle_store(Arc::new(battles.clone()));

    let friends = vec!["aloe-1".to_string()];
    session
        .prepare_from_store("basil-1", friend_battle.then_some(friends.as_slice()))
        .await
        .context("Failed to prepare battle")?;
    session.confirm().await?;

    while !session.is_finished().await {
        let snapshot = session.snapshot().await;
        render(&snapshot);

        let player = snapshot.player.context("Battle has no player")?;
        let Some(index) = prompt_move(&player)? else {
            session.reset().await;
            println!("You ran away. Nothing was recorded.");
            return Ok(());
        };

        let exchange = session.play_move(index).await?;
        println!("  > {}", exchange.player_turn.log);
        if let Some(counter) = &exchange.counter {
            println!("  > {}", counter.log);
        }
    }

    render(&session.snapshot().await);

    if let Some((outcome, report)) = session.report_outcome().await? {
        println!(
            "\n{} won after {} exchanges",
            outcome.winning().name,
            outcome.exchanges
        );
        if let Some(report) = report {
            for update in &report.local {
                println!("  {} {:?} -> {}", update.entity_id, update.stat, update.value);
            }
            if let Some(summary) = report.remote_summary().await {
                println!("  remote: {:?}", summary);
            }
        }
    }

    let basil = entities.get_by_id("basil-1").await?;
    println!("\nBasil record: {}W / {}L", basil.victories, basil.defeats);

    for row in battles.list_leaderboard().await? {
        println!(
            "  {:<8} {:>2}W {:>2}L ({:.0}%)",
            row.name,
            row.victories,
            row.defeats,
            row.win_rate() * 100.0
        );
    }

    Ok(())
}
