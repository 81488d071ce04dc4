use std::time::{Duration, Instant};

use lobby::gameplay::AutoRun;
use lobby::services::DailyRewardStatus;
use lobby::{logging, Lobby, LobbyConfig, LobbyView, SceneTransition, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

const FRAME: Duration = Duration::from_millis(100);

const HELP: &str = "commands: play | confirm | cancel | claim | promo | reset | status | pause | leave | help | exit";

fn show(view: &LobbyView) {
    println!("[{} coins] {}", view.balance, view.message);
}

fn show_status(lobby: &Lobby) {
    let status = lobby.status();
    let daily = match status.daily_reward {
        DailyRewardStatus::Claimable { day_index, reward } => format!("day {} reward of {} ready", day_index + 1, reward),
        DailyRewardStatus::Claimed => "claimed today".to_string(),
    };
    println!(
        "[{} coins] entry fee {} | daily: {} | next refill in {}",
        status.balance, status.entry_fee, daily, status.refill_countdown
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::setup();

    let config = match LobbyConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Save file: {}", config.save_path.display());

    let mut lobby = Lobby::new(&config, Box::new(SystemClock));
    let mut run: Option<AutoRun> = None;

    println!("{}", HELP);
    show_status(&lobby);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(FRAME);
    let mut last_frame = Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                let dt = now - last_frame;
                last_frame = now;

                if let Some(view) = lobby.tick() {
                    show(&view);
                }
                if let Some(active) = run.as_mut() {
                    if let Some(summary) = active.step(dt, now) {
                        show(&lobby.on_run_finished(&summary));
                        run = None;
                    }
                }
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };

                match line.trim() {
                    "" => {}
                    "play" if run.is_none() => show(&lobby.on_play_pressed()),
                    "confirm" if run.is_none() => {
                        let view = lobby.on_confirm_entry();
                        show(&view);
                        if let Some(SceneTransition::Gameplay(scene)) = view.transition {
                            info!("Loading scene {}", scene);
                            run = Some(AutoRun::new(config.finish_z));
                            lobby.on_gameplay_started();
                        }
                    }
                    "cancel" => show(&lobby.on_cancel_entry()),
                    "claim" => show(&lobby.on_claim_daily_reward()),
                    "promo" => show(&lobby.on_add_promo_coins()),
                    "reset" => show(&lobby.on_reset_coins()),
                    "status" => show_status(&lobby),
                    "pause" => match run.as_mut() {
                        Some(active) => println!("Run is now {:?}", active.toggle_pause()),
                        None => println!("No run in progress"),
                    },
                    "leave" => match run.take() {
                        Some(mut active) => show(&lobby.on_run_finished(&active.quit())),
                        None => println!("No run in progress"),
                    },
                    "play" | "confirm" => println!("Finish or leave the current run first"),
                    "help" => println!("{}", HELP),
                    "exit" | "quit" => break,
                    other => println!("Unknown command {:?}. {}", other, HELP),
                }
            }
        }
    }

    if let Err(e) = lobby.store().save() {
        error!("Failed to write save on exit: {}", e);
    }
    info!("Bye");
}
