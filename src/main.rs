use anyhow::Result;
use log::{debug, error, info, trace};
use rayportal_common::{GameConfig, TickSnapshot};
use rayportal_engine::PortalGame;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting portal raycaster (headless)...");

    // --- Load Configuration ---
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = GameConfig::load(&config_path)?;
    info!("Loaded configuration from {}.", config_path);

    // --- Initialize Game ---
    let mut game = PortalGame::new(config)?;
    debug!("Render parameters: {:#?}", game.params());

    let total_ticks = game.config.run.ticks;
    let record_interval_ticks = game.config.run.record_interval_ticks.max(1);
    info!(
        "Running {} ticks at {}x{}, recording every {} ticks.",
        total_ticks,
        game.params().width,
        game.params().height,
        record_interval_ticks
    );

    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    // --- Initial Snapshot (tick 0) ---
    game.record_snapshot();

    for tick in 0..total_ticks {
        let tick_start_time = Instant::now();
        if let Err(e) = game.tick() {
            error!("Error during tick {}: {:#}", tick + 1, e);
            anyhow::bail!("Game tick failed.");
        }
        let tick_duration = tick_start_time.elapsed();

        let current_time = Instant::now();
        let print_interval_secs = 5.0;
        let should_print_status = current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_record_tick = (tick + 1) % record_interval_ticks == 0;
        let is_last_tick = tick + 1 == total_ticks;

        if is_record_tick || is_last_tick {
            game.record_snapshot();
        }

        if should_print_status || is_last_tick {
            info!(
                "Tick [{}/{}] | Render: {:6.2} ms | Tick: {:6.2} ms | Elapsed: {:.2} s",
                tick + 1,
                total_ticks,
                game.last_render_ms(),
                tick_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            game.log_summary();
            previous_print_time = current_time;
        } else {
            trace!(
                "Tick [{}/{}] completed in {:.2} ms",
                tick + 1,
                total_ticks,
                tick_duration.as_secs_f64() * 1000.0
            );
        }
    }

    let total_duration = start_time.elapsed();
    info!(
        "Finished {} ticks in {:.3} seconds ({:.1} ticks/s).",
        total_ticks,
        total_duration.as_secs_f64(),
        total_ticks as f64 / total_duration.as_secs_f64().max(1e-9)
    );

    // --- Save Recorded Data ---
    if game.config.output.save_stats {
        let output_format = game.config.output.format.as_deref().unwrap_or("json");
        let base = &game.config.output.base_filename;
        let snapshots = game.get_recorded_snapshots();

        match output_format {
            "csv" => {
                let filename = format!("{}_ticks.csv", base);
                match save_csv(&filename, snapshots) {
                    Ok(()) => info!("{} snapshots saved to {}", snapshots.len(), filename),
                    Err(e) => error!("Error saving CSV file '{}': {}", filename, e),
                }
            }
            _ => {
                let filename = format!("{}_ticks.json", base);
                match File::create(&filename) {
                    Ok(mut file) => match serde_json::to_string(snapshots) {
                        Ok(json_string) => {
                            if let Err(e) = file.write_all(json_string.as_bytes()) {
                                error!("Error writing snapshot JSON to file '{}': {}", filename, e);
                            } else {
                                info!("{} snapshots saved to {}", snapshots.len(), filename);
                            }
                        }
                        Err(e) => error!("Error serializing snapshots to JSON: {}", e),
                    },
                    Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
                }
            }
        }
    } else {
        info!("Skipping saving snapshots as per config (save_stats is false).");
    }

    info!("Done.");
    Ok(())
}

fn save_csv(filename: &str, snapshots: &[TickSnapshot]) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename)?;
    for snapshot in snapshots {
        writer.serialize(snapshot)?;
    }
    writer.flush()?;
    Ok(())
}
