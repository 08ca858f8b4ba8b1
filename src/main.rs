use anyhow::{Context, Result};
use std::sync::Arc;
use timeblock::config::Config;
use timeblock::logging::init_logging;
use timeblock::sensor::{SystemClock, TimeBlockSensor};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_logging(&config.logging).context("Failed to initialize logging")?;

    let clock = SystemClock::from_config(&config)?;
    let mut sensor = TimeBlockSensor::new(config.clone(), Arc::new(clock));

    info!("Timeblock sensor starting up");

    #[cfg(feature = "web")]
    let web_task = config.web.enabled.then(|| {
        let state_rx = sensor.subscribe();
        let web_config = Arc::new(config.clone());
        tokio::spawn(async move {
            if let Err(e) = timeblock::web::serve(state_rx, web_config).await {
                error!("Web server error: {}", e);
            }
        })
    });

    // Stop the refresh loop on Ctrl-C
    let shutdown = sensor.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown.send(());
        }
    });

    let result = sensor.run().await;

    #[cfg(feature = "web")]
    let _ = web_task.map(|task| task.abort());

    match result {
        Ok(()) => {
            info!("Sensor shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("Sensor failed with error: {}", e);
            Err(anyhow::anyhow!("Sensor error: {}", e))
        }
    }
}
