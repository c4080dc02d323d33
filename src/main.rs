use listomat::{config::AppConfig, App, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // We have a different logging mechanism for production
    #[cfg(not(debug_assertions))]
    {
        listomat::init_production_tracing()
    }
    #[cfg(debug_assertions)]
    {
        listomat::init_dbg_tracing();
    }

    // Missing SendGrid credentials end the process here, before anything is served.
    let config = AppConfig::load()?;
    let mode: &str = config.mode.as_ref();
    tracing::info!(mode, "config_loaded");

    let app = App::build_from_config(config).await?;
    app.run().await?;

    Ok(())
}
