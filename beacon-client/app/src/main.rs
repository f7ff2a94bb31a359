use beacon_client::app::{App, Config, setup_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_args(std::env::args_os())?;
    setup_logging(config.log_level)?;

    App::from_config(config)?.run().await?;
    Ok(())
}
