use tunescout::{
    config::Config,
    ui::app::App,
    util::{hook::set_panic_hook, log::initialize_logging},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    setup()?;

    let config = Config::from_env()?;
    tracing::info!(country = config.country.as_str(), page_size = config.page_size, "starting");

    let mut app = App::new(config)?;
    app.run().await
}

fn setup() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    set_panic_hook();
    initialize_logging()
}
