use femm::Registry;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut registry = Registry::new();
    femm::demo::register(&mut registry);

    femm::run(registry)?;

    tracing::info!("femm shutting down");
    Ok(())
}
