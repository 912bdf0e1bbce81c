use anyhow::Error;
use futures::StreamExt;
use log::info;
use theme_detector::{Theme, ThemeDetector};
use theme_detector_config::{init_logger, load_config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    init_logger()?;

    let config = load_config().unwrap_or_else(|err| {
        eprintln!("Using default detector settings: {err:#}");
        Default::default()
    });
    let detector = ThemeDetector::init(config);

    println!(
        "backend: {}, supported: {}, dark: {}",
        detector.backend_name(),
        ThemeDetector::is_supported(),
        detector.theme().is_dark()
    );

    let mut changes = detector.subscribe();
    loop {
        tokio::select! {
            change = changes.next() => match change {
                Some(dark) => println!("theme changed: {:?}", Theme::from(dark)),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                break;
            }
        }
    }

    Ok(())
}
