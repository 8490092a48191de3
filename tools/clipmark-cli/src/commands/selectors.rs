//! Show the current selector labels.

use clipmark_common::config::AppConfig;
use clipmark_model::selector::{RotatingSelector, SelectorKind};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let selectors = [
        (SelectorKind::Artwork, config.labels.artworks.clone()),
        (SelectorKind::Distance, config.labels.distances.clone()),
    ];

    for (kind, labels) in selectors {
        let count = labels.len();
        let selector = RotatingSelector::load(&config.data_dir, kind, labels)?;
        println!(
            "{:<9} {} (rotation {}, {} labels)",
            format!("{kind}:"),
            selector.current(),
            selector.rotations(),
            count
        );
    }

    Ok(())
}
