use std::sync::Arc;

use serde::Deserialize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "ego_sample".to_string(),
            width: 800,
            height: 800,
            resizable: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Unable to create window: {0}")]
    Create(#[from] winit::error::OsError),
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, WindowError> {
    // Sizes are physical pixels: the scene viewport is expressed in drawable pixels.
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_resizable(config.resizable)
        .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height));

    let window = event_loop.create_window(attrs)?;
    log::debug!("Window '{}' created", config.title);
    Ok(Arc::new(window))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_square_and_resizable() {
        let config = PlatformConfig::default();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 800);
        assert!(config.resizable);
        assert_eq!(config.title, "ego_sample");
    }
}
