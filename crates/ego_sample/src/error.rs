use ego_platform::window::WindowError;
use ego_render::GpuInitError;

use crate::config::ConfigError;

/// Fatal startup failures. Each maps to a process exit code.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Unable to initialize windowing system: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Unable to initialize image decoding: PNG support is not enabled")]
    ImageDecoderUnavailable,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error("Unable to create GPU context: {0}")]
    Gpu(#[from] GpuInitError),
}

impl StartupError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::EventLoop(_) => 1,
            Self::ImageDecoderUnavailable => 2,
            Self::Config(_) | Self::Window(_) | Self::Gpu(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windowing_failure_exits_with_one() {
        let err = StartupError::from(winit::error::EventLoopError::ExitFailure(3));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn image_decoder_failure_exits_with_two() {
        assert_eq!(StartupError::ImageDecoderUnavailable.exit_code(), 2);
    }

    #[test]
    fn initialization_failures_exit_with_four() {
        assert_eq!(StartupError::from(GpuInitError::NoAdapter).exit_code(), 4);

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let config = ConfigError::Parse {
            path: "sample.json".into(),
            source: parse,
        };
        assert_eq!(StartupError::from(config).exit_code(), 4);
    }

    #[test]
    fn messages_describe_the_failure() {
        let msg = StartupError::from(GpuInitError::NoAdapter).to_string();
        assert!(msg.contains("No suitable GPU adapter"));
    }
}
