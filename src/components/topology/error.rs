use thiserror::Error;

/// Failures acquiring the drawing surface. The component logs these and
/// renders nothing.
#[derive(Debug, Error)]
pub enum SurfaceError {
	#[error("no global window")]
	NoWindow,
	#[error("canvas element is not mounted")]
	NotMounted,
	#[error("2d context unavailable: {0}")]
	NoContext(String),
}
