pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors a turn can surface to its caller. Retrieval and persistence failures are absorbed
/// inside the pipeline and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, field: &'static str },
	#[error("Classification failed: {message}")]
	Classification { message: String },
}
