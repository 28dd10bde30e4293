pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<reel_storage::Error> for Error {
	fn from(err: reel_storage::Error) -> Self {
		match err {
			reel_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			reel_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			reel_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
