/// Caller misuse of a ranked sequence or cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RankedError {
	#[error("index {index} out of bounds for sequence of length {len}")]
	IndexOutOfBounds { index: usize, len: usize },

	#[error("no more elements")]
	NoSuchElement,
}
