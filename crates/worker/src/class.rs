/// Execution classes used when scheduling navigation-driven work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Record fetches that back the form currently on screen.
	Interactive,
	/// Deferred view code that the outlet is waiting on behind a placeholder.
	ViewChunk,
}

impl TaskClass {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::ViewChunk => "view_chunk",
		}
	}
}
