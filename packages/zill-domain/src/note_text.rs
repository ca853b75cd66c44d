pub const TITLE_CONTENT_SEPARATOR: &str = "\n\n";

/// Text handed to the embedding provider for a note.
///
/// Absent content embeds exactly like empty content.
pub fn embedding_input(title: &str, content: Option<&str>) -> String {
	let content = content.unwrap_or_default();
	let mut out =
		String::with_capacity(title.len() + TITLE_CONTENT_SEPARATOR.len() + content.len());

	out.push_str(title);
	out.push_str(TITLE_CONTENT_SEPARATOR);
	out.push_str(content);

	out
}
