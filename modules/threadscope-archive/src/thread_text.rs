// Plain-text rendering of a forum thread, shared by every strategy that
// receives structured thread data (forum JSON endpoint, actor runs).

use ai_client::truncate_to_char_boundary;

/// Opening posts are context; the prices live in the comments.
pub const OP_TEXT_LIMIT: usize = 500;

/// A thread reduced to what the extraction prompt needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadText {
    pub title: String,
    pub op_text: String,
    /// `(author, body)` in display order.
    pub comments: Vec<(String, String)>,
}

impl ThreadText {
    /// Render as `TITLE` / `OP_TEXT` / `COMMENTS` lines, keeping at most
    /// `max_comments` comments.
    pub fn render(&self, max_comments: usize) -> String {
        let mut out = format!(
            "TITLE: {}\nOP_TEXT: {}\nCOMMENTS:\n",
            self.title.trim(),
            truncate_to_char_boundary(self.op_text.trim(), OP_TEXT_LIMIT)
        );
        for (author, body) in self.comments.iter().take(max_comments) {
            out.push_str(&format!("- [{}]: {}\n", author, body.trim()));
        }
        out
    }
}
