pub mod claude;
pub mod gemini;
pub mod openai;
pub mod traits;
mod transport;
pub mod util;

pub use claude::Claude;
pub use gemini::Gemini;
pub use openai::OpenAi;
pub use traits::TextModel;
pub use util::{strip_code_blocks, truncate_to_char_boundary};
