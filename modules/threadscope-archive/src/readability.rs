// Rendered thread pages → plain markdown for the corpus.

use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};

/// Comment bodies sit outside what an article extractor treats as the
/// main content, so both readability and main-content trimming stay off.
fn thread_page_config() -> TransformConfig {
    TransformConfig {
        readability: false,
        main_content: false,
        return_format: ReturnFormat::Markdown,
        filter_images: true,
        filter_svg: true,
        clean_html: true,
    }
}

/// Convert a thread page's HTML to markdown, collapsing runs of blank
/// lines left behind by stripped navigation and vote widgets.
pub(crate) fn html_to_markdown(html: &str, page_url: &str) -> String {
    let parsed_url = url::Url::parse(page_url).ok();
    let input = TransformInput {
        url: parsed_url.as_ref(),
        content: html.as_bytes(),
        screenshot_bytes: None,
        encoding: None,
        selector_config: None,
        ignore_tags: None,
    };
    collapse_blank_lines(&transform_content_input(input, &thread_page_config()))
}

fn collapse_blank_lines(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut blank_run = 0;
    for line in markdown.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
