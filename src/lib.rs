pub mod captions;
pub mod config;
pub mod handlers;
pub mod state;

/// Extract the video ID from various YouTube URL formats
///
/// The ID is always exactly 11 characters, delimited by anything in
/// `"&?/` or whitespace. First matching shape wins; the rest of the URL is
/// not validated.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    // youtube.com/<segment>/<...>/ID (old-style deep links, user pages)
    if let Some(caps) = regex::Regex::new(r#"youtube\.com/[^/]+/.+/([^"&?/\s]{11})"#)
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtube.com/v/ID, youtube.com/e/ID, youtube.com/embed/ID
    if let Some(caps) = regex::Regex::new(r#"youtube\.com/(?:v|e|embed)/([^"&?/\s]{11})"#)
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtube.com/watch?v=ID (the v parameter anywhere in the query)
    if let Some(caps) = regex::Regex::new(r#"youtube\.com/.*[?&]v=([^"&?/\s]{11})"#)
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtu.be/ID
    if let Some(caps) = regex::Regex::new(r#"youtu\.be/([^"&?/\s]{11})"#)
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    None
}
