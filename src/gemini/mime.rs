//! MIME type detection based on file extensions.

/// Native page format of the site.
pub const GEMTEXT: &str = "text/gemini";

/// Extension appended to extensionless request paths.
pub const PAGE_EXTENSION: &str = "gmi";

const FALLBACK: &str = "application/octet-stream";

/// Maps a file extension (without the dot, any case) to a MIME type.
pub fn from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "gmi" | "gemini" => GEMTEXT,
        "txt" => "text/plain; charset=utf-8",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "xml" => "application/xml",
        "atom" => "application/atom+xml",
        "rss" => "application/rss+xml",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => FALLBACK,
    }
}

/// MIME type for a store key such as `blog/post.gmi`.
pub fn from_path(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => from_extension(ext),
        _ => FALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemtext_and_unknown() {
        assert_eq!(from_path("index.gmi"), "text/gemini");
        assert_eq!(from_path("img/cat.PNG"), "image/png");
        assert_eq!(from_path("blob.xyz"), "application/octet-stream");
        assert_eq!(from_path(".hidden"), "application/octet-stream");
    }
}
