//! Shared on-disk fixture: a site root with `images/` and `misc/`.

use std::path::Path;

use tempfile::TempDir;

pub const INDEX_HTML: &[u8] = b"<html><body>home</body></html>";
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0x00, 0x01];

pub fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    std::fs::create_dir_all(root.join("images")).unwrap();
    std::fs::create_dir_all(root.join("misc")).unwrap();
    std::fs::create_dir_all(root.join("docs")).unwrap();

    write(root, "index.html", INDEX_HTML);
    write(root, "about.html", b"<p>about</p>");
    write(root, "data.json", b"{\"a\":1}");
    write(root, "images/logo.png", PNG_BYTES);
    write(root, "images/photo.jpg", b"jpeg");
    write(root, "misc/textfile.txt", b"hello");
    write(root, "misc/archive.zip", b"PK");

    dir
}

fn write(root: &Path, rel: &str, bytes: &[u8]) {
    std::fs::write(root.join(rel), bytes).unwrap();
}
