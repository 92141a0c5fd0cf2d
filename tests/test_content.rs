use capsule::site::ContentStore;
use capsule::site::content::resource_key;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_resource_key_root() {
    assert_eq!(resource_key(""), "index.gmi");
    assert_eq!(resource_key("/"), "index.gmi");
}

#[test]
fn test_resource_key_directory() {
    assert_eq!(resource_key("/blog/"), "blog/index.gmi");
}

#[test]
fn test_resource_key_appends_page_extension() {
    assert_eq!(resource_key("/blog/first-post"), "blog/first-post.gmi");
    assert_eq!(resource_key("about"), "about.gmi");
}

#[test]
fn test_resource_key_keeps_explicit_extension() {
    assert_eq!(resource_key("/notes.txt"), "notes.txt");
    assert_eq!(resource_key("/v1.2/readme"), "v1.2/readme.gmi");
}

#[test]
fn test_resolve_is_stable() {
    let store = ContentStore::from_entries([("blog/post.gmi", "# Post\n")]);

    let first = store.resolve("/blog/post").unwrap();
    let second = store.resolve("/blog/post").unwrap();

    assert_eq!(first, second);
    assert_eq!(first.key, "blog/post.gmi");
    assert_eq!(first.mime, "text/gemini");
    assert_eq!(&first.body[..], b"# Post\n");
}

#[test]
fn test_resolve_mime_from_key() {
    let store = ContentStore::from_entries([("img/cat.png", &b"\x89PNG"[..])]);

    assert_eq!(store.resolve("/img/cat.png").unwrap().mime, "image/png");
}

#[test]
fn test_resolve_miss() {
    let store = ContentStore::from_entries([("index.gmi", "# Home\n")]);

    assert!(store.resolve("/missing").is_none());
    assert!(store.resolve("/index").is_some());
}

#[test]
fn test_load_dir_keys_nested_files() {
    let root = scratch_dir("nested");
    fs::create_dir_all(root.join("blog")).unwrap();
    fs::write(root.join("index.gmi"), "# Home\n").unwrap();
    fs::write(root.join("blog").join("post.gmi"), "# Post\n").unwrap();

    let store = ContentStore::load_dir(&root).unwrap();

    assert_eq!(store.len(), 2);
    assert!(store.contains("index.gmi"));
    assert!(store.contains("blog/post.gmi"));
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_load_dir_rejects_empty_directory() {
    let root = scratch_dir("empty");
    fs::create_dir_all(&root).unwrap();

    assert!(ContentStore::load_dir(&root).is_err());
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_load_dir_missing_directory() {
    assert!(ContentStore::load_dir(&scratch_dir("never-created")).is_err());
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("capsule-content-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}
