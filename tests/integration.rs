//! Integration tests for `nginx-hosts`.
//!
//! Tests marked `#[ignore]` read the system nginx configuration:
//!
//! ```bash
//! cargo test -- --ignored
//! ```

use std::path::Path;

use nginx_hosts::{ExportConfig, HostsError, OutputFormat, ServerCollection};

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

// ---------------------------------------------------------------------------
// Tempdir trees
// ---------------------------------------------------------------------------

#[test]
fn single_file_later_server_wins() {
    let mut servers = ServerCollection::new(ExportConfig::new().with_default_addr("9.9.9.9"));
    servers
        .load_str(
            "server { listen 80; server_name a.com b.com; }\n\
             server { listen 443; server_name a.com; }\n",
            "nginx.conf",
        )
        .unwrap();

    assert_eq!(servers.len(), 2);
    assert_eq!(servers.render_hosts(), "9.9.9.9 b.com\n9.9.9.9 a.com");
}

#[test]
fn debian_layout() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        &root.join("nginx.conf"),
        "user www-data;\n\
         events { worker_connections 768; }\n\
         http {\n\
             include mime.types;\n\
             include conf.d/*.conf;\n\
             include sites-enabled/*;\n\
         }\n",
    );
    write(&root.join("mime.types"), "types { text/html html; }\n");
    write(
        &root.join("sites-enabled/default"),
        "server {\n\
             listen 80 default_server;\n\
             server_name _ localhost;\n\
         }\n",
    );
    write(
        &root.join("sites-enabled/blog"),
        "server {\n\
             listen 10.0.0.2:443 ssl;\n\
             server_name blog.example.com *.blog.example.com;\n\
             include snippets/aliases.conf;\n\
         }\n",
    );
    write(
        &root.join("snippets/aliases.conf"),
        "server_name www.blog.example.com 10.0.0.2;\n",
    );
    write(
        &root.join("conf.d/api.conf"),
        "server { listen 10.0.0.3:8080; server_name api.example.com; }\n",
    );

    let config = ExportConfig::new()
        .with_config_dir(root)
        .with_use_listen(true)
        .with_excluded_hosts(["_", "localhost"]);
    let mut servers = ServerCollection::new(config);
    servers.load_file(root.join("nginx.conf")).unwrap();

    // conf.d first, then sites-enabled sorted: blog before default.
    assert_eq!(servers.len(), 3);
    assert_eq!(servers[0].names(), ["api.example.com"]);
    assert_eq!(
        servers[1].names(),
        ["blog.example.com", "*.blog.example.com", "www.blog.example.com"]
    );
    assert_eq!(servers[2].names(), ["_", "localhost"]);

    assert_eq!(
        servers.render_hosts(),
        "10.0.0.3 api.example.com\n\
         10.0.0.2 www.blog.example.com\n\
         10.0.0.2 blog.example.com"
    );
    assert_eq!(
        servers.render_dnsmasq(),
        "address=/api.example.com/10.0.0.3\n\
         address=/blog.example.com/*.blog.example.com/www.blog.example.com/10.0.0.2"
    );
}

#[test]
fn glob_order_is_lexicographic() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    // Written out of order on purpose.
    for name in ["30-c", "10-a", "20-b"] {
        write(
            &root.join(format!("sites/{name}.conf")),
            &format!("server {{ server_name {name}.local; }}\n"),
        );
    }

    let mut servers = ServerCollection::new(ExportConfig::new().with_config_dir(root));
    servers.load_str("include sites/*.conf;", "inline").unwrap();

    let names: Vec<_> = servers.iter().map(|s| s.names()[0].clone()).collect();
    assert_eq!(names, ["10-a.local", "20-b.local", "30-c.local"]);
}

#[test]
fn wildcard_directory_order_is_string_order() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        &root.join("a/x.conf"),
        "server { server_name shared.com a.com; listen 10.0.0.1:80; }",
    );
    write(
        &root.join("a-b/x.conf"),
        "server { server_name shared.com; listen 10.0.0.2:80; }",
    );

    let config = ExportConfig::new().with_config_dir(root).with_use_listen(true);
    let mut servers = ServerCollection::new(config);
    servers.load_str("include */x.conf;", "inline").unwrap();

    let names: Vec<_> = servers.iter().map(|s| s.names()[0].clone()).collect();
    assert_eq!(names, ["shared.com", "shared.com"]);
    assert_eq!(servers[1].names(), ["shared.com", "a.com"]);
    // "a-b/" sorts before "a/", so a/x.conf is declared last and wins.
    assert_eq!(servers.render_hosts(), "10.0.0.1 a.com\n10.0.0.1 shared.com");
}

#[test]
fn empty_glob_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut servers = ServerCollection::new(ExportConfig::new().with_config_dir(dir.path()));
    servers
        .load_str("http { include sites-enabled/*; }", "inline")
        .unwrap();
    assert!(servers.is_empty());
    assert_eq!(servers.render(), "");
}

#[test]
fn multiple_files_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.conf");
    let b = dir.path().join("b.conf");
    write(&a, "server { server_name x.com; listen 10.0.0.1:80; }");
    write(&b, "server { server_name x.com; listen 10.0.0.2:80; }");

    let config = ExportConfig::new()
        .with_use_listen(true)
        .with_format(OutputFormat::Dnsmasq);
    let mut servers = ServerCollection::new(config);
    servers.load_file(&a).unwrap();
    servers.load_file(&b).unwrap();

    assert_eq!(servers.render(), "address=/x.com/10.0.0.2");
}

#[test]
fn broken_include_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("conf.d/ok.conf"), "server { server_name ok.com; }");
    write(&dir.path().join("conf.d/zz.conf"), "server { server_name bad.com;");

    let mut servers = ServerCollection::new(ExportConfig::new().with_config_dir(dir.path()));
    let err = servers
        .load_str("http { include conf.d/*.conf; }", "inline")
        .unwrap_err();
    assert!(matches!(err, HostsError::Parse { .. }));
}

#[test]
fn circular_include_chain() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("a.conf"), "http { include b.conf; }");
    write(&dir.path().join("b.conf"), "include a.conf;");

    let mut servers = ServerCollection::new(ExportConfig::new().with_config_dir(dir.path()));
    match servers.load_file(dir.path().join("a.conf")) {
        Err(HostsError::CircularInclude { path, chain }) => {
            assert!(path.ends_with("a.conf"));
            assert_eq!(chain.len(), 2);
        }
        other => panic!("expected circular include, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// System configuration
// ---------------------------------------------------------------------------

#[test]
#[ignore = "requires an nginx installation in /etc/nginx"]
fn real_system_config() {
    let mut servers = ServerCollection::new(ExportConfig::new());
    servers.load_file("/etc/nginx/nginx.conf").unwrap();
    for line in servers.render_hosts().lines() {
        assert!(line.starts_with("127.0.0.1 "));
    }
}
