//! Integration tests for rtfetch

mod support {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use rtfetch::archive::{ArchiveError, Extractor, Unarchiver};
    use rtfetch::catalog::{BinaryDescriptor, VersionData};
    use rtfetch::transport::{Transport, TransportError};
    use std::collections::HashMap;
    use std::io::{Cursor, Read, Write};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    pub const CATALOG: &str = "https://catalog.test/v2/info/releases";

    pub fn releases_url(major: u32, os: &str, arch: &str, latest: bool) -> String {
        let mut url = format!(
            "{CATALOG}/openjdk{major}?openjdk_impl=hotspot&os={os}&arch={arch}&type=jdk"
        );
        if latest {
            url.push_str("&release=latest");
        }
        url
    }

    pub fn download_url(file_name: &str) -> String {
        format!("https://downloads.test/{file_name}")
    }

    /// In-memory transport keyed by exact URL, counting every call
    #[derive(Default)]
    pub struct MemoryTransport {
        routes: Mutex<HashMap<String, Vec<u8>>>,
        delay: Option<Duration>,
        pub calls: AtomicUsize,
    }

    impl MemoryTransport {
        pub fn with_delay(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }

        pub fn serve(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
            self.routes.lock().unwrap().insert(url.into(), body.into());
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Transport for MemoryTransport {
        fn get(&self, url: &str) -> Result<Box<dyn Read>, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let body = self
                .routes
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| TransportError::new(url, "http status: 404"))?;

            if let Some(delay) = self.delay {
                thread::sleep(delay);
            }

            Ok(Box::new(Cursor::new(body)))
        }
    }

    /// A gzip tarball shaped like a JDK archive: `jdk-<version>/bin/java`
    pub fn jdk_tar_gz(version: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut builder = tar::Builder::new(GzEncoder::new(&mut bytes, Compression::fast()));
            for (path, data) in [
                (format!("jdk-{version}/bin/java"), b"#!/bin/sh\n".to_vec()),
                (format!("jdk-{version}/release"), format!("JAVA_VERSION=\"{version}\"\n").into_bytes()),
            ] {
                let mut header = tar::Header::new_gnu();
                header.set_size(data.len() as u64);
                header.set_mode(0o755);
                header.set_cksum();
                builder.append_data(&mut header, path, &data[..]).unwrap();
            }
            builder.into_inner().unwrap().finish().unwrap();
        }
        bytes
    }

    /// A zip shaped like a Windows JDK archive
    pub fn jdk_zip(version: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file(
                    format!("jdk-{version}/bin/java.exe"),
                    zip::write::SimpleFileOptions::default(),
                )
                .unwrap();
            writer.write_all(b"MZ").unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    pub fn descriptor(file_name: &str, os: &str, version: &str) -> BinaryDescriptor {
        BinaryDescriptor {
            file_name: file_name.to_string(),
            platform: os.to_string(),
            arch: "x64".to_string(),
            link: download_url(file_name),
            version_data: VersionData {
                openjdk_version: version.to_string(),
            },
        }
    }

    pub fn binary_json(file_name: &str, os: &str, version: &str) -> String {
        serde_json::to_string(&descriptor(file_name, os, version)).unwrap()
    }

    /// Counts fetches between the start of a download and the end of its
    /// extraction, and remembers the highest count seen.
    #[derive(Default)]
    pub struct FetchWindow {
        active: AtomicUsize,
        pub peak: AtomicUsize,
    }

    impl FetchWindow {
        fn enter(&self) {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn exit(&self) {
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Opens the window when a download starts
    pub struct WindowedTransport {
        pub inner: Arc<MemoryTransport>,
        pub window: Arc<FetchWindow>,
    }

    impl Transport for WindowedTransport {
        fn get(&self, url: &str) -> Result<Box<dyn Read>, TransportError> {
            self.window.enter();
            self.inner.get(url).inspect_err(|_| self.window.exit())
        }
    }

    /// Closes the window once the real extractor has finished
    pub struct WindowedUnarchiver {
        pub window: Arc<FetchWindow>,
        pub delay: Duration,
    }

    impl Unarchiver for WindowedUnarchiver {
        fn unarchive(&self, source: &Path, destination: &Path) -> Result<(), ArchiveError> {
            let result = Extractor.unarchive(source, destination);
            thread::sleep(self.delay);
            self.window.exit();
            result
        }
    }
}

mod pipeline_tests {
    use super::support::*;
    use rtfetch::archive::Extractor;
    use rtfetch::cache::CacheStore;
    use rtfetch::config::Config;
    use rtfetch::fetch::ArchiveFetcher;
    use rtfetch::platform::Platform;
    use rtfetch::{Provisioner, RtfetchError, RuntimeRequest, VersionSpec};
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    const LINUX_TGZ: &str = "OpenJDK11U-jdk_x64_linux_hotspot_11.0.2_9.tar.gz";

    fn config() -> Config {
        let mut config = Config::default();
        config.catalog.url = CATALOG.to_string();
        config
    }

    fn request(version: VersionSpec) -> RuntimeRequest {
        RuntimeRequest {
            version,
            platform: Platform::new("linux", "x64"),
            implementation: "hotspot".to_string(),
        }
    }

    fn provisioner(
        root: &Path,
        catalog: Arc<MemoryTransport>,
        downloads: Arc<MemoryTransport>,
    ) -> Provisioner {
        Provisioner::with_transports(&config(), root, catalog, downloads).unwrap()
    }

    fn serve_linux_11(catalog: &MemoryTransport, downloads: &MemoryTransport) {
        catalog.serve(
            releases_url(11, "linux", "x64", false),
            format!(
                r#"[{{"release_name": "jdk-11.0.1+13", "binaries": [{}]}},
                    {{"release_name": "jdk-11.0.2+9", "binaries": [{}, {}]}}]"#,
                binary_json("OpenJDK11U-jdk_x64_linux_hotspot_11.0.1_13.tar.gz", "linux", "11.0.1+13"),
                binary_json("OpenJDK11U-jdk_x64_windows_hotspot_11.0.2_9.zip", "windows", "11.0.2+9"),
                binary_json(LINUX_TGZ, "linux", "11.0.2+9"),
            ),
        );
        downloads.serve(download_url(LINUX_TGZ), jdk_tar_gz("11.0.2+9"));
    }

    fn assert_no_staging_left(root: &Path) {
        if let Ok(entries) = fs::read_dir(root) {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().into_owned();
                assert!(!name.starts_with(".staging-"), "leftover staging dir {name}");
            }
        }
    }

    #[test]
    fn provisions_exact_version() {
        let root = TempDir::new().unwrap();
        let catalog = Arc::new(MemoryTransport::default());
        let downloads = Arc::new(MemoryTransport::default());
        serve_linux_11(&catalog, &downloads);

        let path = provisioner(root.path(), catalog, downloads.clone())
            .provision(&request(VersionSpec::Exact("11.0.2".to_string())))
            .unwrap()
            .unwrap();

        assert_eq!(
            path,
            root.path()
                .join("OpenJDK11U-jdk_x64_linux_hotspot_11.0.2_9")
                .join("jdk-11.0.2+9")
        );
        assert!(path.is_absolute());
        assert!(path.join("bin").join("java").is_file());
        assert_eq!(downloads.calls(), 1);
        assert_no_staging_left(root.path());
    }

    #[test]
    fn second_provision_is_served_from_cache() {
        let root = TempDir::new().unwrap();
        let catalog = Arc::new(MemoryTransport::default());
        let downloads = Arc::new(MemoryTransport::default());
        serve_linux_11(&catalog, &downloads);
        let provisioner = provisioner(root.path(), catalog, downloads.clone());
        let req = request(VersionSpec::Exact("11.0.2".to_string()));

        let first = provisioner.provision(&req).unwrap();
        let second = provisioner.provision(&req).unwrap();

        assert_eq!(first, second);
        assert_eq!(downloads.calls(), 1);
    }

    #[test]
    fn provisions_latest_release() {
        let root = TempDir::new().unwrap();
        let catalog = Arc::new(MemoryTransport::default());
        let downloads = Arc::new(MemoryTransport::default());
        catalog.serve(
            releases_url(11, "linux", "x64", true),
            format!(
                r#"{{"release_name": "jdk-11.0.2+9", "binaries": [{}]}}"#,
                binary_json(LINUX_TGZ, "linux", "11.0.2+9")
            ),
        );
        downloads.serve(download_url(LINUX_TGZ), jdk_tar_gz("11.0.2+9"));

        let path = provisioner(root.path(), catalog, downloads)
            .provision(&request(VersionSpec::Latest(11)))
            .unwrap()
            .unwrap();

        assert!(path.ends_with("jdk-11.0.2+9"));
        assert!(path.join("release").is_file());
    }

    #[test]
    fn unknown_version_is_none_not_error() {
        let root = TempDir::new().unwrap();
        let catalog = Arc::new(MemoryTransport::default());
        let downloads = Arc::new(MemoryTransport::default());
        serve_linux_11(&catalog, &downloads);

        let result = provisioner(root.path(), catalog, downloads.clone())
            .provision(&request(VersionSpec::Exact("11.0.3".to_string())))
            .unwrap();

        assert!(result.is_none());
        assert_eq!(downloads.calls(), 0);
    }

    #[test]
    fn unreachable_catalog_is_an_error() {
        let root = TempDir::new().unwrap();
        let catalog = Arc::new(MemoryTransport::default());
        let downloads = Arc::new(MemoryTransport::default());

        let err = provisioner(root.path(), catalog, downloads)
            .provision(&request(VersionSpec::Exact("11.0.2".to_string())))
            .unwrap_err();

        assert!(matches!(err, RtfetchError::CatalogUnavailable { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn failed_download_leaves_no_entry() {
        let root = TempDir::new().unwrap();
        let downloads = Arc::new(MemoryTransport::default());
        let store = CacheStore::new(
            root.path(),
            ArchiveFetcher::new(downloads.clone(), Arc::new(Extractor)),
        )
        .unwrap();
        let d = descriptor(LINUX_TGZ, "linux", "11.0.2+9");

        let err = store.materialize(&d).unwrap_err();

        assert!(matches!(err, RtfetchError::DownloadFailed { .. }));
        assert!(!store.entry_dir(&d).unwrap().exists());
        assert!(!store.is_cached(&d));

        // Still a miss: the next call goes back to the network
        downloads.serve(download_url(LINUX_TGZ), jdk_tar_gz("11.0.2+9"));
        let path = store.materialize(&d).unwrap();
        assert!(path.join("bin").join("java").is_file());
        assert_eq!(downloads.calls(), 2);
    }

    #[test]
    fn failed_extraction_leaves_no_entry() {
        let root = TempDir::new().unwrap();
        let downloads = Arc::new(MemoryTransport::default());
        downloads.serve(download_url(LINUX_TGZ), b"\x1f\x8bthis is not a gzip stream".to_vec());
        let store = CacheStore::new(
            root.path(),
            ArchiveFetcher::new(downloads.clone(), Arc::new(Extractor)),
        )
        .unwrap();
        let d = descriptor(LINUX_TGZ, "linux", "11.0.2+9");

        let err = store.materialize(&d).unwrap_err();

        assert!(matches!(err, RtfetchError::ExtractionFailed { .. }));
        assert!(!store.entry_dir(&d).unwrap().exists());
        assert_no_staging_left(root.path());

        // The retry downloads again instead of trusting a half-written entry
        let _ = store.materialize(&d);
        assert_eq!(downloads.calls(), 2);
    }

    #[test]
    fn extracts_zip_archives() {
        let root = TempDir::new().unwrap();
        let file_name = "OpenJDK11U-jdk_x64_windows_hotspot_11.0.2_9.zip";
        let downloads = Arc::new(MemoryTransport::default());
        downloads.serve(download_url(file_name), jdk_zip("11.0.2+9"));
        let store = CacheStore::new(
            root.path(),
            ArchiveFetcher::new(downloads, Arc::new(Extractor)),
        )
        .unwrap();

        let path = store
            .materialize(&descriptor(file_name, "windows", "11.0.2+9"))
            .unwrap();

        assert_eq!(
            path,
            root.path()
                .join("OpenJDK11U-jdk_x64_windows_hotspot_11.0.2_9")
                .join("jdk-11.0.2+9")
        );
        assert!(path.join("bin").join("java.exe").is_file());
    }

    #[test]
    fn concurrent_misses_never_overlap() {
        let root = TempDir::new().unwrap();
        let downloads = Arc::new(MemoryTransport::with_delay(Duration::from_millis(50)));
        let names = ["jdk-a_linux-x64.tar.gz", "jdk-b_linux-x64.tar.gz", "jdk-c_linux-x64.tar.gz"];
        for name in names {
            downloads.serve(download_url(name), jdk_tar_gz("11+9"));
        }
        let window = Arc::new(FetchWindow::default());
        let fetcher = ArchiveFetcher::new(
            Arc::new(WindowedTransport {
                inner: downloads.clone(),
                window: window.clone(),
            }),
            Arc::new(WindowedUnarchiver {
                window: window.clone(),
                delay: Duration::from_millis(50),
            }),
        );
        let store = CacheStore::new(root.path(), fetcher).unwrap();

        let handles: Vec<_> = names
            .iter()
            .map(|name| {
                let store = store.clone();
                let d = descriptor(name, "linux", "11+9");
                thread::spawn(move || store.materialize(&d).unwrap())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().join("bin").join("java").is_file());
        }

        assert_eq!(downloads.calls(), 3);
        // Download through extraction is one critical section
        assert_eq!(window.peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn staged_fetch_matches_provision() {
        let root = TempDir::new().unwrap();
        let catalog = Arc::new(MemoryTransport::default());
        let downloads = Arc::new(MemoryTransport::default());
        serve_linux_11(&catalog, &downloads);
        let provisioner = provisioner(root.path(), catalog, downloads.clone());
        let req = request(VersionSpec::Exact("11.0.2".to_string()));

        let descriptor = provisioner.resolve(&req).unwrap().unwrap();
        assert!(!provisioner.store().is_cached(&descriptor));
        let staged = provisioner.store().materialize(&descriptor).unwrap();
        let provisioned = provisioner.provision(&req).unwrap().unwrap();

        assert_eq!(staged, provisioned);
        assert_eq!(downloads.calls(), 1);
    }

    #[test]
    fn concurrent_callers_share_one_download() {
        let root = TempDir::new().unwrap();
        let downloads = Arc::new(MemoryTransport::with_delay(Duration::from_millis(50)));
        downloads.serve(download_url(LINUX_TGZ), jdk_tar_gz("11.0.2+9"));
        let store = CacheStore::new(
            root.path(),
            ArchiveFetcher::new(downloads.clone(), Arc::new(Extractor)),
        )
        .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    store
                        .materialize(&descriptor(LINUX_TGZ, "linux", "11.0.2+9"))
                        .unwrap()
                })
            })
            .collect();
        let paths: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(paths.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(downloads.calls(), 1);
    }
}

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    /// Runs the binary against an isolated config file and cache root
    fn rtfetch(dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("rtfetch");
        cmd.env("RTFETCH_CONFIG", dir.path().join("config.toml"))
            .env("RTFETCH_CACHE_DIR", dir.path().join("cache"))
            .env("CI", "true");
        cmd
    }

    #[test]
    fn help_displays() {
        let dir = TempDir::new().unwrap();
        rtfetch(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Resolve, download and cache JDK runtime images"));
    }

    #[test]
    fn version_displays() {
        let dir = TempDir::new().unwrap();
        rtfetch(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("rtfetch"));
    }

    #[test]
    fn config_path_honors_env() {
        let dir = TempDir::new().unwrap();
        rtfetch(&dir)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_init_then_show() {
        let dir = TempDir::new().unwrap();
        rtfetch(&dir).args(["config", "init"]).assert().success();
        assert!(dir.path().join("config.toml").is_file());

        rtfetch(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[catalog]"))
            .stdout(predicate::str::contains("hotspot"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[http]\nproxy = 42\n").unwrap();

        rtfetch(&dir)
            .args(["cache", "path"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn cache_path_uses_override() {
        let dir = TempDir::new().unwrap();
        rtfetch(&dir)
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache"));
    }

    #[test]
    fn cache_list_empty() {
        let dir = TempDir::new().unwrap();
        rtfetch(&dir)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached runtimes"));
    }

    #[test]
    fn cache_list_shows_entries() {
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("cache").join("jdk-11.0.2_linux-x64").join("jdk-11.0.2+9");
        fs::create_dir_all(&entry).unwrap();
        fs::write(entry.join("release"), b"JAVA_VERSION=\"11.0.2\"").unwrap();

        rtfetch(&dir)
            .args(["cache", "list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"name\": \"jdk-11.0.2_linux-x64\""));
    }

    #[test]
    fn latest_requires_numeric_major() {
        let dir = TempDir::new().unwrap();
        rtfetch(&dir)
            .args(["fetch", "newest", "--latest"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid runtime version"));
    }

    #[test]
    fn unreachable_catalog_reports_network_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[catalog]\nurl = \"http://127.0.0.1:9/v2/info/releases\"\n\n[http]\ncatalog_timeout_secs = 5\n",
        )
        .unwrap();

        rtfetch(&dir)
            .args(["resolve", "11.0.2", "--os", "linux", "--arch", "x64"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Release catalog unavailable"));
    }
}
