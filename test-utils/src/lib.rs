//! `test-utils` is used for testing in `proofer-lib`.
//! This crate does not depend on `proofer-lib`, else we would get dependency cycles.
//! Macros are used instead, so that the importer is responsible for providing the dependencies.

/// Create a mock web server, which responds with a predefined status when
/// handling a matching request
#[macro_export]
macro_rules! mock_server {
    ($status:expr $(, $func:tt ($($arg:expr),*))*) => {{
        let mock_server = wiremock::MockServer::start().await;
        let response_template = wiremock::ResponseTemplate::new($status);
        let template = response_template$(.$func($($arg),*))*;
        wiremock::Mock::given(wiremock::matchers::method("GET")).respond_with(template).mount(&mock_server).await;
        mock_server
    }};
}

/// Create a mock web server which redirects every request back to itself,
/// so any client following redirects gives up eventually.
#[macro_export]
macro_rules! redirect_loop_server {
    () => {{
        let mock_server = wiremock::MockServer::start().await;
        let redirect = wiremock::ResponseTemplate::new(308)
            .insert_header("Location", format!("{}/loop", mock_server.uri()).as_str());
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(redirect)
            .mount(&mock_server)
            .await;
        mock_server
    }};
}

/// Create an `Artifact` from a source path, a destination path and
/// (optionally) the markdown it was rendered from.
#[macro_export]
macro_rules! artifact {
    ($src:expr, $dest:expr $(,)?) => {
        Artifact::new($src, $dest)
    };
    ($src:expr, $dest:expr, $markdown:expr $(,)?) => {
        Artifact::new($src, $dest).with_source_text($markdown)
    };
}

/// Freeze a list of artifacts into an `Inventory`.
#[macro_export]
macro_rules! inventory {
    ($($artifact:expr),* $(,)?) => {{
        let mut builder = InventoryBuilder::default();
        $(builder.insert($artifact);)*
        builder.build()
    }};
}

/// Get the path to the `fixtures` directory.
#[macro_export]
macro_rules! fixtures_path {
    () => {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("fixtures")
    };
}

/// Loads a fixture from the `fixtures` directory
#[macro_export]
macro_rules! load_fixture {
    ($filename:expr) => {{
        let path = $crate::fixtures_path!().join($filename);
        std::fs::read_to_string(path).unwrap()
    }};
}
