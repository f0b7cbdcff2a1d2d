// Arena servers for integration tests, each bound on an ephemeral port.
use arena_server::use_cases::ArenaSettings;
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

// host:port of the shared server once it accepts connections.
static SERVER_ADDR: OnceLock<String> = OnceLock::new();

// Start the server on first use and return its address.
pub fn ensure_server() -> &'static str {
    SERVER_ADDR.get_or_init(|| serve_on_thread(arena_server::run))
}

// Start a dedicated server with explicit settings and return its websocket endpoint.
pub fn spawn_server(settings: ArenaSettings) -> String {
    let addr = serve_on_thread(move |listener| arena_server::run_arena(listener, settings));
    format!("ws://{addr}/ws")
}

fn serve_on_thread<F, Fut>(serve: F) -> String
where
    F: FnOnce(tokio::net::TcpListener) -> Fut + Send + 'static,
    Fut: Future<Output = std::io::Result<()>>,
{
    let published = Arc::new(OnceLock::<String>::new());
    let published_thread = Arc::clone(&published);

    // A dedicated OS thread and runtime keep the server alive across `#[tokio::test]` runtimes.
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("test runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind ephemeral test port");
            let addr = listener.local_addr().expect("get local addr");
            let _ = published_thread.set(addr.to_string());
            serve(listener).await.expect("server failed");
        });
    });

    wait_until_accepting(&published)
}

// Websocket endpoint of the shared test server.
pub fn ws_url() -> String {
    format!("ws://{}/ws", ensure_server())
}

fn wait_until_accepting(published: &OnceLock<String>) -> String {
    let addr = loop {
        if let Some(addr) = published.get() {
            break addr.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return addr;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
