use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Router;
use clap::Parser;

use hlsfront::http::state::AppState;
use hlsfront::{cli, config, http};

/// Set to true once the first Ctrl+C is received. Second Ctrl+C force-exits.
static SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

/// Wait for the first Ctrl+C (graceful shutdown).
/// On second Ctrl+C (during shutdown wait), force-exits immediately.
async fn wait_for_shutdown() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    if SHUTTING_DOWN.swap(true, Ordering::SeqCst) {
        eprintln!("\nhlsfront: forced exit");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();

    let file_config = config::find_config_file(args.config.as_deref()).and_then(|path| {
        match config::load_config(&path) {
            Ok(cfg) => {
                tracing::debug!("Loaded config from {}", path.display());
                Some(cfg)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file: {}", e);
                None
            }
        }
    });

    let config = config::Config::resolve(file_config, &args);

    // A missing scan directory is not an error: the daemon may simply not
    // have started yet, and the status page reports exactly that.
    if !config.dir.is_dir() {
        tracing::warn!(
            "Scan directory {} does not exist — is the capture daemon running?",
            config.dir.display()
        );
    }

    tracing::info!(
        "hlsfront \"{}\" on port {}, watching {}",
        config.name,
        config.port,
        config.dir.display()
    );

    let localhost = config.localhost;
    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
    };
    let app = http::build_router(state);

    if localhost {
        run_localhost(port, app).await;
    } else {
        run_dual_stack(port, app).await;
    }
}

/// Run a localhost-only HTTP server and wait for graceful shutdown.
async fn run_localhost(port: u16, app: Router) {
    let addr = format!("127.0.0.1:{}", port);
    tracing::info!("Serving on http://{} (localhost only)", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("error: failed to bind {}: {}", addr, e);
            std::process::exit(1);
        });

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .unwrap_or_else(|e| tracing::error!("HTTP server error: {}", e));

    tracing::info!("Goodbye.");
}

/// Run dual-stack (IPv4 + IPv6) HTTP servers and wait for graceful shutdown.
async fn run_dual_stack(port: u16, app: Router) {
    // Dual-bind: separate IPv4 (0.0.0.0) and IPv6 (:::) sockets.
    // Use socket2 for IPv6 to explicitly set IPV6_V6ONLY=true.
    // Linux defaults IPV6_V6ONLY=false (shared stack), which causes
    // "Address already in use" when both 0.0.0.0 and ::: are bound.
    let ipv4_addr = format!("0.0.0.0:{}", port);
    tracing::info!("Serving on port {} (IPv4 + IPv6)", port);

    let ipv4_listener = tokio::net::TcpListener::bind(&ipv4_addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("error: failed to bind IPv4 {}: {}", ipv4_addr, e);
            std::process::exit(1);
        });

    let ipv6_addr: std::net::SocketAddr = format!("[::]:{}", port).parse().unwrap_or_else(|e| {
        eprintln!("error: failed to parse IPv6 address: {}", e);
        std::process::exit(1);
    });
    let ipv6_raw = socket2::Socket::new(
        socket2::Domain::IPV6,
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )
    .unwrap_or_else(|e| {
        eprintln!("error: failed to create IPv6 socket: {}", e);
        std::process::exit(1);
    });
    ipv6_raw.set_only_v6(true).unwrap_or_else(|e| {
        tracing::warn!("Could not set IPV6_V6ONLY: {} -- dual-bind may fail on Linux", e);
    });
    ipv6_raw.set_reuse_address(true).unwrap_or_else(|e| {
        tracing::warn!("Could not set SO_REUSEADDR on IPv6 socket: {}", e);
    });
    ipv6_raw.set_nonblocking(true).unwrap_or_else(|e| {
        eprintln!("error: failed to set IPv6 socket non-blocking: {}", e);
        std::process::exit(1);
    });
    ipv6_raw.bind(&ipv6_addr.into()).unwrap_or_else(|e| {
        eprintln!("error: failed to bind IPv6 :::{}: {}", port, e);
        std::process::exit(1);
    });
    ipv6_raw.listen(1024).unwrap_or_else(|e| {
        eprintln!("error: failed to listen on IPv6 socket: {}", e);
        std::process::exit(1);
    });
    let ipv6_std_listener: std::net::TcpListener = ipv6_raw.into();
    let ipv6_listener = tokio::net::TcpListener::from_std(ipv6_std_listener).unwrap_or_else(|e| {
        eprintln!("error: failed to convert IPv6 listener to tokio: {}", e);
        std::process::exit(1);
    });

    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(4);

    let app_v4 = app.clone();
    let mut http_v4_rx = shutdown_tx.subscribe();
    let v4_task = tokio::spawn(async move {
        axum::serve(ipv4_listener, app_v4)
            .with_graceful_shutdown(async move {
                let _ = http_v4_rx.recv().await;
            })
            .await
            .unwrap_or_else(|e| tracing::error!("IPv4 server error: {}", e));
    });
    let mut http_v6_rx = shutdown_tx.subscribe();
    let v6_task = tokio::spawn(async move {
        axum::serve(ipv6_listener, app)
            .with_graceful_shutdown(async move {
                let _ = http_v6_rx.recv().await;
            })
            .await
            .unwrap_or_else(|e| tracing::error!("IPv6 server error: {}", e));
    });

    // Wait for first Ctrl+C, then broadcast shutdown to both servers.
    wait_for_shutdown().await;
    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(());

    // Give in-flight requests up to a second to drain.
    let _ = tokio::time::timeout(std::time::Duration::from_secs(1), async {
        let _ = v4_task.await;
        let _ = v6_task.await;
    })
    .await;

    tracing::info!("Goodbye.");
}
