use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

use crate::config::ServiceConfig;
use crate::elastic::ElasticClient;
use crate::error::ServerError;
use crate::handler::LogHandler;
use crate::proto::log_service_server::LogServiceServer;
use crate::store::DocumentStore;

/// Connect the store, bind the listener and serve until the process exits.
///
/// Any error returned here happened during startup or brought the server
/// down; the binary treats all of them as fatal.
pub async fn run(config: ServiceConfig) -> Result<(), ServerError> {
    let store = ElasticClient::connect(config.elastic.clone()).await?;
    let listener = bind(config.listen_addr()).await?;
    serve(listener, Arc::new(store), std::future::pending()).await
}

/// Bind the gRPC listening socket.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Listen { addr, source })
}

/// Serve `log.LogService` on an already bound listener until `shutdown`
/// completes.
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<dyn DocumentStore>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()>,
{
    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let handler = LogHandler::new(store);

    info!(%addr, "gRPC server is running");
    Server::builder()
        .add_service(LogServiceServer::new(handler))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await?;

    info!("gRPC server stopped");
    Ok(())
}
