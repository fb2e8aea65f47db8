use std::io;
use timerpc::constants::MAX_FRAME_PAYLOAD_SIZE;
use timerpc_rpc_service::{RpcClientInterface, RpcInvocationError};
use timerpc_tokio_rpc_client::{RpcCallerError, RpcClient, RpcTransportState};
use timerpc_tokio_rpc_server::RpcServer;
use timerpc_tokio_rpc_server::utils::tcp_listener_to_host_port;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Starts a server with a couple of raw byte handlers on an ephemeral port.
async fn start_test_server() -> (String, u16, oneshot::Sender<()>) {
    let mut server = RpcServer::new();
    server
        .register("Test.Echo", |bytes: &[u8]| Ok(bytes.to_vec()))
        .unwrap();
    server
        .register("Test.Fail", |_: &[u8]| Err("intentional failure".into()))
        .unwrap();
    server
        .register("Test.Huge", |_: &[u8]| Ok(vec![1u8; MAX_FRAME_PAYLOAD_SIZE + 1]))
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (host, port) = tcp_listener_to_host_port(&listener).unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = server
            .with_listener(listener)
            .serve_with_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    (host.to_string(), port, shutdown_tx)
}

#[tokio::test]
async fn test_echo_round_trip() {
    let (host, port, _shutdown) = start_test_server().await;
    let mut client = RpcClient::new(&host, port).await.unwrap();

    let result = client.call("Test.Echo", b"hello".to_vec()).await.unwrap();
    assert_eq!(result, b"hello");
    assert_eq!(client.state(), RpcTransportState::Connected);
    assert_eq!(client.peer_addr().port(), port);
}

#[tokio::test]
async fn test_connection_is_reused_for_sequential_calls() {
    let (host, port, _shutdown) = start_test_server().await;
    let mut client = RpcClient::new(&host, port).await.unwrap();

    for i in 0..10u8 {
        let payload = vec![i; i as usize * 1000];
        let result = client.call("Test.Echo", payload.clone()).await.unwrap();
        assert_eq!(result, payload);
    }
}

#[tokio::test]
async fn test_large_payload_spans_many_reads() {
    let (host, port, _shutdown) = start_test_server().await;
    let mut client = RpcClient::new(&host, port).await.unwrap();

    let payload: Vec<u8> = (0..1_000_000u32).map(|i| (i % 251) as u8).collect();
    let result = client.call("Test.Echo", payload.clone()).await.unwrap();
    assert_eq!(result, payload);
}

#[tokio::test]
async fn test_unknown_procedure_is_invocation_error() {
    let (host, port, _shutdown) = start_test_server().await;
    let mut client = RpcClient::new(&host, port).await.unwrap();

    match client.call("Test.DoesNotExist", Vec::new()).await {
        Err(RpcCallerError::Invocation(RpcInvocationError::UnknownProcedure { method_name })) => {
            assert_eq!(method_name, "Test.DoesNotExist");
        }
        other => panic!("expected UnknownProcedure, got {other:?}"),
    }

    // The connection stays usable after a server-reported error.
    assert_eq!(client.state(), RpcTransportState::Connected);
    assert_eq!(
        client.call("Test.Echo", b"still here".to_vec()).await.unwrap(),
        b"still here"
    );
}

#[tokio::test]
async fn test_handler_error_is_distinct_from_transport_error() {
    let (host, port, _shutdown) = start_test_server().await;
    let mut client = RpcClient::new(&host, port).await.unwrap();

    let err = client.call("Test.Fail", Vec::new()).await.unwrap_err();
    assert!(!err.is_fatal_to_client());
    assert!(matches!(
        err,
        RpcCallerError::Invocation(RpcInvocationError::Handler { ref message })
            if message == "intentional failure"
    ));
    assert_eq!(client.transport_state(), RpcTransportState::Connected);
}

#[tokio::test]
async fn test_concurrent_clients_are_served_independently() {
    let (host, port, _shutdown) = start_test_server().await;

    let mut tasks = Vec::new();
    for i in 0..8u8 {
        let host = host.clone();
        tasks.push(tokio::spawn(async move {
            let mut client = RpcClient::new(&host, port).await.unwrap();
            client.call("Test.Echo", vec![i; 16]).await.unwrap()
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        assert_eq!(task.await.unwrap(), vec![i as u8; 16]);
    }
}

#[tokio::test]
async fn test_shutdown_stops_accepting_connections() {
    let (host, port, shutdown) = start_test_server().await;

    // An established connection keeps working after shutdown.
    let mut client = RpcClient::new(&host, port).await.unwrap();
    shutdown.send(()).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    assert_eq!(client.call("Test.Echo", b"x".to_vec()).await.unwrap(), b"x");

    let result = RpcClient::new(&host, port).await;
    assert!(matches!(result, Err(RpcCallerError::Connection(_))));
}

#[tokio::test]
async fn test_oversized_request_fails_locally() {
    let (host, port, _shutdown) = start_test_server().await;
    let mut client = RpcClient::new(&host, port).await.unwrap();

    let payload: Vec<u8> = (0..MAX_FRAME_PAYLOAD_SIZE as u32 + 1024)
        .map(|i| (i % 251) as u8)
        .collect();

    match client.call("Test.Echo", payload).await {
        Err(err @ RpcCallerError::InvalidRequest(_)) => {
            assert!(!err.is_fatal_to_client());
            if let RpcCallerError::InvalidRequest(io_err) = err {
                assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
            }
        }
        other => panic!("expected an invalid request error, got {other:?}"),
    }

    // Nothing was sent, so the connection is still in sync.
    assert_eq!(client.state(), RpcTransportState::Connected);
    assert_eq!(client.call("Test.Echo", b"ok".to_vec()).await.unwrap(), b"ok");
}

#[tokio::test]
async fn test_oversized_result_is_handler_error() {
    let (host, port, _shutdown) = start_test_server().await;
    let mut client = RpcClient::new(&host, port).await.unwrap();

    let err = client.call("Test.Huge", Vec::new()).await.unwrap_err();
    assert!(
        matches!(
            err,
            RpcCallerError::Invocation(RpcInvocationError::Handler { .. })
        ),
        "expected a handler error, got {err:?}"
    );

    assert_eq!(client.state(), RpcTransportState::Connected);
    assert_eq!(client.call("Test.Echo", b"ok".to_vec()).await.unwrap(), b"ok");
}
