use bitcode::{Decode, Encode};
use std::io;
use std::sync::Arc;
use timerpc::frame::FrameStreamDecoder;
use timerpc::rpc::{RpcDispatcher, RpcMethodRegistry, RpcRequest, RpcResponse};
use timerpc_rpc_service::{
    RpcCallPrebuffered, RpcCallerError, RpcClientInterface, RpcInvocationError,
    RpcMethodPrebuffered, RpcServiceEndpointInterface, RpcTransportState, decode_rpc_response,
};

#[derive(Encode, Decode, PartialEq, Debug)]
struct AddRequestParams {
    numbers: Vec<i64>,
}

#[derive(Encode, Decode, PartialEq, Debug)]
struct AddResponseParams {
    result: i64,
}

struct Add;

impl RpcMethodPrebuffered for Add {
    const METHOD_NAME: &'static str = "Math.Add";

    type Input = Vec<i64>;
    type Output = i64;

    fn encode_request(numbers: Self::Input) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&AddRequestParams { numbers }))
    }

    fn decode_request(bytes: &[u8]) -> Result<Self::Input, io::Error> {
        let req = bitcode::decode::<AddRequestParams>(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(req.numbers)
    }

    fn encode_response(result: Self::Output) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&AddResponseParams { result }))
    }

    fn decode_response(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        let resp = bitcode::decode::<AddResponseParams>(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(resp.result)
    }
}

/// A client that routes every call through an in-process dispatcher, exercising
/// the full envelope and framing path without a socket.
struct LoopbackClient {
    dispatcher: RpcDispatcher,
    next_request_id: u32,
}

impl LoopbackClient {
    fn new(registry: RpcMethodRegistry) -> Self {
        Self {
            dispatcher: RpcDispatcher::new(Arc::new(registry)),
            next_request_id: 1,
        }
    }
}

#[async_trait::async_trait]
impl RpcClientInterface for LoopbackClient {
    async fn call_rpc(
        &mut self,
        method_name: &str,
        param_bytes: Vec<u8>,
    ) -> Result<Vec<u8>, RpcCallerError> {
        let request = RpcRequest {
            rpc_request_id: self.next_request_id,
            rpc_method_name: method_name.to_string(),
            rpc_param_bytes: param_bytes,
        };
        self.next_request_id += 1;

        let mut outgoing = Vec::new();
        self.dispatcher
            .read_bytes(&request.to_frame().unwrap(), |chunk| {
                outgoing.extend_from_slice(chunk)
            })
            .map_err(|e| RpcCallerError::Transport(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let frame = FrameStreamDecoder::new()
            .read_bytes(&outgoing)
            .next()
            .expect("dispatcher emitted no response")
            .expect("response frame did not decode");
        let response = RpcResponse::decode(&frame).expect("response envelope did not decode");
        assert_eq!(response.rpc_request_id, request.rpc_request_id);

        decode_rpc_response(response)
    }

    fn transport_state(&self) -> RpcTransportState {
        RpcTransportState::Connected
    }
}

#[tokio::test]
async fn typed_call_round_trips_through_registered_handler() {
    let mut registry = RpcMethodRegistry::new();
    registry
        .register_prebuffered::<Add, _>(|numbers| Ok(numbers.iter().sum()))
        .unwrap();

    let mut client = LoopbackClient::new(registry);

    assert_eq!(Add::call(&mut client, vec![1, 2, 3]).await.unwrap(), 6);
    assert_eq!(Add::call(&mut client, vec![-4, 4]).await.unwrap(), 0);
}

#[tokio::test]
async fn typed_call_surfaces_handler_error() {
    let mut registry = RpcMethodRegistry::new();
    registry
        .register_prebuffered::<Add, _>(|numbers| {
            if numbers.is_empty() {
                return Err("nothing to add".into());
            }
            Ok(numbers.iter().sum())
        })
        .unwrap();

    let mut client = LoopbackClient::new(registry);

    match Add::call(&mut client, vec![]).await {
        Err(RpcCallerError::Invocation(RpcInvocationError::Handler { message })) => {
            assert_eq!(message, "nothing to add");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn typed_call_to_unregistered_method_is_unknown_procedure() {
    let mut client = LoopbackClient::new(RpcMethodRegistry::new());

    match Add::call(&mut client, vec![1]).await {
        Err(RpcCallerError::Invocation(RpcInvocationError::UnknownProcedure { method_name })) => {
            assert_eq!(method_name, "Math.Add");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_args_are_reported_as_handler_error() {
    let mut registry = RpcMethodRegistry::new();
    registry
        .register_prebuffered::<Add, _>(|numbers| Ok(numbers.iter().sum()))
        .unwrap();

    let mut client = LoopbackClient::new(registry);

    let result = client.call_rpc(Add::METHOD_NAME, Vec::new()).await;
    assert!(matches!(
        result,
        Err(RpcCallerError::Invocation(RpcInvocationError::Handler { .. }))
    ));
}

#[test]
fn registering_same_method_twice_fails() {
    let mut registry = RpcMethodRegistry::new();
    registry
        .register_prebuffered::<Add, _>(|numbers| Ok(numbers.iter().sum()))
        .unwrap();

    assert!(
        registry
            .register_prebuffered::<Add, _>(|_| Ok(0))
            .is_err()
    );
}
