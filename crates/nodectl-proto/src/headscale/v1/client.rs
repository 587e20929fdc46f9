//! Unary client for `headscale.v1.HeadscaleService`

use super::messages::*;
use http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{IntoRequest, Response, Status};

/// gRPC client for the node management methods of the coordination server.
///
/// Cheap to clone; clones share the underlying channel.
#[derive(Clone)]
pub struct HeadscaleServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl HeadscaleServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    async fn unary<Req, Resp>(
        &mut self,
        request: impl IntoRequest<Req>,
        path: &'static str,
    ) -> Result<Response<Resp>, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unknown(format!("Service was not ready: {}", e)))?;
        let codec = tonic_prost::ProstCodec::<Req, Resp>::default();
        self.inner
            .unary(request.into_request(), PathAndQuery::from_static(path), codec)
            .await
    }

    pub async fn register_machine(
        &mut self,
        request: impl IntoRequest<RegisterMachineRequest>,
    ) -> Result<Response<RegisterMachineResponse>, Status> {
        self.unary(request, "/headscale.v1.HeadscaleService/RegisterMachine")
            .await
    }

    pub async fn list_machines(
        &mut self,
        request: impl IntoRequest<ListMachinesRequest>,
    ) -> Result<Response<ListMachinesResponse>, Status> {
        self.unary(request, "/headscale.v1.HeadscaleService/ListMachines")
            .await
    }

    pub async fn get_machine(
        &mut self,
        request: impl IntoRequest<GetMachineRequest>,
    ) -> Result<Response<GetMachineResponse>, Status> {
        self.unary(request, "/headscale.v1.HeadscaleService/GetMachine")
            .await
    }

    pub async fn expire_machine(
        &mut self,
        request: impl IntoRequest<ExpireMachineRequest>,
    ) -> Result<Response<ExpireMachineResponse>, Status> {
        self.unary(request, "/headscale.v1.HeadscaleService/ExpireMachine")
            .await
    }

    pub async fn delete_machine(
        &mut self,
        request: impl IntoRequest<DeleteMachineRequest>,
    ) -> Result<Response<DeleteMachineResponse>, Status> {
        self.unary(request, "/headscale.v1.HeadscaleService/DeleteMachine")
            .await
    }

    pub async fn move_machine(
        &mut self,
        request: impl IntoRequest<MoveMachineRequest>,
    ) -> Result<Response<MoveMachineResponse>, Status> {
        self.unary(request, "/headscale.v1.HeadscaleService/MoveMachine")
            .await
    }
}
