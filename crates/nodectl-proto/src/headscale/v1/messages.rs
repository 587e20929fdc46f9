use prost_types::Timestamp;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Namespace {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, optional, tag = "3")]
    pub created_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PreAuthKey {
    #[prost(string, tag = "1")]
    pub namespace: String,
    #[prost(string, tag = "2")]
    pub id: String,
    #[prost(string, tag = "3")]
    pub key: String,
    #[prost(bool, tag = "4")]
    pub reusable: bool,
    #[prost(bool, tag = "5")]
    pub ephemeral: bool,
    #[prost(bool, tag = "6")]
    pub used: bool,
    #[prost(message, optional, tag = "7")]
    pub expiration: Option<Timestamp>,
    #[prost(message, optional, tag = "8")]
    pub created_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Machine {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub machine_key: String,
    #[prost(string, tag = "3")]
    pub node_key: String,
    #[prost(string, tag = "4")]
    pub disco_key: String,
    #[prost(string, repeated, tag = "5")]
    pub ip_addresses: Vec<String>,
    #[prost(string, tag = "6")]
    pub name: String,
    #[prost(message, optional, tag = "7")]
    pub namespace: Option<Namespace>,
    #[prost(message, optional, tag = "8")]
    pub last_seen: Option<Timestamp>,
    #[prost(message, optional, tag = "9")]
    pub last_successful_update: Option<Timestamp>,
    #[prost(message, optional, tag = "10")]
    pub expiry: Option<Timestamp>,
    #[prost(message, optional, tag = "11")]
    pub pre_auth_key: Option<PreAuthKey>,
    #[prost(message, optional, tag = "12")]
    pub created_at: Option<Timestamp>,
    #[prost(string, repeated, tag = "14")]
    pub request_tags: Vec<String>,
    #[prost(string, repeated, tag = "15")]
    pub requested_routes: Vec<String>,
    #[prost(string, repeated, tag = "16")]
    pub enabled_routes: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterMachineRequest {
    #[prost(string, tag = "1")]
    pub namespace: String,
    #[prost(string, tag = "2")]
    pub key: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterMachineResponse {
    #[prost(message, optional, tag = "1")]
    pub machine: Option<Machine>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMachineRequest {
    #[prost(uint64, tag = "1")]
    pub machine_id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMachineResponse {
    #[prost(message, optional, tag = "1")]
    pub machine: Option<Machine>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListMachinesRequest {
    #[prost(string, tag = "1")]
    pub namespace: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListMachinesResponse {
    #[prost(message, repeated, tag = "1")]
    pub machines: Vec<Machine>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExpireMachineRequest {
    #[prost(uint64, tag = "1")]
    pub machine_id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExpireMachineResponse {
    #[prost(message, optional, tag = "1")]
    pub machine: Option<Machine>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteMachineRequest {
    #[prost(uint64, tag = "1")]
    pub machine_id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteMachineResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MoveMachineRequest {
    #[prost(uint64, tag = "1")]
    pub machine_id: u64,
    #[prost(string, tag = "2")]
    pub namespace: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MoveMachineResponse {
    #[prost(message, optional, tag = "1")]
    pub machine: Option<Machine>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_list_response_decodes_nested_machines() {
        let response = ListMachinesResponse {
            machines: vec![Machine {
                id: 4,
                name: "edge-router".to_string(),
                ip_addresses: vec!["100.64.0.4".to_string(), "fd7a:115c:a1e0::4".to_string()],
                namespace: Some(Namespace {
                    name: "ops".to_string(),
                    ..Default::default()
                }),
                last_seen: Some(Timestamp {
                    seconds: 1_650_000_000,
                    nanos: 0,
                }),
                requested_routes: vec!["10.0.0.0/24".to_string()],
                ..Default::default()
            }],
        };

        let bytes = response.encode_to_vec();
        let decoded = ListMachinesResponse::decode(bytes.as_slice()).unwrap();

        assert_eq!(decoded.machines.len(), 1);
        let machine = &decoded.machines[0];
        assert_eq!(machine.namespace.as_ref().unwrap().name, "ops");
        assert_eq!(machine.last_seen.as_ref().unwrap().seconds, 1_650_000_000);
        assert!(machine.expiry.is_none());
        assert!(machine.enabled_routes.is_empty());
    }

    #[test]
    fn test_empty_delete_response_encodes_to_nothing() {
        assert!(DeleteMachineResponse {}.encode_to_vec().is_empty());
    }
}
