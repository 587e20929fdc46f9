/// gRPC protocol definitions for the coordination server (v1 node API).
///
/// The messages are declared by hand with `prost` derives so the crate builds
/// without `protoc`. Field numbers follow the server's `headscale.v1` package.
pub mod headscale {
    pub mod v1 {
        mod client;
        mod messages;

        pub use client::HeadscaleServiceClient;
        pub use messages::*;
    }
}

// Re-export commonly used types for convenience
pub use headscale::v1::*;
