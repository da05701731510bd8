use tonic_build::manual::{Builder, Method, Service};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Messages are hand-written prost derives in `src/proto.rs`, so only the
    // service stubs are generated here and no `protoc` is needed.
    let log_service = Service::builder()
        .name("LogService")
        .package("log")
        .method(
            Method::builder()
                .name("write_log")
                .route_name("WriteLog")
                .input_type("crate::proto::LogRequest")
                .output_type("crate::proto::LogResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    Builder::new().compile(&[log_service]);
}
