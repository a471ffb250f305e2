macro_rules! test_logger {
    () => {
        std::sync::Arc::new($crate::Logger::new($crate::Severity::Warning).unwrap())
    };
}

macro_rules! parsed_network {
    ($onnx_file:expr) => {{
        let onnx_file = $onnx_file;
        let logger = $crate::tests::utils::test_logger!();
        let mut builder = $crate::Builder::new(&logger).unwrap();
        let network = builder.network_definition().unwrap();
        let network =
            $crate::Parser::parse_network_definition_from_file(network, &onnx_file.path(), &logger)
                .unwrap();
        (logger, builder, network)
    }};
}

macro_rules! fixed_network {
    () => {
        $crate::tests::utils::parsed_network!($crate::tests::onnx::fixed_onnx_file!())
    };
}

macro_rules! dynamic_network {
    () => {
        $crate::tests::utils::parsed_network!($crate::tests::onnx::dynamic_onnx_file!())
    };
}

macro_rules! fixed_network_plan_with_logger {
    () => {{
        let (logger, mut builder, mut network) = $crate::tests::utils::fixed_network!();
        let builder_config = builder.config().unwrap();
        let plan = builder
            .build_serialized_network(&mut network, builder_config)
            .unwrap();
        (logger, plan)
    }};
}

macro_rules! fixed_network_plan {
    () => {{
        let (_logger, plan) = $crate::tests::utils::fixed_network_plan_with_logger!();
        plan
    }};
}

macro_rules! fixed_engine {
    () => {{
        let (logger, plan) = $crate::tests::utils::fixed_network_plan_with_logger!();
        let runtime = $crate::Runtime::new(&logger).unwrap();
        runtime.deserialize_engine_from_plan(&plan).unwrap()
    }};
}

pub(crate) use dynamic_network;
pub(crate) use fixed_engine;
pub(crate) use fixed_network;
pub(crate) use fixed_network_plan;
pub(crate) use fixed_network_plan_with_logger;
pub(crate) use parsed_network;
pub(crate) use test_logger;
